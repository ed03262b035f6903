//! Document model produced by the structural parser.
//!
//! A [`Document`] owns its chapters and a [`Chapter`] owns its modules.
//! Everything here is immutable data: once the parser hands a document
//! back, nothing in this workspace mutates it.

use serde::{Deserialize, Serialize};

use crate::keyword::ModuleType;

/// First and last non-blank lines of a module body, trimmed.
///
/// Both are empty when the body has no non-blank line, and they are equal
/// when it has exactly one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Anchors {
    #[serde(default)]
    pub start: String,
    #[serde(default)]
    pub end: String,
}

impl Anchors {
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }

    /// Compute anchors from raw body text.
    pub fn from_body(body: &str) -> Self {
        let mut non_blank = body.lines().map(str::trim).filter(|l| !l.is_empty());

        let start = match non_blank.next() {
            Some(first) => first,
            None => return Self::default(),
        };
        let end = non_blank.last().unwrap_or(start);

        Self::new(start, end)
    }

    pub fn is_empty(&self) -> bool {
        self.start.is_empty() && self.end.is_empty()
    }
}

/// The atomic unit of the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Module {
    /// Stable identifier, e.g. `C01-M003`.
    pub id: String,
    /// Label of the owning chapter.
    pub chapter: String,
    /// Heading text after the marker, keyword included.
    pub title: String,
    pub module_type: ModuleType,
    /// 1-based line of the module marker.
    pub start_line: usize,
    /// 1-based line of the last non-blank line in the module region.
    pub end_line: usize,
    pub anchors: Anchors,
    /// Body text exactly as it appears in the source.
    pub text: String,
}

/// A top-level division of the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chapter {
    /// 1-based position in the document.
    pub index: usize,
    pub label: String,
    /// 1-based line of the chapter marker.
    pub line: usize,
    /// Text between the chapter marker and its first module marker.
    pub preamble: String,
    pub modules: Vec<Module>,
}

impl Chapter {
    pub fn module_count(&self) -> usize {
        self.modules.len()
    }
}

/// A parsed document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub title: String,
    pub chapters: Vec<Chapter>,
}

impl Document {
    /// All modules in document order.
    pub fn modules(&self) -> impl Iterator<Item = &Module> + '_ {
        self.chapters.iter().flat_map(|c| c.modules.iter())
    }

    pub fn module_count(&self) -> usize {
        self.chapters.iter().map(Chapter::module_count).sum()
    }

    /// Look up a module by identifier.
    pub fn module(&self, id: &str) -> Option<&Module> {
        self.modules().find(|m| m.id == id)
    }

    pub fn chapter_count(&self) -> usize {
        self.chapters.len()
    }
}

/// Format a module identifier from its chapter index and document-wide counter.
pub fn module_id(chapter_index: usize, counter: usize) -> String {
    format!("C{:02}-M{:03}", chapter_index, counter)
}
