//! Line classification for the structural marker grammar.
//!
//! Markers follow CommonMark ATX headings with a fixed meaning per level:
//!
//! - `# Label` opens a chapter
//! - `## Keyword Title` opens a module inside the current chapter
//! - `###` and deeper are ordinary text
//!
//! Up to three leading spaces are tolerated before a marker, and a trailing
//! `\r` is ignored so CRLF input classifies the same as LF input.

use once_cell::sync::Lazy;
use regex::Regex;

static CHAPTER_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^ {0,3}#[ \t]+(\S.*)$").expect("Invalid chapter marker regex"));

static MODULE_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^ {0,3}##(?:[ \t]+(.*))?$").expect("Invalid module marker regex"));

/// Structural meaning of a single line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind<'a> {
    /// `# Label`
    Chapter {
        /// Label text, trimmed.
        label: &'a str,
    },
    /// `## Heading`
    Module {
        /// Heading text after the marker, trimmed. May be empty.
        heading: &'a str,
    },
    /// Anything else, including blank lines and deeper headings.
    Text,
}

impl LineKind<'_> {
    /// True for chapter and module markers.
    pub fn is_marker(&self) -> bool {
        !matches!(self, LineKind::Text)
    }
}

/// Classify one line (without its terminator).
pub fn classify_line(line: &str) -> LineKind<'_> {
    let line = line.strip_suffix('\r').unwrap_or(line);

    if let Some(caps) = CHAPTER_MARKER.captures(line) {
        if let Some(label) = caps.get(1) {
            return LineKind::Chapter {
                label: label.as_str().trim(),
            };
        }
    }

    if let Some(caps) = MODULE_MARKER.captures(line) {
        let heading = caps.get(1).map_or("", |m| m.as_str().trim());
        return LineKind::Module { heading };
    }

    LineKind::Text
}

/// A line of source text together with its position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLine<'a> {
    /// 1-based line number.
    pub number: usize,
    /// Byte offset of the first character of the line.
    pub offset: usize,
    /// Byte offset just past the line terminator (or end of input).
    pub end: usize,
    /// Line content without `\n` / `\r\n`.
    pub text: &'a str,
}

impl SourceLine<'_> {
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    pub fn kind(&self) -> LineKind<'_> {
        classify_line(self.text)
    }
}

/// Iterate over the lines of `text` with byte offsets.
///
/// Slicing `text[line.offset..line.end]` yields the line exactly as written,
/// terminator included, which lets callers cut verbatim regions out of the
/// input.
pub fn source_lines(text: &str) -> impl Iterator<Item = SourceLine<'_>> + '_ {
    text.split_inclusive('\n')
        .enumerate()
        .scan(0usize, |offset, (idx, raw)| {
            let start = *offset;
            *offset += raw.len();
            let content = raw.strip_suffix('\n').unwrap_or(raw);
            let content = content.strip_suffix('\r').unwrap_or(content);
            Some(SourceLine {
                number: idx + 1,
                offset: start,
                end: *offset,
                text: content,
            })
        })
}
