//! Structural parser: normalized text to [`Document`].
//!
//! The parser is a single forward pass over classified lines. Chapter
//! markers close the open chapter (and its open module); module markers
//! close the open module. Module bodies are cut out of the input as byte
//! slices, so they are exactly the text between two markers.

use tracing::{debug, info, warn};

use crate::document::{module_id, Anchors, Chapter, Document, Module};
use crate::errors::{StructureError, StructureResult};
use crate::keyword::classify_heading;
use crate::marker::{source_lines, LineKind, SourceLine};
use crate::normalize::Normalizer;

/// Stateless structural parser.
#[derive(Debug, Clone, Copy, Default)]
pub struct StructuralParser;

impl StructuralParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse normalized text into a document.
    pub fn parse(&self, text: &str, title: &str) -> StructureResult<Document> {
        parse(text, title)
    }
}

/// Parse normalized text into a document.
///
/// Fails with [`StructureError::OrphanContent`] when non-blank text or a
/// module marker precedes the first chapter marker, and with
/// [`StructureError::EmptyDocument`] when no module marker exists.
pub fn parse(text: &str, title: &str) -> StructureResult<Document> {
    let mut state = ParseState::new(text);

    for line in source_lines(text) {
        state.lines_seen = line.number;
        match line.kind() {
            LineKind::Chapter { label } => state.open_chapter(&line, label),
            LineKind::Module { heading } => state.open_module(&line, heading)?,
            LineKind::Text => state.text_line(&line)?,
        }
    }

    state.finish(title)
}

/// Normalize `raw` with `normalizer`, then parse the result.
pub fn compile(raw: &str, title: &str, normalizer: &dyn Normalizer) -> StructureResult<Document> {
    debug!(normalizer = normalizer.name(), "normalizing");
    let normalized = normalizer.normalize(raw, title);
    parse(&normalized, title)
}

struct OpenModule {
    id: String,
    heading: String,
    start_line: usize,
    end_line: usize,
    body_start: usize,
}

struct OpenChapter {
    index: usize,
    label: String,
    line: usize,
    preamble_start: usize,
    preamble: Option<String>,
    modules: Vec<Module>,
}

struct ParseState<'a> {
    text: &'a str,
    chapters: Vec<Chapter>,
    chapter: Option<OpenChapter>,
    module: Option<OpenModule>,
    counter: usize,
    lines_seen: usize,
}

impl<'a> ParseState<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            text,
            chapters: Vec::new(),
            chapter: None,
            module: None,
            counter: 0,
            lines_seen: 0,
        }
    }

    fn open_chapter(&mut self, line: &SourceLine<'_>, label: &str) {
        self.close_chapter(line.offset);

        let index = self.chapters.len() + 1;
        debug!(chapter = index, label, line = line.number, "chapter marker");
        self.chapter = Some(OpenChapter {
            index,
            label: label.to_string(),
            line: line.number,
            preamble_start: line.end,
            preamble: None,
            modules: Vec::new(),
        });
    }

    fn open_module(&mut self, line: &SourceLine<'_>, heading: &str) -> StructureResult<()> {
        self.close_module(line.offset);

        let chapter = match self.chapter.as_mut() {
            Some(chapter) => chapter,
            None => return Err(orphan(line)),
        };

        if chapter.preamble.is_none() {
            chapter.preamble = Some(self.text[chapter.preamble_start..line.offset].to_string());
        }

        self.counter += 1;
        let id = module_id(chapter.index, self.counter);
        debug!(module_id = %id, heading, line = line.number, "module marker");

        self.module = Some(OpenModule {
            id,
            heading: heading.to_string(),
            start_line: line.number,
            end_line: line.number,
            body_start: line.end,
        });
        Ok(())
    }

    fn text_line(&mut self, line: &SourceLine<'_>) -> StructureResult<()> {
        if line.is_blank() {
            return Ok(());
        }
        if self.chapter.is_none() {
            return Err(orphan(line));
        }
        if let Some(module) = self.module.as_mut() {
            module.end_line = line.number;
        }
        Ok(())
    }

    fn close_module(&mut self, end: usize) {
        let open = match self.module.take() {
            Some(open) => open,
            None => return,
        };
        // A module is only ever opened inside a chapter.
        let chapter = match self.chapter.as_mut() {
            Some(chapter) => chapter,
            None => return,
        };

        let body = &self.text[open.body_start..end];
        chapter.modules.push(Module {
            id: open.id,
            chapter: chapter.label.clone(),
            module_type: classify_heading(&open.heading),
            title: open.heading,
            start_line: open.start_line,
            end_line: open.end_line,
            anchors: Anchors::from_body(body),
            text: body.to_string(),
        });
    }

    fn close_chapter(&mut self, end: usize) {
        self.close_module(end);

        let open = match self.chapter.take() {
            Some(open) => open,
            None => return,
        };

        let preamble = match open.preamble {
            Some(preamble) => preamble,
            None => self.text[open.preamble_start..end].to_string(),
        };
        if open.modules.is_empty() {
            warn!(chapter = open.index, label = %open.label, "chapter has no modules");
        }

        self.chapters.push(Chapter {
            index: open.index,
            label: open.label,
            line: open.line,
            preamble,
            modules: open.modules,
        });
    }

    fn finish(mut self, title: &str) -> StructureResult<Document> {
        self.close_chapter(self.text.len());

        if self.counter == 0 {
            return Err(StructureError::EmptyDocument {
                lines: self.lines_seen,
            });
        }

        info!(
            chapters = self.chapters.len(),
            modules = self.counter,
            "parsed document"
        );

        Ok(Document {
            title: title.to_string(),
            chapters: self.chapters,
        })
    }
}

fn orphan(line: &SourceLine<'_>) -> StructureError {
    StructureError::OrphanContent {
        line: line.number,
        offset: line.offset,
        text: line.text.trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keyword::ModuleType;

    #[test]
    fn test_single_scene() {
        let doc = parse(
            "# Chapter One\n\n## Scene Arrival\nShe stepped off the bus.",
            "Chapter One",
        )
        .unwrap();

        assert_eq!(doc.chapters.len(), 1);
        assert_eq!(doc.module_count(), 1);

        let module = &doc.chapters[0].modules[0];
        assert_eq!(module.id, "C01-M001");
        assert_eq!(module.chapter, "Chapter One");
        assert_eq!(module.title, "Scene Arrival");
        assert_eq!(module.module_type, ModuleType::Scene);
        assert_eq!(module.start_line, 3);
        assert_eq!(module.end_line, 4);
        assert_eq!(module.text, "She stepped off the bus.");
        assert_eq!(module.anchors, Anchors::new("She stepped off the bus.", "She stepped off the bus."));
    }

    #[test]
    fn test_counter_is_document_wide() {
        let text = "# One\n## Scene A\na\n## Exposition B\nb\n# Two\n## Transition C\nc\n";
        let doc = parse(text, "t").unwrap();
        let ids: Vec<_> = doc.modules().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, ["C01-M001", "C01-M002", "C02-M003"]);

        let types: Vec<_> = doc.modules().map(|m| m.module_type).collect();
        assert_eq!(
            types,
            [ModuleType::Scene, ModuleType::Exposition, ModuleType::Transition]
        );
        assert_eq!(doc.module("C02-M003").map(|m| m.chapter.as_str()), Some("Two"));
    }

    #[test]
    fn test_bodies_are_verbatim_slices() {
        let text = "# C\n## Scene A\n\nfirst\n\n### aside\nlast\n\n## Scene B\n";
        let doc = parse(text, "t").unwrap();
        let a = &doc.chapters[0].modules[0];
        assert_eq!(a.text, "\nfirst\n\n### aside\nlast\n\n");
        assert_eq!(a.anchors, Anchors::new("first", "last"));
        assert_eq!(a.end_line, 7);

        let b = &doc.chapters[0].modules[1];
        assert_eq!(b.text, "");
        assert!(b.anchors.is_empty());
        assert_eq!(b.end_line, b.start_line);
    }

    #[test]
    fn test_unclassified_and_empty_headings() {
        let doc = parse("# C\n## Interlude at sea\nx\n##\ny\n", "t").unwrap();
        let modules: Vec<_> = doc.modules().collect();
        assert_eq!(modules[0].module_type, ModuleType::Other);
        assert_eq!(modules[0].title, "Interlude at sea");
        assert_eq!(modules[1].module_type, ModuleType::Other);
        assert_eq!(modules[1].title, "");
    }

    #[test]
    fn test_preamble_and_empty_chapter() {
        let text = "# One\nEpigraph.\n\n## Scene A\nx\n# Two\nNothing here.\n# Three\n## Scene B\ny";
        let doc = parse(text, "t").unwrap();
        assert_eq!(doc.chapters.len(), 3);
        assert_eq!(doc.chapters[0].preamble, "Epigraph.\n\n");
        assert_eq!(doc.chapters[1].preamble, "Nothing here.\n");
        assert!(doc.chapters[1].modules.is_empty());
        assert_eq!(doc.chapters[2].preamble, "");
        assert_eq!(doc.chapters[2].line, 8);
        assert_eq!(doc.module_count(), 2);
    }

    #[test]
    fn test_orphan_module_marker() {
        let err = parse("## Scene Early\ntext\n# Chapter One\n## Scene A\n", "t").unwrap_err();
        assert_eq!(
            err,
            StructureError::OrphanContent {
                line: 1,
                offset: 0,
                text: "## Scene Early".to_string(),
            }
        );
    }

    #[test]
    fn test_orphan_text() {
        let err = parse("\n\nPrologue\n# C\n## Scene A\n", "t").unwrap_err();
        assert_eq!(
            err,
            StructureError::OrphanContent {
                line: 3,
                offset: 2,
                text: "Prologue".to_string(),
            }
        );
    }

    #[test]
    fn test_leading_blank_lines_are_fine() {
        let doc = parse("\n  \n# C\n## Scene A\nx", "t").unwrap();
        assert_eq!(doc.chapters[0].line, 3);
    }

    #[test]
    fn test_empty_document() {
        assert_eq!(
            parse("# Chapter One\n\nJust prose.\n", "t").unwrap_err(),
            StructureError::EmptyDocument { lines: 3 }
        );
        assert_eq!(
            parse("", "t").unwrap_err(),
            StructureError::EmptyDocument { lines: 0 }
        );
    }

    #[test]
    fn test_crlf_input() {
        let doc = parse("# C\r\n## Scene A\r\nbody\r\n", "t").unwrap();
        let module = &doc.chapters[0].modules[0];
        assert_eq!(doc.chapters[0].label, "C");
        assert_eq!(module.title, "Scene A");
        assert_eq!(module.text, "body\r\n");
        assert_eq!(module.anchors.start, "body");
    }

    #[test]
    fn test_parse_is_deterministic() {
        let text = "# C\n## Scene A\nx\n## Scene B\ny\n";
        assert_eq!(parse(text, "t").unwrap(), parse(text, "t").unwrap());
    }
}
