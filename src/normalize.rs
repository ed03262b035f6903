//! Normalization: guarantee explicit structural markers.
//!
//! Any text goes in, and text that the structural parser can read comes
//! out. The deterministic strategy never removes or reorders existing
//! markers or text; it only synthesizes the markers that are missing:
//!
//! | chapter marker | module marker | action                                      |
//! |----------------|---------------|---------------------------------------------|
//! | yes            | yes           | unchanged                                   |
//! | no             | yes           | prepend `# {title}`                         |
//! | no             | no            | prepend `# {title}` and `## Scene 1`        |
//! | yes            | no            | insert `## Scene 1` after the first chapter |
//!
//! A chapter marker only counts when nothing but blank lines comes before
//! it. Prose or a module marker above the first chapter is treated as if
//! the text had no chapter at all, so it gets a synthesized chapter too.
//!
//! Every output contains both marker kinds, so normalizing twice is the
//! same as normalizing once.

use tracing::debug;

use crate::marker::{source_lines, LineKind};

/// Chapter label used when the caller supplies a blank title.
pub const DEFAULT_TITLE: &str = "Untitled";

/// Heading of the module synthesized around unmarked prose.
pub const SYNTHETIC_MODULE_HEADING: &str = "Scene 1";

/// A strategy for making markers explicit.
///
/// Implementations must be idempotent and must not remove or reorder
/// existing markers or text. Strategies are chosen by the caller and passed
/// in explicitly; nothing in the core looks one up.
pub trait Normalizer {
    /// Produce normalized text for `raw`, using `title` for a synthesized chapter.
    fn normalize(&self, raw: &str, title: &str) -> String;

    /// Short identifier for logs.
    fn name(&self) -> &'static str;
}

/// Deterministic normalizer that only adds missing markers.
#[derive(Debug, Clone, Copy, Default)]
pub struct StructuralNormalizer;

impl StructuralNormalizer {
    pub fn new() -> Self {
        Self
    }
}

impl Normalizer for StructuralNormalizer {
    fn normalize(&self, raw: &str, title: &str) -> String {
        normalize(raw, title)
    }

    fn name(&self) -> &'static str {
        "structural"
    }
}

/// Normalize `raw` with the deterministic strategy.
pub fn normalize(raw: &str, title: &str) -> String {
    let mut first_chapter_end = None;
    let mut leading_content = false;
    let mut has_module = false;

    for line in source_lines(raw) {
        match line.kind() {
            LineKind::Chapter { .. } if first_chapter_end.is_none() => {
                first_chapter_end = Some(line.end);
            }
            LineKind::Module { .. } => has_module = true,
            _ => {}
        }
        if first_chapter_end.is_none() && !line.is_blank() {
            leading_content = true;
        }
        if first_chapter_end.is_some() && has_module {
            break;
        }
    }

    let label = chapter_label(title);
    if leading_content {
        debug!(strategy = "structural", "content precedes the first chapter marker");
        first_chapter_end = None;
    }

    match (first_chapter_end, has_module) {
        (Some(_), true) => {
            debug!(strategy = "structural", "markers already present");
            raw.to_string()
        }
        (None, true) => {
            debug!(strategy = "structural", chapter = %label, "synthesizing chapter marker");
            format!("# {}\n\n{}", label, raw)
        }
        (None, false) => {
            debug!(strategy = "structural", chapter = %label, "wrapping unmarked text");
            format!("# {}\n\n## {}\n{}", label, SYNTHETIC_MODULE_HEADING, raw)
        }
        (Some(end), false) => {
            debug!(strategy = "structural", "synthesizing module marker");
            let (head, tail) = raw.split_at(end);
            let mut out = String::with_capacity(raw.len() + SYNTHETIC_MODULE_HEADING.len() + 5);
            out.push_str(head);
            if !head.ends_with('\n') {
                out.push('\n');
            }
            out.push_str("## ");
            out.push_str(SYNTHETIC_MODULE_HEADING);
            out.push('\n');
            out.push_str(tail);
            out
        }
    }
}

/// Collapse a title to a single-line chapter label.
pub fn chapter_label(title: &str) -> String {
    let label = title
        .split(|c| c == '\n' || c == '\r')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    if label.is_empty() {
        DEFAULT_TITLE.to_string()
    } else {
        label
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unmarked_prose_is_wrapped() {
        let out = normalize("She stepped off the bus.", "Chapter One");
        insta::assert_snapshot!(out, @r###"
        # Chapter One

        ## Scene 1
        She stepped off the bus.
        "###);
    }

    #[test]
    fn test_wrapped_text_is_verbatim() {
        let raw = "  Indented.\r\n\n\ttabbed   \n\n";
        let out = normalize(raw, "T");
        assert_eq!(out, format!("# T\n\n## Scene 1\n{}", raw));
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(normalize("", "Chapter One"), "# Chapter One\n\n## Scene 1\n");
        assert_eq!(normalize("", ""), "# Untitled\n\n## Scene 1\n");
    }

    #[test]
    fn test_module_without_chapter() {
        let raw = "## Scene Arrival\nShe stepped off the bus.\n";
        assert_eq!(
            normalize(raw, "Chapter One"),
            "# Chapter One\n\n## Scene Arrival\nShe stepped off the bus.\n"
        );
    }

    #[test]
    fn test_chapter_without_module() {
        let raw = "# Chapter One\nShe stepped off the bus.\n";
        let out = normalize(raw, "ignored");
        insta::assert_snapshot!(out, @r###"
        # Chapter One
        ## Scene 1
        She stepped off the bus.
        "###);
    }

    #[test]
    fn test_chapter_only_without_terminator() {
        assert_eq!(normalize("# Chapter One", "x"), "# Chapter One\n## Scene 1\n");
    }

    #[test]
    fn test_module_inserted_after_first_chapter_only() {
        let raw = "# One\nfirst\n# Two\nsecond\n";
        assert_eq!(
            normalize(raw, "x"),
            "# One\n## Scene 1\nfirst\n# Two\nsecond\n"
        );
    }

    #[test]
    fn test_marked_input_unchanged() {
        let raw = "# Chapter One\n\n## Scene Arrival\nShe stepped off the bus.";
        assert_eq!(normalize(raw, "Other Title"), raw);
    }

    #[test]
    fn test_deeper_headings_are_not_markers() {
        let out = normalize("### Notes\ntext", "T");
        assert_eq!(out, "# T\n\n## Scene 1\n### Notes\ntext");
    }

    #[test]
    fn test_prose_before_first_chapter_gets_a_chapter() {
        let raw = "Prologue.\n# Chapter One\n## Scene A\nx\n";
        let out = normalize(raw, "T");
        assert_eq!(out, format!("# T\n\n{}", raw));
        assert_eq!(normalize(&out, "T"), out);
    }

    #[test]
    fn test_module_before_first_chapter_gets_a_chapter() {
        let raw = "## Scene A\nx\n# Chapter Two\n## Scene B\ny\n";
        let out = normalize(raw, "T");
        assert_eq!(out, format!("# T\n\n{}", raw));
        assert_eq!(normalize(&out, "T"), out);
    }

    #[test]
    fn test_prose_before_chapter_without_modules() {
        let raw = "Prologue.\n# Chapter One\ntext\n";
        assert_eq!(normalize(raw, "T"), format!("# T\n\n## Scene 1\n{}", raw));
    }

    #[test]
    fn test_blank_lines_before_chapter_are_not_content() {
        let raw = "\n  \n# Chapter One\n## Scene A\nx\n";
        assert_eq!(normalize(raw, "T"), raw);
    }

    #[test]
    fn test_idempotent_on_each_case() {
        for raw in [
            "",
            "plain",
            "## Scene A\nx",
            "# C\ny",
            "# C\n## Scene A\nz",
            "# C",
            "Prologue.\n# C\n## Scene A\nz",
            "## Scene A\nx\n# C\ny",
        ] {
            let once = normalize(raw, "Title");
            assert_eq!(normalize(&once, "Title"), once, "input {:?}", raw);
        }
    }

    #[test]
    fn test_chapter_label() {
        assert_eq!(chapter_label("  Chapter One "), "Chapter One");
        assert_eq!(chapter_label("Part\nOne\r\nBegins"), "Part One Begins");
        assert_eq!(chapter_label(" \n "), "Untitled");
    }

    #[test]
    fn test_trait_object() {
        let normalizer: &dyn Normalizer = &StructuralNormalizer::new();
        assert_eq!(normalizer.name(), "structural");
        assert_eq!(
            normalizer.normalize("x", "T"),
            normalize("x", "T")
        );
    }
}
