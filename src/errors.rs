//! Error types for the structural compiler.

use thiserror::Error;

/// Errors raised while turning normalized text into a [`Document`](crate::Document).
///
/// Both variants are deterministic consequences of the input; re-running the
/// parser on the same text yields the same error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StructureError {
    /// Non-blank text (or a module marker) appears before the first chapter marker.
    #[error("orphan content at line {line} (byte offset {offset}): {text:?} appears before the first chapter marker")]
    OrphanContent {
        /// 1-based line number.
        line: usize,
        /// Byte offset of the start of the line.
        offset: usize,
        /// The offending line, trimmed.
        text: String,
    },

    /// The text contains no module markers at all.
    #[error("empty document: no module markers found in {lines} lines")]
    EmptyDocument {
        /// Number of lines that were scanned.
        lines: usize,
    },
}

/// Result type for structural operations.
pub type StructureResult<T> = Result<T, StructureError>;
