//! Structural compiler for long-form prose.
//!
//! `novel-testbed` turns a Markdown manuscript into an ordered, addressable
//! model of chapters and modules:
//!
//! ```text
//! raw text -> normalize -> normalized text -> parse -> Document
//! ```
//!
//! The marker grammar is deliberately small. `# Label` opens a chapter,
//! `## Keyword Title` opens a module, and everything else is body text.
//!
//! ```
//! use novel_testbed::{compile, ModuleType, StructuralNormalizer};
//!
//! let doc = compile("She stepped off the bus.", "Chapter One", &StructuralNormalizer).unwrap();
//! let module = doc.modules().next().unwrap();
//! assert_eq!(module.id, "C01-M001");
//! assert_eq!(module.module_type, ModuleType::Scene);
//! assert_eq!(module.anchors.start, "She stepped off the bus.");
//! ```
//!
//! ## Modules
//!
//! - [`marker`] - Line classification for chapter and module markers
//! - [`keyword`] - Module keyword classifier
//! - [`normalize`] - Marker synthesis for unstructured input
//! - [`parser`] - Normalized text to [`Document`]
//! - [`document`] - Chapters, modules and anchors
//! - [`errors`] - Structural errors
//!
//! Nothing in this crate performs I/O, reads a clock, or installs a
//! `tracing` subscriber.

pub mod document;
pub mod errors;
pub mod keyword;
pub mod marker;
pub mod normalize;
pub mod parser;

pub use document::{module_id, Anchors, Chapter, Document, Module};
pub use errors::{StructureError, StructureResult};
pub use keyword::{classify_heading, classify_keyword, ModuleType};
pub use marker::{classify_line, source_lines, LineKind, SourceLine};
pub use normalize::{chapter_label, normalize, Normalizer, StructuralNormalizer, DEFAULT_TITLE};
pub use parser::{compile, parse, StructuralParser};
