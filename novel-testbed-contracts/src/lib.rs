//! Reader-state contracts and rule-based assessment.
//!
//! A contract pairs every module of a parsed
//! [`Document`](novel_testbed::Document) with a declared reader-state
//! transition. Contracts start blank ([`build_blank`]), are filled in by a
//! human editor or a [`ContractInferencer`], and are then checked by an
//! ordered [`RuleSet`]:
//!
//! ```
//! use novel_testbed::{compile, StructuralNormalizer};
//! use novel_testbed_contracts::{assess, build_blank, RuleSet, Severity};
//!
//! let doc = compile("She stepped off the bus.", "Chapter One", &StructuralNormalizer).unwrap();
//! let report = assess(&build_blank(&doc), &RuleSet::default());
//! assert_eq!(report.severity, Severity::Warn);
//! ```
//!
//! ## Modules
//!
//! - [`state`] - Reader state and field-wise comparison
//! - [`contract`] - Contract entries, blank builder, validation
//! - [`loader`] - YAML loading
//! - [`rules`] - Severities, findings and the built-in rules
//! - [`rule_set`] - Ordered rule registration
//! - [`assessor`] - Report assembly
//! - [`formatter`] - JSON and text rendering of reports
//! - [`inference`] - Seam for automatic contract producers
//! - [`errors`] - Error types

pub mod assessor;
pub mod config;
pub mod contract;
pub mod errors;
pub mod formatter;
pub mod inference;
pub mod loader;
pub mod rule_set;
pub mod rules;
pub mod state;

pub use assessor::{assess, assess_entry, ModuleReport, Report, SeverityCounts};
pub use config::AssessConfig;
pub use contract::{build_blank, to_yaml, validate, Contract, ContractEntry};
pub use errors::{InferenceError, RuleSetError, SchemaError, SchemaResult};
pub use formatter::{format_summary, report_to_json, Summary};
pub use inference::{infer_contract, ContractInferencer};
pub use loader::load;
pub use rule_set::{RuleSet, BUILTIN_RULES};
pub use rules::{Finding, MissingDeclaredChange, MissingState, NoEffectiveChange, Rule, Severity};
pub use state::{ReaderState, Scalar, DEFAULT_TOLERANCE};
