//! Error types for contracts, rule registration and inference.

use std::error::Error as StdError;
use thiserror::Error;

/// Errors raised while loading or validating a contract.
///
/// Loading is atomic: any of these aborts the whole load and no partial
/// contract is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// The text is not valid YAML.
    #[error("contract is not valid YAML: {message}")]
    Syntax { message: String },

    /// The top-level shape is wrong (e.g. `modules` is not a list).
    #[error("invalid contract document at `{field}`: {reason}")]
    Document { field: String, reason: String },

    /// An entry has no usable `module_id`.
    #[error("module entry {index} has no module_id")]
    MissingModuleId { index: usize },

    /// Two entries share a `module_id`.
    #[error("duplicate module_id {module_id:?}")]
    DuplicateModuleId { module_id: String },

    /// A field of one entry has the wrong type or an out-of-range value.
    #[error("module {module_id}: field `{field}` {reason}")]
    Field {
        module_id: String,
        field: String,
        reason: String,
    },

    /// The contract could not be rendered as YAML.
    #[error("failed to serialize contract: {message}")]
    Emit { message: String },
}

/// Result type for contract operations.
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Errors raised while assembling a rule set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleSetError {
    #[error("unknown rule {name:?} (known rules: {known})")]
    UnknownRule { name: String, known: String },
}

/// Errors raised by [`infer_contract`](crate::infer_contract).
#[derive(Debug, Error)]
pub enum InferenceError {
    /// The collaborator itself failed.
    #[error("inferencer {name} failed: {source}")]
    Collaborator {
        name: String,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },

    /// The collaborator returned a contract that does not validate.
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// The collaborator returned an entry for a module the document lacks.
    #[error("inferencer returned unknown module {module_id:?}")]
    UnknownModule { module_id: String },
}
