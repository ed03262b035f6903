//! Seam for collaborators that fill in contracts automatically.
//!
//! An inferencer receives the parsed document and its blank contract and
//! returns populated entries. Its output is treated exactly like a
//! hand-edited contract: it must pass [`validate`], and it may only talk
//! about modules the document actually has.

use std::collections::HashSet;
use std::error::Error as StdError;
use tracing::{debug, info};

use novel_testbed::Document;

use crate::contract::{build_blank, validate, ContractEntry};
use crate::errors::InferenceError;

/// A producer of populated contract entries.
pub trait ContractInferencer {
    /// Populate `blank`, the blank contract for `document`.
    fn infer(
        &self,
        document: &Document,
        blank: Vec<ContractEntry>,
    ) -> Result<Vec<ContractEntry>, Box<dyn StdError + Send + Sync>>;

    /// Short identifier for logs and errors.
    fn name(&self) -> &str;
}

/// Build the blank contract, hand it to `inferencer`, and validate the result.
pub fn infer_contract(
    document: &Document,
    inferencer: &dyn ContractInferencer,
) -> Result<Vec<ContractEntry>, InferenceError> {
    let blank = build_blank(document);
    debug!(inferencer = inferencer.name(), modules = blank.len(), "running inferencer");

    let entries = inferencer
        .infer(document, blank)
        .map_err(|source| InferenceError::Collaborator {
            name: inferencer.name().to_string(),
            source,
        })?;

    validate(&entries)?;

    let known: HashSet<&str> = document.modules().map(|m| m.id.as_str()).collect();
    if let Some(unknown) = entries.iter().find(|e| !known.contains(e.module_id.as_str())) {
        return Err(InferenceError::UnknownModule {
            module_id: unknown.module_id.clone(),
        });
    }

    info!(inferencer = inferencer.name(), modules = entries.len(), "inferred contract");
    Ok(entries)
}
