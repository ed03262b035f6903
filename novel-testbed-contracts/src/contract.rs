//! Contract entries and the blank-contract builder.

use serde::Serialize;
use std::collections::HashSet;
use tracing::{debug, info};

use novel_testbed::{Anchors, Document, ModuleType};

use crate::errors::{SchemaError, SchemaResult};
use crate::state::ReaderState;

/// Declared reader-state transition for one module.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContractEntry {
    pub module_id: String,
    pub chapter: String,
    pub module_title: String,
    pub module_type: ModuleType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_range: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fantasy_id: Option<String>,
    pub anchors: Anchors,
    pub pre_state: ReaderState,
    pub post_state: ReaderState,
    pub expected_changes: Vec<String>,
}

impl ContractEntry {
    /// Blank entry for a module id, with no states and no declared changes.
    pub fn new(module_id: impl Into<String>) -> Self {
        Self {
            module_id: module_id.into(),
            chapter: String::new(),
            module_title: String::new(),
            module_type: ModuleType::Other,
            page_range: None,
            fantasy_id: None,
            anchors: Anchors::default(),
            pre_state: ReaderState::new(),
            post_state: ReaderState::new(),
            expected_changes: Vec::new(),
        }
    }

    pub fn with_states(mut self, pre_state: ReaderState, post_state: ReaderState) -> Self {
        self.pre_state = pre_state;
        self.post_state = post_state;
        self
    }

    pub fn with_changes<I, S>(mut self, changes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.expected_changes = changes.into_iter().map(Into::into).collect();
        self
    }
}

/// A whole contract: provenance block plus one entry per module.
///
/// `source` is opaque here, whatever shape it has. It is written first and
/// round-trips unchanged; a contract without one gets an empty mapping.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Contract {
    pub source: serde_yaml::Value,
    pub modules: Vec<ContractEntry>,
}

impl Default for Contract {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl Contract {
    pub fn new(modules: Vec<ContractEntry>) -> Self {
        Self {
            source: serde_yaml::Value::Mapping(serde_yaml::Mapping::new()),
            modules,
        }
    }

    /// Blank contract for a parsed document.
    pub fn blank(document: &Document) -> Self {
        Self::new(build_blank(document))
    }

    pub fn with_source(mut self, source: impl Into<serde_yaml::Value>) -> Self {
        self.source = source.into();
        self
    }

    /// Render as YAML.
    pub fn to_yaml(&self) -> SchemaResult<String> {
        to_yaml(self)
    }

    pub fn entry(&self, module_id: &str) -> Option<&ContractEntry> {
        self.modules.iter().find(|e| e.module_id == module_id)
    }
}

/// One blank entry per module, in document order.
pub fn build_blank(document: &Document) -> Vec<ContractEntry> {
    let entries: Vec<_> = document
        .modules()
        .map(|module| {
            debug!(module_id = %module.id, title = %module.title, "blank contract entry");
            ContractEntry {
                chapter: module.chapter.clone(),
                module_title: module.title.clone(),
                module_type: module.module_type,
                anchors: module.anchors.clone(),
                ..ContractEntry::new(module.id.clone())
            }
        })
        .collect();

    info!(modules = entries.len(), title = %document.title, "built blank contract");
    entries
}

/// Render a contract as YAML.
///
/// Blank states list every required field as `null`.
pub fn to_yaml(contract: &Contract) -> SchemaResult<String> {
    serde_yaml::to_string(contract).map_err(|e| SchemaError::Emit {
        message: e.to_string(),
    })
}

/// Check entries against the schema.
///
/// Every entry needs a non-empty, unique `module_id`, and both states must
/// satisfy [`ReaderState::check`].
pub fn validate(entries: &[ContractEntry]) -> SchemaResult<()> {
    let mut seen = HashSet::new();

    for (index, entry) in entries.iter().enumerate() {
        if entry.module_id.trim().is_empty() {
            return Err(SchemaError::MissingModuleId { index });
        }
        if !seen.insert(entry.module_id.as_str()) {
            return Err(SchemaError::DuplicateModuleId {
                module_id: entry.module_id.clone(),
            });
        }

        for (prefix, state) in [("pre_state", &entry.pre_state), ("post_state", &entry.post_state)] {
            if let Err((field, reason)) = state.check() {
                return Err(SchemaError::Field {
                    module_id: entry.module_id.clone(),
                    field: format!("{}.{}", prefix, field),
                    reason,
                });
            }
        }
    }

    Ok(())
}
