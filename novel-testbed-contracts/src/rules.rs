//! Assessment rules.
//!
//! A rule looks at one contract entry and either stays silent or emits a
//! single [`Finding`]. Rules never fail, never mutate the entry and never
//! see each other's output, which keeps them independent of registration
//! order.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::contract::ContractEntry;
use crate::state::DEFAULT_TOLERANCE;

/// Outcome level, ordered `Pass < Warn < Fail`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Pass,
    Warn,
    Fail,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Pass => "PASS",
            Severity::Warn => "WARN",
            Severity::Fail => "FAIL",
        }
    }
}

impl Default for Severity {
    fn default() -> Self {
        Severity::Pass
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single rule outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub rule: String,
    pub severity: Severity,
    pub message: String,
}

impl Finding {
    pub fn new(rule: &str, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            rule: rule.to_string(),
            severity,
            message: message.into(),
        }
    }
}

/// Implemented by every assessment rule.
pub trait Rule: Send + Sync {
    /// Stable name used in findings and configuration.
    fn name(&self) -> &'static str;

    /// Inspect one entry.
    fn evaluate(&self, entry: &ContractEntry) -> Option<Finding>;
}

/// WARN when a required field is absent from either state.
#[derive(Debug, Clone, Copy, Default)]
pub struct MissingState;

impl MissingState {
    pub const NAME: &'static str = "missing_state";
}

impl Rule for MissingState {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn evaluate(&self, entry: &ContractEntry) -> Option<Finding> {
        let parts: Vec<String> = [("pre_state", &entry.pre_state), ("post_state", &entry.post_state)]
            .into_iter()
            .filter_map(|(label, state)| {
                let missing = state.missing_required();
                if missing.is_empty() {
                    None
                } else {
                    Some(format!("{} missing {}", label, missing.join(", ")))
                }
            })
            .collect();

        if parts.is_empty() {
            return None;
        }

        Some(Finding::new(Self::NAME, Severity::Warn, parts.join("; ")))
    }
}

/// WARN when no expected change is declared.
#[derive(Debug, Clone, Copy, Default)]
pub struct MissingDeclaredChange;

impl MissingDeclaredChange {
    pub const NAME: &'static str = "missing_declared_change";
}

impl Rule for MissingDeclaredChange {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn evaluate(&self, entry: &ContractEntry) -> Option<Finding> {
        if !entry.expected_changes.is_empty() {
            return None;
        }
        Some(Finding::new(
            Self::NAME,
            Severity::Warn,
            "expected_changes is empty; declare what this module is meant to change",
        ))
    }
}

/// FAIL when changes are declared but the state does not move.
///
/// Only fields set in both states are compared, and the rule stays silent
/// unless both states carry every required field.
#[derive(Debug, Clone, Copy)]
pub struct NoEffectiveChange {
    pub tolerance: f64,
}

impl NoEffectiveChange {
    pub const NAME: &'static str = "no_effective_change";

    pub fn new(tolerance: f64) -> Self {
        Self { tolerance }
    }
}

impl Default for NoEffectiveChange {
    fn default() -> Self {
        Self::new(DEFAULT_TOLERANCE)
    }
}

impl Rule for NoEffectiveChange {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn evaluate(&self, entry: &ContractEntry) -> Option<Finding> {
        if entry.expected_changes.is_empty() {
            return None;
        }
        if !entry.pre_state.is_complete() || !entry.post_state.is_complete() {
            return None;
        }
        if !entry
            .pre_state
            .agrees_on_shared(&entry.post_state, self.tolerance)
        {
            return None;
        }

        Some(Finding::new(
            Self::NAME,
            Severity::Fail,
            format!(
                "{} expected change(s) declared but pre_state equals post_state",
                entry.expected_changes.len()
            ),
        ))
    }
}
