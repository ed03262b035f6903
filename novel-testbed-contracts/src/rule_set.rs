//! Ordered rule registration.
//!
//! A [`RuleSet`] is built once, explicitly, and the assessor runs its rules
//! in the order they were added. Findings inherit that order.

use std::fmt;

use crate::config::AssessConfig;
use crate::errors::RuleSetError;
use crate::rules::{MissingDeclaredChange, MissingState, NoEffectiveChange, Rule};

/// Names of the built-in rules, in standard order.
pub const BUILTIN_RULES: [&str; 3] = [
    MissingState::NAME,
    MissingDeclaredChange::NAME,
    NoEffectiveChange::NAME,
];

/// Ordered collection of rules.
pub struct RuleSet {
    rules: Vec<Box<dyn Rule>>,
}

impl RuleSet {
    /// A set with no rules. Every module passes.
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    /// All built-in rules in standard order:
    /// 1. `missing_state`
    /// 2. `missing_declared_change`
    /// 3. `no_effective_change`
    pub fn standard(config: &AssessConfig) -> Self {
        Self::empty()
            .with_rule(MissingState)
            .with_rule(MissingDeclaredChange)
            .with_rule(NoEffectiveChange::new(config.tolerance))
    }

    /// Built-in rules selected by name, in the given order.
    pub fn from_names<S: AsRef<str>>(names: &[S], config: &AssessConfig) -> Result<Self, RuleSetError> {
        names
            .iter()
            .try_fold(Self::empty(), |set, name| match name.as_ref() {
                MissingState::NAME => Ok(set.with_rule(MissingState)),
                MissingDeclaredChange::NAME => Ok(set.with_rule(MissingDeclaredChange)),
                NoEffectiveChange::NAME => Ok(set.with_rule(NoEffectiveChange::new(config.tolerance))),
                other => Err(RuleSetError::UnknownRule {
                    name: other.to_string(),
                    known: BUILTIN_RULES.join(", "),
                }),
            })
    }

    /// Append a rule.
    pub fn with_rule(mut self, rule: impl Rule + 'static) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn Rule> + '_ {
        self.rules.iter().map(|r| r.as_ref())
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::standard(&AssessConfig::default())
    }
}

impl fmt::Debug for RuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleSet").field("rules", &self.names()).finish()
    }
}
