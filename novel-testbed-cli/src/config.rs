//! Configuration file.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use novel_testbed::DEFAULT_TITLE;
use novel_testbed_contracts::{AssessConfig, RuleSet, BUILTIN_RULES, DEFAULT_TOLERANCE};

use crate::cli::DEFAULT_CONFIG_FILE;

/// Contents of `novel-testbed.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CliConfig {
    pub logging: LoggingSection,
    pub segment: SegmentSection,
    pub assess: AssessSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingSection {
    pub level: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SegmentSection {
    /// Title used when none is given and the input has no file stem.
    pub default_title: String,
}

impl Default for SegmentSection {
    fn default() -> Self {
        Self {
            default_title: DEFAULT_TITLE.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AssessSection {
    pub tolerance: f64,
    /// Rules to run, in order.
    pub rules: Vec<String>,
}

impl Default for AssessSection {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            rules: BUILTIN_RULES.iter().map(|r| r.to_string()).collect(),
        }
    }
}

impl AssessSection {
    pub fn assess_config(&self) -> AssessConfig {
        AssessConfig::with_tolerance(self.tolerance)
    }

    pub fn rule_set(&self) -> anyhow::Result<RuleSet> {
        if !(self.tolerance >= 0.0 && self.tolerance.is_finite()) {
            anyhow::bail!("[assess] tolerance must be a finite, non-negative number");
        }
        RuleSet::from_names(&self.rules, &self.assess_config()).context("invalid [assess] rules")
    }
}

impl CliConfig {
    /// Load configuration.
    ///
    /// With no explicit path, a missing `novel-testbed.toml` yields the
    /// defaults. An explicit path must exist.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let (path, explicit) = match path {
            Some(path) => (path, true),
            None => (Path::new(DEFAULT_CONFIG_FILE), false),
        };

        if !explicit && !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::from_toml(&content).with_context(|| format!("failed to parse config {}", path.display()))
    }

    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(content)?)
    }
}
