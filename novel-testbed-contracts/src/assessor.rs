//! Assessment: run every rule against every entry.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::contract::ContractEntry;
use crate::rule_set::RuleSet;
use crate::rules::{Finding, Severity};

/// Outcome for one module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleReport {
    pub module_id: String,
    #[serde(rename = "title")]
    pub module_title: String,
    pub chapter: String,
    pub severity: Severity,
    pub findings: Vec<Finding>,
}

/// Tally of module severities.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeverityCounts {
    pub pass: usize,
    pub warn: usize,
    pub fail: usize,
}

impl SeverityCounts {
    pub fn total(&self) -> usize {
        self.pass + self.warn + self.fail
    }
}

/// Assessment of a whole contract, in entry order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub modules: Vec<ModuleReport>,
    /// Highest module severity, `Pass` for an empty report.
    pub severity: Severity,
}

impl Report {
    pub fn counts(&self) -> SeverityCounts {
        let mut counts = SeverityCounts::default();
        for module in &self.modules {
            match module.severity {
                Severity::Pass => counts.pass += 1,
                Severity::Warn => counts.warn += 1,
                Severity::Fail => counts.fail += 1,
            }
        }
        counts
    }

    pub fn module(&self, module_id: &str) -> Option<&ModuleReport> {
        self.modules.iter().find(|m| m.module_id == module_id)
    }
}

/// Evaluate one entry against every rule.
pub fn assess_entry(entry: &ContractEntry, rules: &RuleSet) -> ModuleReport {
    let findings: Vec<Finding> = rules
        .iter()
        .filter_map(|rule| {
            let finding = rule.evaluate(entry);
            if let Some(finding) = &finding {
                debug!(
                    module_id = %entry.module_id,
                    rule = rule.name(),
                    severity = %finding.severity,
                    "rule fired"
                );
            }
            finding
        })
        .collect();

    let severity = findings
        .iter()
        .map(|f| f.severity)
        .max()
        .unwrap_or(Severity::Pass);

    ModuleReport {
        module_id: entry.module_id.clone(),
        module_title: entry.module_title.clone(),
        chapter: entry.chapter.clone(),
        severity,
        findings,
    }
}

/// Assess every entry, in order.
pub fn assess(entries: &[ContractEntry], rules: &RuleSet) -> Report {
    debug!(modules = entries.len(), rules = ?rules.names(), "assessing contract");

    let modules: Vec<ModuleReport> = entries.iter().map(|e| assess_entry(e, rules)).collect();
    let severity = modules
        .iter()
        .map(|m| m.severity)
        .max()
        .unwrap_or(Severity::Pass);

    let report = Report { modules, severity };
    let counts = report.counts();
    info!(
        modules = counts.total(),
        pass = counts.pass,
        warn = counts.warn,
        fail = counts.fail,
        severity = %report.severity,
        "assessment complete"
    );
    report
}
