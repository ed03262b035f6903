//! Report rendering.

use std::fmt;

use crate::assessor::Report;
use crate::rules::Severity;

/// Render the module reports as a pretty JSON list with a trailing newline.
pub fn report_to_json(report: &Report) -> serde_json::Result<String> {
    let mut json = serde_json::to_string_pretty(&report.modules)?;
    json.push('\n');
    Ok(json)
}

/// Human-readable summary of a report.
///
/// Passing modules are folded into the totals line; every other module gets
/// a header line followed by its findings.
pub fn format_summary(report: &Report) -> String {
    Summary(report).to_string()
}

/// [`fmt::Display`] adapter behind [`format_summary`].
pub struct Summary<'a>(pub &'a Report);

impl fmt::Display for Summary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.0;

        for module in report.modules.iter().filter(|m| m.severity > Severity::Pass) {
            write!(f, "{} {}", module.severity, module.module_id)?;
            if !module.module_title.is_empty() {
                write!(f, " {:?}", module.module_title)?;
            }
            if !module.chapter.is_empty() {
                write!(f, " ({})", module.chapter)?;
            }
            writeln!(f)?;

            for finding in &module.findings {
                writeln!(f, "  [{}] {}: {}", finding.severity, finding.rule, finding.message)?;
            }
        }

        let counts = report.counts();
        writeln!(
            f,
            "{}: {} modules, {} passed, {} warned, {} failed",
            report.severity,
            counts.total(),
            counts.pass,
            counts.warn,
            counts.fail
        )
    }
}
