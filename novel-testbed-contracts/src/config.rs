//! Assessment configuration.

use crate::state::DEFAULT_TOLERANCE;

/// Configuration shared by the built-in rules.
#[derive(Debug, Clone, PartialEq)]
pub struct AssessConfig {
    /// Absolute tolerance for numeric state comparisons.
    pub tolerance: f64,
}

impl AssessConfig {
    /// Standard configuration.
    pub fn standard() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
        }
    }

    /// Create with a specific tolerance.
    pub fn with_tolerance(tolerance: f64) -> Self {
        Self { tolerance }
    }
}

impl Default for AssessConfig {
    fn default() -> Self {
        Self::standard()
    }
}
