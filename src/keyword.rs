//! Module keyword classification.
//!
//! The first token of a module heading names the kind of narrative work
//! the module does:
//! - Scenes (on-page action)
//! - Exposition (explanation, backstory)
//! - Transitions (bridging material between scenes)
//!
//! Anything else is `Other`. Classification is total: every heading,
//! including an empty one, maps to exactly one [`ModuleType`].

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of narrative work a module performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleType {
    /// "scene" - primary action
    Scene,
    /// "exposition" - explanatory material
    Exposition,
    /// "transition" - bridging material
    Transition,
    /// Unrecognized or missing keyword
    Other,
}

impl ModuleType {
    /// Serialized name.
    pub fn as_str(&self) -> &'static str {
        match self {
            ModuleType::Scene => "scene",
            ModuleType::Exposition => "exposition",
            ModuleType::Transition => "transition",
            ModuleType::Other => "other",
        }
    }
}

impl Default for ModuleType {
    fn default() -> Self {
        ModuleType::Other
    }
}

impl fmt::Display for ModuleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const SCENE_KEYWORDS: &[&str] = &["scene"];
const EXPOSITION_KEYWORDS: &[&str] = &["exposition"];
const TRANSITION_KEYWORDS: &[&str] = &["transition"];

/// Classify a single keyword token.
///
/// Surrounding punctuation is ignored and matching is case-insensitive, so
/// `Scene:`, `SCENE` and `(scene)` all classify as [`ModuleType::Scene`].
pub fn classify_keyword(token: &str) -> ModuleType {
    let normalized = token
        .trim_matches(|c: char| !c.is_alphanumeric())
        .to_lowercase();

    if SCENE_KEYWORDS.contains(&normalized.as_str()) {
        ModuleType::Scene
    } else if EXPOSITION_KEYWORDS.contains(&normalized.as_str()) {
        ModuleType::Exposition
    } else if TRANSITION_KEYWORDS.contains(&normalized.as_str()) {
        ModuleType::Transition
    } else {
        ModuleType::Other
    }
}

/// Classify a module heading by its first whitespace-separated token.
pub fn classify_heading(heading: &str) -> ModuleType {
    heading
        .split_whitespace()
        .next()
        .map_or(ModuleType::Other, classify_keyword)
}
