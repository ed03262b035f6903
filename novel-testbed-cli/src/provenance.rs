//! Source provenance: tie a contract to the exact text it was built from.

use chrono::{SecondsFormat, Utc};
use serde_yaml::{Mapping, Value};
use sha2::{Digest, Sha256};
use std::path::Path;

/// Provenance block stored under `source` in a contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceInfo {
    pub original_path: String,
    pub copied_path: String,
    pub sha256: String,
    pub generated_at: String,
}

impl SourceInfo {
    pub fn new(original_path: &Path, copied_path: &Path, text: &str) -> Self {
        Self {
            original_path: original_path.display().to_string(),
            copied_path: copied_path.display().to_string(),
            sha256: fingerprint(text),
            generated_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        }
    }

    pub fn to_mapping(&self) -> Mapping {
        let mut map = Mapping::new();
        for (key, value) in [
            ("original_path", &self.original_path),
            ("copied_path", &self.copied_path),
            ("sha256", &self.sha256),
            ("generated_at", &self.generated_at),
        ] {
            map.insert(Value::String(key.into()), Value::String(value.clone()));
        }
        map
    }
}

/// Hex SHA-256 of `text`.
pub fn fingerprint(text: &str) -> String {
    let digest = Sha256::digest(text.as_bytes());
    digest.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Recorded digest from a contract's `source` block, if any.
pub fn recorded_digest(source: &Value) -> Option<&str> {
    source.get("sha256").and_then(Value::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fingerprint() {
        assert_eq!(
            fingerprint(""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_eq!(
            fingerprint("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_mapping_order() {
        let info = SourceInfo::new(Path::new("draft.md"), Path::new("out/source.md"), "abc");
        let map = info.to_mapping();
        let keys: Vec<_> = map.keys().filter_map(Value::as_str).collect();
        assert_eq!(keys, ["original_path", "copied_path", "sha256", "generated_at"]);
        let source = Value::Mapping(map);
        assert_eq!(recorded_digest(&source), Some(info.sha256.as_str()));
        assert_eq!(recorded_digest(&Value::String("draft.md".into())), None);
        assert!(info.generated_at.ends_with('Z'));
    }
}
