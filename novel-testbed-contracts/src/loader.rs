//! Contract loading from YAML.
//!
//! The loader walks a generic YAML value instead of deriving
//! `Deserialize`, so that every rejection can name the module and the
//! field it concerns. Nothing is returned until the whole document has
//! been read and validated.

use serde_yaml::{Mapping, Value};
use tracing::{debug, info, warn};

use novel_testbed::{Anchors, ModuleType};

use crate::contract::{validate, Contract, ContractEntry};
use crate::errors::{SchemaError, SchemaResult};
use crate::state::{ReaderState, Scalar};

/// Load a contract from YAML text.
///
/// An empty document is an empty contract.
pub fn load(text: &str) -> SchemaResult<Contract> {
    if text.trim().is_empty() {
        return Ok(Contract::default());
    }

    let root: Value = serde_yaml::from_str(text).map_err(|e| SchemaError::Syntax {
        message: e.to_string(),
    })?;

    let root = match root {
        Value::Null => return Ok(Contract::default()),
        Value::Mapping(root) => root,
        other => {
            return Err(SchemaError::Document {
                field: "<root>".into(),
                reason: format!("expected a mapping, found {}", value_kind(&other)),
            })
        }
    };

    let source = match root.get("source") {
        Some(source) => source.clone(),
        None => Value::Mapping(Mapping::new()),
    };

    let raw_modules = match root.get("modules") {
        None | Some(Value::Null) => &[][..],
        Some(Value::Sequence(modules)) => modules.as_slice(),
        Some(other) => {
            return Err(SchemaError::Document {
                field: "modules".into(),
                reason: format!("expected a list, found {}", value_kind(other)),
            })
        }
    };
    debug!(modules = raw_modules.len(), "reading contract entries");

    let modules = raw_modules
        .iter()
        .enumerate()
        .map(|(index, value)| load_entry(index, value))
        .collect::<SchemaResult<Vec<_>>>()?;

    validate(&modules)?;

    info!(modules = modules.len(), "loaded contract");
    Ok(Contract { source, modules })
}

fn load_entry(index: usize, value: &Value) -> SchemaResult<ContractEntry> {
    let map = match value {
        Value::Mapping(map) => map,
        other => {
            return Err(SchemaError::Document {
                field: format!("modules[{}]", index),
                reason: format!("expected a mapping, found {}", value_kind(other)),
            })
        }
    };

    let module_id = match map.get("module_id") {
        Some(Value::String(id)) if !id.trim().is_empty() => id.clone(),
        _ => return Err(SchemaError::MissingModuleId { index }),
    };
    let reader = EntryReader {
        module_id: &module_id,
        map,
    };

    let mut entry = ContractEntry::new(module_id.clone());
    entry.chapter = reader.string("chapter")?.unwrap_or_default();
    entry.module_title = reader.string("module_title")?.unwrap_or_default();
    entry.module_type = reader.module_type()?;
    entry.page_range = reader.string("page_range")?;
    entry.fantasy_id = reader.string("fantasy_id")?;
    entry.anchors = reader.anchors()?;
    entry.pre_state = reader.state("pre_state")?;
    entry.post_state = reader.state("post_state")?;
    entry.expected_changes = reader.changes()?;

    for key in map.keys() {
        match key.as_str() {
            Some(name) if KNOWN_ENTRY_FIELDS.contains(&name) => {}
            Some(name) => warn!(module_id = %module_id, field = name, "ignoring unknown contract field"),
            None => warn!(module_id = %module_id, "ignoring non-string contract key"),
        }
    }

    Ok(entry)
}

const KNOWN_ENTRY_FIELDS: &[&str] = &[
    "module_id",
    "chapter",
    "module_title",
    "module_type",
    "page_range",
    "fantasy_id",
    "anchors",
    "pre_state",
    "post_state",
    "expected_changes",
];

struct EntryReader<'a> {
    module_id: &'a str,
    map: &'a Mapping,
}

impl EntryReader<'_> {
    fn error(&self, field: impl Into<String>, reason: impl Into<String>) -> SchemaError {
        SchemaError::Field {
            module_id: self.module_id.to_string(),
            field: field.into(),
            reason: reason.into(),
        }
    }

    fn string(&self, field: &str) -> SchemaResult<Option<String>> {
        match self.map.get(field) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(other) => Err(self.error(field, format!("must be a string, found {}", value_kind(other)))),
        }
    }

    fn module_type(&self) -> SchemaResult<ModuleType> {
        let name = match self.string("module_type")? {
            Some(name) => name,
            None => return Ok(ModuleType::Other),
        };
        match name.trim().to_lowercase().as_str() {
            "scene" => Ok(ModuleType::Scene),
            "exposition" => Ok(ModuleType::Exposition),
            "transition" => Ok(ModuleType::Transition),
            "other" => Ok(ModuleType::Other),
            _ => Err(self.error(
                "module_type",
                format!("must be one of scene, exposition, transition, other; found {:?}", name),
            )),
        }
    }

    fn anchors(&self) -> SchemaResult<Anchors> {
        let map = match self.map.get("anchors") {
            None | Some(Value::Null) => return Ok(Anchors::default()),
            Some(Value::Mapping(map)) => map,
            Some(other) => {
                return Err(self.error("anchors", format!("must be a mapping, found {}", value_kind(other))))
            }
        };

        let mut anchors = Anchors::default();
        for (name, slot) in [("start", &mut anchors.start), ("end", &mut anchors.end)] {
            match map.get(name) {
                None | Some(Value::Null) => {}
                Some(Value::String(s)) => *slot = s.clone(),
                Some(other) => {
                    return Err(self.error(
                        format!("anchors.{}", name),
                        format!("must be a string, found {}", value_kind(other)),
                    ))
                }
            }
        }
        Ok(anchors)
    }

    fn state(&self, field: &str) -> SchemaResult<ReaderState> {
        let map = match self.map.get(field) {
            None | Some(Value::Null) => return Ok(ReaderState::new()),
            Some(Value::Mapping(map)) => map,
            Some(other) => {
                return Err(self.error(field, format!("must be a mapping, found {}", value_kind(other))))
            }
        };

        let mut state = ReaderState::new();
        for (key, value) in map {
            let name = match key.as_str() {
                Some(name) => name,
                None => return Err(self.error(field, "keys must be strings")),
            };
            let path = format!("{}.{}", field, name);

            let scalar = match value {
                Value::Null => continue,
                Value::Bool(b) => Scalar::Bool(*b),
                Value::Number(n) => match (n.as_i64(), n.as_f64()) {
                    (Some(i), _) => Scalar::Integer(i),
                    (None, Some(x)) if x.is_finite() => Scalar::Float(x),
                    _ => return Err(self.error(path, format!("must be a finite number, found {}", n))),
                },
                Value::String(s) => Scalar::Text(s.clone()),
                other => {
                    return Err(self.error(path, format!("must be a scalar, found {}", value_kind(other))))
                }
            };

            state.set(name, scalar).map_err(|reason| self.error(path, reason))?;
        }
        Ok(state)
    }

    fn changes(&self) -> SchemaResult<Vec<String>> {
        let items = match self.map.get("expected_changes") {
            None | Some(Value::Null) => return Ok(Vec::new()),
            Some(Value::Sequence(items)) => items,
            Some(other) => {
                return Err(self.error(
                    "expected_changes",
                    format!("must be a list of strings, found {}", value_kind(other)),
                ))
            }
        };

        items
            .iter()
            .enumerate()
            .map(|(i, item)| match item {
                Value::String(s) => Ok(s.clone()),
                other => Err(self.error(
                    format!("expected_changes[{}]", i),
                    format!("must be a string, found {}", value_kind(other)),
                )),
            })
            .collect()
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Sequence(_) => "list",
        Value::Mapping(_) => "mapping",
        Value::Tagged(_) => "tagged value",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_empty() {
        assert_eq!(load("").unwrap(), Contract::default());
        assert_eq!(load("   \n").unwrap(), Contract::default());
        assert_eq!(load("~").unwrap(), Contract::default());
        assert!(load("source: {}\nmodules: []\n").unwrap().modules.is_empty());
    }

    #[test]
    fn test_source_is_kept_as_written() {
        for yaml in [
            "source: null\nmodules: []\n",
            "source: draft.md\nmodules: []\n",
            "source:\n- a\n- b\nmodules: []\n",
        ] {
            let contract = load(yaml).unwrap();
            assert_ne!(contract.source, Value::Mapping(Mapping::new()), "{}", yaml);
            let reloaded = load(&contract.to_yaml().unwrap()).unwrap();
            assert_eq!(reloaded.source, contract.source, "{}", yaml);
        }
        assert_eq!(load("source: null\n").unwrap().source, Value::Null);
        assert_eq!(
            load("source: draft.md\n").unwrap().source,
            Value::String("draft.md".into())
        );
    }

    #[test]
    fn test_load_entry() {
        let yaml = r#"
source:
  sha256: abc
modules:
  - module_id: C01-M001
    chapter: Chapter One
    module_title: Scene Arrival
    module_type: scene
    anchors:
      start: She stepped off the bus.
      end: She stepped off the bus.
    pre_state:
      genre: literary
      threat_level: 0.2
      dominant_fantasy_id: null
      notes: calm
    post_state:
      threat_level: 1
    expected_changes:
      - Threat rises
"#;
        let contract = load(yaml).unwrap();
        assert_eq!(
            contract.source.get("sha256"),
            Some(&Value::String("abc".into()))
        );

        let entry = &contract.modules[0];
        assert_eq!(entry.module_id, "C01-M001");
        assert_eq!(entry.module_type, ModuleType::Scene);
        assert_eq!(entry.anchors.end, "She stepped off the bus.");
        assert_eq!(entry.pre_state.genre.as_deref(), Some("literary"));
        assert_eq!(entry.pre_state.threat_level, Some(0.2));
        assert!(!entry.pre_state.extensions.contains_key("dominant_fantasy_id"));
        assert_eq!(
            entry.pre_state.extensions.get("notes"),
            Some(&Scalar::Text("calm".into()))
        );
        assert_eq!(entry.post_state.threat_level, Some(1.0));
        assert_eq!(entry.expected_changes, vec!["Threat rises".to_string()]);
    }

    #[test]
    fn test_missing_module_id() {
        let err = load("modules:\n  - module_id: A\n  - chapter: x\n").unwrap_err();
        assert_eq!(err, SchemaError::MissingModuleId { index: 1 });

        let err = load("modules:\n  - module_id: ''\n").unwrap_err();
        assert_eq!(err, SchemaError::MissingModuleId { index: 0 });
    }

    #[test]
    fn test_out_of_range() {
        let err = load("modules:\n  - module_id: A\n    pre_state:\n      threat_level: 1.5\n").unwrap_err();
        assert_eq!(
            err,
            SchemaError::Field {
                module_id: "A".into(),
                field: "pre_state.threat_level".into(),
                reason: "must be within [0, 1], found 1.5".into(),
            }
        );
    }

    #[test]
    fn test_wrong_types() {
        let err = load("modules:\n  - module_id: A\n    post_state:\n      genre: 3\n").unwrap_err();
        assert_eq!(
            err.to_string(),
            "module A: field `post_state.genre` must be a string, found integer"
        );

        let err = load("modules:\n  - module_id: A\n    pre_state:\n      agency_level: high\n").unwrap_err();
        assert_eq!(
            err.to_string(),
            "module A: field `pre_state.agency_level` must be a number, found string"
        );

        let err = load("modules:\n  - module_id: A\n    expected_changes: rises\n").unwrap_err();
        assert!(matches!(err, SchemaError::Field { ref field, .. } if field == "expected_changes"));

        let err = load("modules:\n  - module_id: A\n    pre_state:\n      notes: [a, b]\n").unwrap_err();
        assert_eq!(
            err.to_string(),
            "module A: field `pre_state.notes` must be a scalar, found list"
        );

        let err = load("modules:\n  - module_id: A\n    module_type: montage\n").unwrap_err();
        assert!(matches!(err, SchemaError::Field { ref field, .. } if field == "module_type"));
    }

    #[test]
    fn test_load_is_atomic() {
        let yaml = "modules:\n  - module_id: A\n  - module_id: B\n    pre_state:\n      agency_level: 2\n";
        assert!(load(yaml).is_err());
    }

    #[test]
    fn test_document_shape() {
        assert!(matches!(
            load("modules: 3\n").unwrap_err(),
            SchemaError::Document { ref field, .. } if field == "modules"
        ));
        assert!(matches!(
            load("- a\n- b\n").unwrap_err(),
            SchemaError::Document { ref field, .. } if field == "<root>"
        ));
        assert!(matches!(load("modules: [").unwrap_err(), SchemaError::Syntax { .. }));
    }

    #[test]
    fn test_duplicate_ids() {
        let err = load("modules:\n  - module_id: A\n  - module_id: A\n").unwrap_err();
        assert_eq!(err, SchemaError::DuplicateModuleId { module_id: "A".into() });
    }
}
