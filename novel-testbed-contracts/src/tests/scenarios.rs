use std::fs;
use std::path::Path;

use novel_testbed::{compile, parse, StructuralNormalizer};

use crate::{
    assess, build_blank, load, report_to_json, AssessConfig, Contract, ContractEntry, ReaderState,
    RuleSet, Severity,
};

fn fixture(name: &str) -> String {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("fixtures")
        .join(name);
    fs::read_to_string(&path).unwrap()
}

/// Manuscripts are shared with the core crate.
fn manuscript(name: &str) -> String {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("fixtures")
        .join(name);
    fs::read_to_string(&path).unwrap()
}

fn complete_state(threat: f64) -> ReaderState {
    ReaderState {
        genre: Some("literary".into()),
        power_balance: Some("town".into()),
        emotional_tone: Some("wary".into()),
        threat_level: Some(threat),
        agency_level: Some(0.5),
        ..ReaderState::default()
    }
}

#[test]
fn unchanged_state_with_declared_change_fails() {
    let entry = ContractEntry::new("C01-M001")
        .with_states(complete_state(0.2), complete_state(0.2))
        .with_changes(["Threat rises"]);

    let report = assess(&[entry], &RuleSet::default());
    let module = &report.modules[0];
    assert_eq!(module.severity, Severity::Fail);
    assert!(module
        .findings
        .iter()
        .any(|f| f.rule == "no_effective_change" && f.severity == Severity::Fail));
    assert_eq!(report.severity, Severity::Fail);
}

#[test]
fn empty_before_state_warns_without_failing() {
    let entry = ContractEntry::new("C01-M001")
        .with_states(ReaderState::new(), complete_state(0.2))
        .with_changes(["Threat rises"]);

    let report = assess(&[entry], &RuleSet::default());
    let module = &report.modules[0];
    assert_eq!(module.severity, Severity::Warn);
    let rules: Vec<_> = module.findings.iter().map(|f| f.rule.as_str()).collect();
    assert_eq!(rules, ["missing_state"]);
}

#[test]
fn harbor_contract_report() {
    let contract = load(&fixture("harbor.yaml")).unwrap();
    let report = assess(&contract.modules, &RuleSet::default());

    assert_eq!(report.severity, Severity::Fail);
    insta::assert_snapshot!(report_to_json(&report).unwrap(), @r###"
    [
      {
        "module_id": "C01-M001",
        "title": "Scene Arrival",
        "chapter": "Chapter One",
        "severity": "FAIL",
        "findings": [
          {
            "rule": "no_effective_change",
            "severity": "FAIL",
            "message": "1 expected change(s) declared but pre_state equals post_state"
          }
        ]
      },
      {
        "module_id": "C01-M002",
        "title": "Exposition The Blockade",
        "chapter": "Chapter One",
        "severity": "WARN",
        "findings": [
          {
            "rule": "missing_state",
            "severity": "WARN",
            "message": "pre_state missing genre, power_balance, emotional_tone, threat_level, agency_level"
          }
        ]
      },
      {
        "module_id": "C02-M003",
        "title": "Transition Night Falls",
        "chapter": "Chapter Two",
        "severity": "PASS",
        "findings": []
      }
    ]
    "###);
}

#[test]
fn harbor_counts() {
    let contract = load(&fixture("harbor.yaml")).unwrap();
    let counts = assess(&contract.modules, &RuleSet::default()).counts();
    assert_eq!((counts.pass, counts.warn, counts.fail), (1, 1, 1));
}

#[test]
fn source_block_round_trips() {
    let contract = load(&fixture("harbor.yaml")).unwrap();
    let reloaded = load(&contract.to_yaml().unwrap()).unwrap();
    assert_eq!(reloaded, contract);
    assert_eq!(reloaded.source.as_mapping().map(|m| m.len()), Some(2));
}

#[test]
fn blank_contract_lists_every_required_field() {
    let doc = compile("She stepped off the bus.", "Chapter One", &StructuralNormalizer).unwrap();
    let yaml = Contract::blank(&doc).to_yaml().unwrap();

    assert!(yaml.starts_with("source: {}\n"));
    for field in ReaderState::REQUIRED_FIELDS {
        assert!(yaml.contains(&format!("{}: null", field)), "{} missing in\n{}", field, yaml);
    }
    assert!(yaml.contains("module_id: C01-M001"));
    assert!(yaml.contains("expected_changes: []"));
}

#[test]
fn blank_contract_round_trips() {
    let doc = parse(&manuscript("harbor.md"), "harbor").unwrap();
    let contract = Contract::blank(&doc);
    assert_eq!(load(&contract.to_yaml().unwrap()).unwrap(), contract);
}

#[test]
fn blank_contract_warns_everywhere() {
    let doc = parse(&manuscript("harbor.md"), "harbor").unwrap();
    let report = assess(&build_blank(&doc), &RuleSet::standard(&AssessConfig::default()));
    assert_eq!(report.counts().warn, doc.module_count());
    assert!(report
        .modules
        .iter()
        .all(|m| m.findings.iter().all(|f| f.rule != "no_effective_change")));
}

#[test]
fn identical_input_gives_identical_report() {
    let text = fixture("harbor.yaml");
    let first = report_to_json(&assess(&load(&text).unwrap().modules, &RuleSet::default())).unwrap();
    let second = report_to_json(&assess(&load(&text).unwrap().modules, &RuleSet::default())).unwrap();
    assert_eq!(first, second);
}
