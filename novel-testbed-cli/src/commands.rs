//! Command implementations. These own all file I/O.

use anyhow::{bail, Context};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{debug, info, warn};

use novel_testbed::{parse, Normalizer, StructuralNormalizer};
use novel_testbed_contracts::{assess, format_summary, load, report_to_json, Contract};

use crate::cli::FailOn;
use crate::config::CliConfig;
use crate::provenance::{fingerprint, recorded_digest, SourceInfo};

/// File name of the source copy stored next to a generated contract.
pub const SOURCE_COPY: &str = "source.md";

/// Exit status when `--fail-on` is reached.
pub const EXIT_THRESHOLD: u8 = 2;

fn read(path: &Path) -> anyhow::Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn write(path: &Path, contents: &str) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.display()))?;
    }
    fs::write(path, contents).with_context(|| format!("failed to write {}", path.display()))
}

/// Explicit title, else the input's file stem, else the configured default.
fn resolve_title(title: Option<String>, input: &Path, config: &CliConfig) -> String {
    title
        .or_else(|| {
            input
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .filter(|stem| !stem.trim().is_empty())
        })
        .unwrap_or_else(|| config.segment.default_title.clone())
}

pub fn segment(
    input: &Path,
    output: &Path,
    title: Option<String>,
    config: &CliConfig,
) -> anyhow::Result<ExitCode> {
    let text = read(input)?;
    let title = resolve_title(title, input, config);
    let normalizer = StructuralNormalizer::new();

    let normalized = normalizer.normalize(&text, &title);
    write(output, &normalized)?;

    info!(
        input = %input.display(),
        output = %output.display(),
        normalizer = normalizer.name(),
        changed = normalized != text,
        "segmented"
    );
    Ok(ExitCode::SUCCESS)
}

pub fn parse_command(
    input: &Path,
    output: &Path,
    title: Option<String>,
    config: &CliConfig,
) -> anyhow::Result<ExitCode> {
    let text = read(input)?;
    let title = resolve_title(title, input, config);

    let document = parse(&text, &title).with_context(|| format!("failed to parse {}", input.display()))?;

    let copied = output
        .parent()
        .map_or_else(|| PathBuf::from(SOURCE_COPY), |dir| dir.join(SOURCE_COPY));
    if same_file(input, &copied) {
        debug!(path = %copied.display(), "source already in place");
    } else {
        write(&copied, &text)?;
        debug!(path = %copied.display(), "copied source");
    }

    let source = SourceInfo::new(input, &copied, &text);
    debug!(sha256 = %source.sha256, "source fingerprint");

    let contract = Contract::blank(&document).with_source(source.to_mapping());
    write(output, &contract.to_yaml()?)?;

    info!(
        output = %output.display(),
        modules = contract.modules.len(),
        "wrote blank contract"
    );
    Ok(ExitCode::SUCCESS)
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

pub fn assess_command(
    contract_path: &Path,
    output: Option<&Path>,
    summary: bool,
    fail_on: Option<FailOn>,
    config: &CliConfig,
) -> anyhow::Result<ExitCode> {
    let rules = config.assess.rule_set()?;
    let contract = load(&read(contract_path)?)
        .with_context(|| format!("invalid contract {}", contract_path.display()))?;

    let report = assess(&contract.modules, &rules);
    let json = report_to_json(&report)?;

    let mut stdout = io::stdout().lock();
    match output {
        Some(path) => {
            write(path, &json)?;
            info!(output = %path.display(), "wrote report");
        }
        None if !summary => stdout.write_all(json.as_bytes())?,
        None => {}
    }
    if summary {
        stdout.write_all(format_summary(&report).as_bytes())?;
    }
    stdout.flush()?;

    match fail_on {
        Some(level) if report.severity >= level.threshold() => {
            warn!(severity = %report.severity, threshold = %level.threshold(), "severity threshold reached");
            Ok(ExitCode::from(EXIT_THRESHOLD))
        }
        _ => Ok(ExitCode::SUCCESS),
    }
}

pub fn verify(contract_path: &Path, source_path: &Path) -> anyhow::Result<ExitCode> {
    let contract = load(&read(contract_path)?)
        .with_context(|| format!("invalid contract {}", contract_path.display()))?;
    let recorded = match recorded_digest(&contract.source) {
        Some(digest) => digest,
        None => bail!("{} has no source.sha256 to verify against", contract_path.display()),
    };

    let actual = fingerprint(&read(source_path)?);
    if actual != recorded {
        bail!(
            "{} does not match {}: recorded sha256 {}, found {}",
            source_path.display(),
            contract_path.display(),
            recorded,
            actual
        );
    }

    println!("ok: {} matches {}", source_path.display(), contract_path.display());
    Ok(ExitCode::SUCCESS)
}
