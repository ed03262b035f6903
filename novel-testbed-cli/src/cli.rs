use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use novel_testbed_contracts::Severity;

/// Default configuration file, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "novel-testbed.toml";

#[derive(Parser, Debug)]
#[command(name = "novel-testbed", version, about = "Structural compiler for fiction")]
pub struct Cli {
    #[arg(
        long,
        global = true,
        env = "NOVEL_TESTBED_LOG",
        help = "Log level or filter directive (overridden by RUST_LOG)"
    )]
    pub log_level: Option<String>,
    #[arg(long, global = true, help = "Path to configuration file [default: novel-testbed.toml]")]
    pub config: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Add missing chapter and module markers to a Markdown file.
    Segment {
        input: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
        #[arg(long, help = "Chapter title for unmarked text [default: input file stem]")]
        title: Option<String>,
    },
    /// Parse annotated Markdown into a blank contract.
    Parse {
        input: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
        #[arg(long, help = "Document title [default: input file stem]")]
        title: Option<String>,
    },
    /// Assess a filled-in contract.
    Assess {
        contract: PathBuf,
        #[arg(short, long, help = "Write the JSON report here instead of stdout")]
        output: Option<PathBuf>,
        #[arg(long, default_value_t = false, help = "Print a human-readable summary")]
        summary: bool,
        #[arg(long, value_enum, help = "Exit with status 2 at or above this severity")]
        fail_on: Option<FailOn>,
    },
    /// Check that a contract still matches its source text.
    Verify { contract: PathBuf, source: PathBuf },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum FailOn {
    Warn,
    Fail,
}

impl FailOn {
    pub fn threshold(self) -> Severity {
        match self {
            FailOn::Warn => Severity::Warn,
            FailOn::Fail => Severity::Fail,
        }
    }
}
