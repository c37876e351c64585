//! CLI argument parsing for hintlet

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for hint reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text format (default)
    Text,
    /// JSON format for machine parsing
    Json,
    /// CSV format for spreadsheet analysis
    Csv,
}

#[derive(Parser, Debug)]
#[command(name = "hintlet")]
#[command(version)]
#[command(
    about = "Replay a browser performance trace and report caching and responsiveness hints",
    long_about = None
)]
pub struct Cli {
    /// JSON-lines trace file, or - for stdin
    #[arg(value_name = "INPUT", required_unless_present = "list_rules")]
    pub input: Option<PathBuf>,

    /// Output format
    #[arg(long = "format", value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// TOML file with rule thresholds and enabled rules
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Comma-separated built-in rules to run (default: all)
    #[arg(short = 'r', long = "rules", value_name = "RULES", value_delimiter = ',')]
    pub rules: Option<Vec<String>>,

    /// Print hint counts per severity and rule to stderr at the end
    #[arg(short = 's', long = "summary")]
    pub summary: bool,

    /// List the built-in rules and exit
    #[arg(long = "list-rules")]
    pub list_rules: bool,

    /// Enable debug tracing output to stderr
    #[arg(long = "debug")]
    pub debug: bool,
}

impl Cli {
    /// Whether the trace should be read from stdin
    pub fn reads_stdin(&self) -> bool {
        self.input.as_deref().is_some_and(|p| p.as_os_str() == "-")
    }
}
