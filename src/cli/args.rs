//! Command line argument parsing for the ticket-triage CLI using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::config::ClassifierBackend;
use crate::input::DEFAULT_INPUT_FILE;
use crate::timesheet::{DEFAULT_CLEAN_OUTPUT, DEFAULT_REPORT_OUTPUT};

/// Default path of the classified ticket records.
pub const DEFAULT_OUTPUT_FILE: &str = "classified_local.json";

/// ticket-triage - zero-shot support ticket classification
#[derive(Parser, Debug, Clone)]
#[command(name = "ticket-triage")]
#[command(about = "Zero-shot support ticket triage with rule-based disambiguation")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct TriageArgs {
    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human", global = true)]
    pub output_format: OutputFormat,

    /// Configuration file (JSON)
    #[arg(short, long, value_name = "CONFIG_FILE", env = "TICKET_TRIAGE_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl TriageArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose.saturating_add(1)
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Classify support tickets
    Classify(ClassifyArgs),

    /// Clean a timesheet export
    Clean(CleanArgs),

    /// Show the label catalog and override rules
    Labels,
}

/// Arguments for classifying tickets
#[derive(Parser, Debug, Clone)]
pub struct ClassifyArgs {
    /// Line-delimited message file
    #[arg(short, long, value_name = "MESSAGES_FILE", default_value = DEFAULT_INPUT_FILE)]
    pub input: PathBuf,

    /// Output file for the classified records (JSON)
    #[arg(short, long, value_name = "OUTPUT_FILE", default_value = DEFAULT_OUTPUT_FILE)]
    pub output: PathBuf,

    /// Worker threads (0 = one per CPU core)
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// Classifier backend
    #[arg(short, long)]
    pub backend: Option<BackendArg>,

    /// Don't write the output file
    #[arg(long)]
    pub no_write: bool,
}

/// Arguments for cleaning a timesheet export
#[derive(Parser, Debug, Clone)]
pub struct CleanArgs {
    /// Raw timesheet export (CSV)
    #[arg(value_name = "INPUT_FILE")]
    pub input: PathBuf,

    /// Output file for the cleaned entries (CSV)
    #[arg(short, long, value_name = "OUTPUT_FILE", default_value = DEFAULT_CLEAN_OUTPUT)]
    pub output: PathBuf,

    /// Output file for the cleaning report (JSON)
    #[arg(short, long, value_name = "REPORT_FILE", default_value = DEFAULT_REPORT_OUTPUT)]
    pub report: PathBuf,
}

/// Classifier backends selectable from the command line
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendArg {
    /// Offline lexical baseline
    Lexical,
    /// Hosted zero-shot inference
    Http,
}

impl From<BackendArg> for ClassifierBackend {
    fn from(arg: BackendArg) -> Self {
        match arg {
            BackendArg::Lexical => ClassifierBackend::Lexical,
            BackendArg::Http => ClassifierBackend::Http,
        }
    }
}

/// Output formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_classify_defaults() {
        let args = TriageArgs::try_parse_from(["ticket-triage", "classify"]).unwrap();

        if let Command::Classify(classify_args) = args.command {
            assert_eq!(classify_args.input, PathBuf::from("messages.txt"));
            assert_eq!(classify_args.output, PathBuf::from("classified_local.json"));
            assert_eq!(classify_args.workers, None);
            assert_eq!(classify_args.backend, None);
            assert!(!classify_args.no_write);
        } else {
            panic!("Expected Classify command");
        }
    }

    #[test]
    fn test_classify_command() {
        let args = TriageArgs::try_parse_from([
            "ticket-triage",
            "classify",
            "--input",
            "tickets.txt",
            "--workers",
            "4",
            "--backend",
            "http",
            "--no-write",
        ])
        .unwrap();

        if let Command::Classify(classify_args) = args.command {
            assert_eq!(classify_args.input, PathBuf::from("tickets.txt"));
            assert_eq!(classify_args.workers, Some(4));
            assert_eq!(classify_args.backend, Some(BackendArg::Http));
            assert!(classify_args.no_write);
        } else {
            panic!("Expected Classify command");
        }
    }

    #[test]
    fn test_clean_command() {
        let args = TriageArgs::try_parse_from([
            "ticket-triage",
            "clean",
            "entries.csv",
            "--report",
            "out/report.json",
        ])
        .unwrap();

        if let Command::Clean(clean_args) = args.command {
            assert_eq!(clean_args.input, PathBuf::from("entries.csv"));
            assert_eq!(clean_args.output, PathBuf::from("clean_entries.csv"));
            assert_eq!(clean_args.report, PathBuf::from("out/report.json"));
        } else {
            panic!("Expected Clean command");
        }
    }

    #[test]
    fn test_verbosity_levels() {
        let args = TriageArgs::try_parse_from(["ticket-triage", "labels"]).unwrap();
        assert_eq!(args.verbosity(), 1);

        let args = TriageArgs::try_parse_from(["ticket-triage", "-v", "labels"]).unwrap();
        assert_eq!(args.verbosity(), 2);

        let args = TriageArgs::try_parse_from(["ticket-triage", "labels", "-vv"]).unwrap();
        assert_eq!(args.verbosity(), 3);

        let args = TriageArgs::try_parse_from(["ticket-triage", "-q", "-vv", "labels"]).unwrap();
        assert_eq!(args.verbosity(), 0);
    }

    #[test]
    fn test_output_format() {
        let args =
            TriageArgs::try_parse_from(["ticket-triage", "--format", "json", "labels"]).unwrap();
        assert_eq!(args.output_format, OutputFormat::Json);
    }

    #[test]
    fn test_backend_conversion() {
        assert_eq!(ClassifierBackend::from(BackendArg::Lexical), ClassifierBackend::Lexical);
        assert_eq!(ClassifierBackend::from(BackendArg::Http), ClassifierBackend::Http);
    }
}
