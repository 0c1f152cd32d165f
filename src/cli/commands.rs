//! Command implementations for the ticket-triage CLI.

use log::{info, warn};

use crate::classifier::build_classifier;
use crate::cli::args::*;
use crate::cli::output::*;
use crate::config::TriageConfig;
use crate::error::Result;
use crate::input::{MessageSource, load_messages};
use crate::processor::TicketProcessor;
use crate::report::Report;
use crate::timesheet::TimesheetCleaner;

/// Execute a CLI command.
pub fn execute_command(args: TriageArgs) -> Result<()> {
    let config = load_config(&args)?;

    match &args.command {
        Command::Classify(classify_args) => classify(classify_args, config, &args),
        Command::Clean(clean_args) => clean(clean_args, config, &args),
        Command::Labels => list_labels(config, &args),
    }
}

/// Load the configuration file named on the command line, or the defaults.
fn load_config(args: &TriageArgs) -> Result<TriageConfig> {
    match &args.config {
        Some(path) => {
            info!("Loading configuration from {}", path.display());
            TriageConfig::from_file(path)
        }
        None => Ok(TriageConfig::default()),
    }
}

/// Classify tickets and write the records.
fn classify(args: &ClassifyArgs, mut config: TriageConfig, cli_args: &TriageArgs) -> Result<()> {
    if let Some(workers) = args.workers {
        config.workers = Some(workers);
    }
    if let Some(backend) = args.backend {
        config.classifier.backend = backend.into();
    }
    config.validate()?;

    let classifier = build_classifier(&config.classifier)?;
    let loaded = load_messages(&args.input)?;
    let processor = TicketProcessor::from_config(&config, classifier)?;

    info!(
        "Classifying {} tickets with {} worker(s)...",
        loaded.messages.len(),
        processor.workers()
    );
    let outcome = processor.process(&loaded.messages)?;
    let report = Report::emit(outcome.records, &outcome.tally);

    let output = if args.no_write {
        None
    } else {
        report.write_json_file(&args.output)?;
        info!("Saved {} records to {}", report.total(), args.output.display());
        Some(args.output.display().to_string())
    };

    let source = match loaded.source {
        MessageSource::File(path) => path,
        MessageSource::BuiltIn => "built-in messages".to_string(),
    };

    output_result(&ClassificationRun::new(&report, source, output), cli_args)
}

/// Clean a timesheet export.
fn clean(args: &CleanArgs, config: TriageConfig, cli_args: &TriageArgs) -> Result<()> {
    let cleaner = TimesheetCleaner::new(config.cleaning)?;
    let report = cleaner.run(&args.input, &args.output, &args.report)?;

    if report.clean_entries < report.total_entries {
        warn!(
            "Dropped {} entries without time_in or time_out",
            report.total_entries - report.clean_entries
        );
    }

    output_result(
        &CleaningRun {
            output: args.output.display().to_string(),
            report_file: args.report.display().to_string(),
            report,
        },
        cli_args,
    )
}

/// Show the label catalog and override rules.
fn list_labels(config: TriageConfig, cli_args: &TriageArgs) -> Result<()> {
    config.validate()?;

    output_result(
        &LabelListing {
            hypothesis_template: config.hypothesis_template.to_string(),
            labels: config.labels,
            rules: config.rules,
        },
        cli_args,
    )
}
