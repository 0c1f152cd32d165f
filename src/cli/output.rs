//! Output formatting for CLI commands.

use std::fmt::Write as _;

use serde::Serialize;

use crate::catalog::LabelEntry;
use crate::cli::args::{OutputFormat, TriageArgs};
use crate::disambiguation::OverrideRule;
use crate::error::Result;
use crate::report::Report;
use crate::timesheet::CleaningReport;

/// Results that can be rendered for a terminal.
pub trait HumanOutput {
    fn render_human(&self) -> String;
}

/// Result structure for a classification run.
#[derive(Debug, Serialize)]
pub struct ClassificationRun {
    /// Input file, or `built-in` for the sample messages.
    pub source: String,
    pub tickets: usize,
    /// Written output file, if any.
    pub output: Option<String>,
    pub summary: serde_json::Value,
    #[serde(skip)]
    summary_block: String,
}

impl ClassificationRun {
    pub fn new(report: &Report, source: String, output: Option<String>) -> Self {
        Self {
            source,
            tickets: report.total(),
            output,
            summary: report.summary_json(),
            summary_block: report.render_summary(),
        }
    }
}

impl HumanOutput for ClassificationRun {
    fn render_human(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Classified {} tickets from {}", self.tickets, self.source);
        if let Some(output) = &self.output {
            let _ = writeln!(out, "Results saved to {output}");
        }
        out.push('\n');
        out.push_str(&self.summary_block);
        out
    }
}

/// Result structure for a cleaning run.
#[derive(Debug, Serialize)]
pub struct CleaningRun {
    pub output: String,
    pub report_file: String,
    #[serde(flatten)]
    pub report: CleaningReport,
}

impl HumanOutput for CleaningRun {
    fn render_human(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Total entries: {}", self.report.total_entries);
        let _ = writeln!(out, "Clean entries: {}", self.report.clean_entries);
        let _ = writeln!(out, "Average duration: {} minutes", self.report.avg_duration);
        let _ = writeln!(out, "Total amount (USD): ${}", self.report.total_amount_usd);
        let _ = writeln!(out, "Saved {} and {}", self.output, self.report_file);
        out
    }
}

/// Label catalog and override table of the active configuration.
#[derive(Debug, Serialize)]
pub struct LabelListing {
    pub hypothesis_template: String,
    pub labels: Vec<LabelEntry>,
    pub rules: Vec<OverrideRule>,
}

impl HumanOutput for LabelListing {
    fn render_human(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Template: {}", self.hypothesis_template);
        out.push('\n');

        let _ = writeln!(out, "Labels:");
        for entry in &self.labels {
            let _ = writeln!(out, "  {:<15} {}", entry.category.as_str(), entry.hypothesis);
        }

        out.push('\n');
        let _ = writeln!(out, "Override rules:");
        if self.rules.is_empty() {
            let _ = writeln!(out, "  (none)");
        }
        for (i, rule) in self.rules.iter().enumerate() {
            let _ = writeln!(
                out,
                "  {}. {}: {} -> {} when score < {} and text contains any of {:?}",
                i + 1,
                rule.name,
                rule.from,
                rule.to,
                rule.score_threshold,
                rule.trigger_phrases
            );
        }
        out
    }
}

/// Output a result in the specified format.
pub fn output_result<T: Serialize + HumanOutput>(result: &T, args: &TriageArgs) -> Result<()> {
    match args.output_format {
        OutputFormat::Human => output_human(result, args),
        OutputFormat::Json => output_json(result),
    }
}

/// Output in human-readable format.
fn output_human<T: HumanOutput>(result: &T, args: &TriageArgs) -> Result<()> {
    if args.verbosity() > 0 {
        print!("{}", result.render_human());
    }
    Ok(())
}

/// Output in JSON format.
fn output_json<T: Serialize>(result: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(result)?);
    Ok(())
}
