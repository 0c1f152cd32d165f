//! Report emitter: JSON records and the human summary.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;

use crate::catalog::Category;
use crate::error::Result;
use crate::record::{CategoryTally, TicketRecord};

const RULE: &str = "==================================================";

/// Serializable result of a triage run.
///
/// Scores are taken from the records as they are; the emitter never rounds
/// again.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    /// Every record, in input order.
    pub records: Vec<TicketRecord>,
    /// Per-category counts, sorted by category code.
    pub summary: Vec<SummaryLine>,
}

/// One line of the category summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryLine {
    pub category: Category,
    pub count: usize,
}

impl Report {
    /// Build a report from a run's records and tally.
    pub fn emit(records: Vec<TicketRecord>, tally: &CategoryTally) -> Self {
        let mut summary: Vec<SummaryLine> = tally
            .iter()
            .map(|(category, count)| SummaryLine { category, count })
            .collect();
        summary.sort_by(|a, b| a.category.cmp(&b.category));

        Self { records, summary }
    }

    /// Write the record array as pretty-printed JSON.
    ///
    /// Non-ASCII text is written as UTF-8, not escaped.
    pub fn write_json<W: Write>(&self, mut writer: W) -> Result<()> {
        serde_json::to_writer_pretty(&mut writer, &self.records)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(())
    }

    /// Write the record array to a file, replacing it if it exists.
    pub fn write_json_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path.as_ref())?;
        self.write_json(BufWriter::new(file))
    }

    /// The record array as a JSON string.
    pub fn records_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.records)?)
    }

    /// The summary as a `{category: count}` JSON object.
    pub fn summary_json(&self) -> serde_json::Value {
        let map: serde_json::Map<String, serde_json::Value> = self
            .summary
            .iter()
            .map(|line| (line.category.to_string(), line.count.into()))
            .collect();
        serde_json::Value::Object(map)
    }

    /// The framed summary block printed at the end of a run.
    pub fn render_summary(&self) -> String {
        let mut out = String::new();
        out.push_str(RULE);
        out.push('\n');
        out.push_str("CLASSIFICATION SUMMARY\n");
        out.push_str(RULE);
        out.push('\n');
        for line in &self.summary {
            out.push_str(&format!("{}: {}\n", line.category, line.count));
        }
        out.push_str(RULE);
        out.push('\n');
        out
    }

    pub fn total(&self) -> usize {
        self.records.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Report {
        let records = vec![
            TicketRecord {
                text: "Billing failed again, my credit card keeps getting declined.".to_string(),
                category: Category::Billing,
                score: 0.93,
                underlying_hypothesis: "a billing, payment, invoice, or subscription issue"
                    .to_string(),
            },
            TicketRecord {
                text: "La aplicación se bloquea… ¿pueden ayudar? 日本語".to_string(),
                category: Category::Bug,
                score: 0.4321,
                underlying_hypothesis: "a technical failure, crash, error, or incorrect data"
                    .to_string(),
            },
        ];
        let tally = CategoryTally::from_records(&records);
        Report::emit(records, &tally)
    }

    #[test]
    fn test_summary_sorted_with_zeros() {
        let report = sample();
        assert_eq!(
            report.render_summary(),
            format!(
                "{RULE}\nCLASSIFICATION SUMMARY\n{RULE}\naccount_help: 0\nbilling: 1\nbug: 1\nfeature_request: 0\nother: 0\n{RULE}\n"
            )
        );
        assert_eq!(report.summary_json()["billing"], 1);
        assert_eq!(report.summary_json()["other"], 0);
    }

    #[test]
    fn test_json_preserves_unicode_and_scores() {
        let report = sample();
        let mut buf = Vec::new();
        report.write_json(&mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();

        assert!(text.contains("La aplicación se bloquea… ¿pueden ayudar? 日本語"));
        assert!(!text.contains("\\u"));
        assert!(text.contains("\"score\": 0.4321"));
        assert!(text.contains("\"ai_logic\": \"a billing, payment, invoice, or subscription issue\""));

        let parsed: Vec<TicketRecord> = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, report.records);

        assert_eq!(report.records_json().unwrap(), text.trim_end());
    }

    #[test]
    fn test_write_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("classified_local.json");
        sample().write_json_file(&path).unwrap();

        let parsed: Vec<serde_json::Value> =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0]["category"], "billing");
    }
}
