use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim, WriterBuilder};
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::error::{Result, TriageError};
use crate::timesheet::device::Device;
use crate::timesheet::entry::{CleanEntry, RawEntry, non_blank, parse_timestamp};
use crate::util::text::round_to;

/// Default output path of the cleaned entries.
pub const DEFAULT_CLEAN_OUTPUT: &str = "clean_entries.csv";

/// Default output path of the cleaning report.
pub const DEFAULT_REPORT_OUTPUT: &str = "report.json";

const CLEAN_COLUMNS: [&str; 6] = [
    "user_id",
    "organization_id",
    "date",
    "duration_minutes",
    "device",
    "amount_usd",
];

/// Settings for the cleaning job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CleaningConfig {
    /// USD value of one unit of each currency, keyed by upper-case code.
    pub exchange_rates: BTreeMap<String, f64>,

    /// Rate applied to currencies missing from `exchange_rates`.
    pub default_rate: f64,
}

impl Default for CleaningConfig {
    fn default() -> Self {
        let exchange_rates = [("USD", 1.0), ("MYR", 0.22), ("PHP", 0.018), ("PKR", 0.0036)]
            .into_iter()
            .map(|(code, rate)| (code.to_string(), rate))
            .collect();

        Self {
            exchange_rates,
            default_rate: 1.0,
        }
    }
}

impl CleaningConfig {
    pub fn validate(&self) -> Result<()> {
        for (code, rate) in &self.exchange_rates {
            if code.trim().is_empty() {
                return Err(TriageError::invalid_config("currency code cannot be blank"));
            }
            if !rate.is_finite() || *rate < 0.0 {
                return Err(TriageError::invalid_config(format!(
                    "exchange rate for {code} must be a non-negative number, got {rate}"
                )));
            }
        }
        if !self.default_rate.is_finite() || self.default_rate < 0.0 {
            return Err(TriageError::invalid_config(format!(
                "default exchange rate must be a non-negative number, got {}",
                self.default_rate
            )));
        }
        Ok(())
    }

    /// USD rate of `currency`, case-insensitive, falling back to `default_rate`.
    pub fn rate(&self, currency: Option<&str>) -> f64 {
        currency
            .map(|code| code.trim().to_uppercase())
            .and_then(|code| self.exchange_rates.get(&code).copied())
            .unwrap_or(self.default_rate)
    }
}

/// Summary written next to the cleaned entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleaningReport {
    /// Rows read from the input, including dropped ones.
    pub total_entries: usize,
    /// Rows kept after cleaning.
    pub clean_entries: usize,
    /// Mean duration in minutes, 0 when nothing was kept.
    pub avg_duration: f64,
    pub total_amount_usd: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CleaningOutcome {
    pub entries: Vec<CleanEntry>,
    pub report: CleaningReport,
}

/// Cleans raw timesheet exports.
#[derive(Debug, Clone, Default)]
pub struct TimesheetCleaner {
    config: CleaningConfig,
}

impl TimesheetCleaner {
    pub fn new(config: CleaningConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &CleaningConfig {
        &self.config
    }

    /// Clean one raw entry read from CSV line `line`.
    ///
    /// Returns `None` for entries without a clock-in or clock-out.
    pub fn clean_entry(&self, raw: RawEntry, line: u64) -> Result<Option<CleanEntry>> {
        let (Some(time_in), Some(time_out)) = (non_blank(&raw.time_in), non_blank(&raw.time_out))
        else {
            debug!("line {line}: missing time_in or time_out, dropped");
            return Ok(None);
        };

        let started = parse_timestamp(time_in).ok_or_else(|| {
            TriageError::timesheet(format!("line {line}: unparseable time_in '{time_in}'"))
        })?;
        let ended = parse_timestamp(time_out).ok_or_else(|| {
            TriageError::timesheet(format!("line {line}: unparseable time_out '{time_out}'"))
        })?;

        let amount = raw
            .amount
            .ok_or_else(|| TriageError::timesheet(format!("line {line}: missing amount")))?;

        let minutes = (ended - started).num_milliseconds() as f64 / 60_000.0;
        let rate = self.config.rate(non_blank(&raw.currency));

        Ok(Some(CleanEntry {
            user_id: raw.user_id,
            organization_id: raw.organization_id,
            date: started.date_naive(),
            duration_minutes: round_to(minutes, 2),
            device: Device::normalize(non_blank(&raw.device)),
            amount_usd: round_to(amount * rate, 2),
        }))
    }

    /// Clean every entry of a CSV stream.
    pub fn clean_reader<R: Read>(&self, input: R) -> Result<CleaningOutcome> {
        let mut reader = ReaderBuilder::new().trim(Trim::All).from_reader(input);
        let headers = reader.headers()?.clone();

        let mut total_entries = 0;
        let mut entries = Vec::new();
        let mut record = StringRecord::new();

        while reader.read_record(&mut record)? {
            total_entries += 1;
            let line = record.position().map(|p| p.line()).unwrap_or(0);
            let raw: RawEntry = record.deserialize(Some(&headers))?;
            if let Some(entry) = self.clean_entry(raw, line)? {
                entries.push(entry);
            }
        }

        let report = summarize(total_entries, &entries);
        Ok(CleaningOutcome { entries, report })
    }

    /// Clean the CSV file at `path`.
    pub fn clean_file<P: AsRef<Path>>(&self, path: P) -> Result<CleaningOutcome> {
        let file = File::open(path.as_ref())?;
        self.clean_reader(BufReader::new(file))
    }

    /// Clean `input`, writing the cleaned CSV and the JSON report.
    pub fn run<P, Q, R>(&self, input: P, output: Q, report_path: R) -> Result<CleaningReport>
    where
        P: AsRef<Path>,
        Q: AsRef<Path>,
        R: AsRef<Path>,
    {
        info!("Reading {}", input.as_ref().display());
        let outcome = self.clean_file(input)?;
        info!("Total entries loaded: {}", outcome.report.total_entries);

        info!("Saving {}", output.as_ref().display());
        write_entries(&outcome.entries, BufWriter::new(File::create(output.as_ref())?))?;

        info!("Saving {}", report_path.as_ref().display());
        write_report(&outcome.report, BufWriter::new(File::create(report_path.as_ref())?))?;

        Ok(outcome.report)
    }
}

fn summarize(total_entries: usize, entries: &[CleanEntry]) -> CleaningReport {
    let clean_entries = entries.len();
    let avg_duration = if clean_entries == 0 {
        0.0
    } else {
        entries.iter().map(|e| e.duration_minutes).sum::<f64>() / clean_entries as f64
    };
    let total_amount_usd: f64 = entries.iter().map(|e| e.amount_usd).sum();

    CleaningReport {
        total_entries,
        clean_entries,
        avg_duration: round_to(avg_duration, 2),
        total_amount_usd: round_to(total_amount_usd, 2),
    }
}

/// Write cleaned entries as CSV. The header is written even with no entries.
pub fn write_entries<W: Write>(entries: &[CleanEntry], writer: W) -> Result<()> {
    let mut writer = WriterBuilder::new().has_headers(false).from_writer(writer);
    writer.write_record(CLEAN_COLUMNS)?;
    for entry in entries {
        writer.serialize(entry)?;
    }
    writer.flush()?;
    Ok(())
}

/// Write the report as pretty-printed JSON.
pub fn write_report<W: Write>(report: &CleaningReport, mut writer: W) -> Result<()> {
    serde_json::to_writer_pretty(&mut writer, report)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "user_id,organization_id,time_in,time_out,device,currency,amount\n";

    fn clean(rows: &str) -> Result<CleaningOutcome> {
        let csv = format!("{HEADER}{rows}");
        TimesheetCleaner::default().clean_reader(csv.as_bytes())
    }

    #[test]
    fn test_cleans_entries() {
        let outcome = clean(
            "u1,o1,2024-01-15 09:00:00,2024-01-15 10:30:00,desktop,MYR,100\n\
             u2,o1,2024-01-16 08:00,2024-01-16 08:20,iOS,USD,12.5\n",
        )
        .unwrap();

        assert_eq!(outcome.entries.len(), 2);
        let first = &outcome.entries[0];
        assert_eq!(first.device, Device::Web);
        assert_eq!(first.duration_minutes, 90.0);
        assert_eq!(first.amount_usd, 22.0);
        assert_eq!(first.date.to_string(), "2024-01-15");

        let second = &outcome.entries[1];
        assert_eq!(second.device, Device::Ios);
        assert_eq!(second.duration_minutes, 20.0);
        assert_eq!(second.amount_usd, 12.5);

        assert_eq!(outcome.report.total_entries, 2);
        assert_eq!(outcome.report.clean_entries, 2);
        assert_eq!(outcome.report.avg_duration, 55.0);
        assert_eq!(outcome.report.total_amount_usd, 34.5);
    }

    #[test]
    fn test_drops_missing_times() {
        let outcome = clean(
            "u1,o1,,2024-01-15 10:30:00,web,USD,10\n\
             u2,o1,2024-01-15 09:00:00,,web,USD,10\n\
             u3,o1,2024-01-15 09:00:00,2024-01-15 09:10:00,web,USD,10\n",
        )
        .unwrap();

        assert_eq!(outcome.report.total_entries, 3);
        assert_eq!(outcome.report.clean_entries, 1);
        assert_eq!(outcome.entries[0].user_id, "u3");
    }

    #[test]
    fn test_unknown_currency_uses_default_rate() {
        let outcome = clean("u1,o1,2024-01-15 09:00,2024-01-15 09:01,tablet,EUR,7.456\n").unwrap();
        assert_eq!(outcome.entries[0].amount_usd, 7.46);
        assert_eq!(outcome.entries[0].device, Device::Mobile);

        let outcome = clean("u1,o1,2024-01-15 09:00,2024-01-15 09:01,web,pkr,1000\n").unwrap();
        assert_eq!(outcome.entries[0].amount_usd, 3.6);
    }

    #[test]
    fn test_fractional_minutes() {
        let outcome = clean("u1,o1,2024-01-15 09:00:00,2024-01-15 09:00:20,web,USD,1\n").unwrap();
        assert_eq!(outcome.entries[0].duration_minutes, 0.33);
    }

    #[test]
    fn test_unparseable_timestamp_names_line() {
        let err = clean(
            "u1,o1,2024-01-15 09:00,2024-01-15 09:10,web,USD,1\n\
             u2,o1,not a time,2024-01-15 09:10,web,USD,1\n",
        )
        .unwrap_err();

        assert!(matches!(err, TriageError::Timesheet(_)));
        assert!(err.to_string().contains("line 3"));
    }

    #[test]
    fn test_empty_input_report() {
        let outcome = clean("").unwrap();
        assert_eq!(outcome.report.total_entries, 0);
        assert_eq!(outcome.report.avg_duration, 0.0);

        let mut buf = Vec::new();
        write_entries(&outcome.entries, &mut buf).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "user_id,organization_id,date,duration_minutes,device,amount_usd\n"
        );
    }

    #[test]
    fn test_invalid_rates_rejected() {
        let mut config = CleaningConfig::default();
        config.exchange_rates.insert("EUR".to_string(), f64::NAN);
        assert!(TimesheetCleaner::new(config).is_err());

        let config = CleaningConfig {
            default_rate: -1.0,
            ..Default::default()
        };
        assert!(TimesheetCleaner::new(config).is_err());
    }

    #[test]
    fn test_run_writes_files() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("entries.csv");
        let output = dir.path().join("clean_entries.csv");
        let report_path = dir.path().join("report.json");
        std::fs::write(
            &input,
            format!("{HEADER}u1,o1,2024-01-15 09:00,2024-01-15 09:45,ANDROID,PHP,1000\n"),
        )
        .unwrap();

        let report = TimesheetCleaner::default()
            .run(&input, &output, &report_path)
            .unwrap();
        assert_eq!(report.total_amount_usd, 18.0);

        let written = std::fs::read_to_string(&output).unwrap();
        let mut lines = written.lines();
        assert_eq!(
            lines.next(),
            Some("user_id,organization_id,date,duration_minutes,device,amount_usd")
        );
        assert_eq!(lines.next(), Some("u1,o1,2024-01-15,45.0,ANDROID,18.0"));

        let parsed: CleaningReport =
            serde_json::from_str(&std::fs::read_to_string(&report_path).unwrap()).unwrap();
        assert_eq!(parsed, report);
    }
}
