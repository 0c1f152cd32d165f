//! Ticket input: line-delimited message files with a built-in fallback.

use std::fs;
use std::io;
use std::path::Path;

use log::warn;

use crate::error::Result;

/// Default line-delimited input file.
pub const DEFAULT_INPUT_FILE: &str = "messages.txt";

/// Messages used when no input file is available.
pub const SAMPLE_MESSAGES: [&str; 20] = [
    "The app is not tracking my time on Android anymore.",
    "I would like to upgrade my plan from Free to Pro.",
    "How can I export all my timesheets to Excel?",
    "Billing failed again, my credit card keeps getting declined.",
    "I forgot my password and cannot log in.",
    "The web dashboard is very slow when loading reports.",
    "Can you add an integration with Microsoft Teams?",
    "I want to change the owner of our workspace.",
    "The mobile app crashes every time I try to clock in.",
    "How do I invite new members to my organization?",
    "We were charged twice this month, please check our invoice.",
    "Is there a way to track time offline and sync later?",
    "Please add dark mode to the web app.",
    "I need help updating our company billing address.",
    "The GPS location is inaccurate when my team clocks in.",
    "Can I limit which devices employees are allowed to clock in from?",
    "Our data export is missing some projects.",
    "I'd like to request a feature to approve timesheets before payroll.",
    "My account was deactivated and I don't know why.",
    "We need an option to automatically round time entries to 15 minutes.",
];

/// Where a run's messages came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageSource {
    /// Read from the given file.
    File(String),
    /// The built-in sample set.
    BuiltIn,
}

/// Messages ready for processing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedMessages {
    pub messages: Vec<String>,
    pub source: MessageSource,
}

/// Parse line-delimited text: each line trimmed, blank lines dropped.
pub fn parse_messages(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// The built-in sample messages.
pub fn sample_messages() -> Vec<String> {
    SAMPLE_MESSAGES.iter().map(|m| m.to_string()).collect()
}

/// Load messages from `path`.
///
/// Falls back to [`SAMPLE_MESSAGES`] when the file does not exist or holds no
/// non-blank line. Any other I/O failure is returned.
pub fn load_messages<P: AsRef<Path>>(path: P) -> Result<LoadedMessages> {
    let path = path.as_ref();

    match fs::read_to_string(path) {
        Ok(content) => {
            let messages = parse_messages(&content);
            if messages.is_empty() {
                warn!(
                    "File {} has no messages, using built-in messages.",
                    path.display()
                );
                return Ok(built_in());
            }
            Ok(LoadedMessages {
                messages,
                source: MessageSource::File(path.display().to_string()),
            })
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            warn!("File {} not found, using built-in messages.", path.display());
            Ok(built_in())
        }
        Err(e) => Err(e.into()),
    }
}

fn built_in() -> LoadedMessages {
    LoadedMessages {
        messages: sample_messages(),
        source: MessageSource::BuiltIn,
    }
}
