//! Error types for the ticket-triage library.
//!
//! All errors are represented by the [`TriageError`] enum. The variants map
//! onto the failure modes of a triage run: the classifier cannot be reached,
//! the classifier returns something outside its contract, or the
//! configuration handed to a component is inconsistent.
//!
//! # Examples
//!
//! ```
//! use ticket_triage::error::{Result, TriageError};
//!
//! fn load_model() -> Result<()> {
//!     Err(TriageError::classifier_unavailable("model weights not found"))
//! }
//!
//! match load_model() {
//!     Ok(_) => println!("Loaded"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::io;

use thiserror::Error;

/// The main error type for triage operations.
#[derive(Error, Debug)]
pub enum TriageError {
    /// I/O errors (input files, output files)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The zero-shot classifier could not be loaded or invoked
    #[error("Classifier unavailable: {0}")]
    ClassifierUnavailable(String),

    /// The classifier returned a hypothesis that is not in the label catalog
    #[error("Unknown hypothesis: {0}")]
    UnknownHypothesis(String),

    /// The classifier returned a result that violates its ranking contract
    #[error("Invalid classification: {0}")]
    InvalidClassification(String),

    /// Label catalog construction errors
    #[error("Invalid catalog: {0}")]
    InvalidCatalog(String),

    /// Configuration errors (rules, templates, worker pools)
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A failure while processing one ticket of a run
    #[error("Ticket #{index} failed: {source}")]
    Processing {
        /// 1-based position of the ticket in the input.
        index: usize,
        #[source]
        source: Box<TriageError>,
    },

    /// Timesheet cleaning errors (malformed rows, unparseable timestamps)
    #[error("Timesheet error: {0}")]
    Timesheet(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV reading/writing errors
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Generic error for other cases
    #[error("Error: {0}")]
    Other(String),

    /// Generic anyhow error
    #[error("Anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

/// Result type alias for operations that may fail with TriageError.
pub type Result<T> = std::result::Result<T, TriageError>;

impl TriageError {
    /// Create a new classifier unavailable error.
    pub fn classifier_unavailable<S: Into<String>>(msg: S) -> Self {
        TriageError::ClassifierUnavailable(msg.into())
    }

    /// Create a new unknown hypothesis error.
    pub fn unknown_hypothesis<S: Into<String>>(hypothesis: S) -> Self {
        TriageError::UnknownHypothesis(hypothesis.into())
    }

    /// Create a new invalid classification error.
    pub fn invalid_classification<S: Into<String>>(msg: S) -> Self {
        TriageError::InvalidClassification(msg.into())
    }

    /// Create a new invalid catalog error.
    pub fn invalid_catalog<S: Into<String>>(msg: S) -> Self {
        TriageError::InvalidCatalog(msg.into())
    }

    /// Create a new invalid config error.
    pub fn invalid_config<S: Into<String>>(msg: S) -> Self {
        TriageError::InvalidConfig(msg.into())
    }

    /// Create a new timesheet error.
    pub fn timesheet<S: Into<String>>(msg: S) -> Self {
        TriageError::Timesheet(msg.into())
    }

    /// Create a new generic error.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        TriageError::Other(msg.into())
    }

    /// Wrap an error with the 1-based position of the ticket that caused it.
    pub fn at_ticket(self, index: usize) -> Self {
        TriageError::Processing {
            index,
            source: Box::new(self),
        }
    }

    /// Whether this error means the classification capability itself failed.
    pub fn is_classifier_failure(&self) -> bool {
        match self {
            TriageError::ClassifierUnavailable(_) => true,
            TriageError::Processing { source, .. } => source.is_classifier_failure(),
            _ => false,
        }
    }
}
