//! # Ticket Triage
//!
//! Zero-shot classification of support tickets into a closed set of
//! categories, with a deterministic rule table that resolves the confusions
//! the model is known to make.
//!
//! ## Features
//!
//! - Pluggable zero-shot classifiers behind one trait
//! - Offline lexical baseline, optional hosted inference backend
//! - Configurable label catalog, hypothesis template and override rules
//! - Sequential or bounded parallel processing with stable output order
//! - Timesheet cleaning batch job

pub mod catalog;
pub mod classifier;
pub mod cli;
pub mod config;
pub mod disambiguation;
pub mod error;
pub mod input;
pub mod processor;
pub mod record;
pub mod report;
pub mod timesheet;
pub mod util;

pub mod prelude {
    pub use crate::catalog::{Category, LabelCatalog, LabelEntry};
    pub use crate::classifier::{
        ClassificationResult, HypothesisTemplate, LexicalZeroShotClassifier, ScoredHypothesis,
        ZeroShotClassifier,
    };
    pub use crate::config::TriageConfig;
    pub use crate::disambiguation::{Decision, DisambiguationEngine, DisambiguationRules, OverrideRule};
    pub use crate::error::{Result, TriageError};
    pub use crate::processor::{ProcessingOutcome, TicketProcessor};
    pub use crate::record::{CategoryTally, TicketRecord};
    pub use crate::report::Report;
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
