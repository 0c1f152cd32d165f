//! Configuration for triage runs.
//!
//! Every value the pipeline depends on (the label catalog, the hypothesis
//! template, the override table, the worker pool size and the classifier
//! backend) lives in [`TriageConfig`]. Components receive these values at
//! construction; nothing is read from module-level state at run time, so any
//! of them can be swapped in tests. The timesheet cleaning job reads its
//! exchange rates from the `cleaning` section.
//!
//! Configuration files are JSON. Missing fields take their defaults:
//!
//! ```json
//! {
//!   "workers": 4,
//!   "classifier": { "backend": "http", "timeout_secs": 60 }
//! }
//! ```

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::catalog::{LabelCatalog, LabelEntry, default_label_entries};
use crate::classifier::{DEFAULT_LEXICAL_TEMPERATURE, HypothesisTemplate};
use crate::disambiguation::{DisambiguationRules, OverrideRule};
use crate::error::{Result, TriageError};
use crate::timesheet::CleaningConfig;

/// Default zero-shot model for hosted inference.
pub const DEFAULT_MODEL: &str = "MoritzLaurer/deberta-v3-base-zeroshot-v2.0";

/// Default hosted inference endpoint; the model id is appended as a path segment.
pub const DEFAULT_ENDPOINT: &str = "https://api-inference.huggingface.co/models";

/// Default environment variable holding the inference API token.
pub const DEFAULT_API_TOKEN_ENV: &str = "HF_API_TOKEN";

/// Which zero-shot adapter backs a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassifierBackend {
    /// Offline TF-IDF baseline.
    Lexical,
    /// Hosted zero-shot inference endpoint.
    Http,
}

/// Configuration for the classifier adapter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Adapter to use.
    pub backend: ClassifierBackend,

    /// Model identifier for hosted inference.
    pub model: String,

    /// Base URL of the inference endpoint.
    pub endpoint: String,

    /// Environment variable holding the bearer token, if any.
    pub api_token_env: Option<String>,

    /// Request timeout for hosted inference, in seconds.
    pub timeout_secs: u64,

    /// Softmax temperature of the lexical backend.
    pub temperature: f64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            backend: ClassifierBackend::Lexical,
            model: DEFAULT_MODEL.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_token_env: Some(DEFAULT_API_TOKEN_ENV.to_string()),
            timeout_secs: 30,
            temperature: DEFAULT_LEXICAL_TEMPERATURE,
        }
    }
}

impl ClassifierConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn validate(&self) -> Result<()> {
        if self.timeout_secs == 0 {
            return Err(TriageError::invalid_config("classifier timeout must be positive"));
        }
        if !self.temperature.is_finite() || self.temperature <= 0.0 {
            return Err(TriageError::invalid_config(format!(
                "classifier temperature must be positive, got {}",
                self.temperature
            )));
        }
        if self.backend == ClassifierBackend::Http {
            if self.model.trim().is_empty() {
                return Err(TriageError::invalid_config("classifier model cannot be blank"));
            }
            if self.endpoint.trim().is_empty() {
                return Err(TriageError::invalid_config("classifier endpoint cannot be blank"));
            }
        }
        Ok(())
    }
}

/// Configuration for a triage run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TriageConfig {
    /// Frame each hypothesis is rendered into before scoring.
    pub hypothesis_template: HypothesisTemplate,

    /// Ordered hypothesis descriptions and their categories.
    pub labels: Vec<LabelEntry>,

    /// Override rules, highest priority first.
    pub rules: Vec<OverrideRule>,

    /// Worker threads for ticket processing.
    /// `None` or `Some(1)` processes sequentially; `Some(0)` uses one worker per CPU core.
    pub workers: Option<usize>,

    /// Decimal places kept on reported scores.
    pub score_precision: u32,

    /// Classifier adapter settings.
    pub classifier: ClassifierConfig,

    /// Timesheet cleaning settings.
    pub cleaning: CleaningConfig,
}

impl Default for TriageConfig {
    fn default() -> Self {
        Self {
            hypothesis_template: HypothesisTemplate::default(),
            labels: default_label_entries(),
            rules: vec![OverrideRule::capability_question()],
            workers: None,
            score_precision: 4,
            classifier: ClassifierConfig::default(),
            cleaning: CleaningConfig::default(),
        }
    }
}

impl TriageConfig {
    /// Load a configuration file and validate it.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: TriageConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every section for consistency.
    pub fn validate(&self) -> Result<()> {
        self.catalog()?;
        self.disambiguation_rules()?;
        self.classifier.validate()?;
        self.cleaning.validate()?;
        if self.score_precision > 10 {
            return Err(TriageError::invalid_config(format!(
                "score precision {} is above 10 decimal places",
                self.score_precision
            )));
        }
        Ok(())
    }

    /// Build the label catalog described by `labels`.
    pub fn catalog(&self) -> Result<LabelCatalog> {
        LabelCatalog::new(self.labels.clone())
    }

    /// Build the override table described by `rules`.
    pub fn disambiguation_rules(&self) -> Result<DisambiguationRules> {
        DisambiguationRules::new(self.rules.clone())
    }

    /// Number of worker threads a run should use.
    pub fn effective_workers(&self) -> usize {
        match self.workers {
            None => 1,
            Some(0) => num_cpus::get(),
            Some(n) => n,
        }
    }
}
