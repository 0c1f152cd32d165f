//! Ticket processing: classification, disambiguation and tallying.
//!
//! For every message, in input order, the processor asks the classifier to
//! rank the catalog's hypotheses, validates the ranking, lets the
//! disambiguation engine pick the final category and builds a
//! [`TicketRecord`]. Tickets are independent of each other, so with more
//! than one worker they are processed on a bounded rayon pool; the output is
//! still in input order and the tally is merged from per-worker partials.

use std::sync::Arc;

use log::{debug, info};
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::catalog::LabelCatalog;
use crate::classifier::{HypothesisTemplate, SerializedClassifier, ZeroShotClassifier};
use crate::config::TriageConfig;
use crate::disambiguation::{DisambiguationEngine, DisambiguationRules};
use crate::error::{Result, TriageError};
use crate::record::{CategoryTally, TicketRecord};
use crate::util::text::preview;

/// Characters of the message shown on progress lines.
const PROGRESS_PREVIEW_CHARS: usize = 60;

/// Default decimal places kept on reported scores.
pub const DEFAULT_SCORE_PRECISION: u32 = 4;

/// Records and tallies produced by one run.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessingOutcome {
    /// One record per input message, in input order.
    pub records: Vec<TicketRecord>,
    /// Count of records per final category.
    pub tally: CategoryTally,
}

/// Orchestrates classification and disambiguation for a batch of tickets.
pub struct TicketProcessor {
    classifier: Arc<dyn ZeroShotClassifier>,
    engine: DisambiguationEngine,
    template: HypothesisTemplate,
    /// Candidate hypotheses, computed once from the catalog.
    candidates: Vec<String>,
    precision: u32,
    /// Present only when more than one worker is configured.
    thread_pool: Option<Arc<ThreadPool>>,
}

impl std::fmt::Debug for TicketProcessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TicketProcessor")
            .field("classifier", &self.classifier.name())
            .field("template", &self.template.as_str())
            .field("candidates", &self.candidates.len())
            .field("rules", &self.engine.rules().len())
            .field("workers", &self.workers())
            .finish()
    }
}

impl TicketProcessor {
    /// Create a sequential processor.
    pub fn new(
        catalog: Arc<LabelCatalog>,
        classifier: Arc<dyn ZeroShotClassifier>,
        rules: DisambiguationRules,
        template: HypothesisTemplate,
    ) -> Self {
        let candidates = catalog.categories();
        Self {
            classifier,
            engine: DisambiguationEngine::new(catalog, rules),
            template,
            candidates,
            precision: DEFAULT_SCORE_PRECISION,
            thread_pool: None,
        }
    }

    /// Create a processor from a run configuration.
    pub fn from_config(config: &TriageConfig, classifier: Arc<dyn ZeroShotClassifier>) -> Result<Self> {
        config.validate()?;
        let processor = Self::new(
            Arc::new(config.catalog()?),
            classifier,
            config.disambiguation_rules()?,
            config.hypothesis_template.clone(),
        )
        .with_precision(config.score_precision);

        processor.with_workers(config.effective_workers())
    }

    /// Set the decimal places kept on reported scores.
    pub fn with_precision(mut self, precision: u32) -> Self {
        self.precision = precision;
        self
    }

    /// Process tickets on `workers` threads.
    ///
    /// With more than one worker, a classifier that does not declare itself
    /// reentrant is wrapped in a [`SerializedClassifier`].
    pub fn with_workers(mut self, workers: usize) -> Result<Self> {
        if workers <= 1 {
            self.thread_pool = None;
            return Ok(self);
        }

        let thread_pool = ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("ticket-worker-{i}"))
            .build()
            .map_err(|e| TriageError::invalid_config(format!("Failed to create thread pool: {e}")))?;

        if !self.classifier.is_reentrant() {
            debug!(
                "classifier '{}' is not reentrant, serializing calls",
                self.classifier.name()
            );
            self.classifier = Arc::new(SerializedClassifier::new(self.classifier));
        }

        self.thread_pool = Some(Arc::new(thread_pool));
        Ok(self)
    }

    pub fn workers(&self) -> usize {
        self.thread_pool
            .as_ref()
            .map(|p| p.current_num_threads())
            .unwrap_or(1)
    }

    pub fn engine(&self) -> &DisambiguationEngine {
        &self.engine
    }

    pub fn candidates(&self) -> &[String] {
        &self.candidates
    }

    /// Classify, validate and disambiguate a single message.
    pub fn process_one(&self, message: &str) -> Result<TicketRecord> {
        let result = self
            .classifier
            .classify(message, &self.candidates, &self.template)?;
        result.validate_candidates(&self.candidates)?;

        let decision = self.engine.decide(&result, message)?;
        Ok(TicketRecord::from_decision(message, decision, self.precision))
    }

    /// Process every message and tally the final categories.
    ///
    /// The first failing ticket aborts the run; no partial outcome is
    /// returned. The error carries the 1-based position of the ticket.
    pub fn process<S: AsRef<str> + Sync>(&self, messages: &[S]) -> Result<ProcessingOutcome> {
        match &self.thread_pool {
            None => self.process_sequential(messages),
            Some(pool) => self.process_parallel(pool, messages),
        }
    }

    fn process_sequential<S: AsRef<str>>(&self, messages: &[S]) -> Result<ProcessingOutcome> {
        let mut records = Vec::with_capacity(messages.len());
        let mut tally = CategoryTally::new();

        for (i, message) in messages.iter().enumerate() {
            let record = self
                .process_one(message.as_ref())
                .map_err(|e| e.at_ticket(i + 1))?;
            log_progress(i + 1, &record);
            tally.increment(record.category);
            records.push(record);
        }

        Ok(ProcessingOutcome { records, tally })
    }

    fn process_parallel<S: AsRef<str> + Sync>(
        &self,
        pool: &ThreadPool,
        messages: &[S],
    ) -> Result<ProcessingOutcome> {
        pool.install(|| {
            let records: Vec<TicketRecord> = messages
                .par_iter()
                .enumerate()
                .map(|(i, message)| {
                    self.process_one(message.as_ref())
                        .map_err(|e| e.at_ticket(i + 1))
                })
                .collect::<Result<Vec<_>>>()?;

            let tally = records
                .par_iter()
                .fold(CategoryTally::new, |mut partial, record| {
                    partial.increment(record.category);
                    partial
                })
                .reduce(CategoryTally::new, |mut merged, partial| {
                    merged.merge(&partial);
                    merged
                });

            for (i, record) in records.iter().enumerate() {
                log_progress(i + 1, record);
            }

            Ok(ProcessingOutcome { records, tally })
        })
    }
}

fn log_progress(position: usize, record: &TicketRecord) {
    info!(
        "[{:02}] {:<15} | {}...",
        position,
        record.category.as_str().to_uppercase(),
        preview(&record.text, PROGRESS_PREVIEW_CHARS)
    );
}
