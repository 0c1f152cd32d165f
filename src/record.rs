//! Per-ticket results and per-category tallies.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::catalog::Category;
use crate::disambiguation::Decision;
use crate::util::text::round_to;

/// The final decision for one input message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TicketRecord {
    /// Original message text.
    pub text: String,
    /// Final category after disambiguation.
    pub category: Category,
    /// Score of the top-ranked hypothesis, already rounded.
    pub score: f64,
    /// Hypothesis that produced the pre-override category.
    #[serde(rename = "ai_logic")]
    pub underlying_hypothesis: String,
}

impl TicketRecord {
    /// Build a record from a decision, rounding the score to `precision` places.
    pub fn from_decision(text: impl Into<String>, decision: Decision, precision: u32) -> Self {
        Self {
            text: text.into(),
            category: decision.category,
            score: round_to(decision.score, precision),
            underlying_hypothesis: decision.hypothesis,
        }
    }
}

/// Count of tickets per final category.
///
/// Every category is present from construction, so categories nobody hit
/// still report zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryTally {
    counts: BTreeMap<Category, usize>,
}

impl CategoryTally {
    pub fn new() -> Self {
        Self {
            counts: Category::ALL.iter().map(|c| (*c, 0)).collect(),
        }
    }

    /// Tally a list of records.
    pub fn from_records<'a, I: IntoIterator<Item = &'a TicketRecord>>(records: I) -> Self {
        let mut tally = Self::new();
        for record in records {
            tally.increment(record.category);
        }
        tally
    }

    pub fn increment(&mut self, category: Category) {
        *self.counts.entry(category).or_insert(0) += 1;
    }

    /// Add another tally's counts into this one.
    pub fn merge(&mut self, other: &CategoryTally) {
        for (category, count) in &other.counts {
            *self.counts.entry(*category).or_insert(0) += count;
        }
    }

    pub fn get(&self, category: Category) -> usize {
        self.counts.get(&category).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    /// Counts sorted by category code.
    pub fn iter(&self) -> impl Iterator<Item = (Category, usize)> + '_ {
        self.counts.iter().map(|(c, n)| (*c, *n))
    }
}

impl Default for CategoryTally {
    fn default() -> Self {
        Self::new()
    }
}
