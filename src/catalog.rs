//! Label catalog: natural-language hypotheses and the business categories
//! they stand for.
//!
//! A zero-shot classifier scores free text against descriptive sentences
//! rather than terse labels. The catalog keeps those descriptions (the
//! candidate set handed to the classifier) and resolves the winning
//! description back to one of the five [`Category`] codes.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TriageError};

/// Business category of a support ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Technical failure, crash or incorrect data.
    Bug,
    /// Billing, payment, invoice or subscription issue.
    Billing,
    /// Suggestion for a new feature or improvement.
    FeatureRequest,
    /// Usage question or account assistance.
    AccountHelp,
    /// Anything else.
    Other,
}

impl Category {
    /// Every category, in declaration order.
    pub const ALL: [Category; 5] = [
        Category::Bug,
        Category::Billing,
        Category::FeatureRequest,
        Category::AccountHelp,
        Category::Other,
    ];

    /// The short code used in reports and configuration files.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Bug => "bug",
            Category::Billing => "billing",
            Category::FeatureRequest => "feature_request",
            Category::AccountHelp => "account_help",
            Category::Other => "other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = TriageError;

    fn from_str(s: &str) -> Result<Self> {
        Category::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| TriageError::invalid_catalog(format!("unknown category code '{s}'")))
    }
}

// Categories sort by their code so summaries come out alphabetically.
impl Ord for Category {
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_str().cmp(other.as_str())
    }
}

impl PartialOrd for Category {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// One hypothesis description and the category it resolves to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelEntry {
    /// Natural-language description presented to the classifier.
    pub hypothesis: String,
    /// Category code the description resolves to.
    pub category: Category,
}

impl LabelEntry {
    pub fn new<S: Into<String>>(hypothesis: S, category: Category) -> Self {
        Self {
            hypothesis: hypothesis.into(),
            category,
        }
    }
}

/// The descriptions used in production. Their wording is part of the model
/// input and is kept verbatim, spelling included.
pub fn default_label_entries() -> Vec<LabelEntry> {
    vec![
        LabelEntry::new(
            "a technical failure, crash, error, or incorrect data",
            Category::Bug,
        ),
        LabelEntry::new(
            "a billing, payment, invoice, or subscription issue",
            Category::Billing,
        ),
        LabelEntry::new(
            "a suggestion to implement a new feature or improvement",
            Category::FeatureRequest,
        ),
        LabelEntry::new(
            "a question asking for asisstance or instructions on how to use the software or settings",
            Category::AccountHelp,
        ),
        LabelEntry::new("irrelevant text", Category::Other),
    ]
}

/// Ordered, immutable mapping from hypothesis text to category.
#[derive(Debug, Clone)]
pub struct LabelCatalog {
    entries: Vec<LabelEntry>,
    index: HashMap<String, Category>,
}

impl LabelCatalog {
    /// Build a catalog from ordered entries.
    ///
    /// Fails if a hypothesis is blank or repeated, or if any category has no
    /// hypothesis mapped to it.
    pub fn new(entries: Vec<LabelEntry>) -> Result<Self> {
        let mut index = HashMap::with_capacity(entries.len());

        for entry in &entries {
            if entry.hypothesis.trim().is_empty() {
                return Err(TriageError::invalid_catalog("hypothesis text cannot be blank"));
            }
            if index
                .insert(entry.hypothesis.clone(), entry.category)
                .is_some()
            {
                return Err(TriageError::invalid_catalog(format!(
                    "duplicate hypothesis '{}'",
                    entry.hypothesis
                )));
            }
        }

        let missing: Vec<&str> = Category::ALL
            .iter()
            .filter(|c| !entries.iter().any(|e| e.category == **c))
            .map(|c| c.as_str())
            .collect();
        if !missing.is_empty() {
            return Err(TriageError::invalid_catalog(format!(
                "no hypothesis mapped to: {}",
                missing.join(", ")
            )));
        }

        Ok(Self { entries, index })
    }

    /// The candidate set handed to the classifier, in catalog order.
    pub fn categories(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.hypothesis.clone()).collect()
    }

    /// Resolve a hypothesis text to its category.
    pub fn resolve(&self, hypothesis: &str) -> Result<Category> {
        self.index
            .get(hypothesis)
            .copied()
            .ok_or_else(|| TriageError::unknown_hypothesis(hypothesis))
    }

    /// Whether the hypothesis belongs to this catalog.
    pub fn contains(&self, hypothesis: &str) -> bool {
        self.index.contains_key(hypothesis)
    }

    /// Hypotheses that resolve to the given category.
    pub fn hypotheses_for(&self, category: Category) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|e| e.category == category)
            .map(|e| e.hypothesis.as_str())
            .collect()
    }

    pub fn entries(&self) -> &[LabelEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for LabelCatalog {
    fn default() -> Self {
        let entries = default_label_entries();
        let index = entries
            .iter()
            .map(|e| (e.hypothesis.clone(), e.category))
            .collect();
        Self { entries, index }
    }
}
