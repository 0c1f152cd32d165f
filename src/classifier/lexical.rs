//! Offline zero-shot baseline using TF-IDF similarity.

use log::debug;

use crate::classifier::template::HypothesisTemplate;
use crate::classifier::tfidf::TfIdfVectorizer;
use crate::classifier::types::{ClassificationResult, ScoredHypothesis};
use crate::classifier::zero_shot::ZeroShotClassifier;
use crate::error::{Result, TriageError};

/// Default softmax temperature applied to cosine similarities.
pub const DEFAULT_LEXICAL_TEMPERATURE: f64 = 0.1;

/// Lexical zero-shot classifier.
///
/// Each candidate is rendered through the hypothesis template, a TF-IDF
/// vectorizer is fitted over the rendered sentences plus the message, and the
/// cosine similarity between the message and each sentence is turned into a
/// probability with a temperature softmax. The scores of one result sum to 1,
/// matching single-label zero-shot output.
///
/// This needs no model download and is fully deterministic, which makes it
/// the default backend for offline runs and demos. It has no semantic
/// understanding beyond shared vocabulary.
#[derive(Debug, Clone)]
pub struct LexicalZeroShotClassifier {
    temperature: f64,
}

impl LexicalZeroShotClassifier {
    /// Create a classifier with the given softmax temperature.
    pub fn new(temperature: f64) -> Result<Self> {
        if !temperature.is_finite() || temperature <= 0.0 {
            return Err(TriageError::invalid_config(format!(
                "lexical classifier temperature must be positive, got {temperature}"
            )));
        }
        Ok(Self { temperature })
    }

    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    fn softmax(&self, similarities: &[f64]) -> Vec<f64> {
        let scaled: Vec<f64> = similarities.iter().map(|s| s / self.temperature).collect();
        let max = scaled.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let exps: Vec<f64> = scaled.iter().map(|s| (s - max).exp()).collect();
        let sum: f64 = exps.iter().sum();
        exps.iter().map(|e| e / sum).collect()
    }
}

impl Default for LexicalZeroShotClassifier {
    fn default() -> Self {
        Self {
            temperature: DEFAULT_LEXICAL_TEMPERATURE,
        }
    }
}

impl ZeroShotClassifier for LexicalZeroShotClassifier {
    fn classify(
        &self,
        message: &str,
        candidates: &[String],
        template: &HypothesisTemplate,
    ) -> Result<ClassificationResult> {
        if candidates.is_empty() {
            return Err(TriageError::invalid_classification(
                "no candidate hypotheses to score",
            ));
        }

        let sentences: Vec<String> = candidates.iter().map(|c| template.render(c)).collect();

        let mut documents: Vec<&str> = sentences.iter().map(String::as_str).collect();
        documents.push(message);

        let mut vectorizer = TfIdfVectorizer::new();
        vectorizer.fit(&documents);

        let message_weights = vectorizer.transform(message);
        let similarities: Vec<f64> = sentences
            .iter()
            .map(|sentence| message_weights.cosine(&vectorizer.transform(sentence)))
            .collect();

        let scores = self.softmax(&similarities);
        debug!(
            "lexical scores for '{}': {:?}",
            message,
            candidates.iter().zip(&scores).collect::<Vec<_>>()
        );

        ClassificationResult::new(
            candidates
                .iter()
                .zip(scores)
                .map(|(c, score)| ScoredHypothesis::new(c.clone(), score))
                .collect(),
        )
    }

    fn name(&self) -> &str {
        "lexical"
    }

    fn is_reentrant(&self) -> bool {
        true
    }
}
