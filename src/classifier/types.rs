//! Common types for zero-shot classification.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TriageError};

/// Scores this far outside [0, 1] are treated as rounding noise and clamped.
const SCORE_TOLERANCE: f64 = 1e-6;

/// A candidate hypothesis with the confidence the classifier assigned to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredHypothesis {
    /// Hypothesis text, exactly as it appears in the candidate set.
    pub hypothesis: String,
    /// Confidence in [0, 1].
    pub score: f64,
}

impl ScoredHypothesis {
    pub fn new<S: Into<String>>(hypothesis: S, score: f64) -> Self {
        Self {
            hypothesis: hypothesis.into(),
            score,
        }
    }
}

/// Raw classifier output for one message: every candidate, best first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    ranked: Vec<ScoredHypothesis>,
}

impl ClassificationResult {
    /// Build a result from scored hypotheses in any order.
    ///
    /// The pairs are sorted by descending score; equal scores keep their
    /// input order. Fails when the list is empty or a score is not a finite
    /// value in [0, 1].
    pub fn new(mut scored: Vec<ScoredHypothesis>) -> Result<Self> {
        if scored.is_empty() {
            return Err(TriageError::invalid_classification(
                "classifier returned no hypotheses",
            ));
        }

        for entry in &mut scored {
            if !entry.score.is_finite()
                || entry.score < -SCORE_TOLERANCE
                || entry.score > 1.0 + SCORE_TOLERANCE
            {
                return Err(TriageError::invalid_classification(format!(
                    "score {} for '{}' is outside [0, 1]",
                    entry.score, entry.hypothesis
                )));
            }
            entry.score = entry.score.clamp(0.0, 1.0);
        }

        scored.sort_by(|a, b| b.score.total_cmp(&a.score));

        Ok(Self { ranked: scored })
    }

    /// Build a result from parallel label and score lists.
    pub fn from_parallel(labels: Vec<String>, scores: Vec<f64>) -> Result<Self> {
        if labels.len() != scores.len() {
            return Err(TriageError::invalid_classification(format!(
                "{} labels but {} scores",
                labels.len(),
                scores.len()
            )));
        }
        Self::new(
            labels
                .into_iter()
                .zip(scores)
                .map(|(hypothesis, score)| ScoredHypothesis { hypothesis, score })
                .collect(),
        )
    }

    /// The highest-confidence hypothesis.
    pub fn top(&self) -> &ScoredHypothesis {
        // Non-empty by construction.
        &self.ranked[0]
    }

    pub fn ranked(&self) -> &[ScoredHypothesis] {
        &self.ranked
    }

    pub fn iter(&self) -> impl Iterator<Item = &ScoredHypothesis> {
        self.ranked.iter()
    }

    pub fn len(&self) -> usize {
        self.ranked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranked.is_empty()
    }

    /// Check that the result ranks exactly the candidate set it was asked about.
    ///
    /// A hypothesis that was never a candidate is an `UnknownHypothesis`;
    /// a missing or repeated candidate is an `InvalidClassification`.
    pub fn validate_candidates(&self, candidates: &[String]) -> Result<()> {
        let expected: HashSet<&str> = candidates.iter().map(String::as_str).collect();
        let mut seen: HashSet<&str> = HashSet::with_capacity(self.ranked.len());

        for entry in &self.ranked {
            if !expected.contains(entry.hypothesis.as_str()) {
                return Err(TriageError::unknown_hypothesis(entry.hypothesis.clone()));
            }
            if !seen.insert(entry.hypothesis.as_str()) {
                return Err(TriageError::invalid_classification(format!(
                    "hypothesis '{}' ranked more than once",
                    entry.hypothesis
                )));
            }
        }

        if seen.len() != expected.len() {
            let missing: Vec<&str> = candidates
                .iter()
                .map(String::as_str)
                .filter(|c| !seen.contains(c))
                .collect();
            return Err(TriageError::invalid_classification(format!(
                "classifier did not rank: {}",
                missing.join(", ")
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidates() -> Vec<String> {
        vec!["alpha".to_string(), "beta".to_string(), "gamma".to_string()]
    }

    #[test]
    fn test_results_are_ranked_descending() {
        let result = ClassificationResult::new(vec![
            ScoredHypothesis::new("alpha", 0.1),
            ScoredHypothesis::new("beta", 0.7),
            ScoredHypothesis::new("gamma", 0.2),
        ])
        .unwrap();

        assert_eq!(result.top().hypothesis, "beta");
        let scores: Vec<f64> = result.iter().map(|s| s.score).collect();
        assert!(scores.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn test_ties_keep_input_order() {
        let result = ClassificationResult::new(vec![
            ScoredHypothesis::new("alpha", 0.5),
            ScoredHypothesis::new("beta", 0.5),
        ])
        .unwrap();
        assert_eq!(result.top().hypothesis, "alpha");
    }

    #[test]
    fn test_rejects_empty_and_out_of_range() {
        assert!(ClassificationResult::new(Vec::new()).is_err());
        assert!(ClassificationResult::new(vec![ScoredHypothesis::new("alpha", 1.5)]).is_err());
        assert!(ClassificationResult::new(vec![ScoredHypothesis::new("alpha", f64::NAN)]).is_err());

        let nudged = ClassificationResult::new(vec![ScoredHypothesis::new("alpha", 1.0 + 1e-9)])
            .unwrap();
        assert_eq!(nudged.top().score, 1.0);
    }

    #[test]
    fn test_from_parallel_length_mismatch() {
        let err = ClassificationResult::from_parallel(candidates(), vec![0.5, 0.5]).unwrap_err();
        assert!(matches!(err, TriageError::InvalidClassification(_)));
    }

    #[test]
    fn test_validate_candidates() {
        let ok = ClassificationResult::from_parallel(candidates(), vec![0.6, 0.3, 0.1]).unwrap();
        assert!(ok.validate_candidates(&candidates()).is_ok());

        let foreign = ClassificationResult::from_parallel(
            vec!["alpha".into(), "beta".into(), "delta".into()],
            vec![0.6, 0.3, 0.1],
        )
        .unwrap();
        assert!(matches!(
            foreign.validate_candidates(&candidates()),
            Err(TriageError::UnknownHypothesis(h)) if h == "delta"
        ));

        let partial =
            ClassificationResult::from_parallel(vec!["alpha".into(), "beta".into()], vec![0.6, 0.4])
                .unwrap();
        assert!(matches!(
            partial.validate_candidates(&candidates()),
            Err(TriageError::InvalidClassification(_))
        ));

        let repeated = ClassificationResult::from_parallel(
            vec!["alpha".into(), "alpha".into(), "beta".into()],
            vec![0.5, 0.3, 0.2],
        )
        .unwrap();
        assert!(repeated.validate_candidates(&candidates()).is_err());
    }
}
