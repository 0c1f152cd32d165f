//! Deterministic disambiguation of zero-shot decisions.
//!
//! The zero-shot model reliably confuses capability questions ("Can I limit
//! which devices...") with feature requests. The engine corrects this with a
//! table of lexical override rules applied to the top-ranked hypothesis:
//!
//! 1. `top = result[0]`, `category = catalog.resolve(top.hypothesis)`
//! 2. rules are tried in priority order; the first rule whose source category
//!    matches, whose threshold is strictly above the top score, and whose
//!    trigger phrases occur in the lowercased message replaces the category
//! 3. the decision reports the original top score and hypothesis, whatever
//!    the final category is
//!
//! The engine holds no mutable state: the same result and message always
//! produce the same [`Decision`].

use std::sync::Arc;

use log::info;
use serde::{Deserialize, Serialize};

use crate::catalog::{Category, LabelCatalog};
use crate::classifier::ClassificationResult;
use crate::error::{Result, TriageError};
use crate::util::text::preview;

/// Characters of the message shown when a re-route is logged.
const REROUTE_PREVIEW_CHARS: usize = 20;

/// A confidence-gated lexical override.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverrideRule {
    /// Identifier used in logs.
    pub name: String,
    /// Category the rule applies to.
    pub from: Category,
    /// Category assigned when the rule fires.
    pub to: Category,
    /// The rule only fires when the top score is strictly below this value.
    pub score_threshold: f64,
    /// Case-insensitive substrings, matched as written including spaces;
    /// any one of them triggers the rule.
    pub trigger_phrases: Vec<String>,
}

impl OverrideRule {
    /// Low-confidence feature requests phrased as capability questions are
    /// usage questions.
    pub fn capability_question() -> Self {
        Self {
            name: "capability-question".to_string(),
            from: Category::FeatureRequest,
            to: Category::AccountHelp,
            score_threshold: 0.8,
            trigger_phrases: vec![
                "how can i".to_string(),
                "how do i".to_string(),
                "can i".to_string(),
            ],
        }
    }

    fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(TriageError::invalid_config("override rule name cannot be blank"));
        }
        if self.from == self.to {
            return Err(TriageError::invalid_config(format!(
                "rule '{}' maps {} onto itself",
                self.name, self.from
            )));
        }
        if !self.score_threshold.is_finite() || !(0.0..=1.0).contains(&self.score_threshold) {
            return Err(TriageError::invalid_config(format!(
                "rule '{}' threshold {} is outside [0, 1]",
                self.name, self.score_threshold
            )));
        }
        if self.trigger_phrases.is_empty() {
            return Err(TriageError::invalid_config(format!(
                "rule '{}' has no trigger phrases",
                self.name
            )));
        }
        if self.trigger_phrases.iter().any(|p| p.trim().is_empty()) {
            return Err(TriageError::invalid_config(format!(
                "rule '{}' has a blank trigger phrase",
                self.name
            )));
        }
        Ok(())
    }
}

/// A validated rule with its triggers lowercased once.
#[derive(Debug, Clone)]
struct CompiledRule {
    rule: OverrideRule,
    triggers: Vec<String>,
}

impl CompiledRule {
    fn matches(&self, category: Category, score: f64, lowered_message: &str) -> bool {
        category == self.rule.from
            && score < self.rule.score_threshold
            && self.triggers.iter().any(|t| lowered_message.contains(t.as_str()))
    }
}

/// Ordered override rules, highest priority first.
#[derive(Debug, Clone)]
pub struct DisambiguationRules {
    rules: Vec<CompiledRule>,
}

impl DisambiguationRules {
    pub fn new(rules: Vec<OverrideRule>) -> Result<Self> {
        let mut compiled = Vec::with_capacity(rules.len());
        for rule in rules {
            rule.validate()?;
            let triggers = rule
                .trigger_phrases
                .iter()
                .map(|p| p.to_lowercase())
                .collect();
            compiled.push(CompiledRule { rule, triggers });
        }
        Ok(Self { rules: compiled })
    }

    /// A table with no rules; every decision passes through unchanged.
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    pub fn rules(&self) -> impl Iterator<Item = &OverrideRule> {
        self.rules.iter().map(|c| &c.rule)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// First rule that fires for the given top category, score and message.
    pub fn find(&self, category: Category, score: f64, message: &str) -> Option<&OverrideRule> {
        if self.rules.is_empty() {
            return None;
        }
        let lowered = message.to_lowercase();
        self.rules
            .iter()
            .find(|c| c.matches(category, score, &lowered))
            .map(|c| &c.rule)
    }
}

impl Default for DisambiguationRules {
    fn default() -> Self {
        let rule = OverrideRule::capability_question();
        let triggers = rule.trigger_phrases.clone();
        Self {
            rules: vec![CompiledRule { rule, triggers }],
        }
    }
}

/// The final decision for one message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    /// Final category after overrides.
    pub category: Category,
    /// Score of the original top-ranked hypothesis.
    pub score: f64,
    /// The original top-ranked hypothesis.
    pub hypothesis: String,
    /// Category the top hypothesis resolved to before overrides.
    pub original_category: Category,
    /// Name of the rule that changed the category, if any.
    pub applied_rule: Option<String>,
}

impl Decision {
    pub fn is_overridden(&self) -> bool {
        self.applied_rule.is_some()
    }
}

/// Applies the label catalog and the override table to classifier output.
#[derive(Debug, Clone)]
pub struct DisambiguationEngine {
    catalog: Arc<LabelCatalog>,
    rules: DisambiguationRules,
}

impl DisambiguationEngine {
    pub fn new(catalog: Arc<LabelCatalog>, rules: DisambiguationRules) -> Self {
        Self { catalog, rules }
    }

    pub fn catalog(&self) -> &Arc<LabelCatalog> {
        &self.catalog
    }

    pub fn rules(&self) -> &DisambiguationRules {
        &self.rules
    }

    /// Decide the final category for `message` from its classification.
    ///
    /// # Errors
    /// `UnknownHypothesis` if the top hypothesis is not in the catalog.
    pub fn decide(&self, result: &ClassificationResult, message: &str) -> Result<Decision> {
        let top = result.top();
        let original_category = self.catalog.resolve(&top.hypothesis)?;

        let (category, applied_rule) =
            match self.rules.find(original_category, top.score, message) {
                Some(rule) => {
                    info!(
                        "   -> Re-routing '{}...' from {} to {} ({})",
                        preview(message, REROUTE_PREVIEW_CHARS),
                        rule.from,
                        rule.to,
                        rule.name
                    );
                    (rule.to, Some(rule.name.clone()))
                }
                None => (original_category, None),
            };

        Ok(Decision {
            category,
            score: top.score,
            hypothesis: top.hypothesis.clone(),
            original_category,
            applied_rule,
        })
    }
}

impl Default for DisambiguationEngine {
    fn default() -> Self {
        Self::new(Arc::new(LabelCatalog::default()), DisambiguationRules::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::ScoredHypothesis;

    const FEATURE: &str = "a suggestion to implement a new feature or improvement";
    const BILLING: &str = "a billing, payment, invoice, or subscription issue";
    const BUG: &str = "a technical failure, crash, error, or incorrect data";

    fn result_with_top(hypothesis: &str, score: f64) -> ClassificationResult {
        let catalog = LabelCatalog::default();
        let rest = (1.0 - score) / (catalog.len() as f64 - 1.0);
        ClassificationResult::new(
            catalog
                .categories()
                .into_iter()
                .map(|h| {
                    let s = if h == hypothesis { score } else { rest.min(score / 2.0) };
                    ScoredHypothesis::new(h, s)
                })
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_low_confidence_capability_question_rerouted() {
        let engine = DisambiguationEngine::default();
        let message = "Can I export all my timesheets to Excel?";

        let decision = engine.decide(&result_with_top(FEATURE, 0.62), message).unwrap();
        assert_eq!(decision.category, Category::AccountHelp);
        assert_eq!(decision.original_category, Category::FeatureRequest);
        assert_eq!(decision.applied_rule.as_deref(), Some("capability-question"));

        // Confidence metadata is that of the original top pair.
        assert_eq!(decision.score, 0.62);
        assert_eq!(decision.hypothesis, FEATURE);
    }

    #[test]
    fn test_confident_feature_request_kept() {
        let engine = DisambiguationEngine::default();
        let message = "Can I export all my timesheets to Excel?";

        let decision = engine.decide(&result_with_top(FEATURE, 0.85), message).unwrap();
        assert_eq!(decision.category, Category::FeatureRequest);
        assert!(!decision.is_overridden());
    }

    #[test]
    fn test_threshold_is_strict() {
        let engine = DisambiguationEngine::default();
        let decision = engine
            .decide(&result_with_top(FEATURE, 0.8), "how do i add a user?")
            .unwrap();
        assert_eq!(decision.category, Category::FeatureRequest);

        let decision = engine
            .decide(&result_with_top(FEATURE, 0.799_999), "how do i add a user?")
            .unwrap();
        assert_eq!(decision.category, Category::AccountHelp);
    }

    #[test]
    fn test_no_trigger_no_override() {
        let engine = DisambiguationEngine::default();
        let decision = engine
            .decide(&result_with_top(FEATURE, 0.3), "Please add dark mode to the web app.")
            .unwrap();
        assert_eq!(decision.category, Category::FeatureRequest);
    }

    #[test]
    fn test_other_categories_never_overridden() {
        let engine = DisambiguationEngine::default();

        let decision = engine
            .decide(
                &result_with_top(BILLING, 0.93),
                "Billing failed again, my credit card keeps getting declined.",
            )
            .unwrap();
        assert_eq!(decision.category, Category::Billing);

        let decision = engine
            .decide(&result_with_top(BUG, 0.3), "Can I stop the app crashing?")
            .unwrap();
        assert_eq!(decision.category, Category::Bug);
    }

    #[test]
    fn test_trigger_is_case_insensitive_substring() {
        let engine = DisambiguationEngine::default();
        for message in ["CAN I do this?", "Scan images", "how Do I invite people"] {
            let decision = engine.decide(&result_with_top(FEATURE, 0.5), message).unwrap();
            assert_eq!(decision.category, Category::AccountHelp, "{message}");
        }
    }

    #[test]
    fn test_trigger_whitespace_is_literal() {
        let rule = OverrideRule {
            trigger_phrases: vec![" Can I".to_string()],
            ..OverrideRule::capability_question()
        };
        let rules = DisambiguationRules::new(vec![rule]).unwrap();
        let engine = DisambiguationEngine::new(Arc::new(LabelCatalog::default()), rules);

        let decision = engine
            .decide(&result_with_top(FEATURE, 0.5), "Scan images please")
            .unwrap();
        assert_eq!(decision.category, Category::FeatureRequest);

        let decision = engine
            .decide(&result_with_top(FEATURE, 0.5), "Tell me, can i export?")
            .unwrap();
        assert_eq!(decision.category, Category::AccountHelp);
    }

    #[test]
    fn test_unknown_top_hypothesis() {
        let engine = DisambiguationEngine::default();
        let result =
            ClassificationResult::new(vec![ScoredHypothesis::new("a weather report", 0.9)])
                .unwrap();
        assert!(matches!(
            engine.decide(&result, "sunny"),
            Err(TriageError::UnknownHypothesis(_))
        ));
    }

    #[test]
    fn test_rules_evaluated_in_priority_order() {
        let first = OverrideRule {
            name: "export-is-bug".to_string(),
            from: Category::FeatureRequest,
            to: Category::Bug,
            score_threshold: 0.9,
            trigger_phrases: vec!["EXPORT".to_string()],
        };
        let rules =
            DisambiguationRules::new(vec![first, OverrideRule::capability_question()]).unwrap();
        let engine = DisambiguationEngine::new(Arc::new(LabelCatalog::default()), rules);

        let decision = engine
            .decide(
                &result_with_top(FEATURE, 0.5),
                "Can I export all my timesheets to Excel?",
            )
            .unwrap();
        assert_eq!(decision.category, Category::Bug);
        assert_eq!(decision.applied_rule.as_deref(), Some("export-is-bug"));
    }

    #[test]
    fn test_empty_rules_pass_through() {
        let engine =
            DisambiguationEngine::new(Arc::new(LabelCatalog::default()), DisambiguationRules::empty());
        let decision = engine
            .decide(&result_with_top(FEATURE, 0.1), "can i?")
            .unwrap();
        assert_eq!(decision.category, Category::FeatureRequest);
    }

    #[test]
    fn test_rule_validation() {
        let mut rule = OverrideRule::capability_question();
        rule.score_threshold = 1.2;
        assert!(DisambiguationRules::new(vec![rule]).is_err());

        let mut rule = OverrideRule::capability_question();
        rule.to = Category::FeatureRequest;
        assert!(DisambiguationRules::new(vec![rule]).is_err());

        let mut rule = OverrideRule::capability_question();
        rule.trigger_phrases = vec!["  ".to_string()];
        assert!(DisambiguationRules::new(vec![rule]).is_err());

        let mut rule = OverrideRule::capability_question();
        rule.trigger_phrases.push(String::new());
        assert!(DisambiguationRules::new(vec![rule]).is_err());

        let mut rule = OverrideRule::capability_question();
        rule.trigger_phrases.clear();
        assert!(DisambiguationRules::new(vec![rule]).is_err());

        let default_rules = DisambiguationRules::new(vec![OverrideRule::capability_question()]).unwrap();
        assert_eq!(default_rules.len(), DisambiguationRules::default().len());
    }
}
