//! Zero-shot classifier trait definition.

use std::sync::Arc;

use crate::classifier::template::HypothesisTemplate;
use crate::classifier::types::ClassificationResult;
use crate::error::Result;

/// Zero-shot classifier trait.
///
/// Implementations score a message against every candidate hypothesis and
/// return them ranked by confidence. Calls are independent and synchronous:
/// an adapter performs no caching, batching or retries.
pub trait ZeroShotClassifier: Send + Sync {
    /// Rank `candidates` for `message`.
    ///
    /// # Arguments
    /// * `message` - The ticket text to classify
    /// * `candidates` - Hypothesis texts to score; all of them are returned
    /// * `template` - Frame each hypothesis is rendered into before scoring
    ///
    /// # Errors
    /// `ClassifierUnavailable` if the underlying model cannot be loaded or invoked.
    fn classify(
        &self,
        message: &str,
        candidates: &[String],
        template: &HypothesisTemplate,
    ) -> Result<ClassificationResult>;

    /// Get the name of this classifier for debugging and logging.
    fn name(&self) -> &str;

    /// Whether concurrent calls on one shared instance are safe.
    ///
    /// Adapters that return `false` are serialized before being shared
    /// across worker threads.
    fn is_reentrant(&self) -> bool {
        false
    }
}

impl<C: ZeroShotClassifier + ?Sized> ZeroShotClassifier for Arc<C> {
    fn classify(
        &self,
        message: &str,
        candidates: &[String],
        template: &HypothesisTemplate,
    ) -> Result<ClassificationResult> {
        (**self).classify(message, candidates, template)
    }

    fn name(&self) -> &str {
        (**self).name()
    }

    fn is_reentrant(&self) -> bool {
        (**self).is_reentrant()
    }
}
