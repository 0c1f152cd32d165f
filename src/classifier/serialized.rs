//! Concurrency guard for adapters that are not reentrant.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::classifier::template::HypothesisTemplate;
use crate::classifier::types::ClassificationResult;
use crate::classifier::zero_shot::ZeroShotClassifier;
use crate::error::Result;

/// Wraps a shared classifier so at most one call runs at a time.
///
/// Worker threads may hold the wrapper concurrently; calls queue on an
/// internal lock and reach the inner adapter one by one.
pub struct SerializedClassifier {
    inner: Arc<dyn ZeroShotClassifier>,
    gate: Mutex<()>,
    name: String,
}

impl std::fmt::Debug for SerializedClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerializedClassifier")
            .field("inner", &self.inner.name())
            .finish()
    }
}

impl SerializedClassifier {
    pub fn new(inner: Arc<dyn ZeroShotClassifier>) -> Self {
        let name = format!("serialized({})", inner.name());
        Self {
            inner,
            gate: Mutex::new(()),
            name,
        }
    }

    /// The wrapped adapter.
    pub fn inner(&self) -> &Arc<dyn ZeroShotClassifier> {
        &self.inner
    }
}

impl ZeroShotClassifier for SerializedClassifier {
    fn classify(
        &self,
        message: &str,
        candidates: &[String],
        template: &HypothesisTemplate,
    ) -> Result<ClassificationResult> {
        let _guard = self.gate.lock();
        self.inner.classify(message, candidates, template)
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn is_reentrant(&self) -> bool {
        true
    }
}
