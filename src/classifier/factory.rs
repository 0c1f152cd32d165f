//! Helper functions for creating zero-shot classifiers.

use std::sync::Arc;

use log::info;

use crate::classifier::lexical::LexicalZeroShotClassifier;
use crate::classifier::zero_shot::ZeroShotClassifier;
use crate::config::{ClassifierBackend, ClassifierConfig};
use crate::error::Result;

/// Create the classifier adapter described by `config`.
///
/// # Errors
/// `ClassifierUnavailable` if the backend cannot be initialized, including
/// the hosted backend on builds without the `classifier-http` feature.
pub fn build_classifier(config: &ClassifierConfig) -> Result<Arc<dyn ZeroShotClassifier>> {
    config.validate()?;

    match config.backend {
        ClassifierBackend::Lexical => {
            info!(
                "Using lexical zero-shot baseline (temperature {})",
                config.temperature
            );
            Ok(Arc::new(LexicalZeroShotClassifier::new(config.temperature)?))
        }
        ClassifierBackend::Http => build_http(config),
    }
}

#[cfg(feature = "classifier-http")]
fn build_http(config: &ClassifierConfig) -> Result<Arc<dyn ZeroShotClassifier>> {
    use crate::classifier::http::HttpZeroShotClassifier;

    info!("Loading zero-shot model via {}", config.endpoint);
    info!("Using: {}", config.model);
    Ok(Arc::new(HttpZeroShotClassifier::from_config(config)?))
}

#[cfg(not(feature = "classifier-http"))]
fn build_http(_config: &ClassifierConfig) -> Result<Arc<dyn ZeroShotClassifier>> {
    Err(crate::error::TriageError::classifier_unavailable(
        "the http backend requires building with the `classifier-http` feature",
    ))
}
