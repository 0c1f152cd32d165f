//! Hosted zero-shot inference adapter.
//!
//! Talks to a Hugging Face style inference endpoint serving a zero-shot
//! classification pipeline. Requires the `classifier-http` feature.

use std::env;
use std::time::Duration;

use log::debug;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

use crate::classifier::template::HypothesisTemplate;
use crate::classifier::types::{ClassificationResult, ScoredHypothesis};
use crate::classifier::zero_shot::ZeroShotClassifier;
use crate::config::ClassifierConfig;
use crate::error::{Result, TriageError};

/// Request body for the zero-shot pipeline.
#[derive(Debug, Serialize)]
struct ZeroShotRequest<'a> {
    /// Text to classify.
    inputs: &'a str,
    parameters: ZeroShotParameters<'a>,
}

#[derive(Debug, Serialize)]
struct ZeroShotParameters<'a> {
    candidate_labels: &'a [String],
    hypothesis_template: &'a str,
    /// Single-label mode: scores are normalized across candidates.
    multi_label: bool,
}

/// The endpoint answers in one of two shapes depending on its version.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ZeroShotResponse {
    /// `{"sequence": ..., "labels": [...], "scores": [...]}`
    Parallel { labels: Vec<String>, scores: Vec<f64> },
    /// `[{"label": ..., "score": ...}, ...]`
    Pairs(Vec<LabelScore>),
}

#[derive(Debug, Deserialize)]
struct LabelScore {
    label: String,
    score: f64,
}

impl ZeroShotResponse {
    fn into_result(self) -> Result<ClassificationResult> {
        match self {
            ZeroShotResponse::Parallel { labels, scores } => {
                ClassificationResult::from_parallel(labels, scores)
            }
            ZeroShotResponse::Pairs(pairs) => ClassificationResult::new(
                pairs
                    .into_iter()
                    .map(|p| ScoredHypothesis::new(p.label, p.score))
                    .collect(),
            ),
        }
    }
}

/// Zero-shot classifier backed by a hosted inference endpoint.
///
/// Every call is one blocking HTTP request. Transport failures, non-success
/// statuses and undecodable bodies are all reported as
/// `ClassifierUnavailable`; there is no retry.
pub struct HttpZeroShotClassifier {
    /// HTTP client for making API requests.
    client: Client,
    /// Full URL of the model endpoint.
    url: String,
    /// Model identifier, used for logging.
    model: String,
    /// Bearer token, if the endpoint needs one.
    api_token: Option<String>,
}

impl std::fmt::Debug for HttpZeroShotClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpZeroShotClassifier")
            .field("url", &self.url)
            .field("model", &self.model)
            .field("api_token", &self.api_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl HttpZeroShotClassifier {
    /// Create a classifier for `model` served under `endpoint`.
    pub fn new(
        endpoint: &str,
        model: &str,
        api_token: Option<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build().map_err(|e| {
            TriageError::classifier_unavailable(format!("failed to build HTTP client: {e}"))
        })?;

        Ok(Self {
            client,
            url: format!("{}/{}", endpoint.trim_end_matches('/'), model),
            model: model.to_string(),
            api_token,
        })
    }

    /// Create a classifier from configuration, reading the token from the
    /// configured environment variable when it is set.
    pub fn from_config(config: &ClassifierConfig) -> Result<Self> {
        let api_token = config
            .api_token_env
            .as_deref()
            .and_then(|var| env::var(var).ok())
            .filter(|t| !t.trim().is_empty());

        Self::new(&config.endpoint, &config.model, api_token, config.timeout())
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl ZeroShotClassifier for HttpZeroShotClassifier {
    fn classify(
        &self,
        message: &str,
        candidates: &[String],
        template: &HypothesisTemplate,
    ) -> Result<ClassificationResult> {
        let request = ZeroShotRequest {
            inputs: message,
            parameters: ZeroShotParameters {
                candidate_labels: candidates,
                hypothesis_template: template.as_str(),
                multi_label: false,
            },
        };

        let mut builder = self.client.post(&self.url).json(&request);
        if let Some(token) = &self.api_token {
            builder = builder.bearer_auth(token);
        }

        let http_response = builder.send().map_err(|e| {
            TriageError::classifier_unavailable(format!("zero-shot request failed: {e}"))
        })?;

        let status = http_response.status();
        let response_text = http_response.text().map_err(|e| {
            TriageError::classifier_unavailable(format!("failed to read response text: {e}"))
        })?;

        if !status.is_success() {
            return Err(TriageError::classifier_unavailable(format!(
                "zero-shot endpoint error (status {status}): {response_text}"
            )));
        }

        debug!("zero-shot response from {}: {}", self.model, response_text);
        parse_response(&response_text)
    }

    fn name(&self) -> &str {
        &self.model
    }

    fn is_reentrant(&self) -> bool {
        true
    }
}

fn parse_response(body: &str) -> Result<ClassificationResult> {
    let response: ZeroShotResponse = serde_json::from_str(body).map_err(|e| {
        TriageError::classifier_unavailable(format!(
            "failed to parse zero-shot response: {e}. Response text: {body}"
        ))
    })?;
    response.into_result()
}
