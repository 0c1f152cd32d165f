//! Hypothesis templates.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TriageError};

/// Frame used in production. The wording is part of the model input and
/// changes the scores, so it is kept verbatim.
pub const DEFAULT_HYPOTHESIS_TEMPLATE: &str = "The user is asking about {}.";

const SLOT: &str = "{}";

/// A sentence frame with exactly one `{}` slot.
///
/// Each candidate hypothesis is rendered into the frame before it is
/// presented to the model, e.g. `"The user is asking about {}."` turns
/// `"irrelevant text"` into `"The user is asking about irrelevant text."`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HypothesisTemplate(String);

impl HypothesisTemplate {
    pub fn new<S: Into<String>>(frame: S) -> Result<Self> {
        let frame = frame.into();
        match frame.matches(SLOT).count() {
            1 => Ok(Self(frame)),
            n => Err(TriageError::invalid_config(format!(
                "hypothesis template must contain exactly one '{{}}' slot, found {n}: '{frame}'"
            ))),
        }
    }

    /// Substitute a hypothesis into the slot.
    pub fn render(&self, hypothesis: &str) -> String {
        self.0.replacen(SLOT, hypothesis, 1)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for HypothesisTemplate {
    fn default() -> Self {
        Self(DEFAULT_HYPOTHESIS_TEMPLATE.to_string())
    }
}

impl fmt::Display for HypothesisTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for HypothesisTemplate {
    type Error = TriageError;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl From<HypothesisTemplate> for String {
    fn from(value: HypothesisTemplate) -> Self {
        value.0
    }
}
