//! Zero-shot classification adapters.
//!
//! The triage pipeline treats the zero-shot model as an external capability:
//! given a message, a set of candidate hypotheses and a hypothesis template,
//! it returns every candidate ranked by confidence. Everything downstream
//! depends only on the [`ZeroShotClassifier`] trait, so any model satisfying
//! that contract is interchangeable.
//!
//! # Architecture
//!
//! - `ZeroShotClassifier` trait: Common interface for all adapters
//! - `LexicalZeroShotClassifier`: Offline TF-IDF baseline, deterministic
//! - `HttpZeroShotClassifier`: Hosted inference endpoint (`classifier-http` feature)
//! - `SerializedClassifier`: Concurrency limit of one around a shared adapter
//! - `HypothesisTemplate`: Sentence frame each hypothesis is rendered into
//! - `ClassificationResult`: Ranked hypotheses returned by an adapter
//!
//! # Example
//!
//! ```rust
//! use ticket_triage::catalog::LabelCatalog;
//! use ticket_triage::classifier::{HypothesisTemplate, LexicalZeroShotClassifier, ZeroShotClassifier};
//!
//! # fn main() -> ticket_triage::error::Result<()> {
//! let catalog = LabelCatalog::default();
//! let classifier = LexicalZeroShotClassifier::default();
//! let template = HypothesisTemplate::default();
//!
//! let result = classifier.classify(
//!     "Billing failed again, my credit card keeps getting declined.",
//!     &catalog.categories(),
//!     &template,
//! )?;
//! println!("{} ({:.4})", result.top().hypothesis, result.top().score);
//! # Ok(())
//! # }
//! ```

mod factory;
#[cfg(feature = "classifier-http")]
mod http;
mod lexical;
mod serialized;
mod template;
mod tfidf;
mod types;
mod zero_shot;

// Public exports
pub use factory::build_classifier;
#[cfg(feature = "classifier-http")]
pub use http::HttpZeroShotClassifier;
pub use lexical::{DEFAULT_LEXICAL_TEMPERATURE, LexicalZeroShotClassifier};
pub use serialized::SerializedClassifier;
pub use template::{DEFAULT_HYPOTHESIS_TEMPLATE, HypothesisTemplate};
pub use tfidf::{SparseWeights, TfIdfVectorizer};
pub use types::{ClassificationResult, ScoredHypothesis};
pub use zero_shot::ZeroShotClassifier;
