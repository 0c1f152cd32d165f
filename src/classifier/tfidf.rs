//! Sparse TF-IDF weighting over a small document set.

use std::collections::HashMap;

use unicode_segmentation::UnicodeSegmentation;

/// Function words that carry no intent signal.
const STOP_WORDS: &[&str] = &[
    "a", "about", "all", "an", "and", "are", "as", "at", "be", "by", "for", "from", "i", "in",
    "is", "it", "its", "me", "my", "of", "on", "or", "our", "so", "that", "the", "this", "to",
    "us", "was", "we", "with", "you", "your",
];

/// Term weights of one document, sorted by term id and L2-normalized.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseWeights(Vec<(usize, f64)>);

impl SparseWeights {
    /// Dot product of two normalized weight vectors, i.e. their cosine similarity.
    pub fn cosine(&self, other: &SparseWeights) -> f64 {
        let (mut i, mut j) = (0, 0);
        let mut dot = 0.0;
        while i < self.0.len() && j < other.0.len() {
            let (a_term, a_weight) = self.0[i];
            let (b_term, b_weight) = other.0[j];
            match a_term.cmp(&b_term) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    dot += a_weight * b_weight;
                    i += 1;
                    j += 1;
                }
            }
        }
        dot
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

/// TF-IDF weighting fitted on a fixed document set.
///
/// Tokens are lowercased Unicode words with stop words removed and a light
/// suffix strip applied, so "crashes" and "crash" share a term. Term ids
/// follow first occurrence, which keeps results identical across runs.
#[derive(Debug, Clone, Default)]
pub struct TfIdfVectorizer {
    term_ids: HashMap<String, usize>,
    /// Smoothed inverse document frequency, indexed by term id.
    idf: Vec<f64>,
    n_documents: usize,
}

impl TfIdfVectorizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Learn the vocabulary and document frequencies of `documents`.
    pub fn fit<S: AsRef<str>>(&mut self, documents: &[S]) {
        self.term_ids.clear();
        self.n_documents = documents.len();
        let mut document_frequency: Vec<usize> = Vec::new();

        for (doc_id, doc) in documents.iter().enumerate() {
            // Last document id that counted each term, so repeats inside one document count once.
            let mut last_seen: HashMap<usize, usize> = HashMap::new();
            for token in tokenize(doc.as_ref()) {
                let next_id = self.term_ids.len();
                let id = *self.term_ids.entry(token).or_insert(next_id);
                if id == document_frequency.len() {
                    document_frequency.push(0);
                }
                if last_seen.insert(id, doc_id) != Some(doc_id) {
                    document_frequency[id] += 1;
                }
            }
        }

        let n = self.n_documents as f64;
        self.idf = document_frequency
            .into_iter()
            .map(|df| ((n + 1.0) / (df as f64 + 1.0)).ln() + 1.0)
            .collect();
    }

    /// Weight `document` against the fitted vocabulary. Unknown terms are ignored.
    pub fn transform(&self, document: &str) -> SparseWeights {
        let mut counts: HashMap<usize, f64> = HashMap::new();
        for token in tokenize(document) {
            if let Some(&id) = self.term_ids.get(&token) {
                *counts.entry(id).or_insert(0.0) += 1.0;
            }
        }

        let mut weights: Vec<(usize, f64)> = counts
            .into_iter()
            .map(|(id, tf)| (id, tf * self.idf[id]))
            .collect();
        weights.sort_unstable_by_key(|(id, _)| *id);

        let norm = weights.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
        if norm > 0.0 {
            for (_, w) in &mut weights {
                *w /= norm;
            }
        }

        SparseWeights(weights)
    }

    pub fn vocabulary_size(&self) -> usize {
        self.term_ids.len()
    }

    pub fn n_documents(&self) -> usize {
        self.n_documents
    }
}

/// Split text into normalized terms.
pub fn tokenize(text: &str) -> Vec<String> {
    text.unicode_words()
        .map(str::to_lowercase)
        .filter(|w| !STOP_WORDS.contains(&w.as_str()))
        .map(|w| stem(&w))
        .collect()
}

fn stem(word: &str) -> String {
    let n = word.chars().count();
    for (suffix, min_len) in [("ing", 6), ("es", 5), ("ed", 5), ("s", 4)] {
        if n >= min_len
            && let Some(stripped) = word.strip_suffix(suffix)
        {
            return stripped.to_string();
        }
    }
    word.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_counts_documents_once_per_term() {
        let mut vectorizer = TfIdfVectorizer::new();
        vectorizer.fit(&["crash crash crash", "crash billing", "invoice"]);

        assert_eq!(vectorizer.n_documents(), 3);
        assert_eq!(vectorizer.vocabulary_size(), 3);
        // "crash" is in two of three documents, "invoice" in one.
        assert!(vectorizer.idf[0] < vectorizer.idf[2]);
    }

    #[test]
    fn test_transform_is_normalized() {
        let mut vectorizer = TfIdfVectorizer::new();
        vectorizer.fit(&["export timesheets excel", "invite members"]);

        let weights = vectorizer.transform("export my timesheets to excel please");
        assert_eq!(weights.len(), 3);
        assert!((weights.cosine(&weights) - 1.0).abs() < 1e-12);

        assert!(vectorizer.transform("nothing known here").is_empty());
    }

    #[test]
    fn test_cosine() {
        let mut vectorizer = TfIdfVectorizer::new();
        vectorizer.fit(&["app crash", "billing invoice", "app crash billing"]);

        let crash = vectorizer.transform("app crash");
        let billing = vectorizer.transform("billing invoice");
        let mixed = vectorizer.transform("app crash billing");

        assert_eq!(crash.cosine(&billing), 0.0);
        assert!(crash.cosine(&mixed) > 0.0);
        assert!(crash.cosine(&mixed) < 1.0);
        assert_eq!(crash.cosine(&SparseWeights::default()), 0.0);
    }

    #[test]
    fn test_tokenize_normalizes() {
        assert_eq!(
            tokenize("The app CRASHES when I clock in"),
            vec!["app", "crash", "when", "clock"]
        );
        assert_eq!(tokenize("billing"), vec!["bill"]);
        assert!(tokenize("").is_empty());
    }
}
