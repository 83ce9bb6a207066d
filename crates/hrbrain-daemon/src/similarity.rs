//! TF-IDF similarity between candidate skills and job descriptions
//!
//! Baseline lexical scorer: cleaned alphabetic tokens minus stopwords,
//! smoothed inverse document frequencies fitted once over the profile
//! corpus, cosine between weighted term vectors. Scores land in [0,1].

use std::collections::{HashMap, HashSet};

use tracing::debug;

use hrbrain_core::{HrBrainError, Result};
use hrbrain_rl::MatchScorer;

/// Common English words that carry no matching signal
const STOPWORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "been", "but", "by", "for", "from", "has", "have",
    "he", "her", "his", "i", "in", "is", "it", "its", "of", "on", "or", "our", "she", "that",
    "the", "their", "them", "they", "this", "to", "was", "we", "were", "will", "with", "you",
    "your",
];

/// Lowercase, strip non-alphabetic characters, drop stopwords
pub fn tokenize(text: &str) -> Vec<String> {
    let stopwords: HashSet<&str> = STOPWORDS.iter().copied().collect();
    text.split(|c: char| !c.is_alphabetic())
        .filter_map(|word| {
            let word = word.to_lowercase();
            if word.is_empty() || stopwords.contains(word.as_str()) {
                None
            } else {
                Some(word)
            }
        })
        .collect()
}

/// TF-IDF match scorer fitted over the profile corpus at startup
pub struct TfIdfScorer {
    idf: HashMap<String, f64>,
    doc_count: usize,
}

impl TfIdfScorer {
    /// Fit document frequencies over the given corpus. Smoothed idf
    /// (`ln((1+n)/(1+df)) + 1`) keeps unseen terms finite.
    pub fn fit<S: AsRef<str>>(corpus: &[S]) -> Self {
        let doc_count = corpus.len();
        let mut document_frequency: HashMap<String, usize> = HashMap::new();

        for doc in corpus {
            let unique: HashSet<String> = tokenize(doc.as_ref()).into_iter().collect();
            for token in unique {
                *document_frequency.entry(token).or_insert(0) += 1;
            }
        }

        let idf = document_frequency
            .into_iter()
            .map(|(token, df)| {
                let idf = ((1.0 + doc_count as f64) / (1.0 + df as f64)).ln() + 1.0;
                (token, idf)
            })
            .collect();

        debug!(documents = doc_count, "tf-idf scorer fitted");
        Self { idf, doc_count }
    }

    fn idf_for(&self, token: &str) -> f64 {
        match self.idf.get(token) {
            Some(idf) => *idf,
            // Unseen term: df = 0 under the same smoothing
            None => ((1.0 + self.doc_count as f64) / 1.0).ln() + 1.0,
        }
    }

    fn vectorize(&self, text: &str) -> HashMap<String, f64> {
        let mut term_frequency: HashMap<String, f64> = HashMap::new();
        for token in tokenize(text) {
            *term_frequency.entry(token).or_insert(0.0) += 1.0;
        }
        term_frequency
            .into_iter()
            .map(|(token, tf)| {
                let weight = tf * self.idf_for(&token);
                (token, weight)
            })
            .collect()
    }
}

fn cosine(a: &HashMap<String, f64>, b: &HashMap<String, f64>) -> f64 {
    let dot: f64 = a
        .iter()
        .filter_map(|(token, weight)| b.get(token).map(|other| weight * other))
        .sum();
    let norm_a: f64 = a.values().map(|w| w * w).sum::<f64>().sqrt();
    let norm_b: f64 = b.values().map(|w| w * w).sum::<f64>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

impl MatchScorer for TfIdfScorer {
    fn score(&self, candidate_text: &str, job_text: &str) -> Result<f64> {
        let candidate = self.vectorize(candidate_text);
        let job = self.vectorize(job_text);
        let score = cosine(&candidate, &job);
        if !score.is_finite() {
            return Err(HrBrainError::Provider(
                "similarity produced a non-finite score".to_string(),
            ));
        }
        Ok(score.clamp(0.0, 1.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fitted() -> TfIdfScorer {
        TfIdfScorer::fit(&[
            "rust backend engineer tokio axum",
            "frontend react typescript",
            "data scientist python pandas",
        ])
    }

    #[test]
    fn test_tokenize_cleans_text() {
        let tokens = tokenize("The Rust-backend engineer, with 5 years!");
        assert_eq!(tokens, vec!["rust", "backend", "engineer", "years"]);
    }

    #[test]
    fn test_identical_texts_score_high() {
        let scorer = fitted();
        let score = scorer
            .score("rust backend engineer", "rust backend engineer")
            .unwrap();
        assert!((score - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_disjoint_texts_score_zero() {
        let scorer = fitted();
        let score = scorer
            .score("rust backend tokio", "gallery curator painting")
            .unwrap();
        assert_eq!(score, 0.0);
    }

    #[test]
    fn test_partial_overlap_is_between() {
        let scorer = fitted();
        let score = scorer
            .score("rust backend engineer", "backend engineer python")
            .unwrap();
        assert!(score > 0.0 && score < 1.0, "got {score}");
    }

    #[test]
    fn test_empty_text_scores_zero() {
        let scorer = fitted();
        assert_eq!(scorer.score("", "rust backend").unwrap(), 0.0);
        assert_eq!(scorer.score("the and of", "rust").unwrap(), 0.0);
    }

    #[test]
    fn test_scores_stay_in_unit_interval() {
        let scorer = fitted();
        for (a, b) in [
            ("rust rust rust rust", "rust"),
            ("backend engineer", "backend backend engineer engineer"),
        ] {
            let score = scorer.score(a, b).unwrap();
            assert!((0.0..=1.0).contains(&score), "{a} vs {b} gave {score}");
        }
    }
}
