//! Lexicon-based sentiment polarity for feedback comments
//!
//! Small word-list scorer standing in for a heavier NLP model: polarity
//! is (positive hits - negative hits) / token count, clamped to [-1,1].
//! Negators directly before a sentiment word flip its sign.

use std::collections::HashSet;

use hrbrain_core::Result;
use hrbrain_rl::SentimentScorer;

const POSITIVE_WORDS: &[&str] = &[
    "amazing", "confident", "excellent", "exceptional", "fit", "good", "great", "impressive",
    "outstanding", "positive", "professional", "promising", "skilled", "solid", "strong",
    "talented",
];

const NEGATIVE_WORDS: &[&str] = &[
    "awful", "bad", "concerning", "disappointing", "inexperienced", "lacking", "mediocre",
    "negative", "poor", "rude", "terrible", "unprepared", "unprofessional", "unqualified",
    "weak", "worst",
];

const NEGATORS: &[&str] = &["no", "not", "never", "hardly", "barely"];

/// Word-list polarity scorer
#[derive(Debug, Default)]
pub struct LexiconSentiment;

impl LexiconSentiment {
    pub fn new() -> Self {
        Self
    }
}

impl SentimentScorer for LexiconSentiment {
    fn polarity(&self, text: &str) -> Result<f64> {
        let positive: HashSet<&str> = POSITIVE_WORDS.iter().copied().collect();
        let negative: HashSet<&str> = NEGATIVE_WORDS.iter().copied().collect();
        let negators: HashSet<&str> = NEGATORS.iter().copied().collect();

        let tokens: Vec<String> = text
            .split(|c: char| !c.is_alphabetic())
            .filter(|w| !w.is_empty())
            .map(str::to_lowercase)
            .collect();

        if tokens.is_empty() {
            return Ok(0.0);
        }

        let mut score = 0.0;
        for (idx, token) in tokens.iter().enumerate() {
            let weight = if positive.contains(token.as_str()) {
                1.0
            } else if negative.contains(token.as_str()) {
                -1.0
            } else {
                continue;
            };
            let negated = idx > 0 && negators.contains(tokens[idx - 1].as_str());
            score += if negated { -weight } else { weight };
        }

        Ok((score / tokens.len() as f64).clamp(-1.0, 1.0))
    }
}
