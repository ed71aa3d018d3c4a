// src/analyze/lexicon.rs
//! Baseline sentiment analyzer: word lexicon with short-range negation.

use anyhow::Result;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use std::collections::HashMap;

use super::types::SentimentAnalyzer;
use crate::model::RawDocument;

/// Lexicon weights are integers in -3..=3.
const MAX_WORD_WEIGHT: f64 = 3.0;

static LEXICON: Lazy<HashMap<String, i32>> = Lazy::new(|| {
    let raw = include_str!("../../sentiment_lexicon.json");
    serde_json::from_str::<HashMap<String, i32>>(raw).unwrap_or_else(|e| {
        tracing::error!(error = %e, "embedded sentiment lexicon is invalid; using empty lexicon");
        HashMap::new()
    })
});

#[derive(Debug, Clone, Default)]
pub struct LexiconSentimentAnalyzer;

impl LexiconSentimentAnalyzer {
    pub fn new() -> Self {
        Self
    }

    #[inline]
    fn word_score(&self, w: &str) -> i32 {
        *LEXICON.get(w).unwrap_or(&0)
    }

    /// Returns (raw score, lexicon hits).
    /// A negator within the previous 1..=3 tokens flips the word's sign.
    pub fn score_text(&self, text: &str) -> (i32, usize) {
        let tokens: Vec<String> = tokenize(text).collect();
        let mut score = 0;
        let mut hits = 0;

        for i in 0..tokens.len() {
            let base = self.word_score(tokens[i].as_str());
            if base == 0 {
                continue;
            }
            let negated = (1..=3).any(|k| i >= k && is_negator(tokens[i - k].as_str()));
            score += if negated { -base } else { base };
            hits += 1;
        }

        (score, hits)
    }

    /// Mean per-hit score scaled into [-1, 1]; 0.0 when nothing matched.
    pub fn score_document(&self, doc: &RawDocument) -> f64 {
        let joined;
        let text = if doc.title.is_empty() {
            doc.text.as_str()
        } else {
            joined = format!("{} {}", doc.title, doc.text);
            joined.as_str()
        };
        let (score, hits) = self.score_text(text);
        if hits == 0 {
            return 0.0;
        }
        (score as f64 / (hits as f64 * MAX_WORD_WEIGHT)).clamp(-1.0, 1.0)
    }
}

#[async_trait]
impl SentimentAnalyzer for LexiconSentimentAnalyzer {
    async fn analyze(&self, documents: &[RawDocument]) -> Result<Vec<f64>> {
        Ok(documents.iter().map(|d| self.score_document(d)).collect())
    }

    fn name(&self) -> &'static str {
        "lexicon"
    }
}

/// Alphanumeric tokens plus apostrophes, lower-cased.
pub(crate) fn tokenize(s: &str) -> impl Iterator<Item = String> + '_ {
    s.split(|c: char| !(c.is_alphanumeric() || c == '\''))
        .filter(|t| !t.is_empty())
        .map(|t| t.to_lowercase())
}

fn is_negator(tok: &str) -> bool {
    matches!(
        tok,
        "not"
            | "no"
            | "never"
            | "isn't"
            | "wasn't"
            | "aren't"
            | "won't"
            | "can't"
            | "cannot"
            | "without"
    )
}
