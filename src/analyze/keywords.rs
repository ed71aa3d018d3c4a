// src/analyze/keywords.rs
//! Baseline topic modeler: ranks keywords by how many documents mention them.

use anyhow::Result;
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};

use super::lexicon::tokenize;
use super::types::TopicModeler;
use crate::model::RawDocument;

const MIN_TOKEN_CHARS: usize = 3;

static STOPWORDS: &[&str] = &[
    "the", "and", "for", "are", "but", "not", "you", "all", "any", "can", "had", "her", "was",
    "one", "our", "out", "has", "have", "his", "how", "its", "may", "new", "now", "old", "see",
    "two", "who", "did", "get", "let", "say", "she", "too", "use", "that", "with", "this", "from",
    "they", "will", "would", "there", "their", "what", "about", "which", "when", "were", "been",
    "into", "than", "them", "then", "more", "some", "such", "only", "over", "also", "after",
    "says", "said", "could", "should", "while", "where", "just", "like", "amid", "year", "week",
];

#[derive(Debug, Clone)]
pub struct KeywordTopicModeler {
    top_k: usize,
}

impl KeywordTopicModeler {
    pub fn new(top_k: usize) -> Self {
        Self { top_k: top_k.max(1) }
    }

    /// Document frequency per keyword, ties broken by first appearance.
    pub fn rank(&self, documents: &[RawDocument]) -> Vec<String> {
        let stop: HashSet<&str> = STOPWORDS.iter().copied().collect();
        let mut df: HashMap<String, (usize, usize)> = HashMap::new();
        let mut order = 0usize;

        for doc in documents {
            let mut seen = HashSet::new();
            for tok in tokenize(&doc.title).chain(tokenize(&doc.text)) {
                let tok = tok.trim_matches('\'').to_string();
                if tok.chars().count() < MIN_TOKEN_CHARS
                    || stop.contains(tok.as_str())
                    || tok.chars().all(|c| c.is_ascii_digit())
                {
                    continue;
                }
                if !seen.insert(tok.clone()) {
                    continue;
                }
                let entry = df.entry(tok).or_insert_with(|| {
                    order += 1;
                    (0, order)
                });
                entry.0 += 1;
            }
        }

        let mut ranked: Vec<(String, (usize, usize))> = df.into_iter().collect();
        ranked.sort_by(|a, b| b.1 .0.cmp(&a.1 .0).then(a.1 .1.cmp(&b.1 .1)));
        ranked
            .into_iter()
            .take(self.top_k)
            .map(|(k, _)| k)
            .collect()
    }
}

#[async_trait]
impl TopicModeler for KeywordTopicModeler {
    async fn extract_topics(&self, documents: &[RawDocument]) -> Result<Vec<String>> {
        Ok(self.rank(documents))
    }

    fn name(&self) -> &'static str {
        "keywords"
    }
}
