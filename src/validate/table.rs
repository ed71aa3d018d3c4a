// src/validate/table.rs
use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;

use super::types::{MarketDataValidator, ValidationVerdict};

/// Fixed topic → relevance table. Listed topics are valid; anything else is not.
/// Lookup ignores ASCII case.
#[derive(Debug, Clone, Default)]
pub struct TableMarketValidator {
    relevance: HashMap<String, f64>,
}

impl TableMarketValidator {
    pub fn new<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, f64)>,
        K: AsRef<str>,
    {
        Self {
            relevance: entries
                .into_iter()
                .map(|(k, v)| (k.as_ref().to_ascii_lowercase(), v))
                .collect(),
        }
    }
}

#[async_trait]
impl MarketDataValidator for TableMarketValidator {
    async fn validate(&self, topic: &str) -> Result<ValidationVerdict> {
        Ok(match self.relevance.get(&topic.to_ascii_lowercase()) {
            Some(&score) => ValidationVerdict::valid(score),
            None => ValidationVerdict::invalid(),
        })
    }

    fn name(&self) -> &'static str {
        "table"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn listed_topics_are_valid() {
        let t = TableMarketValidator::new([("AI", 0.9), ("ev", 0.4)]);
        assert_eq!(t.validate("ai").await.unwrap(), ValidationVerdict::valid(0.9));
        assert_eq!(t.validate("crypto").await.unwrap(), ValidationVerdict::invalid());
    }
}
