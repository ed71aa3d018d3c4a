// src/validate/types.rs
use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Raw verdict as reported by the market data service. Both fields may be absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationVerdict {
    #[serde(default)]
    pub is_valid: Option<bool>,
    #[serde(default)]
    pub relevance_score: Option<f64>,
}

impl ValidationVerdict {
    pub fn valid(relevance_score: f64) -> Self {
        Self {
            is_valid: Some(true),
            relevance_score: Some(relevance_score),
        }
    }

    pub fn invalid() -> Self {
        Self {
            is_valid: Some(false),
            relevance_score: None,
        }
    }
}

#[async_trait::async_trait]
pub trait MarketDataValidator: Send + Sync {
    async fn validate(&self, topic: &str) -> Result<ValidationVerdict>;
    fn name(&self) -> &'static str;
}
