// src/knowledge/mod.rs
//! Knowledge base: historical series lookups and insight persistence.

pub mod file;
pub mod memory;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::model::InsightPayload;

pub use file::FileKnowledgeBase;
pub use memory::InMemoryKnowledgeBase;

/// Key under which a topic's historical series is stored.
pub fn historical_key(topic: &str) -> String {
    format!("historical_{topic}_data")
}

/// A stored series record. Unknown fields are kept as-is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoricalData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revenue_growth: Option<Vec<f64>>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl HistoricalData {
    pub fn with_revenue_growth(series: Vec<f64>) -> Self {
        Self {
            revenue_growth: Some(series),
            extra: serde_json::Map::new(),
        }
    }
}

#[async_trait::async_trait]
pub trait KnowledgeBase: Send + Sync {
    /// `Ok(None)` when nothing is stored under `key`.
    async fn query(&self, key: &str) -> Result<Option<HistoricalData>>;
    async fn update(&self, insights: &InsightPayload) -> Result<()>;
}
