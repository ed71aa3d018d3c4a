// src/knowledge/memory.rs
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use super::{historical_key, HistoricalData, KnowledgeBase};
use crate::model::InsightPayload;

/// Process-local knowledge base. Handy for tests and dry runs.
#[derive(Debug, Default)]
pub struct InMemoryKnowledgeBase {
    series: Mutex<HashMap<String, HistoricalData>>,
    insights: Mutex<Vec<InsightPayload>>,
}

impl InMemoryKnowledgeBase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a revenue-growth series for `topic` under its historical key.
    pub fn with_series(self, topic: &str, revenue_growth: Vec<f64>) -> Self {
        self.insert(
            historical_key(topic),
            HistoricalData::with_revenue_growth(revenue_growth),
        );
        self
    }

    pub fn insert(&self, key: impl Into<String>, data: HistoricalData) {
        self.series
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key.into(), data);
    }

    pub fn insights(&self) -> Vec<InsightPayload> {
        self.insights
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

#[async_trait]
impl KnowledgeBase for InMemoryKnowledgeBase {
    async fn query(&self, key: &str) -> Result<Option<HistoricalData>> {
        let guard = self
            .series
            .lock()
            .map_err(|_| anyhow!("knowledge base mutex poisoned"))?;
        Ok(guard.get(key).cloned())
    }

    async fn update(&self, insights: &InsightPayload) -> Result<()> {
        self.insights
            .lock()
            .map_err(|_| anyhow!("knowledge base mutex poisoned"))?
            .push(insights.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[tokio::test]
    async fn query_hits_and_misses() {
        let kb = InMemoryKnowledgeBase::new().with_series("ai", vec![0.2, 0.4]);
        let hit = kb.query("historical_ai_data").await.unwrap().unwrap();
        assert_eq!(hit.revenue_growth, Some(vec![0.2, 0.4]));
        assert!(kb.query("historical_crypto_data").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn update_appends_payloads() {
        let kb = InMemoryKnowledgeBase::new();
        let p = InsightPayload {
            emerging_trends: vec![],
            timestamp: Utc::now(),
            recommendations: vec![],
        };
        kb.update(&p).await.unwrap();
        kb.update(&p).await.unwrap();
        assert_eq!(kb.insights().len(), 2);
    }
}
