// src/analyze/types.rs
use anyhow::Result;

use crate::model::RawDocument;

/// Extracts an ordered list of topic labels from a document set.
#[async_trait::async_trait]
pub trait TopicModeler: Send + Sync {
    async fn extract_topics(&self, documents: &[RawDocument]) -> Result<Vec<String>>;
    fn name(&self) -> &'static str;
}

/// Scores a document set; the output runs parallel to its input.
#[async_trait::async_trait]
pub trait SentimentAnalyzer: Send + Sync {
    async fn analyze(&self, documents: &[RawDocument]) -> Result<Vec<f64>>;
    fn name(&self) -> &'static str;
}
