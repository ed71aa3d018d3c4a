// src/collect/types.rs
use anyhow::Result;

use crate::model::RawDocument;

/// A news or social feed. `partition` picks the bundle slot the documents land in.
#[async_trait::async_trait]
pub trait DataSource: Send + Sync {
    async fn fetch(&self) -> Result<Vec<RawDocument>>;
    fn name(&self) -> &str;
    fn partition(&self) -> &str;
}
