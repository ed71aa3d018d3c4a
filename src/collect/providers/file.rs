// src/collect/providers/file.rs
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::PathBuf;

use crate::collect::normalize_text;
use crate::collect::types::DataSource;
use crate::model::RawDocument;

/// Reads a JSON array of documents from disk. Used for offline runs and replays.
pub struct FileSource {
    path: PathBuf,
    partition: String,
    name: String,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>, partition: impl Into<String>) -> Self {
        let path = path.into();
        let name = format!("file:{}", path.display());
        Self {
            path,
            partition: partition.into(),
            name,
        }
    }
}

#[async_trait]
impl DataSource for FileSource {
    async fn fetch(&self) -> Result<Vec<RawDocument>> {
        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("reading documents from {}", self.path.display()))?;
        let mut docs: Vec<RawDocument> = serde_json::from_str(&raw)
            .with_context(|| format!("parsing documents in {}", self.path.display()))?;
        for d in docs.iter_mut() {
            d.text = normalize_text(&d.text);
        }
        Ok(docs)
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn partition(&self) -> &str {
        &self.partition
    }
}
