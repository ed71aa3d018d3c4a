// src/knowledge/file.rs
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use tokio::{fs, sync::Mutex};

use super::{HistoricalData, KnowledgeBase};
use crate::model::InsightPayload;

/// On-disk layout of the JSON store.
#[derive(Debug, Default, Serialize, Deserialize)]
struct Store {
    #[serde(default)]
    series: BTreeMap<String, HistoricalData>,
    #[serde(default)]
    insights: Vec<InsightPayload>,
}

/// Single JSON file holding historical series and every persisted insight.
/// A missing file reads as an empty store.
pub struct FileKnowledgeBase {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileKnowledgeBase {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    async fn load(&self) -> Result<Store> {
        match fs::read_to_string(&self.path).await {
            Ok(s) => serde_json::from_str(&s)
                .with_context(|| format!("parsing knowledge base {}", self.path.display())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Store::default()),
            Err(e) => Err(e)
                .with_context(|| format!("reading knowledge base {}", self.path.display())),
        }
    }

    /// Write via a temp file + rename so readers never see a torn file.
    async fn save(&self, store: &Store) -> Result<()> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)
                .await
                .with_context(|| format!("creating {}", dir.display()))?;
        }
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(store)?)
            .await
            .with_context(|| format!("writing {}", tmp.display()))?;
        fs::rename(&tmp, &self.path)
            .await
            .with_context(|| format!("replacing {}", self.path.display()))?;
        Ok(())
    }
}

#[async_trait]
impl KnowledgeBase for FileKnowledgeBase {
    async fn query(&self, key: &str) -> Result<Option<HistoricalData>> {
        let store = self.load().await?;
        Ok(store.series.get(key).cloned())
    }

    async fn update(&self, insights: &InsightPayload) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut store = self.load().await?;
        store.insights.push(insights.clone());
        self.save(&store).await?;
        tracing::debug!(
            target: "pipeline",
            path = %self.path.display(),
            stored = store.insights.len(),
            "insights persisted"
        );
        Ok(())
    }
}
