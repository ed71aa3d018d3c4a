// src/collect/mod.rs
pub mod providers;
pub mod types;

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use metrics::counter;

use crate::error::CollectionError;
use crate::model::{RawDataBundle, RawDocument};
use types::DataSource;

/// Hard cap on normalized document text, in chars.
pub const MAX_TEXT_CHARS: usize = 2_000;

/// Normalize text: decode entities, strip tags, fold quotes and whitespace.
pub fn normalize_text(s: &str) -> String {
    // 1) HTML entity decode
    let mut out = html_escape::decode_html_entities(s).to_string();

    // 2) Strip HTML tags
    static RE_TAGS: once_cell::sync::OnceCell<regex::Regex> = once_cell::sync::OnceCell::new();
    let re_tags = RE_TAGS.get_or_init(|| regex::Regex::new(r"(?is)</?[^>]+>").unwrap());
    out = re_tags.replace_all(&out, "").to_string();

    // 3) Normalize “ ” ‘ ’ « » to ASCII quotes
    out = out
        .replace(['\u{201C}', '\u{201D}', '\u{00AB}', '\u{00BB}'], "\"")
        .replace(['\u{2018}', '\u{2019}'], "'");

    // 4) Collapse whitespace
    static RE_WS: once_cell::sync::OnceCell<regex::Regex> = once_cell::sync::OnceCell::new();
    let re_ws = RE_WS.get_or_init(|| regex::Regex::new(r"\s+").unwrap());
    out = re_ws.replace_all(&out, " ").trim().to_string();

    if out.chars().count() > MAX_TEXT_CHARS {
        out = out.chars().take(MAX_TEXT_CHARS).collect();
    }
    out
}

/// Stage 1: fetch every source once and stamp the run with one timestamp.
pub struct Collector {
    sources: Vec<Box<dyn DataSource>>,
}

impl Collector {
    pub fn new(sources: Vec<Box<dyn DataSource>>) -> Self {
        Self { sources }
    }

    pub async fn collect(&self) -> Result<RawDataBundle, CollectionError> {
        self.collect_at(Utc::now()).await
    }

    /// Fetch sources in order. The first failure aborts; no partial bundle.
    pub async fn collect_at(&self, now: DateTime<Utc>) -> Result<RawDataBundle, CollectionError> {
        if self.sources.is_empty() {
            tracing::error!(target: "pipeline", "collector has no sources");
            return Err(CollectionError::NoSources);
        }

        let mut by_partition: BTreeMap<String, Vec<RawDocument>> = BTreeMap::new();
        for src in &self.sources {
            let docs = match src.fetch().await {
                Ok(d) => d,
                Err(e) => {
                    tracing::error!(
                        target: "pipeline",
                        error = ?e,
                        source = src.name(),
                        partition = src.partition(),
                        "data collection failed"
                    );
                    counter!("collect_source_errors_total").increment(1);
                    return Err(CollectionError::Source {
                        source_name: src.name().to_string(),
                        partition: src.partition().to_string(),
                        source: e,
                    });
                }
            };
            tracing::debug!(
                target: "pipeline",
                source = src.name(),
                partition = src.partition(),
                documents = docs.len(),
                "source fetched"
            );
            counter!("collect_documents_total").increment(docs.len() as u64);
            by_partition
                .entry(src.partition().to_string())
                .or_default()
                .extend(docs);
        }

        let bundle = RawDataBundle::new(by_partition, now);
        tracing::info!(
            target: "pipeline",
            documents = bundle.document_count(),
            collected_at = %bundle.collected_at(),
            "collection finished"
        );
        Ok(bundle)
    }
}
