// src/model.rs
//! Records handed between pipeline stages. Each stage owns what it produces
//! until it passes the value on to the next one.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Partition holding news articles (input to the topic modeler).
pub const NEWS_PARTITION: &str = "news";
/// Partition holding social posts (input to the sentiment analyzer).
pub const SOCIAL_PARTITION: &str = "social";

/// One fetched article or post, text already normalized.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RawDocument {
    pub source: String, // e.g. "newsapi", "x-recent"
    #[serde(default)]
    pub title: String,
    pub text: String,
    pub url: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
}

impl RawDocument {
    pub fn new(source: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            title: String::new(),
            text: text.into(),
            url: None,
            published_at: None,
        }
    }
}

/// Snapshot of one collection run. Immutable once built.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RawDataBundle {
    documents_by_source: BTreeMap<String, Vec<RawDocument>>,
    collected_at: DateTime<Utc>,
}

impl RawDataBundle {
    pub fn new(
        documents_by_source: BTreeMap<String, Vec<RawDocument>>,
        collected_at: DateTime<Utc>,
    ) -> Self {
        Self {
            documents_by_source,
            collected_at,
        }
    }

    pub fn partition(&self, name: &str) -> Option<&[RawDocument]> {
        self.documents_by_source.get(name).map(Vec::as_slice)
    }

    pub fn document_count(&self) -> usize {
        self.documents_by_source.values().map(Vec::len).sum()
    }

    pub fn collected_at(&self) -> DateTime<Utc> {
        self.collected_at
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrendRecord {
    pub topic: String,
    pub sentiment_score: f64,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationStatus {
    Valid,
}

/// A trend the market data validator accepted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ValidatedRecord {
    #[serde(flatten)]
    pub trend: TrendRecord,
    pub validation_status: ValidationStatus,
    /// Relevance in [0,1] as reported by the validator.
    pub market_relevance_score: f64,
}

impl ValidatedRecord {
    pub fn new(trend: TrendRecord, market_relevance_score: f64) -> Self {
        Self {
            trend,
            validation_status: ValidationStatus::Valid,
            market_relevance_score,
        }
    }

    pub fn topic(&self) -> &str {
        &self.trend.topic
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationType {
    Entry,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecommendationRecord {
    pub trend: String,
    pub recommendation_type: RecommendationType,
    pub feasibility_score: f64,
}

/// Terminal artifact: persisted to the knowledge base and published.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InsightPayload {
    pub emerging_trends: Vec<String>,
    pub timestamp: DateTime<Utc>,
    pub recommendations: Vec<RecommendationRecord>,
}
