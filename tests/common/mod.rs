// tests/common/mod.rs
// Hand-written collaborators shared by the integration tests.
#![allow(dead_code)]

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::io;
use std::sync::{Arc, Mutex};

use market_research_pipeline::analyze::types::{SentimentAnalyzer, TopicModeler};
use market_research_pipeline::analyze::Analyzer;
use market_research_pipeline::collect::types::DataSource;
use market_research_pipeline::collect::Collector;
use market_research_pipeline::insight::InsightGenerator;
use market_research_pipeline::knowledge::{HistoricalData, InMemoryKnowledgeBase, KnowledgeBase};
use market_research_pipeline::model::{
    InsightPayload, RawDocument, NEWS_PARTITION, SOCIAL_PARTITION,
};
use market_research_pipeline::publish::Publisher;
use market_research_pipeline::validate::types::{MarketDataValidator, ValidationVerdict};
use market_research_pipeline::validate::Validator;
use market_research_pipeline::Pipeline;

// ---------- sources ----------

pub struct FixedSource {
    pub partition: &'static str,
    pub docs: Vec<RawDocument>,
}

#[async_trait]
impl DataSource for FixedSource {
    async fn fetch(&self) -> Result<Vec<RawDocument>> {
        Ok(self.docs.clone())
    }
    fn name(&self) -> &str {
        "fixed"
    }
    fn partition(&self) -> &str {
        self.partition
    }
}

pub struct DownSource;

#[async_trait]
impl DataSource for DownSource {
    async fn fetch(&self) -> Result<Vec<RawDocument>> {
        Err(anyhow!("connection refused"))
    }
    fn name(&self) -> &str {
        "down"
    }
    fn partition(&self) -> &str {
        SOCIAL_PARTITION
    }
}

/// News + social sources with one document each.
pub fn both_partitions() -> Vec<Box<dyn DataSource>> {
    vec![
        Box::new(FixedSource {
            partition: NEWS_PARTITION,
            docs: vec![RawDocument::new("wire", "AI chips and crypto markets")],
        }),
        Box::new(FixedSource {
            partition: SOCIAL_PARTITION,
            docs: vec![RawDocument::new("social", "loving it")],
        }),
    ]
}

// ---------- analysis ----------

pub struct FixedTopics(pub Vec<&'static str>);

#[async_trait]
impl TopicModeler for FixedTopics {
    async fn extract_topics(&self, _documents: &[RawDocument]) -> Result<Vec<String>> {
        Ok(self.0.iter().map(|s| s.to_string()).collect())
    }
    fn name(&self) -> &'static str {
        "fixed-topics"
    }
}

pub struct FixedSentiments(pub Vec<f64>);

#[async_trait]
impl SentimentAnalyzer for FixedSentiments {
    async fn analyze(&self, _documents: &[RawDocument]) -> Result<Vec<f64>> {
        Ok(self.0.clone())
    }
    fn name(&self) -> &'static str {
        "fixed-sentiments"
    }
}

// ---------- validation ----------

/// Topics present in the map are valid with the given score, the rest invalid.
#[derive(Default)]
pub struct MapValidator {
    pub scores: HashMap<String, f64>,
    pub down: bool,
}

impl MapValidator {
    pub fn with(mut self, topic: &str, score: f64) -> Self {
        self.scores.insert(topic.to_string(), score);
        self
    }

    /// Every call fails, as if the market data service were unreachable.
    pub fn unreachable() -> Self {
        Self {
            down: true,
            ..Default::default()
        }
    }
}

#[async_trait]
impl MarketDataValidator for MapValidator {
    async fn validate(&self, topic: &str) -> Result<ValidationVerdict> {
        if self.down {
            return Err(anyhow!("market data service unreachable"));
        }
        Ok(match self.scores.get(topic) {
            Some(s) => ValidationVerdict::valid(*s),
            None => ValidationVerdict::invalid(),
        })
    }
    fn name(&self) -> &'static str {
        "map"
    }
}

// ---------- knowledge base ----------

/// In-memory store whose `query` fails for selected keys.
pub struct FlakyKnowledgeBase {
    pub inner: InMemoryKnowledgeBase,
    pub failing_keys: HashSet<String>,
    pub fail_update: bool,
}

impl FlakyKnowledgeBase {
    pub fn new(inner: InMemoryKnowledgeBase) -> Self {
        Self {
            inner,
            failing_keys: HashSet::new(),
            fail_update: false,
        }
    }

    pub fn failing(mut self, key: &str) -> Self {
        self.failing_keys.insert(key.to_string());
        self
    }
}

#[async_trait]
impl KnowledgeBase for FlakyKnowledgeBase {
    async fn query(&self, key: &str) -> Result<Option<HistoricalData>> {
        if self.failing_keys.contains(key) {
            return Err(anyhow!("timeout querying {key}"));
        }
        self.inner.query(key).await
    }

    async fn update(&self, insights: &InsightPayload) -> Result<()> {
        if self.fail_update {
            return Err(anyhow!("disk full"));
        }
        self.inner.update(insights).await
    }
}

// ---------- publishing ----------

#[derive(Clone, Default)]
pub struct RecordingPublisher {
    pub sent: Arc<Mutex<Vec<(String, String)>>>,
    pub fail: bool,
}

impl RecordingPublisher {
    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Publisher for RecordingPublisher {
    async fn publish(&self, topic: &str, payload: &str) -> Result<()> {
        if self.fail {
            return Err(anyhow!("broker unavailable"));
        }
        self.sent
            .lock()
            .unwrap()
            .push((topic.to_string(), payload.to_string()));
        Ok(())
    }
    fn name(&self) -> &'static str {
        "recording"
    }
}

// ---------- wiring ----------

pub fn pipeline(
    sources: Vec<Box<dyn DataSource>>,
    topics: Vec<&'static str>,
    sentiments: Vec<f64>,
    validator: MapValidator,
    kb: Arc<dyn KnowledgeBase>,
    publisher: RecordingPublisher,
) -> Pipeline {
    Pipeline::new(
        Collector::new(sources),
        Analyzer::new(
            Arc::new(FixedTopics(topics)),
            Arc::new(FixedSentiments(sentiments)),
        ),
        Validator::new(Arc::new(validator)),
        InsightGenerator::new(kb.clone()),
        kb,
        Arc::new(publisher),
    )
}

// ---------- log capture ----------

#[derive(Clone, Default)]
pub struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// A subscriber writing plain-text events into `buf`.
pub fn capture_subscriber(buf: &LogBuffer) -> impl tracing::Subscriber + Send + Sync {
    let buf = buf.clone();
    tracing_subscriber::fmt()
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .with_writer(move || buf.clone())
        .finish()
}
