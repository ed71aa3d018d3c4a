// src/config/pipeline.rs
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::insight::EMERGENCE_THRESHOLD;
use crate::validate::DEFAULT_RELEVANCE_SCORE;

fn default_user_agent() -> String {
    concat!("market-research-pipeline/", env!("CARGO_PKG_VERSION")).to_string()
}
fn default_timeout_secs() -> u64 {
    10
}
fn default_query() -> String {
    "market".to_string()
}
fn default_kb_path() -> PathBuf {
    PathBuf::from("state/knowledge_base.json")
}
fn default_retries() -> u8 {
    3
}
fn default_true() -> bool {
    true
}
fn default_threshold() -> f64 {
    EMERGENCE_THRESHOLD
}
fn default_relevance() -> f64 {
    DEFAULT_RELEVANCE_SCORE
}
fn default_top_k() -> usize {
    10
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineConfig {
    #[serde(default)]
    pub sources: SourcesConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub validator: ValidatorConfig,
    #[serde(default)]
    pub knowledge_base: KnowledgeBaseConfig,
    #[serde(default)]
    pub publish: PublishConfig,
    #[serde(default)]
    pub insight: InsightConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourcesConfig {
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// NewsAPI-style endpoint feeding the `news` partition.
    #[serde(default)]
    pub news: Option<HttpSourceConfig>,
    /// Recent-search endpoint feeding the `social` partition.
    #[serde(default)]
    pub social: Option<HttpSourceConfig>,
    /// JSON document files, each assigned to a partition.
    #[serde(default)]
    pub files: Vec<FileSourceConfig>,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
            news: None,
            social: None,
            files: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpSourceConfig {
    pub url: String,
    #[serde(default = "default_query")]
    pub query: String,
    /// Literal key, or "ENV" to read it from the environment at load time.
    #[serde(default)]
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileSourceConfig {
    pub path: PathBuf,
    pub partition: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// How many topics the keyword modeler returns.
    #[serde(default = "default_top_k")]
    pub top_k_topics: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            top_k_topics: default_top_k(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidatorConfig {
    /// HTTP market validator; takes precedence over `topics`.
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Offline topic → relevance table.
    #[serde(default)]
    pub topics: BTreeMap<String, f64>,
    /// Relevance assumed when a valid verdict carries no score.
    #[serde(default = "default_relevance")]
    pub default_relevance: f64,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            api_key: None,
            timeout_secs: default_timeout_secs(),
            topics: BTreeMap::new(),
            default_relevance: default_relevance(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeBaseConfig {
    #[serde(default = "default_kb_path")]
    pub path: PathBuf,
}

impl Default for KnowledgeBaseConfig {
    fn default() -> Self {
        Self {
            path: default_kb_path(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishConfig {
    #[serde(default)]
    pub webhook_url: Option<String>,
    #[serde(default = "default_retries")]
    pub retries: u8,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Also emit the payload as a log event.
    #[serde(default = "default_true")]
    pub log: bool,
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            webhook_url: None,
            retries: default_retries(),
            timeout_secs: default_timeout_secs(),
            log: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsightConfig {
    #[serde(default = "default_threshold")]
    pub emergence_threshold: f64,
}

impl Default for InsightConfig {
    fn default() -> Self {
        Self {
            emergence_threshold: default_threshold(),
        }
    }
}

impl PipelineConfig {
    /// Clamp scores into [0,1], falling back to defaults for non-finite values.
    pub(crate) fn sanitize(&mut self) {
        fn unit(v: f64, fallback: f64) -> f64 {
            if v.is_finite() {
                v.clamp(0.0, 1.0)
            } else {
                fallback
            }
        }
        self.insight.emergence_threshold =
            unit(self.insight.emergence_threshold, default_threshold());
        self.validator.default_relevance =
            unit(self.validator.default_relevance, default_relevance());
        for v in self.validator.topics.values_mut() {
            *v = unit(*v, default_relevance());
        }
        self.analysis.top_k_topics = self.analysis.top_k_topics.max(1);
    }
}
