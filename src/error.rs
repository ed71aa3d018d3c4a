// src/error.rs
//! Stage error types. Each stage returns its own error; `PipelineError` is the
//! sum surfaced by `Pipeline::run`.

use thiserror::Error;

/// Collector failures. The first failing source aborts collection.
#[derive(Debug, Error)]
pub enum CollectionError {
    #[error("source `{source_name}` (partition `{partition}`) failed to fetch")]
    Source {
        source_name: String,
        partition: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("no data sources configured")]
    NoSources,
}

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("bundle is missing the `{partition}` partition")]
    MissingPartition { partition: String },

    #[error("topic modeling failed over {documents} `{partition}` documents")]
    TopicModeling {
        partition: String,
        documents: usize,
        #[source]
        source: anyhow::Error,
    },

    #[error("sentiment analysis failed over {documents} `{partition}` documents")]
    SentimentAnalysis {
        partition: String,
        documents: usize,
        #[source]
        source: anyhow::Error,
    },
}

/// Only collaborator-call failures. A negative verdict is a filtering decision.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("market data validator failed for topic `{topic}`")]
    Collaborator {
        topic: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("relevance {score} for topic `{topic}` is outside [0, 1]")]
    RelevanceOutOfRange { topic: String, score: f64 },
}

#[derive(Debug, Error)]
pub enum InsightError {
    #[error("record #{index} (topic `{topic}`) has invalid relevance score {score}")]
    MalformedRecord {
        index: usize,
        topic: String,
        score: f64,
    },
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("collection stage failed: {0}")]
    Collection(#[from] CollectionError),

    #[error("analysis stage failed: {0}")]
    Analysis(#[from] AnalysisError),

    #[error("validation stage failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("insight stage failed: {0}")]
    Insight(#[from] InsightError),

    #[error("persisting insights to the knowledge base failed")]
    Persist(#[source] anyhow::Error),

    #[error("serializing insight payload failed")]
    Serialize(#[from] serde_json::Error),

    #[error("publishing insights to `{topic}` failed")]
    Publish {
        topic: String,
        #[source]
        source: anyhow::Error,
    },
}

impl PipelineError {
    /// Stage label used in logs and the `pipeline_failures_total` counter.
    pub fn stage(&self) -> &'static str {
        match self {
            PipelineError::Collection(_) => "collect",
            PipelineError::Analysis(_) => "analyze",
            PipelineError::Validation(_) => "validate",
            PipelineError::Insight(_) => "insight",
            PipelineError::Persist(_) => "persist",
            PipelineError::Serialize(_) | PipelineError::Publish { .. } => "publish",
        }
    }
}
