// src/pipeline.rs
//! # Pipeline
//! Collect → analyze → validate → generate → persist → publish.
//!
//! Stages run strictly in sequence and hand their output to the next by value.
//! A failure in any stage aborts the run: nothing is persisted or published.
//! All events of a run are emitted inside one `pipeline_run` span.

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use metrics::{counter, gauge, histogram};
use tracing::Instrument;

use crate::analyze::Analyzer;
use crate::collect::Collector;
use crate::error::PipelineError;
use crate::insight::InsightGenerator;
use crate::knowledge::KnowledgeBase;
use crate::model::InsightPayload;
use crate::publish::{Publisher, PUBLISH_TOPIC};
use crate::validate::Validator;

pub struct Pipeline {
    collector: Collector,
    analyzer: Analyzer,
    validator: Validator,
    insights: InsightGenerator,
    knowledge_base: Arc<dyn KnowledgeBase>,
    publisher: Arc<dyn Publisher>,
    publish_topic: String,
}

impl Pipeline {
    pub fn new(
        collector: Collector,
        analyzer: Analyzer,
        validator: Validator,
        insights: InsightGenerator,
        knowledge_base: Arc<dyn KnowledgeBase>,
        publisher: Arc<dyn Publisher>,
    ) -> Self {
        Self {
            collector,
            analyzer,
            validator,
            insights,
            knowledge_base,
            publisher,
            publish_topic: PUBLISH_TOPIC.to_string(),
        }
    }

    pub fn with_publish_topic(mut self, topic: impl Into<String>) -> Self {
        self.publish_topic = topic.into();
        self
    }

    /// Run one full pass. Returns the payload that was persisted and published.
    pub async fn run(&self) -> Result<InsightPayload, PipelineError> {
        crate::metrics::ensure_metrics_described();
        counter!("pipeline_runs_total").increment(1);

        let started = Utc::now();
        let span = tracing::info_span!(
            target: "pipeline",
            "pipeline_run",
            run = %started.format("%Y%m%dT%H%M%S%.3fZ")
        );
        let t0 = Instant::now();

        let res = self.run_stages().instrument(span.clone()).await;
        histogram!("pipeline_run_ms").record(t0.elapsed().as_secs_f64() * 1_000.0);

        span.in_scope(|| match &res {
            Ok(p) => {
                gauge!("pipeline_last_success_ts").set(Utc::now().timestamp() as f64);
                tracing::info!(
                    target: "pipeline",
                    emerging = p.emerging_trends.len(),
                    "pipeline run finished"
                );
            }
            Err(e) => {
                counter!("pipeline_failures_total", "stage" => e.stage()).increment(1);
                tracing::error!(
                    target: "pipeline",
                    stage = e.stage(),
                    error = %e,
                    "pipeline run aborted"
                );
            }
        });
        res
    }

    async fn run_stages(&self) -> Result<InsightPayload, PipelineError> {
        let bundle = self.collector.collect().await?;
        let trends = self.analyzer.analyze(bundle).await?;
        let validated = self.validator.validate(trends).await?;
        let payload = self.insights.generate(validated).await?;

        self.knowledge_base.update(&payload).await.map_err(|e| {
            tracing::error!(target: "pipeline", error = ?e, "knowledge base update failed");
            PipelineError::Persist(e)
        })?;

        let body = serde_json::to_string(&payload)?;
        self.publisher
            .publish(&self.publish_topic, &body)
            .await
            .map_err(|e| {
                tracing::error!(
                    target: "pipeline",
                    error = ?e,
                    topic = %self.publish_topic,
                    sink = self.publisher.name(),
                    "publish failed"
                );
                PipelineError::Publish {
                    topic: self.publish_topic.clone(),
                    source: e,
                }
            })?;

        Ok(payload)
    }
}
