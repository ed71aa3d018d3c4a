// src/insight/mod.rs
//! # Insight Generator
//! Stage 4: pick emerging trends and attach an entry recommendation to each.
//!
//! Emergence: `market_relevance_score >= threshold` (inclusive), input order,
//! duplicates kept.
//!
//! Feasibility: mean of the topic's historical `revenue_growth` series. One
//! topic's lookup failure never affects its siblings; it scores
//! [`FAILED_FEASIBILITY_SCORE`] and the run continues.

pub mod feasibility;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use metrics::counter;

use crate::error::InsightError;
use crate::knowledge::KnowledgeBase;
use crate::model::{InsightPayload, RecommendationRecord, RecommendationType, ValidatedRecord};

pub use feasibility::{FeasibilityOutcome, EMPTY_HISTORY_SCORE, FAILED_FEASIBILITY_SCORE};

/// Relevance at or above which a validated topic counts as emerging.
pub const EMERGENCE_THRESHOLD: f64 = 0.7;

pub struct InsightGenerator {
    knowledge_base: Arc<dyn KnowledgeBase>,
    threshold: f64,
}

impl InsightGenerator {
    pub fn new(knowledge_base: Arc<dyn KnowledgeBase>) -> Self {
        Self {
            knowledge_base,
            threshold: EMERGENCE_THRESHOLD,
        }
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub async fn generate(
        &self,
        records: Vec<ValidatedRecord>,
    ) -> Result<InsightPayload, InsightError> {
        self.generate_at(records, Utc::now()).await
    }

    /// Like [`generate`](Self::generate) with an explicit generation timestamp.
    pub async fn generate_at(
        &self,
        records: Vec<ValidatedRecord>,
        now: DateTime<Utc>,
    ) -> Result<InsightPayload, InsightError> {
        check_records(&records)?;

        let emerging_trends = emerging(&records, self.threshold);
        counter!("insight_emerging_total").increment(emerging_trends.len() as u64);

        let mut recommendations = Vec::with_capacity(emerging_trends.len());
        for trend in &emerging_trends {
            let outcome = feasibility::score_topic(self.knowledge_base.as_ref(), trend).await;
            if let FeasibilityOutcome::Failed(ref e) = outcome {
                tracing::error!(
                    target: "pipeline",
                    topic = %trend,
                    error = %e,
                    "feasibility calculation failed"
                );
                counter!("insight_feasibility_errors_total").increment(1);
            }
            recommendations.push(RecommendationRecord {
                trend: trend.clone(),
                recommendation_type: RecommendationType::Entry,
                feasibility_score: outcome.score(),
            });
        }

        tracing::info!(
            target: "pipeline",
            validated = records.len(),
            emerging = emerging_trends.len(),
            "insights generated"
        );

        Ok(InsightPayload {
            emerging_trends,
            timestamp: now,
            recommendations,
        })
    }
}

/// Topics whose relevance clears `threshold`, in input order, duplicates kept.
pub fn emerging(records: &[ValidatedRecord], threshold: f64) -> Vec<String> {
    records
        .iter()
        .filter(|r| r.market_relevance_score >= threshold)
        .map(|r| r.topic().to_string())
        .collect()
}

fn check_records(records: &[ValidatedRecord]) -> Result<(), InsightError> {
    for (index, r) in records.iter().enumerate() {
        let score = r.market_relevance_score;
        if !score.is_finite() || !(0.0..=1.0).contains(&score) {
            tracing::error!(
                target: "pipeline",
                index,
                topic = %r.topic(),
                score,
                "malformed validated record"
            );
            return Err(InsightError::MalformedRecord {
                index,
                topic: r.topic().to_string(),
                score,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::knowledge::InMemoryKnowledgeBase;
    use crate::model::TrendRecord;
    use chrono::TimeZone;

    fn rec(topic: &str, relevance: f64) -> ValidatedRecord {
        ValidatedRecord::new(
            TrendRecord {
                topic: topic.to_string(),
                sentiment_score: 0.0,
                timestamp: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
            },
            relevance,
        )
    }

    #[test]
    fn threshold_is_inclusive_and_keeps_duplicates() {
        let rs = vec![
            rec("ai", 0.7),
            rec("fad", 0.69),
            rec("ai", 0.95),
            rec("ev", 1.0),
        ];
        assert_eq!(emerging(&rs, EMERGENCE_THRESHOLD), vec!["ai", "ai", "ev"]);
    }

    #[tokio::test]
    async fn payload_uses_fresh_timestamp() {
        let kb = Arc::new(InMemoryKnowledgeBase::new().with_series("ai", vec![0.1, 0.3]));
        let g = InsightGenerator::new(kb);
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        let p = g.generate_at(vec![rec("ai", 0.8)], now).await.unwrap();
        assert_eq!(p.timestamp, now);
        assert_eq!(p.emerging_trends, vec!["ai"]);
        assert_eq!(p.recommendations.len(), 1);
        assert_eq!(p.recommendations[0].recommendation_type, RecommendationType::Entry);
        assert!((p.recommendations[0].feasibility_score - 0.2).abs() < 1e-12);
    }

    #[tokio::test]
    async fn no_emerging_topics_yields_empty_payload() {
        let g = InsightGenerator::new(Arc::new(InMemoryKnowledgeBase::new()));
        let p = g.generate(vec![rec("fad", 0.2)]).await.unwrap();
        assert!(p.emerging_trends.is_empty());
        assert!(p.recommendations.is_empty());
    }

    #[tokio::test]
    async fn out_of_range_relevance_is_rejected() {
        let g = InsightGenerator::new(Arc::new(InMemoryKnowledgeBase::new()));
        let err = g
            .generate(vec![rec("ai", 0.8), rec("bad", f64::NAN)])
            .await
            .unwrap_err();
        let InsightError::MalformedRecord { index, topic, .. } = err;
        assert_eq!(index, 1);
        assert_eq!(topic, "bad");
    }
}
