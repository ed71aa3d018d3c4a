// src/validate/mod.rs
//! Stage 3: cross-check each trend topic against market data.

pub mod http;
pub mod table;
pub mod types;

use std::sync::Arc;

use metrics::counter;

use crate::error::ValidationError;
use crate::model::{TrendRecord, ValidatedRecord};
use types::{MarketDataValidator, ValidationVerdict};

pub use http::HttpMarketValidator;
pub use table::TableMarketValidator;

/// Relevance used when the validator accepts a topic without scoring it.
pub const DEFAULT_RELEVANCE_SCORE: f64 = 0.5;

pub struct Validator {
    market: Arc<dyn MarketDataValidator>,
    default_relevance: f64,
}

impl Validator {
    pub fn new(market: Arc<dyn MarketDataValidator>) -> Self {
        Self {
            market,
            default_relevance: DEFAULT_RELEVANCE_SCORE,
        }
    }

    pub fn with_default_relevance(mut self, score: f64) -> Self {
        self.default_relevance = score;
        self
    }

    /// Stable filter: keeps valid records in input order, drops the rest.
    /// Only a failed collaborator call is an error.
    pub async fn validate(
        &self,
        records: Vec<TrendRecord>,
    ) -> Result<Vec<ValidatedRecord>, ValidationError> {
        let total = records.len();
        let mut out = Vec::with_capacity(total);

        for trend in records {
            let verdict = match self.market.validate(&trend.topic).await {
                Ok(v) => v,
                Err(e) => {
                    tracing::error!(
                        target: "pipeline",
                        error = ?e,
                        topic = %trend.topic,
                        validator = self.market.name(),
                        "market validation failed"
                    );
                    return Err(ValidationError::Collaborator {
                        topic: trend.topic,
                        source: e,
                    });
                }
            };

            match accept(&verdict, self.default_relevance) {
                Some(score) if !score.is_finite() || !(0.0..=1.0).contains(&score) => {
                    tracing::error!(
                        target: "pipeline",
                        topic = %trend.topic,
                        score,
                        validator = self.market.name(),
                        "relevance score out of range"
                    );
                    return Err(ValidationError::RelevanceOutOfRange {
                        topic: trend.topic,
                        score,
                    });
                }
                Some(score) => out.push(ValidatedRecord::new(trend, score)),
                None => {
                    tracing::warn!(
                        target: "pipeline",
                        topic = %trend.topic,
                        "invalid trend detected"
                    );
                    counter!("validate_dropped_total").increment(1);
                }
            }
        }

        tracing::info!(
            target: "pipeline",
            kept = out.len(),
            dropped = total - out.len(),
            "validation finished"
        );
        Ok(out)
    }
}

/// Relevance for an accepted verdict, `None` when the topic is rejected.
fn accept(verdict: &ValidationVerdict, default_relevance: f64) -> Option<f64> {
    if verdict.is_valid == Some(true) {
        Some(verdict.relevance_score.unwrap_or(default_relevance))
    } else {
        None
    }
}
