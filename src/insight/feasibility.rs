// src/insight/feasibility.rs
use crate::knowledge::{historical_key, KnowledgeBase};

/// Score when the knowledge base has no usable growth history: nothing stored
/// under the key, an empty record, or an empty `revenue_growth` series.
pub const EMPTY_HISTORY_SCORE: f64 = 0.5;
/// Score when looking up or reading the history failed.
pub const FAILED_FEASIBILITY_SCORE: f64 = 0.0;

/// How a single topic's feasibility was determined.
#[derive(Debug)]
pub enum FeasibilityOutcome {
    /// Mean of a non-empty series.
    Mean(f64),
    /// No record, an empty record, or a record with an empty series.
    NoHistory,
    /// Query failed, or the record has other fields but no `revenue_growth`.
    Failed(anyhow::Error),
}

impl FeasibilityOutcome {
    pub fn score(&self) -> f64 {
        match self {
            FeasibilityOutcome::Mean(m) => *m,
            FeasibilityOutcome::NoHistory => EMPTY_HISTORY_SCORE,
            FeasibilityOutcome::Failed(_) => FAILED_FEASIBILITY_SCORE,
        }
    }
}

pub async fn score_topic(kb: &dyn KnowledgeBase, topic: &str) -> FeasibilityOutcome {
    let key = historical_key(topic);
    let data = match kb.query(&key).await {
        Ok(Some(d)) => d,
        Ok(None) => return FeasibilityOutcome::NoHistory,
        Err(e) => return FeasibilityOutcome::Failed(e.context(format!("query `{key}`"))),
    };

    match data.revenue_growth {
        // an empty record carries no history at all
        None if data.extra.is_empty() => FeasibilityOutcome::NoHistory,
        None => FeasibilityOutcome::Failed(anyhow::anyhow!(
            "record `{key}` has no revenue_growth series"
        )),
        Some(series) if series.is_empty() => FeasibilityOutcome::NoHistory,
        Some(series) => FeasibilityOutcome::Mean(mean(&series)),
    }
}

fn mean(xs: &[f64]) -> f64 {
    xs.iter().sum::<f64>() / xs.len() as f64
}
