// src/analyze/mod.rs
//! Stage 2: turn the collected bundle into (topic, sentiment) trend records.
//!
//! Topics come from the `news` partition and sentiments from the `social`
//! partition. The two sequences are produced independently, so position `i`
//! in one is not known to describe the same event as position `i` in the
//! other. They are paired according to [`PairingPolicy`].

pub mod keywords;
pub mod lexicon;
pub mod types;

use std::sync::Arc;

use metrics::counter;

use crate::error::AnalysisError;
use crate::model::{RawDataBundle, TrendRecord, NEWS_PARTITION, SOCIAL_PARTITION};
use types::{SentimentAnalyzer, TopicModeler};

pub use keywords::KeywordTopicModeler;
pub use lexicon::LexiconSentimentAnalyzer;

/// How topic and sentiment sequences are combined into records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PairingPolicy {
    /// Zip by index and stop at the shorter sequence; extras are discarded.
    #[default]
    TruncateToShortest,
}

impl PairingPolicy {
    /// Pairs `topics[i]` with `sentiments[i]`.
    pub fn pair(self, topics: Vec<String>, sentiments: Vec<f64>) -> Vec<(String, f64)> {
        match self {
            PairingPolicy::TruncateToShortest => topics.into_iter().zip(sentiments).collect(),
        }
    }
}

pub struct Analyzer {
    topic_modeler: Arc<dyn TopicModeler>,
    sentiment_analyzer: Arc<dyn SentimentAnalyzer>,
    policy: PairingPolicy,
}

impl Analyzer {
    pub fn new(
        topic_modeler: Arc<dyn TopicModeler>,
        sentiment_analyzer: Arc<dyn SentimentAnalyzer>,
    ) -> Self {
        Self {
            topic_modeler,
            sentiment_analyzer,
            policy: PairingPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: PairingPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub async fn analyze(&self, bundle: RawDataBundle) -> Result<Vec<TrendRecord>, AnalysisError> {
        let news = require_partition(&bundle, NEWS_PARTITION)?;
        let social = require_partition(&bundle, SOCIAL_PARTITION)?;

        let topics = self
            .topic_modeler
            .extract_topics(news)
            .await
            .map_err(|e| {
                tracing::error!(
                    target: "pipeline",
                    error = ?e,
                    modeler = self.topic_modeler.name(),
                    documents = news.len(),
                    "topic modeling failed"
                );
                AnalysisError::TopicModeling {
                    partition: NEWS_PARTITION.to_string(),
                    documents: news.len(),
                    source: e,
                }
            })?;

        let sentiments = self
            .sentiment_analyzer
            .analyze(social)
            .await
            .map_err(|e| {
                tracing::error!(
                    target: "pipeline",
                    error = ?e,
                    analyzer = self.sentiment_analyzer.name(),
                    documents = social.len(),
                    "sentiment analysis failed"
                );
                AnalysisError::SentimentAnalysis {
                    partition: SOCIAL_PARTITION.to_string(),
                    documents: social.len(),
                    source: e,
                }
            })?;

        let (n_topics, n_sentiments) = (topics.len(), sentiments.len());
        if n_topics != n_sentiments {
            let dropped = n_topics.abs_diff(n_sentiments);
            tracing::debug!(
                target: "pipeline",
                topics = n_topics,
                sentiments = n_sentiments,
                dropped,
                policy = ?self.policy,
                "topic/sentiment length mismatch"
            );
            counter!("analyze_pairs_dropped_total").increment(dropped as u64);
        }

        let timestamp = bundle.collected_at();
        let records: Vec<TrendRecord> = self
            .policy
            .pair(topics, sentiments)
            .into_iter()
            .map(|(topic, sentiment_score)| TrendRecord {
                topic,
                sentiment_score,
                timestamp,
            })
            .collect();

        tracing::info!(target: "pipeline", trends = records.len(), "analysis finished");
        Ok(records)
    }
}

fn require_partition<'a>(
    bundle: &'a RawDataBundle,
    name: &str,
) -> Result<&'a [crate::model::RawDocument], AnalysisError> {
    bundle.partition(name).ok_or_else(|| {
        tracing::error!(target: "pipeline", partition = name, "bundle is missing partition");
        AnalysisError::MissingPartition {
            partition: name.to_string(),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RawDocument;
    use anyhow::Result;
    use async_trait::async_trait;
    use chrono::Utc;
    use std::collections::BTreeMap;

    struct Topics(Vec<&'static str>);
    struct Scores(Vec<f64>);
    struct Failing;

    #[async_trait]
    impl TopicModeler for Topics {
        async fn extract_topics(&self, _documents: &[RawDocument]) -> Result<Vec<String>> {
            Ok(self.0.iter().map(|s| s.to_string()).collect())
        }
        fn name(&self) -> &'static str {
            "fixed-topics"
        }
    }

    #[async_trait]
    impl SentimentAnalyzer for Scores {
        async fn analyze(&self, _documents: &[RawDocument]) -> Result<Vec<f64>> {
            Ok(self.0.clone())
        }
        fn name(&self) -> &'static str {
            "fixed-scores"
        }
    }

    #[async_trait]
    impl SentimentAnalyzer for Failing {
        async fn analyze(&self, _documents: &[RawDocument]) -> Result<Vec<f64>> {
            anyhow::bail!("model server unavailable")
        }
        fn name(&self) -> &'static str {
            "failing"
        }
    }

    fn bundle(partitions: &[&str]) -> RawDataBundle {
        let mut m = BTreeMap::new();
        for p in partitions {
            m.insert(p.to_string(), vec![RawDocument::new("t", "x")]);
        }
        RawDataBundle::new(m, Utc::now())
    }

    #[test]
    fn truncate_policy_stops_at_shorter() {
        let p = PairingPolicy::TruncateToShortest;
        let out = p.pair(vec!["a".into(), "b".into(), "c".into()], vec![0.1, 0.2]);
        assert_eq!(out, vec![("a".to_string(), 0.1), ("b".to_string(), 0.2)]);
        assert!(p.pair(vec![], vec![0.3]).is_empty());
    }

    #[tokio::test]
    async fn records_carry_bundle_timestamp() {
        let a = Analyzer::new(
            Arc::new(Topics(vec!["ai", "crypto", "ev"])),
            Arc::new(Scores(vec![0.5, -0.2, 0.1])),
        )
        .with_policy(PairingPolicy::TruncateToShortest);
        let b = bundle(&[NEWS_PARTITION, SOCIAL_PARTITION]);
        let ts = b.collected_at();
        let out = a.analyze(b).await.unwrap();
        assert_eq!(out.len(), 3);
        assert!(out.iter().all(|r| r.timestamp == ts));
        assert_eq!(out[1].topic, "crypto");
        assert_eq!(out[1].sentiment_score, -0.2);
    }

    #[tokio::test]
    async fn missing_social_partition_fails() {
        let a = Analyzer::new(Arc::new(Topics(vec!["ai"])), Arc::new(Scores(vec![0.1])));
        let err = a.analyze(bundle(&[NEWS_PARTITION])).await.unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::MissingPartition { ref partition } if partition == SOCIAL_PARTITION
        ));
    }

    #[tokio::test]
    async fn sentiment_failure_is_wrapped() {
        let a = Analyzer::new(Arc::new(Topics(vec!["ai"])), Arc::new(Failing));
        let err = a
            .analyze(bundle(&[NEWS_PARTITION, SOCIAL_PARTITION]))
            .await
            .unwrap_err();
        assert!(matches!(err, AnalysisError::SentimentAnalysis { documents: 1, .. }));
    }
}
