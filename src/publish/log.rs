// src/publish/log.rs
use anyhow::Result;

use super::Publisher;

/// Emits the payload as a tracing event. Used when no webhook is configured.
#[derive(Debug, Clone, Default)]
pub struct LogPublisher;

#[async_trait::async_trait]
impl Publisher for LogPublisher {
    async fn publish(&self, topic: &str, payload: &str) -> Result<()> {
        tracing::info!(
            target: "publish",
            topic,
            bytes = payload.len(),
            %payload,
            "insights published"
        );
        Ok(())
    }

    fn name(&self) -> &'static str {
        "log"
    }
}
