// src/publish/mod.rs
pub mod log;
pub mod webhook;

use anyhow::Result;

pub use log::LogPublisher;
pub use webhook::WebhookPublisher;

/// Topic the final insight payload is published on.
pub const PUBLISH_TOPIC: &str = "market_research_topic";

/// Downstream distribution sink. `payload` is already serialized JSON.
#[async_trait::async_trait]
pub trait Publisher: Send + Sync {
    async fn publish(&self, topic: &str, payload: &str) -> Result<()>;
    fn name(&self) -> &'static str;
}

/// Fans one publish out to several sinks. Every sink is attempted; the first
/// error (if any) is returned afterwards.
pub struct PublisherMux {
    sinks: Vec<Box<dyn Publisher>>,
}

impl PublisherMux {
    pub fn new(sinks: Vec<Box<dyn Publisher>>) -> Self {
        Self { sinks }
    }
}

#[async_trait::async_trait]
impl Publisher for PublisherMux {
    async fn publish(&self, topic: &str, payload: &str) -> Result<()> {
        let mut first_err = None;
        for s in &self.sinks {
            if let Err(e) = s.publish(topic, payload).await {
                tracing::warn!(
                    target: "pipeline",
                    sink = s.name(),
                    error = %e,
                    "publish sink failed"
                );
                first_err.get_or_insert(e.context(format!("sink `{}`", s.name())));
            }
        }
        match first_err {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn name(&self) -> &'static str {
        "mux"
    }
}
