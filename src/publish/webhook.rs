// src/publish/webhook.rs
use anyhow::{anyhow, Result};
use reqwest::Client;
use std::time::Duration;

use super::Publisher;

/// POSTs the serialized payload to a message-broker webhook, topic in `X-Topic`.
/// Retries with exponential backoff (500ms, 1s, 2s, ...).
#[derive(Clone)]
pub struct WebhookPublisher {
    url: String,
    client: Client,
    timeout: Duration,
    max_retries: u8,
}

impl WebhookPublisher {
    pub fn new(url: String) -> Self {
        Self {
            url,
            client: Client::new(),
            timeout: Duration::from_secs(5),
            max_retries: 3,
        }
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout = Duration::from_secs(secs);
        self
    }

    /// Total attempts; 0 is treated as 1.
    pub fn with_retries(mut self, retries: u8) -> Self {
        self.max_retries = retries.max(1);
        self
    }
}

fn backoff(attempt: u8) -> Duration {
    Duration::from_millis(500u64 << (attempt.saturating_sub(1)).min(6))
}

#[async_trait::async_trait]
impl Publisher for WebhookPublisher {
    async fn publish(&self, topic: &str, payload: &str) -> Result<()> {
        let mut attempt: u8 = 0;
        loop {
            attempt += 1;
            let res = self
                .client
                .post(&self.url)
                .timeout(self.timeout)
                .header(reqwest::header::CONTENT_TYPE, "application/json")
                .header("X-Topic", topic)
                .body(payload.to_owned())
                .send()
                .await;

            let failure = match res {
                Ok(rsp) => match rsp.error_for_status_ref() {
                    Ok(_) => return Ok(()),
                    Err(e) => anyhow!("publish webhook HTTP error: {e}"),
                },
                Err(e) => anyhow!("publish webhook request failed: {e}"),
            };

            if attempt >= self.max_retries {
                return Err(failure);
            }
            tracing::debug!(target: "publish", attempt, error = %failure, "retrying publish");
            tokio::time::sleep(backoff(attempt)).await;
        }
    }

    fn name(&self) -> &'static str {
        "webhook"
    }
}
