// src/validate/http.rs
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::time::Duration;

use super::types::{MarketDataValidator, ValidationVerdict};

/// Queries `GET {base_url}/{topic}` and expects a `ValidationVerdict` JSON body.
pub struct HttpMarketValidator {
    base_url: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl HttpMarketValidator {
    pub fn new(base_url: &str, api_key: Option<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(4))
            .timeout(timeout)
            .build()
            .context("building market validator http client")?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            client,
        })
    }

    fn topic_url(&self, topic: &str) -> Result<reqwest::Url> {
        let mut url = reqwest::Url::parse(&self.base_url)
            .with_context(|| format!("invalid validator base url {}", self.base_url))?;
        url.path_segments_mut()
            .map_err(|_| anyhow::anyhow!("validator base url cannot be a base: {}", self.base_url))?
            .pop_if_empty()
            .push(topic);
        Ok(url)
    }
}

#[async_trait]
impl MarketDataValidator for HttpMarketValidator {
    async fn validate(&self, topic: &str) -> Result<ValidationVerdict> {
        let url = self.topic_url(topic)?;
        let mut req = self.client.get(url);
        if let Some(key) = &self.api_key {
            req = req.bearer_auth(key);
        }
        let verdict = req
            .send()
            .await
            .with_context(|| format!("market validator request for `{topic}`"))?
            .error_for_status()
            .context("market validator non-2xx")?
            .json::<ValidationVerdict>()
            .await
            .context("market validator body")?;
        Ok(verdict)
    }

    fn name(&self) -> &'static str {
        "http"
    }
}
