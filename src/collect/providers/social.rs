// src/collect/providers/social.rs
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use metrics::{counter, histogram};
use serde::Deserialize;
use std::time::Duration;

use crate::collect::normalize_text;
use crate::collect::types::DataSource;
use crate::model::{RawDocument, SOCIAL_PARTITION};

#[derive(Debug, Deserialize)]
struct RecentSearch {
    #[serde(default)]
    data: Vec<Post>,
}

#[derive(Debug, Deserialize)]
struct Post {
    id: String,
    text: String,
    created_at: Option<DateTime<Utc>>,
}

/// Posts from a recent-search endpoint shaped like `{"data": [{"id", "text", "created_at"}]}`.
pub struct SocialSearchSource {
    endpoint: String,
    query: String,
    bearer_token: Option<String>,
    client: reqwest::Client,
}

impl SocialSearchSource {
    pub fn new(
        endpoint: impl Into<String>,
        query: impl Into<String>,
        bearer_token: Option<String>,
        user_agent: &str,
        timeout: Duration,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .context("building social http client")?;
        Ok(Self {
            endpoint: endpoint.into(),
            query: query.into(),
            bearer_token,
            client,
        })
    }

    fn parse_body(&self, body: &str) -> Result<Vec<RawDocument>> {
        let t0 = std::time::Instant::now();
        let parsed: RecentSearch =
            serde_json::from_str(body).context("parsing social search json")?;

        let out: Vec<RawDocument> = parsed
            .data
            .into_iter()
            .filter_map(|p| {
                let text = normalize_text(&p.text);
                (!text.is_empty()).then(|| RawDocument {
                    source: "social".to_string(),
                    title: String::new(),
                    text,
                    url: Some(format!("{}#{}", self.endpoint, p.id)),
                    published_at: p.created_at,
                })
            })
            .collect();

        histogram!("collect_parse_ms").record(t0.elapsed().as_secs_f64() * 1_000.0);
        Ok(out)
    }
}

#[async_trait]
impl DataSource for SocialSearchSource {
    async fn fetch(&self) -> Result<Vec<RawDocument>> {
        let mut req = self.client.get(&self.endpoint).query(&[
            ("query", self.query.as_str()),
            ("tweet.fields", "created_at"),
        ]);
        if let Some(token) = &self.bearer_token {
            req = req.bearer_auth(token);
        }
        let body = match req.send().await {
            Ok(resp) => resp
                .error_for_status()
                .context("social http status")?
                .text()
                .await
                .context("social http .text()")?,
            Err(e) => {
                counter!("collect_http_errors_total").increment(1);
                return Err(e).with_context(|| format!("social http get {}", self.endpoint));
            }
        };
        self.parse_body(&body)
    }

    fn name(&self) -> &str {
        "social-search"
    }

    fn partition(&self) -> &str {
        SOCIAL_PARTITION
    }
}
