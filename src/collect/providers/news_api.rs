// src/collect/providers/news_api.rs
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use metrics::{counter, histogram};
use serde::Deserialize;
use std::time::Duration;

use crate::collect::normalize_text;
use crate::collect::types::DataSource;
use crate::model::{RawDocument, NEWS_PARTITION};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Everything {
    status: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    articles: Vec<Article>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Article {
    source: Option<ArticleSource>,
    title: Option<String>,
    description: Option<String>,
    content: Option<String>,
    url: Option<String>,
    published_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct ArticleSource {
    name: Option<String>,
}

/// News articles from a NewsAPI-compatible `/v2/everything` endpoint.
pub struct NewsApiSource {
    endpoint: String,
    query: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl NewsApiSource {
    pub fn new(
        endpoint: impl Into<String>,
        query: impl Into<String>,
        api_key: Option<String>,
        user_agent: &str,
        timeout: Duration,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .context("building news http client")?;
        Ok(Self {
            endpoint: endpoint.into(),
            query: query.into(),
            api_key,
            client,
        })
    }

    fn parse_body(body: &str) -> Result<Vec<RawDocument>> {
        let t0 = std::time::Instant::now();
        let parsed: Everything = serde_json::from_str(body).context("parsing news api json")?;
        if parsed.status != "ok" {
            anyhow::bail!(
                "news api returned status `{}`: {}",
                parsed.status,
                parsed.message.unwrap_or_default()
            );
        }

        let mut out = Vec::with_capacity(parsed.articles.len());
        for a in parsed.articles {
            let title = normalize_text(a.title.as_deref().unwrap_or_default());
            let text = [a.description.as_deref(), a.content.as_deref()]
                .into_iter()
                .flatten()
                .map(normalize_text)
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>()
                .join(" ");
            if title.is_empty() && text.is_empty() {
                continue;
            }
            out.push(RawDocument {
                source: a
                    .source
                    .and_then(|s| s.name)
                    .unwrap_or_else(|| "newsapi".to_string()),
                title,
                text,
                url: a.url,
                published_at: a.published_at,
            });
        }

        histogram!("collect_parse_ms").record(t0.elapsed().as_secs_f64() * 1_000.0);
        Ok(out)
    }
}

#[async_trait]
impl DataSource for NewsApiSource {
    async fn fetch(&self) -> Result<Vec<RawDocument>> {
        let mut req = self.client.get(&self.endpoint).query(&[("q", &self.query)]);
        if let Some(key) = &self.api_key {
            req = req.header("X-Api-Key", key);
        }
        let body = match req.send().await {
            Ok(resp) => resp
                .error_for_status()
                .context("news http status")?
                .text()
                .await
                .context("news http .text()")?,
            Err(e) => {
                counter!("collect_http_errors_total").increment(1);
                return Err(e).with_context(|| format!("news http get {}", self.endpoint));
            }
        };
        Self::parse_body(&body)
    }

    fn name(&self) -> &str {
        "newsapi"
    }

    fn partition(&self) -> &str {
        NEWS_PARTITION
    }
}
