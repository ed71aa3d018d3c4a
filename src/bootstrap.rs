// src/bootstrap.rs
//! Wires concrete collaborators from `PipelineConfig`.

use anyhow::{bail, Result};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::analyze::{Analyzer, KeywordTopicModeler, LexiconSentimentAnalyzer};
use crate::collect::providers::{
    file::FileSource, news_api::NewsApiSource, social::SocialSearchSource,
};
use crate::collect::types::DataSource;
use crate::collect::Collector;
use crate::config::PipelineConfig;
use crate::insight::InsightGenerator;
use crate::knowledge::{FileKnowledgeBase, KnowledgeBase};
use crate::pipeline::Pipeline;
use crate::publish::{LogPublisher, Publisher, PublisherMux, WebhookPublisher};
use crate::validate::types::MarketDataValidator;
use crate::validate::{HttpMarketValidator, TableMarketValidator, Validator};

pub fn build_sources(cfg: &PipelineConfig) -> Result<Vec<Box<dyn DataSource>>> {
    let s = &cfg.sources;
    let timeout = Duration::from_secs(s.timeout_secs);
    let mut out: Vec<Box<dyn DataSource>> = Vec::new();

    if let Some(news) = &s.news {
        out.push(Box::new(NewsApiSource::new(
            news.url.clone(),
            news.query.clone(),
            news.api_key.clone(),
            &s.user_agent,
            timeout,
        )?));
    }
    if let Some(social) = &s.social {
        out.push(Box::new(SocialSearchSource::new(
            social.url.clone(),
            social.query.clone(),
            social.api_key.clone(),
            &s.user_agent,
            timeout,
        )?));
    }
    for f in &s.files {
        out.push(Box::new(FileSource::new(f.path.clone(), f.partition.clone())));
    }

    if out.is_empty() {
        bail!("no data sources configured (set sources.news, sources.social or sources.files)");
    }
    Ok(out)
}

pub fn build_market_validator(cfg: &PipelineConfig) -> Result<Arc<dyn MarketDataValidator>> {
    let v = &cfg.validator;
    if let Some(url) = &v.base_url {
        return Ok(Arc::new(HttpMarketValidator::new(
            url,
            v.api_key.clone(),
            Duration::from_secs(v.timeout_secs),
        )?));
    }
    if !v.topics.is_empty() {
        return Ok(Arc::new(TableMarketValidator::new(
            v.topics.iter().map(|(k, s)| (k.as_str(), *s)),
        )));
    }
    bail!("no market validator configured (set validator.base_url or [validator.topics])")
}

pub fn build_publisher(cfg: &PipelineConfig) -> Arc<dyn Publisher> {
    let p = &cfg.publish;
    let mut sinks: Vec<Box<dyn Publisher>> = Vec::new();
    if let Some(url) = &p.webhook_url {
        sinks.push(Box::new(
            WebhookPublisher::new(url.clone())
                .with_timeout(p.timeout_secs)
                .with_retries(p.retries),
        ));
    }
    if p.log || sinks.is_empty() {
        sinks.push(Box::new(LogPublisher));
    }
    Arc::new(PublisherMux::new(sinks))
}

/// Build the full pipeline from config.
pub fn build_pipeline(cfg: &PipelineConfig) -> Result<Pipeline> {
    let collector = Collector::new(build_sources(cfg)?);
    let analyzer = Analyzer::new(
        Arc::new(KeywordTopicModeler::new(cfg.analysis.top_k_topics)),
        Arc::new(LexiconSentimentAnalyzer::new()),
    );
    let validator = Validator::new(build_market_validator(cfg)?)
        .with_default_relevance(cfg.validator.default_relevance);

    let kb: Arc<dyn KnowledgeBase> =
        Arc::new(FileKnowledgeBase::new(cfg.knowledge_base.path.clone()));
    let insights =
        InsightGenerator::new(kb.clone()).with_threshold(cfg.insight.emergence_threshold);

    info!(
        kb = %cfg.knowledge_base.path.display(),
        threshold = cfg.insight.emergence_threshold,
        webhook = cfg.publish.webhook_url.is_some(),
        "pipeline wired"
    );

    Ok(Pipeline::new(
        collector,
        analyzer,
        validator,
        insights,
        kb,
        build_publisher(cfg),
    ))
}
