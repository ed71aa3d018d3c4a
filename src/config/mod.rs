// src/config/mod.rs
pub mod pipeline;

use anyhow::{anyhow, bail, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

pub use pipeline::{
    AnalysisConfig, FileSourceConfig, HttpSourceConfig, InsightConfig, KnowledgeBaseConfig,
    PipelineConfig, PublishConfig, SourcesConfig, ValidatorConfig,
};

pub const ENV_CONFIG_PATH: &str = "PIPELINE_CONFIG_PATH";

/// Environment variables consulted when a key is configured as "ENV".
pub const ENV_NEWS_API_KEY: &str = "NEWS_API_KEY";
pub const ENV_SOCIAL_TOKEN: &str = "SOCIAL_BEARER_TOKEN";
pub const ENV_VALIDATOR_KEY: &str = "MARKET_VALIDATOR_KEY";

/// Load config from an explicit path. TOML or JSON, picked by extension.
pub fn load_config_from(path: &Path) -> Result<PipelineConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading pipeline config from {}", path.display()))?;
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    let mut cfg = parse_config(&content, &ext)
        .with_context(|| format!("parsing pipeline config {}", path.display()))?;
    resolve_env_keys(&mut cfg)?;
    cfg.sanitize();
    Ok(cfg)
}

/// Load config using env var + fallbacks:
/// 1) $PIPELINE_CONFIG_PATH
/// 2) config/pipeline.toml
/// 3) config/pipeline.json
/// 4) built-in defaults
pub fn load_config_default() -> Result<PipelineConfig> {
    if let Ok(p) = std::env::var(ENV_CONFIG_PATH) {
        let pb = PathBuf::from(p);
        if pb.exists() {
            return load_config_from(&pb);
        }
        return Err(anyhow!("{ENV_CONFIG_PATH} points to non-existent path"));
    }
    for candidate in ["config/pipeline.toml", "config/pipeline.json"] {
        let p = PathBuf::from(candidate);
        if p.exists() {
            return load_config_from(&p);
        }
    }
    Ok(PipelineConfig::default())
}

fn parse_config(s: &str, ext: &str) -> Result<PipelineConfig> {
    match ext {
        "json" => Ok(serde_json::from_str(s)?),
        "toml" => Ok(toml::from_str(s)?),
        _ => {
            if let Ok(v) = toml::from_str(s) {
                return Ok(v);
            }
            serde_json::from_str(s).map_err(|_| anyhow!("unsupported pipeline config format"))
        }
    }
}

fn resolve_env_keys(cfg: &mut PipelineConfig) -> Result<()> {
    if let Some(news) = cfg.sources.news.as_mut() {
        resolve_key(&mut news.api_key, ENV_NEWS_API_KEY)?;
    }
    if let Some(social) = cfg.sources.social.as_mut() {
        resolve_key(&mut social.api_key, ENV_SOCIAL_TOKEN)?;
    }
    resolve_key(&mut cfg.validator.api_key, ENV_VALIDATOR_KEY)
}

/// "ENV" means: read from `var`. Empty strings mean no key.
fn resolve_key(slot: &mut Option<String>, var: &str) -> Result<()> {
    let is_env = slot
        .as_deref()
        .is_some_and(|v| v.trim().eq_ignore_ascii_case("env"));
    let is_blank = slot.as_deref().is_some_and(|v| v.trim().is_empty());
    if is_env {
        let key = std::env::var(var).map_err(|_| anyhow!("Missing {var} env var"))?;
        *slot = Some(key);
    } else if is_blank {
        *slot = None;
    }
    if slot.as_deref().is_some_and(|k| k.contains(char::is_whitespace)) {
        bail!("{var}: api key must not contain whitespace");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn toml_and_json_parse_to_same_config() {
        let toml_src = r#"
            [sources.news]
            url = "https://news.example.test/v2/everything"
            query = "semiconductors"

            [validator.topics]
            ai = 0.9

            [insight]
            emergence_threshold = 0.75
        "#;
        let json_src = r#"{
            "sources": {"news": {"url": "https://news.example.test/v2/everything", "query": "semiconductors"}},
            "validator": {"topics": {"ai": 0.9}},
            "insight": {"emergence_threshold": 0.75}
        }"#;
        let a = parse_config(toml_src, "toml").unwrap();
        let b = parse_config(json_src, "json").unwrap();
        for c in [&a, &b] {
            assert_eq!(c.sources.news.as_ref().unwrap().query, "semiconductors");
            assert_eq!(c.validator.topics.get("ai"), Some(&0.9));
            assert_eq!(c.insight.emergence_threshold, 0.75);
            assert_eq!(c.publish.retries, 3);
        }
    }

    #[test]
    fn sanitize_clamps_scores() {
        let mut c = PipelineConfig::default();
        c.insight.emergence_threshold = 1.7;
        c.validator.default_relevance = f64::NAN;
        c.validator.topics.insert("ai".into(), -0.3);
        c.sanitize();
        assert_eq!(c.insight.emergence_threshold, 1.0);
        assert_eq!(c.validator.default_relevance, 0.5);
        assert_eq!(c.validator.topics["ai"], 0.0);
    }

    #[serial_test::serial]
    #[test]
    fn env_key_is_resolved() {
        env::set_var(ENV_NEWS_API_KEY, "abc123");
        let mut slot = Some("ENV".to_string());
        resolve_key(&mut slot, ENV_NEWS_API_KEY).unwrap();
        assert_eq!(slot.as_deref(), Some("abc123"));

        env::remove_var(ENV_NEWS_API_KEY);
        let mut missing = Some("env".to_string());
        assert!(resolve_key(&mut missing, ENV_NEWS_API_KEY).is_err());

        let mut blank = Some("  ".to_string());
        resolve_key(&mut blank, ENV_NEWS_API_KEY).unwrap();
        assert!(blank.is_none());
    }
}
