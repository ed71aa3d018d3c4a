// tests/offline_run.rs
// Full run from config: file sources, keyword + lexicon analysis, table validator,
// file-backed knowledge base, log publisher.
use std::fs;

use market_research_pipeline::build_pipeline;
use market_research_pipeline::config::{FileSourceConfig, PipelineConfig};
use market_research_pipeline::knowledge::{FileKnowledgeBase, KnowledgeBase};

#[tokio::test]
async fn offline_config_runs_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let news = dir.path().join("news.json");
    let social = dir.path().join("social.json");
    let kb_path = dir.path().join("kb.json");

    fs::write(
        &news,
        r#"[
            {"source": "wire", "title": "Battery storage", "text": "Battery storage pilots expand."},
            {"source": "wire", "title": "Grid upgrades", "text": "Utilities buy battery capacity for the grid."}
        ]"#,
    )
    .unwrap();
    fs::write(
        &social,
        r#"[{"source": "social", "text": "great growth, loving it"}]"#,
    )
    .unwrap();
    fs::write(
        &kb_path,
        r#"{"series": {"historical_battery_data": {"revenue_growth": [0.2, 0.4]}}}"#,
    )
    .unwrap();

    let mut cfg = PipelineConfig::default();
    cfg.sources.files = vec![
        FileSourceConfig {
            path: news,
            partition: "news".into(),
        },
        FileSourceConfig {
            path: social,
            partition: "social".into(),
        },
    ];
    cfg.validator.topics.insert("battery".into(), 0.9);
    cfg.validator.topics.insert("storage".into(), 0.95);
    cfg.knowledge_base.path = kb_path.clone();

    let payload = build_pipeline(&cfg).unwrap().run().await.unwrap();

    // "battery" is in both news docs, so it ranks first; one social post means one pair.
    assert_eq!(payload.emerging_trends, vec!["battery"]);
    assert_eq!(payload.recommendations.len(), 1);
    assert!((payload.recommendations[0].feasibility_score - 0.3).abs() < 1e-9);

    let raw: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&kb_path).unwrap()).unwrap();
    assert_eq!(raw["insights"][0]["emerging_trends"][0], "battery");

    // series survive the append
    let kb = FileKnowledgeBase::new(&kb_path);
    assert!(kb.query("historical_battery_data").await.unwrap().is_some());
}
