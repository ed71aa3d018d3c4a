// src/metrics.rs
use anyhow::{Context, Result};
use metrics::{describe_counter, describe_gauge, describe_histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use once_cell::sync::OnceCell;
use std::net::SocketAddr;

/// One-time metrics registration (so series show up on the exporter).
pub fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("pipeline_runs_total", "Pipeline runs started.");
        describe_counter!(
            "pipeline_failures_total",
            "Pipeline runs aborted, labelled by stage."
        );
        describe_histogram!("pipeline_run_ms", "Wall time of a full pipeline run.");
        describe_gauge!(
            "pipeline_last_success_ts",
            "Unix ts of the last successful run."
        );
        describe_counter!("collect_documents_total", "Documents fetched from sources.");
        describe_counter!("collect_source_errors_total", "Source fetch failures.");
        describe_counter!("collect_http_errors_total", "Transport errors talking to sources.");
        describe_histogram!("collect_parse_ms", "Source body parse time in milliseconds.");
        describe_counter!(
            "analyze_pairs_dropped_total",
            "Topics or sentiments discarded by pairing truncation."
        );
        describe_counter!("validate_dropped_total", "Trends rejected by the market validator.");
        describe_counter!("insight_emerging_total", "Emerging trends emitted.");
        describe_counter!(
            "insight_feasibility_errors_total",
            "Topics whose feasibility lookup failed."
        );
    });
}

/// Install the Prometheus exporter with an HTTP scrape listener on `addr`.
pub fn install_prometheus(addr: SocketAddr) -> Result<()> {
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .context("prometheus: install exporter")?;
    ensure_metrics_described();
    Ok(())
}
