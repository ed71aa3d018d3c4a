//! Market research pipeline: binary entrypoint.
//! Loads config, wires collaborators and runs one collect → publish pass.

use std::net::SocketAddr;
use std::process::ExitCode;

use market_research_pipeline::config::load_config_default;
use market_research_pipeline::{build_pipeline, metrics};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// `LOG_FORMAT=json` switches to structured JSON lines.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("market_research_pipeline=info,pipeline=info,publish=info,warn")
    });

    let json = std::env::var("LOG_FORMAT")
        .ok()
        .is_some_and(|v| v.eq_ignore_ascii_case("json"));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(fmt::layer().json().with_current_span(true)).init();
    } else {
        registry.with(fmt::layer().compact()).init();
    }
}

fn init_metrics() -> anyhow::Result<()> {
    let Ok(raw) = std::env::var("METRICS_ADDR") else {
        return Ok(());
    };
    let addr: SocketAddr = raw
        .parse()
        .map_err(|e| anyhow::anyhow!("METRICS_ADDR `{raw}` is not a socket address: {e}"))?;
    metrics::install_prometheus(addr)?;
    tracing::info!(%addr, "prometheus exporter listening");
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env in local/dev; no-op when absent.
    let _ = dotenvy::dotenv();
    init_tracing();

    if let Err(e) = init_metrics() {
        tracing::error!(error = ?e, "metrics exporter not started");
    }

    let cfg = match load_config_default() {
        Ok(c) => c,
        Err(e) => {
            tracing::error!(error = ?e, "failed to load pipeline config");
            return ExitCode::FAILURE;
        }
    };

    let pipeline = match build_pipeline(&cfg) {
        Ok(p) => p,
        Err(e) => {
            tracing::error!(error = ?e, "failed to wire pipeline");
            return ExitCode::FAILURE;
        }
    };

    match pipeline.run().await {
        Ok(payload) => {
            tracing::info!(
                emerging = payload.emerging_trends.len(),
                recommendations = payload.recommendations.len(),
                "done"
            );
            ExitCode::SUCCESS
        }
        // Already logged inside the run span.
        Err(_) => ExitCode::FAILURE,
    }
}
