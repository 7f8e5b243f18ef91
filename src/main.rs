//! Mutapa Times Curator — Binary Entrypoint
//! Runs one fetch/curate/publish cycle and exits; scheduling belongs to cron
//! or the surrounding deploy workflow.
//!
//! Usage: `mutapa-curator [path/to/curator.toml]`

use std::path::Path;

use anyhow::Result;
use chrono::Utc;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use mutapa_curator::config::CuratorConfig;
use mutapa_curator::metrics::Metrics;
use mutapa_curator::pipeline;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env in local/dev; no-op when the file is absent.
    // This enables GNEWS_API_KEY / CURATOR_* overrides from .env.
    let _ = dotenvy::dotenv();

    init_tracing();

    let cfg = match std::env::args().nth(1) {
        Some(path) => CuratorConfig::load_from(Path::new(&path))?,
        None => CuratorConfig::load()?,
    };

    // Metrics are advisory; a broken recorder must not block the run.
    let metrics = match Metrics::init() {
        Ok(m) => Some(m),
        Err(e) => {
            warn!(error = %e, "metrics recorder unavailable, continuing without");
            None
        }
    };

    let providers = pipeline::build_providers(&cfg);
    let report = pipeline::run(&cfg, &providers, Utc::now()).await?;

    info!(
        providers_invoked = report.providers_invoked,
        providers_failed = report.providers_failed,
        fetched = report.fetched,
        relevance_dropped = report.relevance_dropped,
        near_duplicate_dropped = report.near_duplicate_dropped,
        stale_dropped = report.stale_dropped,
        promoted_injected = report.promoted_injected,
        primary = report.primary,
        secondary = report.secondary,
        quota_hit = report.quota_hit,
        "curation run complete"
    );

    if let (Some(metrics), Some(path)) = (&metrics, cfg.output.metrics_path.as_deref()) {
        if let Err(e) = metrics.write_textfile(Path::new(path)) {
            warn!(error = %e, path, "failed to write metrics textfile");
        }
    }

    Ok(())
}
