// src/metrics.rs
use std::path::Path;

use anyhow::{Context, Result};
use metrics::{describe_counter, describe_gauge, describe_histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;

/// One-time metrics registration (so series carry help text in the export).
pub fn ensure_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("ingest_records_total", "Records parsed from providers.");
        describe_counter!(
            "ingest_provider_errors_total",
            "Provider fetch/parse errors."
        );
        describe_counter!(
            "ingest_normalizer_dropped_total",
            "Items dropped for lacking both title and url."
        );
        describe_counter!(
            "curate_relevance_dropped_total",
            "Records dropped by the relevance gate."
        );
        describe_counter!(
            "curate_near_duplicate_total",
            "Records suppressed as url or title duplicates."
        );
        describe_counter!(
            "curate_stale_dropped_total",
            "Records dropped by the freshness gate."
        );
        describe_histogram!("ingest_parse_ms", "Provider parse time in milliseconds.");
        describe_gauge!(
            "pipeline_last_run_ts",
            "Unix ts when the curation pipeline last ran."
        );
    });
}

pub struct Metrics {
    pub handle: PrometheusHandle,
}

impl Metrics {
    /// Install the Prometheus recorder. Fails when a recorder is already
    /// installed; the caller decides whether that is fatal.
    pub fn init() -> Result<Self> {
        let handle = PrometheusBuilder::new()
            .install_recorder()
            .context("prometheus: install recorder")?;
        ensure_described();
        Ok(Self { handle })
    }

    /// Write the exposition to a textfile-collector target.
    pub fn write_textfile(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("metrics dir {}", parent.display()))?;
        }
        std::fs::write(path, self.handle.render())
            .with_context(|| format!("write metrics to {}", path.display()))?;
        Ok(())
    }
}
