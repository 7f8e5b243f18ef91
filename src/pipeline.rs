// src/pipeline.rs
//! One full curation run: cascade the providers, fold in promoted content
//! and the prior snapshot, persist the new snapshot, write the curated
//! artifact.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use metrics::gauge;
use serde::Serialize;
use tokio::fs;
use tracing::{info, warn};

use crate::config::CuratorConfig;
use crate::curate::{merge_and_curate, CuratedOutput, CurationParams};
use crate::ingest::providers::gnews::GnewsProvider;
use crate::ingest::providers::google_rss::GoogleRssProvider;
use crate::ingest::types::{CandidateRecord, NewsProvider};
use crate::ingest::{run_cascade, CascadeOutcome};
use crate::promoted::load_promoted;
use crate::relevance::RelevanceFilter;
use crate::reputation::ReputationList;
use crate::snapshot::SnapshotStore;

/// Summary of one run for the final log line.
#[derive(Debug, Default, Clone, Serialize)]
pub struct RunReport {
    pub providers_invoked: usize,
    pub providers_failed: usize,
    pub fetched: usize,
    pub relevance_dropped: usize,
    pub near_duplicate_dropped: usize,
    pub stale_dropped: usize,
    pub promoted_injected: usize,
    pub primary: usize,
    pub secondary: usize,
    pub quota_hit: bool,
}

/// The artifact downstream renderers read.
#[derive(Debug, Serialize)]
struct CuratedArtifact<'a> {
    generated_at: String,
    spotlight: &'a [CandidateRecord],
    digest: &'a [CandidateRecord],
}

/// Providers in priority order: GNews per query first, feed fallbacks
/// after. Without an API key the cascade runs on feeds alone.
pub fn build_providers(cfg: &CuratorConfig) -> Vec<Box<dyn NewsProvider>> {
    let mut providers: Vec<Box<dyn NewsProvider>> = Vec::new();
    let api_key = cfg.cascade.gnews_api_key.trim();
    // An unresolved "ENV" placeholder counts as unset.
    if api_key.is_empty() || api_key.eq_ignore_ascii_case("env") {
        warn!("gnews api key not set, relying on feed fallback only");
    } else {
        for query in &cfg.cascade.gnews_queries {
            providers.push(Box::new(GnewsProvider::from_http(
                query,
                api_key,
                cfg.cascade.page_size,
            )));
        }
    }
    for terms in &cfg.cascade.rss_queries {
        providers.push(Box::new(GoogleRssProvider::from_http(
            terms,
            cfg.cascade.page_size,
        )));
    }
    providers
}

pub async fn run(
    cfg: &CuratorConfig,
    providers: &[Box<dyn NewsProvider>],
    now: DateTime<Utc>,
) -> Result<RunReport> {
    let filter = RelevanceFilter::with_extras(
        cfg.relevance.extra_publishers.clone(),
        cfg.relevance.extra_keywords.clone(),
    );
    let reputation = ReputationList::with_extras(cfg.reputation.extra_sources.clone());

    let CascadeOutcome {
        records,
        fetched,
        relevance_dropped,
        providers_invoked,
        providers_failed,
        quota_hit,
    } = run_cascade(providers, &filter, cfg.cascade.quota).await;
    info!(
        fetched,
        kept = records.len(),
        providers_invoked,
        providers_failed,
        quota_hit,
        "cascade done"
    );

    let promoted = load_promoted(
        &cfg.content_index_path(),
        &cfg.content.site_base_url,
        &cfg.content.site_name,
    );

    let store = SnapshotStore::new(
        cfg.snapshot_path(),
        cfg.snapshot.max_records,
        cfg.snapshot.max_age_days,
    );
    let snapshot = store.load().await;

    let params = CurationParams {
        similarity_threshold: cfg.curation.similarity_threshold,
        spotlight_window_days: cfg.curation.spotlight_window_days,
        digest_window_days: cfg.curation.digest_window_days,
        primary_cap: cfg.curation.primary_cap,
        secondary_cap: cfg.curation.secondary_cap,
    };
    let curated = merge_and_curate(records, snapshot, promoted, &reputation, &params, now);

    // Promoted content lives in the CMS, not the snapshot; the snapshot
    // keeps only the merged wire set.
    store.store(&curated.accepted, now).await;
    write_artifact(&cfg.output_path(), &curated, now).await?;
    gauge!("pipeline_last_run_ts").set(now.timestamp() as f64);

    Ok(RunReport {
        providers_invoked,
        providers_failed,
        fetched,
        relevance_dropped,
        near_duplicate_dropped: curated.near_duplicate_dropped,
        stale_dropped: curated.stale_dropped,
        promoted_injected: curated.promoted_injected,
        primary: curated.primary.len(),
        secondary: curated.secondary.len(),
        quota_hit,
    })
}

async fn write_artifact(path: &Path, curated: &CuratedOutput, now: DateTime<Utc>) -> Result<()> {
    let artifact = CuratedArtifact {
        generated_at: now.to_rfc3339(),
        spotlight: &curated.primary,
        digest: &curated.secondary,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .await
            .with_context(|| format!("output dir {}", parent.display()))?;
    }
    let bytes = serde_json::to_vec_pretty(&artifact).context("encode curated output")?;
    fs::write(path, bytes)
        .await
        .with_context(|| format!("write curated output to {}", path.display()))?;
    Ok(())
}
