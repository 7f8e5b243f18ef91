// src/ingest/mod.rs
pub mod providers;
pub mod types;

use metrics::counter;
use tracing::{debug, warn};

use crate::ingest::types::{CandidateRecord, NewsProvider};
use crate::relevance::RelevanceFilter;

/// What one cascade pass produced, for logging and the run report.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CascadeOutcome {
    pub records: Vec<CandidateRecord>,
    pub fetched: usize,
    pub relevance_dropped: usize,
    pub providers_invoked: usize,
    pub providers_failed: usize,
    pub quota_hit: bool,
}

/// Walk providers in priority order, accumulating relevant records until
/// `quota` is met; remaining providers are then skipped. A failed provider
/// contributes nothing for this run but never stops evaluation of later
/// ones. No retries within a single invocation.
pub async fn run_cascade(
    providers: &[Box<dyn NewsProvider>],
    filter: &RelevanceFilter,
    quota: usize,
) -> CascadeOutcome {
    crate::metrics::ensure_described();

    let mut outcome = CascadeOutcome::default();
    for p in providers {
        if outcome.records.len() >= quota {
            debug!(quota, provider = p.name(), "quota met, provider skipped");
            continue;
        }
        outcome.providers_invoked += 1;
        let batch = match p.fetch_latest().await {
            Ok(batch) => batch,
            Err(e) => {
                warn!(error = ?e, provider = p.name(), "provider error");
                counter!("ingest_provider_errors_total").increment(1);
                outcome.providers_failed += 1;
                continue;
            }
        };
        outcome.fetched += batch.len();
        for record in batch {
            if filter.is_relevant(&record) {
                outcome.records.push(record);
            } else {
                outcome.relevance_dropped += 1;
            }
        }
        debug!(
            provider = p.name(),
            accumulated = outcome.records.len(),
            "provider done"
        );
    }
    outcome.quota_hit = outcome.records.len() >= quota;

    counter!("curate_relevance_dropped_total").increment(outcome.relevance_dropped as u64);
    outcome
}
