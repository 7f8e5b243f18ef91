// src/curate.rs
//! # Curation Merger
//!
//! Combines one run's new candidates with the persisted snapshot, then
//! deduplicates, ages out, ranks and tiers the result:
//!
//! - New candidates are considered ahead of snapshot records, so on a
//!   collision the fresh fetch wins.
//! - One pass per record: exact-url duplicate, then freshness against the
//!   wide spotlight window, then near-duplicate title. A stale record is
//!   dropped before the title check so it cannot suppress a fresh retelling
//!   of the same story.
//! - Accepted records sort by parsed publish date, newest first, and
//!   partition into a reputable primary tier and a capped secondary tier.
//!   Secondary entries must additionally clear the narrower digest window.
//! - Promoted in-house records are injected at the front of the secondary
//!   list, deduplicated by url against it.
//!
//! An empty primary list is a valid outcome; it is logged, never
//! backfilled.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use metrics::counter;
use tracing::warn;

use crate::freshness::{is_fresh, parse_published_at};
use crate::ingest::types::CandidateRecord;
use crate::reputation::ReputationList;
use crate::similarity::{titles_are_similar, DEFAULT_SIMILARITY_THRESHOLD};

pub const DEFAULT_SPOTLIGHT_WINDOW_DAYS: i64 = 30;
pub const DEFAULT_DIGEST_WINDOW_DAYS: i64 = 14;
pub const DEFAULT_PRIMARY_CAP: usize = 3;
pub const DEFAULT_SECONDARY_CAP: usize = 15;

/// Tunables for one merge. Empirically chosen values; treat as
/// configuration, not invariants.
#[derive(Debug, Clone)]
pub struct CurationParams {
    pub similarity_threshold: f64,
    /// Age limit for anything to stay in circulation at all; also the
    /// primary tier's window.
    pub spotlight_window_days: i64,
    /// Narrower age limit for the secondary digest tier.
    pub digest_window_days: i64,
    pub primary_cap: usize,
    pub secondary_cap: usize,
}

impl Default for CurationParams {
    fn default() -> Self {
        Self {
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
            spotlight_window_days: DEFAULT_SPOTLIGHT_WINDOW_DAYS,
            digest_window_days: DEFAULT_DIGEST_WINDOW_DAYS,
            primary_cap: DEFAULT_PRIMARY_CAP,
            secondary_cap: DEFAULT_SECONDARY_CAP,
        }
    }
}

/// Result of one merge, plus drop diagnostics for the run report.
#[derive(Debug, Default, Clone)]
pub struct CuratedOutput {
    pub primary: Vec<CandidateRecord>,
    pub secondary: Vec<CandidateRecord>,
    /// Full deduplicated, in-window set before tiering; this is what the
    /// snapshot persists.
    pub accepted: Vec<CandidateRecord>,
    pub near_duplicate_dropped: usize,
    pub stale_dropped: usize,
    pub promoted_injected: usize,
}

pub fn merge_and_curate(
    new_records: Vec<CandidateRecord>,
    snapshot_records: Vec<CandidateRecord>,
    promoted: Vec<CandidateRecord>,
    reputation: &ReputationList,
    params: &CurationParams,
    now: DateTime<Utc>,
) -> CuratedOutput {
    crate::metrics::ensure_described();

    let mut accepted: Vec<CandidateRecord> = Vec::new();
    let mut seen_urls: HashSet<String> = HashSet::new();
    let mut near_duplicate_dropped = 0usize;
    let mut stale_dropped = 0usize;

    // Urls and titles suppress only once their record is accepted, so a
    // record dropped as stale leaves no shadow over later candidates.
    for record in new_records.into_iter().chain(snapshot_records) {
        if !record.url.is_empty() && seen_urls.contains(record.url.as_str()) {
            near_duplicate_dropped += 1;
            continue;
        }
        if !is_fresh(&record.published_at, params.spotlight_window_days, now) {
            stale_dropped += 1;
            continue;
        }
        if accepted
            .iter()
            .any(|a| titles_are_similar(&record.title, &a.title, params.similarity_threshold))
        {
            near_duplicate_dropped += 1;
            continue;
        }
        if !record.url.is_empty() {
            seen_urls.insert(record.url.clone());
        }
        accepted.push(record);
    }

    accepted.sort_by_key(|r| {
        std::cmp::Reverse(
            parse_published_at(&r.published_at)
                .map(|dt| dt.timestamp())
                .unwrap_or(i64::MIN),
        )
    });

    let mut primary: Vec<CandidateRecord> = Vec::new();
    let mut secondary: Vec<CandidateRecord> = Vec::new();
    for record in &accepted {
        if reputation.is_reputable(&record.source) && primary.len() < params.primary_cap {
            primary.push(record.clone());
            continue;
        }
        if !is_fresh(&record.published_at, params.digest_window_days, now) {
            stale_dropped += 1;
            continue;
        }
        if secondary.len() < params.secondary_cap {
            secondary.push(record.clone());
        }
    }

    // Promoted content goes in front of the digest, once per url.
    let secondary_urls: HashSet<&str> = secondary
        .iter()
        .map(|r| r.url.as_str())
        .filter(|u| !u.is_empty())
        .collect();
    let mut front: Vec<CandidateRecord> = Vec::new();
    let mut front_urls: HashSet<String> = HashSet::new();
    for p in promoted {
        if !p.url.is_empty()
            && (secondary_urls.contains(p.url.as_str()) || !front_urls.insert(p.url.clone()))
        {
            continue;
        }
        front.push(p);
    }
    let promoted_injected = front.len();
    front.extend(secondary);
    front.truncate(params.secondary_cap);
    let secondary = front;

    if primary.is_empty() {
        warn!("primary curated list is empty");
    }
    counter!("curate_near_duplicate_total").increment(near_duplicate_dropped as u64);
    counter!("curate_stale_dropped_total").increment(stale_dropped as u64);

    CuratedOutput {
        primary,
        secondary,
        accepted,
        near_duplicate_dropped,
        stale_dropped,
        promoted_injected,
    }
}
