// src/snapshot.rs
//! Persisted snapshot of previously accepted records, bounded by count and
//! age, so runs that fetch little or nothing new still produce a stable
//! output. Any defect in the file (missing, unparseable, checksum
//! mismatch) downgrades to an empty cold start, never an error.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::{debug, warn};

use crate::freshness::{age_in_days, parse_published_at};
use crate::ingest::types::CandidateRecord;

pub const DEFAULT_SNAPSHOT_MAX_RECORDS: usize = 50;
pub const DEFAULT_SNAPSHOT_MAX_AGE_DAYS: i64 = 45;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct SnapshotFile {
    #[serde(default)]
    generated_at: String,
    #[serde(default)]
    checksum: String,
    #[serde(default)]
    records: Vec<CandidateRecord>,
}

pub struct SnapshotStore {
    path: PathBuf,
    max_records: usize,
    max_age_days: i64,
}

impl SnapshotStore {
    pub fn new(path: impl Into<PathBuf>, max_records: usize, max_age_days: i64) -> Self {
        Self {
            path: path.into(),
            max_records,
            max_age_days,
        }
    }

    pub async fn load(&self) -> Vec<CandidateRecord> {
        let raw = match fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) => {
                debug!(path = %self.path.display(), error = %e, "no snapshot, cold start");
                return Vec::new();
            }
        };
        let file: SnapshotFile = match serde_json::from_str(&raw) {
            Ok(file) => file,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "snapshot unreadable, cold start");
                return Vec::new();
            }
        };
        if file.checksum != checksum_for(&file.records) {
            warn!(path = %self.path.display(), "snapshot checksum mismatch, cold start");
            return Vec::new();
        }
        file.records
    }

    /// Prune to the age and count bounds, then write. Oldest-by-publish-date
    /// entries are evicted first when over capacity. Write failures are
    /// logged, not fatal; the snapshot only smooths future runs.
    pub async fn store(&self, records: &[CandidateRecord], now: DateTime<Utc>) {
        let pruned = self.prune(records, now);
        let file = SnapshotFile {
            generated_at: now.to_rfc3339(),
            checksum: checksum_for(&pruned),
            records: pruned,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            if let Err(e) = fs::create_dir_all(parent).await {
                warn!("snapshot dir: {e:#}");
            }
        }
        match serde_json::to_vec_pretty(&file) {
            Ok(bytes) => {
                if let Err(e) = fs::write(&self.path, bytes).await {
                    warn!("write snapshot: {e:#}");
                }
            }
            Err(e) => warn!("encode snapshot: {e:#}"),
        }
    }

    fn prune(&self, records: &[CandidateRecord], now: DateTime<Utc>) -> Vec<CandidateRecord> {
        // A record whose date no longer parses cannot be age-bounded; it
        // goes the same way as an over-age one.
        let mut kept: Vec<(i64, CandidateRecord)> = records
            .iter()
            .filter_map(|r| {
                let dt = parse_published_at(&r.published_at)?;
                if age_in_days(dt, now) > self.max_age_days {
                    return None;
                }
                Some((dt.timestamp(), r.clone()))
            })
            .collect();
        kept.sort_by_key(|(ts, _)| std::cmp::Reverse(*ts));
        kept.truncate(self.max_records);
        kept.into_iter().map(|(_, r)| r).collect()
    }
}

fn checksum_for(records: &[CandidateRecord]) -> String {
    use sha2::{Digest, Sha256};
    let bytes = serde_json::to_vec(records).unwrap_or_default();
    let digest = Sha256::digest(&bytes);
    let mut out = String::with_capacity(64);
    for b in digest.iter() {
        use std::fmt::Write as _;
        let _ = write!(&mut out, "{:02x}", b);
    }
    out
}
