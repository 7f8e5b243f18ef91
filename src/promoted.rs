// src/promoted.rs
//! In-house content from the local CMS metadata index. Entries flagged
//! `promote` become candidate records destined for the front of the
//! secondary list; everything else in the index is ignored.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::ingest::types::CandidateRecord;
use crate::normalize::record_from_parts;

/// One row of `content/articles/index.json`.
#[derive(Debug, Clone, Deserialize)]
pub struct IndexEntry {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub slug: String,
    /// Explicit link; when empty the slug is resolved against the site base.
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub promote: bool,
}

/// Load promoted entries in index order. A missing index is the common
/// case and silent; a corrupt one is logged and skipped, never fatal.
pub fn load_promoted(
    index_path: &Path,
    site_base_url: &str,
    site_name: &str,
) -> Vec<CandidateRecord> {
    let raw = match fs::read_to_string(index_path) {
        Ok(raw) => raw,
        Err(e) => {
            debug!(path = %index_path.display(), error = %e, "no content index");
            return Vec::new();
        }
    };
    let entries: Vec<IndexEntry> = match serde_json::from_str(&raw) {
        Ok(entries) => entries,
        Err(e) => {
            warn!(path = %index_path.display(), error = %e, "content index unreadable, skipping");
            return Vec::new();
        }
    };

    let base = site_base_url.trim_end_matches('/');
    entries
        .into_iter()
        .filter(|e| e.promote)
        .filter_map(|e| {
            let url = if !e.url.trim().is_empty() {
                e.url.trim().to_string()
            } else if !e.slug.trim().is_empty() {
                format!("{base}/articles/{}.html", e.slug.trim())
            } else {
                String::new()
            };
            record_from_parts(&e.title, &url, &e.summary, &e.image, &e.date, site_name)
        })
        .collect()
}
