// src/ingest/providers/mod.rs
pub mod gnews;
pub mod google_rss;

use std::collections::HashSet;

use crate::freshness::parse_published_at;
use crate::ingest::types::CandidateRecord;

/// Identifies us to upstreams on every fetch.
pub(crate) const USER_AGENT: &str = "MutapaTimes/1.0 (news aggregator)";

/// Batch hygiene shared by providers: drop same-url repeats within one
/// response, order newest first, cap the batch.
pub(crate) fn order_and_cap(records: Vec<CandidateRecord>, cap: usize) -> Vec<CandidateRecord> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut unique = Vec::with_capacity(records.len());
    for r in records {
        if !r.url.is_empty() && !seen.insert(r.url.clone()) {
            continue;
        }
        unique.push(r);
    }
    unique.sort_by_key(|r| {
        std::cmp::Reverse(
            parse_published_at(&r.published_at)
                .map(|dt| dt.timestamp())
                .unwrap_or(i64::MIN),
        )
    });
    unique.truncate(cap);
    unique
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(url: &str, published_at: &str) -> CandidateRecord {
        CandidateRecord {
            title: format!("title for {url}"),
            url: url.to_string(),
            description: String::new(),
            image: String::new(),
            published_at: published_at.to_string(),
            source: String::new(),
        }
    }

    #[test]
    fn repeats_within_batch_collapse() {
        let out = order_and_cap(
            vec![
                record("https://e.com/a", "2026-08-20T10:00:00Z"),
                record("https://e.com/a", "2026-08-21T10:00:00Z"),
                record("https://e.com/b", "2026-08-19T10:00:00Z"),
            ],
            10,
        );
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn newest_first_and_capped() {
        let out = order_and_cap(
            vec![
                record("https://e.com/a", "2026-08-18T10:00:00Z"),
                record("https://e.com/b", "2026-08-21T10:00:00Z"),
                record("https://e.com/c", "2026-08-20T10:00:00Z"),
            ],
            2,
        );
        assert_eq!(out[0].url, "https://e.com/b");
        assert_eq!(out[1].url, "https://e.com/c");
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn unparseable_dates_sink_to_the_end() {
        let out = order_and_cap(
            vec![
                record("https://e.com/a", "not a date"),
                record("https://e.com/b", "2026-08-21T10:00:00Z"),
            ],
            10,
        );
        assert_eq!(out[0].url, "https://e.com/b");
        assert_eq!(out[1].url, "https://e.com/a");
    }

    #[test]
    fn urlless_records_are_kept() {
        let out = order_and_cap(
            vec![record("", "2026-08-20T10:00:00Z"), record("", "2026-08-21T10:00:00Z")],
            10,
        );
        assert_eq!(out.len(), 2);
    }
}
