// src/similarity.rs
//! Near-duplicate headline detection via normalized token overlap.
//!
//! Overlapping providers re-report the same story with reworded headlines and
//! different attributed sources. One shared primitive decides "same story":
//! it is used both for cross-provider dedup within a run and for suppressing
//! repeats against the persisted snapshot.

use once_cell::sync::OnceCell;
use regex::Regex;
use std::collections::HashSet;

/// Word-overlap ratio at or above which two headlines count as the same story.
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.65;

/// Lowercase, strip non-word characters, collapse whitespace.
pub fn normalize_title(title: &str) -> String {
    static RE_NON_WORD: OnceCell<Regex> = OnceCell::new();
    static RE_WS: OnceCell<Regex> = OnceCell::new();
    let re_non_word = RE_NON_WORD.get_or_init(|| Regex::new(r"[^\w\s]").unwrap());
    let re_ws = RE_WS.get_or_init(|| Regex::new(r"\s+").unwrap());

    let lowered = title.to_lowercase();
    let stripped = re_non_word.replace_all(lowered.trim(), "");
    let collapsed = re_ws.replace_all(&stripped, " ");
    collapsed.trim().to_string()
}

/// Token set of a normalized title. Transient, comparison-only.
pub fn title_tokens(title: &str) -> HashSet<String> {
    normalize_title(title)
        .split_whitespace()
        .map(|t| t.to_string())
        .collect()
}

/// True when two headlines are near-duplicates.
///
/// Rules, in order:
/// 1. Empty token sets never match.
/// 2. If either normalized string contains the other, match unconditionally
///    (wire copy reused with an extra clause bolted on).
/// 3. Otherwise Jaccard overlap |a ∩ b| / |a ∪ b| >= threshold.
///
/// Symmetric, deterministic, stateless.
pub fn titles_are_similar(a: &str, b: &str, threshold: f64) -> bool {
    let na = normalize_title(a);
    let nb = normalize_title(b);

    let ta: HashSet<&str> = na.split_whitespace().collect();
    let tb: HashSet<&str> = nb.split_whitespace().collect();
    if ta.is_empty() || tb.is_empty() {
        return false;
    }

    if na.contains(nb.as_str()) || nb.contains(na.as_str()) {
        return true;
    }

    let intersection = ta.intersection(&tb).count();
    let union = ta.union(&tb).count();
    (intersection as f64) / (union as f64) >= threshold
}
