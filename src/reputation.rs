// src/reputation.rs
//! # Source Reputation
//!
//! Classifies a record's attributed publisher as reputable or other against
//! a static curated allow-list mixing international wires and regional
//! Zimbabwean outlets.
//!
//! - Case-insensitive substring lookup with light normalization.
//! - The built-in `default_seed()` can be extended (never replaced) from
//!   configuration.
//! - Coarse by design: tiering decides placement, not inclusion, so a miss
//!   only demotes a record to the secondary list.

/// Curated reputable-source list. Entries are normalized needles looked up
/// as substrings of the attributed source name or domain.
#[derive(Debug, Clone)]
pub struct ReputationList {
    entries: Vec<String>,
}

impl ReputationList {
    /// Built-in seed: international outlets plus the regional press that
    /// reliably covers Zimbabwe.
    pub fn default_seed() -> Self {
        let entries = [
            // International
            "reuters",
            "bbc",
            "bloomberg",
            "associated press",
            "ap news",
            "al jazeera",
            "the guardian",
            "financial times",
            "cnn",
            "france 24",
            "voa",
            "africanews",
            // Regional
            "the herald",
            "herald.co.zw",
            "newsday",
            "the chronicle",
            "chronicle.co.zw",
            "zbc",
            "new zimbabwe",
            "newzimbabwe",
            "the standard",
            "zimbabwe independent",
            "bulawayo24",
            "zimlive",
            "the sunday mail",
            "263chat",
            "the zimbabwe mail",
        ]
        .into_iter()
        .map(str::to_string)
        .collect();
        Self { entries }
    }

    /// Seed plus configured extras (normalized, deduplicated).
    pub fn with_extras<I>(extras: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let mut list = Self::default_seed();
        for extra in extras {
            let n = normalize(&extra);
            if !n.is_empty() && !list.entries.contains(&n) {
                list.entries.push(n);
            }
        }
        list
    }

    /// True when any list entry occurs within the normalized name or domain.
    pub fn is_reputable(&self, name_or_domain: &str) -> bool {
        let s = normalize(name_or_domain);
        if s.is_empty() {
            return false;
        }
        self.entries.iter().any(|e| s.contains(e.as_str()))
    }
}

impl Default for ReputationList {
    fn default() -> Self {
        Self::default_seed()
    }
}

/// Lowercase and collapse whitespace; keeps dots so domains match.
fn normalize(s: &str) -> String {
    s.trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
