// src/relevance.rs
//! Relevance gate: coarse allow-list check that a record concerns Zimbabwe.
//!
//! Two ways in: the attributed source is a known local publisher, or the
//! title/description contains a subject keyword. Tuned for recall over
//! precision; a false positive costs one digest slot, a false negative
//! drops a real story.

use crate::ingest::types::CandidateRecord;

/* ----------------------------
Seed vocabularies
---------------------------- */

/// Local publishers whose output is on-topic regardless of wording.
const PUBLISHER_SEED: &[&str] = &[
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
    "pindula",
    "the zimbabwe mail",
];

/// Subject keywords matched against title + description.
const KEYWORD_SEED: &[&str] = &[
    "zimbabwe",
    "zimbabwean",
    "harare",
    "bulawayo",
    "victoria falls",
    "zanu-pf",
    "zanu pf",
    "mnangagwa",
    "zim dollar",
    "zig currency",
    "rtgs",
    "zimra",
    "zimsec",
];

/* ----------------------------
Filter
---------------------------- */

/// Compiled allow-lists, everything lowercased once at construction.
#[derive(Debug, Clone)]
pub struct RelevanceFilter {
    publishers: Vec<String>,
    keywords: Vec<String>,
}

impl RelevanceFilter {
    pub fn default_seed() -> Self {
        Self {
            publishers: PUBLISHER_SEED.iter().map(|s| s.to_string()).collect(),
            keywords: KEYWORD_SEED.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Seed plus configured extras. Extras extend, never replace.
    pub fn with_extras<P, K>(extra_publishers: P, extra_keywords: K) -> Self
    where
        P: IntoIterator<Item = String>,
        K: IntoIterator<Item = String>,
    {
        let mut filter = Self::default_seed();
        for p in extra_publishers {
            let p = p.trim().to_lowercase();
            if !p.is_empty() && !filter.publishers.contains(&p) {
                filter.publishers.push(p);
            }
        }
        for k in extra_keywords {
            let k = k.trim().to_lowercase();
            if !k.is_empty() && !filter.keywords.contains(&k) {
                filter.keywords.push(k);
            }
        }
        filter
    }

    /// True if the source is a known local publisher or the text mentions
    /// the subject. Pure; no I/O.
    pub fn is_relevant(&self, record: &CandidateRecord) -> bool {
        let source = record.source.to_lowercase();
        if !source.is_empty() && self.publishers.iter().any(|p| source.contains(p.as_str())) {
            return true;
        }
        let haystack = format!("{} {}", record.title, record.description).to_lowercase();
        self.keywords.iter().any(|k| haystack.contains(k.as_str()))
    }
}

impl Default for RelevanceFilter {
    fn default() -> Self {
        Self::default_seed()
    }
}

/* ----------------------------
Tests
---------------------------- */
