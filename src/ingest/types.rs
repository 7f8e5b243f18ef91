// src/ingest/types.rs
use anyhow::Result;

/// One normalized item awaiting curation. Built exactly once by the
/// normalizer; afterwards it is only filtered or tiered, never mutated.
///
/// `published_at` stays in its upstream free-text form ("2026-08-20T07:15:00Z",
/// "Wed, 19 Aug 2026 15:31:13 GMT", "2026-08-19", ...); parsing happens at the
/// freshness gate and at sort time.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
pub struct CandidateRecord {
    pub title: String,
    pub url: String, // near-unique key, may be empty
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: String,
    #[serde(rename = "publishedAt", default)]
    pub published_at: String,
    #[serde(default)]
    pub source: String, // attributed publisher, e.g. "Reuters", "NewsDay"
}

#[async_trait::async_trait]
pub trait NewsProvider {
    async fn fetch_latest(&self) -> Result<Vec<CandidateRecord>>;
    fn name(&self) -> &'static str;
}
