// src/lib.rs
// Public library surface for integration tests (and the curator binary).

pub mod config;
pub mod curate;
pub mod freshness;
pub mod ingest;
pub mod metrics;
pub mod normalize;
pub mod pipeline;
pub mod promoted;
pub mod relevance;
pub mod reputation;
pub mod similarity;
pub mod snapshot;

// ---- Re-exports for stable public API ----
pub use crate::config::CuratorConfig;
pub use crate::curate::{merge_and_curate, CuratedOutput, CurationParams};
pub use crate::ingest::types::{CandidateRecord, NewsProvider};
pub use crate::ingest::{run_cascade, CascadeOutcome};
pub use crate::pipeline::RunReport;
pub use crate::similarity::titles_are_similar;
