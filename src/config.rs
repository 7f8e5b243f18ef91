// src/config.rs
//! Curator configuration: one TOML file, every section optional, env
//! overrides for the values that differ between environments (API key,
//! state paths). Unset sections fall back to the built-in defaults so an
//! empty file and no file behave the same.

use std::path::{Path, PathBuf};
use std::{env, fs};

use anyhow::Result;
use serde::Deserialize;
use tracing::debug;

use crate::curate::{
    DEFAULT_DIGEST_WINDOW_DAYS, DEFAULT_PRIMARY_CAP, DEFAULT_SECONDARY_CAP,
    DEFAULT_SPOTLIGHT_WINDOW_DAYS,
};
use crate::similarity::DEFAULT_SIMILARITY_THRESHOLD;
use crate::snapshot::{DEFAULT_SNAPSHOT_MAX_AGE_DAYS, DEFAULT_SNAPSHOT_MAX_RECORDS};

// --- env defaults & names ---
pub const DEFAULT_CONFIG_PATH: &str = "config/curator.toml";
pub const DEFAULT_CASCADE_QUOTA: usize = 8;
pub const DEFAULT_PAGE_SIZE: usize = 10;

pub const ENV_CONFIG_PATH: &str = "CURATOR_CONFIG_PATH";
pub const ENV_GNEWS_API_KEY: &str = "GNEWS_API_KEY";
pub const ENV_SNAPSHOT_PATH: &str = "CURATOR_SNAPSHOT_PATH";
pub const ENV_OUTPUT_PATH: &str = "CURATOR_OUTPUT_PATH";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CuratorConfig {
    pub curation: CurationSection,
    pub cascade: CascadeSection,
    pub relevance: RelevanceSection,
    pub reputation: ReputationSection,
    pub snapshot: SnapshotSection,
    pub output: OutputSection,
    pub content: ContentSection,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CurationSection {
    pub similarity_threshold: f64,
    pub spotlight_window_days: i64,
    pub digest_window_days: i64,
    pub primary_cap: usize,
    pub secondary_cap: usize,
}

impl Default for CurationSection {
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

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CascadeSection {
    /// Stop invoking providers once this many relevant records accumulate.
    pub quota: usize,
    /// Per-provider batch cap and the GNews `max` parameter.
    pub page_size: usize,
    /// "ENV" (or empty) reads GNEWS_API_KEY; still-empty disables GNews.
    pub gnews_api_key: String,
    pub gnews_queries: Vec<String>,
    /// Google News RSS search terms, one provider per entry.
    pub rss_queries: Vec<String>,
}

impl Default for CascadeSection {
    fn default() -> Self {
        Self {
            quota: DEFAULT_CASCADE_QUOTA,
            page_size: DEFAULT_PAGE_SIZE,
            gnews_api_key: "ENV".to_string(),
            gnews_queries: [
                "Zimbabwe business OR Zimbabwe economy OR Zimbabwe finance OR Zimbabwe trade",
                "Zimbabwe technology OR Zimbabwe tech OR Zimbabwe digital OR Zimbabwe innovation",
                "Zimbabwe entertainment OR Zimbabwe music OR Zimbabwe arts OR Zimbabwe culture OR Zimbabwe film",
                "Zimbabwe sports OR Zimbabwe cricket OR Zimbabwe football OR Zimbabwe rugby OR Zimbabwe athletics",
                "Zimbabwe science OR Zimbabwe research OR Zimbabwe environment OR Zimbabwe wildlife",
                "Zimbabwe health OR Zimbabwe medical OR Zimbabwe hospital OR Zimbabwe disease",
            ]
            .map(str::to_string)
            .to_vec(),
            rss_queries: [
                "Zimbabwe business economy finance trade",
                "Zimbabwe technology tech digital innovation",
                "Zimbabwe entertainment music arts culture film",
                "Zimbabwe sports cricket football rugby athletics",
                "Zimbabwe science research environment wildlife",
                "Zimbabwe health medical hospital disease",
            ]
            .map(str::to_string)
            .to_vec(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RelevanceSection {
    pub extra_publishers: Vec<String>,
    pub extra_keywords: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ReputationSection {
    pub extra_sources: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SnapshotSection {
    pub path: String,
    pub max_records: usize,
    pub max_age_days: i64,
}

impl Default for SnapshotSection {
    fn default() -> Self {
        Self {
            path: "data/snapshot.json".to_string(),
            max_records: DEFAULT_SNAPSHOT_MAX_RECORDS,
            max_age_days: DEFAULT_SNAPSHOT_MAX_AGE_DAYS,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputSection {
    pub path: String,
    /// Prometheus textfile target; unset disables the export.
    pub metrics_path: Option<String>,
}

impl Default for OutputSection {
    fn default() -> Self {
        Self {
            path: "data/curated.json".to_string(),
            metrics_path: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ContentSection {
    pub index_path: String,
    pub site_base_url: String,
    pub site_name: String,
}

impl Default for ContentSection {
    fn default() -> Self {
        Self {
            index_path: "content/articles/index.json".to_string(),
            site_base_url: "https://www.mutapatimes.com".to_string(),
            site_name: "The Mutapa Times".to_string(),
        }
    }
}

impl CuratorConfig {
    /// Resolve from CURATOR_CONFIG_PATH, then the default path, then
    /// built-in defaults when no file exists at the default path.
    pub fn load() -> Result<Self> {
        if let Ok(p) = env::var(ENV_CONFIG_PATH) {
            return Self::load_from(Path::new(&p));
        }
        let path = Path::new(DEFAULT_CONFIG_PATH);
        if path.exists() {
            return Self::load_from(path);
        }
        debug!("no config file, using built-in defaults");
        let mut cfg = Self::default();
        cfg.apply_env_overrides();
        cfg.sanitize();
        Ok(cfg)
    }

    /// Load from an explicit path; the file must exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            anyhow::anyhow!("Failed to read curator config at {}: {}", path.display(), e)
        })?;
        let mut cfg = Self::from_toml_str(&content)?;
        cfg.apply_env_overrides();
        Ok(cfg)
    }

    /// Parse from a TOML string. Pure; no env access.
    pub fn from_toml_str(toml_str: &str) -> Result<Self> {
        let mut cfg: CuratorConfig = toml::from_str(toml_str)?;
        cfg.sanitize();
        Ok(cfg)
    }

    fn apply_env_overrides(&mut self) {
        let key = self.cascade.gnews_api_key.trim();
        if key.is_empty() || key.eq_ignore_ascii_case("env") {
            // Absent key is a degraded mode (feed fallback), not an error.
            self.cascade.gnews_api_key = env::var(ENV_GNEWS_API_KEY).unwrap_or_default();
        }
        if let Ok(p) = env::var(ENV_SNAPSHOT_PATH) {
            self.snapshot.path = p;
        }
        if let Ok(p) = env::var(ENV_OUTPUT_PATH) {
            self.output.path = p;
        }
    }

    fn sanitize(&mut self) {
        if !(0.0..=1.0).contains(&self.curation.similarity_threshold)
            || !self.curation.similarity_threshold.is_finite()
        {
            self.curation.similarity_threshold = DEFAULT_SIMILARITY_THRESHOLD;
        }
        if self.curation.spotlight_window_days < 0 {
            self.curation.spotlight_window_days = DEFAULT_SPOTLIGHT_WINDOW_DAYS;
        }
        if self.curation.digest_window_days < 0 {
            self.curation.digest_window_days = DEFAULT_DIGEST_WINDOW_DAYS;
        }
        self.cascade.quota = self.cascade.quota.max(1);
        self.cascade.page_size = self.cascade.page_size.max(1);
        if self.snapshot.max_age_days < 0 {
            self.snapshot.max_age_days = DEFAULT_SNAPSHOT_MAX_AGE_DAYS;
        }
    }

    pub fn snapshot_path(&self) -> PathBuf {
        PathBuf::from(&self.snapshot.path)
    }

    pub fn output_path(&self) -> PathBuf {
        PathBuf::from(&self.output.path)
    }

    pub fn content_index_path(&self) -> PathBuf {
        PathBuf::from(&self.content.index_path)
    }
}
