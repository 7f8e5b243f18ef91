// src/ingest/providers/gnews.rs
use anyhow::{Context, Result};
use async_trait::async_trait;
use metrics::{counter, histogram};
use serde_json::Value;

use crate::ingest::providers::{order_and_cap, USER_AGENT};
use crate::ingest::types::{CandidateRecord, NewsProvider};
use crate::normalize::records_from_payload;

const GNEWS_ENDPOINT: &str = "https://gnews.io/api/v4/search";
const HTTP_TIMEOUT_SECS: u64 = 15;

/// GNews search API. Preferred upstream when an API key is configured.
pub struct GnewsProvider {
    page_size: usize,
    mode: Mode,
}

enum Mode {
    Fixture(String),
    Http {
        query: String,
        api_key: String,
        client: reqwest::Client,
    },
}

impl GnewsProvider {
    /// Parse a canned payload instead of calling the network.
    pub fn from_fixture_str(payload: &str, page_size: usize) -> Self {
        Self {
            page_size,
            mode: Mode::Fixture(payload.to_string()),
        }
    }

    pub fn from_http(query: &str, api_key: &str, page_size: usize) -> Self {
        Self {
            page_size,
            mode: Mode::Http {
                query: query.to_string(),
                api_key: api_key.to_string(),
                client: reqwest::Client::new(),
            },
        }
    }

    fn parse_payload_str(&self, s: &str) -> Result<Vec<CandidateRecord>> {
        let t0 = std::time::Instant::now();
        let payload: Value = serde_json::from_str(s).context("parsing gnews json")?;
        let (records, dropped) = records_from_payload(&payload);

        let ms = t0.elapsed().as_secs_f64() * 1_000.0;
        histogram!("ingest_parse_ms").record(ms);
        counter!("ingest_records_total").increment(records.len() as u64);
        if dropped > 0 {
            counter!("ingest_normalizer_dropped_total").increment(dropped as u64);
            tracing::debug!(dropped, provider = "gnews", "items lacking both title and url");
        }
        Ok(order_and_cap(records, self.page_size))
    }
}

#[async_trait]
impl NewsProvider for GnewsProvider {
    async fn fetch_latest(&self) -> Result<Vec<CandidateRecord>> {
        match &self.mode {
            Mode::Fixture(s) => self.parse_payload_str(s),

            Mode::Http {
                query,
                api_key,
                client,
            } => {
                let max = self.page_size.to_string();
                let body = client
                    .get(GNEWS_ENDPOINT)
                    .query(&[
                        ("q", query.as_str()),
                        ("apikey", api_key.as_str()),
                        ("lang", "en"),
                        ("max", max.as_str()),
                        ("sortby", "publishedAt"),
                        ("nullable", "image"),
                    ])
                    .header(reqwest::header::USER_AGENT, USER_AGENT)
                    .timeout(std::time::Duration::from_secs(HTTP_TIMEOUT_SECS))
                    .send()
                    .await
                    .context("gnews http get()")?
                    .text()
                    .await
                    .context("gnews http .text()")?;
                self.parse_payload_str(&body)
            }
        }
    }

    fn name(&self) -> &'static str {
        "gnews"
    }
}
