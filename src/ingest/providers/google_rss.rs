// src/ingest/providers/google_rss.rs
use anyhow::{Context, Result};
use async_trait::async_trait;
use metrics::{counter, histogram};
use quick_xml::de::from_str;
use serde::Deserialize;

use crate::ingest::providers::{order_and_cap, USER_AGENT};
use crate::ingest::types::{CandidateRecord, NewsProvider};
use crate::normalize::{extract_source_from_title, record_from_parts};

const RSS_ENDPOINT: &str = "https://news.google.com/rss/search";
const HTTP_TIMEOUT_SECS: u64 = 15;

#[derive(Debug, Deserialize)]
struct Rss {
    channel: Channel,
}
#[derive(Debug, Deserialize)]
struct Channel {
    #[serde(rename = "item", default)]
    item: Vec<Item>,
}
#[derive(Debug, Deserialize)]
struct Item {
    title: Option<String>,
    link: Option<String>,
    #[serde(rename = "pubDate")]
    pub_date: Option<String>,
    description: Option<String>,
    source: Option<SourceTag>,
}
#[derive(Debug, Deserialize)]
struct SourceTag {
    #[serde(rename = "$text")]
    name: Option<String>,
}

/// Google News search RSS. Keyless fallback when GNews is unavailable.
pub struct GoogleRssProvider {
    page_size: usize,
    mode: Mode,
}

enum Mode {
    Fixture(String),
    Http {
        terms: String,
        client: reqwest::Client,
    },
}

impl GoogleRssProvider {
    /// Parse a canned feed instead of calling the network.
    pub fn from_fixture_str(feed: &str, page_size: usize) -> Self {
        Self {
            page_size,
            mode: Mode::Fixture(feed.to_string()),
        }
    }

    /// `terms` are space-separated search words, e.g. "Zimbabwe business economy".
    pub fn from_http(terms: &str, page_size: usize) -> Self {
        Self {
            page_size,
            mode: Mode::Http {
                terms: terms.to_string(),
                client: reqwest::Client::new(),
            },
        }
    }

    fn parse_feed_str(&self, s: &str) -> Result<Vec<CandidateRecord>> {
        let t0 = std::time::Instant::now();
        let xml_clean = scrub_html_entities_for_xml(s);
        let rss: Rss = from_str(&xml_clean).context("parsing google news rss xml")?;

        let mut records = Vec::with_capacity(rss.channel.item.len());
        let mut dropped = 0usize;
        for it in rss.channel.item {
            let raw_title = it.title.as_deref().unwrap_or_default();
            // Feed titles carry a " - Publisher" suffix; the <source> tag is
            // authoritative when present, the suffix is the fallback.
            let tagged = it
                .source
                .as_ref()
                .and_then(|s| s.name.as_deref())
                .map(str::trim)
                .filter(|s| !s.is_empty());
            let (headline, source) = match tagged {
                Some(name) => (
                    extract_source_from_title(raw_title)
                        .map(|(h, _)| h)
                        .unwrap_or_else(|| raw_title.to_string()),
                    name.to_string(),
                ),
                None => extract_source_from_title(raw_title)
                    .unwrap_or_else(|| (raw_title.to_string(), String::new())),
            };

            match record_from_parts(
                &headline,
                it.link.as_deref().unwrap_or_default(),
                it.description.as_deref().unwrap_or_default(),
                "",
                it.pub_date.as_deref().unwrap_or_default(),
                &source,
            ) {
                Some(r) => records.push(r),
                None => dropped += 1,
            }
        }

        let ms = t0.elapsed().as_secs_f64() * 1_000.0;
        histogram!("ingest_parse_ms").record(ms);
        counter!("ingest_records_total").increment(records.len() as u64);
        if dropped > 0 {
            counter!("ingest_normalizer_dropped_total").increment(dropped as u64);
            tracing::debug!(dropped, provider = "google-rss", "items lacking both title and url");
        }
        Ok(order_and_cap(records, self.page_size))
    }
}

#[async_trait]
impl NewsProvider for GoogleRssProvider {
    async fn fetch_latest(&self) -> Result<Vec<CandidateRecord>> {
        match &self.mode {
            Mode::Fixture(s) => self.parse_feed_str(s),

            Mode::Http { terms, client } => {
                let body = client
                    .get(RSS_ENDPOINT)
                    .query(&[
                        ("q", terms.as_str()),
                        ("hl", "en"),
                        ("gl", "US"),
                        ("ceid", "US:en"),
                    ])
                    .header(reqwest::header::USER_AGENT, USER_AGENT)
                    .timeout(std::time::Duration::from_secs(HTTP_TIMEOUT_SECS))
                    .send()
                    .await
                    .context("google rss http get()")?
                    .text()
                    .await
                    .context("google rss http .text()")?;
                self.parse_feed_str(&body)
            }
        }
    }

    fn name(&self) -> &'static str {
        "google-rss"
    }
}

fn scrub_html_entities_for_xml(s: &str) -> String {
    s.replace("&nbsp;", " ")
        .replace("&ndash;", "-")
        .replace("&mdash;", "-")
        .replace("&ldquo;", "\"")
        .replace("&rdquo;", "\"")
        .replace("&lsquo;", "'")
        .replace("&rsquo;", "'")
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>"Zimbabwe business" - Google News</title>
    <item>
      <title>Zimbabwe gold deliveries hit record - NewsDay</title>
      <link>https://example.com/gold</link>
      <pubDate>Fri, 21 Aug 2026 07:45:00 GMT</pubDate>
      <description>&lt;a href="https://example.com/gold"&gt;Gold deliveries&lt;/a&gt;&nbsp;rose sharply.</description>
      <source url="https://newsday.co.zw">NewsDay</source>
    </item>
    <item>
      <title>Tobacco auction floors open early - The Herald</title>
      <link>https://example.com/tobacco</link>
      <pubDate>Thu, 20 Aug 2026 05:10:00 GMT</pubDate>
      <description>Floors opened ahead of schedule.</description>
    </item>
    <item>
      <title></title>
      <link></link>
    </item>
  </channel>
</rss>"#;

    #[tokio::test]
    async fn fixture_parses_items() {
        let p = GoogleRssProvider::from_fixture_str(FIXTURE, 10);
        let records = p.fetch_latest().await.unwrap();
        assert_eq!(records.len(), 2);

        let gold = &records[0];
        assert_eq!(gold.title, "Zimbabwe gold deliveries hit record");
        assert_eq!(gold.source, "NewsDay");
        assert_eq!(gold.url, "https://example.com/gold");
        assert_eq!(gold.description, "Gold deliveries rose sharply.");
        assert_eq!(gold.published_at, "Fri, 21 Aug 2026 07:45:00 GMT");
    }

    #[tokio::test]
    async fn title_suffix_is_fallback_source() {
        let p = GoogleRssProvider::from_fixture_str(FIXTURE, 10);
        let records = p.fetch_latest().await.unwrap();
        let tobacco = &records[1];
        assert_eq!(tobacco.title, "Tobacco auction floors open early");
        assert_eq!(tobacco.source, "The Herald");
    }

    #[tokio::test]
    async fn empty_channel_is_ok_and_empty() {
        let feed = r#"<?xml version="1.0"?><rss version="2.0"><channel><title>t</title></channel></rss>"#;
        let p = GoogleRssProvider::from_fixture_str(feed, 10);
        let records = p.fetch_latest().await.unwrap();
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn broken_xml_is_an_error() {
        let p = GoogleRssProvider::from_fixture_str("<rss><channel>", 10);
        assert!(p.fetch_latest().await.is_err());
    }
}
