// src/normalize.rs
//! Source normalizer: provider payloads in varying shapes become
//! [`CandidateRecord`]s at the ingestion boundary, so nothing downstream
//! branches on payload shape or field spelling.

use crate::ingest::types::CandidateRecord;
use once_cell::sync::OnceCell;
use regex::Regex;
use serde_json::Value;

/// Normalize free text: decode entities, strip tags, straighten quotes,
/// collapse whitespace.
pub fn clean_text(s: &str) -> String {
    // 1) HTML entity decode
    let mut out = html_escape::decode_html_entities(s).to_string();

    // 2) Strip HTML tags
    static RE_TAGS: OnceCell<Regex> = OnceCell::new();
    let re_tags = RE_TAGS.get_or_init(|| Regex::new(r"(?is)</?[^>]+>").unwrap());
    out = re_tags.replace_all(&out, "").to_string();

    // 3) Normalize “ ” ‘ ’ « » to ASCII quotes
    out = out
        .replace(['\u{201C}', '\u{201D}', '\u{00AB}', '\u{00BB}'], "\"")
        .replace(['\u{2018}', '\u{2019}'], "'");

    // 4) Collapse whitespace
    static RE_WS: OnceCell<Regex> = OnceCell::new();
    let re_ws = RE_WS.get_or_init(|| Regex::new(r"\s+").unwrap());
    out = re_ws.replace_all(&out, " ").to_string();
    out = out.trim().to_string();

    // 5) Length cap: 1500 chars
    if out.chars().count() > 1500 {
        out = out.chars().take(1500).collect();
    }

    out
}

/// Build one record from already-extracted parts. Returns `None` when both
/// title and url are empty after cleaning; such an item can be neither
/// deduplicated nor displayed.
pub fn record_from_parts(
    title: &str,
    url: &str,
    description: &str,
    image: &str,
    published_at: &str,
    source: &str,
) -> Option<CandidateRecord> {
    let title = clean_text(title);
    let url = url.trim().to_string();
    if title.is_empty() && url.is_empty() {
        return None;
    }
    Some(CandidateRecord {
        title,
        url,
        description: clean_text(description),
        image: image.trim().to_string(),
        published_at: published_at.trim().to_string(),
        source: clean_text(source),
    })
}

/// First non-empty string under any of the given keys.
fn first_str<'a>(obj: &'a Value, keys: &[&str]) -> &'a str {
    for key in keys {
        if let Some(s) = obj.get(*key).and_then(Value::as_str) {
            if !s.trim().is_empty() {
                return s;
            }
        }
    }
    ""
}

fn record_from_item(item: &Value) -> Option<CandidateRecord> {
    let source = if let Some(s) = item.get("source") {
        // GNews nests the source as {"name": .., "url": ..}.
        match s {
            Value::String(name) => name.as_str(),
            Value::Object(_) => first_str(s, &["name"]),
            _ => "",
        }
    } else {
        first_str(item, &["sourceName"])
    };
    record_from_parts(
        first_str(item, &["title"]),
        first_str(item, &["url", "link"]),
        first_str(item, &["description", "summary"]),
        first_str(item, &["image", "imageUrl", "urlToImage"]),
        first_str(item, &["publishedAt", "pubDate", "published_at", "date"]),
        source,
    )
}

/// Normalize a whole payload. Providers return a flat list, an object with
/// `articles`/`more`/`items` arrays, or occasionally a single bare item.
/// Returns the records plus the count of items dropped for lacking both
/// title and url.
pub fn records_from_payload(payload: &Value) -> (Vec<CandidateRecord>, usize) {
    let mut items: Vec<&Value> = Vec::new();
    match payload {
        Value::Array(list) => items.extend(list.iter()),
        Value::Object(map) => {
            for key in ["articles", "more", "items"] {
                if let Some(Value::Array(list)) = map.get(key) {
                    items.extend(list.iter());
                }
            }
            if items.is_empty() && map.contains_key("title") {
                items.push(payload);
            }
        }
        _ => {}
    }

    let mut records = Vec::with_capacity(items.len());
    let mut dropped = 0usize;
    for item in items {
        match record_from_item(item) {
            Some(r) => records.push(r),
            None => dropped += 1,
        }
    }
    (records, dropped)
}

/// Split a feed headline of the form "Headline - Publisher" into both parts.
/// The separator must sit past the first third of the string so hyphenated
/// headlines ("Zanu-PF ...") survive intact.
pub fn extract_source_from_title(title: &str) -> Option<(String, String)> {
    let idx = title.rfind(" - ")?;
    if idx == 0 || idx * 10 <= title.len() * 3 {
        return None;
    }
    let headline = title[..idx].trim();
    let source = title[idx + 3..].trim();
    if headline.is_empty() || source.is_empty() {
        return None;
    }
    Some((headline.to_string(), source.to_string()))
}
