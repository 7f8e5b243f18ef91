// src/freshness.rs
//! Timestamp parsing and the age-window gate.
//!
//! Upstream `publishedAt` strings arrive in whatever shape the provider
//! emits. Parsing tries a fixed sequence of formats; a record whose date
//! parses in none of them is treated as stale everywhere (fail closed),
//! so unknown age never slips into output.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use time::format_description::well_known::Rfc3339;
use time::{OffsetDateTime, UtcOffset};

/// Parse an upstream timestamp into UTC. Attempts, in order:
/// 1. offset-qualified ISO-8601 / RFC 3339 ("2026-08-20T07:15:00+02:00", trailing "Z" included)
/// 2. trailing-"Z" date-time that the strict RFC 3339 parser rejected
/// 3. bare calendar date ("2026-08-20", taken as midnight UTC)
/// 4. RFC 2822 feed date ("Wed, 19 Aug 2026 15:31:13 GMT")
pub fn parse_published_at(raw: &str) -> Option<DateTime<Utc>> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = OffsetDateTime::parse(s, &Rfc3339) {
        return to_chrono_utc(dt);
    }

    if let Some(prefix) = s.strip_suffix('Z') {
        if let Ok(naive) = NaiveDateTime::parse_from_str(prefix, "%Y-%m-%dT%H:%M:%S") {
            return Some(naive.and_utc());
        }
    }

    if let Ok(day) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return day.and_hms_opt(0, 0, 0).map(|n| n.and_utc());
    }

    // Feed dates use obsolete zone names ("GMT"), which chrono accepts.
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.with_timezone(&Utc));
    }

    None
}

fn to_chrono_utc(dt: OffsetDateTime) -> Option<DateTime<Utc>> {
    let unix = dt.to_offset(UtcOffset::UTC).unix_timestamp();
    DateTime::<Utc>::from_timestamp(unix, 0)
}

/// Whole days between publication and `now`, truncated. Negative for
/// future-dated records.
pub fn age_in_days(published: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (now - published).num_days()
}

/// Age gate: parseable and at most `max_age_days` old. The window is
/// caller-supplied; spotlight and digest use different widths.
pub fn is_fresh(published_at: &str, max_age_days: i64, now: DateTime<Utc>) -> bool {
    match parse_published_at(published_at) {
        Some(dt) => age_in_days(dt, now) <= max_age_days,
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 25, 12, 0, 0).unwrap()
    }

    #[test]
    fn parses_offset_qualified_iso() {
        let dt = parse_published_at("2026-08-20T07:15:00+02:00").unwrap();
        assert_eq!(dt.timestamp(), 1_787_202_900);
    }

    #[test]
    fn parses_trailing_z() {
        let dt = parse_published_at("2026-08-20T05:15:00Z").unwrap();
        assert_eq!(dt.timestamp(), 1_787_202_900);
    }

    #[test]
    fn parses_bare_date_as_midnight_utc() {
        let dt = parse_published_at("2026-08-20").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2026, 8, 20, 0, 0, 0).unwrap());
    }

    #[test]
    fn parses_rfc2822_feed_date() {
        let dt = parse_published_at("Wed, 19 Aug 2026 15:31:13 GMT").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2026, 8, 19, 15, 31, 13).unwrap());
    }

    #[test]
    fn garbage_and_empty_do_not_parse() {
        assert!(parse_published_at("").is_none());
        assert!(parse_published_at("yesterday").is_none());
        assert!(parse_published_at("20/08/2026").is_none());
        assert!(parse_published_at("1692000000").is_none());
    }

    #[test]
    fn unparseable_is_never_fresh() {
        assert!(!is_fresh("no date here", 10_000, now()));
        assert!(!is_fresh("", 10_000, now()));
    }

    #[test]
    fn age_window_is_inclusive() {
        // Exactly 14 whole days old.
        assert!(is_fresh("2026-08-11T12:00:00Z", 14, now()));
        // 14 days and change still truncates to 14.
        assert!(is_fresh("2026-08-11T03:00:00Z", 14, now()));
        // A full 15th day fails.
        assert!(!is_fresh("2026-08-10T12:00:00Z", 14, now()));
    }

    #[test]
    fn forty_days_old_fails_a_thirty_day_window() {
        assert!(!is_fresh("2026-07-16T12:00:00Z", 30, now()));
    }

    #[test]
    fn future_dates_pass() {
        // Providers occasionally emit slightly-ahead timestamps; negative age
        // passes any non-negative window.
        assert!(is_fresh("2026-08-26T00:00:00Z", 0, now()));
        assert_eq!(
            age_in_days(Utc.with_ymd_and_hms(2026, 8, 26, 0, 0, 0).unwrap(), now()),
            0
        );
    }

    #[test]
    fn partial_day_truncates_to_whole_days() {
        // 13 days and 23 hours old -> 13 days.
        let published = Utc.with_ymd_and_hms(2026, 8, 11, 13, 0, 0).unwrap();
        assert_eq!(age_in_days(published, now()), 13);
    }
}
