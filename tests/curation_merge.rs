// tests/curation_merge.rs
// Merge behaviors that only show up across runs: idempotence over the own
// snapshot, arrival-order insensitivity, mixed-format date ordering, the
// two freshness windows.

use chrono::{DateTime, Duration, TimeZone, Utc};
use rand::seq::SliceRandom;

use mutapa_curator::reputation::ReputationList;
use mutapa_curator::{merge_and_curate, CandidateRecord, CurationParams};

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 8, 25, 12, 0, 0).unwrap()
}

fn days_ago(n: i64) -> String {
    (now() - Duration::days(n))
        .format("%Y-%m-%dT%H:%M:%SZ")
        .to_string()
}

fn record(title: &str, url: &str, source: &str, published_at: &str) -> CandidateRecord {
    CandidateRecord {
        title: title.to_string(),
        url: url.to_string(),
        description: String::new(),
        image: String::new(),
        published_at: published_at.to_string(),
        source: source.to_string(),
    }
}

// Headlines that stay below the similarity threshold pairwise.
fn story(i: usize) -> CandidateRecord {
    const SUBJECTS: &[&str] = &["mining", "farming", "tourism", "banking", "transport"];
    const VERBS: &[&str] = &["expands", "slows", "recovers", "stalls", "rebounds"];
    record(
        &format!(
            "Zimbabwe {} sector {} in week {}",
            SUBJECTS[i % 5],
            VERBS[(i / 5) % 5],
            i + 1
        ),
        &format!("https://example.test/story/{i}"),
        "NewsDay",
        &days_ago((i % 10) as i64),
    )
}

#[test]
fn rerunning_over_the_own_snapshot_is_idempotent() {
    let reputation = ReputationList::default_seed();
    let params = CurationParams::default();

    let new: Vec<CandidateRecord> = (0..8).map(story).collect();
    let first = merge_and_curate(new.clone(), vec![], vec![], &reputation, &params, now());

    // Second run sees the same fetch plus the snapshot of the first.
    let second = merge_and_curate(
        new,
        first.accepted.clone(),
        vec![],
        &reputation,
        &params,
        now(),
    );
    assert_eq!(second.accepted, first.accepted);
    assert_eq!(second.primary, first.primary);
    assert_eq!(second.secondary, first.secondary);
    assert_eq!(second.near_duplicate_dropped, 8);
}

#[test]
fn url_dedup_is_insensitive_to_arrival_order() {
    // 30 records over 10 distinct urls; whatever the order, exactly one
    // record per url survives.
    let mut records: Vec<CandidateRecord> = Vec::new();
    for i in 0..10 {
        for run in 0..3 {
            let mut r = story(i);
            r.title = format!("{} take {}", r.title, run);
            records.push(r);
        }
    }
    let reputation = ReputationList::default_seed();
    let params = CurationParams::default();

    for _ in 0..5 {
        records.shuffle(&mut rand::rng());
        let out = merge_and_curate(
            records.clone(),
            vec![],
            vec![],
            &reputation,
            &params,
            now(),
        );
        assert_eq!(out.accepted.len(), 10);
        assert_eq!(out.near_duplicate_dropped, 20);
    }
}

#[test]
fn mixed_format_dates_sort_newest_first() {
    let new = vec![
        record(
            "ZiG holds against the dollar",
            "https://a.test/1",
            "Reuters",
            "2026-08-23",
        ),
        record(
            "Harare council passes budget",
            "https://a.test/2",
            "NewsDay",
            "Mon, 24 Aug 2026 09:30:00 GMT",
        ),
        record(
            "Kariba water levels recover",
            "https://a.test/3",
            "BBC",
            "2026-08-25T08:00:00Z",
        ),
    ];
    let out = merge_and_curate(
        new,
        vec![],
        vec![],
        &ReputationList::default_seed(),
        &CurationParams::default(),
        now(),
    );
    let urls: Vec<&str> = out.accepted.iter().map(|r| r.url.as_str()).collect();
    assert_eq!(
        urls,
        vec!["https://a.test/3", "https://a.test/2", "https://a.test/1"]
    );
}

#[test]
fn two_window_tiering_ages_digest_out_before_spotlight() {
    // A reputable story past the digest window but inside the spotlight
    // window can still hold primary; an ordinary one of the same age goes
    // nowhere.
    let new = vec![
        record(
            "Zimbabwe wheat harvest sets record",
            "https://a.test/w",
            "Reuters",
            &days_ago(21),
        ),
        record(
            "Gweru road repairs resume",
            "https://a.test/g",
            "Community Blog",
            &days_ago(21),
        ),
        record(
            "Zimbabwe exports rise in July",
            "https://a.test/e",
            "Community Blog",
            &days_ago(3),
        ),
    ];
    let out = merge_and_curate(
        new,
        vec![],
        vec![],
        &ReputationList::default_seed(),
        &CurationParams::default(),
        now(),
    );
    assert_eq!(out.primary.len(), 1);
    assert_eq!(out.primary[0].url, "https://a.test/w");
    assert_eq!(out.secondary.len(), 1);
    assert_eq!(out.secondary[0].url, "https://a.test/e");
    assert_eq!(out.stale_dropped, 1);
    assert_eq!(out.accepted.len(), 3);
}

#[test]
fn promoted_survives_even_when_the_wire_is_empty() {
    let promoted = vec![record(
        "Inside the new industrial policy",
        "https://www.mutapatimes.com/articles/industrial-policy.html",
        "The Mutapa Times",
        &days_ago(2),
    )];
    let out = merge_and_curate(
        vec![],
        vec![],
        promoted,
        &ReputationList::default_seed(),
        &CurationParams::default(),
        now(),
    );
    assert!(out.primary.is_empty());
    assert_eq!(out.secondary.len(), 1);
    assert_eq!(out.promoted_injected, 1);
    assert!(out.accepted.is_empty());
}

#[test]
fn promoted_content_is_not_freshness_gated() {
    // Editorial picks stay pinned for as long as the index promotes them.
    let promoted = vec![record(
        "From the archive: dollarisation ten years on",
        "https://www.mutapatimes.com/articles/dollarisation.html",
        "The Mutapa Times",
        &days_ago(60),
    )];
    let out = merge_and_curate(
        vec![],
        vec![],
        promoted,
        &ReputationList::default_seed(),
        &CurationParams::default(),
        now(),
    );
    assert_eq!(out.secondary.len(), 1);
    assert_eq!(out.stale_dropped, 0);
}
