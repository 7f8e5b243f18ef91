// tests/metrics_counters.rs
// Diagnostic counters recorded during a cascade, captured with a local
// debugging recorder.

use metrics_util::debugging::{DebugValue, DebuggingRecorder};
use serde_json::json;

use mutapa_curator::ingest::providers::gnews::GnewsProvider;
use mutapa_curator::relevance::RelevanceFilter;
use mutapa_curator::{run_cascade, NewsProvider};

fn block_on<F: std::future::Future>(fut: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("runtime")
        .block_on(fut)
}

#[test]
fn cascade_records_fetch_error_and_drop_counters() {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();

    let payload = json!({
        "articles": [
            {
                "title": "Zimbabwe budget review tabled",
                "url": "https://wire.test/budget",
                "publishedAt": "2026-08-24T10:00:00Z",
                "source": { "name": "Reuters" }
            },
            {
                "title": "Harare airport opens new terminal",
                "url": "https://wire.test/airport",
                "publishedAt": "2026-08-23T10:00:00Z",
                "source": { "name": "BBC" }
            },
            {
                "title": "Lisbon tram schedule changes",
                "url": "https://wire.test/tram",
                "publishedAt": "2026-08-24T11:00:00Z",
                "source": { "name": "Metro Desk" }
            }
        ]
    })
    .to_string();

    metrics::with_local_recorder(&recorder, || {
        block_on(async {
            let providers: Vec<Box<dyn NewsProvider>> = vec![
                Box::new(GnewsProvider::from_fixture_str("{ not json", 10)),
                Box::new(GnewsProvider::from_fixture_str(&payload, 10)),
            ];
            let out = run_cascade(&providers, &RelevanceFilter::default_seed(), 8).await;
            assert_eq!(out.providers_failed, 1);
            assert_eq!(out.records.len(), 2);
        });
    });

    let snapshot = snapshotter.snapshot().into_vec();
    let counter = |name: &str| -> u64 {
        snapshot
            .iter()
            .filter_map(|(key, _, _, value)| match value {
                DebugValue::Counter(v) if key.key().name() == name => Some(*v),
                _ => None,
            })
            .sum()
    };
    assert_eq!(counter("ingest_provider_errors_total"), 1);
    assert_eq!(counter("ingest_records_total"), 3);
    assert_eq!(counter("curate_relevance_dropped_total"), 1);

    let has_parse_histogram = snapshot.iter().any(|(key, _, _, value)| {
        key.key().name() == "ingest_parse_ms" && matches!(value, DebugValue::Histogram(_))
    });
    assert!(has_parse_histogram);
}

#[test]
fn clean_cascade_records_no_failures() {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();

    let payload = json!({
        "articles": [
            {
                "title": "Zimbabwe solar plant comes online",
                "url": "https://wire.test/solar",
                "publishedAt": "2026-08-24T10:00:00Z",
                "source": { "name": "Reuters" }
            }
        ]
    })
    .to_string();

    metrics::with_local_recorder(&recorder, || {
        block_on(async {
            let providers: Vec<Box<dyn NewsProvider>> =
                vec![Box::new(GnewsProvider::from_fixture_str(&payload, 10))];
            let out = run_cascade(&providers, &RelevanceFilter::default_seed(), 8).await;
            assert_eq!(out.providers_failed, 0);
            assert_eq!(out.records.len(), 1);
        });
    });

    let errors: u64 = snapshotter
        .snapshot()
        .into_vec()
        .iter()
        .filter_map(|(key, _, _, value)| match value {
            DebugValue::Counter(v) if key.key().name() == "ingest_provider_errors_total" => {
                Some(*v)
            }
            _ => None,
        })
        .sum();
    assert_eq!(errors, 0);
}
