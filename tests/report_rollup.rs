// tests/report_rollup.rs
//
// Weekly and monthly roll-ups over seeded daily snapshots: window edges,
// top-event bounds and category aggregation.

use chrono::{DateTime, Duration, TimeZone, Utc};
use techpulse::event::{CuratedEvent, PeriodicReport};
use techpulse::{report, RetentionStore};

fn event(title: &str, category: &str, score: u32) -> CuratedEvent {
    CuratedEvent {
        title: title.to_string(),
        description: "d".to_string(),
        url: format!("https://example.test/{title}"),
        source: "readhub".to_string(),
        categories: vec![category.to_string()],
        event_types: vec!["community_discussion".to_string()],
        primary_category: category.to_string(),
        hotness_score: score,
    }
}

/// Five events for one day, scores `base..base+4`, titles unique per day.
fn day_batch(day: usize, category: &str, base: u32) -> Vec<CuratedEvent> {
    (0..5)
        .map(|i| event(&format!("d{day}-e{i}"), category, base + i as u32))
        .collect()
}

fn seed_day(store: &RetentionStore, at: DateTime<Utc>, events: Vec<CuratedEvent>) {
    let n = events.len();
    report::daily_snapshot(store, at, n, n, events).unwrap();
}

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 8, 16, 12, 0, 0).unwrap()
}

#[test]
fn weekly_report_bounds_top_events_and_sums_distribution() {
    let dir = tempfile::tempdir().unwrap();
    let store = RetentionStore::open(dir.path()).unwrap();
    let at = now();

    // Fifteen events inside the 7-day window, across three days.
    seed_day(&store, at, day_batch(0, "ai_ml", 30));
    seed_day(&store, at - Duration::days(3), day_batch(3, "security", 50));
    seed_day(&store, at - Duration::days(6), day_batch(6, "ai_ml", 10));
    // Outside the window; must not leak in.
    seed_day(&store, at - Duration::days(7), day_batch(7, "web_dev", 99));

    let r = report::weekly_report(&store, at).unwrap().expect("window has events");

    assert_eq!(r.period_key, "2026-W33");
    assert_eq!(
        r.date_range,
        ("2026-08-10".to_string(), "2026-08-16".to_string())
    );
    assert_eq!(r.total_events, 15);
    assert_eq!(r.top_events.len(), 10, "weekly surfaces at most ten events");

    // Distribution covers the whole window, not just the surfaced events.
    assert_eq!(r.category_distribution.get("ai_ml"), Some(&10));
    assert_eq!(r.category_distribution.get("security"), Some(&5));
    assert_eq!(r.category_distribution.get("web_dev"), None);
    assert_eq!(
        r.category_distribution.values().sum::<usize>(),
        r.total_events
    );

    // Hottest first: the security day (50..54) tops the list.
    assert_eq!(r.top_events[0].title, "d3-e4");
    assert_eq!(r.top_events[0].hotness_score, 54);
    assert!(r.top_events.iter().all(|e| e.title != "d7-e4"));

    // The report itself lands in the store under its period key.
    let stored: PeriodicReport = store.get("weekly", "2026-W33").unwrap().unwrap();
    assert_eq!(stored, r);
}

#[test]
fn monthly_report_spans_thirty_days_with_twenty_slots() {
    let dir = tempfile::tempdir().unwrap();
    let store = RetentionStore::open(dir.path()).unwrap();
    let at = now();

    seed_day(&store, at, day_batch(0, "ai_ml", 30));
    seed_day(&store, at - Duration::days(10), day_batch(10, "security", 20));
    seed_day(&store, at - Duration::days(20), day_batch(20, "cloud", 40));
    seed_day(&store, at - Duration::days(29), day_batch(29, "database", 15));
    // Day 30 is past the window edge.
    seed_day(&store, at - Duration::days(30), day_batch(30, "startup", 77));

    let r = report::monthly_report(&store, at).unwrap().expect("window has events");

    assert_eq!(r.period_key, "2026-08");
    assert_eq!(
        r.date_range,
        ("2026-07-18".to_string(), "2026-08-16".to_string())
    );
    assert_eq!(r.total_events, 20);
    assert_eq!(r.top_events.len(), 20, "monthly surfaces at most twenty events");
    assert!(r.category_distribution.get("startup").is_none());

    assert_eq!(r.top_events[0].title, "d20-e4");
    assert_eq!(r.top_events[0].hotness_score, 44);

    let stored: PeriodicReport = store.get("monthly", "2026-08").unwrap().unwrap();
    assert_eq!(stored, r);
}

#[test]
fn sparse_windows_roll_up_whatever_exists() {
    let dir = tempfile::tempdir().unwrap();
    let store = RetentionStore::open(dir.path()).unwrap();
    let at = now();

    // A single snapshot three days back is all the data there is.
    seed_day(&store, at - Duration::days(3), vec![event("唯一的事件", "general", 6)]);

    let r = report::weekly_report(&store, at).unwrap().expect("one day is enough");
    assert_eq!(r.total_events, 1);
    assert_eq!(r.top_events[0].title, "唯一的事件");
}

#[test]
fn empty_windows_produce_no_report_documents() {
    let dir = tempfile::tempdir().unwrap();
    let store = RetentionStore::open(dir.path()).unwrap();

    assert!(report::weekly_report(&store, now()).unwrap().is_none());
    assert!(report::monthly_report(&store, now()).unwrap().is_none());
    assert!(store.list_keys("weekly").unwrap().is_empty());
    assert!(store.list_keys("monthly").unwrap().is_empty());
}
