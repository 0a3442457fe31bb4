//! # Reports
//!
//! Assembles the persisted documents: one [`DailySnapshot`] per run and
//! weekly/monthly [`PeriodicReport`] roll-ups built from the stored daily
//! snapshots. Period keys double as store keys, so re-running a mode for
//! the same period replaces the previous document.

use anyhow::Result;
use chrono::{DateTime, Duration, Utc};

use crate::event::{CuratedEvent, DailySnapshot, PeriodicReport};
use crate::store::RetentionStore;

const WEEKLY_WINDOW_DAYS: i64 = 7;
const MONTHLY_WINDOW_DAYS: i64 = 30;
const WEEKLY_TOP_N: usize = 10;
const MONTHLY_TOP_N: usize = 20;

/// Store key for a daily snapshot, e.g. `2026-08-16`.
pub fn date_key(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%d").to_string()
}

/// Week-of-year key with Sunday as the first weekday, e.g. `2026-W33`.
pub fn weekly_key(at: DateTime<Utc>) -> String {
    at.format("%Y-W%U").to_string()
}

/// Calendar-month key, e.g. `2026-08`.
pub fn monthly_key(at: DateTime<Utc>) -> String {
    at.format("%Y-%m").to_string()
}

/// Build and persist the snapshot for a single collection run.
pub fn daily_snapshot(
    store: &RetentionStore,
    at: DateTime<Utc>,
    total_raw_events: usize,
    total_processed_events: usize,
    events: Vec<CuratedEvent>,
) -> Result<DailySnapshot> {
    let snapshot = DailySnapshot {
        date: date_key(at),
        collection_time: at,
        total_raw_events,
        total_processed_events,
        total_unique_events: events.len(),
        events,
    };
    store.put("daily", &snapshot.date, &snapshot)?;
    tracing::info!(
        date = %snapshot.date,
        events = snapshot.total_unique_events,
        "daily snapshot stored"
    );
    Ok(snapshot)
}

/// Events from the daily snapshots of the last `days` days, newest day
/// first. Days without a snapshot are skipped; unreadable snapshots are
/// errors.
fn window_events(
    store: &RetentionStore,
    at: DateTime<Utc>,
    days: i64,
) -> Result<Vec<CuratedEvent>> {
    let mut events = Vec::new();
    for i in 0..days {
        let key = date_key(at - Duration::days(i));
        if let Some(snapshot) = store.get::<DailySnapshot>("daily", &key)? {
            events.extend(snapshot.events);
        }
    }
    Ok(events)
}

/// Roll up the last 7 daily snapshots. `Ok(None)` when the window holds no
/// events; nothing is stored in that case.
pub fn weekly_report(store: &RetentionStore, at: DateTime<Utc>) -> Result<Option<PeriodicReport>> {
    roll_up(
        store,
        at,
        "weekly",
        weekly_key(at),
        WEEKLY_WINDOW_DAYS,
        WEEKLY_TOP_N,
    )
}

/// Roll up the last 30 daily snapshots. `Ok(None)` when the window holds no
/// events; nothing is stored in that case.
pub fn monthly_report(store: &RetentionStore, at: DateTime<Utc>) -> Result<Option<PeriodicReport>> {
    roll_up(
        store,
        at,
        "monthly",
        monthly_key(at),
        MONTHLY_WINDOW_DAYS,
        MONTHLY_TOP_N,
    )
}

fn roll_up(
    store: &RetentionStore,
    at: DateTime<Utc>,
    namespace: &str,
    period_key: String,
    window_days: i64,
    top_n: usize,
) -> Result<Option<PeriodicReport>> {
    let events = window_events(store, at, window_days)?;
    if events.is_empty() {
        tracing::warn!(period = %period_key, "no events in window, skipping report");
        return Ok(None);
    }

    let date_range = (date_key(at - Duration::days(window_days - 1)), date_key(at));
    let report = PeriodicReport::from_window(period_key, date_range, events, top_n);
    store.put(namespace, &report.period_key, &report)?;
    tracing::info!(
        period = %report.period_key,
        events = report.total_events,
        "periodic report stored"
    );
    Ok(Some(report))
}
