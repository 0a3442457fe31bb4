//! event.rs — curated event and archive document shapes.
//!
//! These are the serde shapes written into the JSON archive, so field names
//! are load-bearing: renaming one breaks every previously written document.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Fully curated event: bilingual text, classification labels and a hotness
/// score. Built once by the curator and read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CuratedEvent {
    pub title: String,
    pub description: String,
    pub url: String,
    pub source: String,
    /// Matched categories in rule-table order; never empty.
    pub categories: Vec<String>,
    /// Matched event types in rule-table order; never empty.
    pub event_types: Vec<String>,
    /// Always `categories[0]`.
    pub primary_category: String,
    pub hotness_score: u32,
}

/// One day's archive document, keyed by `YYYY-MM-DD`. Re-running the daily
/// mode on the same day replaces the whole document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySnapshot {
    pub date: String,
    pub collection_time: DateTime<Utc>,
    pub total_raw_events: usize,
    pub total_processed_events: usize,
    pub total_unique_events: usize,
    pub events: Vec<CuratedEvent>,
}

/// Weekly and monthly roll-ups share this shape; only the period key format
/// and the `top_events` bound differ.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodicReport {
    pub period_key: String,
    /// `[start, end]` as `YYYY-MM-DD`, inclusive.
    pub date_range: (String, String),
    /// Count of all events in the window, not just the surfaced ones.
    pub total_events: usize,
    pub category_distribution: BTreeMap<String, usize>,
    pub top_events: Vec<CuratedEvent>,
}

impl PeriodicReport {
    /// Aggregate a window of curated events into a report: distribution over
    /// primary categories plus the `top_n` hottest events.
    pub fn from_window(
        period_key: impl Into<String>,
        date_range: (String, String),
        mut events: Vec<CuratedEvent>,
        top_n: usize,
    ) -> Self {
        let mut category_distribution: BTreeMap<String, usize> = BTreeMap::new();
        for ev in &events {
            *category_distribution
                .entry(ev.primary_category.clone())
                .or_insert(0) += 1;
        }

        let total_events = events.len();
        events.sort_by(|a, b| b.hotness_score.cmp(&a.hotness_score));
        events.truncate(top_n);

        Self {
            period_key: period_key.into(),
            date_range,
            total_events,
            category_distribution,
            top_events: events,
        }
    }
}
