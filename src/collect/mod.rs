// src/collect/mod.rs
pub mod config;
pub mod providers;
pub mod types;

use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge};
use once_cell::sync::OnceCell;
use std::time::Duration;

use crate::collect::config::CollectConfig;
use crate::collect::types::{EventCollector, RawEvent};

/// One-time metrics registration (so series show up under a recorder).
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!(
            "collect_events_total",
            "Raw events parsed from collectors."
        );
        describe_counter!("collect_errors_total", "Collector fetch/parse errors.");
        describe_histogram!(
            "collect_parse_ms",
            "Collector payload parse time in milliseconds."
        );
        describe_gauge!(
            "collect_last_run_ts",
            "Unix ts when collection last ran."
        );
    });
}

/// The production source set, in fixed order.
pub fn default_collectors(cfg: &CollectConfig) -> Vec<Box<dyn EventCollector>> {
    let t = cfg.http_timeout_secs;
    vec![
        Box::new(providers::github_trending::GithubTrendingCollector::new(t)),
        Box::new(providers::hacker_news::HackerNewsCollector::new(t)),
        Box::new(providers::readhub::ReadhubCollector::new(t)),
        Box::new(providers::oschina::OschinaCollector::new(t)),
        Box::new(providers::juejin::JuejinCollector::new(t)),
        Box::new(providers::security_vuln::SecurityVulnCollector::new(t)),
        Box::new(providers::tech_blogs::TechBlogsCollector::new(t)),
    ]
}

/// Run every collector once, sequentially, with a politeness pause between
/// sources. A failing collector is logged and contributes nothing; errors
/// never cross this boundary.
pub async fn collect_all(
    collectors: &[Box<dyn EventCollector>],
    cfg: &CollectConfig,
) -> Vec<RawEvent> {
    ensure_metrics_described();

    let mut all = Vec::new();
    for (i, collector) in collectors.iter().enumerate() {
        if i > 0 && cfg.politeness_delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(cfg.politeness_delay_ms)).await;
        }

        let limit = cfg.limit_for(collector.name());
        match collector.collect(limit).await {
            Ok(mut events) => {
                tracing::info!(source = collector.name(), count = events.len(), "collected");
                all.append(&mut events);
            }
            Err(e) => {
                tracing::warn!(error = ?e, source = collector.name(), "collector error");
                counter!("collect_errors_total").increment(1);
            }
        }
    }

    gauge!("collect_last_run_ts").set(chrono::Utc::now().timestamp().max(0) as f64);
    all
}
