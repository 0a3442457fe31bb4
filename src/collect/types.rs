// src/collect/types.rs
use anyhow::Result;

/// One record pulled from an upstream feed, before any curation.
///
/// Collectors emit these as close to the wire as practical; trimming,
/// localization and scoring all happen downstream. `source` carries the
/// canonical collector id (e.g. `"github_trending"`), which later selects
/// the score weight.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
pub struct RawEvent {
    pub title: String,
    pub description: String,
    pub url: String,
    pub source: String,
}

#[async_trait::async_trait]
pub trait EventCollector: Send + Sync {
    /// Fetch up to `limit` events from the upstream feed.
    async fn collect(&self, limit: usize) -> Result<Vec<RawEvent>>;
    fn name(&self) -> &'static str;
}
