use anyhow::{Context, Result};
use async_trait::async_trait;
use metrics::counter;
use serde::Deserialize;
use std::collections::HashMap;

use crate::collect::types::{EventCollector, RawEvent};

const SOURCE: &str = "hacker_news";
const API_BASE: &str = "https://hacker-news.firebaseio.com/v0";

/// Only stories above this score are worth surfacing.
const MIN_SCORE: i64 = 10;

#[derive(Debug, Deserialize)]
struct Story {
    #[serde(default)]
    id: u64,
    #[serde(default)]
    title: String,
    #[serde(default)]
    score: i64,
    #[serde(default)]
    descendants: i64,
    url: Option<String>,
}

/// Firebase API client: topstories id list, then one lookup per item.
pub struct HackerNewsCollector {
    mode: Mode,
}

enum Mode {
    Fixture {
        top: String,
        items: HashMap<u64, String>,
    },
    Http {
        api_base: String,
        client: reqwest::Client,
    },
}

impl HackerNewsCollector {
    /// `top` is the topstories payload; `items` maps story id to its item
    /// payload. Ids without a payload behave like failed lookups.
    pub fn from_fixture(top: &str, items: &[(u64, &str)]) -> Self {
        Self {
            mode: Mode::Fixture {
                top: top.to_string(),
                items: items
                    .iter()
                    .map(|(id, s)| (*id, s.to_string()))
                    .collect(),
            },
        }
    }

    pub fn new(timeout_secs: u64) -> Self {
        Self {
            mode: Mode::Http {
                api_base: API_BASE.to_string(),
                client: super::http_client(timeout_secs),
            },
        }
    }

    fn story_to_event(story: Story) -> Option<RawEvent> {
        if story.score <= MIN_SCORE {
            return None;
        }
        Some(RawEvent {
            title: story.title,
            description: format!(
                "Hacker News discussion with {} points and {} comments",
                story.score, story.descendants
            ),
            url: story
                .url
                .unwrap_or_else(|| format!("https://news.ycombinator.com/item?id={}", story.id)),
            source: SOURCE.to_string(),
        })
    }
}

#[async_trait]
impl EventCollector for HackerNewsCollector {
    async fn collect(&self, limit: usize) -> Result<Vec<RawEvent>> {
        // Examine at most `limit` ids; low-score stories just thin the batch.
        let mut out = Vec::new();

        match &self.mode {
            Mode::Fixture { top, items } => {
                let ids: Vec<u64> =
                    serde_json::from_str(top).context("parsing topstories fixture")?;
                for id in ids.into_iter().take(limit) {
                    let payload = match items.get(&id) {
                        Some(p) => p,
                        None => continue,
                    };
                    if let Ok(story) = serde_json::from_str::<Story>(payload) {
                        if let Some(ev) = Self::story_to_event(story) {
                            out.push(ev);
                        }
                    }
                    if out.len() >= limit {
                        break;
                    }
                }
            }
            Mode::Http { api_base, client } => {
                let ids: Vec<u64> = client
                    .get(format!("{api_base}/topstories.json"))
                    .send()
                    .await
                    .and_then(|r| r.error_for_status())
                    .context("hacker news topstories get()")?
                    .json()
                    .await
                    .context("hacker news topstories json")?;

                for id in ids.into_iter().take(limit) {
                    let story = client
                        .get(format!("{api_base}/item/{id}.json"))
                        .send()
                        .await
                        .and_then(|r| r.error_for_status());
                    let story = match story {
                        Ok(r) => r.json::<Story>().await,
                        Err(e) => {
                            tracing::debug!(error = ?e, id, "skipping hacker news item");
                            continue;
                        }
                    };
                    // Deleted items come back as JSON null and fail to parse.
                    if let Ok(story) = story {
                        if let Some(ev) = Self::story_to_event(story) {
                            out.push(ev);
                        }
                    }
                    if out.len() >= limit {
                        break;
                    }
                }
            }
        }

        counter!("collect_events_total").increment(out.len() as u64);
        Ok(out)
    }

    fn name(&self) -> &'static str {
        SOURCE
    }
}
