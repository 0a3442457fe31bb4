use anyhow::{Context, Result};
use async_trait::async_trait;
use metrics::{counter, histogram};
use quick_xml::de::from_str;
use serde::Deserialize;

use crate::collect::types::{EventCollector, RawEvent};
use crate::normalize::clean_text;

const SOURCE: &str = "oschina";

/// Feeds in preference order; the first one that yields entries wins.
const FEED_URLS: &[&str] = &[
    "https://www.oschina.net/news/rss",
    "https://www.oschina.net/blog/rss",
];

#[derive(Debug, Deserialize)]
struct Rss {
    channel: Channel,
}
#[derive(Debug, Deserialize)]
struct Channel {
    #[serde(rename = "item", default)]
    item: Vec<Item>,
}
#[derive(Debug, Deserialize)]
struct Item {
    title: Option<String>,
    link: Option<String>,
    description: Option<String>,
}

/// OSChina news via RSS. Descriptions arrive as HTML fragments and are
/// cleaned here.
pub struct OschinaCollector {
    mode: Mode,
}

enum Mode {
    Fixture(String),
    Http { client: reqwest::Client },
}

impl OschinaCollector {
    pub fn from_fixture(s: &str) -> Self {
        Self {
            mode: Mode::Fixture(s.to_string()),
        }
    }

    pub fn new(timeout_secs: u64) -> Self {
        Self {
            mode: Mode::Http {
                client: super::http_client(timeout_secs),
            },
        }
    }

    fn parse_feed(s: &str, limit: usize) -> Result<Vec<RawEvent>> {
        let t0 = std::time::Instant::now();
        let xml_clean = super::scrub_html_entities_for_xml(s);
        let rss: Rss = from_str(&xml_clean).context("parsing oschina rss xml")?;

        let mut out = Vec::with_capacity(rss.channel.item.len().min(limit));
        for it in rss.channel.item.into_iter().take(limit) {
            out.push(RawEvent {
                title: clean_text(it.title.as_deref().unwrap_or_default()),
                description: clean_text(it.description.as_deref().unwrap_or_default()),
                url: it.link.unwrap_or_default(),
                source: SOURCE.to_string(),
            });
        }

        let ms = t0.elapsed().as_secs_f64() * 1_000.0;
        histogram!("collect_parse_ms").record(ms);
        counter!("collect_events_total").increment(out.len() as u64);
        Ok(out)
    }
}

#[async_trait]
impl EventCollector for OschinaCollector {
    async fn collect(&self, limit: usize) -> Result<Vec<RawEvent>> {
        match &self.mode {
            Mode::Fixture(s) => Self::parse_feed(s, limit),
            Mode::Http { client } => {
                for url in FEED_URLS {
                    let body = match client
                        .get(*url)
                        .send()
                        .await
                        .and_then(|r| r.error_for_status())
                    {
                        Ok(resp) => match resp.text().await {
                            Ok(b) => b,
                            Err(e) => {
                                tracing::warn!(error = ?e, url, "oschina feed body error");
                                continue;
                            }
                        },
                        Err(e) => {
                            tracing::warn!(error = ?e, url, "oschina feed error");
                            continue;
                        }
                    };

                    match Self::parse_feed(&body, limit) {
                        Ok(events) if !events.is_empty() => return Ok(events),
                        Ok(_) => continue,
                        Err(e) => {
                            tracing::warn!(error = ?e, url, "oschina feed parse error");
                            continue;
                        }
                    }
                }
                Ok(Vec::new())
            }
        }
    }

    fn name(&self) -> &'static str {
        SOURCE
    }
}
