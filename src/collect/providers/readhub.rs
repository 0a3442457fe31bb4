use anyhow::{Context, Result};
use async_trait::async_trait;
use metrics::{counter, histogram};
use serde::Deserialize;

use crate::collect::types::{EventCollector, RawEvent};

const SOURCE: &str = "readhub";
const NEWS_URL: &str = "https://api.readhub.cn/news";

#[derive(Debug, Deserialize)]
struct NewsPage {
    #[serde(default)]
    data: Vec<NewsItem>,
}

#[derive(Debug, Deserialize)]
struct NewsItem {
    #[serde(default)]
    title: String,
    #[serde(default)]
    summary: String,
    #[serde(default)]
    url: String,
}

/// Readhub tech-news JSON API (already Chinese, so these events skip the
/// translation path entirely).
pub struct ReadhubCollector {
    mode: Mode,
}

enum Mode {
    Fixture(String),
    Http { url: String, client: reqwest::Client },
}

impl ReadhubCollector {
    pub fn from_fixture(s: &str) -> Self {
        Self {
            mode: Mode::Fixture(s.to_string()),
        }
    }

    pub fn new(timeout_secs: u64) -> Self {
        Self {
            mode: Mode::Http {
                url: NEWS_URL.to_string(),
                client: super::http_client(timeout_secs),
            },
        }
    }

    fn parse_payload(s: &str, limit: usize) -> Result<Vec<RawEvent>> {
        let t0 = std::time::Instant::now();
        let page: NewsPage = serde_json::from_str(s).context("parsing readhub payload")?;

        let out: Vec<RawEvent> = page
            .data
            .into_iter()
            .take(limit)
            .map(|item| RawEvent {
                title: item.title,
                description: item.summary,
                url: item.url,
                source: SOURCE.to_string(),
            })
            .collect();

        let ms = t0.elapsed().as_secs_f64() * 1_000.0;
        histogram!("collect_parse_ms").record(ms);
        counter!("collect_events_total").increment(out.len() as u64);
        Ok(out)
    }
}

#[async_trait]
impl EventCollector for ReadhubCollector {
    async fn collect(&self, limit: usize) -> Result<Vec<RawEvent>> {
        match &self.mode {
            Mode::Fixture(s) => Self::parse_payload(s, limit),
            Mode::Http { url, client } => {
                let body = client
                    .get(url)
                    .send()
                    .await
                    .and_then(|r| r.error_for_status())
                    .context("readhub get()")?
                    .text()
                    .await
                    .context("readhub .text()")?;
                Self::parse_payload(&body, limit)
            }
        }
    }

    fn name(&self) -> &'static str {
        SOURCE
    }
}
