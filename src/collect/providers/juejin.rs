use anyhow::{Context, Result};
use async_trait::async_trait;
use metrics::{counter, histogram};
use serde::Deserialize;

use crate::collect::types::{EventCollector, RawEvent};

const SOURCE: &str = "juejin";
const FEED_URL: &str = "https://api.juejin.cn/recommend_api/v1/article/recommend_all_feed";

#[derive(Debug, Deserialize)]
struct FeedResponse {
    #[serde(default)]
    err_msg: String,
    // Null on errors, so Option rather than an empty default.
    data: Option<Vec<FeedItem>>,
}

#[derive(Debug, Deserialize)]
struct FeedItem {
    article_info: Option<ArticleInfo>,
}

#[derive(Debug, Default, Deserialize)]
struct ArticleInfo {
    #[serde(default)]
    article_id: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    brief_content: String,
}

/// Juejin recommendation feed (POST API). Articles come back hottest-first.
pub struct JuejinCollector {
    mode: Mode,
}

enum Mode {
    Fixture(String),
    Http { url: String, client: reqwest::Client },
}

impl JuejinCollector {
    pub fn from_fixture(s: &str) -> Self {
        Self {
            mode: Mode::Fixture(s.to_string()),
        }
    }

    pub fn new(timeout_secs: u64) -> Self {
        Self {
            mode: Mode::Http {
                url: FEED_URL.to_string(),
                client: super::http_client(timeout_secs),
            },
        }
    }

    fn parse_response(s: &str, limit: usize) -> Result<Vec<RawEvent>> {
        let t0 = std::time::Instant::now();
        let resp: FeedResponse = serde_json::from_str(s).context("parsing juejin payload")?;

        if resp.err_msg != "success" {
            tracing::warn!(err_msg = %resp.err_msg, "juejin feed rejected the request");
            return Ok(Vec::new());
        }

        let mut out = Vec::new();
        for item in resp.data.unwrap_or_default().into_iter().take(limit) {
            let info = item.article_info.unwrap_or_default();
            out.push(RawEvent {
                title: info.title,
                description: info.brief_content,
                url: format!("https://juejin.cn/post/{}", info.article_id),
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
impl EventCollector for JuejinCollector {
    async fn collect(&self, limit: usize) -> Result<Vec<RawEvent>> {
        match &self.mode {
            Mode::Fixture(s) => Self::parse_response(s, limit),
            Mode::Http { url, client } => {
                let body = serde_json::json!({
                    "id_type": 2,
                    "sort_type": 2,
                    "feed_type": 1,
                    "cursor": "0",
                    "limit": limit,
                });
                let text = client
                    .post(url)
                    .json(&body)
                    .send()
                    .await
                    .and_then(|r| r.error_for_status())
                    .context("juejin post()")?
                    .text()
                    .await
                    .context("juejin .text()")?;
                Self::parse_response(&text, limit)
            }
        }
    }

    fn name(&self) -> &'static str {
        SOURCE
    }
}
