use anyhow::{Context, Result};
use async_trait::async_trait;
use metrics::{counter, histogram};
use once_cell::sync::OnceCell;
use regex::Regex;

use crate::collect::types::{EventCollector, RawEvent};
use crate::normalize::clean_text;

const SOURCE: &str = "github_trending";
const TRENDING_URL: &str = "https://github.com/trending";

/// Scrapes the GitHub trending page. One event per repository row; the repo
/// path doubles as the title.
pub struct GithubTrendingCollector {
    mode: Mode,
}

enum Mode {
    Fixture(String),
    Http { url: String, client: reqwest::Client },
}

impl GithubTrendingCollector {
    pub fn from_fixture(s: &str) -> Self {
        Self {
            mode: Mode::Fixture(s.to_string()),
        }
    }

    pub fn new(timeout_secs: u64) -> Self {
        Self {
            mode: Mode::Http {
                url: TRENDING_URL.to_string(),
                client: super::http_client(timeout_secs),
            },
        }
    }

    fn parse_page(html: &str, limit: usize) -> Result<Vec<RawEvent>> {
        let t0 = std::time::Instant::now();

        // Each repo row is an <article class="Box-row">; the h2 holds the
        // /owner/name link and the col-9 paragraph the description.
        static RE_REPO: OnceCell<Regex> = OnceCell::new();
        let re_repo = RE_REPO.get_or_init(|| {
            Regex::new(r#"(?is)<h2 class="h3 lh-condensed">.*?href="/([^"]+)""#).unwrap()
        });
        static RE_DESC: OnceCell<Regex> = OnceCell::new();
        let re_desc =
            RE_DESC.get_or_init(|| Regex::new(r#"(?is)<p class="col-9[^"]*">(.*?)</p>"#).unwrap());

        let mut out = Vec::new();
        for block in html.split(r#"<article class="Box-row""#).skip(1) {
            if out.len() >= limit {
                break;
            }
            let repo = match re_repo.captures(block) {
                Some(c) => c[1].trim_matches('/').to_string(),
                None => continue,
            };
            let description = re_desc
                .captures(block)
                .map(|c| clean_text(&c[1]))
                .unwrap_or_default();

            out.push(RawEvent {
                title: repo.clone(),
                description,
                url: format!("https://github.com/{repo}"),
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
impl EventCollector for GithubTrendingCollector {
    async fn collect(&self, limit: usize) -> Result<Vec<RawEvent>> {
        match &self.mode {
            Mode::Fixture(s) => Self::parse_page(s, limit),
            Mode::Http { url, client } => {
                let body = client
                    .get(url)
                    .send()
                    .await
                    .and_then(|r| r.error_for_status())
                    .context("github trending get()")?
                    .text()
                    .await
                    .context("github trending .text()")?;
                Self::parse_page(&body, limit)
            }
        }
    }

    fn name(&self) -> &'static str {
        SOURCE
    }
}
