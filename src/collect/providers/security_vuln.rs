use anyhow::{Context, Result};
use async_trait::async_trait;
use metrics::{counter, histogram};
use serde::Deserialize;

use crate::collect::types::{EventCollector, RawEvent};

const SOURCE: &str = "security_vuln";
const ADVISORIES_URL: &str = "https://api.github.com/advisories";

/// The advisories endpoint caps unauthenticated pages at 20.
const MAX_PER_PAGE: usize = 20;

#[derive(Debug, Deserialize)]
struct Advisory {
    summary: Option<String>,
    description: Option<String>,
    html_url: Option<String>,
}

/// GitHub Security Advisories. Titles get a `[CVE]` prefix so alerts stand
/// out in mixed feeds.
pub struct SecurityVulnCollector {
    mode: Mode,
}

enum Mode {
    Fixture(String),
    Http { url: String, client: reqwest::Client },
}

impl SecurityVulnCollector {
    pub fn from_fixture(s: &str) -> Self {
        Self {
            mode: Mode::Fixture(s.to_string()),
        }
    }

    pub fn new(timeout_secs: u64) -> Self {
        Self {
            mode: Mode::Http {
                url: ADVISORIES_URL.to_string(),
                client: super::http_client(timeout_secs),
            },
        }
    }

    fn parse_payload(s: &str, limit: usize) -> Result<Vec<RawEvent>> {
        let t0 = std::time::Instant::now();
        let advisories: Vec<Advisory> =
            serde_json::from_str(s).context("parsing advisories payload")?;

        let out: Vec<RawEvent> = advisories
            .into_iter()
            .take(limit)
            .map(|a| RawEvent {
                title: format!("[CVE] {}", a.summary.unwrap_or_default()),
                description: a.description.unwrap_or_default(),
                url: a.html_url.unwrap_or_default(),
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
impl EventCollector for SecurityVulnCollector {
    async fn collect(&self, limit: usize) -> Result<Vec<RawEvent>> {
        match &self.mode {
            Mode::Fixture(s) => Self::parse_payload(s, limit),
            Mode::Http { url, client } => {
                let per_page = limit.min(MAX_PER_PAGE);
                let body = client
                    .get(url)
                    .query(&[("per_page", per_page)])
                    .send()
                    .await
                    .and_then(|r| r.error_for_status())
                    .context("advisories get()")?
                    .text()
                    .await
                    .context("advisories .text()")?;
                Self::parse_payload(&body, limit)
            }
        }
    }

    fn name(&self) -> &'static str {
        SOURCE
    }
}
