// src/collect/providers/mod.rs
pub mod github_trending;
pub mod hacker_news;
pub mod juejin;
pub mod oschina;
pub mod readhub;
pub mod security_vuln;
pub mod tech_blogs;

use std::time::Duration;

/// Browser-like agent: github.com and api.github.com reject anonymous
/// default agents, and some feeds serve bot pages to unknown ones.
pub(crate) const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

pub(crate) fn http_client(timeout_secs: u64) -> reqwest::Client {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}

/// Feed payloads use HTML entities that XML parsers reject; map the common
/// ones to plain characters before deserializing.
pub(crate) fn scrub_html_entities_for_xml(s: &str) -> String {
    s.replace("&nbsp;", " ")
        .replace("&ndash;", "-")
        .replace("&mdash;", "-")
        .replace("&ldquo;", "\"")
        .replace("&rdquo;", "\"")
        .replace("&lsquo;", "'")
        .replace("&rsquo;", "'")
}
