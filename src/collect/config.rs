// src/collect/config.rs
use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

const ENV_PATH: &str = "TECHPULSE_COLLECT_CONFIG";
const DEFAULT_PATH: &str = "config/collect.toml";

/// Tunables for the collection loop: per-source batch limits, the pause
/// between sources and the per-request HTTP timeout.
#[derive(Debug, Clone, Deserialize)]
pub struct CollectConfig {
    /// Limit for sources without an explicit entry.
    #[serde(default = "default_limit")]
    pub default_limit: usize,
    #[serde(default)]
    pub source_limits: HashMap<String, usize>,
    /// Pause between sources, in milliseconds.
    #[serde(default = "default_delay_ms")]
    pub politeness_delay_ms: u64,
    /// Per-request HTTP timeout, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub http_timeout_secs: u64,
}

fn default_limit() -> usize {
    10
}

fn default_delay_ms() -> u64 {
    1_000
}

fn default_timeout_secs() -> u64 {
    10
}

impl CollectConfig {
    pub fn limit_for(&self, source: &str) -> usize {
        self.source_limits
            .get(source)
            .copied()
            .unwrap_or(self.default_limit)
    }

    /// Built-in seed mirroring the production source set.
    pub fn default_seed() -> Self {
        let mut source_limits = HashMap::new();
        for (k, v) in [
            ("github_trending", 30),
            ("hacker_news", 35),
            ("readhub", 25),
            ("oschina", 20),
            ("juejin", 20),
            ("security_vuln", 20),
            ("tech_blogs", 15),
        ] {
            source_limits.insert(k.to_string(), v);
        }

        Self {
            default_limit: 10,
            source_limits,
            politeness_delay_ms: 1_000,
            http_timeout_secs: 10,
        }
    }

    /// Load configuration from an explicit TOML path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading collect config from {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("parsing collect config from {}", path.display()))
    }

    /// Load using env var + fallbacks:
    /// 1) $TECHPULSE_COLLECT_CONFIG
    /// 2) config/collect.toml
    /// 3) built-in seed
    pub fn load_default() -> Result<Self> {
        if let Ok(p) = std::env::var(ENV_PATH) {
            let pb = PathBuf::from(p);
            if pb.exists() {
                return Self::load_from(&pb);
            }
            return Err(anyhow!(
                "TECHPULSE_COLLECT_CONFIG points to non-existent path"
            ));
        }
        let toml_p = PathBuf::from(DEFAULT_PATH);
        if toml_p.exists() {
            return Self::load_from(&toml_p);
        }
        Ok(Self::default_seed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn seed_limits_match_the_production_set() {
        let cfg = CollectConfig::default_seed();
        assert_eq!(cfg.limit_for("github_trending"), 30);
        assert_eq!(cfg.limit_for("hacker_news"), 35);
        assert_eq!(cfg.limit_for("tech_blogs"), 15);
        assert_eq!(cfg.limit_for("unknown_source"), 10);
        assert_eq!(cfg.politeness_delay_ms, 1_000);
        assert_eq!(cfg.http_timeout_secs, 10);
    }

    #[test]
    fn toml_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("collect.toml");
        std::fs::write(
            &path,
            r#"
default_limit = 3
politeness_delay_ms = 0

[source_limits]
hacker_news = 5
"#,
        )
        .unwrap();

        let cfg = CollectConfig::load_from(&path).unwrap();
        assert_eq!(cfg.limit_for("hacker_news"), 5);
        assert_eq!(cfg.limit_for("readhub"), 3);
        assert_eq!(cfg.politeness_delay_ms, 0);
        assert_eq!(cfg.http_timeout_secs, 10);
    }

    #[serial_test::serial]
    #[test]
    fn env_path_wins_and_missing_env_path_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("c.toml");
        std::fs::write(&path, "default_limit = 2\n").unwrap();

        env::set_var(ENV_PATH, path.display().to_string());
        let cfg = CollectConfig::load_default().unwrap();
        assert_eq!(cfg.default_limit, 2);

        env::set_var(ENV_PATH, dir.path().join("missing.toml").display().to_string());
        assert!(CollectConfig::load_default().is_err());
        env::remove_var(ENV_PATH);
    }
}
