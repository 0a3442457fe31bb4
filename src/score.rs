//! # Hotness scoring
//!
//! Additive score from configurable weight tables:
//!
//! - base weight of the originating source (unknown sources get a default),
//! - bonus for the primary category,
//! - flat alert bonus when `security_alert` is among the event types.
//!
//! No clamping; the score only ranks events against each other. Weights load
//! from JSON (`TECHPULSE_SCORE_WEIGHTS` or `config/score_weights.json`) and
//! fall back to a built-in seed so the binary runs without any config.

use serde::Deserialize;
use std::{collections::HashMap, fs, path::Path};

use crate::classify::ALERT_EVENT_TYPE;

const ENV_PATH: &str = "TECHPULSE_SCORE_WEIGHTS";
const DEFAULT_PATH: &str = "config/score_weights.json";

/// Weight tables for hotness scoring, loaded from JSON or defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct ScoreWeights {
    /// Base weight when the source has no explicit entry.
    #[serde(default = "default_source_weight")]
    pub default_source_weight: u32,
    /// Base weights keyed by canonical source id.
    #[serde(default)]
    pub source_weights: HashMap<String, u32>,
    /// Bonuses keyed by primary category.
    #[serde(default)]
    pub category_bonus: HashMap<String, u32>,
    /// Flat bonus applied when the event carries a security alert.
    #[serde(default = "default_alert_bonus")]
    pub alert_bonus: u32,
}

fn default_source_weight() -> u32 {
    1
}

fn default_alert_bonus() -> u32 {
    20
}

impl ScoreWeights {
    /// Load from `$TECHPULSE_SCORE_WEIGHTS`, then the default config path.
    /// Any load failure falls back to `default_seed()`.
    pub fn load_default() -> Self {
        match std::env::var(ENV_PATH) {
            Ok(p) => Self::load_from_file(p),
            Err(_) => Self::load_from_file(DEFAULT_PATH),
        }
    }

    /// Load weight tables from a JSON file.
    /// Falls back to `default_seed()` on error.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Self {
        match fs::read_to_string(path) {
            Ok(s) => serde_json::from_str(&s).unwrap_or_else(|_| Self::default_seed()),
            Err(_) => Self::default_seed(),
        }
    }

    /// Score one classified event.
    pub fn score(&self, source: &str, primary_category: &str, event_types: &[String]) -> u32 {
        let mut score = *self
            .source_weights
            .get(source)
            .unwrap_or(&self.default_source_weight);

        if let Some(&bonus) = self.category_bonus.get(primary_category) {
            score += bonus;
        }

        if event_types.iter().any(|t| t == ALERT_EVENT_TYPE) {
            score += self.alert_bonus;
        }

        score
    }

    /// Built-in seed mirroring the production source set. Used as fallback
    /// if no config is found.
    pub fn default_seed() -> Self {
        let mut source_weights = HashMap::new();
        for (k, v) in [
            ("github_trending", 10),
            ("gitee_trending", 8),
            ("hacker_news", 12),
            ("readhub", 6),
            ("oschina", 5),
            ("juejin", 5),
        ] {
            source_weights.insert(k.to_string(), v);
        }

        let mut category_bonus = HashMap::new();
        for (k, v) in [("security", 15), ("ai_ml", 12), ("major_announcement", 10)] {
            category_bonus.insert(k.to_string(), v);
        }

        Self {
            default_source_weight: 1,
            source_weights,
            category_bonus,
            alert_bonus: 20,
        }
    }
}
