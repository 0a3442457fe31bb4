//! classify.rs — keyword classification against ordered rule tables.
//!
//! The tables live in `classifier_rules.json` at the crate root and are
//! compiled in. Order matters twice: entries are checked top to bottom, and
//! the first matched category becomes the primary one.

use once_cell::sync::Lazy;
use serde::Deserialize;

/// Category assigned when no keyword matches.
pub const FALLBACK_CATEGORY: &str = "general";
/// Event type assigned when no keyword matches.
pub const FALLBACK_EVENT_TYPE: &str = "community_discussion";
/// Event type that triggers the scorer's alert bonus.
pub const ALERT_EVENT_TYPE: &str = "security_alert";

#[derive(Debug, Deserialize)]
struct RuleEntry {
    name: String,
    keywords: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RuleTables {
    categories: Vec<RuleEntry>,
    event_types: Vec<RuleEntry>,
}

static RULES: Lazy<RuleTables> = Lazy::new(|| {
    let raw = include_str!("../classifier_rules.json");
    let mut tables: RuleTables = serde_json::from_str(raw).expect("valid classifier rules");
    // Keywords are kept human-readable in the file; matching is lowercase.
    for entry in tables
        .categories
        .iter_mut()
        .chain(tables.event_types.iter_mut())
    {
        for kw in &mut entry.keywords {
            *kw = kw.to_lowercase();
        }
    }
    tables
});

/// Labels for one event. Both lists are non-empty by construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub categories: Vec<String>,
    pub event_types: Vec<String>,
}

impl Classification {
    pub fn primary_category(&self) -> &str {
        self.categories
            .first()
            .map(String::as_str)
            .unwrap_or(FALLBACK_CATEGORY)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Classifier;

impl Classifier {
    pub fn new() -> Self {
        Self
    }

    /// Case-insensitive substring match over the combined title+description
    /// text. Unmatched events fall back to `general` /
    /// `community_discussion` so every event carries at least one label of
    /// each kind.
    pub fn classify(&self, text: &str) -> Classification {
        let haystack = text.to_lowercase();

        let mut categories = matched_names(&RULES.categories, &haystack);
        if categories.is_empty() {
            categories.push(FALLBACK_CATEGORY.to_string());
        }

        let mut event_types = matched_names(&RULES.event_types, &haystack);
        if event_types.is_empty() {
            event_types.push(FALLBACK_EVENT_TYPE.to_string());
        }

        Classification {
            categories,
            event_types,
        }
    }
}

fn matched_names(table: &[RuleEntry], haystack: &str) -> Vec<String> {
    table
        .iter()
        .filter(|entry| entry.keywords.iter().any(|kw| haystack.contains(kw.as_str())))
        .map(|entry| entry.name.clone())
        .collect()
}
