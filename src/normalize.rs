//! normalize.rs — text cleanup and bilingual title/description rendering.

use once_cell::sync::OnceCell;
use regex::Regex;

use crate::translate::{GlossaryTranslator, Translator};

/// Placeholder for a title that is blank after cleanup.
pub const EMPTY_TITLE: &str = "无标题";
/// Placeholder for a description that is blank after cleanup.
pub const EMPTY_DESCRIPTION: &str = "无描述信息";

/// Shared cleanup for feed text: decode HTML entities, strip tags, collapse
/// whitespace, trim.
pub fn clean_text(s: &str) -> String {
    let mut out = html_escape::decode_html_entities(s).to_string();

    static RE_TAGS: OnceCell<Regex> = OnceCell::new();
    let re_tags = RE_TAGS.get_or_init(|| Regex::new(r"(?is)</?[^>]+>").unwrap());
    out = re_tags.replace_all(&out, "").to_string();

    out.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Any character in the CJK Unified Ideographs block counts as local text.
pub fn contains_han(s: &str) -> bool {
    s.chars().any(|c| ('\u{4e00}'..='\u{9fff}').contains(&c))
}

/// Renders titles and descriptions for a Chinese-reading audience while
/// keeping the original wording recoverable.
pub struct Normalizer {
    translator: Box<dyn Translator>,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(Box::new(GlossaryTranslator::new()))
    }
}

impl Normalizer {
    pub fn new(translator: Box<dyn Translator>) -> Self {
        Self { translator }
    }

    /// Local titles pass through untouched; foreign titles become the
    /// bilingual form `"{localized} ({original})"`.
    pub fn normalize_title(&self, raw: &str) -> String {
        let text = clean_text(raw);
        if text.is_empty() {
            return EMPTY_TITLE.to_string();
        }
        if contains_han(&text) {
            return text;
        }
        format!("{} ({})", self.localize(&text), text)
    }

    /// Local descriptions pass through; foreign descriptions keep only the
    /// localized form.
    pub fn normalize_description(&self, raw: &str) -> String {
        let text = clean_text(raw);
        if text.is_empty() {
            return EMPTY_DESCRIPTION.to_string();
        }
        if contains_han(&text) {
            return text;
        }
        self.localize(&text)
    }

    fn localize(&self, text: &str) -> String {
        match self.translator.translate(text) {
            Ok(localized) => localized,
            Err(e) => {
                tracing::warn!(error = ?e, "translation failed, keeping source text");
                text.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    #[test]
    fn clean_text_strips_tags_and_entities() {
        let out = clean_text("  <p>Hello&nbsp;&amp; <b>world</b></p>\n\t ");
        assert_eq!(out, "Hello & world");
    }

    #[test]
    fn local_text_round_trips_unchanged() {
        let n = Normalizer::default();
        let title = "微软承认Windows 11严重漏洞";
        assert_eq!(n.normalize_title(title), title);
        assert_eq!(n.normalize_description(title), title);
    }

    #[test]
    fn foreign_title_becomes_bilingual() {
        let n = Normalizer::default();
        let out = n.normalize_title("GitHub Actions is slowly killing engineering teams");
        assert_eq!(
            out,
            "[翻译] GitHub Actions is slowly killing engineering teams \
             (GitHub Actions is slowly killing engineering teams)"
        );
    }

    #[test]
    fn foreign_description_keeps_only_localized_form() {
        let n = Normalizer::default();
        let out = n.normalize_description("Hacker News discussion with 81 points");
        assert_eq!(out, "Hacker News讨论 with 81 points");
    }

    #[test]
    fn blank_inputs_map_to_placeholders() {
        let n = Normalizer::default();
        assert_eq!(n.normalize_title("   "), EMPTY_TITLE);
        assert_eq!(n.normalize_title("<p></p>"), EMPTY_TITLE);
        assert_eq!(n.normalize_description(""), EMPTY_DESCRIPTION);
    }

    struct FailingTranslator;

    impl Translator for FailingTranslator {
        fn translate(&self, _text: &str) -> anyhow::Result<String> {
            Err(anyhow!("backend offline"))
        }
    }

    #[test]
    fn translation_failure_falls_back_to_source_text() {
        let n = Normalizer::new(Box::new(FailingTranslator));
        assert_eq!(n.normalize_title("Rust 1.80"), "Rust 1.80 (Rust 1.80)");
        assert_eq!(n.normalize_description("Rust 1.80"), "Rust 1.80");
    }
}
