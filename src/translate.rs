//! translate.rs — localization seam used by the normalizer.
//!
//! The shipped backend is a phrase substitution table standing in for a real
//! MT service. Anything implementing [`Translator`] can be swapped in without
//! touching pipeline code.

use anyhow::Result;

/// Text-to-text localization contract. Implementations must stay cheap and
/// synchronous; a returned error degrades to the untranslated text upstream
/// instead of failing the batch.
pub trait Translator: Send + Sync {
    fn translate(&self, text: &str) -> Result<String>;
}

/// Ordered `(phrase, localized)` pairs. Matching is case-sensitive; longer
/// phrases are listed before anything they contain.
const GLOSSARY: &[(&str, &str)] = &[
    ("Artificial Intelligence", "人工智能"),
    ("Machine Learning", "机器学习"),
    ("Deep Learning", "深度学习"),
    ("Security vulnerability", "安全漏洞"),
    ("Hacker News discussion", "Hacker News讨论"),
    ("New release", "新版本发布"),
    ("Open source", "开源"),
];

/// Substitution-table backend. Text with no glossary hit at all comes back
/// as `"[翻译] {text}"` so rendered output still marks machine-localized
/// copy.
#[derive(Debug, Clone, Copy, Default)]
pub struct GlossaryTranslator;

impl GlossaryTranslator {
    pub fn new() -> Self {
        Self
    }
}

impl Translator for GlossaryTranslator {
    fn translate(&self, text: &str) -> Result<String> {
        let mut out = text.to_string();
        for (phrase, localized) in GLOSSARY {
            out = out.replace(phrase, localized);
        }

        if out == text {
            return Ok(format!("[翻译] {text}"));
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn glossary_phrase_is_substituted_in_place() {
        let t = GlossaryTranslator::new();
        let out = t.translate("Hacker News discussion with 81 points").unwrap();
        assert_eq!(out, "Hacker News讨论 with 81 points");
    }

    #[test]
    fn multiple_phrases_substitute_independently() {
        let t = GlossaryTranslator::new();
        let out = t
            .translate("Machine Learning meets Deep Learning")
            .unwrap();
        assert_eq!(out, "机器学习 meets 深度学习");
    }

    #[test]
    fn untranslatable_text_gets_marker_prefix() {
        let t = GlossaryTranslator::new();
        let out = t.translate("quantum widgets").unwrap();
        assert_eq!(out, "[翻译] quantum widgets");
    }
}
