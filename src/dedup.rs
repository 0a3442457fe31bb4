//! dedup.rs — order-preserving duplicate elimination.

use std::collections::HashSet;

use crate::event::CuratedEvent;

/// Drop events whose exact URL or lowercased title was already seen.
///
/// An event is kept only when both keys are unseen, and both are marked seen
/// on keep. First occurrence wins, so callers that rank before deduplicating
/// keep the highest-ranked copy. Running this on already-unique input is a
/// no-op.
pub fn dedup_events(events: Vec<CuratedEvent>) -> Vec<CuratedEvent> {
    let mut seen_urls: HashSet<String> = HashSet::new();
    let mut seen_titles: HashSet<String> = HashSet::new();
    let mut unique = Vec::with_capacity(events.len());

    for ev in events {
        let title_key = ev.title.to_lowercase();
        if seen_urls.contains(&ev.url) || seen_titles.contains(&title_key) {
            continue;
        }
        seen_urls.insert(ev.url.clone());
        seen_titles.insert(title_key);
        unique.push(ev);
    }

    unique
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(title: &str, url: &str) -> CuratedEvent {
        CuratedEvent {
            title: title.to_string(),
            description: "d".to_string(),
            url: url.to_string(),
            source: "readhub".to_string(),
            categories: vec!["general".to_string()],
            event_types: vec!["community_discussion".to_string()],
            primary_category: "general".to_string(),
            hotness_score: 6,
        }
    }

    #[test]
    fn same_url_different_title_keeps_first() {
        let out = dedup_events(vec![
            event("first", "https://example.test/a"),
            event("second", "https://example.test/a"),
        ]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].title, "first");
    }

    #[test]
    fn title_match_is_case_insensitive() {
        let out = dedup_events(vec![
            event("Rust 1.80 Released", "https://example.test/a"),
            event("rust 1.80 released", "https://example.test/b"),
        ]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].url, "https://example.test/a");
    }

    #[test]
    fn dropped_event_does_not_reserve_its_other_key() {
        // The third event loses on title; its URL stays unseen, so the
        // fourth one still gets in.
        let out = dedup_events(vec![
            event("a", "https://example.test/a"),
            event("b", "https://example.test/b"),
            event("a", "https://example.test/c"),
            event("c", "https://example.test/c"),
        ]);
        let titles: Vec<_> = out.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["a", "b", "c"]);
    }

    #[test]
    fn idempotent_on_unique_input() {
        let input = vec![
            event("a", "https://example.test/a"),
            event("b", "https://example.test/b"),
        ];
        let once = dedup_events(input.clone());
        let twice = dedup_events(once.clone());
        assert_eq!(once, twice);
        assert_eq!(once, input);
    }
}
