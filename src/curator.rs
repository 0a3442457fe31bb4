//! curator.rs — the batch pipeline: gate, normalize, classify, score, rank,
//! dedup.

use crate::classify::Classifier;
use crate::collect::types::RawEvent;
use crate::dedup::dedup_events;
use crate::event::CuratedEvent;
use crate::normalize::Normalizer;
use crate::score::ScoreWeights;

pub struct Curator {
    normalizer: Normalizer,
    classifier: Classifier,
    weights: ScoreWeights,
}

impl Curator {
    pub fn new(normalizer: Normalizer, weights: ScoreWeights) -> Self {
        Self {
            normalizer,
            classifier: Classifier::new(),
            weights,
        }
    }

    /// Glossary translator plus weights from config (or the seed).
    pub fn with_defaults() -> Self {
        Self::new(Normalizer::default(), ScoreWeights::load_default())
    }

    /// Curate one batch of raw events.
    ///
    /// Returns `(unique_events, processed_count)`: the ranked, deduplicated
    /// events in hotness order, plus the number of records that survived the
    /// validation gate (needed for snapshot bookkeeping, since dedup shrinks
    /// the list afterwards).
    pub fn curate(&self, raw: Vec<RawEvent>) -> (Vec<CuratedEvent>, usize) {
        let mut curated = Vec::with_capacity(raw.len());

        for ev in raw {
            // The only validation: events without a title or URL are noise.
            if ev.title.is_empty() || ev.url.is_empty() {
                continue;
            }

            let title = self.normalizer.normalize_title(&ev.title);
            let description = self.normalizer.normalize_description(&ev.description);

            let labels = self.classifier.classify(&format!("{title} {description}"));
            let primary_category = labels.primary_category().to_string();
            let hotness_score =
                self.weights
                    .score(&ev.source, &primary_category, &labels.event_types);

            curated.push(CuratedEvent {
                title,
                description,
                url: ev.url,
                source: ev.source,
                categories: labels.categories,
                event_types: labels.event_types,
                primary_category,
                hotness_score,
            });
        }

        let processed = curated.len();
        // Stable sort, then first-wins dedup: a URL/title clash keeps the
        // hottest copy.
        curated.sort_by(|a, b| b.hotness_score.cmp(&a.hotness_score));
        let unique = dedup_events(curated);

        (unique, processed)
    }
}
