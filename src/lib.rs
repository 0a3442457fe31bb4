// src/lib.rs
// Public library surface for integration tests (and potential reuse).

pub mod classify;
pub mod collect;
pub mod curator;
pub mod dedup;
pub mod event;
pub mod normalize;
pub mod report;
pub mod score;
pub mod store;
pub mod translate;

// ---- Re-exports for stable public API ----
pub use crate::collect::types::{EventCollector, RawEvent};
pub use crate::curator::Curator;
pub use crate::event::{CuratedEvent, DailySnapshot, PeriodicReport};
pub use crate::store::RetentionStore;
