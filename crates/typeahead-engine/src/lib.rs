//! typeahead-engine
//!
//! Ranked search-as-you-type over an in-memory catalog: strategy matching,
//! score blending, a category index and an LRU result cache, orchestrated by
//! [`SearchEngine`].

pub mod cache;
pub mod engine;
pub mod index;
pub mod matcher;
pub mod scorer;

pub use cache::{CacheKey, CacheStats, ResultCache};
pub use engine::{EngineStats, SearchEngine};
pub use index::CategoryIndex;
pub use matcher::{MatchTarget, Matcher};
pub use scorer::{final_score, type_weight, Scorer};
