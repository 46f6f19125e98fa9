//! typeahead-core
//!
//! Domain types, the phonetic provider seam, configuration and catalog
//! loading shared by the engine and the CLI.

pub mod catalog;
pub mod config;
pub mod error;
pub mod phonetic;
pub mod traits;
pub mod types;

pub use catalog::{load_catalog, CatalogLoader};
pub use config::{Config, ConfigPatch, SearchConfig};
pub use error::{Error, Result};
pub use phonetic::ReadingTable;
pub use traits::PhoneticProvider;
pub use types::{CategoryStat, Item, MatchKind, MatchOutcome, RankedResult, SearchOptions, SearchReport, Suggestions};
