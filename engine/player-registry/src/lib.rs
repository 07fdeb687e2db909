//! Player Registry - Season stat records from the source adapters
//!
//! This crate turns raw adapter output (nflverse, Tank01) into the normalized
//! `PlayerStatRecord`s the dynasty engine consumes, keeps them by season and
//! player id, and caches raw fetches per (source key, season).

pub mod cache;
pub mod error;
pub mod registry;
pub mod types;

pub use cache::{CachePolicy, CachedEntry, MemoryStatsCache, StatsCache};
pub use error::RegistryError;
pub use registry::{LoadSummary, PlayerRegistry};
pub use types::{normalize_position, RawPlayerRecord, RecordRejection};
