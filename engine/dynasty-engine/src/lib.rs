//! # Dynasty Engine
//!
//! Computes a dynasty value for NFL players on a 0-10000 internal scale (0-100 for display).
//!
//! The value is composed from four models:
//! - value over replacement player (VORP) from per-game fantasy production,
//! - position-specific aging curves,
//! - weighted multi-season aggregation and trend detection,
//! - league scoring settings adjustments.
//!
//! Every valuation function is total: malformed or missing inputs fall back to documented
//! defaults instead of failing. Only configuration loading can return an error.

pub mod aging;
pub mod calculator;
pub mod config;
pub mod error;
pub mod league;
pub mod models;
pub mod multi_season;
pub mod picks;
pub mod position;
pub mod scoring;
pub mod vorp;


pub use calculator::{display_to_value, value_to_display, ValueCalculator};
pub use config::{DynastyConfig, SeasonWeights, TrendParams, ValuationParams};
pub use error::{ConfigError, UnknownPosition};
pub use league::{LeagueAdjustedValue, LeagueSettings, LeagueValueAdjuster};
pub use models::*;
pub use multi_season::SeasonAggregator;
pub use position::{Position, PositionProfile};
pub use scoring::{RawScoringSettings, ScoringKey, ScoringMultiplier, ScoringSettings};

/// Current version of the engine
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Lowest internal value a player can have
pub const MIN_VALUE: u32 = 0;

/// Highest internal value a player can have
pub const MAX_VALUE: u32 = 10_000;

/// Rounds to a fixed number of decimals, used for every reported figure.
pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
