//! Configuration for the dynasty engine

use crate::error::ConfigError;
use crate::{MAX_VALUE, MIN_VALUE};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

/// Configuration for the valuation engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DynastyConfig {
    /// Value composition parameters
    pub valuation: ValuationParams,

    /// Multi-season weighting policy
    pub seasons: SeasonWeights,

    /// Trend detection parameters
    pub trends: TrendParams,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValuationParams {
    /// Scale from VORP to internal value (an elite season lands near 9000-10000)
    pub vorp_multiplier: f64,

    /// Multiplier for young players already producing above replacement
    pub youth_bonus: f64,

    /// Youth bonus applies strictly below this age
    pub youth_age_limit: u32,

    pub min_value: u32,
    pub max_value: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeasonWeights {
    /// Weight by years ago: index 0 is the current season
    pub weights: Vec<f64>,

    /// Weight for seasons older than the table covers
    pub default_weight: f64,

    /// Number of seasons loaded for multi-season valuation
    pub seasons_to_aggregate: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrendParams {
    /// Average yearly change beyond which a trend is up or down (0.05 = 5%)
    pub direction_threshold: f64,

    /// Minimum consistency for a trend to move the dynasty window
    pub consistency_threshold: f64,

    /// Trend factor multiplier for a consistent upward trend
    pub up_factor: f64,

    /// Trend factor multiplier for a consistent downward trend
    pub down_factor: f64,
}

impl Default for DynastyConfig {
    fn default() -> Self {
        Self {
            valuation: ValuationParams::default(),
            seasons: SeasonWeights::default(),
            trends: TrendParams::default(),
        }
    }
}

impl Default for ValuationParams {
    fn default() -> Self {
        Self {
            vorp_multiplier: 750.0,
            youth_bonus: 1.15,
            youth_age_limit: 25,
            min_value: MIN_VALUE,
            max_value: MAX_VALUE,
        }
    }
}

impl Default for SeasonWeights {
    fn default() -> Self {
        Self { weights: vec![0.50, 0.30, 0.15, 0.05], default_weight: 0.05, seasons_to_aggregate: 3 }
    }
}

impl Default for TrendParams {
    fn default() -> Self {
        Self { direction_threshold: 0.05, consistency_threshold: 0.6, up_factor: 1.1, down_factor: 0.9 }
    }
}

impl SeasonWeights {
    /// Weight of a season `years_ago` seasons before the current one.
    /// Future seasons and seasons beyond the table get the default weight.
    pub fn weight_for(&self, years_ago: i32) -> f64 {
        usize::try_from(years_ago)
            .ok()
            .and_then(|index| self.weights.get(index).copied())
            .unwrap_or(self.default_weight)
    }
}

impl DynastyConfig {
    /// Load configuration from a TOML file. Missing sections keep their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;

        let config: Self = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Write configuration as TOML
    pub fn to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents)
            .map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })
    }

    /// Load configuration from environment variables on top of the defaults
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `DYNASTY_*` overrides from a variable lookup
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup("DYNASTY_VORP_MULTIPLIER") {
            self.valuation.vorp_multiplier = parse_var("DYNASTY_VORP_MULTIPLIER", &value)?;
        }

        if let Some(value) = lookup("DYNASTY_YOUTH_BONUS") {
            self.valuation.youth_bonus = parse_var("DYNASTY_YOUTH_BONUS", &value)?;
        }

        if let Some(value) = lookup("DYNASTY_YOUTH_AGE_LIMIT") {
            self.valuation.youth_age_limit = parse_var("DYNASTY_YOUTH_AGE_LIMIT", &value)?;
        }

        if let Some(value) = lookup("DYNASTY_SEASONS") {
            self.seasons.seasons_to_aggregate = parse_var("DYNASTY_SEASONS", &value)?;
        }

        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let valuation = &self.valuation;
        if valuation.vorp_multiplier <= 0.0 {
            return Err(invalid("valuation.vorp_multiplier must be positive"));
        }
        if valuation.youth_bonus < 1.0 {
            return Err(invalid("valuation.youth_bonus must be at least 1.0"));
        }
        if valuation.min_value > valuation.max_value || valuation.max_value > MAX_VALUE {
            return Err(invalid("valuation value range must satisfy min <= max <= 10000"));
        }

        let seasons = &self.seasons;
        if seasons.weights.iter().chain([&seasons.default_weight]).any(|w| *w < 0.0) {
            return Err(invalid("season weights must not be negative"));
        }
        if seasons.seasons_to_aggregate == 0 {
            return Err(invalid("seasons.seasons_to_aggregate must be at least 1"));
        }

        let trends = &self.trends;
        if !(0.0..=1.0).contains(&trends.consistency_threshold) {
            return Err(invalid("trends.consistency_threshold must be within 0..1"));
        }
        if trends.up_factor < 1.0 || trends.down_factor > 1.0 || trends.down_factor <= 0.0 {
            return Err(invalid("trend factors must satisfy 0 < down_factor <= 1 <= up_factor"));
        }

        Ok(())
    }
}

fn parse_var<T: FromStr>(name: &str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        message: format!("{name}={value:?} could not be parsed"),
    })
}

fn invalid(message: &str) -> ConfigError {
    ConfigError::InvalidValue { message: message.to_string() }
}
