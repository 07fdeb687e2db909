//! League-personalized values
//!
//! Applies a league's scoring multiplier to base dynasty values.

use crate::calculator::value_to_display;
use crate::models::{LeagueFormat, ValueBreakdown};
use crate::scoring::{detect_superflex, RawScoringSettings, ScoringMultiplier, ScoringSettings};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use tracing::info;

/// League configuration as returned by the league-settings provider.
/// Either field may be missing or `null`; that means standard scoring and no superflex.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LeagueSettings {
    #[serde(default, deserialize_with = "null_as_default")]
    pub scoring_settings: RawScoringSettings,

    #[serde(default, deserialize_with = "null_as_default")]
    pub roster_positions: Vec<String>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl LeagueSettings {
    pub fn scoring(&self) -> ScoringSettings {
        ScoringSettings::normalize(&self.scoring_settings)
    }

    /// Superflex and TE premium flags detected from the roster and scoring
    pub fn format(&self) -> LeagueFormat {
        LeagueFormat::new(detect_superflex(&self.roster_positions), self.scoring().is_te_premium())
    }

    pub fn description(&self) -> String {
        self.scoring().description()
    }
}

/// A base value breakdown with the league adjustment applied
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeagueAdjustedValue {
    #[serde(flatten)]
    pub breakdown: ValueBreakdown,

    /// Adjusted value, 0..=10000
    pub league_value: u32,
    pub league_display_value: f64,
    pub scoring_multiplier: f64,
    pub scoring_adjustments: BTreeMap<String, f64>,
    pub league_type: String,
}

/// Applies one league's scoring settings to value breakdowns
#[derive(Debug, Clone)]
pub struct LeagueValueAdjuster {
    scoring: ScoringSettings,
    league_type: String,
}

impl LeagueValueAdjuster {
    pub fn new(settings: &LeagueSettings) -> Self {
        let scoring = settings.scoring();
        let league_type = scoring.description();
        Self { scoring, league_type }
    }

    pub fn league_type(&self) -> &str {
        &self.league_type
    }

    pub fn adjust(&self, breakdown: ValueBreakdown) -> LeagueAdjustedValue {
        let scoring = self.scoring.multiplier(breakdown.position);
        let league_value = scoring.apply(breakdown.final_value);
        let ScoringMultiplier { multiplier, breakdown: adjustments } = scoring;

        LeagueAdjustedValue {
            breakdown,
            league_value,
            league_display_value: value_to_display(league_value),
            scoring_multiplier: multiplier,
            scoring_adjustments: adjustments,
            league_type: self.league_type.clone(),
        }
    }

    /// Adjusts every breakdown, highest league value first. Ties keep their input order.
    pub fn adjust_all(&self, breakdowns: Vec<ValueBreakdown>) -> Vec<LeagueAdjustedValue> {
        let mut adjusted: Vec<LeagueAdjustedValue> =
            breakdowns.into_iter().map(|breakdown| self.adjust(breakdown)).collect();
        adjusted.sort_by(|a, b| b.league_value.cmp(&a.league_value));

        info!("Applied {} scoring to {} players", self.league_type, adjusted.len());
        adjusted
    }
}
