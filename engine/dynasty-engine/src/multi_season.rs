//! Multi-season aggregation and trend detection
//!
//! A player's seasons are blended into one stat line with a weighted average that favors
//! recent seasons (50/30/15/5% by years ago). Year-over-year trends of each position's key
//! stats refine the age-based dynasty window.

use crate::aging::dynasty_window;
use crate::config::{DynastyConfig, SeasonWeights, TrendParams};
use crate::models::*;
use crate::position::profile_for;
use crate::round_to;
use chrono::{Datelike, Local, NaiveDate};
use std::collections::BTreeMap;
use tracing::debug;

/// First month of a new NFL season
const SEASON_START_MONTH: u32 = 9;

/// Trend factor below which one peak year is removed
const PEAK_SHRINK_BELOW: f64 = 0.9;
/// Trend factor above which one peak year is added
const PEAK_EXTEND_ABOVE: f64 = 1.1;
/// Trend factor below which the recommendation becomes sell
const FORCE_SELL_BELOW: f64 = 0.85;
/// Trend factor above which the recommendation becomes buy
const FORCE_BUY_ABOVE: f64 = 1.15;

/// NFL season in progress on a date. Before September the previous season is current.
pub fn current_season(today: NaiveDate) -> i32 {
    if today.month() < SEASON_START_MONTH {
        today.year() - 1
    } else {
        today.year()
    }
}

pub fn current_season_now() -> i32 {
    current_season(Local::now().date_naive())
}

/// The `count` most recent seasons, newest first
pub fn default_seasons(current_season: i32, count: u32) -> Vec<i32> {
    (0..count as i32).map(|years_ago| current_season - years_ago).collect()
}

/// Weighted multi-season aggregator
#[derive(Debug, Clone)]
pub struct SeasonAggregator {
    weights: SeasonWeights,
    trends: TrendParams,
    current_season: i32,
}

impl SeasonAggregator {
    pub fn new(config: &DynastyConfig, current_season: i32) -> Self {
        Self { weights: config.seasons.clone(), trends: config.trends.clone(), current_season }
    }

    pub fn with_defaults(current_season: i32) -> Self {
        Self::new(&DynastyConfig::default(), current_season)
    }

    pub fn current_season(&self) -> i32 {
        self.current_season
    }

    /// Weight of a season relative to the current season
    pub fn season_weight(&self, season: i32) -> f64 {
        self.weights.weight_for(self.current_season - season)
    }

    /// Blends every season a player appears in.
    ///
    /// Returns `None` when the player is in no season. A single season is returned as-is.
    /// Otherwise identity fields come from the latest season and each stat is the weighted
    /// average over the seasons that report it, normalized by the weight those seasons carry.
    pub fn aggregate(
        &self,
        data: &MultiSeasonData,
        player_id: &str,
    ) -> (Option<AggregatedPlayerRecord>, PerSeasonStats) {
        // Newest first
        let found: Vec<(i32, &PlayerStatRecord)> = data
            .iter()
            .rev()
            .filter_map(|(season, players)| players.get(player_id).map(|record| (*season, record)))
            .collect();

        let per_season: PerSeasonStats =
            found.iter().map(|(season, record)| (*season, record.stats.clone())).collect();

        let Some((latest_season, latest)) = found.first() else {
            return (None, per_season);
        };

        let aggregation_weights: BTreeMap<i32, f64> =
            found.iter().map(|(season, _)| (*season, self.season_weight(*season))).collect();
        let seasons_aggregated: Vec<i32> = found.iter().map(|(season, _)| *season).collect();

        if found.len() == 1 {
            let record = AggregatedPlayerRecord {
                record: (*latest).clone(),
                seasons_aggregated,
                aggregation_weights,
            };
            return (Some(record), per_season);
        }

        let mut stats = PlayerStats::default();
        for key in StatKey::ALL {
            let mut weighted_sum = 0.0;
            let mut total_weight = 0.0;

            for (season, record) in &found {
                if let Some(value) = record.stats.get(*key) {
                    let weight = aggregation_weights[season];
                    weighted_sum += value * weight;
                    total_weight += weight;
                }
            }

            if total_weight > 0.0 {
                stats.set(*key, Some(round_to(weighted_sum / total_weight, 2)));
            }
        }

        debug!(
            "Aggregated {} over seasons {:?} (latest {})",
            player_id, seasons_aggregated, latest_season
        );

        let record = AggregatedPlayerRecord {
            record: PlayerStatRecord { stats, ..(*latest).clone() },
            seasons_aggregated,
            aggregation_weights,
        };
        (Some(record), per_season)
    }

    pub fn trend(&self, per_season: &PerSeasonStats, key: StatKey) -> Trend {
        calculate_trend(per_season, key, &self.trends)
    }

    pub fn player_trends(&self, per_season: &PerSeasonStats, position: &str) -> BTreeMap<StatKey, Trend> {
        player_trends(per_season, position, &self.trends)
    }

    /// Age-based dynasty window refined by the player's key-stat trends
    pub fn enhanced_dynasty_window(
        &self,
        age: Option<u32>,
        position: &str,
        per_season: &PerSeasonStats,
    ) -> EnhancedDynastyWindow {
        let mut window = dynasty_window(age, position);
        let params = &self.trends;

        let mut trend_factor: f64 = 1.0;
        let mut trend_notes = Vec::new();

        for (key, trend) in self.player_trends(per_season, position) {
            if trend.consistency <= params.consistency_threshold {
                continue;
            }
            match trend.direction {
                TrendDirection::Up => {
                    trend_factor *= params.up_factor;
                    trend_notes.push(format!("{key}: +{:.1}%/yr", trend.magnitude));
                }
                TrendDirection::Down => {
                    trend_factor *= params.down_factor;
                    trend_notes.push(format!("{key}: {:.1}%/yr", trend.magnitude));
                }
                TrendDirection::Stable => {}
            }
        }

        if trend_factor < PEAK_SHRINK_BELOW {
            window.peak_years_left = window.peak_years_left.saturating_sub(1);
        } else if trend_factor > PEAK_EXTEND_ABOVE {
            window.peak_years_left += 1;
        }

        if trend_factor < FORCE_SELL_BELOW {
            window.recommendation = Recommendation::Sell;
        } else if trend_factor > FORCE_BUY_ABOVE {
            window.recommendation = Recommendation::Buy;
        }

        EnhancedDynastyWindow {
            window,
            trend_factor: round_to(trend_factor, 2),
            trend_notes,
            seasons_analyzed: per_season.len(),
        }
    }
}

/// Year-over-year trend of one stat.
///
/// Only seasons reporting the stat take part. Pairs whose older value is zero are skipped.
/// Without at least one usable pair the trend is stable.
pub fn calculate_trend(per_season: &PerSeasonStats, key: StatKey, params: &TrendParams) -> Trend {
    let values: Vec<f64> = per_season.values().rev().filter_map(|stats| stats.get(key)).collect();

    let changes: Vec<f64> = values
        .windows(2)
        .filter(|pair| pair[1] != 0.0)
        .map(|pair| (pair[0] - pair[1]) / pair[1])
        .collect();

    if changes.is_empty() {
        return Trend::stable();
    }

    let average = changes.iter().sum::<f64>() / changes.len() as f64;

    let direction = if average > params.direction_threshold {
        TrendDirection::Up
    } else if average < -params.direction_threshold {
        TrendDirection::Down
    } else {
        TrendDirection::Stable
    };

    let consistency = if changes.len() > 1 {
        let agreeing = changes.iter().filter(|change| (**change > 0.0) == (average > 0.0)).count();
        agreeing as f64 / changes.len() as f64
    } else {
        1.0
    };

    Trend { direction, magnitude: round_to(average * 100.0, 1), consistency: round_to(consistency, 2) }
}

/// Trends of the position's key stats. Unmodeled positions and kickers have none.
pub fn player_trends(
    per_season: &PerSeasonStats,
    position: &str,
    params: &TrendParams,
) -> BTreeMap<StatKey, Trend> {
    let key_stats = profile_for(position).map_or(&[][..], |profile| profile.key_stats);
    key_stats.iter().map(|key| (*key, calculate_trend(per_season, *key, params))).collect()
}
