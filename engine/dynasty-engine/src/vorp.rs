//! VORP (Value Over Replacement Player)
//!
//! `vorp = (ppg - replacement_level) * scarcity`
//!
//! Replacement level is the per-game output of a typical waiver-wire player in a 12-team
//! league. VORP may be negative; it is only floored at zero when the final value is composed.

use crate::models::{LeagueFormat, PlayerStats, StatKey, VorpTier};
use crate::position::{profile_for, Position};
use serde::{Deserialize, Serialize};

/// QB scarcity when two quarterbacks can start
pub const SUPERFLEX_QB_SCARCITY: f64 = 1.8;

/// TE scarcity in tight end premium leagues
pub const TEP_TE_SCARCITY: f64 = 1.4;

/// Season length assumed when games played is missing
pub const DEFAULT_GAMES: f64 = 17.0;

/// Fixed PPR table used when a stat line has no fantasy point total
const OFFENSE_PPR_POINTS: &[(StatKey, f64)] = &[
    (StatKey::PassingYards, 0.04),
    (StatKey::PassingTds, 4.0),
    (StatKey::Interceptions, -2.0),
    (StatKey::RushingYards, 0.1),
    (StatKey::RushingTds, 6.0),
    (StatKey::Receptions, 1.0),
    (StatKey::ReceivingYards, 0.1),
    (StatKey::ReceivingTds, 6.0),
    (StatKey::FumblesLost, -2.0),
];

/// Typical IDP scoring. Solo tackles and fumble recoveries are handled separately.
const IDP_POINTS: &[(StatKey, f64)] = &[
    (StatKey::AssistTackles, 0.5),
    (StatKey::Sacks, 2.0),
    (StatKey::Tfl, 1.0),
    (StatKey::QbHits, 0.5),
    (StatKey::Interceptions, 3.0),
    (StatKey::PassesDefended, 1.0),
    (StatKey::ForcedFumbles, 2.0),
    (StatKey::DefensiveTds, 6.0),
];

const IDP_SOLO_TACKLE_POINTS: f64 = 1.0;
const IDP_FUMBLE_RECOVERY_POINTS: f64 = 2.0;

/// VORP cut points of one position, from best to worst
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VorpThresholds {
    pub elite: f64,
    pub star: f64,
    pub starter: f64,
    pub depth: f64,
}

impl VorpThresholds {
    pub fn classify(&self, vorp: f64) -> VorpTier {
        if vorp >= self.elite {
            VorpTier::Elite
        } else if vorp >= self.star {
            VorpTier::Star
        } else if vorp >= self.starter {
            VorpTier::Starter
        } else if vorp >= self.depth {
            VorpTier::Depth
        } else {
            VorpTier::Replacement
        }
    }
}

/// Scarcity multiplier for a position under the given league format
pub fn scarcity(position: Position, format: LeagueFormat) -> f64 {
    match position {
        Position::QB if format.superflex => SUPERFLEX_QB_SCARCITY,
        Position::TE if format.te_premium => TEP_TE_SCARCITY,
        _ => position.profile().scarcity,
    }
}

/// Value over replacement. Unmodeled positions return 0.0.
pub fn calculate_vorp(ppg: f64, position: &str, format: LeagueFormat) -> f64 {
    match Position::parse(position) {
        Some(position) => {
            (ppg - position.profile().replacement_level) * scarcity(position, format)
        }
        None => 0.0,
    }
}

pub fn vorp_tier(vorp: f64, position: &str) -> VorpTier {
    profile_for(position).map_or(VorpTier::Unknown, |profile| profile.vorp_tiers.classify(vorp))
}

/// Games played denominator: 17 when absent or non-positive, never below 1
pub fn games_played(stats: &PlayerStats) -> f64 {
    stats.games.filter(|games| *games > 0.0).unwrap_or(DEFAULT_GAMES).max(1.0)
}

/// PPR points per game from a season stat line.
///
/// Offensive positions use the season fantasy point total when it is present and positive,
/// otherwise points are rebuilt from counting stats. IDP always uses the IDP table.
pub fn ppg_from_stats(stats: &PlayerStats, position: &str) -> f64 {
    let is_offense = Position::parse(position).is_some_and(|p| !p.is_idp());

    if is_offense {
        if let Some(total) = stats.fantasy_points_ppr.filter(|points| *points > 0.0) {
            return total / games_played(stats);
        }
        return offensive_points(stats) / games_played(stats);
    }

    idp_points(stats) / games_played(stats)
}

fn table_points(stats: &PlayerStats, table: &[(StatKey, f64)]) -> f64 {
    table.iter().map(|(key, points)| stats.value(*key) * points).sum()
}

fn offensive_points(stats: &PlayerStats) -> f64 {
    table_points(stats, OFFENSE_PPR_POINTS)
}

fn idp_points(stats: &PlayerStats) -> f64 {
    // Some sources only report combined tackles
    let solo = stats.solo_tackles.filter(|solo| *solo != 0.0).or(stats.tackles).unwrap_or(0.0);
    let recoveries =
        stats.value(StatKey::FumbleRecoveryOpp) + stats.value(StatKey::FumbleRecoveryOwn);

    solo * IDP_SOLO_TACKLE_POINTS
        + recoveries * IDP_FUMBLE_RECOVERY_POINTS
        + table_points(stats, IDP_POINTS)
}
