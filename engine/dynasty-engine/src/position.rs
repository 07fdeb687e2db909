//! Position capability table
//!
//! Every model in the engine branches on position. The constants for all of them live in a
//! single static table indexed by [`Position`], so a lookup happens once per call instead of
//! string comparisons scattered across modules.

use crate::aging::AgingCurve;
use crate::error::UnknownPosition;
use crate::models::StatKey;
use crate::vorp::VorpThresholds;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Fantasy positions modeled by the engine (5 offensive + 3 IDP)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Position {
    QB,
    RB,
    WR,
    TE,
    K,
    DL,
    LB,
    DB,
}

impl Position {
    pub const ALL: [Position; 8] = [
        Position::QB,
        Position::RB,
        Position::WR,
        Position::TE,
        Position::K,
        Position::DL,
        Position::LB,
        Position::DB,
    ];

    /// Parse a position code, case-insensitive. Returns `None` for unmodeled positions.
    pub fn parse(code: &str) -> Option<Self> {
        match code.trim().to_ascii_uppercase().as_str() {
            "QB" => Some(Position::QB),
            "RB" => Some(Position::RB),
            "WR" => Some(Position::WR),
            "TE" => Some(Position::TE),
            "K" => Some(Position::K),
            "DL" => Some(Position::DL),
            "LB" => Some(Position::LB),
            "DB" => Some(Position::DB),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Position::QB => "QB",
            Position::RB => "RB",
            Position::WR => "WR",
            Position::TE => "TE",
            Position::K => "K",
            Position::DL => "DL",
            Position::LB => "LB",
            Position::DB => "DB",
        }
    }

    /// Individual defensive player positions
    pub fn is_idp(&self) -> bool {
        matches!(self, Position::DL | Position::LB | Position::DB)
    }

    /// Static capability profile for this position
    pub fn profile(&self) -> &'static PositionProfile {
        &PROFILES[*self as usize]
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Position {
    type Err = UnknownPosition;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Position::parse(s).ok_or_else(|| UnknownPosition(s.to_string()))
    }
}

/// Per-position constants shared by the VORP, aging, composition and trend models
#[derive(Debug)]
pub struct PositionProfile {
    pub position: Position,

    /// Points per game of a typical waiver-wire player in a 12-team league
    pub replacement_level: f64,

    /// Scarcity multiplier in a standard 1QB, non-TEP league
    pub scarcity: f64,

    /// Cross-position normalization applied when composing the final value
    pub value_boost: f64,

    pub aging: AgingCurve,

    pub vorp_tiers: VorpThresholds,

    /// Stats trended across seasons for this position
    pub key_stats: &'static [StatKey],
}

/// Look up a profile by position code. `None` for unmodeled positions.
pub fn profile_for(code: &str) -> Option<&'static PositionProfile> {
    Position::parse(code).map(|position| position.profile())
}

const PASSER_KEY_STATS: &[StatKey] =
    &[StatKey::PassingYards, StatKey::PassingTds, StatKey::Interceptions];
const RUSHER_KEY_STATS: &[StatKey] =
    &[StatKey::RushingYards, StatKey::RushingTds, StatKey::Receptions];
const RECEIVER_KEY_STATS: &[StatKey] =
    &[StatKey::ReceivingYards, StatKey::ReceivingTds, StatKey::Receptions];
const DEFENDER_KEY_STATS: &[StatKey] =
    &[StatKey::SoloTackles, StatKey::Sacks, StatKey::Interceptions];

// Indexed by `Position as usize`; order must match the enum declaration.
static PROFILES: [PositionProfile; 8] = [
    PositionProfile {
        position: Position::QB,
        replacement_level: 15.0,
        scarcity: 1.0,
        value_boost: 1.0,
        aging: AgingCurve { peak_start: 26, peak_end: 32, decay_rate: 0.03, pre_peak_growth: 0.04 },
        vorp_tiers: VorpThresholds { elite: 12.0, star: 8.0, starter: 4.0, depth: 0.0 },
        key_stats: PASSER_KEY_STATS,
    },
    PositionProfile {
        position: Position::RB,
        replacement_level: 8.0,
        scarcity: 1.3,
        value_boost: 1.1,
        aging: AgingCurve { peak_start: 23, peak_end: 26, decay_rate: 0.10, pre_peak_growth: 0.05 },
        vorp_tiers: VorpThresholds { elite: 10.0, star: 6.0, starter: 3.0, depth: 0.0 },
        key_stats: RUSHER_KEY_STATS,
    },
    PositionProfile {
        position: Position::WR,
        replacement_level: 7.5,
        scarcity: 1.0,
        value_boost: 1.0,
        aging: AgingCurve { peak_start: 25, peak_end: 29, decay_rate: 0.05, pre_peak_growth: 0.04 },
        vorp_tiers: VorpThresholds { elite: 8.0, star: 5.0, starter: 2.0, depth: 0.0 },
        key_stats: RECEIVER_KEY_STATS,
    },
    PositionProfile {
        position: Position::TE,
        replacement_level: 5.0,
        scarcity: 1.1,
        value_boost: 1.0,
        aging: AgingCurve { peak_start: 26, peak_end: 30, decay_rate: 0.04, pre_peak_growth: 0.03 },
        vorp_tiers: VorpThresholds { elite: 6.0, star: 4.0, starter: 2.0, depth: 0.0 },
        key_stats: RECEIVER_KEY_STATS,
    },
    PositionProfile {
        position: Position::K,
        replacement_level: 6.0,
        scarcity: 0.3,
        value_boost: 0.5,
        aging: AgingCurve { peak_start: 26, peak_end: 36, decay_rate: 0.02, pre_peak_growth: 0.02 },
        vorp_tiers: VorpThresholds { elite: 3.0, star: 2.0, starter: 1.0, depth: 0.0 },
        key_stats: &[],
    },
    PositionProfile {
        position: Position::DL,
        replacement_level: 4.0,
        scarcity: 0.9,
        value_boost: 3.5,
        aging: AgingCurve { peak_start: 25, peak_end: 29, decay_rate: 0.06, pre_peak_growth: 0.04 },
        vorp_tiers: VorpThresholds { elite: 5.0, star: 3.0, starter: 1.5, depth: 0.0 },
        key_stats: DEFENDER_KEY_STATS,
    },
    PositionProfile {
        position: Position::LB,
        replacement_level: 6.0,
        scarcity: 1.0,
        value_boost: 2.5,
        aging: AgingCurve { peak_start: 24, peak_end: 28, decay_rate: 0.07, pre_peak_growth: 0.04 },
        vorp_tiers: VorpThresholds { elite: 6.0, star: 4.0, starter: 2.0, depth: 0.0 },
        key_stats: DEFENDER_KEY_STATS,
    },
    PositionProfile {
        position: Position::DB,
        replacement_level: 3.5,
        scarcity: 0.8,
        value_boost: 2.2,
        aging: AgingCurve { peak_start: 25, peak_end: 29, decay_rate: 0.06, pre_peak_growth: 0.04 },
        vorp_tiers: VorpThresholds { elite: 4.0, star: 2.5, starter: 1.0, depth: 0.0 },
        key_stats: DEFENDER_KEY_STATS,
    },
];
