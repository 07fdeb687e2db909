use crate::position::Position;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Declares the closed set of stat fields once and derives the typed record, the key
/// enumeration and the keyed accessors from it.
macro_rules! stat_fields {
    ($($field:ident => $key:ident, $name:literal;)+) => {
        /// Names of every stat field a player record can carry
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(rename_all = "camelCase")]
        pub enum StatKey {
            $($key,)+
        }

        impl StatKey {
            pub const ALL: &'static [StatKey] = &[$(StatKey::$key,)+];

            /// Wire name used by the source adapters
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(StatKey::$key => $name,)+
                }
            }

            pub fn parse(name: &str) -> Option<Self> {
                match name {
                    $($name => Some(StatKey::$key),)+
                    _ => None,
                }
            }
        }

        /// Season stat line. Every field is optional: an absent stat is not a zero stat.
        #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
        #[serde(rename_all = "camelCase", default)]
        pub struct PlayerStats {
            $(pub $field: Option<f64>,)+
        }

        impl PlayerStats {
            pub fn get(&self, key: StatKey) -> Option<f64> {
                match key {
                    $(StatKey::$key => self.$field,)+
                }
            }

            pub fn set(&mut self, key: StatKey, value: Option<f64>) {
                match key {
                    $(StatKey::$key => self.$field = value,)+
                }
            }
        }
    };
}

stat_fields! {
    games => Games, "games";
    fantasy_points => FantasyPoints, "fantasyPoints";
    fantasy_points_ppr => FantasyPointsPpr, "fantasyPointsPpr";
    completions => Completions, "completions";
    attempts => Attempts, "attempts";
    passing_yards => PassingYards, "passingYards";
    passing_tds => PassingTds, "passingTds";
    interceptions => Interceptions, "interceptions";
    carries => Carries, "carries";
    rushing_yards => RushingYards, "rushingYards";
    rushing_tds => RushingTds, "rushingTds";
    targets => Targets, "targets";
    receptions => Receptions, "receptions";
    receiving_yards => ReceivingYards, "receivingYards";
    receiving_tds => ReceivingTds, "receivingTds";
    fumbles_lost => FumblesLost, "fumblesLost";
    tackles => Tackles, "tackles";
    solo_tackles => SoloTackles, "soloTackles";
    assist_tackles => AssistTackles, "assistTackles";
    tfl => Tfl, "tfl";
    sacks => Sacks, "sacks";
    qb_hits => QbHits, "qbHits";
    passes_defended => PassesDefended, "passesDefended";
    forced_fumbles => ForcedFumbles, "forcedFumbles";
    fumble_recovery_opp => FumbleRecoveryOpp, "fumbleRecoveryOpp";
    fumble_recovery_own => FumbleRecoveryOwn, "fumbleRecoveryOwn";
    defensive_tds => DefensiveTds, "defensiveTds";
}

impl fmt::Display for StatKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl PlayerStats {
    /// Stat value, treating an absent stat as zero
    pub fn value(&self, key: StatKey) -> f64 {
        self.get(key).unwrap_or(0.0)
    }

    /// Present stats in declaration order
    pub fn present(&self) -> impl Iterator<Item = (StatKey, f64)> + '_ {
        StatKey::ALL.iter().filter_map(move |key| self.get(*key).map(|value| (*key, value)))
    }

    /// Builder-style setter
    pub fn with(mut self, key: StatKey, value: f64) -> Self {
        self.set(key, Some(value));
        self
    }
}

/// One player's normalized stat line for one season, as produced by the source adapters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerStatRecord {
    pub id: String,
    pub name: String,
    pub position: Position,
    pub age: Option<u32>,
    pub team: Option<String>,
    pub stats: PlayerStats,
}

impl PlayerStatRecord {
    pub fn new(id: impl Into<String>, name: impl Into<String>, position: Position) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            position,
            age: None,
            team: None,
            stats: PlayerStats::default(),
        }
    }

    pub fn with_age(mut self, age: u32) -> Self {
        self.age = Some(age);
        self
    }

    pub fn with_team(mut self, team: impl Into<String>) -> Self {
        self.team = Some(team.into());
        self
    }

    pub fn with_stats(mut self, stats: PlayerStats) -> Self {
        self.stats = stats;
        self
    }
}

/// Players of one season keyed by player id
pub type SeasonPlayers = HashMap<String, PlayerStatRecord>;

/// Season -> player id -> record
pub type MultiSeasonData = BTreeMap<i32, SeasonPlayers>;

/// Raw per-season stat lines for one player, keyed by season
pub type PerSeasonStats = BTreeMap<i32, PlayerStats>;

/// League format flags that change positional scarcity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeagueFormat {
    /// Two quarterbacks can start
    pub superflex: bool,

    /// Tight ends earn bonus points per reception
    pub te_premium: bool,
}

impl LeagueFormat {
    pub fn new(superflex: bool, te_premium: bool) -> Self {
        Self { superflex, te_premium }
    }
}

/// Weighted multi-season stat line for one player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedPlayerRecord {
    /// Identity fields from the most recent season, stats averaged across seasons
    #[serde(flatten)]
    pub record: PlayerStatRecord,

    /// Seasons that contributed, most recent first
    pub seasons_aggregated: Vec<i32>,

    /// Weight applied to each contributing season
    pub aggregation_weights: BTreeMap<i32, f64>,
}

/// VORP tier, ordered so that `Elite` is the greatest
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VorpTier {
    Unknown,
    Replacement,
    Depth,
    Starter,
    Star,
    Elite,
}

impl VorpTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            VorpTier::Unknown => "unknown",
            VorpTier::Replacement => "replacement",
            VorpTier::Depth => "depth",
            VorpTier::Starter => "starter",
            VorpTier::Star => "star",
            VorpTier::Elite => "elite",
        }
    }
}

impl fmt::Display for VorpTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a player sits on the aging curve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgeTier {
    Rising,
    Prime,
    Declining,
    Veteran,
    Unknown,
}

impl AgeTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            AgeTier::Rising => "rising",
            AgeTier::Prime => "prime",
            AgeTier::Declining => "declining",
            AgeTier::Veteran => "veteran",
            AgeTier::Unknown => "unknown",
        }
    }
}

impl fmt::Display for AgeTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Dynasty trade recommendation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Recommendation {
    Buy,
    Hold,
    Sell,
}

impl Recommendation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Recommendation::Buy => "buy",
            Recommendation::Hold => "hold",
            Recommendation::Sell => "sell",
        }
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Age-curve state of a player and the resulting recommendation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DynastyWindow {
    pub current_factor: f64,
    pub peak_years_left: u32,
    pub projected_3yr: f64,
    pub tier: AgeTier,
    pub recommendation: Recommendation,
}

/// Dynasty window refined with multi-season performance trends
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnhancedDynastyWindow {
    #[serde(flatten)]
    pub window: DynastyWindow,
    pub trend_factor: f64,
    pub trend_notes: Vec<String>,
    pub seasons_analyzed: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Up,
    Down,
    Stable,
}

impl TrendDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrendDirection::Up => "up",
            TrendDirection::Down => "down",
            TrendDirection::Stable => "stable",
        }
    }
}

/// Year-over-year trend of one stat
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Trend {
    pub direction: TrendDirection,
    /// Average change in percent per year, 1 decimal
    pub magnitude: f64,
    /// Share of yearly changes agreeing with the average direction, 0..1
    pub consistency: f64,
}

impl Trend {
    /// No signal: used whenever there is not enough data
    pub fn stable() -> Self {
        Self { direction: TrendDirection::Stable, magnitude: 0.0, consistency: 1.0 }
    }
}

/// Full explanation of a player's dynasty value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueBreakdown {
    pub player_id: String,
    pub name: String,
    pub position: Position,
    pub team: Option<String>,
    pub age: Option<u32>,

    pub ppg: f64,
    pub vorp: f64,
    pub vorp_tier: VorpTier,
    pub age_factor: f64,
    pub age_tier: AgeTier,

    /// Value before clamping
    pub raw_value: f64,
    /// Clamped to 0..=10000
    pub final_value: u32,
    /// `final_value / 100`, 1 decimal
    pub display_value: f64,

    pub dynasty_window: DynastyWindow,
}
