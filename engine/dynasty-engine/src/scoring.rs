//! League scoring adjustments
//!
//! A league's scoring settings are normalized onto a canonical key set (any key the league
//! does not specify keeps its standard value) and then run through a pipeline of independent
//! adjustments. Each adjustment compares one setting against its standard baseline and yields
//! a factor; the factors are multiplied together and the product is clamped to [0.5, 2.0].

use crate::position::Position;
use crate::{round_to, MAX_VALUE, MIN_VALUE};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Scoring settings as delivered by the league provider, before normalization
pub type RawScoringSettings = HashMap<String, f64>;

pub const MIN_MULTIPLIER: f64 = 0.5;
pub const MAX_MULTIPLIER: f64 = 2.0;

/// Canonical scoring keys understood by the adjuster
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringKey {
    // Passing
    PassYd,
    PassTd,
    PassInt,
    Pass2pt,
    // Rushing
    RushYd,
    RushTd,
    Rush2pt,
    // Receiving
    Rec,
    RecYd,
    RecTd,
    Rec2pt,
    BonusRecTe,
    // Kicking
    Fgm,
    Fgmiss,
    Xpm,
    // IDP
    TklSolo,
    TklAst,
    TklLoss,
    Tkl,
    Sack,
    QbHit,
    Ff,
    FumRec,
    Int,
    PassDef,
    DefTd,
    Safe,
    // Offensive fumbles
    FumLost,
}

const SCORING_KEY_COUNT: usize = 28;

/// (key, canonical name, standard points), in declaration order of [`ScoringKey`]
const STANDARD_SCORING: [(ScoringKey, &str, f64); SCORING_KEY_COUNT] = [
    (ScoringKey::PassYd, "pass_yd", 0.04),
    (ScoringKey::PassTd, "pass_td", 4.0),
    (ScoringKey::PassInt, "pass_int", -2.0),
    (ScoringKey::Pass2pt, "pass_2pt", 2.0),
    (ScoringKey::RushYd, "rush_yd", 0.1),
    (ScoringKey::RushTd, "rush_td", 6.0),
    (ScoringKey::Rush2pt, "rush_2pt", 2.0),
    (ScoringKey::Rec, "rec", 1.0),
    (ScoringKey::RecYd, "rec_yd", 0.1),
    (ScoringKey::RecTd, "rec_td", 6.0),
    (ScoringKey::Rec2pt, "rec_2pt", 2.0),
    (ScoringKey::BonusRecTe, "bonus_rec_te", 0.0),
    (ScoringKey::Fgm, "fgm", 3.0),
    (ScoringKey::Fgmiss, "fgmiss", -1.0),
    (ScoringKey::Xpm, "xpm", 1.0),
    (ScoringKey::TklSolo, "tkl_solo", 1.0),
    (ScoringKey::TklAst, "tkl_ast", 0.5),
    (ScoringKey::TklLoss, "tkl_loss", 1.0),
    (ScoringKey::Tkl, "tkl", 1.0),
    (ScoringKey::Sack, "sack", 2.0),
    (ScoringKey::QbHit, "qb_hit", 0.5),
    (ScoringKey::Ff, "ff", 2.0),
    (ScoringKey::FumRec, "fum_rec", 2.0),
    (ScoringKey::Int, "int", 3.0),
    (ScoringKey::PassDef, "pass_def", 1.0),
    (ScoringKey::DefTd, "def_td", 6.0),
    (ScoringKey::Safe, "safe", 2.0),
    (ScoringKey::FumLost, "fum_lost", -2.0),
];

impl ScoringKey {
    pub fn all() -> impl Iterator<Item = ScoringKey> {
        STANDARD_SCORING.iter().map(|(key, _, _)| *key)
    }

    fn entry(&self) -> &'static (ScoringKey, &'static str, f64) {
        &STANDARD_SCORING[*self as usize]
    }

    pub fn as_str(&self) -> &'static str {
        self.entry().1
    }

    /// Points per event in a standard league
    pub fn standard(&self) -> f64 {
        self.entry().2
    }

    /// Maps a league provider key onto the canonical set.
    ///
    /// Offensive and kicking keys are used as-is. Defensive keys are only recognized with
    /// the `idp_` prefix; the unprefixed `sack`, `int`, `ff`, ... belong to team defense
    /// scoring and are ignored.
    pub fn from_external(key: &str) -> Option<Self> {
        let key = match key {
            "pass_yd" => ScoringKey::PassYd,
            "pass_td" => ScoringKey::PassTd,
            "pass_int" => ScoringKey::PassInt,
            "pass_2pt" => ScoringKey::Pass2pt,
            "rush_yd" => ScoringKey::RushYd,
            "rush_td" => ScoringKey::RushTd,
            "rush_2pt" => ScoringKey::Rush2pt,
            "rec" => ScoringKey::Rec,
            "rec_yd" => ScoringKey::RecYd,
            "rec_td" => ScoringKey::RecTd,
            "rec_2pt" => ScoringKey::Rec2pt,
            "bonus_rec_te" => ScoringKey::BonusRecTe,
            "fgm" => ScoringKey::Fgm,
            "fgmiss" => ScoringKey::Fgmiss,
            "xpm" => ScoringKey::Xpm,
            "idp_tkl_solo" => ScoringKey::TklSolo,
            "idp_tkl_ast" => ScoringKey::TklAst,
            "idp_tkl_loss" => ScoringKey::TklLoss,
            "idp_tkl" => ScoringKey::Tkl,
            "idp_sack" => ScoringKey::Sack,
            "idp_qb_hit" => ScoringKey::QbHit,
            "idp_ff" => ScoringKey::Ff,
            "idp_fum_rec" => ScoringKey::FumRec,
            "idp_int" => ScoringKey::Int,
            "idp_pass_def" => ScoringKey::PassDef,
            "idp_def_td" => ScoringKey::DefTd,
            "idp_safe" => ScoringKey::Safe,
            "fum_lost" => ScoringKey::FumLost,
            _ => return None,
        };
        Some(key)
    }
}

impl fmt::Display for ScoringKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalized scoring settings, total over every [`ScoringKey`]
#[derive(Debug, Clone, PartialEq)]
pub struct ScoringSettings {
    points: [f64; SCORING_KEY_COUNT],
}

impl Default for ScoringSettings {
    fn default() -> Self {
        Self::standard()
    }
}

impl ScoringSettings {
    pub fn standard() -> Self {
        Self { points: STANDARD_SCORING.map(|(_, _, points)| points) }
    }

    /// Overlays the recognized keys of a provider mapping onto the standard settings
    pub fn normalize(raw: &RawScoringSettings) -> Self {
        let mut settings = Self::standard();
        for (name, points) in raw {
            if let Some(key) = ScoringKey::from_external(name) {
                settings.set(key, *points);
            }
        }
        settings
    }

    pub fn get(&self, key: ScoringKey) -> f64 {
        self.points[key as usize]
    }

    pub fn set(&mut self, key: ScoringKey, points: f64) {
        self.points[key as usize] = points;
    }

    pub fn with(mut self, key: ScoringKey, points: f64) -> Self {
        self.set(key, points);
        self
    }

    /// Value multiplier for a position under these settings
    pub fn multiplier(&self, position: Position) -> ScoringMultiplier {
        let mut multiplier: f64 = 1.0;
        let mut breakdown = BTreeMap::new();

        for adjustment in ADJUSTMENTS {
            if let Some(Adjustment { name, factor }) = adjustment(self, position) {
                multiplier *= factor;
                breakdown.insert(name.to_string(), round_to((factor - 1.0) * 100.0, 1));
            }
        }

        ScoringMultiplier { multiplier: clamp_multiplier(multiplier), breakdown }
    }

    /// Human-readable league label, e.g. "Full PPR, TEP, 6pt Pass TD"
    pub fn description(&self) -> String {
        let mut parts = Vec::new();

        let rec = self.get(ScoringKey::Rec);
        parts.push(if rec >= 1.0 {
            "Full PPR"
        } else if rec >= 0.5 {
            "Half PPR"
        } else {
            "Standard"
        });

        if self.is_te_premium() {
            parts.push("TEP");
        }

        if self.get(ScoringKey::PassTd) >= 6.0 {
            parts.push("6pt Pass TD");
        }

        let sack = self.get(ScoringKey::Sack);
        let solo = self.get(ScoringKey::TklSolo);
        if sack >= 3.0 || solo >= 1.5 {
            parts.push("Heavy IDP");
        } else if sack > 0.0 || solo > 0.0 {
            parts.push("IDP");
        }

        parts.join(", ")
    }

    pub fn is_te_premium(&self) -> bool {
        self.get(ScoringKey::BonusRecTe) > 0.0
    }
}

/// Result of the scoring adjustment pipeline for one position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringMultiplier {
    /// Product of all adjustments, clamped to [0.5, 2.0]
    pub multiplier: f64,

    /// Adjustment name -> percent change, 1 decimal
    pub breakdown: BTreeMap<String, f64>,
}

impl ScoringMultiplier {
    pub fn neutral() -> Self {
        Self { multiplier: 1.0, breakdown: BTreeMap::new() }
    }

    /// Applies the multiplier to a base value, truncating and clamping to 0..=10000
    pub fn apply(&self, base_value: u32) -> u32 {
        let adjusted = (base_value as f64 * self.multiplier).trunc();
        adjusted.clamp(MIN_VALUE as f64, MAX_VALUE as f64) as u32
    }
}

/// Clamps to [0.5, 2.0]. An undefined product (`inf * 0`) saturates at the upper bound.
fn clamp_multiplier(multiplier: f64) -> f64 {
    if multiplier.is_nan() {
        MAX_MULTIPLIER
    } else {
        multiplier.clamp(MIN_MULTIPLIER, MAX_MULTIPLIER)
    }
}

struct Adjustment {
    name: &'static str,
    factor: f64,
}

type AdjustmentFn = fn(&ScoringSettings, Position) -> Option<Adjustment>;

// Applied in order; the product does not depend on it but the float rounding does.
const ADJUSTMENTS: &[AdjustmentFn] = &[
    reception_points,
    te_premium,
    passing_touchdowns,
    passing_yards,
    tackles,
    sacks,
    interceptions,
    passes_defended,
    field_goals,
];

/// Standard value of `solo + 0.5 * assist`
const STANDARD_TACKLE_VALUE: f64 = 1.0 + 0.5 * 0.5;

/// `1 + (actual - standard) * sensitivity`, skipped when the setting is standard
fn linear(name: &'static str, actual: f64, standard: f64, sensitivity: f64) -> Option<Adjustment> {
    (actual != standard).then(|| Adjustment { name, factor: 1.0 + (actual - standard) * sensitivity })
}

/// `1 + (actual / standard - 1) * sensitivity`, skipped when the setting is standard
fn ratio(name: &'static str, actual: f64, standard: f64, sensitivity: f64) -> Option<Adjustment> {
    (actual != standard)
        .then(|| Adjustment { name, factor: 1.0 + (actual / standard - 1.0) * sensitivity })
}

fn reception_points(settings: &ScoringSettings, position: Position) -> Option<Adjustment> {
    let sensitivity = match position {
        Position::WR => 0.15,
        Position::RB => 0.08,
        Position::TE => 0.10,
        _ => return None,
    };
    linear("ppr", settings.get(ScoringKey::Rec), ScoringKey::Rec.standard(), sensitivity)
}

fn te_premium(settings: &ScoringSettings, position: Position) -> Option<Adjustment> {
    let bonus = settings.get(ScoringKey::BonusRecTe);
    (position == Position::TE && bonus > 0.0)
        .then(|| Adjustment { name: "tep", factor: 1.0 + bonus * 0.15 })
}

fn passing_touchdowns(settings: &ScoringSettings, position: Position) -> Option<Adjustment> {
    if position != Position::QB {
        return None;
    }
    linear("pass_td", settings.get(ScoringKey::PassTd), ScoringKey::PassTd.standard(), 0.08)
}

fn passing_yards(settings: &ScoringSettings, position: Position) -> Option<Adjustment> {
    if position != Position::QB {
        return None;
    }
    // Leagues only vary this by hundredths
    linear("pass_yd", settings.get(ScoringKey::PassYd), ScoringKey::PassYd.standard(), 2.0)
}

fn tackles(settings: &ScoringSettings, position: Position) -> Option<Adjustment> {
    let sensitivity = match position {
        Position::LB => 0.3,
        Position::DL | Position::DB => 0.2,
        _ => return None,
    };
    let value = settings.get(ScoringKey::TklSolo) + settings.get(ScoringKey::TklAst) * 0.5;
    ratio("tackles", value, STANDARD_TACKLE_VALUE, sensitivity)
}

fn sacks(settings: &ScoringSettings, position: Position) -> Option<Adjustment> {
    let sensitivity = match position {
        Position::DL => 0.25,
        Position::LB | Position::DB => 0.15,
        _ => return None,
    };
    ratio("sacks", settings.get(ScoringKey::Sack), ScoringKey::Sack.standard(), sensitivity)
}

fn interceptions(settings: &ScoringSettings, position: Position) -> Option<Adjustment> {
    let sensitivity = match position {
        Position::DB => 0.2,
        Position::DL | Position::LB => 0.1,
        _ => return None,
    };
    ratio("ints", settings.get(ScoringKey::Int), ScoringKey::Int.standard(), sensitivity)
}

fn passes_defended(settings: &ScoringSettings, position: Position) -> Option<Adjustment> {
    let sensitivity = match position {
        Position::DB => 0.12,
        Position::DL | Position::LB => 0.08,
        _ => return None,
    };
    ratio("pass_def", settings.get(ScoringKey::PassDef), ScoringKey::PassDef.standard(), sensitivity)
}

fn field_goals(settings: &ScoringSettings, position: Position) -> Option<Adjustment> {
    if position != Position::K {
        return None;
    }
    ratio("fgm", settings.get(ScoringKey::Fgm), ScoringKey::Fgm.standard(), 0.3)
}

/// Scoring multiplier for a provider settings mapping and a position code
pub fn calculate_multiplier(raw: &RawScoringSettings, position: &str) -> ScoringMultiplier {
    match Position::parse(position) {
        Some(position) => ScoringSettings::normalize(raw).multiplier(position),
        None => ScoringMultiplier::neutral(),
    }
}

/// Adjusted value (0..=10000) together with the multiplier that produced it
pub fn apply_scoring_adjustment(
    base_value: u32,
    raw: &RawScoringSettings,
    position: &str,
) -> (u32, ScoringMultiplier) {
    let multiplier = calculate_multiplier(raw, position);
    (multiplier.apply(base_value), multiplier)
}

pub fn league_type_description(raw: &RawScoringSettings) -> String {
    ScoringSettings::normalize(raw).description()
}

/// A superflex-like roster slot, or at least two dedicated QB slots
pub fn detect_superflex(roster_positions: &[String]) -> bool {
    let slots: Vec<String> = roster_positions.iter().map(|slot| slot.to_ascii_uppercase()).collect();

    let flex_qb = slots.iter().any(|slot| {
        matches!(slot.as_str(), "SUPER_FLEX" | "QB/WR/RB/TE" | "OP") || slot.contains("SUPER")
    });

    flex_qb || slots.iter().filter(|slot| slot.as_str() == "QB").count() >= 2
}

pub fn detect_te_premium(raw: &RawScoringSettings) -> bool {
    ScoringSettings::normalize(raw).is_te_premium()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(entries: &[(&str, f64)]) -> RawScoringSettings {
        entries.iter().map(|(key, points)| (key.to_string(), *points)).collect()
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!((actual - expected).abs() < 1e-9, "expected {expected}, got {actual}");
    }

    #[test]
    fn test_standard_table_is_indexed_by_key() {
        for (index, key) in ScoringKey::all().enumerate() {
            assert_eq!(key as usize, index);
            assert_eq!(ScoringKey::from_external(key.as_str()).is_some(), !key.is_idp_only());
        }
    }

    impl ScoringKey {
        fn is_idp_only(&self) -> bool {
            (ScoringKey::TklSolo..=ScoringKey::Safe).contains(self)
        }
    }

    #[test]
    fn test_normalize_is_total_and_maps_idp_prefix() {
        let settings = ScoringSettings::normalize(&raw(&[
            ("rec", 0.5),
            ("idp_sack", 4.0),
            ("sack", 1.0),
            ("bogus", 9.0),
        ]));

        assert_eq!(settings.get(ScoringKey::Rec), 0.5);
        assert_eq!(settings.get(ScoringKey::Sack), 4.0);
        assert_eq!(settings.get(ScoringKey::PassTd), 4.0);
        assert_eq!(settings.get(ScoringKey::TklAst), 0.5);
        assert_eq!(ScoringSettings::normalize(&RawScoringSettings::new()), ScoringSettings::standard());
    }

    #[test]
    fn test_standard_league_is_neutral() {
        for position in Position::ALL {
            let result = ScoringSettings::standard().multiplier(position);
            assert_eq!(result, ScoringMultiplier::neutral(), "{position}");
        }
    }

    #[test]
    fn test_half_ppr_by_position() {
        let settings = raw(&[("rec", 0.5)]);

        let wr = calculate_multiplier(&settings, "WR");
        assert_close(wr.multiplier, 0.925);
        assert_eq!(wr.breakdown.get("ppr"), Some(&-7.5));

        assert_close(calculate_multiplier(&settings, "RB").multiplier, 0.96);
        assert_close(calculate_multiplier(&settings, "TE").multiplier, 0.95);
        assert_eq!(calculate_multiplier(&settings, "QB"), ScoringMultiplier::neutral());
    }

    #[test]
    fn test_te_premium() {
        let result = calculate_multiplier(&raw(&[("bonus_rec_te", 0.5)]), "TE");
        assert_close(result.multiplier, 1.075);
        assert_eq!(result.breakdown.get("tep"), Some(&7.5));
        assert!(result.breakdown.get("ppr").is_none());
    }

    #[test]
    fn test_quarterback_adjustments_compound() {
        let result = calculate_multiplier(&raw(&[("pass_td", 6.0), ("pass_yd", 0.05)]), "QB");
        assert_close(result.multiplier, 1.16 * 1.02);
        assert_eq!(result.breakdown.get("pass_td"), Some(&16.0));
        assert_eq!(result.breakdown.get("pass_yd"), Some(&2.0));
    }

    #[test]
    fn test_idp_sensitivities() {
        let settings = raw(&[("idp_sack", 4.0)]);
        assert_close(calculate_multiplier(&settings, "DL").multiplier, 1.25);
        assert_close(calculate_multiplier(&settings, "LB").multiplier, 1.15);

        let settings = raw(&[("idp_tkl_solo", 1.5), ("idp_tkl_ast", 1.0)]);
        // 2.0 / 1.25 = 1.6
        assert_close(calculate_multiplier(&settings, "LB").multiplier, 1.18);
        assert_close(calculate_multiplier(&settings, "DB").multiplier, 1.12);
    }

    #[test]
    fn test_multiplier_is_clamped() {
        let kicker = calculate_multiplier(&raw(&[("fgm", 100.0)]), "K");
        assert_eq!(kicker.multiplier, MAX_MULTIPLIER);

        let linebacker = calculate_multiplier(
            &raw(&[
                ("idp_tkl_solo", 0.0),
                ("idp_tkl_ast", 0.0),
                ("idp_sack", 0.0),
                ("idp_int", 0.0),
                ("idp_pass_def", 0.0),
            ]),
            "LB",
        );
        assert_eq!(linebacker.multiplier, MIN_MULTIPLIER);
        assert_eq!(linebacker.breakdown.len(), 4);
    }

    #[test]
    fn test_overflowing_factors_stay_in_range() {
        // sacks and ints overflow to inf, pass_def zeroes out: inf * 0 is NaN
        let settings = raw(&[("idp_sack", 1e308), ("idp_int", 1e308), ("idp_pass_def", -11.5)]);
        let result = calculate_multiplier(&settings, "LB");
        assert_eq!(result.multiplier, MAX_MULTIPLIER);
        assert_eq!(result.breakdown.get("pass_def"), Some(&-100.0));

        let (value, _) = apply_scoring_adjustment(5000, &settings, "LB");
        assert_eq!(value, 10_000);

        let result = calculate_multiplier(&raw(&[("idp_sack", 1e308), ("idp_int", 1e308)]), "DB");
        assert_eq!(result.multiplier, MAX_MULTIPLIER);
        assert_eq!(clamp_multiplier(f64::NEG_INFINITY), MIN_MULTIPLIER);
    }

    #[test]
    fn test_unknown_position_is_neutral() {
        let result = calculate_multiplier(&raw(&[("rec", 0.0)]), "FB");
        assert_eq!(result, ScoringMultiplier::neutral());
    }

    #[test]
    fn test_apply_truncates_and_clamps() {
        let (value, multiplier) = apply_scoring_adjustment(3333, &raw(&[("rec", 0.5)]), "WR");
        assert_eq!(multiplier.breakdown.len(), 1);
        // 3333 * 0.925 = 3083.025
        assert_eq!(value, 3083);

        let (value, _) = apply_scoring_adjustment(9000, &raw(&[("fgm", 5.0)]), "K");
        assert_eq!(value, 10_000);
    }

    #[test]
    fn test_league_type_description() {
        assert_eq!(league_type_description(&RawScoringSettings::new()), "Full PPR, IDP");
        assert_eq!(
            league_type_description(&raw(&[
                ("rec", 0.5),
                ("bonus_rec_te", 0.5),
                ("pass_td", 6.0),
                ("idp_sack", 3.0),
            ])),
            "Half PPR, TEP, 6pt Pass TD, Heavy IDP"
        );
        assert_eq!(
            league_type_description(&raw(&[("rec", 0.0), ("idp_sack", 0.0), ("idp_tkl_solo", 0.0)])),
            "Standard"
        );
    }

    #[test]
    fn test_detect_superflex() {
        let slots = |names: &[&str]| names.iter().map(|s| s.to_string()).collect::<Vec<_>>();

        assert!(detect_superflex(&slots(&["QB", "RB", "SUPER_FLEX"])));
        assert!(detect_superflex(&slots(&["qb/wr/rb/te"])));
        assert!(detect_superflex(&slots(&["QB", "QB", "WR"])));
        assert!(!detect_superflex(&slots(&["QB", "RB", "WR", "FLEX", "BN"])));
        assert!(!detect_superflex(&[]));
    }

    #[test]
    fn test_detect_te_premium() {
        assert!(detect_te_premium(&raw(&[("bonus_rec_te", 0.5)])));
        assert!(!detect_te_premium(&raw(&[("bonus_rec_te", 0.0)])));
        assert!(!detect_te_premium(&RawScoringSettings::new()));
    }
}
