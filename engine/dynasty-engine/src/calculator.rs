use crate::aging::{age_factor, age_tier, dynasty_window};
use crate::config::ValuationParams;
use crate::models::*;
use crate::position::profile_for;
use crate::round_to;
use crate::vorp::{calculate_vorp, ppg_from_stats, vorp_tier};
use tracing::{debug, info};

/// Converts an internal value (0-10000) to the display scale (0-100, 1 decimal)
pub fn value_to_display(value: u32) -> f64 {
    round_to(value as f64 / 100.0, 1)
}

/// Inverse of [`value_to_display`] for values the display scale can represent
pub fn display_to_value(display: f64) -> u32 {
    (display * 100.0).trunc().max(0.0) as u32
}

/// Intermediate figures of one value composition, unrounded
struct Composition {
    ppg: f64,
    vorp: f64,
    age_factor: f64,
    raw_value: f64,
    final_value: u32,
}

/// Dynasty value calculator
///
/// Composes VORP, the aging curve, the youth bonus and the position boost into a single
/// value on the 0-10000 scale.
#[derive(Debug, Clone, Default)]
pub struct ValueCalculator {
    params: ValuationParams,
}

impl ValueCalculator {
    /// Create a new value calculator
    pub fn new(params: ValuationParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &ValuationParams {
        &self.params
    }

    fn compose(
        &self,
        stats: &PlayerStats,
        position: &str,
        age: Option<u32>,
        format: LeagueFormat,
    ) -> Composition {
        let ppg = ppg_from_stats(stats, position);
        let vorp = calculate_vorp(ppg, position, format);
        let age_factor = age_factor(age, position);

        let youth_bonus = match age {
            Some(age) if age < self.params.youth_age_limit && vorp > 0.0 => self.params.youth_bonus,
            _ => 1.0,
        };
        let position_boost = profile_for(position).map_or(1.0, |profile| profile.value_boost);

        let raw_value =
            vorp.max(0.0) * age_factor * youth_bonus * position_boost * self.params.vorp_multiplier;
        let final_value = raw_value
            .clamp(self.params.min_value as f64, self.params.max_value as f64)
            .trunc() as u32;

        Composition { ppg, vorp, age_factor, raw_value, final_value }
    }

    /// Dynasty value (0-10000) of a season stat line
    pub fn calculate_value(
        &self,
        stats: &PlayerStats,
        position: &str,
        age: Option<u32>,
        format: LeagueFormat,
    ) -> u32 {
        self.compose(stats, position, age, format).final_value
    }

    /// Dynasty value of a player with every intermediate figure
    pub fn breakdown(&self, record: &PlayerStatRecord, format: LeagueFormat) -> ValueBreakdown {
        let position = record.position.as_str();
        let composition = self.compose(&record.stats, position, record.age, format);

        debug!(
            "Valued {} ({} {}): ppg {:.2}, vorp {:.2}, age factor {:.3}, value {}",
            record.id,
            record.name,
            position,
            composition.ppg,
            composition.vorp,
            composition.age_factor,
            composition.final_value
        );

        ValueBreakdown {
            player_id: record.id.clone(),
            name: record.name.clone(),
            position: record.position,
            team: record.team.clone(),
            age: record.age,
            ppg: round_to(composition.ppg, 2),
            vorp: round_to(composition.vorp, 2),
            vorp_tier: vorp_tier(composition.vorp, position),
            age_factor: round_to(composition.age_factor, 3),
            age_tier: age_tier(record.age, position),
            raw_value: round_to(composition.raw_value, 2),
            final_value: composition.final_value,
            display_value: value_to_display(composition.final_value),
            dynasty_window: dynasty_window(record.age, position),
        }
    }

    /// Values every record, highest first. Ties keep their input order.
    pub fn value_all(&self, records: &[PlayerStatRecord], format: LeagueFormat) -> Vec<ValueBreakdown> {
        let mut values: Vec<ValueBreakdown> =
            records.iter().map(|record| self.breakdown(record, format)).collect();
        values.sort_by(|a, b| b.final_value.cmp(&a.final_value));

        info!(
            "Valued {} players (superflex: {}, te_premium: {})",
            values.len(),
            format.superflex,
            format.te_premium
        );

        values
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::Position;

    fn season(points: f64, games: f64) -> PlayerStats {
        PlayerStats::default().with(StatKey::FantasyPointsPpr, points).with(StatKey::Games, games)
    }

    #[test]
    fn test_value_is_zero_below_replacement() {
        let calculator = ValueCalculator::default();
        // 5 ppg is far below the QB replacement level
        let value = calculator.calculate_value(&season(85.0, 17.0), "QB", Some(22), LeagueFormat::default());
        assert_eq!(value, 0);
    }

    #[test]
    fn test_youth_bonus_requires_known_age_below_limit() {
        let calculator = ValueCalculator::default();
        let stats = season(238.0, 17.0); // 14 ppg WR, vorp 6.5
        let format = LeagueFormat::default();

        // 24: pre-peak 0.92, youth bonus
        let young = calculator.calculate_value(&stats, "WR", Some(24), format);
        assert_eq!(young, (6.5 * 0.92 * 1.15 * 750.0_f64).trunc() as u32);

        // 25: prime, no bonus
        assert_eq!(calculator.calculate_value(&stats, "WR", Some(25), format), 4875);

        // unknown age: default age 26, no bonus
        assert_eq!(calculator.calculate_value(&stats, "WR", None, format), 4875);
    }

    #[test]
    fn test_unknown_position_is_worthless() {
        let calculator = ValueCalculator::default();
        assert_eq!(calculator.calculate_value(&season(400.0, 17.0), "P", Some(27), LeagueFormat::default()), 0);
    }

    #[test]
    fn test_custom_params() {
        let params = ValuationParams { vorp_multiplier: 1000.0, ..ValuationParams::default() };
        let calculator = ValueCalculator::new(params);
        let value = calculator.calculate_value(&season(340.0, 17.0), "QB", Some(29), LeagueFormat::default());
        assert_eq!(value, 5000);
    }

    #[test]
    fn test_breakdown_fields() {
        let record = PlayerStatRecord::new("4046", "Patrick Mahomes", Position::QB)
            .with_team("KC")
            .with_stats(season(340.0, 17.0));

        let breakdown = ValueCalculator::default().breakdown(&record, LeagueFormat::default());

        assert_eq!(breakdown.ppg, 20.0);
        assert_eq!(breakdown.vorp, 5.0);
        assert_eq!(breakdown.vorp_tier, VorpTier::Starter);
        assert_eq!(breakdown.age_tier, AgeTier::Unknown);
        assert_eq!(breakdown.final_value, 3750);
        assert_eq!(breakdown.display_value, 37.5);
        assert_eq!(breakdown.team.as_deref(), Some("KC"));
        // The window falls back to age 26 while the breakdown keeps the age unknown
        assert_eq!(breakdown.dynasty_window.tier, AgeTier::Prime);
        assert_eq!(breakdown.dynasty_window.peak_years_left, 6);
    }

    #[test]
    fn test_breakdown_with_extreme_age() {
        let calculator = ValueCalculator::default();
        let record = PlayerStatRecord::new("qb", "Ageless", Position::QB).with_stats(season(340.0, 17.0));

        let oldest = calculator.breakdown(&record.clone().with_age(u32::MAX), LeagueFormat::default());
        let forty = calculator.breakdown(&record.with_age(40), LeagueFormat::default());

        assert_eq!(oldest.final_value, forty.final_value);
        assert_eq!(oldest.age_tier, AgeTier::Veteran);
        assert_eq!(oldest.dynasty_window.peak_years_left, 0);
        assert_eq!(oldest.dynasty_window.recommendation, Recommendation::Sell);
    }

    #[test]
    fn test_value_all_sorts_descending_and_stable() {
        let records = vec![
            PlayerStatRecord::new("a", "Backup", Position::QB).with_age(28).with_stats(season(170.0, 17.0)),
            PlayerStatRecord::new("b", "Starter", Position::QB).with_age(28).with_stats(season(340.0, 17.0)),
            PlayerStatRecord::new("c", "Other Backup", Position::WR).with_age(27).with_stats(season(34.0, 17.0)),
        ];

        let values = ValueCalculator::default().value_all(&records, LeagueFormat::default());
        let order: Vec<&str> = values.iter().map(|v| v.player_id.as_str()).collect();
        assert_eq!(order, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_display_conversion() {
        assert_eq!(value_to_display(3750), 37.5);
        assert_eq!(value_to_display(3749), 37.5);
        assert_eq!(value_to_display(10_000), 100.0);
        assert_eq!(display_to_value(37.5), 3750);
        assert_eq!(display_to_value(0.0), 0);
    }
}
