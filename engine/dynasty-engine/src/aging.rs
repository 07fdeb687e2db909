//! Position-based aging curves and the dynasty window advisor
//!
//! Each position has a prime window `[peak_start, peak_end]`. Before the window a player's
//! factor ramps linearly from 0.80 at age 21; inside it the factor is exactly 1.0; after it
//! the factor decays linearly and never drops below 0.20.

use crate::models::{AgeTier, DynastyWindow, Recommendation};
use crate::position::profile_for;
use serde::{Deserialize, Serialize};

/// Youngest age the curves model; younger ages are evaluated at this age
pub const MIN_AGE: u32 = 21;

/// Oldest age the curves model; older ages are evaluated at this age
pub const MAX_AGE: u32 = 40;

/// Substituted when a player's age is unknown
pub const DEFAULT_AGE: u32 = 26;

/// Factor at `MIN_AGE`
const PRE_PEAK_BASE: f64 = 0.80;

/// Floor of the post-peak decay
const MIN_AGE_FACTOR: f64 = 0.20;

/// Years past peak_end still classified as declining rather than veteran
const DECLINING_YEARS: u32 = 3;

/// Horizon of the dynasty window projection
const PROJECTION_YEARS: u32 = 3;

/// Aging curve of one position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AgingCurve {
    pub peak_start: u32,
    pub peak_end: u32,
    /// Fraction of value lost per year after peak_end
    pub decay_rate: f64,
    /// Fraction of value gained per year before peak_start
    pub pre_peak_growth: f64,
}

impl AgingCurve {
    /// Age multiplier in [0.20, 1.0]
    pub fn factor(&self, age: Option<u32>) -> f64 {
        let age = age.unwrap_or(DEFAULT_AGE).clamp(MIN_AGE, MAX_AGE);

        if age < self.peak_start {
            (PRE_PEAK_BASE + (age - MIN_AGE) as f64 * self.pre_peak_growth).min(1.0)
        } else if age <= self.peak_end {
            1.0
        } else {
            (1.0 - (age - self.peak_end) as f64 * self.decay_rate).max(MIN_AGE_FACTOR)
        }
    }

    pub fn tier(&self, age: Option<u32>) -> AgeTier {
        match age {
            None => AgeTier::Unknown,
            Some(age) if age < self.peak_start => AgeTier::Rising,
            Some(age) if age <= self.peak_end => AgeTier::Prime,
            Some(age) if age <= self.peak_end + DECLINING_YEARS => AgeTier::Declining,
            Some(_) => AgeTier::Veteran,
        }
    }

    /// Prime years remaining, 0 once past the window
    pub fn years_of_peak(&self, age: Option<u32>) -> u32 {
        self.peak_end.saturating_sub(age.unwrap_or(DEFAULT_AGE))
    }
}

/// Age multiplier for a position code. Unmodeled positions are neutral (1.0).
pub fn age_factor(age: Option<u32>, position: &str) -> f64 {
    profile_for(position).map_or(1.0, |profile| profile.aging.factor(age))
}

pub fn age_tier(age: Option<u32>, position: &str) -> AgeTier {
    profile_for(position).map_or(AgeTier::Unknown, |profile| profile.aging.tier(age))
}

pub fn years_of_peak(age: Option<u32>, position: &str) -> u32 {
    profile_for(position).map_or(0, |profile| profile.aging.years_of_peak(age))
}

/// Age factor re-evaluated `years_ahead` seasons from now
pub fn project_age_factor(age: Option<u32>, position: &str, years_ahead: u32) -> f64 {
    let future_age = age.unwrap_or(DEFAULT_AGE).saturating_add(years_ahead);
    age_factor(Some(future_age), position)
}

/// Buy/hold/sell lookup over the age tier and remaining prime years
pub fn recommend(tier: AgeTier, peak_years_left: u32) -> Recommendation {
    match tier {
        AgeTier::Rising if peak_years_left >= 3 => Recommendation::Buy,
        AgeTier::Prime if peak_years_left >= 2 => Recommendation::Hold,
        _ => Recommendation::Sell,
    }
}

/// Dynasty window for a player. A missing age is treated as the default age.
pub fn dynasty_window(age: Option<u32>, position: &str) -> DynastyWindow {
    let age = Some(age.unwrap_or(DEFAULT_AGE));

    let tier = age_tier(age, position);
    let peak_years_left = years_of_peak(age, position);

    DynastyWindow {
        current_factor: age_factor(age, position),
        peak_years_left,
        projected_3yr: project_age_factor(age, position, PROJECTION_YEARS),
        tier,
        recommendation: recommend(tier, peak_years_left),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        assert!((actual - expected).abs() < 1e-9, "expected {expected}, got {actual}");
    }

    #[test]
    fn test_prime_window_is_full_value() {
        for age in 26..=32 {
            assert_eq!(age_factor(Some(age), "QB"), 1.0);
        }
        assert_eq!(age_factor(Some(23), "RB"), 1.0);
        assert_eq!(age_factor(Some(26), "RB"), 1.0);
    }

    #[test]
    fn test_pre_peak_ramp() {
        assert_close(age_factor(Some(21), "WR"), 0.80);
        assert_close(age_factor(Some(23), "DL"), 0.88);
        assert_close(age_factor(Some(24), "WR"), 0.92);
    }

    #[test]
    fn test_post_peak_decay_and_floor() {
        assert_close(age_factor(Some(28), "RB"), 0.80);
        assert_close(age_factor(Some(33), "RB"), 0.30);
        assert_close(age_factor(Some(34), "RB"), 0.20);
        assert_close(age_factor(Some(39), "RB"), 0.20);
    }

    #[test]
    fn test_ages_are_clamped() {
        assert_eq!(age_factor(Some(18), "QB"), age_factor(Some(21), "QB"));
        assert_eq!(age_factor(Some(48), "K"), age_factor(Some(40), "K"));
    }

    #[test]
    fn test_missing_age_uses_default() {
        for position in ["QB", "RB", "WR", "TE", "K", "DL", "LB", "DB"] {
            assert_eq!(age_factor(None, position), age_factor(Some(DEFAULT_AGE), position));
        }
    }

    #[test]
    fn test_unknown_position_is_neutral() {
        assert_eq!(age_factor(Some(35), "P"), 1.0);
        assert_eq!(age_tier(Some(35), "P"), AgeTier::Unknown);
        assert_eq!(years_of_peak(Some(22), "P"), 0);
    }

    #[test]
    fn test_age_tiers() {
        assert_eq!(age_tier(Some(22), "WR"), AgeTier::Rising);
        assert_eq!(age_tier(Some(27), "WR"), AgeTier::Prime);
        assert_eq!(age_tier(Some(32), "WR"), AgeTier::Declining);
        assert_eq!(age_tier(Some(33), "WR"), AgeTier::Veteran);
        assert_eq!(age_tier(None, "WR"), AgeTier::Unknown);
    }

    #[test]
    fn test_years_of_peak() {
        assert_eq!(years_of_peak(Some(22), "RB"), 4);
        assert_eq!(years_of_peak(Some(30), "RB"), 0);
        assert_eq!(years_of_peak(None, "QB"), 6);
    }

    #[test]
    fn test_projection_reevaluates_future_age() {
        assert_close(project_age_factor(Some(25), "RB", 3), 0.80);
        assert_eq!(project_age_factor(None, "QB", 3), age_factor(Some(29), "QB"));
        assert_eq!(project_age_factor(Some(u32::MAX), "RB", 3), 0.20);
        assert_eq!(project_age_factor(Some(30), "QB", u32::MAX), age_factor(Some(MAX_AGE), "QB"));
    }

    #[test]
    fn test_recommendation_table() {
        assert_eq!(recommend(AgeTier::Rising, 3), Recommendation::Buy);
        assert_eq!(recommend(AgeTier::Rising, 2), Recommendation::Sell);
        assert_eq!(recommend(AgeTier::Prime, 2), Recommendation::Hold);
        assert_eq!(recommend(AgeTier::Prime, 1), Recommendation::Sell);
        assert_eq!(recommend(AgeTier::Declining, 0), Recommendation::Sell);
        assert_eq!(recommend(AgeTier::Veteran, 0), Recommendation::Sell);
        assert_eq!(recommend(AgeTier::Unknown, 10), Recommendation::Sell);
    }

    #[test]
    fn test_dynasty_window() {
        let window = dynasty_window(Some(22), "WR");
        assert_close(window.current_factor, 0.84);
        assert_eq!(window.peak_years_left, 7);
        assert_close(window.projected_3yr, 1.0);
        assert_eq!(window.tier, AgeTier::Rising);
        assert_eq!(window.recommendation, Recommendation::Buy);

        let window = dynasty_window(Some(30), "QB");
        assert_eq!(window.tier, AgeTier::Prime);
        assert_eq!(window.peak_years_left, 2);
        assert_eq!(window.recommendation, Recommendation::Hold);

        let window = dynasty_window(Some(u32::MAX), "RB");
        assert_eq!(window.tier, AgeTier::Veteran);
        assert_eq!(window.peak_years_left, 0);
        assert_close(window.projected_3yr, 0.20);

        let window = dynasty_window(None, "RB");
        assert_eq!(window.tier, AgeTier::Prime);
        assert_eq!(window.peak_years_left, 0);
        assert_eq!(window.recommendation, Recommendation::Sell);
    }
}
