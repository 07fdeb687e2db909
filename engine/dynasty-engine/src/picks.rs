//! Rookie draft pick values on the dynasty value scale

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Draft years valued, starting at the base year
pub const PICK_YEARS: i32 = 4;

/// Value lost per year a pick is away
pub const YEARLY_DISCOUNT: f64 = 0.9;

/// Undiscounted pick values by slot
pub const BASE_PICK_VALUES: [(&str, u32); 8] = [
    ("1-early", 8500),
    ("1-mid", 7000),
    ("1-late", 5500),
    ("2-early", 3500),
    ("2-mid", 2800),
    ("2-late", 2200),
    ("3", 1200),
    ("4", 500),
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PickValue {
    pub year: i32,
    pub slot: String,
    pub value: u32,
}

/// Value of a pick `years_away` drafts out
pub fn discounted_value(base_value: u32, years_away: i32) -> u32 {
    (base_value as f64 * YEARLY_DISCOUNT.powi(years_away.max(0))).trunc() as u32
}

/// Every slot of the next four drafts, ordered by year then slot
pub fn pick_values(base_year: i32) -> Vec<PickValue> {
    (0..PICK_YEARS)
        .flat_map(|years_away| {
            BASE_PICK_VALUES.iter().map(move |(slot, base)| PickValue {
                year: base_year + years_away,
                slot: slot.to_string(),
                value: discounted_value(*base, years_away),
            })
        })
        .collect()
}

/// Pick values keyed `"{year}-{slot}"`
pub fn pick_value_map(base_year: i32) -> BTreeMap<String, u32> {
    pick_values(base_year)
        .into_iter()
        .map(|pick| (format!("{}-{}", pick.year, pick.slot), pick.value))
        .collect()
}
