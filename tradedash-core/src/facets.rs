//! Facet builder: the option lists offered by each filter selector.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::domain::SharedRecord;

/// Options derived from the full record store, independent of the active filters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Facets {
    /// Newest first.
    pub years: Vec<i32>,
    pub coins: Vec<String>,
    /// Ordered by leading numeric value (`"2x" < "10x"`).
    pub leverages: Vec<String>,
    pub directions: Vec<String>,
}

impl Facets {
    pub fn build(records: &[SharedRecord]) -> Self {
        let mut years = BTreeSet::new();
        let mut coins = BTreeSet::new();
        let mut leverages = BTreeSet::new();
        let mut directions = BTreeSet::new();
        for r in records {
            if let Some(y) = r.year() {
                years.insert(y);
            }
            coins.insert(r.coin.clone());
            if let Some(l) = &r.leverage {
                leverages.insert(l.clone());
            }
            if !r.direction.is_empty() {
                directions.insert(r.direction.clone());
            }
        }

        let mut leverages: Vec<String> = leverages.into_iter().collect();
        leverages.sort_by_key(|l| leverage_value(l));

        Self {
            years: years.into_iter().rev().collect(),
            coins: coins.into_iter().collect(),
            leverages,
            directions: directions.into_iter().collect(),
        }
    }
}

/// Months (ascending) present in `year`.
pub fn months_for_year(records: &[SharedRecord], year: i32) -> Vec<u32> {
    records
        .iter()
        .filter_map(|r| r.parsed_dates)
        .filter(|d| d.year == year)
        .map(|d| d.month)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Leading integer of a leverage label once the first `x` is removed.
/// Labels without one rank as zero.
pub fn leverage_value(label: &str) -> i64 {
    let stripped = label.replacen(['x', 'X'], "", 1);
    let trimmed = stripped.trim_start();
    let (sign, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end].parse::<i64>().map(|v| sign * v).unwrap_or(0)
}
