//! FilterState: the user-selected constraints narrowing the visible records.

use serde::{Deserialize, Serialize};

/// Five independent, optional equality constraints. All `None` means no filtering.
///
/// `month` only makes sense together with `year` in a UI, but the filter logic
/// treats every field on its own.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub crypto: Option<String>,
    pub leverage: Option<String>,
    pub direction: Option<String>,
}

/// Names one field of a [`FilterState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FilterKey {
    Year,
    Month,
    Crypto,
    Leverage,
    Direction,
}

impl FilterKey {
    pub const ALL: [FilterKey; 5] = [
        FilterKey::Year,
        FilterKey::Month,
        FilterKey::Crypto,
        FilterKey::Leverage,
        FilterKey::Direction,
    ];

    pub fn label(self) -> &'static str {
        match self {
            FilterKey::Year => "Year",
            FilterKey::Month => "Month",
            FilterKey::Crypto => "Coin",
            FilterKey::Leverage => "Leverage",
            FilterKey::Direction => "Direction",
        }
    }
}

impl FilterState {
    pub fn is_empty(&self) -> bool {
        self.year.is_none()
            && self.month.is_none()
            && self.crypto.is_none()
            && self.leverage.is_none()
            && self.direction.is_none()
    }

    pub fn is_set(&self, key: FilterKey) -> bool {
        match key {
            FilterKey::Year => self.year.is_some(),
            FilterKey::Month => self.month.is_some(),
            FilterKey::Crypto => self.crypto.is_some(),
            FilterKey::Leverage => self.leverage.is_some(),
            FilterKey::Direction => self.direction.is_some(),
        }
    }

    /// Clear one field. Clearing the year also clears the month, since a month
    /// without a year has no selector to live in.
    pub fn remove(&mut self, key: FilterKey) {
        match key {
            FilterKey::Year => {
                self.year = None;
                self.month = None;
            }
            FilterKey::Month => self.month = None,
            FilterKey::Crypto => self.crypto = None,
            FilterKey::Leverage => self.leverage = None,
            FilterKey::Direction => self.direction = None,
        }
    }

    pub fn clear(&mut self) {
        *self = FilterState::default();
    }

    /// Active fields with their display values, in a fixed order.
    pub fn active(&self) -> Vec<(FilterKey, String)> {
        let mut out = Vec::new();
        if let Some(y) = self.year {
            out.push((FilterKey::Year, y.to_string()));
        }
        if let Some(m) = self.month {
            out.push((FilterKey::Month, month_name(m).to_string()));
        }
        if let Some(c) = &self.crypto {
            out.push((FilterKey::Crypto, c.clone()));
        }
        if let Some(l) = &self.leverage {
            out.push((FilterKey::Leverage, l.clone()));
        }
        if let Some(d) = &self.direction {
            out.push((FilterKey::Direction, d.clone()));
        }
        out
    }

    /// One-sentence description of the active filters, for status lines and reports.
    pub fn summary(&self, shown: usize, total: usize) -> String {
        if self.is_empty() {
            return format!("No filters. Showing all {total} positions.");
        }
        let parts: Vec<String> = self
            .active()
            .into_iter()
            .map(|(key, value)| format!("{} {}", key.label(), value))
            .collect();
        format!("Filters: {}. Showing {shown} of {total}.", parts.join(", "))
    }
}

/// English month name for a 1-based month number.
pub fn month_name(month: u32) -> &'static str {
    match month {
        1 => "January",
        2 => "February",
        3 => "March",
        4 => "April",
        5 => "May",
        6 => "June",
        7 => "July",
        8 => "August",
        9 => "September",
        10 => "October",
        11 => "November",
        12 => "December",
        _ => "?",
    }
}
