//! TradeRecord: one normalized position row from the trading-history feed.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Records are immutable after normalization and shared between the store,
/// the filtered set, and the sorted sequence.
pub type SharedRecord = Arc<TradeRecord>;

/// Structured form of a `dd.mm.yyyy - dd.mm.yyyy` label.
///
/// `year`/`month` come from the start date. `start_date <= end_date` is not
/// checked; reversed ranges pass through as received.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedDateRange {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub year: i32,
    /// 1-based calendar month.
    pub month: u32,
}

/// A closed position as exported by the trading history feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeRecord {
    // ── Identification ──
    pub date_range: String,
    pub coin: String,
    pub direction: String,
    pub leverage: Option<String>,

    // ── Money ──
    pub volume_with_leverage: Option<f64>,
    pub margin: Option<f64>,
    pub unrealized_pnl: Option<f64>,
    pub fee: Option<f64>,
    pub funding: Option<f64>,
    pub pnl: Option<f64>,

    // ── Duration ──
    pub duration: String,

    // ── Derived ──
    pub parsed_dates: Option<ParsedDateRange>,
}

impl TradeRecord {
    /// Start date used for ordering. Records without a parseable range rank
    /// as the Unix epoch, i.e. older than anything real.
    pub fn start_date_or_epoch(&self) -> NaiveDate {
        self.parsed_dates
            .map(|d| d.start_date)
            .unwrap_or(DateTime::<Utc>::UNIX_EPOCH.date_naive())
    }

    /// PnL coalesced to zero, as used by aggregation and sorting.
    pub fn pnl_or_zero(&self) -> f64 {
        finite_or_zero(self.pnl)
    }

    /// Strictly positive PnL. Unknown PnL is not a win.
    pub fn is_winner(&self) -> bool {
        self.pnl_or_zero() > 0.0
    }

    pub fn year(&self) -> Option<i32> {
        self.parsed_dates.map(|d| d.year)
    }

    pub fn month(&self) -> Option<u32> {
        self.parsed_dates.map(|d| d.month)
    }

    /// Key used to detect duplicate rows in a feed.
    pub fn identity_key(&self) -> IdentityKey {
        IdentityKey {
            date_range: self.date_range.clone(),
            coin: self.coin.clone(),
            direction: self.direction.clone(),
            leverage: self.leverage.clone(),
            margin_bits: self.margin.map(canonical_bits),
        }
    }
}

/// `(date_range, coin, direction, leverage, margin)` with margin compared by value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IdentityKey {
    date_range: String,
    coin: String,
    direction: String,
    leverage: Option<String>,
    margin_bits: Option<u64>,
}

/// Treat `None` and non-finite values as zero.
pub fn finite_or_zero(value: Option<f64>) -> f64 {
    match value {
        Some(v) if v.is_finite() => v,
        _ => 0.0,
    }
}

// -0.0 and 0.0 must produce the same key.
fn canonical_bits(value: f64) -> u64 {
    if value == 0.0 {
        0.0_f64.to_bits()
    } else {
        value.to_bits()
    }
}
