//! Statistics aggregator: one left-to-right pass over a record set.
//!
//! Missing or non-finite numbers count as zero here and nowhere else; the
//! records themselves keep `None`.

use serde::{Deserialize, Serialize};

use crate::domain::{finite_or_zero, FilterState, SharedRecord, TradeRecord};

/// Sums over a record set. Additive: stats of a disjoint union equal the
/// merged stats of the parts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    pub count: usize,
    pub total_pnl: f64,
    pub total_margin: f64,
    /// Records with strictly positive PnL.
    pub wins: usize,
    pub total_fees: f64,
    pub total_funding: f64,
}

impl Stats {
    pub fn compute(records: &[SharedRecord]) -> Self {
        records.iter().fold(Stats::default(), |mut acc, r| {
            acc.add(r);
            acc
        })
    }

    pub fn add(&mut self, record: &TradeRecord) {
        self.count += 1;
        self.total_pnl += record.pnl_or_zero();
        self.total_margin += finite_or_zero(record.margin);
        self.total_fees += finite_or_zero(record.fee);
        self.total_funding += finite_or_zero(record.funding);
        if record.is_winner() {
            self.wins += 1;
        }
    }

    pub fn merge(self, other: Stats) -> Stats {
        Stats {
            count: self.count + other.count,
            total_pnl: self.total_pnl + other.total_pnl,
            total_margin: self.total_margin + other.total_margin,
            wins: self.wins + other.wins,
            total_fees: self.total_fees + other.total_fees,
            total_funding: self.total_funding + other.total_funding,
        }
    }

    /// PnL before fees. Fees are recorded as negative amounts, so adding them
    /// back yields the gross figure. Funding stays out.
    pub fn gross_pnl(&self) -> f64 {
        self.total_pnl + self.total_fees
    }

    /// Wins as a percentage of the count; 0 for an empty set.
    pub fn win_rate(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.wins as f64 / self.count as f64 * 100.0
        }
    }
}

/// Which set the displayed statistics were computed over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatsScope {
    All,
    Filtered,
}

impl StatsScope {
    pub fn label(self) -> &'static str {
        match self {
            StatsScope::All => "all positions",
            StatsScope::Filtered => "filtered positions",
        }
    }
}

/// Pick the set the statistics display should use.
///
/// The filtered set is used when any filter field is set, or when its length
/// differs from the store's. Otherwise the whole store is used.
pub fn select_stats_source<'a>(
    store: &'a [SharedRecord],
    filtered: &'a [SharedRecord],
    filters: &FilterState,
) -> (&'a [SharedRecord], StatsScope) {
    if !filters.is_empty() || filtered.len() != store.len() {
        (filtered, StatsScope::Filtered)
    } else {
        (store, StatsScope::All)
    }
}

/// Payload handed to a statistics display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsView {
    pub total_pnl: f64,
    pub total_margin: f64,
    pub wins: usize,
    pub total_fees: f64,
    pub total_funding: f64,
    pub gross_pnl: f64,
    /// Records the numbers were computed over.
    pub count: usize,
    pub filtered_count: usize,
    pub total_count: usize,
    pub scope: StatsScope,
}

impl StatsView {
    pub fn build(
        store: &[SharedRecord],
        filtered: &[SharedRecord],
        filters: &FilterState,
    ) -> Self {
        let (source, scope) = select_stats_source(store, filtered, filters);
        let stats = Stats::compute(source);
        Self {
            total_pnl: stats.total_pnl,
            total_margin: stats.total_margin,
            wins: stats.wins,
            total_fees: stats.total_fees,
            total_funding: stats.total_funding,
            gross_pnl: stats.gross_pnl(),
            count: stats.count,
            filtered_count: filtered.len(),
            total_count: store.len(),
            scope,
        }
    }

    pub fn win_rate(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.wins as f64 / self.count as f64 * 100.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn rec(pnl: Option<f64>, fee: Option<f64>, funding: Option<f64>) -> SharedRecord {
        Arc::new(TradeRecord {
            date_range: "01.01.2024 - 02.01.2024".into(),
            coin: "BTC".into(),
            direction: "Long".into(),
            leverage: None,
            volume_with_leverage: None,
            margin: Some(100.0),
            unrealized_pnl: None,
            fee,
            funding,
            pnl,
            duration: String::new(),
            parsed_dates: None,
        })
    }

    #[test]
    fn sums_and_wins() {
        let records = vec![
            rec(Some(100.0), Some(-2.0), Some(-1.0)),
            rec(Some(-50.0), Some(-1.0), Some(0.5)),
            rec(None, None, None),
            rec(Some(0.0), Some(-0.5), None),
        ];
        let s = Stats::compute(&records);
        assert_eq!(s.count, 4);
        assert_eq!(s.total_pnl, 50.0);
        assert_eq!(s.wins, 1);
        assert_eq!(s.total_fees, -3.5);
        assert_eq!(s.total_funding, -0.5);
        assert_eq!(s.total_margin, 400.0);
        assert_eq!(s.gross_pnl(), 46.5);
        assert_eq!(s.win_rate(), 25.0);
    }

    #[test]
    fn non_finite_values_count_as_zero() {
        let records = vec![rec(Some(f64::NAN), Some(f64::INFINITY), None)];
        let s = Stats::compute(&records);
        assert_eq!(s.total_pnl, 0.0);
        assert_eq!(s.total_fees, 0.0);
        assert_eq!(s.wins, 0);
    }

    #[test]
    fn empty_set_is_zero() {
        let s = Stats::compute(&[]);
        assert_eq!(s, Stats::default());
        assert_eq!(s.win_rate(), 0.0);
    }

    #[test]
    fn source_is_store_when_unfiltered() {
        let store = vec![rec(Some(1.0), None, None), rec(Some(2.0), None, None)];
        let filtered = store.clone();
        let (src, scope) = select_stats_source(&store, &filtered, &FilterState::default());
        assert_eq!(scope, StatsScope::All);
        assert_eq!(src.len(), 2);
    }

    #[test]
    fn source_is_filtered_when_any_filter_set() {
        let store = vec![rec(Some(1.0), None, None)];
        let filtered = store.clone();
        let filters = FilterState {
            direction: Some("Long".into()),
            ..Default::default()
        };
        let (_, scope) = select_stats_source(&store, &filtered, &filters);
        assert_eq!(scope, StatsScope::Filtered);
    }

    #[test]
    fn source_is_filtered_when_lengths_differ() {
        let store = vec![rec(Some(1.0), None, None), rec(Some(2.0), None, None)];
        let filtered = vec![store[0].clone()];
        let view = StatsView::build(&store, &filtered, &FilterState::default());
        assert_eq!(view.scope, StatsScope::Filtered);
        assert_eq!(view.total_pnl, 1.0);
        assert_eq!(view.count, 1);
        assert_eq!(view.filtered_count, 1);
        assert_eq!(view.total_count, 2);
    }
}
