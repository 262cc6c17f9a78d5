//! Per-coin breakdown feeding the PnL chart and the win-rate table.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::domain::SharedRecord;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoinRow {
    pub coin: String,
    pub pnl: f64,
    pub wins: usize,
    pub total: usize,
}

impl CoinRow {
    /// Percentage of winning positions for this coin.
    pub fn win_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.wins as f64 / self.total as f64 * 100.0
        }
    }
}

/// Coins in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CoinBreakdown {
    pub rows: Vec<CoinRow>,
}

impl CoinBreakdown {
    pub fn compute(records: &[SharedRecord]) -> Self {
        let mut index: HashMap<&str, usize> = HashMap::new();
        let mut rows: Vec<CoinRow> = Vec::new();
        for r in records {
            let slot = *index.entry(r.coin.as_str()).or_insert_with(|| {
                rows.push(CoinRow {
                    coin: r.coin.clone(),
                    pnl: 0.0,
                    wins: 0,
                    total: 0,
                });
                rows.len() - 1
            });
            let row = &mut rows[slot];
            row.pnl += r.pnl_or_zero();
            row.total += 1;
            if r.is_winner() {
                row.wins += 1;
            }
        }
        Self { rows }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, coin: &str) -> Option<&CoinRow> {
        self.rows.iter().find(|r| r.coin == coin)
    }

    /// Largest absolute per-coin PnL, for scaling bar charts.
    pub fn max_abs_pnl(&self) -> f64 {
        self.rows.iter().map(|r| r.pnl.abs()).fold(0.0, f64::max)
    }
}
