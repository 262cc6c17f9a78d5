//! Property tests for pipeline invariants.
//!
//! Uses proptest to verify:
//! 1. Dedup idempotence and first-seen order
//! 2. Filter idempotence and commutativity
//! 3. Stats additivity over disjoint partitions
//! 4. `pnl-desc` total order with start-date-desc tie-break
//! 5. Pagination exhaustion: ceil(N/page) non-empty chunks reassemble the input

use std::sync::Arc;

use chrono::NaiveDate;
use proptest::prelude::*;
use tradedash_core::dedup::dedupe;
use tradedash_core::domain::{FilterState, ParsedDateRange, SharedRecord, TradeRecord};
use tradedash_core::filter::apply_filters;
use tradedash_core::pagination::{PageCursor, DEFAULT_PAGE_SIZE};
use tradedash_core::sort::{sort_records, SortMode};
use tradedash_core::stats::Stats;

// ── Strategies (proptest) ────────────────────────────────────────────

fn arb_dates() -> impl Strategy<Value = Option<ParsedDateRange>> {
    prop::option::weighted(
        0.85,
        (2022..=2024_i32, 1..=12_u32, 1..=28_u32).prop_map(|(y, m, d)| {
            let date = NaiveDate::from_ymd_opt(y, m, d).unwrap();
            ParsedDateRange {
                start_date: date,
                end_date: date,
                year: y,
                month: m,
            }
        }),
    )
}

// Whole-number amounts keep float sums exact regardless of grouping.
fn arb_amount() -> impl Strategy<Value = Option<f64>> {
    prop::option::weighted(0.9, (-10_000..10_000_i32).prop_map(f64::from))
}

fn arb_record() -> impl Strategy<Value = SharedRecord> {
    (
        prop::sample::select(vec!["BTC", "ETH", "SOL"]),
        prop::sample::select(vec!["Long", "Short", ""]),
        prop::option::of(prop::sample::select(vec!["5x", "10x"])),
        prop::option::of((0..3_i32).prop_map(f64::from)),
        arb_amount(),
        arb_amount(),
        arb_amount(),
        arb_dates(),
    )
        .prop_map(
            |(coin, direction, leverage, margin, pnl, fee, funding, parsed_dates)| {
                let date_range = match parsed_dates {
                    Some(d) => format!(
                        "{} - {}",
                        d.start_date.format("%d.%m.%Y"),
                        d.end_date.format("%d.%m.%Y")
                    ),
                    None => "bad".to_string(),
                };
                Arc::new(TradeRecord {
                    date_range,
                    coin: coin.to_string(),
                    direction: direction.to_string(),
                    leverage: leverage.map(str::to_string),
                    volume_with_leverage: None,
                    margin,
                    unrealized_pnl: None,
                    fee,
                    funding,
                    pnl,
                    duration: String::new(),
                    parsed_dates,
                })
            },
        )
}

fn arb_records(max: usize) -> impl Strategy<Value = Vec<SharedRecord>> {
    prop::collection::vec(arb_record(), 0..max)
}

fn same(a: &[SharedRecord], b: &[SharedRecord]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| Arc::ptr_eq(x, y))
}

// ── 1. Dedup ─────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn dedup_is_idempotent(records in arb_records(60)) {
        let once = dedupe(records);
        let twice = dedupe(once.clone());
        prop_assert!(same(&once, &twice));
    }

    /// Every survivor is the first input record with its key, in input order.
    #[test]
    fn dedup_keeps_first_seen_in_order(records in arb_records(60)) {
        let out = dedupe(records.clone());
        let mut last_index = None;
        for survivor in &out {
            let first = records
                .iter()
                .position(|r| r.identity_key() == survivor.identity_key())
                .unwrap();
            prop_assert!(Arc::ptr_eq(&records[first], survivor));
            prop_assert!(last_index.map_or(true, |prev| first > prev));
            last_index = Some(first);
        }
        let distinct: std::collections::HashSet<_> =
            records.iter().map(|r| r.identity_key()).collect();
        prop_assert_eq!(out.len(), distinct.len());
    }
}

// ── 2. Filter ────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn filter_is_idempotent(
        records in arb_records(80),
        year in prop::option::of(2022..=2024_i32),
        coin in prop::option::of(prop::sample::select(vec!["BTC", "ETH"])),
    ) {
        let f = FilterState {
            year,
            crypto: coin.map(str::to_string),
            ..Default::default()
        };
        let once = apply_filters(&records, &f);
        let twice = apply_filters(&once, &f);
        prop_assert!(same(&once, &twice));
    }

    /// Applying `{year}` then `{crypto}` equals applying `{year, crypto}`.
    #[test]
    fn filter_is_commutative(
        records in arb_records(80),
        year in 2022..=2024_i32,
        coin in prop::sample::select(vec!["BTC", "ETH", "SOL"]),
    ) {
        let by_year = FilterState { year: Some(year), ..Default::default() };
        let by_coin = FilterState { crypto: Some(coin.to_string()), ..Default::default() };
        let both = FilterState {
            year: Some(year),
            crypto: Some(coin.to_string()),
            ..Default::default()
        };

        let year_then_coin = apply_filters(&apply_filters(&records, &by_year), &by_coin);
        let coin_then_year = apply_filters(&apply_filters(&records, &by_coin), &by_year);
        let combined = apply_filters(&records, &both);
        prop_assert!(same(&year_then_coin, &combined));
        prop_assert!(same(&coin_then_year, &combined));
    }
}

// ── 3. Stats additivity ──────────────────────────────────────────────

proptest! {
    #[test]
    fn stats_are_additive(records in arb_records(80), split in 0usize..80) {
        let k = split.min(records.len());
        let (left, right) = records.split_at(k);
        let whole = Stats::compute(&records);
        let merged = Stats::compute(left).merge(Stats::compute(right));
        prop_assert_eq!(whole, merged);
        prop_assert_eq!(whole.gross_pnl(), whole.total_pnl + whole.total_fees);
    }
}

// ── 4. pnl-desc ordering ─────────────────────────────────────────────

proptest! {
    #[test]
    fn pnl_desc_is_ordered_with_date_tiebreak(records in arb_records(80)) {
        let sorted = sort_records(&records, SortMode::PnlDesc);
        prop_assert_eq!(sorted.len(), records.len());
        for pair in sorted.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            prop_assert!(a.pnl_or_zero() >= b.pnl_or_zero());
            if a.pnl_or_zero() == b.pnl_or_zero() {
                prop_assert!(a.start_date_or_epoch() >= b.start_date_or_epoch());
            }
        }
    }

    #[test]
    fn sorting_is_a_permutation(records in arb_records(60), mode_index in 0usize..8) {
        let mode = SortMode::ALL[mode_index];
        let sorted = sort_records(&records, mode);
        for r in &records {
            let before = records.iter().filter(|x| Arc::ptr_eq(x, r)).count();
            let after = sorted.iter().filter(|x| Arc::ptr_eq(x, r)).count();
            prop_assert_eq!(before, after);
        }
    }
}

// ── 5. Pagination exhaustion ─────────────────────────────────────────

proptest! {
    #[test]
    fn pagination_reassembles_input(n in 0usize..300) {
        let items: Vec<usize> = (0..n).collect();
        let mut cursor = PageCursor::new(items.clone(), DEFAULT_PAGE_SIZE);
        let mut chunks = 0;
        let mut seen = Vec::new();
        while cursor.has_more() {
            let chunk = cursor.next_chunk();
            prop_assert!(!chunk.is_empty());
            prop_assert!(chunk.len() <= DEFAULT_PAGE_SIZE);
            seen.extend_from_slice(chunk);
            chunks += 1;
        }
        prop_assert_eq!(chunks, n.div_ceil(DEFAULT_PAGE_SIZE));
        prop_assert_eq!(seen, items);
        prop_assert!(cursor.next_chunk().is_empty());
    }
}
