//! Sort engine: a family of total orders over records, keyed by [`SortMode`].
//!
//! Sorting never mutates its input and is stable, so records that compare
//! equal keep their filtered order.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::{SharedRecord, TradeRecord};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortMode {
    #[default]
    DateAsc,
    DateDesc,
    PnlAsc,
    PnlDesc,
    CoinAsc,
    CoinDesc,
    DirectionShortFirst,
    DirectionLongFirst,
    /// Input order. What an unrecognized mode string resolves to.
    Unsorted,
}

impl SortMode {
    /// The selectable modes, in menu order.
    pub const ALL: [SortMode; 8] = [
        SortMode::DateAsc,
        SortMode::DateDesc,
        SortMode::PnlAsc,
        SortMode::PnlDesc,
        SortMode::CoinAsc,
        SortMode::CoinDesc,
        SortMode::DirectionShortFirst,
        SortMode::DirectionLongFirst,
    ];

    pub fn parse(key: &str) -> SortMode {
        match key.trim() {
            "date-asc" => SortMode::DateAsc,
            "date-desc" => SortMode::DateDesc,
            "pnl-asc" => SortMode::PnlAsc,
            "pnl-desc" => SortMode::PnlDesc,
            "coin-asc" => SortMode::CoinAsc,
            "coin-desc" => SortMode::CoinDesc,
            "direction-short-first" => SortMode::DirectionShortFirst,
            "direction-long-first" => SortMode::DirectionLongFirst,
            _ => SortMode::Unsorted,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SortMode::DateAsc => "date-asc",
            SortMode::DateDesc => "date-desc",
            SortMode::PnlAsc => "pnl-asc",
            SortMode::PnlDesc => "pnl-desc",
            SortMode::CoinAsc => "coin-asc",
            SortMode::CoinDesc => "coin-desc",
            SortMode::DirectionShortFirst => "direction-short-first",
            SortMode::DirectionLongFirst => "direction-long-first",
            SortMode::Unsorted => "unsorted",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SortMode::DateAsc => "Date (oldest first)",
            SortMode::DateDesc => "Date (newest first)",
            SortMode::PnlAsc => "PnL (lowest first)",
            SortMode::PnlDesc => "PnL (highest first)",
            SortMode::CoinAsc => "Coin (A-Z)",
            SortMode::CoinDesc => "Coin (Z-A)",
            SortMode::DirectionShortFirst => "Direction (Short first)",
            SortMode::DirectionLongFirst => "Direction (Long first)",
            SortMode::Unsorted => "Unsorted",
        }
    }

    /// Next selectable mode, wrapping around.
    pub fn next(self) -> SortMode {
        let pos = Self::ALL.iter().position(|m| *m == self);
        match pos {
            Some(i) => Self::ALL[(i + 1) % Self::ALL.len()],
            None => SortMode::DateAsc,
        }
    }

    pub fn prev(self) -> SortMode {
        let pos = Self::ALL.iter().position(|m| *m == self);
        match pos {
            Some(0) | None => Self::ALL[Self::ALL.len() - 1],
            Some(i) => Self::ALL[i - 1],
        }
    }

    /// Comparator for this mode. `Unsorted` treats everything as equal.
    pub fn compare(self, a: &TradeRecord, b: &TradeRecord) -> Ordering {
        match self {
            SortMode::DateAsc => a.start_date_or_epoch().cmp(&b.start_date_or_epoch()),
            SortMode::DateDesc => b.start_date_or_epoch().cmp(&a.start_date_or_epoch()),
            SortMode::PnlAsc => cmp_f64(a.pnl_or_zero(), b.pnl_or_zero())
                .then_with(|| b.start_date_or_epoch().cmp(&a.start_date_or_epoch())),
            SortMode::PnlDesc => cmp_f64(b.pnl_or_zero(), a.pnl_or_zero())
                .then_with(|| b.start_date_or_epoch().cmp(&a.start_date_or_epoch())),
            SortMode::CoinAsc => natural_cmp(&a.coin, &b.coin).then_with(|| pnl_desc(a, b)),
            SortMode::CoinDesc => natural_cmp(&b.coin, &a.coin).then_with(|| pnl_desc(a, b)),
            SortMode::DirectionShortFirst => direction_rank(a, "short")
                .cmp(&direction_rank(b, "short"))
                .then_with(|| pnl_desc(a, b)),
            SortMode::DirectionLongFirst => direction_rank(a, "long")
                .cmp(&direction_rank(b, "long"))
                .then_with(|| pnl_desc(a, b)),
            SortMode::Unsorted => Ordering::Equal,
        }
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Return a newly ordered sequence; `records` is left untouched.
pub fn sort_records(records: &[SharedRecord], mode: SortMode) -> Vec<SharedRecord> {
    let mut out = records.to_vec();
    if mode != SortMode::Unsorted {
        out.sort_by(|a, b| mode.compare(a, b));
    }
    out
}

fn cmp_f64(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

fn pnl_desc(a: &TradeRecord, b: &TradeRecord) -> Ordering {
    cmp_f64(b.pnl_or_zero(), a.pnl_or_zero())
}

// 0 for the preferred side, 1 for everything else.
fn direction_rank(record: &TradeRecord, preferred: &str) -> u8 {
    if record.direction.eq_ignore_ascii_case(preferred) {
        0
    } else {
        1
    }
}

/// Coin collation: case- and accent-insensitive, numeric-aware.
///
/// Follows the root collation order at primary strength. Symbols sort before
/// digits, digits before Latin letters, and Latin letters before other
/// scripts. Digit runs compare by value: `"coin2" < "Coin10"`, `"@1" < "1INCH"`,
/// `"Äb" < "Ac"`.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut a = a.chars().peekable();
    let mut b = b.chars().peekable();
    loop {
        match (a.peek().copied(), b.peek().copied()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) if x.is_ascii_digit() && y.is_ascii_digit() => {
                let left = take_digits(&mut a);
                let right = take_digits(&mut b);
                let ord = cmp_digit_runs(&left, &right);
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            (Some(x), Some(y)) => {
                let ord = primary_weight(x).cmp(&primary_weight(y));
                if ord != Ordering::Equal {
                    return ord;
                }
                a.next();
                b.next();
            }
        }
    }
}

/// Primary collation weight of one character. Variant order is the class order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Weight {
    Symbol(u32),
    Digit,
    Latin(char),
    Other(char),
}

// ASCII punctuation and symbols in root collation order.
const SYMBOL_ORDER: &str = " _-,;:!?.'\"()[]{}@*/\\&#%`^+<=>|~$";

fn primary_weight(c: char) -> Weight {
    if c.is_ascii_digit() {
        return Weight::Digit;
    }
    let lower = c.to_lowercase().next().unwrap_or(c);
    let base = fold_accent(lower);
    if base.is_ascii_lowercase() {
        Weight::Latin(base)
    } else if base.is_alphabetic() {
        Weight::Other(base)
    } else if c.is_whitespace() {
        Weight::Symbol(0)
    } else {
        match SYMBOL_ORDER.find(c) {
            Some(i) => Weight::Symbol(i as u32),
            None => Weight::Symbol(SYMBOL_ORDER.len() as u32 + c as u32),
        }
    }
}

// Lowercase Latin-1 and Latin Extended-A letters to their base letter.
fn fold_accent(c: char) -> char {
    match c {
        'à'..='å' | 'ā' | 'ă' | 'ą' => 'a',
        'ç' | 'ć' | 'ĉ' | 'ċ' | 'č' => 'c',
        'ď' | 'đ' => 'd',
        'è'..='ë' | 'ē' | 'ĕ' | 'ė' | 'ę' | 'ě' => 'e',
        'ĝ' | 'ğ' | 'ġ' | 'ģ' => 'g',
        'ĥ' | 'ħ' => 'h',
        'ì'..='ï' | 'ĩ' | 'ī' | 'ĭ' | 'į' | 'ı' => 'i',
        'ĵ' => 'j',
        'ķ' => 'k',
        'ĺ' | 'ļ' | 'ľ' | 'ŀ' | 'ł' => 'l',
        'ñ' | 'ń' | 'ņ' | 'ň' => 'n',
        'ò'..='ö' | 'ø' | 'ō' | 'ŏ' | 'ő' => 'o',
        'ŕ' | 'ŗ' | 'ř' => 'r',
        'ś' | 'ŝ' | 'ş' | 'š' => 's',
        'ţ' | 'ť' | 'ŧ' => 't',
        'ù'..='ü' | 'ũ' | 'ū' | 'ŭ' | 'ů' | 'ű' | 'ų' => 'u',
        'ŵ' => 'w',
        'ý' | 'ÿ' | 'ŷ' => 'y',
        'ź' | 'ż' | 'ž' => 'z',
        _ => c,
    }
}

fn take_digits(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> String {
    let mut run = String::new();
    while let Some(c) = chars.peek().copied() {
        if !c.is_ascii_digit() {
            break;
        }
        run.push(c);
        chars.next();
    }
    run
}

// Compare by numeric value without overflow: strip leading zeros, then the
// longer run is larger, then lexicographic.
fn cmp_digit_runs(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ParsedDateRange;
    use chrono::NaiveDate;
    use std::sync::Arc;

    fn rec(coin: &str, direction: &str, pnl: Option<f64>, day: Option<u32>) -> SharedRecord {
        let parsed_dates = day.map(|d| {
            let date = NaiveDate::from_ymd_opt(2024, 1, d).unwrap();
            ParsedDateRange {
                start_date: date,
                end_date: date,
                year: 2024,
                month: 1,
            }
        });
        Arc::new(TradeRecord {
            date_range: format!("{coin}-{direction}"),
            coin: coin.into(),
            direction: direction.into(),
            leverage: None,
            volume_with_leverage: None,
            margin: None,
            unrealized_pnl: None,
            fee: None,
            funding: None,
            pnl,
            duration: String::new(),
            parsed_dates,
        })
    }

    fn coins(records: &[SharedRecord]) -> Vec<&str> {
        records.iter().map(|r| r.coin.as_str()).collect()
    }

    #[test]
    fn parse_round_trips_known_keys() {
        for mode in SortMode::ALL {
            assert_eq!(SortMode::parse(mode.as_str()), mode);
        }
        assert_eq!(SortMode::parse("bogus"), SortMode::Unsorted);
        assert_eq!(SortMode::default(), SortMode::DateAsc);
    }

    #[test]
    fn next_cycles_through_all_modes() {
        let mut mode = SortMode::DateAsc;
        for _ in 0..SortMode::ALL.len() {
            mode = mode.next();
        }
        assert_eq!(mode, SortMode::DateAsc);
        assert_eq!(SortMode::Unsorted.next(), SortMode::DateAsc);
        assert_eq!(SortMode::DateAsc.prev(), SortMode::DirectionLongFirst);
    }

    #[test]
    fn date_sorts_put_undated_at_epoch() {
        let input = vec![
            rec("A", "Long", None, Some(5)),
            rec("B", "Long", None, None),
            rec("C", "Long", None, Some(2)),
        ];
        assert_eq!(coins(&sort_records(&input, SortMode::DateAsc)), vec!["B", "C", "A"]);
        assert_eq!(coins(&sort_records(&input, SortMode::DateDesc)), vec!["A", "C", "B"]);
    }

    #[test]
    fn pnl_sorts_break_ties_by_newest_date() {
        let input = vec![
            rec("A", "Long", Some(10.0), Some(1)),
            rec("B", "Long", None, Some(3)),
            rec("C", "Long", Some(10.0), Some(9)),
            rec("D", "Long", Some(-4.0), Some(2)),
        ];
        assert_eq!(
            coins(&sort_records(&input, SortMode::PnlDesc)),
            vec!["C", "A", "B", "D"]
        );
        assert_eq!(
            coins(&sort_records(&input, SortMode::PnlAsc)),
            vec!["D", "B", "C", "A"]
        );
    }

    #[test]
    fn coin_sort_is_natural_and_case_insensitive() {
        let input = vec![
            rec("coin10", "Long", Some(1.0), None),
            rec("Coin2", "Long", Some(1.0), None),
            rec("btc", "Long", Some(1.0), None),
            rec("ETH", "Long", Some(1.0), None),
        ];
        assert_eq!(
            coins(&sort_records(&input, SortMode::CoinAsc)),
            vec!["btc", "Coin2", "coin10", "ETH"]
        );
        assert_eq!(
            coins(&sort_records(&input, SortMode::CoinDesc)),
            vec!["ETH", "coin10", "Coin2", "btc"]
        );
    }

    #[test]
    fn coin_ties_order_by_pnl_desc() {
        let input = vec![
            rec("BTC", "Long", Some(1.0), Some(1)),
            rec("BTC", "Short", Some(7.0), Some(2)),
        ];
        let out = sort_records(&input, SortMode::CoinDesc);
        assert_eq!(out[0].direction, "Short");
    }

    #[test]
    fn direction_groups_then_pnl_desc() {
        let input = vec![
            rec("A", "Long", Some(5.0), None),
            rec("B", "SHORT", Some(1.0), None),
            rec("C", "", Some(9.0), None),
            rec("D", "short", Some(3.0), None),
            rec("E", "long", Some(8.0), None),
        ];
        assert_eq!(
            coins(&sort_records(&input, SortMode::DirectionShortFirst)),
            vec!["D", "B", "C", "E", "A"]
        );
        assert_eq!(
            coins(&sort_records(&input, SortMode::DirectionLongFirst)),
            vec!["E", "A", "C", "D", "B"]
        );
    }

    #[test]
    fn unsorted_keeps_input_and_input_is_untouched() {
        let input = vec![
            rec("Z", "Long", Some(1.0), Some(3)),
            rec("A", "Long", Some(2.0), Some(1)),
        ];
        assert_eq!(coins(&sort_records(&input, SortMode::Unsorted)), vec!["Z", "A"]);
        let _ = sort_records(&input, SortMode::CoinAsc);
        assert_eq!(coins(&input), vec!["Z", "A"]);
    }

    #[test]
    fn natural_cmp_handles_leading_zeros_and_long_runs() {
        assert_eq!(natural_cmp("x007", "x7"), Ordering::Equal);
        assert_eq!(natural_cmp("a99999999999999999999", "a100000000000000000000"), Ordering::Less);
        assert_eq!(natural_cmp("abc", "ABD"), Ordering::Less);
        assert_eq!(natural_cmp("ab", "abc"), Ordering::Less);
    }

    #[test]
    fn natural_cmp_ranks_symbols_digits_letters() {
        assert_eq!(natural_cmp("@1", "1INCH"), Ordering::Less);
        assert_eq!(natural_cmp("A_B", "A1"), Ordering::Less);
        assert_eq!(natural_cmp("A-B", "A_B"), Ordering::Greater);
        assert_eq!(natural_cmp("@12", "@107"), Ordering::Less);
        assert_eq!(natural_cmp("9", "A"), Ordering::Less);
        assert_eq!(natural_cmp("ZEC", "Ωmega"), Ordering::Less);
    }

    #[test]
    fn natural_cmp_ignores_accents_and_case() {
        assert_eq!(natural_cmp("Äb", "Ac"), Ordering::Less);
        assert_eq!(natural_cmp("äb", "AB"), Ordering::Equal);
        assert_eq!(natural_cmp("Ñ", "o"), Ordering::Less);
        assert_eq!(natural_cmp("éth", "ETH"), Ordering::Equal);
    }

    #[test]
    fn coin_sort_places_spot_symbols_first() {
        let input = vec![
            rec("1INCH", "Long", Some(1.0), None),
            rec("kPEPE", "Long", Some(1.0), None),
            rec("@107", "Long", Some(1.0), None),
            rec("@12", "Long", Some(1.0), None),
        ];
        assert_eq!(
            coins(&sort_records(&input, SortMode::CoinAsc)),
            vec!["@12", "@107", "1INCH", "kPEPE"]
        );
    }
}
