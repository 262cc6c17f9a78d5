//! Row normalization: loosely typed feed rows into canonical [`TradeRecord`]s.
//!
//! This is the only place that deals with arbitrary header casing, byte-order
//! marks, and locale-formatted numbers. Everything downstream sees typed records.

use std::collections::HashMap;

use serde_json::Value;

use crate::date_range::parse_date_range;
use crate::domain::TradeRecord;

/// One decoded feed row: column name → cell value.
pub type RawRow = serde_json::Map<String, Value>;

/// Case- and BOM-tolerant view over a raw row.
///
/// Row keys are stored with any leading byte-order mark and surrounding
/// whitespace removed. When two keys clean up to the same name the first one
/// wins.
pub struct RowView<'a> {
    fields: HashMap<&'a str, &'a Value>,
}

impl<'a> RowView<'a> {
    pub fn new(row: &'a RawRow) -> Self {
        let mut fields = HashMap::with_capacity(row.len());
        for (key, value) in row {
            let clean = key.trim_start_matches('\u{feff}').trim();
            fields.entry(clean).or_insert(value);
        }
        Self { fields }
    }

    /// Look a column up by its exact name, then lowercase, then uppercase.
    pub fn get(&self, name: &str) -> Option<&'a Value> {
        let name = name.trim_start_matches('\u{feff}');
        self.present(name)
            .or_else(|| self.present(&name.to_lowercase()))
            .or_else(|| self.present(&name.to_uppercase()))
    }

    // A null cell counts as absent, so lookup falls through to the next casing.
    fn present(&self, key: &str) -> Option<&'a Value> {
        self.fields.get(key).copied().filter(|v| !v.is_null())
    }

    /// Trimmed text of a column; `None` when the column is absent or null.
    pub fn text(&self, name: &str) -> Option<String> {
        self.get(name).and_then(value_text)
    }

    /// Numeric value of a column; `None` when absent or unparseable.
    pub fn number(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(value_number)
    }
}

/// Turn one raw row into a record, or reject it.
///
/// A row is rejected only when `date_range` or `coin` is missing or blank.
/// Every other malformed field degrades to `None` on its own.
pub fn normalize_row(row: &RawRow) -> Option<TradeRecord> {
    let view = RowView::new(row);

    let date_range = view.text("date_range").unwrap_or_default();
    let coin = view.text("coin").unwrap_or_default();
    if date_range.is_empty() || coin.is_empty() {
        return None;
    }

    let duration = view
        .text("duration")
        .or_else(|| view.text("duration "))
        .unwrap_or_default();

    let parsed_dates = parse_date_range(&date_range);

    Some(TradeRecord {
        date_range,
        coin,
        direction: view.text("direction").unwrap_or_default(),
        leverage: view.text("leverage").filter(|l| !l.is_empty()),
        volume_with_leverage: view.number("volume_with_leverage"),
        margin: view.number("margin"),
        unrealized_pnl: view.number("unrealized_pnl"),
        fee: view.number("fee"),
        funding: view.number("funding"),
        pnl: view.number("pnl"),
        duration,
        parsed_dates,
    })
}

fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Numbers pass through; strings have all whitespace stripped and their first
/// decimal comma turned into a point (`"1 234,5"` → `1234.5`).
fn value_number(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_localized(s),
        _ => None,
    };
    parsed.filter(|v| v.is_finite())
}

pub(crate) fn parse_localized(text: &str) -> Option<f64> {
    let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    if compact.is_empty() {
        return None;
    }
    compact.replacen(',', ".", 1).parse::<f64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(value: Value) -> RawRow {
        match value {
            Value::Object(map) => map,
            _ => panic!("test rows must be objects"),
        }
    }

    fn full_row() -> RawRow {
        row(json!({
            "date_range": " 01.01.2024 - 02.01.2024 ",
            "coin": " BTC ",
            "direction": "Long",
            "leverage": "10x",
            "volume_with_leverage": "10 000,50",
            "margin": 1000,
            "unrealized_pnl": "",
            "fee": "-4,5",
            "funding": "-1.25",
            "pnl": "100",
            "duration": "1d 2h"
        }))
    }

    #[test]
    fn normalizes_complete_row() {
        let r = normalize_row(&full_row()).unwrap();
        assert_eq!(r.date_range, "01.01.2024 - 02.01.2024");
        assert_eq!(r.coin, "BTC");
        assert_eq!(r.direction, "Long");
        assert_eq!(r.leverage.as_deref(), Some("10x"));
        assert_eq!(r.volume_with_leverage, Some(10_000.5));
        assert_eq!(r.margin, Some(1000.0));
        assert_eq!(r.unrealized_pnl, None);
        assert_eq!(r.fee, Some(-4.5));
        assert_eq!(r.funding, Some(-1.25));
        assert_eq!(r.pnl, Some(100.0));
        assert_eq!(r.duration, "1d 2h");
        assert_eq!(r.parsed_dates.unwrap().year, 2024);
    }

    #[test]
    fn rejects_missing_or_blank_coin() {
        let mut r = full_row();
        r.insert("coin".into(), json!("   "));
        assert!(normalize_row(&r).is_none());

        r.remove("coin");
        assert!(normalize_row(&r).is_none());
    }

    #[test]
    fn rejects_missing_or_blank_date_range() {
        let mut r = full_row();
        r.insert("date_range".into(), json!(""));
        assert!(normalize_row(&r).is_none());

        r.insert("date_range".into(), Value::Null);
        assert!(normalize_row(&r).is_none());
    }

    #[test]
    fn malformed_numbers_null_only_that_field() {
        let mut r = full_row();
        r.insert("pnl".into(), json!("n/a"));
        r.insert("fee".into(), json!(true));
        let rec = normalize_row(&r).unwrap();
        assert_eq!(rec.pnl, None);
        assert_eq!(rec.fee, None);
        assert_eq!(rec.margin, Some(1000.0));
        assert_eq!(rec.funding, Some(-1.25));
    }

    #[test]
    fn non_finite_numbers_become_none() {
        let mut r = full_row();
        r.insert("pnl".into(), json!("inf"));
        r.insert("margin".into(), json!("NaN"));
        let rec = normalize_row(&r).unwrap();
        assert_eq!(rec.pnl, None);
        assert_eq!(rec.margin, None);
    }

    #[test]
    fn bad_date_range_keeps_record() {
        let mut r = full_row();
        r.insert("date_range".into(), json!("31.13.2024 - 01.01.2025"));
        let rec = normalize_row(&r).unwrap();
        assert!(rec.parsed_dates.is_none());
        assert_eq!(rec.date_range, "31.13.2024 - 01.01.2025");
    }

    #[test]
    fn keys_tolerate_bom_and_case() {
        let r = row(json!({
            "\u{feff}DATE_RANGE": "05.01.2024 - 06.01.2024",
            "COIN": "ETH",
            "Pnl": "-50"
        }));
        let rec = normalize_row(&r).unwrap();
        assert_eq!(rec.coin, "ETH");
        assert_eq!(rec.date_range, "05.01.2024 - 06.01.2024");
        // "Pnl" is neither exact, lower, nor upper case of "pnl".
        assert_eq!(rec.pnl, None);
    }

    #[test]
    fn null_cell_falls_through_to_other_casing() {
        let r = row(json!({
            "date_range": "05.01.2024 - 06.01.2024",
            "coin": null,
            "COIN": "BTC",
            "pnl": null,
            "PNL": "7,5"
        }));
        let rec = normalize_row(&r).unwrap();
        assert_eq!(rec.coin, "BTC");
        assert_eq!(rec.pnl, Some(7.5));
    }

    #[test]
    fn blank_leverage_is_absent() {
        let mut r = full_row();
        r.insert("leverage".into(), json!("  "));
        assert_eq!(normalize_row(&r).unwrap().leverage, None);
    }

    #[test]
    fn duration_falls_back_to_padded_header() {
        let mut r = full_row();
        r.remove("duration");
        r.insert("duration ".into(), json!("3h"));
        // The view trims keys, so the padded header resolves directly.
        assert_eq!(normalize_row(&r).unwrap().duration, "3h");
    }

    #[test]
    fn localized_parsing() {
        assert_eq!(parse_localized("1 234,56"), Some(1234.56));
        assert_eq!(parse_localized(" -0,5 "), Some(-0.5));
        assert_eq!(parse_localized("1,234,5"), None);
        assert_eq!(parse_localized(""), None);
        assert_eq!(parse_localized("12.5"), Some(12.5));
    }
}
