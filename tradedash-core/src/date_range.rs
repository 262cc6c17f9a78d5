//! Date-range parsing for `dd.mm.yyyy - dd.mm.yyyy` labels.
//!
//! Parsing never fails loudly: a malformed label yields `None` and a debug log
//! line, and the record carrying it stays in the store.

use chrono::NaiveDate;
use tracing::debug;

use crate::domain::ParsedDateRange;

/// Parse a date-range label into start/end dates plus the start's (year, month).
///
/// Whitespace around the `-` separator is tolerated. Exactly two sides with
/// exactly three numeric components each are required, and each side must be
/// a real calendar date (`31.13.2024` is rejected rather than rolled over).
pub fn parse_date_range(text: &str) -> Option<ParsedDateRange> {
    match try_parse(text) {
        Ok(parsed) => Some(parsed),
        Err(reason) => {
            debug!(label = text, reason, "unparseable date range");
            None
        }
    }
}

fn try_parse(text: &str) -> Result<ParsedDateRange, &'static str> {
    let sides: Vec<&str> = text.split('-').map(str::trim).collect();
    if sides.len() != 2 {
        return Err("expected exactly one '-' separator");
    }
    let (start_day, start_month, start_year) = components(sides[0])?;
    let (end_day, end_month, end_year) = components(sides[1])?;

    let start_date = NaiveDate::from_ymd_opt(start_year, start_month, start_day)
        .ok_or("start is not a calendar date")?;
    let end_date =
        NaiveDate::from_ymd_opt(end_year, end_month, end_day).ok_or("end is not a calendar date")?;

    Ok(ParsedDateRange {
        start_date,
        end_date,
        year: start_year,
        month: start_month,
    })
}

/// `dd.mm.yyyy` → (day, month, year).
fn components(side: &str) -> Result<(u32, u32, i32), &'static str> {
    let parts: Vec<&str> = side.split('.').map(str::trim).collect();
    if parts.len() != 3 {
        return Err("expected dd.mm.yyyy");
    }
    let day = parts[0].parse::<u32>().map_err(|_| "non-numeric day")?;
    let month = parts[1].parse::<u32>().map_err(|_| "non-numeric month")?;
    let year = parts[2].parse::<i32>().map_err(|_| "non-numeric year")?;
    Ok((day, month, year))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parses_well_formed_range() {
        let p = parse_date_range("01.01.2024 - 02.01.2024").unwrap();
        assert_eq!(p.start_date, date(2024, 1, 1));
        assert_eq!(p.end_date, date(2024, 1, 2));
        assert_eq!(p.year, 2024);
        assert_eq!(p.month, 1);
    }

    #[test]
    fn tolerates_missing_or_extra_whitespace() {
        let tight = parse_date_range("15.03.2024-20.03.2024").unwrap();
        let loose = parse_date_range("  15.03.2024   -   20.03.2024 ").unwrap();
        assert_eq!(tight, loose);
        assert_eq!(tight.month, 3);
    }

    #[test]
    fn year_and_month_come_from_start() {
        let p = parse_date_range("30.12.2023 - 02.01.2024").unwrap();
        assert_eq!(p.year, 2023);
        assert_eq!(p.month, 12);
    }

    #[test]
    fn reversed_range_passes_through() {
        let p = parse_date_range("10.05.2024 - 01.05.2024").unwrap();
        assert!(p.start_date > p.end_date);
    }

    #[test]
    fn invalid_month_is_rejected() {
        assert!(parse_date_range("31.13.2024 - 01.01.2025").is_none());
    }

    #[test]
    fn impossible_day_is_rejected() {
        assert!(parse_date_range("30.02.2024 - 01.03.2024").is_none());
        assert!(parse_date_range("00.01.2024 - 01.01.2024").is_none());
    }

    #[test]
    fn wrong_token_counts_are_rejected() {
        assert!(parse_date_range("01.01.2024").is_none());
        assert!(parse_date_range("01.01.2024 - 02.01.2024 - 03.01.2024").is_none());
        assert!(parse_date_range("01.2024 - 02.01.2024").is_none());
        assert!(parse_date_range("01.01.2024 - 02.01.2024.1").is_none());
        assert!(parse_date_range("").is_none());
    }

    #[test]
    fn non_numeric_components_are_rejected() {
        assert!(parse_date_range("aa.01.2024 - 02.01.2024").is_none());
        assert!(parse_date_range("01.01.2024 - 02.jan.2024").is_none());
    }
}
