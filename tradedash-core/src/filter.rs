//! Filter engine: conjunction of the optional equality constraints in a [`FilterState`].

use crate::domain::{FilterState, SharedRecord, TradeRecord};

/// Keep the records matching every set field of `filters`, in input order.
///
/// A record without parsed dates fails any year or month constraint. String
/// fields compare with exact, case-sensitive equality.
pub fn apply_filters(records: &[SharedRecord], filters: &FilterState) -> Vec<SharedRecord> {
    if filters.is_empty() {
        return records.to_vec();
    }
    records
        .iter()
        .filter(|r| matches(r, filters))
        .cloned()
        .collect()
}

/// Whether a single record passes every set constraint.
pub fn matches(record: &TradeRecord, filters: &FilterState) -> bool {
    if let Some(year) = filters.year {
        if record.year() != Some(year) {
            return false;
        }
    }
    if let Some(month) = filters.month {
        if record.month() != Some(month) {
            return false;
        }
    }
    if let Some(coin) = &filters.crypto {
        if record.coin != *coin {
            return false;
        }
    }
    if let Some(leverage) = &filters.leverage {
        if record.leverage.as_deref() != Some(leverage.as_str()) {
            return false;
        }
    }
    if let Some(direction) = &filters.direction {
        if record.direction != *direction {
            return false;
        }
    }
    true
}
