//! Duplicate removal over record identity keys.

use std::collections::HashSet;

use crate::domain::SharedRecord;

/// Drop records whose identity key was already seen, keeping the first
/// occurrence. Survivors keep their input order.
pub fn dedupe(records: Vec<SharedRecord>) -> Vec<SharedRecord> {
    let mut seen = HashSet::with_capacity(records.len());
    records
        .into_iter()
        .filter(|r| seen.insert(r.identity_key()))
        .collect()
}
