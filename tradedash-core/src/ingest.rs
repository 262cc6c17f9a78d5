//! Ingest: normalize then deduplicate a batch of raw rows into a record store.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::dedup::dedupe;
use crate::domain::SharedRecord;
use crate::normalize::{normalize_row, RawRow};

/// What happened to the rows of one load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestReport {
    pub raw_rows: usize,
    /// Rows without a coin or date range.
    pub rejected: usize,
    pub duplicates: usize,
    pub kept: usize,
}

pub fn ingest<'a, I>(rows: I) -> (Vec<SharedRecord>, IngestReport)
where
    I: IntoIterator<Item = &'a RawRow>,
{
    let mut report = IngestReport::default();
    let mut normalized = Vec::new();
    for row in rows {
        report.raw_rows += 1;
        match normalize_row(row) {
            Some(record) => normalized.push(Arc::new(record)),
            None => report.rejected += 1,
        }
    }

    let before = normalized.len();
    let records = dedupe(normalized);
    report.duplicates = before - records.len();
    report.kept = records.len();

    info!(
        raw_rows = report.raw_rows,
        rejected = report.rejected,
        duplicates = report.duplicates,
        kept = report.kept,
        "ingested trading history"
    );
    (records, report)
}
