//! Data loading: find the trading history CSV and decode it into raw rows.
//!
//! Candidates are tried in order. A missing, unreadable, or empty candidate is
//! logged and skipped; the first file with at least one data row wins.

use std::path::{Path, PathBuf};

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};
use tradedash_core::RawRow;

/// Errors from the data loading layer.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("no usable trading data in {tried} candidate location(s); last error: {last_error}")]
    NoCandidates { tried: usize, last_error: String },

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse CSV in {path}: {source}")]
    Csv { path: PathBuf, source: csv::Error },

    #[error("{path} has no data rows")]
    Empty { path: PathBuf },
}

/// Rows decoded from one file, with the file they came from.
#[derive(Debug, Clone)]
pub struct LoadedRows {
    pub source: PathBuf,
    pub rows: Vec<RawRow>,
}

/// Default search locations, relative to the working directory.
pub fn default_candidates() -> Vec<PathBuf> {
    [
        "trading_data.csv",
        "./trading_data.csv",
        "data/trading_data.csv",
        "./data/trading_data.csv",
    ]
    .into_iter()
    .map(PathBuf::from)
    .collect()
}

/// Load rows from the first usable candidate.
pub fn load_rows(candidates: &[PathBuf]) -> Result<LoadedRows, LoadError> {
    let mut last_error = String::from("no candidates configured");
    for path in candidates {
        match load_file(path) {
            Ok(rows) => {
                info!(path = %path.display(), rows = rows.len(), "loaded trading history");
                return Ok(LoadedRows {
                    source: path.clone(),
                    rows,
                });
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "skipping data candidate");
                last_error = e.to_string();
            }
        }
    }
    Err(LoadError::NoCandidates {
        tried: candidates.len(),
        last_error,
    })
}

/// Read and decode one CSV file. A file without data rows is an error.
pub fn load_file(path: &Path) -> Result<Vec<RawRow>, LoadError> {
    let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let rows = parse_csv(&text).map_err(|source| LoadError::Csv {
        path: path.to_path_buf(),
        source,
    })?;
    if rows.is_empty() {
        return Err(LoadError::Empty {
            path: path.to_path_buf(),
        });
    }
    Ok(rows)
}

/// `;` when the header line contains one, `,` otherwise.
pub fn detect_delimiter(text: &str) -> u8 {
    let header = text.lines().next().unwrap_or("");
    if header.contains(';') {
        b';'
    } else {
        b','
    }
}

/// Header names are BOM-stripped, trimmed and lower-cased.
pub fn normalize_header(name: &str) -> String {
    name.trim_start_matches('\u{feff}').trim().to_lowercase()
}

/// Decode CSV text into raw rows of string cells.
///
/// Blank lines are skipped. Short rows leave the missing columns null; extra
/// cells beyond the header are ignored. With duplicate headers the first
/// column wins.
pub fn parse_csv(text: &str) -> Result<Vec<RawRow>, csv::Error> {
    let text = text.trim_start_matches('\u{feff}');
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(detect_delimiter(text))
        .flexible(true)
        .has_headers(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader.headers()?.iter().map(normalize_header).collect();
    debug!(columns = headers.len(), "csv header");

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        if record.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }
        let mut row = RawRow::new();
        for (i, name) in headers.iter().enumerate() {
            if name.is_empty() {
                continue;
            }
            let value = match record.get(i) {
                Some(cell) => Value::String(cell.to_string()),
                None => Value::Null,
            };
            row.entry(name.clone()).or_insert(value);
        }
        rows.push(row);
    }
    Ok(rows)
}
