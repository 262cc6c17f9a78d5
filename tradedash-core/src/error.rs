use thiserror::Error;

/// Errors surfaced by the dashboard controller.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DashboardError {
    /// The feed produced no usable records.
    #[error("no data: {raw_rows} rows read, {rejected} rejected, none usable")]
    NoData { raw_rows: usize, rejected: usize },
}
