//! TradeDash Core: the trading-history pipeline.
//!
//! Raw feed rows flow through:
//! - Normalizer (loose rows → typed [`domain::TradeRecord`]s) and deduplicator
//! - Date-range parser (`dd.mm.yyyy - dd.mm.yyyy` → structured dates)
//! - Filter engine, statistics aggregator and per-coin breakdown
//! - Sort engine with explicit tie-breaks
//! - Pagination cursor with generation-checked reveal triggers
//!
//! [`dashboard::Dashboard`] owns the store and runs the re-derivation cascade.

pub mod breakdown;
pub mod dashboard;
pub mod date_range;
pub mod dedup;
pub mod domain;
pub mod error;
pub mod facets;
pub mod filter;
pub mod ingest;
pub mod normalize;
pub mod pagination;
pub mod sort;
pub mod stats;

pub use dashboard::{Dashboard, DashboardView, RevealOutcome, RevealTrigger, ViewMode};
pub use error::DashboardError;
pub use normalize::RawRow;
