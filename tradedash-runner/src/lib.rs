//! TradeDash Runner: host-side collaborators around `tradedash-core`.
//!
//! This crate provides:
//! - TOML configuration with defaults and validation
//! - Tracing subscriber setup (stderr or file)
//! - CSV ingestion from candidate locations
//! - CSV / JSON / Markdown export of a dashboard view
//! - A blocking client for the vault info endpoint

pub mod config;
pub mod data_loader;
pub mod export;
pub mod logging;
pub mod vault;

pub use config::{ConfigError, DashboardConfig, DataConfig, VaultConfig, ViewConfig};
pub use data_loader::{load_rows, LoadError, LoadedRows};
pub use export::{export_positions_csv, export_view_json, generate_report, save_report_bundle};
pub use logging::LoggingConfig;
pub use vault::{OpenPosition, VaultClient, VaultError, VaultSnapshot};
