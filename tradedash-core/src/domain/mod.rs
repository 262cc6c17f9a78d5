//! Domain types for TradeDash

pub mod filter_state;
pub mod record;

pub use filter_state::{month_name, FilterKey, FilterState};
pub use record::{finite_or_zero, IdentityKey, ParsedDateRange, SharedRecord, TradeRecord};
