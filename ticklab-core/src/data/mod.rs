//! Loading daily bars from provider exports and selecting a date range.

pub mod ingest;
pub mod range;

pub use ingest::{load_csv, read_csv, DataError};
pub use range::{default_range, select_range, DEFAULT_LOOKBACK_DAYS};
