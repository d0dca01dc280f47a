//! Input data for the model: the fixed historical adoption series.

pub mod historical;

pub use historical::{HISTORICAL_SERIES, historical_series, validate_series};
