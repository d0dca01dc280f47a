//! Reporting utilities: key statistics, fit diagnostics, and formatted output.

pub mod format;
pub mod stats;

pub use format::*;
pub use stats::*;
