//! Input/output helpers.
//!
//! - per-year CSV export (`export`)
//! - model JSON read/write (`curve`)

pub mod curve;
pub mod export;

pub use curve::*;
pub use export::*;
