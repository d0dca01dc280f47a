//! Domain types used throughout the engine and its front-ends.
//!
//! This module defines:
//!
//! - model inputs (`ParameterSet`, `ParamField`)
//! - observed and predicted points (`ObservationPoint`, `ModelPoint`, `ForecastPoint`)
//! - derived outputs (`KeyStats`, `FitQuality`, `ModelFile`)

pub mod types;

pub use types::*;
