//! `bass-curves` library crate.
//!
//! Evaluates the Bass diffusion model against a fixed historical sales series.
//! The binary (`bass`) is a thin wrapper around this library so the engine,
//! the session and the report helpers stay testable without spawning processes.

pub mod app;
pub mod cli;
pub mod data;
pub mod debug;
pub mod domain;
pub mod error;
pub mod io;
pub mod models;
pub mod plot;
pub mod report;
pub mod store;
pub mod tui;
