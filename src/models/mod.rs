//! Bass diffusion model.
//!
//! - `bass`: closed-form cumulative adoption curve
//! - `evaluator`: evaluation over an observation series and forecast horizon

pub mod bass;
pub mod evaluator;

pub use bass::*;
pub use evaluator::*;
