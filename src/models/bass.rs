//! Closed-form Bass diffusion curve.
//!
//! The cumulative adoption fraction at elapsed time `t` is:
//!
//! ```text
//! F(t) = (1 - exp(-(p+q)·t)) / (1 + (q/p)·exp(-(p+q)·t))
//! ```
//!
//! and cumulative adopters are `m · F(t)`.
//!
//! Numerical notes:
//! - `1 - exp(-x)` is computed as `-expm1(-x)` to keep precision for small `x`
//!   (early periods with small `p + q`).
//! - No domain checks happen here. `p = 0` makes `q/p` undefined and the result
//!   degenerates to `0` or `NaN`; callers that need a hard error go through
//!   [`crate::models::check_domain`].

use crate::domain::ParameterSet;

/// Cumulative adoption fraction `F(t)` in `[0, 1)` for valid inputs.
pub fn adoption_fraction(t: f64, p: f64, q: f64) -> f64 {
    let x = (p + q) * t;
    let decay = (-x).exp();
    let numer = -(-x).exp_m1();
    numer / (1.0 + (q / p) * decay)
}

/// Cumulative adopters `m · F(t)`.
pub fn cumulative_adoption(t: f64, params: &ParameterSet) -> f64 {
    params.m * adoption_fraction(t, params.p, params.q)
}

/// Cumulative adopters at the end of the previous period.
///
/// The period before the first one has no adopters: `C(-1) := 0` at `t = 0`.
pub fn prior_cumulative(t: i64, params: &ParameterSet) -> f64 {
    if t == 0 {
        return 0.0;
    }
    cumulative_adoption((t - 1) as f64, params)
}
