//! Bass model evaluation over an observation series.
//!
//! Each observation at elapsed index `t = year - first_year` gets:
//! - `predicted_cumulative = C(t)`
//! - `predicted_sales = C(t) - C(t-1)`, with `C(-1) = 0`
//!
//! The evaluator is a pure function: same inputs, bit-identical outputs, and the
//! input series is never mutated. A fresh `Vec<ModelPoint>` is returned on every
//! call.

use crate::domain::{ForecastPoint, MAX_PERIODS, ModelPoint, ObservationPoint, ParamField, ParameterSet};
use crate::error::ModelError;
use crate::models::bass::{cumulative_adoption, prior_cumulative};

/// Reject parameter sets for which the closed form is undefined.
///
/// `p` must be finite and strictly positive; `q` and `m` must be finite.
/// `q = 0`, negative `q` and `m <= 0` are accepted (well-defined, if not
/// meaningful).
pub fn check_domain(params: &ParameterSet) -> Result<(), ModelError> {
    if !params.p.is_finite() {
        return Err(violation(ParamField::P, params.p, "must be a finite number"));
    }
    if params.p <= 0.0 {
        return Err(violation(ParamField::P, params.p, "must be strictly positive"));
    }
    if !params.q.is_finite() {
        return Err(violation(ParamField::Q, params.q, "must be a finite number"));
    }
    if !params.m.is_finite() {
        return Err(violation(ParamField::M, params.m, "must be a finite number"));
    }
    Ok(())
}

fn violation(field: ParamField, value: f64, reason: &'static str) -> ModelError {
    ModelError::DomainConstraintViolation { field, value, reason }
}

/// Evaluate the model for every observation, rejecting invalid parameters.
pub fn evaluate(params: &ParameterSet, series: &[ObservationPoint]) -> Result<Vec<ModelPoint>, ModelError> {
    check_domain(params)?;
    if series.is_empty() {
        return Err(ModelError::EmptySeries);
    }
    Ok(evaluate_unchecked(params, series))
}

/// Evaluate the model without domain checks.
///
/// Invalid parameters (e.g. `p = 0`, `NaN`) propagate as non-finite or
/// degenerate outputs. An empty series yields an empty result.
pub fn evaluate_unchecked(params: &ParameterSet, series: &[ObservationPoint]) -> Vec<ModelPoint> {
    let Some(first) = series.first() else {
        return Vec::new();
    };
    let origin = i64::from(first.year);

    let mut out = Vec::with_capacity(series.len());
    // (t, C(t)) of the previous observation, reused as C(t-1) when contiguous.
    let mut previous: Option<(i64, f64)> = None;

    for observation in series {
        let t = i64::from(observation.year) - origin;
        let current = cumulative_adoption(t as f64, params);
        let prior = match previous {
            Some((prev_t, prev_cumulative)) if t != 0 && prev_t == t - 1 => prev_cumulative,
            _ => prior_cumulative(t, params),
        };

        out.push(ModelPoint {
            observation: *observation,
            predicted_sales: current - prior,
            predicted_cumulative: current,
        });
        previous = Some((t, current));
    }

    out
}

/// Model-only rows for `periods` years starting at `first_year`.
///
/// Horizons above [`MAX_PERIODS`] are rejected, as are horizons whose last
/// year would not fit in an `i32`.
pub fn forecast(params: &ParameterSet, first_year: i32, periods: u32) -> Result<Vec<ForecastPoint>, ModelError> {
    check_domain(params)?;
    if periods > MAX_PERIODS {
        return Err(violation(ParamField::Periods, f64::from(periods), "exceeds the maximum forecast horizon"));
    }

    let mut out = Vec::with_capacity(periods as usize);
    let mut prior = 0.0;
    for t in 0..periods {
        let year = i32::try_from(t)
            .ok()
            .and_then(|offset| first_year.checked_add(offset))
            .ok_or_else(|| violation(ParamField::Periods, f64::from(periods), "runs past the last representable year"))?;
        let current = cumulative_adoption(f64::from(t), params);
        out.push(ForecastPoint {
            year,
            predicted_sales: current - prior,
            predicted_cumulative: current,
        });
        prior = current;
    }
    Ok(out)
}

/// Forecast rows past the last historical year, up to the `periods` horizon.
///
/// Empty when `periods` does not reach beyond the series.
pub fn extension(params: &ParameterSet, series: &[ObservationPoint]) -> Result<Vec<ForecastPoint>, ModelError> {
    let (Some(first), Some(last)) = (series.first(), series.last()) else {
        return Err(ModelError::EmptySeries);
    };
    let rows = forecast(params, first.year, params.periods)?;
    Ok(rows.into_iter().filter(|row| row.year > last.year).collect())
}
