//! Key statistics and fit diagnostics derived from an evaluation.

use crate::domain::{FitQuality, KeyStats, ModelPoint, ParameterSet};

/// Headline statistics for the evaluated series.
///
/// Returns `None` for an empty evaluation.
pub fn key_stats(points: &[ModelPoint], params: &ParameterSet) -> Option<KeyStats> {
    let last = points.last()?;

    let mut peak = &points[0];
    let mut predicted_peak = &points[0];
    for point in points {
        if point.observation.sales > peak.observation.sales {
            peak = point;
        }
        if point.predicted_sales > predicted_peak.predicted_sales {
            predicted_peak = point;
        }
    }

    Some(KeyStats {
        peak_year: peak.year(),
        peak_sales: peak.observation.sales,
        total_year: last.year(),
        total_adoption: last.observation.cumulative,
        market_share: last.observation.cumulative as f64 / params.m,
        word_of_mouth_pct: params.q * 100.0,
        predicted_peak_year: predicted_peak.year(),
    })
}

/// Residual diagnostics between actual and predicted values.
///
/// Returns `None` for an empty evaluation.
pub fn fit_quality(points: &[ModelPoint]) -> Option<FitQuality> {
    if points.is_empty() {
        return None;
    }
    let n = points.len();

    let sse: f64 = points.iter().map(|p| p.sales_residual().powi(2)).sum();
    let sse_cumulative: f64 = points.iter().map(|p| p.cumulative_residual().powi(2)).sum();

    let mut ape_sum = 0.0;
    let mut ape_n = 0usize;
    for p in points {
        if p.observation.sales == 0 {
            continue;
        }
        ape_sum += (p.sales_residual() / p.observation.sales as f64).abs();
        ape_n += 1;
    }
    let mape = (ape_n > 0).then(|| ape_sum / ape_n as f64 * 100.0);

    Some(FitQuality {
        n,
        sse,
        rmse: (sse / n as f64).sqrt(),
        rmse_cumulative: (sse_cumulative / n as f64).sqrt(),
        mape,
    })
}
