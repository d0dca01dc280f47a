//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory by the evaluator and the TUI
//! - exported to JSON/CSV
//! - reloaded later for plotting

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Default innovation coefficient.
pub const DEFAULT_P: f64 = 0.0039;
/// Default imitation coefficient.
pub const DEFAULT_Q: f64 = 0.753;
/// Default market potential (ultimate adopters).
pub const DEFAULT_M: f64 = 103_000_000.0;
/// Default forecast horizon in years.
pub const DEFAULT_PERIODS: u32 = 24;
/// Longest forecast horizon the engine will build rows for.
pub const MAX_PERIODS: u32 = 1_000;

/// Tunable inputs of the Bass diffusion model.
///
/// All four fields are always present. Updates replace one field at a time
/// (see [`ParameterSet::with_field`]).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParameterSet {
    /// Innovation coefficient (external influence). Must be `> 0`.
    pub p: f64,
    /// Imitation coefficient (word-of-mouth).
    pub q: f64,
    /// Market potential.
    pub m: f64,
    /// Forecast horizon in years, counted from the first historical year.
    pub periods: u32,
}

impl Default for ParameterSet {
    fn default() -> Self {
        Self {
            p: DEFAULT_P,
            q: DEFAULT_Q,
            m: DEFAULT_M,
            periods: DEFAULT_PERIODS,
        }
    }
}

impl ParameterSet {
    /// Return a copy with exactly one field replaced.
    ///
    /// `periods` takes the truncated value saturated into `u32`; `NaN` becomes 0.
    pub fn with_field(self, field: ParamField, value: f64) -> Self {
        let mut next = self;
        match field {
            ParamField::P => next.p = value,
            ParamField::Q => next.q = value,
            ParamField::M => next.m = value,
            ParamField::Periods => next.periods = value.trunc() as u32,
        }
        next
    }

    /// Read a field as `f64` (used by generic UI code).
    pub fn get(&self, field: ParamField) -> f64 {
        match field {
            ParamField::P => self.p,
            ParamField::Q => self.q,
            ParamField::M => self.m,
            ParamField::Periods => f64::from(self.periods),
        }
    }
}

/// Names one field of [`ParameterSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ParamField {
    P,
    Q,
    M,
    Periods,
}

impl ParamField {
    pub const ALL: [ParamField; 4] = [ParamField::P, ParamField::Q, ParamField::M, ParamField::Periods];

    /// Short symbol used in messages and on the command line.
    pub fn symbol(self) -> &'static str {
        match self {
            ParamField::P => "p",
            ParamField::Q => "q",
            ParamField::M => "m",
            ParamField::Periods => "periods",
        }
    }

    /// Human-readable label for terminal output.
    pub fn display_name(self) -> &'static str {
        match self {
            ParamField::P => "Innovation coefficient (p)",
            ParamField::Q => "Imitation coefficient (q)",
            ParamField::M => "Market potential (m)",
            ParamField::Periods => "Time periods (years)",
        }
    }
}

impl std::fmt::Display for ParamField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}

/// One historical year of observed adoption.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObservationPoint {
    pub year: i32,
    pub sales: u64,
    /// Running sum of `sales` up to and including this year.
    pub cumulative: u64,
}

/// An observation enriched with the model's predictions.
///
/// Serialized flat: `year, sales, cumulative, predictedSales, predictedCumulative`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelPoint {
    #[serde(flatten)]
    pub observation: ObservationPoint,
    #[serde(rename = "predictedSales")]
    pub predicted_sales: f64,
    #[serde(rename = "predictedCumulative")]
    pub predicted_cumulative: f64,
}

impl ModelPoint {
    pub fn year(&self) -> i32 {
        self.observation.year
    }

    /// Actual minus predicted per-period sales.
    pub fn sales_residual(&self) -> f64 {
        self.observation.sales as f64 - self.predicted_sales
    }

    /// Actual minus predicted cumulative adoption.
    pub fn cumulative_residual(&self) -> f64 {
        self.observation.cumulative as f64 - self.predicted_cumulative
    }
}

/// A model-only row (no actuals), used for the forward forecast horizon.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastPoint {
    pub year: i32,
    pub predicted_sales: f64,
    pub predicted_cumulative: f64,
}

/// Headline numbers shown next to the charts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyStats {
    /// Year with the highest observed sales.
    pub peak_year: i32,
    pub peak_sales: u64,
    /// Last historical year and its cumulative adoption.
    pub total_year: i32,
    pub total_adoption: u64,
    /// `total_adoption / m` (fraction, not percent).
    pub market_share: f64,
    /// `q` expressed as a percentage.
    pub word_of_mouth_pct: f64,
    /// Year with the highest predicted sales (first on ties).
    pub predicted_peak_year: i32,
}

/// Agreement between actual and predicted values.
///
/// Reported only; parameters are never optimized against it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitQuality {
    pub n: usize,
    /// Sum of squared per-period sales residuals.
    pub sse: f64,
    /// Root mean squared per-period sales residual.
    pub rmse: f64,
    /// Root mean squared cumulative residual.
    pub rmse_cumulative: f64,
    /// Mean absolute percentage error on per-period sales (zero actuals skipped).
    pub mape: Option<f64>,
}

/// Which comparison chart to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    /// Annual sales vs predicted sales.
    Sales,
    /// Cumulative sales vs predicted cumulative.
    Cumulative,
    Both,
}

impl ChartKind {
    pub fn display_name(self) -> &'static str {
        match self {
            ChartKind::Sales => "Annual Sales Comparison",
            ChartKind::Cumulative => "Cumulative Sales Comparison",
            ChartKind::Both => "Sales and Cumulative Comparison",
        }
    }
}

/// A full run's configuration as understood by the CLI commands.
///
/// This is derived from CLI flags, environment, and defaults.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub params: ParameterSet,
    pub chart: ChartKind,
    pub plot: bool,
    pub plot_width: usize,
    pub plot_height: usize,
    /// Include the forward forecast rows past the historical series.
    pub forecast: bool,
    pub export_csv: Option<PathBuf>,
    pub export_json: Option<PathBuf>,
}

/// A saved model evaluation (JSON).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelFile {
    pub tool: String,
    pub generated_at: DateTime<Utc>,
    pub parameters: ParameterSet,
    pub key_stats: KeyStats,
    pub fit_quality: FitQuality,
    pub points: Vec<ModelPoint>,
    #[serde(default)]
    pub forecast: Vec<ForecastPoint>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn with_field_replaces_only_the_named_field() {
        let base = ParameterSet::default();
        let next = base.with_field(ParamField::Q, 0.5);
        assert_eq!(next.q, 0.5);
        assert_eq!(next.p, base.p);
        assert_eq!(next.m, base.m);
        assert_eq!(next.periods, base.periods);
    }

    #[test]
    fn periods_update_truncates_and_saturates() {
        let base = ParameterSet::default();
        assert_eq!(base.with_field(ParamField::Periods, 30.9).periods, 30);
        assert_eq!(base.with_field(ParamField::Periods, -3.0).periods, 0);
        assert_eq!(base.with_field(ParamField::Periods, f64::NAN).periods, 0);
    }

    #[test]
    fn model_point_serializes_flat_with_camel_case_predictions() {
        let point = ModelPoint {
            observation: ObservationPoint { year: 1990, sales: 10, cumulative: 10 },
            predicted_sales: 1.5,
            predicted_cumulative: 1.5,
        };
        let json = serde_json::to_value(point).unwrap();
        assert_eq!(json["year"], 1990);
        assert_eq!(json["sales"], 10);
        assert_eq!(json["cumulative"], 10);
        assert_eq!(json["predictedSales"], 1.5);
        assert_eq!(json["predictedCumulative"], 1.5);
    }
}
