//! Formatted terminal output: summaries, tables, and number formatting.
//!
//! We keep formatting code in one place so:
//! - the model code stays clean and testable
//! - output changes are localized (important for snapshot tests)

use crate::domain::{FitQuality, ForecastPoint, KeyStats, ModelPoint, ParameterSet};

/// Round to the nearest integer and group thousands with `,`.
///
/// Non-finite values render as `-`.
pub fn format_number(value: f64) -> String {
    if !value.is_finite() {
        return "-".to_string();
    }
    let rounded = value.round();
    let digits = format!("{:.0}", rounded.abs());

    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if rounded < 0.0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Format a fraction as a percentage with one decimal (`0.875` -> `87.5%`).
pub fn format_percent(fraction: f64) -> String {
    if !fraction.is_finite() {
        return "-".to_string();
    }
    format!("{:.1}%", fraction * 100.0)
}

/// Parameters, key statistics, and fit diagnostics.
pub fn format_run_summary(params: &ParameterSet, stats: &KeyStats, quality: &FitQuality) -> String {
    let mut out = String::new();

    out.push_str("=== bass - Bass Diffusion Model Analysis ===\n");
    out.push_str(&format!(
        "Parameters: p={:.4} | q={:.3} | m={} | periods={} years\n",
        params.p,
        params.q,
        format_number(params.m),
        params.periods,
    ));

    out.push_str("\nKey statistics:\n");
    out.push_str(&format!(
        "- Peak year: {} ({} units)\n",
        stats.peak_year,
        format_number(stats.peak_sales as f64)
    ));
    out.push_str(&format!(
        "- Total adoption by {}: {} ({} of market potential)\n",
        stats.total_year,
        format_number(stats.total_adoption as f64),
        format_percent(stats.market_share),
    ));
    out.push_str(&format!(
        "- Growth factors: {:.1}% word-of-mouth effect\n",
        stats.word_of_mouth_pct
    ));
    out.push_str(&format!("- Predicted peak year: {}\n", stats.predicted_peak_year));

    out.push_str("\nFit diagnostics:\n");
    out.push_str(&format!(
        "- n={} | RMSE(sales)={} | RMSE(cumulative)={} | MAPE={}\n",
        quality.n,
        format_number(quality.rmse),
        format_number(quality.rmse_cumulative),
        quality
            .mape
            .map(|v| format!("{v:.1}%"))
            .unwrap_or_else(|| "-".to_string()),
    ));
    out.push('\n');

    out
}

/// Actual vs predicted per year.
pub fn format_model_table(points: &[ModelPoint]) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{:<6} {:>14} {:>16} {:>14} {:>16}\n",
        "year", "sales", "predicted_sales", "cumulative", "predicted_cum"
    ));
    out.push_str(&format!(
        "{:-<6} {:-<14} {:-<16} {:-<14} {:-<16}\n",
        "", "", "", "", ""
    ));

    for p in points {
        out.push_str(&format!(
            "{:<6} {:>14} {:>16} {:>14} {:>16}\n",
            p.year(),
            format_number(p.observation.sales as f64),
            format_number(p.predicted_sales),
            format_number(p.observation.cumulative as f64),
            format_number(p.predicted_cumulative),
        ));
    }

    out
}

/// Model-only forecast rows.
pub fn format_forecast_table(rows: &[ForecastPoint]) -> String {
    if rows.is_empty() {
        return "Forecast: no rows beyond the historical series (increase --periods).\n".to_string();
    }

    let mut out = String::new();
    out.push_str("Forecast:\n");
    out.push_str(&format!(
        "{:<6} {:>16} {:>16}\n",
        "year", "predicted_sales", "predicted_cum"
    ));
    out.push_str(&format!("{:-<6} {:-<16} {:-<16}\n", "", "", ""));
    for row in rows {
        out.push_str(&format!(
            "{:<6} {:>16} {:>16}\n",
            row.year,
            format_number(row.predicted_sales),
            format_number(row.predicted_cumulative),
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ObservationPoint;

    #[test]
    fn format_number_groups_thousands() {
        assert_eq!(format_number(0.0), "0");
        assert_eq!(format_number(999.4), "999");
        assert_eq!(format_number(1000.0), "1,000");
        assert_eq!(format_number(103_000_000.0), "103,000,000");
        assert_eq!(format_number(19_464_483.2), "19,464,483");
        assert_eq!(format_number(-1_234_567.6), "-1,234,568");
        assert_eq!(format_number(-0.3), "0");
        assert_eq!(format_number(f64::NAN), "-");
    }

    #[test]
    fn format_percent_one_decimal() {
        assert_eq!(format_percent(90_094_476.0 / 103_000_000.0), "87.5%");
        assert_eq!(format_percent(f64::INFINITY), "-");
    }

    #[test]
    fn model_table_has_one_row_per_point() {
        let points = vec![ModelPoint {
            observation: ObservationPoint { year: 1990, sales: 401_700, cumulative: 401_700 },
            predicted_sales: 0.0,
            predicted_cumulative: 0.0,
        }];
        let table = format_model_table(&points);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("year"));
        assert!(lines[2].starts_with("1990"));
        assert!(lines[2].contains("401,700"));
    }

    #[test]
    fn empty_forecast_explains_itself() {
        assert!(format_forecast_table(&[]).contains("--periods"));
    }
}
