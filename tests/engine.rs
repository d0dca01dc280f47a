use approx::assert_relative_eq;

use bass_curves::app::session::Session;
use bass_curves::data::historical_series;
use bass_curves::domain::{ObservationPoint, ParamField, ParameterSet};
use bass_curves::error::ModelError;
use bass_curves::models::{evaluate, evaluate_unchecked, extension};
use bass_curves::report::{format_number, key_stats};

fn reference_params() -> ParameterSet {
    ParameterSet { p: 0.0039, q: 0.753, m: 103_000_000.0, periods: 24 }
}

#[test]
fn first_year_has_zero_adoption_and_later_years_follow_the_difference() {
    let points = evaluate(&reference_params(), historical_series()).unwrap();

    assert_eq!(points[0].year(), 1990);
    assert_eq!(points[0].predicted_sales, 0.0);
    assert_eq!(points[0].predicted_cumulative, 0.0);

    assert_eq!(points[1].year(), 1991);
    assert!(points[1].predicted_sales > 0.0);
    assert_eq!(points[1].predicted_cumulative - points[0].predicted_cumulative, points[1].predicted_sales);
}

#[test]
fn changing_imitation_only_moves_later_years() {
    let base = evaluate(&reference_params(), historical_series()).unwrap();
    let tweaked = evaluate(&ParameterSet { q: 0.5, ..reference_params() }, historical_series()).unwrap();

    assert_eq!(base[0].predicted_cumulative, tweaked[0].predicted_cumulative);
    assert_eq!(base[0].predicted_sales, tweaked[0].predicted_sales);
    assert!(tweaked[10].predicted_cumulative < base[10].predicted_cumulative);
}

#[test]
fn pure_innovation_matches_exponential_adoption() {
    let params = ParameterSet { q: 0.0, ..reference_params() };
    let points = evaluate(&params, historical_series()).unwrap();
    for (t, point) in points.iter().enumerate() {
        let expected = params.m * (1.0 - (-params.p * t as f64).exp());
        assert_relative_eq!(point.predicted_cumulative, expected, max_relative = 1e-12, epsilon = 1e-6);
    }
}

#[test]
fn long_series_approaches_market_potential() {
    let series: Vec<ObservationPoint> = (0..400)
        .map(|i| ObservationPoint { year: 1900 + i, sales: 0, cumulative: 0 })
        .collect();
    let params = ParameterSet { p: 0.03, q: 0.38, m: 1_000.0, periods: 1 };
    let points = evaluate_unchecked(&params, &series);

    for pair in points.windows(2) {
        assert!(pair[1].predicted_cumulative >= pair[0].predicted_cumulative);
    }
    assert_relative_eq!(points[399].predicted_cumulative, 1_000.0, max_relative = 1e-9);
}

#[test]
fn zero_innovation_is_rejected_by_checked_evaluation() {
    let params = ParameterSet { p: 0.0, ..reference_params() };
    let err = evaluate(&params, historical_series()).unwrap_err();
    assert!(matches!(err, ModelError::DomainConstraintViolation { field: ParamField::P, .. }));

    let raw = evaluate_unchecked(&params, historical_series());
    assert_eq!(raw.len(), 11);
}

#[test]
fn session_recomputes_on_update_and_keeps_last_good_curve() {
    let mut session = Session::new(reference_params(), historical_series()).unwrap();
    let initial = session.points().to_vec();

    session.update(ParamField::Q, 0.5).unwrap();
    assert_eq!(session.generation(), 2);
    assert_ne!(session.points()[10], initial[10]);

    assert!(session.update(ParamField::P, f64::NAN).is_err());
    assert_eq!(session.generation(), 2);
    assert!(session.last_error().is_some());

    let expected = evaluate(&ParameterSet { q: 0.5, ..reference_params() }, historical_series()).unwrap();
    assert_eq!(session.points(), expected.as_slice());
}

#[test]
fn periods_extend_the_forecast_past_the_series() {
    let rows = extension(&reference_params(), historical_series()).unwrap();
    assert_eq!(rows.len(), 13);
    assert_eq!(rows.first().map(|r| r.year), Some(2001));
    assert_eq!(rows.last().map(|r| r.year), Some(2013));

    let short = extension(&ParameterSet { periods: 11, ..reference_params() }, historical_series()).unwrap();
    assert!(short.is_empty());
}

#[test]
fn key_stats_summarize_the_historical_peak() {
    let points = evaluate(&reference_params(), historical_series()).unwrap();
    let stats = key_stats(&points, &reference_params()).unwrap();

    assert_eq!(stats.peak_year, 1999);
    assert_eq!(format_number(stats.peak_sales as f64), "19,464,483");
    assert_eq!(stats.total_year, 2000);
    assert_eq!(stats.total_adoption, 90_094_476);
}
