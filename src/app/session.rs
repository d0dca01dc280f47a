//! One interactive modeling session.
//!
//! A session ties together the parameter store, the fixed historical series and
//! the most recent evaluation. Every parameter change goes through
//! [`Session::update`], which writes the store and then re-evaluates before
//! returning, so readers never observe a partial or stale sequence.
//!
//! Both the CLI and the TUI drive the model through this type.

use tracing::{debug, warn};

use crate::data::validate_series;
use crate::domain::{FitQuality, ForecastPoint, KeyStats, ModelPoint, ObservationPoint, ParamField, ParameterSet};
use crate::error::ModelError;
use crate::models::{evaluate, extension};
use crate::report::{fit_quality, key_stats};
use crate::store::ParameterStore;

#[derive(Debug)]
pub struct Session {
    store: ParameterStore,
    series: Vec<ObservationPoint>,
    points: Vec<ModelPoint>,
    last_error: Option<ModelError>,
    generation: u64,
}

impl Session {
    /// Validate the series and run the first evaluation.
    pub fn new(params: ParameterSet, series: &[ObservationPoint]) -> Result<Self, ModelError> {
        validate_series(series)?;
        let points = evaluate(&params, series)?;

        let mut store = ParameterStore::new(params);
        store.subscribe(|params| {
            debug!(p = params.p, q = params.q, m = params.m, periods = params.periods, "parameters changed");
        });

        Ok(Self {
            store,
            series: series.to_vec(),
            points,
            last_error: None,
            generation: 1,
        })
    }

    /// Apply a single-field update and recompute.
    ///
    /// The store always takes the new value. When the resulting parameters are
    /// outside the model's domain the previous evaluation is kept and the error
    /// is returned (and remembered in [`Session::last_error`]).
    pub fn update(&mut self, field: ParamField, value: f64) -> Result<(), ModelError> {
        let params = self.store.update(field, value);
        match evaluate(&params, &self.series) {
            Ok(points) => {
                self.points = points;
                self.last_error = None;
                self.generation += 1;
                debug!(generation = self.generation, %field, value, "model re-evaluated");
                Ok(())
            }
            Err(err) => {
                warn!(%field, value, error = %err, "keeping last good evaluation");
                self.last_error = Some(err.clone());
                Err(err)
            }
        }
    }

    /// Register an observer on the underlying parameter store.
    pub fn subscribe<F>(&mut self, listener: F)
    where
        F: FnMut(&ParameterSet) + 'static,
    {
        self.store.subscribe(listener);
    }

    pub fn params(&self) -> ParameterSet {
        self.store.get()
    }

    /// Most recent successful evaluation.
    pub fn points(&self) -> &[ModelPoint] {
        &self.points
    }

    pub fn series(&self) -> &[ObservationPoint] {
        &self.series
    }

    /// Error from the latest update, if it was rejected.
    pub fn last_error(&self) -> Option<&ModelError> {
        self.last_error.as_ref()
    }

    /// Number of successful evaluations so far (starts at 1).
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Forecast rows past the historical series for the current parameters.
    pub fn forecast(&self) -> Result<Vec<ForecastPoint>, ModelError> {
        extension(&self.params(), &self.series)
    }

    pub fn key_stats(&self) -> Option<KeyStats> {
        key_stats(&self.points, &self.params())
    }

    pub fn fit_quality(&self) -> Option<FitQuality> {
        fit_quality(&self.points)
    }
}
