//! Read/write model JSON files.
//!
//! Model JSON is the "portable" representation of one evaluation:
//! - parameters
//! - key statistics and fit diagnostics
//! - the evaluated points (flat camelCase fields) and optional forecast rows
//!
//! The schema is defined by `domain::ModelFile`.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use chrono::Utc;

use crate::app::session::Session;
use crate::domain::{ForecastPoint, ModelFile};
use crate::error::AppError;

/// Snapshot the session's current evaluation.
pub fn model_file(session: &Session, forecast: &[ForecastPoint]) -> Result<ModelFile, AppError> {
    let key_stats = session
        .key_stats()
        .ok_or_else(|| AppError::new(4, "Cannot export an empty evaluation."))?;
    let fit_quality = session
        .fit_quality()
        .ok_or_else(|| AppError::new(4, "Cannot export an empty evaluation."))?;

    Ok(ModelFile {
        tool: "bass".to_string(),
        generated_at: Utc::now(),
        parameters: session.params(),
        key_stats,
        fit_quality,
        points: session.points().to_vec(),
        forecast: forecast.to_vec(),
    })
}

/// Write a model JSON file.
pub fn write_model_json(path: &Path, session: &Session, forecast: &[ForecastPoint]) -> Result<(), AppError> {
    let model = model_file(session, forecast)?;
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create model JSON '{}': {e}", path.display())))?;

    serde_json::to_writer_pretty(BufWriter::new(file), &model)
        .map_err(|e| AppError::new(2, format!("Failed to write model JSON: {e}")))?;

    Ok(())
}

/// Read a model JSON file.
pub fn read_model_json(path: &Path) -> Result<ModelFile, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open model JSON '{}': {e}", path.display())))?;
    let model: ModelFile =
        serde_json::from_reader(file).map_err(|e| AppError::new(2, format!("Invalid model JSON: {e}")))?;
    Ok(model)
}
