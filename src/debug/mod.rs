//! Debug bundle writer for inspecting the current session state.

use std::fmt::Write as _;
use std::fs::create_dir_all;
use std::path::{Path, PathBuf};

use chrono::Local;

use crate::app::session::Session;
use crate::error::AppError;
use crate::report::format_number;

/// Write a markdown snapshot of the session into `debug/`.
pub fn write_debug_bundle(session: &Session) -> Result<PathBuf, AppError> {
    write_debug_bundle_in(Path::new("debug"), session)
}

pub fn write_debug_bundle_in(dir: &Path, session: &Session) -> Result<PathBuf, AppError> {
    create_dir_all(dir).map_err(|e| AppError::new(4, format!("Failed to create debug dir: {e}")))?;

    let ts = Local::now().format("%Y%m%d_%H%M%S");
    let path = dir.join(format!("bass_debug_gen{}_{ts}.md", session.generation()));

    let body = render_debug_bundle(session)
        .map_err(|e| AppError::new(4, format!("Failed to render debug bundle: {e}")))?;
    std::fs::write(&path, body).map_err(|e| AppError::new(4, format!("Failed to write debug file: {e}")))?;

    Ok(path)
}

fn render_debug_bundle(session: &Session) -> Result<String, std::fmt::Error> {
    let params = session.params();
    let mut out = String::new();

    writeln!(out, "# bass debug bundle")?;
    writeln!(out, "- generated: {}", Local::now().to_rfc3339())?;
    writeln!(out, "- generation: {}", session.generation())?;
    writeln!(
        out,
        "- params: p={} q={} m={} periods={}",
        params.p, params.q, params.m, params.periods
    )?;
    match session.last_error() {
        Some(err) => writeln!(out, "- last_error: {err}")?,
        None => writeln!(out, "- last_error: none")?,
    }

    if let Some(quality) = session.fit_quality() {
        writeln!(
            out,
            "- quality: sse={:.3} rmse={:.3} rmse_cumulative={:.3} mape={}",
            quality.sse,
            quality.rmse,
            quality.rmse_cumulative,
            quality.mape.map(|v| format!("{v:.3}%")).unwrap_or_else(|| "-".to_string())
        )?;
    }

    writeln!(out, "\n## Points")?;
    writeln!(out, "| year | sales | predictedSales | cumulative | predictedCumulative |")?;
    writeln!(out, "| - | - | - | - | - |")?;
    for p in session.points() {
        writeln!(
            out,
            "| {} | {} | {:.3} | {} | {:.3} |",
            p.year(),
            p.observation.sales,
            p.predicted_sales,
            p.observation.cumulative,
            p.predicted_cumulative
        )?;
    }

    match session.forecast() {
        Ok(rows) if !rows.is_empty() => {
            writeln!(out, "\n## Forecast")?;
            writeln!(out, "| year | predictedSales | predictedCumulative |")?;
            writeln!(out, "| - | - | - |")?;
            for row in rows {
                writeln!(
                    out,
                    "| {} | {} | {} |",
                    row.year,
                    format_number(row.predicted_sales),
                    format_number(row.predicted_cumulative)
                )?;
            }
        }
        Ok(_) => {}
        Err(err) => writeln!(out, "\n_forecast unavailable: {err}_")?,
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::historical_series;
    use crate::domain::{ParamField, ParameterSet};

    #[test]
    fn bundle_records_rejected_update() {
        let mut session = Session::new(ParameterSet::default(), historical_series()).unwrap();
        let _ = session.update(ParamField::P, 0.0);

        let body = render_debug_bundle(&session).unwrap();
        assert!(body.contains("- generation: 1"));
        assert!(body.contains("last_error: p = 0 violates"));
        assert!(body.contains("| 1990 | 401700 |"));
        assert!(body.contains("_forecast unavailable"));
    }

    #[test]
    fn bundle_is_written_to_the_given_directory() {
        let session = Session::new(ParameterSet::default(), historical_series()).unwrap();
        let dir = std::env::temp_dir().join(format!("bass_debug_{}", std::process::id()));
        let path = write_debug_bundle_in(&dir, &session).unwrap();
        assert!(path.starts_with(&dir));
        assert!(path.exists());
        let _ = std::fs::remove_dir_all(&dir);
    }
}
