//! Export per-year results to CSV.
//!
//! The export is meant to be easy to consume in spreadsheets or downstream scripts.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::domain::ModelPoint;
use crate::error::AppError;

/// Write per-year results to a CSV file.
pub fn write_points_csv(path: &Path, points: &[ModelPoint]) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create export CSV '{}': {e}", path.display())))?;
    let mut writer = BufWriter::new(file);
    write_points(&mut writer, points)?;
    writer
        .flush()
        .map_err(|e| AppError::new(2, format!("Failed to flush export CSV: {e}")))
}

/// Write the CSV header and one row per point to any writer.
pub fn write_points<W: Write>(out: &mut W, points: &[ModelPoint]) -> Result<(), AppError> {
    writeln!(
        out,
        "year,sales,cumulative,predicted_sales,predicted_cumulative,sales_residual"
    )
    .map_err(|e| AppError::new(2, format!("Failed to write export CSV header: {e}")))?;

    for p in points {
        writeln!(
            out,
            "{},{},{},{:.4},{:.4},{:.4}",
            p.year(),
            p.observation.sales,
            p.observation.cumulative,
            p.predicted_sales,
            p.predicted_cumulative,
            p.sales_residual(),
        )
        .map_err(|e| AppError::new(2, format!("Failed to write export CSV row: {e}")))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ObservationPoint;

    #[test]
    fn csv_rows_follow_header() {
        let points = vec![ModelPoint {
            observation: ObservationPoint { year: 1991, sales: 100, cumulative: 150 },
            predicted_sales: 90.5,
            predicted_cumulative: 140.25,
        }];
        let mut buf = Vec::new();
        write_points(&mut buf, &points).unwrap();

        let text = String::from_utf8(buf).unwrap();
        let expected = concat!(
            "year,sales,cumulative,predicted_sales,predicted_cumulative,sales_residual\n",
            "1991,100,150,90.5000,140.2500,9.5000\n",
        );
        assert_eq!(text, expected);
    }
}
