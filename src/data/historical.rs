//! Compiled-in historical adoption series (1990-2000).

use crate::domain::ObservationPoint;
use crate::error::ModelError;

const fn obs(year: i32, sales: u64, cumulative: u64) -> ObservationPoint {
    ObservationPoint {
        year,
        sales,
        cumulative,
    }
}

/// Annual unit sales with their running totals.
pub const HISTORICAL_SERIES: [ObservationPoint; 11] = [
    obs(1990, 401_700, 401_700),
    obs(1991, 701_434, 1_103_134),
    obs(1992, 1_219_161, 2_322_295),
    obs(1993, 2_191_594, 4_513_889),
    obs(1994, 3_757_772, 8_271_661),
    obs(1995, 5_924_702, 14_196_363),
    obs(1996, 9_413_320, 23_609_683),
    obs(1997, 13_551_200, 37_160_883),
    obs(1998, 18_158_887, 55_319_770),
    obs(1999, 19_464_483, 74_784_253),
    obs(2000, 15_310_223, 90_094_476),
];

/// The fixed historical series as a slice.
pub fn historical_series() -> &'static [ObservationPoint] {
    &HISTORICAL_SERIES
}

/// Check the structural invariants of an observation series.
///
/// - at least one point
/// - years strictly increasing in contiguous annual steps
/// - `cumulative[i]` equals the running sum of `sales[0..=i]`
pub fn validate_series(series: &[ObservationPoint]) -> Result<(), ModelError> {
    if series.is_empty() {
        return Err(ModelError::EmptySeries);
    }

    let mut running: u64 = 0;
    for (i, point) in series.iter().enumerate() {
        if i > 0 {
            let prev = series[i - 1].year;
            if i64::from(point.year) - i64::from(prev) != 1 {
                return Err(ModelError::InvalidSeries(format!(
                    "year {} does not follow {prev} in annual steps",
                    point.year
                )));
            }
        }

        running = running.checked_add(point.sales).ok_or_else(|| {
            ModelError::InvalidSeries(format!("cumulative sales overflow at year {}", point.year))
        })?;
        if point.cumulative != running {
            return Err(ModelError::InvalidSeries(format!(
                "cumulative {} at year {} does not match running sales total {running}",
                point.cumulative, point.year
            )));
        }
    }

    Ok(())
}
