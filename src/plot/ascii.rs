//! ASCII/Unicode plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Plot elements:
//! - predicted values: `-` line
//! - actual values: `o`

use crate::domain::{ChartKind, ModelPoint};
use crate::report::format_number;

/// Render actual vs predicted values for one comparison chart.
///
/// `ChartKind::Both` renders the annual sales chart; callers that want both
/// charts render them one after the other.
pub fn render_ascii_plot(points: &[ModelPoint], chart: ChartKind, width: usize, height: usize) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let (actual, predicted, label) = match chart {
        ChartKind::Cumulative => (
            series(points, |p| p.observation.cumulative as f64),
            series(points, |p| p.predicted_cumulative),
            "cumulative sales",
        ),
        ChartKind::Sales | ChartKind::Both => (
            series(points, |p| p.observation.sales as f64),
            series(points, |p| p.predicted_sales),
            "annual sales",
        ),
    };

    let Some((x_min, x_max)) = year_range(points) else {
        return format!("Plot: {label} | no data\n");
    };
    let (y_min, y_max) = y_range(&actual, &predicted).unwrap_or((0.0, 1.0));
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];

    // Draw the predicted line first so actual points can overlay it.
    draw_curve(&mut grid, &predicted, x_min, x_max, y_min, y_max);

    for &(x, y) in &actual {
        if !y.is_finite() {
            continue;
        }
        let col = map_x(x, x_min, x_max, width);
        let row = map_y(y, y_min, y_max, height);
        grid[row][col] = 'o';
    }

    let mut out = String::new();
    out.push_str(&format!(
        "Plot: {label} | year=[{x_min:.0}, {x_max:.0}] | y=[{}, {}]\n",
        format_number(y_min),
        format_number(y_max),
    ));

    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }

    out
}

fn series(points: &[ModelPoint], value: impl Fn(&ModelPoint) -> f64) -> Vec<(f64, f64)> {
    points.iter().map(|p| (f64::from(p.year()), value(p))).collect()
}

fn year_range(points: &[ModelPoint]) -> Option<(f64, f64)> {
    let first = f64::from(points.first()?.year());
    let last = f64::from(points.last()?.year());
    if last > first {
        Some((first, last))
    } else {
        // Single point: widen so it maps to the middle.
        Some((first - 0.5, first + 0.5))
    }
}

fn y_range(actual: &[(f64, f64)], predicted: &[(f64, f64)]) -> Option<(f64, f64)> {
    let mut min_y = f64::INFINITY;
    let mut max_y = f64::NEG_INFINITY;

    for &(_, y) in actual.iter().chain(predicted) {
        if y.is_finite() {
            min_y = min_y.min(y);
            max_y = max_y.max(y);
        }
    }

    if min_y.is_finite() && max_y.is_finite() && max_y > min_y {
        Some((min_y, max_y))
    } else {
        None
    }
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
}

fn map_x(x: f64, x_min: f64, x_max: f64, width: usize) -> usize {
    let width = width.max(2);
    let u = ((x - x_min) / (x_max - x_min)).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

fn draw_curve(grid: &mut [Vec<char>], curve: &[(f64, f64)], x_min: f64, x_max: f64, y_min: f64, y_max: f64) {
    let height = grid.len();
    let width = grid[0].len();

    let mut prev = None;
    for &(x, y) in curve {
        // Non-finite predictions break the line.
        if !y.is_finite() {
            prev = None;
            continue;
        }
        let col = map_x(x, x_min, x_max, width);
        let row = map_y(y, y_min, y_max, height);
        if let Some((c0, r0)) = prev {
            draw_line(grid, c0, r0, col, row, '-');
        } else {
            grid[row][col] = '-';
        }
        prev = Some((col, row));
    }
}

/// Integer line drawing (Bresenham-ish).
fn draw_line(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
    let mut x0 = x0 as isize;
    let mut y0 = y0 as isize;
    let x1 = x1 as isize;
    let y1 = y1 as isize;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if y0 >= 0
            && (y0 as usize) < grid.len()
            && x0 >= 0
            && (x0 as usize) < grid[0].len()
            && grid[y0 as usize][x0 as usize] == ' '
        {
            grid[y0 as usize][x0 as usize] = ch;
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ObservationPoint;

    fn point(year: i32, sales: u64, cumulative: u64, predicted: f64) -> ModelPoint {
        ModelPoint {
            observation: ObservationPoint { year, sales, cumulative },
            predicted_sales: predicted,
            predicted_cumulative: predicted,
        }
    }

    #[test]
    fn plot_golden_snapshot_small() {
        let points = vec![point(2000, 0, 0, 0.0), point(2001, 10, 10, 10.0)];

        let txt = render_ascii_plot(&points, ChartKind::Sales, 10, 5);
        let expected = concat!(
            "Plot: annual sales | year=[2000, 2001] | y=[-1, 11]\n",
            "        -o\n",
            "      --  \n",
            "    --    \n",
            "  --      \n",
            "o-        \n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn non_finite_predictions_are_skipped() {
        let points = vec![point(2000, 5, 5, f64::NAN), point(2001, 10, 15, f64::NAN)];
        let txt = render_ascii_plot(&points, ChartKind::Cumulative, 12, 6);
        let grid: Vec<&str> = txt.lines().skip(1).collect();
        assert_eq!(grid.len(), 6);
        assert!(grid.iter().all(|row| !row.contains('-')));
        assert_eq!(grid.iter().map(|row| row.matches('o').count()).sum::<usize>(), 2);
    }

    #[test]
    fn empty_input_renders_a_header_only() {
        assert_eq!(render_ascii_plot(&[], ChartKind::Sales, 10, 5), "Plot: annual sales | no data\n");
    }
}
