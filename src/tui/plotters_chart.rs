//! Plotters-powered comparison chart widget for Ratatui.
//!
//! We render Plotters output into the Ratatui buffer using `plotters-ratatui-backend`.

use plotters::prelude::*;
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

/// Actual series color (`#8884d8`).
const ACTUAL_COLOR: RGBColor = RGBColor(136, 132, 216);
/// Predicted series color (`#82ca9d`).
const PREDICTED_COLOR: RGBColor = RGBColor(130, 202, 157);
const FORECAST_COLOR: RGBColor = RGBColor(255, 215, 0);

/// A render-only chart description: actual vs predicted over years.
///
/// All series and bounds are computed outside the render call.
pub struct ComparisonChart<'a> {
    /// Observed values (line + dots).
    pub actual: &'a [(f64, f64)],
    /// Model values over the historical years.
    pub predicted: &'a [(f64, f64)],
    /// Model values past the historical series (may be empty).
    pub forecast: &'a [(f64, f64)],
    pub x_bounds: [f64; 2],
    pub y_bounds: [f64; 2],
    pub x_label: &'a str,
    pub y_label: String,
    pub fmt_x: fn(f64) -> String,
    pub fmt_y: fn(f64) -> String,
}

impl<'a> Widget for ComparisonChart<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Plotters may fail to build a chart in a tiny area; show a hint instead.
        if area.width < 20 || area.height < 8 {
            buf.set_string(
                area.x,
                area.y,
                "Chart area too small (resize terminal).",
                Style::default().fg(Color::Yellow),
            );
            return;
        }

        let x0 = self.x_bounds[0];
        let x1 = self.x_bounds[1];
        let y0 = self.y_bounds[0];
        let y1 = self.y_bounds[1];

        if !(x0.is_finite() && x1.is_finite() && y0.is_finite() && y1.is_finite()) || x1 <= x0 || y1 <= y0 {
            return;
        }

        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root)
                .margin(1)
                // Terminal cells are low-res, so keep label areas compact.
                .set_label_area_size(LabelAreaPosition::Left, 7)
                .set_label_area_size(LabelAreaPosition::Bottom, 3)
                .build_cartesian_2d(x0..x1, y0..y1)?;

            chart
                .configure_mesh()
                .disable_x_mesh()
                .disable_y_mesh()
                .x_desc(self.x_label)
                .y_desc(&self.y_label)
                .x_labels(6)
                .y_labels(5)
                .x_label_formatter(&|v| (self.fmt_x)(*v))
                .y_label_formatter(&|v| (self.fmt_y)(*v))
                .label_style(("sans-serif", 10).into_font().color(&WHITE))
                .axis_style(&WHITE)
                .bold_line_style(&WHITE)
                .draw()?;

            // 1) Forecast first so the historical predicted line stays on top.
            if !self.forecast.is_empty() {
                chart.draw_series(LineSeries::new(self.forecast.iter().copied(), &FORECAST_COLOR))?;
            }

            // 2) Predicted line.
            chart.draw_series(LineSeries::new(self.predicted.iter().copied(), &PREDICTED_COLOR))?;

            // 3) Actual line and dots.
            //
            // `Circle` markers are avoided: the backend maps circle radii to
            // canvas units incorrectly and draws huge circles. A `Pixel` gives a
            // clean dot.
            chart.draw_series(LineSeries::new(self.actual.iter().copied(), &ACTUAL_COLOR))?;
            chart.draw_series(self.actual.iter().map(|&(x, y)| Pixel::new((x, y), WHITE)))?;

            Ok(())
        });

        widget.render(area, buf);
    }
}
