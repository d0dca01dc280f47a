//! Ratatui-based terminal UI.
//!
//! The TUI is the interactive front-end of a [`Session`]: a settings panel with
//! sliders for `p` and `q` and text inputs for `m` and `periods`, plus the annual
//! and cumulative comparison charts. Every accepted change goes through
//! `Session::update`, so the charts always show the latest valid evaluation.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph},
};
use tracing::info;

use crate::app::session::Session;
use crate::data::historical_series;
use crate::domain::{ChartKind, ForecastPoint, ModelPoint, ParamField, ParameterSet};
use crate::error::AppError;
use crate::report::{format_number, format_percent};

mod plotters_chart;

use plotters_chart::ComparisonChart;

/// Start the TUI.
pub fn run(params: ParameterSet) -> Result<(), AppError> {
    // Build the session before touching the terminal so startup errors print normally.
    let mut app = App::new(params)?;

    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::new(4, format!("Failed to initialize terminal: {e}")))?;

    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::new(4, format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::new(4, format!("Failed to enter alternate screen: {e}")));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

/// Widget limits for one parameter.
#[derive(Debug, Clone, Copy)]
struct Slider {
    min: f64,
    max: f64,
    step: f64,
}

impl Slider {
    fn for_field(field: ParamField) -> Self {
        match field {
            ParamField::P => Slider { min: 0.0, max: 0.1, step: 0.001 },
            ParamField::Q => Slider { min: 0.0, max: 1.0, step: 0.01 },
            ParamField::M => Slider { min: 0.0, max: 1e12, step: 1_000_000.0 },
            ParamField::Periods => Slider { min: 1.0, max: 50.0, step: 1.0 },
        }
    }

    /// Move `delta` steps from `current`, snapping to the step grid.
    fn step(self, current: f64, delta: i32) -> f64 {
        let base = if current.is_finite() { current } else { self.min };
        let steps = (base / self.step).round() + f64::from(delta);
        (steps * self.step).clamp(self.min, self.max)
    }
}

struct App {
    session: Session,
    selected_field: usize,
    editing: bool,
    input: String,
    show_forecast: bool,
    status: String,
}

impl App {
    fn new(params: ParameterSet) -> Result<Self, AppError> {
        let session = Session::new(params, historical_series())?;
        Ok(Self {
            session,
            selected_field: 0,
            editing: false,
            input: String::new(),
            show_forecast: false,
            status: "Ready.".to_string(),
        })
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::new(4, format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::new(4, format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::new(4, format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code) {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn selected(&self) -> ParamField {
        ParamField::ALL[self.selected_field]
    }

    /// Returns `true` when the user asked to quit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        if self.editing {
            self.handle_edit(code);
            return false;
        }

        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Up => {
                self.selected_field = self.selected_field.saturating_sub(1);
            }
            KeyCode::Down => {
                if self.selected_field + 1 < ParamField::ALL.len() {
                    self.selected_field += 1;
                }
            }
            KeyCode::Left => self.adjust_field(-1),
            KeyCode::Right => self.adjust_field(1),
            KeyCode::Enter => {
                let field = self.selected();
                self.editing = true;
                self.input = format_param(field, self.session.params().get(field));
                self.status = format!("Editing {field}. Enter to apply, Esc to cancel.");
            }
            KeyCode::Char('f') => {
                self.show_forecast = !self.show_forecast;
                self.status = if self.show_forecast {
                    format!("Forecast shown ({} years).", self.session.params().periods)
                } else {
                    "Forecast hidden.".to_string()
                };
            }
            KeyCode::Char('r') => self.reset_defaults(),
            KeyCode::Char('d') => match crate::debug::write_debug_bundle(&self.session) {
                Ok(path) => {
                    info!(path = %path.display(), "wrote debug bundle");
                    self.status = format!("Wrote debug bundle: {}", path.display());
                }
                Err(err) => {
                    self.status = format!("Debug write failed: {err}");
                }
            },
            _ => {}
        }

        false
    }

    fn handle_edit(&mut self, code: KeyCode) {
        match code {
            KeyCode::Esc => {
                self.editing = false;
                self.status = "Edit canceled.".to_string();
            }
            KeyCode::Enter => {
                self.editing = false;
                let field = self.selected();
                let raw = self.input.trim().replace(',', "").replace('_', "");
                match raw.parse::<f64>() {
                    Ok(value) if field == ParamField::Periods => {
                        let slider = Slider::for_field(field);
                        self.apply(field, value.trunc().clamp(slider.min, slider.max));
                    }
                    Ok(value) => self.apply(field, value),
                    Err(_) => self.status = format!("Invalid number for {field}: '{}'", self.input.trim()),
                }
            }
            KeyCode::Backspace => {
                self.input.pop();
            }
            KeyCode::Char(c) => {
                if c.is_ascii_digit() || matches!(c, '.' | '-' | 'e' | 'E' | ',' | '_') {
                    self.input.push(c);
                }
            }
            _ => {}
        }
    }

    fn adjust_field(&mut self, delta: i32) {
        let field = self.selected();
        let current = self.session.params().get(field);
        let next = Slider::for_field(field).step(current, delta);
        self.apply(field, next);
    }

    fn reset_defaults(&mut self) {
        let defaults = ParameterSet::default();
        for field in ParamField::ALL {
            self.apply(field, defaults.get(field));
        }
        if self.session.last_error().is_none() {
            self.status = "Reset to defaults.".to_string();
        }
    }

    fn apply(&mut self, field: ParamField, value: f64) {
        self.status = match self.session.update(field, value) {
            Ok(()) => format!("{field} = {}", format_param(field, value)),
            Err(err) => format!("Rejected: {err} (showing last valid curve)"),
        };
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(5), Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_body(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let params = self.session.params();
        let mut lines: Vec<Line> = Vec::new();
        lines.push(Line::from(vec![
            Span::styled("bass", Style::default().fg(Color::Cyan)),
            Span::raw(" | Bass Diffusion Model Analysis"),
        ]));

        if let Some(stats) = self.session.key_stats() {
            lines.push(Line::from(Span::styled(
                format!(
                    "peak: {} ({} units) | total by {}: {} ({} of m) | word-of-mouth: {:.1}% | predicted peak: {}",
                    stats.peak_year,
                    format_number(stats.peak_sales as f64),
                    stats.total_year,
                    format_number(stats.total_adoption as f64),
                    format_percent(stats.market_share),
                    stats.word_of_mouth_pct,
                    stats.predicted_peak_year,
                ),
                Style::default().fg(Color::Gray),
            )));
        }

        if let Some(quality) = self.session.fit_quality() {
            lines.push(Line::from(Span::styled(
                format!(
                    "rmse(sales)={} | rmse(cum)={} | mape={} | p={:.4} q={:.3} m={} | eval #{}",
                    format_number(quality.rmse),
                    format_number(quality.rmse_cumulative),
                    quality
                        .mape
                        .map(|v| format!("{v:.1}%"))
                        .unwrap_or_else(|| "-".to_string()),
                    params.p,
                    params.q,
                    format_number(params.m),
                    self.session.generation(),
                ),
                Style::default().fg(Color::Gray),
            )));
        }

        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(40), Constraint::Min(0)])
            .split(area);

        self.draw_settings(frame, columns[0]);

        let charts = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(columns[1]);

        let forecast = if self.show_forecast {
            self.session.forecast().unwrap_or_default()
        } else {
            Vec::new()
        };
        self.draw_chart(frame, charts[0], ChartKind::Sales, &forecast);
        self.draw_chart(frame, charts[1], ChartKind::Cumulative, &forecast);
    }

    fn draw_chart(&self, frame: &mut ratatui::Frame<'_>, area: Rect, kind: ChartKind, forecast: &[ForecastPoint]) {
        let block = Block::default().title(kind.display_name()).borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        let series = chart_series(self.session.points(), forecast, kind);
        let widget = ComparisonChart {
            actual: &series.actual,
            predicted: &series.predicted,
            forecast: &series.forecast,
            x_bounds: series.x_bounds,
            y_bounds: series.y_bounds,
            x_label: "year",
            y_label: match kind {
                ChartKind::Cumulative => "cumulative".to_string(),
                _ => "units".to_string(),
            },
            fmt_x: fmt_axis_year,
            fmt_y: fmt_axis_compact,
        };

        frame.render_widget(widget, inner);
    }

    fn draw_settings(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let params = self.session.params();

        let items: Vec<ListItem> = ParamField::ALL
            .iter()
            .map(|&field| {
                let value = params.get(field);
                let mut lines = vec![Line::from(Span::styled(
                    field.display_name(),
                    Style::default().fg(Color::Gray),
                ))];
                let shown = format_param(field, value);
                let line = match field {
                    ParamField::P | ParamField::Q => {
                        let slider = Slider::for_field(field);
                        format!("{} {shown}", slider_bar(value, slider.min, slider.max, 20))
                    }
                    ParamField::Periods => format!("{shown} years"),
                    ParamField::M => shown,
                };
                lines.push(Line::from(line));
                ListItem::new(lines)
            })
            .collect();

        let list = List::new(items)
            .block(Block::default().title("Parameters").borders(Borders::ALL))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .highlight_symbol("» ");

        let mut state = ratatui::widgets::ListState::default();
        state.select(Some(self.selected_field));
        frame.render_stateful_widget(list, area, &mut state);

        if self.editing {
            let hint = Paragraph::new(format!("{} = {}_", self.selected(), self.input))
                .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));
            let rect = Rect {
                x: area.x + 2,
                y: area.y + area.height.saturating_sub(2),
                width: area.width.saturating_sub(4),
                height: 1,
            };
            frame.render_widget(hint, rect);
        }
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "↑/↓ select  ←/→ adjust  Enter edit  f forecast  r reset  d debug  q quit";
        let status_style = if self.session.last_error().is_some() {
            Style::default().fg(Color::Red)
        } else {
            Style::default().fg(Color::Yellow)
        };
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, status_style),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

/// Series and bounds for one comparison chart.
#[derive(Debug, Clone, PartialEq)]
struct ChartSeries {
    actual: Vec<(f64, f64)>,
    predicted: Vec<(f64, f64)>,
    forecast: Vec<(f64, f64)>,
    x_bounds: [f64; 2],
    y_bounds: [f64; 2],
}

/// Build chart series for Plotters. Non-finite values are dropped.
fn chart_series(points: &[ModelPoint], forecast: &[ForecastPoint], kind: ChartKind) -> ChartSeries {
    let cumulative = kind == ChartKind::Cumulative;

    let finite = |(x, y): (f64, f64)| y.is_finite().then_some((x, y));

    let actual: Vec<(f64, f64)> = points
        .iter()
        .map(|p| {
            let y = if cumulative { p.observation.cumulative } else { p.observation.sales };
            (f64::from(p.year()), y as f64)
        })
        .collect();
    let predicted: Vec<(f64, f64)> = points
        .iter()
        .filter_map(|p| {
            let y = if cumulative { p.predicted_cumulative } else { p.predicted_sales };
            finite((f64::from(p.year()), y))
        })
        .collect();

    // Join the forecast to the last historical prediction so the line is continuous.
    let mut forecast_line: Vec<(f64, f64)> = Vec::new();
    if !forecast.is_empty() {
        if let Some(&last) = predicted.last() {
            forecast_line.push(last);
        }
        forecast_line.extend(forecast.iter().filter_map(|row| {
            let y = if cumulative { row.predicted_cumulative } else { row.predicted_sales };
            finite((f64::from(row.year), y))
        }));
    }

    let (mut x0, mut x1) = (f64::INFINITY, f64::NEG_INFINITY);
    let (mut y0, mut y1) = (f64::INFINITY, f64::NEG_INFINITY);
    for &(x, y) in actual.iter().chain(&predicted).chain(&forecast_line) {
        x0 = x0.min(x);
        x1 = x1.max(x);
        y0 = y0.min(y);
        y1 = y1.max(y);
    }

    if !x0.is_finite() || !x1.is_finite() || x1 <= x0 {
        x0 = 1990.0;
        x1 = 2000.0;
    }
    if !y0.is_finite() || !y1.is_finite() || y1 <= y0 {
        y0 = 0.0;
        y1 = 1.0;
    }

    let pad = ((y1 - y0).abs() * 0.05).max(1e-12);

    ChartSeries {
        actual,
        predicted,
        forecast: forecast_line,
        x_bounds: [x0, x1],
        y_bounds: [y0 - pad, y1 + pad],
    }
}

/// Display a parameter value the way the settings panel shows it.
fn format_param(field: ParamField, value: f64) -> String {
    match field {
        ParamField::P => format!("{value:.4}"),
        ParamField::Q => format!("{value:.3}"),
        ParamField::M => format_number(value),
        ParamField::Periods => format!("{value:.0}"),
    }
}

fn slider_bar(value: f64, min: f64, max: f64, width: usize) -> String {
    let u = if value.is_finite() && max > min {
        ((value - min) / (max - min)).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let filled = (u * width as f64).round() as usize;
    format!("[{}{}]", "█".repeat(filled), "·".repeat(width - filled))
}

fn fmt_axis_year(v: f64) -> String {
    format!("{v:.0}")
}

fn fmt_axis_compact(v: f64) -> String {
    let a = v.abs();
    if a >= 1e9 {
        format!("{:.1}B", v / 1e9)
    } else if a >= 1e6 {
        format!("{:.1}M", v / 1e6)
    } else if a >= 1e3 {
        format!("{:.0}K", v / 1e3)
    } else {
        format!("{v:.0}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::evaluate;

    #[test]
    fn slider_steps_snap_and_clamp() {
        let p = Slider::for_field(ParamField::P);
        assert!((p.step(0.0039, 1) - 0.005).abs() < 1e-12);
        assert_eq!(p.step(0.0, -1), 0.0);
        assert!((p.step(0.1, 1) - 0.1).abs() < 1e-12);

        let periods = Slider::for_field(ParamField::Periods);
        assert_eq!(periods.step(50.0, 1), 50.0);
        assert_eq!(periods.step(1.0, -1), 1.0);
        assert_eq!(periods.step(f64::NAN, 1), 2.0);
    }

    #[test]
    fn slider_to_zero_innovation_is_rejected_but_kept_visible() {
        let mut app = App::new(ParameterSet { p: 0.001, ..ParameterSet::default() }).unwrap();
        let before = app.session.points().to_vec();

        app.adjust_field(-1);
        assert_eq!(app.session.params().p, 0.0);
        assert!(app.status.starts_with("Rejected"));
        assert_eq!(app.session.points(), before.as_slice());

        app.adjust_field(1);
        assert!(app.session.last_error().is_none());
    }

    #[test]
    fn text_edit_applies_parsed_value() {
        let mut app = App::new(ParameterSet::default()).unwrap();
        app.selected_field = 2;
        app.handle_key(KeyCode::Enter);
        assert!(app.editing);

        app.input.clear();
        for c in "90,000,000".chars() {
            app.handle_key(KeyCode::Char(c));
        }
        app.handle_key(KeyCode::Enter);
        assert!(!app.editing);
        assert_eq!(app.session.params().m, 90_000_000.0);
    }

    #[test]
    fn invalid_text_edit_leaves_parameters_alone() {
        let mut app = App::new(ParameterSet::default()).unwrap();
        app.handle_key(KeyCode::Enter);
        app.input = "1e".to_string();
        app.handle_key(KeyCode::Enter);
        assert_eq!(app.session.params(), ParameterSet::default());
        assert!(app.status.starts_with("Invalid number"));
    }

    #[test]
    fn reset_restores_defaults() {
        let mut app = App::new(ParameterSet { q: 0.2, periods: 5, ..ParameterSet::default() }).unwrap();
        app.handle_key(KeyCode::Char('r'));
        assert_eq!(app.session.params(), ParameterSet::default());
        assert_eq!(app.status, "Reset to defaults.");
    }

    #[test]
    fn chart_series_spans_forecast_years() {
        let params = ParameterSet::default();
        let points = evaluate(&params, historical_series()).unwrap();
        let forecast = crate::models::extension(&params, historical_series()).unwrap();

        let series = chart_series(&points, &forecast, ChartKind::Cumulative);
        assert_eq!(series.actual.len(), 11);
        assert_eq!(series.predicted.len(), 11);
        assert_eq!(series.forecast.len(), 14);
        assert_eq!(series.x_bounds, [1990.0, 2013.0]);
        assert!(series.y_bounds[0] < 0.0);

        let without = chart_series(&points, &[], ChartKind::Sales);
        assert!(without.forecast.is_empty());
        assert_eq!(without.x_bounds, [1990.0, 2000.0]);
    }

    #[test]
    fn periods_edit_is_held_to_the_slider_range() {
        let mut app = App::new(ParameterSet::default()).unwrap();
        app.selected_field = 3;
        app.handle_key(KeyCode::Enter);
        app.input = "4000000000".to_string();
        app.handle_key(KeyCode::Enter);
        assert_eq!(app.session.params().periods, 50);
        assert_eq!(app.session.forecast().unwrap().len(), 39);

        app.handle_key(KeyCode::Enter);
        app.input = "0".to_string();
        app.handle_key(KeyCode::Enter);
        assert_eq!(app.session.params().periods, 1);
    }

    #[test]
    fn forecast_toggle_reports_the_horizon() {
        let mut app = App::new(ParameterSet::default()).unwrap();
        assert!(!app.show_forecast);

        app.handle_key(KeyCode::Char('f'));
        assert!(app.show_forecast);
        assert_eq!(app.status, "Forecast shown (24 years).");

        app.handle_key(KeyCode::Char('f'));
        assert!(!app.show_forecast);
        assert_eq!(app.status, "Forecast hidden.");
    }

    #[test]
    fn compact_axis_labels() {
        assert_eq!(fmt_axis_compact(19_464_483.0), "19.5M");
        assert_eq!(fmt_axis_compact(2_600.0), "3K");
        assert_eq!(fmt_axis_compact(1.2e9), "1.2B");
        assert_eq!(fmt_axis_compact(12.0), "12");
    }
}
