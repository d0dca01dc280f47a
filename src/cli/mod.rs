//! Command-line parsing for the Bass diffusion model viewer.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the modeling code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::{ChartKind, MAX_PERIODS};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "bass", version, about = "Bass diffusion model viewer")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Evaluate the model against the historical series and print the comparison.
    Eval(EvalArgs),
    /// Print the model-only forecast past the historical series.
    Forecast(ParamArgs),
    /// Plot a previously exported model JSON.
    Plot(PlotArgs),
    /// Launch the interactive TUI.
    ///
    /// Parameters given here only seed the session; they can be tuned live.
    Tui(ParamArgs),
}

/// Model parameters. Unset flags fall back to `BASS_*` environment variables,
/// then to the built-in defaults.
#[derive(Debug, Args, Clone, Default)]
pub struct ParamArgs {
    /// Innovation coefficient p (must be > 0).
    #[arg(short = 'p', long = "innovation", allow_negative_numbers = true)]
    pub p: Option<f64>,

    /// Imitation coefficient q.
    #[arg(short = 'q', long = "imitation", allow_negative_numbers = true)]
    pub q: Option<f64>,

    /// Market potential m (ultimate number of adopters).
    #[arg(short = 'm', long = "market", allow_negative_numbers = true)]
    pub m: Option<f64>,

    /// Forecast horizon in years, counted from the first historical year.
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=i64::from(MAX_PERIODS)))]
    pub periods: Option<u32>,
}

/// Options for `bass eval`.
#[derive(Debug, Args, Clone)]
pub struct EvalArgs {
    #[command(flatten)]
    pub params: ParamArgs,

    /// Which comparison chart to plot.
    #[arg(long, value_enum, default_value_t = ChartKind::Both)]
    pub chart: ChartKind,

    /// Render an ASCII plot in the terminal (enabled by default).
    #[arg(long, default_value_t = true)]
    pub plot: bool,

    /// Disable the terminal plot.
    #[arg(long)]
    pub no_plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 80)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 20)]
    pub height: usize,

    /// Also print forecast rows past the historical series.
    #[arg(long)]
    pub forecast: bool,

    /// Export per-year results to CSV.
    #[arg(long)]
    pub export: Option<PathBuf>,

    /// Export parameters, statistics and points to JSON.
    #[arg(long = "export-json")]
    pub export_json: Option<PathBuf>,
}

/// Options for plotting a saved model.
#[derive(Debug, Args)]
pub struct PlotArgs {
    /// Model JSON file produced by `bass eval --export-json`.
    #[arg(long, value_name = "JSON")]
    pub model: PathBuf,

    /// Which comparison chart to plot.
    #[arg(long, value_enum, default_value_t = ChartKind::Both)]
    pub chart: ChartKind,

    /// Plot width (columns).
    #[arg(long, default_value_t = 80)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 20)]
    pub height: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eval_flags_parse() {
        let cli = Cli::parse_from(["bass", "eval", "-p", "0.01", "--imitation", "0.4", "--periods", "30", "--no-plot"]);
        let Command::Eval(args) = cli.command else {
            panic!("expected eval");
        };
        assert_eq!(args.params.p, Some(0.01));
        assert_eq!(args.params.q, Some(0.4));
        assert_eq!(args.params.m, None);
        assert_eq!(args.params.periods, Some(30));
        assert!(args.no_plot);
        assert_eq!(args.chart, ChartKind::Both);
    }

    #[test]
    fn negative_parameters_reach_the_engine() {
        let cli = Cli::parse_from(["bass", "tui", "-p", "-0.5"]);
        let Command::Tui(args) = cli.command else {
            panic!("expected tui");
        };
        assert_eq!(args.p, Some(-0.5));
    }

    #[test]
    fn periods_flag_is_bounded() {
        assert!(Cli::try_parse_from(["bass", "forecast", "--periods", "4000000000"]).is_err());
        assert!(Cli::try_parse_from(["bass", "forecast", "--periods", "0"]).is_err());

        let cli = Cli::try_parse_from(["bass", "forecast", "--periods", "1000"]).unwrap();
        let Command::Forecast(args) = cli.command else {
            panic!("expected forecast");
        };
        assert_eq!(args.periods, Some(MAX_PERIODS));
    }
}
