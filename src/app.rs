//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - resolves startup parameters (flags, env, defaults)
//! - initializes logging
//! - evaluates the model and prints reports/plots
//! - writes optional exports

use std::fs::File;
use std::path::Path;
use std::sync::Mutex;

use clap::Parser;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::{Command, EvalArgs, ParamArgs, PlotArgs};
use crate::data::historical_series;
use crate::domain::{ChartKind, ModelPoint, RunConfig};
use crate::error::AppError;

pub mod config;
pub mod session;

use session::Session;

/// Default log filter when `RUST_LOG` is unset.
const DEFAULT_LOG_FILTER: &str = "bass_curves=warn";

/// Entry point for the `bass` binary.
pub fn run() -> Result<(), AppError> {
    // We want `bass` and `bass -p 0.01` to behave like `bass tui ...`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of the
    // argv list before parsing.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Eval(args) => {
            init_logging(LogTarget::Stderr);
            handle_eval(args)
        }
        Command::Forecast(args) => {
            init_logging(LogTarget::Stderr);
            handle_forecast(args)
        }
        Command::Plot(args) => {
            init_logging(LogTarget::Stderr);
            handle_plot(args)
        }
        Command::Tui(args) => {
            // Logging to the terminal would corrupt the alternate screen.
            let target = std::env::var_os("BASS_LOG_FILE")
                .map(|path| LogTarget::File(path.into()))
                .unwrap_or(LogTarget::Off);
            init_logging(target);
            let params = config::params_from_env(&args)?;
            crate::tui::run(params)
        }
    }
}

#[derive(Debug)]
enum LogTarget {
    Stderr,
    File(std::path::PathBuf),
    Off,
}

fn init_logging(target: LogTarget) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let result = match target {
        LogTarget::Off => return,
        LogTarget::Stderr => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init(),
        LogTarget::File(path) => {
            // Runs before the TUI takes over the screen, so stderr is still visible.
            let file = match open_log_file(&path) {
                Ok(file) => file,
                Err(err) => {
                    eprintln!("warning: {err}");
                    return;
                }
            };
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_ansi(false)
                        .with_writer(Mutex::new(file)),
                )
                .try_init()
        }
    };

    // A subscriber may already be installed (e.g. in tests); keep it.
    let _ = result;
}

fn open_log_file(path: &Path) -> Result<File, AppError> {
    File::create(path).map_err(|e| {
        AppError::new(
            2,
            format!("cannot create log file '{}' ({e}); logging disabled", path.display()),
        )
    })
}

fn handle_eval(args: EvalArgs) -> Result<(), AppError> {
    let config = run_config_from_args(&args)?;
    let session = Session::new(config.params, historical_series())?;
    let params = session.params();

    let stats = session
        .key_stats()
        .ok_or_else(|| AppError::new(4, "No points evaluated."))?;
    let quality = session
        .fit_quality()
        .ok_or_else(|| AppError::new(4, "No points evaluated."))?;

    println!("{}", crate::report::format_run_summary(&params, &stats, &quality));
    println!("{}", crate::report::format_model_table(session.points()));

    let forecast = if config.forecast || config.export_json.is_some() {
        session.forecast()?
    } else {
        Vec::new()
    };
    if config.forecast {
        println!("{}", crate::report::format_forecast_table(&forecast));
    }

    if config.plot {
        print_plots(session.points(), config.chart, config.plot_width, config.plot_height);
    }

    // Optional exports.
    if let Some(path) = &config.export_csv {
        crate::io::export::write_points_csv(path, session.points())?;
        info!(path = %path.display(), "wrote CSV export");
    }
    if let Some(path) = &config.export_json {
        crate::io::curve::write_model_json(path, &session, &forecast)?;
        info!(path = %path.display(), "wrote JSON export");
    }

    Ok(())
}

fn handle_forecast(args: ParamArgs) -> Result<(), AppError> {
    let params = config::params_from_env(&args)?;
    let session = Session::new(params, historical_series())?;
    let rows = session.forecast()?;
    println!("{}", crate::report::format_forecast_table(&rows));
    Ok(())
}

fn handle_plot(args: PlotArgs) -> Result<(), AppError> {
    let model = crate::io::curve::read_model_json(&args.model)?;
    print_plots(&model.points, args.chart, args.width, args.height);
    Ok(())
}

fn print_plots(points: &[ModelPoint], chart: ChartKind, width: usize, height: usize) {
    match chart {
        ChartKind::Sales | ChartKind::Cumulative => {
            println!("{}", crate::plot::render_ascii_plot(points, chart, width, height));
        }
        ChartKind::Both => {
            for kind in [ChartKind::Sales, ChartKind::Cumulative] {
                println!("{}", crate::plot::render_ascii_plot(points, kind, width, height));
            }
        }
    }
}

pub fn run_config_from_args(args: &EvalArgs) -> Result<RunConfig, AppError> {
    Ok(RunConfig {
        params: config::params_from_env(&args.params)?,
        chart: args.chart,
        plot: args.plot && !args.no_plot,
        plot_width: args.width,
        plot_height: args.height,
        forecast: args.forecast,
        export_csv: args.export.clone(),
        export_json: args.export_json.clone(),
    })
}

/// Rewrite argv so `bass` defaults to `bass tui`.
///
/// Rules:
/// - `bass`                      -> `bass tui`
/// - `bass -p 0.01 ...`          -> `bass tui -p 0.01 ...`
/// - `bass --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "eval" | "forecast" | "plot" | "tui");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    argv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_launches_tui() {
        assert_eq!(rewrite_args(argv(&["bass"])), argv(&["bass", "tui"]));
        assert_eq!(
            rewrite_args(argv(&["bass", "-q", "0.4"])),
            argv(&["bass", "tui", "-q", "0.4"])
        );
    }

    #[test]
    fn unwritable_log_file_is_reported() {
        let path = std::env::temp_dir().join("bass_missing_dir").join("nested").join("bass.log");
        let err = open_log_file(&path).unwrap_err();
        assert!(err.message().contains("bass.log"));
        assert!(err.message().ends_with("logging disabled"));
    }

    #[test]
    fn subcommands_and_help_are_untouched() {
        assert_eq!(rewrite_args(argv(&["bass", "eval"])), argv(&["bass", "eval"]));
        assert_eq!(rewrite_args(argv(&["bass", "--help"])), argv(&["bass", "--help"]));
    }
}
