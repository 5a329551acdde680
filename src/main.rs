use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration as StdDuration;

use pass_o_mat::config::{Config, PredictConfig};
use pass_o_mat::predict::{
    GroundStation, OrbitalElements, PredictError, Sgp4Propagator, TimeWindow,
};
use pass_o_mat::web::{run_server, AppState};

#[derive(Parser)]
#[command(name = "pass-o-mat")]
#[command(about = "Satellite pass prediction")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Predict passes of one object over a ground location
    Predict(PredictArgs),
    /// Serve the pass prediction HTTP API
    Serve {
        #[arg(long)]
        config: PathBuf,
    },
}

#[derive(clap::Args)]
struct PredictArgs {
    /// TLE file (two or three lines per object)
    #[arg(long)]
    tle: PathBuf,
    /// Pick this catalog number from a multi-object TLE file
    #[arg(long)]
    norad_id: Option<u32>,
    /// Observer latitude in degrees (default: configured station)
    #[arg(long, allow_hyphen_values = true)]
    lat: Option<f64>,
    /// Observer longitude in degrees (default: configured station)
    #[arg(long, allow_hyphen_values = true)]
    lon: Option<f64>,
    /// Observer altitude in km
    #[arg(long)]
    alt_km: Option<f64>,
    /// Search start, RFC3339 (default: now)
    #[arg(long, value_parser = parse_rfc3339)]
    start: Option<DateTime<Utc>>,
    /// Search length in days
    #[arg(long)]
    days: Option<f64>,
    /// Sampling step, e.g. "20s"
    #[arg(long, value_parser = humantime::parse_duration)]
    step: Option<StdDuration>,
    /// Minimum elevation in degrees
    #[arg(long, allow_hyphen_values = true)]
    min_elevation: Option<f64>,
    /// Maximum number of passes to report
    #[arg(long)]
    max_passes: Option<usize>,
    /// Configuration file providing station and search defaults
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Predict(args) => predict(args),
        Commands::Serve { config } => serve(&config),
    }
}

fn predict(args: PredictArgs) -> ExitCode {
    let config = match args.config.as_ref().map(Config::from_file).transpose() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut defaults = config
        .as_ref()
        .map(|c| c.predict.clone())
        .unwrap_or_default();
    if let Some(step) = args.step {
        defaults.step = step;
    }
    if let Some(min_elevation) = args.min_elevation {
        defaults.min_elevation_deg = min_elevation;
    }
    if let Some(max_passes) = args.max_passes {
        defaults.max_passes = max_passes;
    }
    if let Some(days) = args.days {
        defaults.days = days;
    }

    let station = match (args.lat, args.lon, config.as_ref()) {
        (Some(lat), Some(lon), _) => GroundStation::new(lat, lon, args.alt_km.unwrap_or(0.0)),
        (None, None, Some(config)) => match config.station.ground_station() {
            Ok(mut station) => {
                if let Some(alt_km) = args.alt_km {
                    station.altitude_km = alt_km;
                }
                station
            }
            Err(e) => {
                eprintln!("Config error: {}", e);
                return ExitCode::FAILURE;
            }
        },
        _ => {
            eprintln!("Observer location required: pass --lat and --lon, or --config");
            return ExitCode::FAILURE;
        }
    };

    let elements = match OrbitalElements::from_file(&args.tle, args.norad_id) {
        Ok(e) => e,
        Err(e) => {
            eprintln!("Error [{}]: {}", e.code(), e);
            return ExitCode::FAILURE;
        }
    };

    let start = args.start.unwrap_or_else(Utc::now);
    match run_prediction(&elements, &station, start, &defaults) {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error [{}]: {}", e.code(), e);
            ExitCode::FAILURE
        }
    }
}

fn run_prediction(
    elements: &OrbitalElements,
    station: &GroundStation,
    start: DateTime<Utc>,
    settings: &PredictConfig,
) -> Result<String, PredictError> {
    settings
        .validate()
        .map_err(|e| PredictError::InvalidParameters(e.to_string()))?;
    let propagator = Sgp4Propagator::initialize(elements)?;
    let window = TimeWindow::from_days(start, settings.days, settings.step())?;
    let report = settings.finder().find(&propagator, station, &window)?;

    if let Some(name) = propagator.object_name().or(elements.name.as_deref()) {
        log::info!("{}: {} passes", name, report.pass_count);
    }

    serde_json::to_string_pretty(&report)
        .map_err(|e| PredictError::InvalidParameters(format!("cannot encode report: {}", e)))
}

fn serve(path: &Path) -> ExitCode {
    let config = match Config::from_file(path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let state = match AppState::new(config) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Config error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Failed to start runtime: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(run_server(state)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Server error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn parse_rfc3339(s: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(s).map(|dt| dt.with_timezone(&Utc))
}
