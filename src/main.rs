//! CLI entry point for the route rater tool.
//!
//! Loads a flight routes dataset from a file or URL and reports which
//! airlines cover the most cities, which fly the most direct routes, and
//! which cities are served by the most airlines.

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use route_rater::analyzers::aggregate::analyze_routes;
use route_rater::analyzers::types::RankLimits;
use route_rater::{
    fetch::{BasicClient, load_source},
    output::{append_report, print_json, print_pretty, write_json},
    parser::{ParsedRoutes, parse_routes},
};
use std::ffi::OsStr;
use std::path::Path;
use tracing::{info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

const DEFAULT_SOURCE: &str = "./routes.dat";

#[derive(Parser)]
#[command(name = "route_rater")]
#[command(about = "A tool to rank airlines and airports in a flight routes dataset", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute airline and airport rankings for a routes dataset
    Analyze {
        /// Path or URL of the routes dataset (falls back to $ROUTES_SOURCE)
        #[arg(value_name = "FILE_OR_URL")]
        source: Option<String>,

        /// How to log the report
        #[arg(short, long, value_enum, default_value_t = Format::Text)]
        format: Format,

        /// Write the report as JSON to this file
        #[arg(long)]
        json_out: Option<String>,

        /// Append the ranked rows to this CSV file
        #[arg(long)]
        csv_out: Option<String>,

        /// Number of airlines to keep in the city coverage ranking
        #[arg(long, default_value_t = 3)]
        top_airlines: usize,

        /// Number of airlines to keep in the direct route ranking
        #[arg(long, default_value_t = 3)]
        top_direct: usize,

        /// Number of cities to keep in the airline coverage ranking
        #[arg(long, default_value_t = 10)]
        top_cities: usize,
    },
    /// Parse a routes dataset and report what was kept and skipped
    Inspect {
        /// Path or URL of the routes dataset (falls back to $ROUTES_SOURCE)
        #[arg(value_name = "FILE_OR_URL")]
        source: Option<String>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/route_rater.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("route_rater.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            source,
            format,
            json_out,
            csv_out,
            top_airlines,
            top_direct,
            top_cities,
        } => {
            let parsed = ingest(&resolve_source(source)).await?;

            let limits = RankLimits {
                airlines_by_cities: top_airlines,
                airlines_by_direct_routes: top_direct,
                cities_by_airlines: top_cities,
            };
            let report = analyze_routes(&parsed.routes, limits);

            match format {
                Format::Text => print_pretty(&report),
                Format::Json => print_json(&report)?,
            }

            if let Some(path) = json_out {
                write_json(&path, &report)?;
                info!(path = %path, "JSON report written");
            }
            if let Some(path) = csv_out {
                append_report(&path, &report)?;
                info!(path = %path, "CSV rows appended");
            }
        }
        Commands::Inspect { source } => {
            let parsed = ingest(&resolve_source(source)).await?;

            let direct = parsed.routes.iter().filter(|r| r.is_direct()).count();
            info!(
                lines_read = parsed.lines_read,
                routes = parsed.routes.len(),
                direct_routes = direct,
                malformed_lines = parsed.malformed_lines,
                lossy_lines = parsed.lossy_lines,
                invalid_stops = parsed.invalid_stops,
                "Dataset summary"
            );
        }
    }

    Ok(())
}

/// Picks the dataset location: CLI argument, then `ROUTES_SOURCE`, then the default file.
fn resolve_source(source: Option<String>) -> String {
    source
        .or_else(|| std::env::var("ROUTES_SOURCE").ok())
        .unwrap_or_else(|| DEFAULT_SOURCE.to_string())
}

/// Loads and parses the dataset at `source`.
#[tracing::instrument]
async fn ingest(source: &str) -> Result<ParsedRoutes> {
    let bytes = load_source(&BasicClient::new(), source).await?;
    let parsed = parse_routes(&bytes)?;

    if parsed.skipped_lines() > 0 {
        warn!(
            malformed = parsed.malformed_lines,
            "Skipped lines while parsing routes"
        );
    }
    info!(
        routes = parsed.routes.len(),
        invalid_stops = parsed.invalid_stops,
        "Routes loaded"
    );

    Ok(parsed)
}
