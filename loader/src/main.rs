//! Fleet Loader CLI - validate and load fleet record files
//!
//! ```bash
//! fleet-loader load fleet.json more.csv -o snapshot.json
//! fleet-loader find ABC1 fleet.json
//! fleet-loader find D1 fleet.json --drone
//! fleet-loader check fleet.jsonl
//! ```

use clap::{Args, Parser, Subcommand};
use fleet_loader::{
    error::FleetResult, load_paths, logs::log_error, FleetError, FleetLoader, InputFormat,
    LoaderConfig,
};
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "fleet-loader")]
#[command(about = "Validate fleet records and load them into cars and drones", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct InputArgs {
    /// Input files (JSON, JSON Lines or CSV)
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Input format: auto, json, jsonl, csv
    #[arg(short, long, default_value = "auto")]
    format: InputFormat,

    /// Data errors echoed to the log per file (overrides FLEET_MAX_LOGGED_ERRORS)
    #[arg(long)]
    max_logged_errors: Option<usize>,
}

#[derive(Subcommand)]
enum Commands {
    /// Load files and output everything that was loaded and rejected
    Load {
        #[command(flatten)]
        input: InputArgs,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Exit with an error if any record was rejected
        #[arg(long)]
        strict: bool,
    },

    /// Load files and print the first vehicle with the given license
    Find {
        /// License to look up (exact match)
        license: String,

        #[command(flatten)]
        input: InputArgs,

        /// Look among drones instead of cars
        #[arg(long)]
        drone: bool,
    },

    /// Load files and print only the data errors
    Check {
        #[command(flatten)]
        input: InputArgs,
    },
}

fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fleet_loader=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Load {
            input,
            output,
            strict,
        } => cmd_load(&input, output.as_deref(), strict),
        Commands::Find {
            license,
            input,
            drone,
        } => cmd_find(&license, &input, drone),
        Commands::Check { input } => cmd_check(&input),
    };

    if let Err(e) = result {
        log_error(e.to_string());
        std::process::exit(1);
    }
}

fn load(input: &InputArgs) -> FleetResult<FleetLoader> {
    let mut config = LoaderConfig::from_env()?;
    if let Some(max) = input.max_logged_errors {
        config.max_logged_errors = max;
    }

    let mut loader = FleetLoader::with_config(config);
    load_paths(&mut loader, &input.files, input.format)?;
    tracing::info!("{}", loader.summary());
    Ok(loader)
}

fn cmd_load(input: &InputArgs, output: Option<&Path>, strict: bool) -> FleetResult<()> {
    let loader = load(input)?;

    let json = serde_json::to_string_pretty(&loader.snapshot())?;
    write_output(&json, output)?;

    if strict && !loader.errors().is_empty() {
        return Err(FleetError::Rejected(loader.errors().len()));
    }
    Ok(())
}

fn cmd_find(license: &str, input: &InputArgs, drone: bool) -> FleetResult<()> {
    let loader = load(input)?;

    let json = if drone {
        loader
            .find_drone_by_identifier(license)
            .map(serde_json::to_string_pretty)
    } else {
        loader
            .find_car_by_identifier(license)
            .map(serde_json::to_string_pretty)
    };

    match json {
        Some(json) => {
            println!("{}", json?);
            Ok(())
        }
        None => Err(FleetError::NotFound(license.to_string())),
    }
}

fn cmd_check(input: &InputArgs) -> FleetResult<()> {
    let loader = load(input)?;

    let json = serde_json::to_string_pretty(loader.errors())?;
    println!("{}", json);

    if loader.errors().is_empty() {
        tracing::info!("All records valid");
        Ok(())
    } else {
        Err(FleetError::Rejected(loader.errors().len()))
    }
}

fn write_output(content: &str, path: Option<&Path>) -> FleetResult<()> {
    match path {
        Some(p) => {
            fs::write(p, content)?;
            tracing::info!("Output written to: {}", p.display());
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
