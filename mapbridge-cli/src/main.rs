//! MapBridge CLI - Command-line interface
//!
//! Exercises the MapBridge library from a terminal: evaluate the background
//! policy, install bundled maps, inspect the configuration, and simulate a map
//! session against a console surface.

mod commands;
mod error;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use mapbridge::app::AppConfig;

use crate::commands::common::load_config;
use crate::error::CliError;

#[derive(Debug, Parser)]
#[command(name = "mapbridge", version, about = "Map session bridge for courier apps")]
struct Cli {
    /// Configuration file (default: ~/.config/mapbridge/config.ini)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Evaluate the background location policy for a set of signals
    Policy(commands::policy::PolicyArgs),

    /// Copy bundled map files into the maps storage directory
    CopyMaps(commands::copy_maps::CopyMapsArgs),

    /// Show the effective configuration
    Config(commands::config::ConfigArgs),

    /// Launch a simulated map session and replay native signals
    Session(commands::session::SessionArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let file = load_config(cli.config.as_deref())?;
    let config = AppConfig::from_config_file(&file);
    let _guard = config.init_logging()?;

    match cli.command {
        Commands::Policy(args) => commands::policy::run(args),
        Commands::CopyMaps(args) => commands::copy_maps::run(args, &config),
        Commands::Config(args) => commands::config::run(args, &file, cli.config.as_deref()),
        Commands::Session(args) => commands::session::run(args, config),
    }
}
