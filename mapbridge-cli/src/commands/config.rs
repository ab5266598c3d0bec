//! `config` command: show the effective configuration.

use std::io;
use std::path::Path;

use clap::Args;
use mapbridge::config::{config_file_path, ConfigFile};

use crate::error::CliError;

#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Show the configuration file path only
    #[arg(long)]
    path: bool,
}

pub fn run(args: ConfigArgs, config: &ConfigFile, explicit: Option<&Path>) -> Result<(), CliError> {
    let path = explicit
        .map(Path::to_path_buf)
        .unwrap_or_else(config_file_path);

    if args.path {
        println!("{}", path.display());
        return Ok(());
    }

    if !path.exists() {
        println!("; {} not found, showing defaults", path.display());
    }
    let mut stdout = io::stdout();
    if let Err(e) = config.to_ini().write_to(&mut stdout) {
        let message = format!("Failed to print configuration: {e}");
        return Err(CliError::Config(message));
    }
    Ok(())
}
