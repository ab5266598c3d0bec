//! CLI error type.

use mapbridge::app::AppError;
use mapbridge::assets::AssetError;
use mapbridge::config::ConfigError;
use mapbridge::coord::CoordError;
use mapbridge::launcher::LaunchError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}")]
    Config(String),

    #[error(transparent)]
    ConfigFile(#[from] ConfigError),

    #[error(transparent)]
    App(#[from] AppError),

    #[error("Invalid coordinates: {0}")]
    Coord(#[from] CoordError),

    #[error(transparent)]
    Launch(#[from] LaunchError),

    #[error("Failed to copy maps: {0}")]
    Assets(#[from] AssetError),

    #[error("Failed to write output: {0}")]
    Output(#[from] serde_json::Error),
}
