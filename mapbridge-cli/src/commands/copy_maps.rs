//! `copy-maps` command: install bundled map files.

use std::path::PathBuf;

use clap::Args;
use mapbridge::app::AppConfig;
use mapbridge::assets::copy_bundled_maps;

use crate::error::CliError;

#[derive(Debug, Args)]
pub struct CopyMapsArgs {
    /// Directory with bundled .mwm files (default: [maps] bundled_dir)
    #[arg(long, value_name = "DIR")]
    from: Option<PathBuf>,

    /// Destination directory (default: [maps] storage_dir)
    #[arg(long, value_name = "DIR")]
    to: Option<PathBuf>,
}

pub fn run(args: CopyMapsArgs, config: &AppConfig) -> Result<(), CliError> {
    let source = args
        .from
        .or_else(|| config.maps.bundled_dir.clone())
        .ok_or_else(|| {
            CliError::Config(
                "No bundled map directory. Set bundled_dir under [maps] in config.ini or use --from"
                    .to_string(),
            )
        })?;
    let dest = args.to.unwrap_or_else(|| config.maps.storage_dir.clone());

    let report = copy_bundled_maps(&source, &dest)?;

    println!(
        "Copied {}, skipped {}, failed {} ({} -> {})",
        report.copied,
        report.skipped,
        report.failed,
        source.display(),
        dest.display()
    );
    Ok(())
}
