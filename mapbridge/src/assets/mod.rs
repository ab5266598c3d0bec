//! Bundled map installation.
//!
//! Copies map files shipped with the application into the storage directory
//! the map engine reads from, so they need not be downloaded.

use std::ffi::OsStr;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;

/// Extension of map data files.
pub const MAP_FILE_EXTENSION: &str = "mwm";

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("Failed to create maps directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to list bundled maps in {path}: {source}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Per-run counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CopyReport {
    pub copied: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl CopyReport {
    pub fn total(&self) -> usize {
        self.copied + self.skipped + self.failed
    }
}

/// Copy every `*.mwm` file in `source` into `dest`.
///
/// Files already present in `dest` are left untouched. A failure on one file
/// is logged and counted, and the remaining files are still copied.
pub fn copy_bundled_maps(source: &Path, dest: &Path) -> Result<CopyReport, AssetError> {
    fs::create_dir_all(dest).map_err(|e| AssetError::CreateDir {
        path: dest.to_path_buf(),
        source: e,
    })?;

    let entries = fs::read_dir(source).map_err(|e| AssetError::ReadDir {
        path: source.to_path_buf(),
        source: e,
    })?;

    let mut report = CopyReport::default();

    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::error!(
                    dir = %source.display(),
                    error = %e,
                    "Failed to read bundled maps entry"
                );
                report.failed += 1;
                continue;
            }
        };

        let path = entry.path();
        if !is_map_file(&path) {
            continue;
        }
        let Some(name) = path.file_name() else {
            continue;
        };

        let target = dest.join(name);
        if target.exists() {
            tracing::info!(file = %target.display(), "Map file already exists, skipping");
            report.skipped += 1;
            continue;
        }

        match copy_map_file(&path, &target) {
            Ok(bytes) => {
                tracing::info!(file = %target.display(), bytes, "Copied bundled map");
                report.copied += 1;
            }
            Err(e) => {
                tracing::error!(file = %path.display(), error = %e, "Failed to copy bundled map");
                report.failed += 1;
            }
        }
    }

    if report.total() == 0 {
        tracing::info!(dir = %source.display(), "No bundled maps found");
    } else {
        tracing::info!(
            copied = report.copied,
            skipped = report.skipped,
            failed = report.failed,
            "Bundled maps copy complete"
        );
    }

    Ok(report)
}

fn is_map_file(path: &Path) -> bool {
    path.is_file() && path.extension() == Some(OsStr::new(MAP_FILE_EXTENSION))
}

/// Copy one file, removing a partial target on failure so the next run
/// retries it instead of skipping it.
fn copy_map_file(source: &Path, target: &Path) -> io::Result<u64> {
    fs::copy(source, target).inspect_err(|_| {
        let _ = fs::remove_file(target);
    })
}
