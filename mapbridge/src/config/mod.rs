//! INI configuration file.
//!
//! Read from `~/.config/mapbridge/config.ini` by default. A missing file
//! yields [`ConfigFile::default`]; every key is optional.
//!
//! ```ini
//! [app]
//! flavor = web
//! application_id = app.mapbridge
//! version_code = 1
//! version_name = 0.1.0
//!
//! [session]
//! clear_on_close = false
//!
//! [logging]
//! level = info
//! directory =
//!
//! [maps]
//! bundled_dir =
//! storage_dir =
//! ```

use std::fmt;
use std::fs;
use std::io;
use std::num::ParseIntError;
use std::path::{Path, PathBuf};

use ini::{Ini, Properties};
use thiserror::Error;
use tracing::level_filters::LevelFilter;

/// Name of the configuration directory under the platform config dir.
pub const CONFIG_DIR_NAME: &str = "mapbridge";

/// File name of the configuration file.
pub const CONFIG_FILE_NAME: &str = "config.ini";

/// Errors produced while loading the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] ini::ParseError),

    #[error("Invalid value '{value}' for [{section}] {key}: {reason}")]
    InvalidValue {
        section: &'static str,
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// `[app]`: build identity reported by the application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppSection {
    pub flavor: String,
    pub application_id: String,
    pub version_code: u32,
    pub version_name: String,
}

impl Default for AppSection {
    fn default() -> Self {
        Self {
            flavor: "web".to_string(),
            application_id: "app.mapbridge".to_string(),
            version_code: 1,
            version_name: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// `[session]`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionSection {
    /// Clear the registry automatically once the map screen reports close.
    pub clear_on_close: bool,
}

/// `[logging]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingSection {
    /// Default filter level, overridden by `RUST_LOG`.
    pub level: String,
    /// Directory for daily log files. `None` disables file logging.
    pub directory: Option<PathBuf>,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            directory: None,
        }
    }
}

/// `[maps]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapsSection {
    /// Directory holding map files shipped with the application.
    pub bundled_dir: Option<PathBuf>,
    /// Directory the map engine reads from.
    pub storage_dir: PathBuf,
}

impl Default for MapsSection {
    fn default() -> Self {
        Self {
            bundled_dir: None,
            storage_dir: default_storage_dir(),
        }
    }
}

/// Parsed configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigFile {
    pub app: AppSection,
    pub session: SessionSection,
    pub logging: LoggingSection,
    pub maps: MapsSection,
}

/// Path of the default configuration file.
pub fn config_file_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_DIR_NAME)
        .join(CONFIG_FILE_NAME)
}

fn default_storage_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_DIR_NAME)
        .join("maps")
}

impl ConfigFile {
    /// Load from `path`, falling back to defaults if the file does not exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "Config file not found, using defaults");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        let config = Self::from_ini_str(&contents)?;
        tracing::debug!(path = %path.display(), "Loaded config file");
        Ok(config)
    }

    /// Load from [`config_file_path`].
    pub fn load_default() -> Result<Self, ConfigError> {
        Self::load(&config_file_path())
    }

    /// Parse INI text. Missing sections and keys keep their defaults.
    pub fn from_ini_str(contents: &str) -> Result<Self, ConfigError> {
        let ini = Ini::load_from_str(contents)?;
        let mut config = Self::default();

        if let Some(section) = ini.section(Some("app")) {
            if let Some(v) = non_empty(section, "flavor") {
                config.app.flavor = v.to_string();
            }
            if let Some(v) = non_empty(section, "application_id") {
                config.app.application_id = v.to_string();
            }
            if let Some(v) = non_empty(section, "version_code") {
                config.app.version_code = v.parse()
                    .map_err(|e: ParseIntError| invalid("app", "version_code", v, e))?;
            }
            if let Some(v) = non_empty(section, "version_name") {
                config.app.version_name = v.to_string();
            }
        }

        if let Some(section) = ini.section(Some("session")) {
            if let Some(v) = non_empty(section, "clear_on_close") {
                config.session.clear_on_close = parse_bool("session", "clear_on_close", v)?;
            }
        }

        if let Some(section) = ini.section(Some("logging")) {
            if let Some(v) = non_empty(section, "level") {
                v.parse::<LevelFilter>()
                    .map_err(|e| invalid("logging", "level", v, e))?;
                config.logging.level = v.to_lowercase();
            }
            config.logging.directory = non_empty(section, "directory").map(expand_tilde);
        }

        if let Some(section) = ini.section(Some("maps")) {
            config.maps.bundled_dir = non_empty(section, "bundled_dir").map(expand_tilde);
            if let Some(v) = non_empty(section, "storage_dir") {
                config.maps.storage_dir = expand_tilde(v);
            }
        }

        Ok(config)
    }

    /// Render the effective configuration as INI.
    pub fn to_ini(&self) -> Ini {
        let mut ini = Ini::new();
        ini.with_section(Some("app"))
            .set("flavor", self.app.flavor.as_str())
            .set("application_id", self.app.application_id.as_str())
            .set("version_code", self.app.version_code.to_string())
            .set("version_name", self.app.version_name.as_str());
        ini.with_section(Some("session"))
            .set("clear_on_close", self.session.clear_on_close.to_string());
        ini.with_section(Some("logging"))
            .set("level", self.logging.level.as_str())
            .set("directory", path_value(self.logging.directory.as_deref()));
        ini.with_section(Some("maps"))
            .set("bundled_dir", path_value(self.maps.bundled_dir.as_deref()))
            .set("storage_dir", path_value(Some(&self.maps.storage_dir)));
        ini
    }
}

fn non_empty<'a>(section: &'a Properties, key: &str) -> Option<&'a str> {
    section.get(key).map(str::trim).filter(|v| !v.is_empty())
}

fn parse_bool(section: &'static str, key: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.to_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        _ => Err(invalid(section, key, value, "expected true or false")),
    }
}

fn invalid(
    section: &'static str,
    key: &'static str,
    value: &str,
    reason: impl fmt::Display,
) -> ConfigError {
    ConfigError::InvalidValue {
        section,
        key,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn expand_tilde(value: &str) -> PathBuf {
    match value.strip_prefix("~/") {
        Some(rest) => dirs::home_dir()
            .map(|home| home.join(rest))
            .unwrap_or_else(|| PathBuf::from(value)),
        None => PathBuf::from(value),
    }
}

fn path_value(path: Option<&Path>) -> String {
    path.map(|p| p.display().to_string()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    #[test]
    fn test_empty_string_gives_defaults() {
        let config = ConfigFile::from_ini_str("").unwrap();
        assert_eq!(config, ConfigFile::default());
        assert!(!config.session.clear_on_close);
        assert_eq!(config.logging.level, "info");
        assert!(config.maps.storage_dir.ends_with("mapbridge/maps"));
    }

    #[test]
    fn test_full_file() {
        let config = ConfigFile::from_ini_str(
            "[app]\n\
             flavor = google\n\
             application_id = app.mapbridge.debug\n\
             version_code = 42\n\
             version_name = 2.1.0\n\
             [session]\n\
             clear_on_close = yes\n\
             [logging]\n\
             level = DEBUG\n\
             directory = /var/log/mapbridge\n\
             [maps]\n\
             bundled_dir = /opt/maps\n\
             storage_dir = /data/maps\n",
        )
        .unwrap();

        assert_eq!(config.app.flavor, "google");
        assert_eq!(config.app.application_id, "app.mapbridge.debug");
        assert_eq!(config.app.version_code, 42);
        assert_eq!(config.app.version_name, "2.1.0");
        assert!(config.session.clear_on_close);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(
            config.logging.directory,
            Some(PathBuf::from("/var/log/mapbridge"))
        );
        assert_eq!(config.maps.bundled_dir, Some(PathBuf::from("/opt/maps")));
        assert_eq!(config.maps.storage_dir, PathBuf::from("/data/maps"));
    }

    #[test]
    fn test_empty_directory_disables_file_logging() {
        let config = ConfigFile::from_ini_str("[logging]\ndirectory =\n").unwrap();
        assert_eq!(config.logging.directory, None);
    }

    #[test]
    fn test_invalid_version_code() {
        let err = ConfigFile::from_ini_str("[app]\nversion_code = seven\n").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue {
                key: "version_code",
                ..
            }
        ));
    }

    #[test]
    fn test_invalid_bool() {
        let err = ConfigFile::from_ini_str("[session]\nclear_on_close = maybe\n").unwrap_err();
        assert!(err.to_string().contains("clear_on_close"));
        assert!(err.to_string().contains("maybe"));
    }

    #[test]
    fn test_invalid_level() {
        let err = ConfigFile::from_ini_str("[logging]\nlevel = loud\n").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue { key: "level", .. }
        ));
    }

    #[test]
    fn test_tilde_expansion() {
        let config = ConfigFile::from_ini_str("[maps]\nstorage_dir = ~/maps\n").unwrap();
        if let Some(home) = dirs::home_dir() {
            assert_eq!(config.maps.storage_dir, home.join("maps"));
        }
    }

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = ConfigFile::load(&dir.path().join("absent.ini")).unwrap();
        assert_eq!(config, ConfigFile::default());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[session]\nclear_on_close = true").unwrap();

        let config = ConfigFile::load(file.path()).unwrap();
        assert!(config.session.clear_on_close);
    }

    #[test]
    fn test_load_directory_is_read_error() {
        let dir = TempDir::new().unwrap();
        let err = ConfigFile::load(dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_to_ini_reparses_to_same_config() {
        let mut config = ConfigFile::default();
        config.session.clear_on_close = true;
        config.maps.bundled_dir = Some(PathBuf::from("/opt/maps"));

        let mut buf = Vec::new();
        config.to_ini().write_to(&mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();

        assert_eq!(ConfigFile::from_ini_str(&text).unwrap(), config);
    }

    #[test]
    fn test_config_file_path_name() {
        let path = config_file_path();
        assert!(path.ends_with("mapbridge/config.ini"));
    }
}
