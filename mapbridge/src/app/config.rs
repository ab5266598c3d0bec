//! Application configuration for `MapBridgeApp`.
//!
//! `AppConfig` is the translated form of the INI [`ConfigFile`]: everything
//! the bootstrap needs, grouped per component.

use std::path::Path;

use serde::Serialize;

use super::error::AppError;
use crate::config::{ConfigFile, MapsSection};
use crate::logging::{init_logging, LoggingConfig, LoggingGuard};

/// Build identity of the hosting application.
///
/// Read by the platform adapter in place of generated build constants.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BuildInfo {
    /// Distribution flavor, e.g. `web` or `google`.
    pub flavor: String,
    pub application_id: String,
    pub version_code: u32,
    pub version_name: String,
}

/// Session registry behaviour.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionConfig {
    /// Clear the registry when the map screen reports close.
    pub clear_on_close: bool,
}

/// Application configuration combining all component configs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppConfig {
    pub build: BuildInfo,
    pub session: SessionConfig,
    pub logging: LoggingConfig,
    pub maps: MapsSection,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_config_file(&ConfigFile::default())
    }
}

impl AppConfig {
    /// Create application config from the configuration file.
    pub fn from_config_file(config: &ConfigFile) -> Self {
        Self {
            build: BuildInfo {
                flavor: config.app.flavor.clone(),
                application_id: config.app.application_id.clone(),
                version_code: config.app.version_code,
                version_name: config.app.version_name.clone(),
            },
            session: SessionConfig {
                clear_on_close: config.session.clear_on_close,
            },
            logging: LoggingConfig::from(&config.logging),
            maps: config.maps.clone(),
        }
    }

    /// Load from `path`, or from the default location when `None`.
    pub fn load(path: Option<&Path>) -> Result<Self, AppError> {
        let file = match path {
            Some(path) => ConfigFile::load(path)?,
            None => ConfigFile::load_default()?,
        };
        Ok(Self::from_config_file(&file))
    }

    /// Enable or disable clearing the registry on close.
    pub fn with_clear_on_close(mut self, enabled: bool) -> Self {
        self.session.clear_on_close = enabled;
        self
    }

    /// Install the global tracing subscriber described by `logging`.
    pub fn init_logging(&self) -> Result<LoggingGuard, AppError> {
        Ok(init_logging(&self.logging)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_matches_default_file() {
        let config = AppConfig::default();
        assert_eq!(config.build.flavor, "web");
        assert_eq!(config.build.version_code, 1);
        assert!(!config.session.clear_on_close);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_from_config_file() {
        let file = ConfigFile::from_ini_str(
            "[app]\nflavor = google\nversion_code = 7\n[session]\nclear_on_close = true\n[logging]\nlevel = warn\n",
        )
        .unwrap();

        let config = AppConfig::from_config_file(&file);

        assert_eq!(config.build.flavor, "google");
        assert_eq!(config.build.version_code, 7);
        assert!(config.session.clear_on_close);
        assert_eq!(config.logging.level, "warn");
        assert_eq!(config.maps, file.maps);
    }

    #[test]
    fn test_load_explicit_path() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[app]\napplication_id = app.test").unwrap();

        let config = AppConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.build.application_id, "app.test");
    }

    #[test]
    fn test_load_invalid_file_is_config_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[app]\nversion_code = -1").unwrap();

        let err = AppConfig::load(Some(file.path())).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn test_with_clear_on_close() {
        let config = AppConfig::default().with_clear_on_close(true);
        assert!(config.session.clear_on_close);
    }

    #[test]
    fn test_build_info_json() {
        let json = serde_json::to_value(&AppConfig::default().build).unwrap();
        assert_eq!(json["flavor"], "web");
        assert_eq!(json["application_id"], "app.mapbridge");
    }
}
