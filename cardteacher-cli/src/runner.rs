//! CLI runner for common setup and operations.
//!
//! Encapsulates config loading and logging initialization so command
//! handlers start from a ready environment.

use std::path::Path;
use tracing::info;

use cardteacher::config::ConfigFile;
use cardteacher::logging::{init_logging, LoggingGuard};

use crate::error::CliError;

/// Runner that manages CLI lifecycle and common operations.
pub struct CliRunner {
    /// Logging guard - keeps logging active while runner exists
    #[allow(dead_code)]
    logging_guard: LoggingGuard,
    /// Loaded configuration file
    config: ConfigFile,
}

impl CliRunner {
    /// Create a new CLI runner, loading config and initializing logging.
    ///
    /// # Arguments
    ///
    /// * `config_path` - Config file to use instead of ~/.cardteacher/config.ini
    /// * `verbose` - Enable debug-level logging unless RUST_LOG says otherwise
    pub fn new(config_path: Option<&Path>, verbose: bool) -> Result<Self, CliError> {
        let config = load_config(config_path)?;

        let logging_guard = init_logging(&config.logging.file, verbose)
            .map_err(|e| CliError::LoggingInit(e.to_string()))?;

        Ok(Self {
            logging_guard,
            config,
        })
    }

    /// Get the loaded configuration.
    pub fn config(&self) -> &ConfigFile {
        &self.config
    }

    /// Log startup information for a command.
    pub fn log_startup(&self, command: &str) {
        info!("cardteacher v{}", cardteacher::VERSION);
        info!(
            log_file = %self.config.logging.file.display(),
            "cardteacher CLI: {} command", command
        );
    }
}

/// Loads the config from `path`, or from the default location.
pub fn load_config(path: Option<&Path>) -> Result<ConfigFile, CliError> {
    match path {
        Some(path) => Ok(ConfigFile::load_from(path)?),
        None => Ok(ConfigFile::load()?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_config_from_explicit_path() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.ini");
        std::fs::write(&path, "[export]\ndeck_name = Vintage\n").unwrap();

        let config = load_config(Some(&path)).unwrap();

        assert_eq!(config.export.deck_name, "Vintage");
    }

    #[test]
    fn test_load_config_invalid_value() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.ini");
        std::fs::write(&path, "[rate_limit]\ncapacity = none\n").unwrap();

        assert!(matches!(
            load_config(Some(&path)),
            Err(CliError::ConfigFile(_))
        ));
    }
}
