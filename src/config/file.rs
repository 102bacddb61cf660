//! Configuration file loading
//!
//! Only the first existing default location is used; a broken file there is
//! reported rather than skipped in favour of a later one.

use crate::config::Config;
use crate::error::ConfigError;

use serde::de::DeserializeOwned;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Configuration file handler
pub struct ConfigFile;

impl ConfigFile {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
        Self::parse(path.as_ref())
    }

    /// Load the first configuration file found in the default locations
    ///
    /// Returns `Ok(None)` when none exists.
    pub fn load_default() -> Result<Option<(PathBuf, Config)>, ConfigError> {
        match preferred_existing(&Self::default_paths()) {
            Some(path) => {
                let config = Self::load(&path)?;
                Ok(Some((path, config)))
            }
            None => Ok(None),
        }
    }

    /// Get default configuration file paths, highest priority last
    pub fn default_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("/etc/pricealert/config.toml")];

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("pricealert").join("config.toml"));
        }

        paths.push(PathBuf::from("pricealert.toml"));
        paths.push(PathBuf::from(".pricealert.toml"));

        paths
    }

    /// Read and deserialize a TOML file, naming the file in any error
    pub(crate) fn parse<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
        let display = path.display().to_string();

        let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => ConfigError::FileNotFound(display.clone()),
            _ => ConfigError::Read {
                path: display.clone(),
                source: e,
            },
        })?;

        toml::from_str(&content).map_err(|source| ConfigError::Toml {
            path: display,
            source,
        })
    }
}

/// Most specific existing path; later entries win
fn preferred_existing(paths: &[PathBuf]) -> Option<PathBuf> {
    paths.iter().rev().find(|p| p.is_file()).cloned()
}
