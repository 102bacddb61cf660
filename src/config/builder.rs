//! Configuration builder
//!
//! Merges configuration from files and CLI arguments.

use crate::config::{Config, ConfigFile, TransportKind};
use std::path::PathBuf;

/// Builder for merging configuration sources
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a new builder with default configuration
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    /// Load configuration from a file
    pub fn with_file(mut self, path: Option<&str>) -> Self {
        let loaded = match path {
            Some(path) => ConfigFile::load(path).map(|cfg| Some((PathBuf::from(path), cfg))),
            None => ConfigFile::load_default(),
        };

        match loaded {
            Ok(Some((path, cfg))) => {
                log::info!("Loaded config from {}", path.display());
                self.config = cfg;
            }
            Ok(None) => log::debug!("No config file found, using defaults"),
            Err(e) => log::warn!("Using default configuration: {}", e),
        }

        self
    }

    /// Override with CLI interval
    pub fn with_interval(mut self, interval: Option<u64>) -> Self {
        if let Some(i) = interval {
            self.config.general.interval_seconds = i;
        }
        self
    }

    /// Override with CLI run-immediately flag
    pub fn with_run_immediately(mut self, run_immediately: Option<bool>) -> Self {
        if let Some(r) = run_immediately {
            self.config.general.run_immediately = r;
        }
        self
    }

    /// Override with CLI rules file
    pub fn with_rules_file(mut self, path: Option<String>) -> Self {
        if let Some(p) = path {
            self.config.general.rules_file = Some(p);
        }
        self
    }

    /// Override SMTP credentials (CLI flags or environment)
    pub fn with_smtp_credentials(
        mut self,
        username: Option<String>,
        password: Option<String>,
    ) -> Self {
        if let Some(u) = username {
            self.config.smtp.username = Some(u);
        }
        if let Some(p) = password {
            self.config.smtp.password = Some(p);
        }
        self
    }

    /// Force the terminal transport
    pub fn with_terminal(mut self, terminal: bool) -> Self {
        if terminal {
            self.config.notify.transport = TransportKind::Terminal;
        }
        self
    }

    /// Build the final configuration
    pub fn build(self) -> Config {
        self.config
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let config = ConfigBuilder::new().build();
        assert_eq!(config.general.interval_seconds, 30);
        assert_eq!(config.notify.transport, TransportKind::Smtp);
    }

    #[test]
    fn test_builder_overrides() {
        let config = ConfigBuilder::new()
            .with_interval(Some(10))
            .with_run_immediately(Some(true))
            .with_rules_file(Some("rules.toml".to_string()))
            .with_smtp_credentials(Some("me@x.com".to_string()), Some("pw".to_string()))
            .with_terminal(true)
            .build();

        assert_eq!(config.general.interval_seconds, 10);
        assert!(config.general.run_immediately);
        assert_eq!(config.general.rules_file.as_deref(), Some("rules.toml"));
        assert_eq!(config.smtp.username.as_deref(), Some("me@x.com"));
        assert_eq!(config.smtp.password.as_deref(), Some("pw"));
        assert_eq!(config.notify.transport, TransportKind::Terminal);
    }

    #[test]
    fn test_missing_file_keeps_defaults() {
        let config = ConfigBuilder::new()
            .with_file(Some("/nonexistent/pricealert.toml"))
            .build();
        assert_eq!(config.general.interval_seconds, 30);
    }
}
