//! Seed rules file
//!
//! TOML list of rules registered when the watcher starts:
//!
//! ```toml
//! [[rules]]
//! symbol = "bitcoin"
//! upper_bound = 70000
//! lower_bound = 60000
//! recipient = "me@example.com"
//! ```

use super::registration::{RegistrationRequest, RegistrationResponse};
use super::store::RuleStore;
use crate::error::{ConfigError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Rules file structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RulesFile {
    /// Rule entries, in registration order
    #[serde(default)]
    pub rules: Vec<RegistrationRequest>,
}

/// Result of loading a rules file into a store
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeedSummary {
    /// Entries registered
    pub accepted: usize,
    /// Rejected entries as (index, reason)
    pub rejected: Vec<(usize, String)>,
}

impl RulesFile {
    /// Load rules from file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(crate::config::ConfigFile::parse(path.as_ref())?)
    }

    /// Load rules from file, or an empty set if the file does not exist
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            log::info!(
                "No rules file at {}, starting with no rules",
                path.as_ref().display()
            );
            Ok(Self::default())
        }
    }

    /// Save rules to file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let contents = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::ParseError(format!("Failed to serialize: {}", e)))?;

        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path.as_ref(), contents)?;

        Ok(())
    }

    /// Get default rules file path
    pub fn default_path() -> PathBuf {
        if let Some(config_dir) = dirs::config_dir() {
            config_dir.join("pricealert").join("rules.toml")
        } else {
            PathBuf::from("rules.toml")
        }
    }

    /// Register every entry through the normal validation path
    pub fn seed(&self, store: &RuleStore) -> SeedSummary {
        let mut summary = SeedSummary::default();

        for (index, request) in self.rules.iter().enumerate() {
            match request.register(store) {
                RegistrationResponse::Success => summary.accepted += 1,
                RegistrationResponse::Error { message } => {
                    summary.rejected.push((index, message));
                }
            }
        }

        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const SAMPLE: &str = r#"
[[rules]]
symbol = "bitcoin"
upper_bound = 70000
lower_bound = 60000
recipient = "a@x.com"

[[rules]]
crypto_symbol = "Ethereum"
upper_bound = "4000"
lower_bound = "3000.5"
email = "b@x.com"

[[rules]]
symbol = "bitcoin"
upper_bound = 100
lower_bound = 200
recipient = "c@x.com"
"#;

    #[test]
    fn test_parse_rules() {
        let rules: RulesFile = toml::from_str(SAMPLE).unwrap();
        assert_eq!(rules.rules.len(), 3);
        assert_eq!(rules.rules[1].symbol, "Ethereum");
        assert_eq!(rules.rules[1].lower_bound, 3000.5);
    }

    #[test]
    fn test_seed_skips_invalid_entries() {
        let rules: RulesFile = toml::from_str(SAMPLE).unwrap();
        let store = RuleStore::new();

        let summary = rules.seed(&store);
        assert_eq!(summary.accepted, 2);
        assert_eq!(summary.rejected.len(), 1);
        assert_eq!(summary.rejected[0].0, 2);
        assert_eq!(store.len(), 2);
        assert!(store.snapshot().contains("ethereum"));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("rules.toml");

        let rules = RulesFile {
            rules: vec![RegistrationRequest::new("bitcoin", 2.0, 1.0, "a@x.com")],
        };
        rules.save(&path).unwrap();

        let loaded = RulesFile::load(&path).unwrap();
        assert_eq!(loaded, rules);
    }

    #[test]
    fn test_load_missing_file() {
        let result = RulesFile::load("/nonexistent/path/rules.toml");
        assert!(matches!(
            result,
            Err(crate::error::AppError::Config(ConfigError::FileNotFound(_)))
        ));
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let rules = RulesFile::load_or_default("/nonexistent/path/rules.toml").unwrap();
        assert!(rules.rules.is_empty());
    }
}
