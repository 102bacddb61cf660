//! Configuration system
//!
//! Handles TOML config file parsing and CLI argument merging.

pub mod builder;
pub mod file;

pub use builder::ConfigBuilder;
pub use file::ConfigFile;

use crate::error::ConfigError;
use crate::notify::SmtpConfig;
use crate::price::{PriceFetcherConfig, RetryPolicy};
use crate::services::SchedulerConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,
    /// Price source settings
    pub price: PriceConfig,
    /// Notification settings
    pub notify: NotifyConfig,
    /// SMTP transport settings
    pub smtp: SmtpSection,
}

impl Config {
    /// Check values that would make the watcher misbehave
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.general.interval_seconds == 0 {
            return Err(ConfigError::InvalidValue {
                key: "general.interval_seconds".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if self.price.timeout_seconds == 0 {
            return Err(ConfigError::InvalidValue {
                key: "price.timeout_seconds".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if self.smtp.timeout_seconds == 0 {
            return Err(ConfigError::InvalidValue {
                key: "smtp.timeout_seconds".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if self.price.max_attempts == 0 {
            return Err(ConfigError::InvalidValue {
                key: "price.max_attempts".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if self.price.vs_currency.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "price.vs_currency".to_string(),
                message: "must not be empty".to_string(),
            });
        }
        Ok(())
    }

    /// Scheduler settings
    pub fn scheduler_config(&self) -> SchedulerConfig {
        SchedulerConfig {
            interval: Duration::from_secs(self.general.interval_seconds),
            run_immediately: self.general.run_immediately,
        }
    }

    /// Price fetcher settings
    pub fn price_fetcher_config(&self) -> PriceFetcherConfig {
        PriceFetcherConfig {
            base_url: self.price.base_url.clone(),
            vs_currency: self.price.vs_currency.trim().to_lowercase(),
            timeout: Duration::from_secs(self.price.timeout_seconds),
            retry: RetryPolicy::new(
                self.price.max_attempts,
                Duration::from_millis(self.price.backoff_base_ms),
                Duration::from_millis(self.price.backoff_max_ms),
            ),
        }
    }

    /// SMTP transport settings
    pub fn smtp_config(&self) -> SmtpConfig {
        SmtpConfig {
            server: self.smtp.server.clone(),
            port: self.smtp.port,
            starttls: self.smtp.starttls,
            username: self.smtp.username.clone(),
            password: self.smtp.password.clone(),
            sender: self.smtp.sender.clone(),
            timeout: Duration::from_secs(self.smtp.timeout_seconds),
            hello_name: self.smtp.hello_name.clone(),
        }
    }
}

/// General configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Polling interval in seconds
    pub interval_seconds: u64,
    /// Check once at startup instead of waiting one interval
    pub run_immediately: bool,
    /// Seed rules file
    pub rules_file: Option<String>,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            interval_seconds: 30,
            run_immediately: false,
            rules_file: None,
        }
    }
}

/// Price source configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PriceConfig {
    /// Price endpoint
    pub base_url: String,
    /// Quote currency
    pub vs_currency: String,
    /// Per-attempt timeout in seconds
    pub timeout_seconds: u64,
    /// Total attempts per lookup
    pub max_attempts: u32,
    /// First backoff delay in milliseconds
    pub backoff_base_ms: u64,
    /// Backoff ceiling in milliseconds
    pub backoff_max_ms: u64,
}

impl Default for PriceConfig {
    fn default() -> Self {
        Self {
            base_url: crate::price::http::DEFAULT_BASE_URL.to_string(),
            vs_currency: "usd".to_string(),
            timeout_seconds: 10,
            max_attempts: 5,
            backoff_base_ms: 100,
            backoff_max_ms: 120_000,
        }
    }
}

/// Which transport delivers notifications
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TransportKind {
    /// Email over SMTP
    #[default]
    Smtp,
    /// Print to the terminal
    Terminal,
}

/// Notification configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NotifyConfig {
    /// Delivery transport
    pub transport: TransportKind,
    /// Subject line for alerts
    pub subject: String,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            transport: TransportKind::Smtp,
            subject: crate::alerts::DEFAULT_SUBJECT.to_string(),
        }
    }
}

/// SMTP configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SmtpSection {
    pub server: String,
    pub port: u16,
    pub starttls: bool,
    pub username: Option<String>,
    pub password: Option<String>,
    /// From address (defaults to username)
    pub sender: Option<String>,
    pub timeout_seconds: u64,
    pub hello_name: String,
}

impl Default for SmtpSection {
    fn default() -> Self {
        let defaults = SmtpConfig::default();
        Self {
            server: defaults.server,
            port: defaults.port,
            starttls: defaults.starttls,
            username: None,
            password: None,
            sender: None,
            timeout_seconds: defaults.timeout.as_secs(),
            hello_name: defaults.hello_name,
        }
    }
}
