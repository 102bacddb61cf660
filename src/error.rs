//! Unified error types for pricealert
//!
//! This module defines all error types used throughout the application.
//! Uses thiserror for ergonomic error definitions.

use thiserror::Error;

/// Top-level application error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from configuration parsing/validation
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Rule rejected at registration
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Price could not be fetched
    #[error("Price fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// Notification could not be delivered
    #[error("Notification error: {0}")]
    Send(#[from] SendError),

    /// Ctrl+C handler could not be installed
    #[error("Failed to install signal handler: {0}")]
    Signal(String),

    /// IO error (file operations)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors from rule validation at registration time
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Upper bound is not strictly greater than the lower bound
    #[error("Upper bound must be greater than lower bound")]
    InvalidBounds,

    /// Symbol is empty after normalization
    #[error("Symbol must not be empty")]
    EmptySymbol,

    /// Recipient is empty
    #[error("Recipient must not be empty")]
    MissingRecipient,
}

/// Errors from the price source
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FetchError {
    /// Connection, timeout or body read failure
    #[error("Network error: {0}")]
    Network(String),

    /// Non-success HTTP status
    #[error("Price source returned HTTP {0}")]
    Status(u16),

    /// Every attempt failed with a transient error
    #[error("Gave up after {attempts} attempts: {last}")]
    RetriesExhausted { attempts: u32, last: String },

    /// Response body is not the expected JSON shape
    #[error("Malformed price response: {0}")]
    Malformed(String),

    /// Response does not carry a price for the symbol
    #[error("No {currency} price for '{symbol}' in response")]
    MissingPrice { symbol: String, currency: String },

    /// Request could not be built
    #[error("Invalid price source URL: {0}")]
    InvalidUrl(String),
}

impl FetchError {
    /// Whether another attempt may succeed
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Network(_) => true,
            Self::Status(code) => matches!(code, 500 | 502 | 503 | 504),
            _ => false,
        }
    }
}

/// Errors from notification delivery
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SendError {
    /// Transport rejected the credentials
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Connection or transmission failure
    #[error("Delivery failed: {0}")]
    Transient(String),

    /// Message could not be composed (bad address, etc.)
    #[error("Invalid message: {0}")]
    InvalidMessage(String),
}

impl SendError {
    /// Whether the failure points at the transport configuration
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Auth(_))
    }
}

/// Errors from configuration parsing and validation
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file not found
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    /// Failed to parse config file
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    /// Invalid config value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Missing required config field
    #[error("Missing required configuration field: {0}")]
    MissingField(String),

    /// Config file exists but could not be read
    #[error("Failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for its schema
    #[error("Failed to parse {path}: {source}")]
    Toml {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_bounds_message() {
        let err = ValidationError::InvalidBounds;
        assert_eq!(
            err.to_string(),
            "Upper bound must be greater than lower bound"
        );
    }

    #[test]
    fn test_fetch_error_transient_classes() {
        assert!(FetchError::Network("reset".to_string()).is_transient());
        assert!(FetchError::Status(503).is_transient());
        assert!(FetchError::Status(500).is_transient());
        assert!(!FetchError::Status(404).is_transient());
        assert!(!FetchError::Status(429).is_transient());
        assert!(!FetchError::Malformed("eof".to_string()).is_transient());
    }

    #[test]
    fn test_missing_price_display() {
        let err = FetchError::MissingPrice {
            symbol: "bitcoin".to_string(),
            currency: "usd".to_string(),
        };
        assert!(err.to_string().contains("bitcoin"));
        assert!(err.to_string().contains("usd"));
    }

    #[test]
    fn test_send_error_is_auth() {
        assert!(SendError::Auth("535".to_string()).is_auth());
        assert!(!SendError::Transient("timeout".to_string()).is_auth());
    }

    #[test]
    fn test_error_conversion() {
        let app_err: AppError = ValidationError::InvalidBounds.into();
        assert!(matches!(app_err, AppError::Validation(_)));

        let app_err: AppError = FetchError::Status(404).into();
        assert!(matches!(app_err, AppError::Fetch(_)));
    }
}
