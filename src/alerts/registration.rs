//! Rule registration boundary
//!
//! Validates incoming rule requests and turns every outcome into a
//! `{"status": ...}` response. Nothing here panics or returns an error to the
//! caller; rejected input becomes an error response.

use super::store::RuleStore;
use super::types::AlertRule;
use crate::error::ValidationError;
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Incoming rule registration
///
/// Accepts both `symbol`/`recipient` and the `crypto_symbol`/`email` field
/// names. Bounds may be JSON numbers or numeric strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistrationRequest {
    #[serde(alias = "crypto_symbol")]
    pub symbol: String,
    #[serde(deserialize_with = "number_or_string")]
    pub upper_bound: f64,
    #[serde(deserialize_with = "number_or_string")]
    pub lower_bound: f64,
    #[serde(alias = "email")]
    pub recipient: String,
}

impl RegistrationRequest {
    pub fn new(
        symbol: impl Into<String>,
        upper_bound: f64,
        lower_bound: f64,
        recipient: impl Into<String>,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            upper_bound,
            lower_bound,
            recipient: recipient.into(),
        }
    }

    /// Validate and add the rule to the store
    pub fn register(&self, store: &RuleStore) -> RegistrationResponse {
        register_rule(
            store,
            &self.symbol,
            self.upper_bound,
            self.lower_bound,
            &self.recipient,
        )
    }
}

/// Registration outcome, serialized as `{"status": "success"}` or
/// `{"status": "error", "message": "..."}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum RegistrationResponse {
    Success,
    Error { message: String },
}

impl RegistrationResponse {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

impl From<ValidationError> for RegistrationResponse {
    fn from(err: ValidationError) -> Self {
        Self::Error {
            message: err.to_string(),
        }
    }
}

impl fmt::Display for RegistrationResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::Error { message } => write!(f, "error: {}", message),
        }
    }
}

/// Register a rule for `symbol`
pub fn register_rule(
    store: &RuleStore,
    symbol: &str,
    upper_bound: f64,
    lower_bound: f64,
    recipient: &str,
) -> RegistrationResponse {
    let result = AlertRule::new(upper_bound, lower_bound, recipient)
        .and_then(|rule| store.register(symbol, rule));

    match result {
        Ok(()) => {
            log::info!(
                "New alert set for {}: Upper bound ${}, Lower bound ${}",
                symbol.trim().to_lowercase(),
                upper_bound,
                lower_bound
            );
            RegistrationResponse::Success
        }
        Err(e) => {
            log::warn!(
                "Rejected alert for '{}' (upper {}, lower {}): {}",
                symbol,
                upper_bound,
                lower_bound,
                e
            );
            e.into()
        }
    }
}

/// Parse a JSON registration request and register it
///
/// Malformed JSON yields an error response like any other bad input.
pub fn register_json(store: &RuleStore, payload: &str) -> RegistrationResponse {
    match serde_json::from_str::<RegistrationRequest>(payload) {
        Ok(request) => request.register(store),
        Err(e) => {
            log::warn!("Invalid registration payload: {}", e);
            RegistrationResponse::Error {
                message: format!("Invalid request: {}", e),
            }
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(f64),
    Text(String),
}

fn number_or_string<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(n) => Ok(n),
        NumberOrString::Text(s) => s
            .trim()
            .parse()
            .map_err(|_| de::Error::custom(format!("'{}' is not a number", s))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_success() {
        let store = RuleStore::new();
        let response = register_rule(&store, "bitcoin", 70000.0, 60000.0, "a@x.com");
        assert_eq!(response, RegistrationResponse::Success);
        assert!(store.snapshot().contains("bitcoin"));
    }

    #[test]
    fn test_register_invalid_bounds() {
        let store = RuleStore::new();
        let response = register_rule(&store, "bitcoin", 100.0, 200.0, "a@x.com");
        assert_eq!(
            response,
            RegistrationResponse::Error {
                message: "Upper bound must be greater than lower bound".to_string()
            }
        );
        assert!(store.is_empty());
    }

    #[test]
    fn test_response_json_shape() {
        let success = serde_json::to_string(&RegistrationResponse::Success).unwrap();
        assert_eq!(success, r#"{"status":"success"}"#);

        let error = serde_json::to_value(RegistrationResponse::from(
            ValidationError::InvalidBounds,
        ))
        .unwrap();
        assert_eq!(
            error,
            serde_json::json!({
                "status": "error",
                "message": "Upper bound must be greater than lower bound"
            })
        );
    }

    #[test]
    fn test_register_json_wire_names() {
        let store = RuleStore::new();
        let payload = r#"{"crypto_symbol": "Bitcoin", "upper_bound": "70000", "lower_bound": 60000, "email": "a@x.com"}"#;
        assert!(register_json(&store, payload).is_success());

        let snapshot = store.snapshot();
        let rules = snapshot.rules_for("bitcoin");
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].upper_bound(), 70000.0);
        assert_eq!(rules[0].recipient(), "a@x.com");
    }

    #[test]
    fn test_register_json_plain_names() {
        let store = RuleStore::new();
        let payload =
            r#"{"symbol": "eth", "upper_bound": 4000.5, "lower_bound": 3000, "recipient": "b@x.com"}"#;
        assert!(register_json(&store, payload).is_success());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_register_json_malformed() {
        let store = RuleStore::new();
        let response = register_json(&store, "{not json");
        assert!(!response.is_success());

        let response = register_json(
            &store,
            r#"{"symbol": "eth", "upper_bound": "lots", "lower_bound": 1, "recipient": "b@x.com"}"#,
        );
        assert!(!response.is_success());
        assert!(store.is_empty());
    }
}
