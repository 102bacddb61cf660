//! Alert system domain types
//!
//! Defines validated types for the alerting system including rules, breaches,
//! price snapshots and outgoing notifications.

use crate::error::ValidationError;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Normalize a tracked symbol to its canonical form
///
/// Symbols are matched case-insensitively, so `Bitcoin ` and `bitcoin` refer
/// to the same asset.
pub fn normalize_symbol(symbol: &str) -> Result<String, ValidationError> {
    let normalized = symbol.trim().to_lowercase();
    if normalized.is_empty() {
        return Err(ValidationError::EmptySymbol);
    }
    Ok(normalized)
}

/// Threshold rule for a single recipient
///
/// Construct with [`AlertRule::new`]; the bounds are checked once and the
/// rule never changes afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlertRule {
    upper_bound: f64,
    lower_bound: f64,
    recipient: String,
}

impl AlertRule {
    /// Create a new alert rule
    ///
    /// Fails unless `upper_bound > lower_bound`. NaN bounds never compare
    /// greater, so they are rejected too.
    pub fn new(
        upper_bound: f64,
        lower_bound: f64,
        recipient: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        if upper_bound.partial_cmp(&lower_bound) != Some(Ordering::Greater) {
            return Err(ValidationError::InvalidBounds);
        }

        let recipient = recipient.into().trim().to_string();
        if recipient.is_empty() {
            return Err(ValidationError::MissingRecipient);
        }

        Ok(Self {
            upper_bound,
            lower_bound,
            recipient,
        })
    }

    pub fn upper_bound(&self) -> f64 {
        self.upper_bound
    }

    pub fn lower_bound(&self) -> f64 {
        self.lower_bound
    }

    pub fn recipient(&self) -> &str {
        &self.recipient
    }

    /// Check a price against the bounds
    ///
    /// Both bounds are exclusive: a price equal to a bound is not a breach.
    pub fn check(&self, price: f64) -> Option<Breach> {
        if price > self.upper_bound {
            Some(Breach::Above(self.upper_bound))
        } else if price < self.lower_bound {
            Some(Breach::Below(self.lower_bound))
        } else {
            None
        }
    }
}

/// A price strictly outside a rule's bounds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Breach {
    /// Price above the upper bound (carries the bound)
    Above(f64),
    /// Price below the lower bound (carries the bound)
    Below(f64),
}

impl Breach {
    /// The bound that was crossed
    pub fn bound(&self) -> f64 {
        match self {
            Self::Above(bound) | Self::Below(bound) => *bound,
        }
    }
}

impl fmt::Display for Breach {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Above(bound) => write!(f, "above ${}", bound),
            Self::Below(bound) => write!(f, "below ${}", bound),
        }
    }
}

/// Price observed for a symbol during one evaluation pass
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSnapshot {
    pub symbol: String,
    pub price: f64,
}

impl PriceSnapshot {
    pub fn new(symbol: impl Into<String>, price: f64) -> Self {
        Self {
            symbol: symbol.into(),
            price,
        }
    }

    /// Human-readable alert text for a breach of this price
    pub fn alert_message(&self, breach: Breach) -> String {
        format!(
            "Alert: {} price (${}) is {}",
            self.symbol, self.price, breach
        )
    }
}

/// Outgoing notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotificationEvent {
    pub recipient: String,
    pub subject: String,
    pub body: String,
}

impl NotificationEvent {
    pub fn new(
        recipient: impl Into<String>,
        subject: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            recipient: recipient.into(),
            subject: subject.into(),
            body: body.into(),
        }
    }
}
