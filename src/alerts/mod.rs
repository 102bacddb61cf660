//! Alert rules and evaluation
//!
//! Provides the shared rule store, the registration boundary and the
//! threshold evaluation pass.

mod config;
mod evaluator;
mod registration;
mod store;
mod types;

pub use config::{RulesFile, SeedSummary};
pub use evaluator::{AlertEvaluator, TickReport, DEFAULT_SUBJECT};
pub use registration::{register_json, register_rule, RegistrationRequest, RegistrationResponse};
pub use store::{RuleSnapshot, RuleStore};
pub use types::{normalize_symbol, AlertRule, Breach, NotificationEvent, PriceSnapshot};
