//! Alert evaluator
//!
//! One tick: snapshot the rule store, fetch each symbol's price once, check
//! every rule for that symbol and notify on breaches. Failures are contained
//! per symbol (fetch) and per rule (send); a tick always runs to completion.

use super::store::RuleStore;
use super::types::{AlertRule, PriceSnapshot};
use crate::error::SendError;
use crate::notify::NotificationSender;
use crate::price::PriceSource;
use serde::Serialize;
use std::fmt;

/// Subject line used for alert notifications
pub const DEFAULT_SUBJECT: &str = "Crypto Price Alert";

/// Outcome counters for one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TickReport {
    /// Symbols whose price lookup was attempted
    pub symbols_checked: usize,
    /// Symbols skipped because the lookup failed
    pub fetch_failures: usize,
    /// Rules whose bounds were breached
    pub breaches: usize,
    /// Notifications delivered
    pub notifications_sent: usize,
    /// Notifications rejected for bad transport credentials
    pub auth_failures: usize,
    /// Notifications dropped for any other reason
    pub send_failures: usize,
}

impl fmt::Display for TickReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} symbol(s) checked, {} fetch failure(s), {} breach(es), {} sent, {} auth failure(s), {} send failure(s)",
            self.symbols_checked,
            self.fetch_failures,
            self.breaches,
            self.notifications_sent,
            self.auth_failures,
            self.send_failures
        )
    }
}

/// Reconciles registered rules against fresh prices
pub struct AlertEvaluator {
    store: RuleStore,
    prices: Box<dyn PriceSource>,
    sender: NotificationSender,
    subject: String,
}

impl AlertEvaluator {
    /// Create an evaluator over a shared store
    pub fn new(store: RuleStore, prices: Box<dyn PriceSource>, sender: NotificationSender) -> Self {
        Self {
            store,
            prices,
            sender,
            subject: DEFAULT_SUBJECT.to_string(),
        }
    }

    /// Builder: set the notification subject
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = subject.into();
        self
    }

    /// Run one evaluation pass
    pub fn tick(&self) -> TickReport {
        log::info!("Starting to check alerts");

        let snapshot = self.store.snapshot();
        log::debug!(
            "Current alerts: {} rule(s) across {} symbol(s)",
            snapshot.rule_count(),
            snapshot.symbol_count()
        );

        let mut report = TickReport::default();

        for (symbol, rules) in snapshot.iter() {
            if rules.is_empty() {
                continue;
            }
            report.symbols_checked += 1;

            let price = match self.prices.fetch(symbol) {
                Ok(price) => PriceSnapshot::new(symbol, price),
                Err(e) => {
                    log::error!("Error fetching price for {}: {}", symbol, e);
                    report.fetch_failures += 1;
                    continue;
                }
            };

            self.evaluate_symbol(&price, rules, &mut report);
        }

        log::info!("Finished checking alerts: {}", report);
        report
    }

    fn evaluate_symbol(&self, price: &PriceSnapshot, rules: &[AlertRule], report: &mut TickReport) {
        for rule in rules {
            log::debug!(
                "Checking alert for {}: current price ${}, upper bound ${}, lower bound ${}",
                price.symbol,
                price.price,
                rule.upper_bound(),
                rule.lower_bound()
            );

            let Some(breach) = rule.check(price.price) else {
                continue;
            };
            report.breaches += 1;

            let message = price.alert_message(breach);
            log::info!("{}", message);

            match self.sender.send(rule.recipient(), &self.subject, &message) {
                Ok(()) => report.notifications_sent += 1,
                Err(SendError::Auth(reason)) => {
                    report.auth_failures += 1;
                    log::error!(
                        "{} authentication failed: {}. Check the transport credentials.",
                        self.sender.transport_name(),
                        reason
                    );
                }
                Err(e) => {
                    report.send_failures += 1;
                    log::warn!("Failed to notify {}: {}", rule.recipient(), e);
                }
            }
        }
    }
}
