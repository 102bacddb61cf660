//! Mock implementations for testing
//!
//! Provides a mock price source and a recording transport so the evaluation
//! loop can be exercised without network access.

use crate::alerts::NotificationEvent;
use crate::error::{FetchError, SendError};
use crate::notify::{Transport, TransportSession};
use crate::price::PriceSource;

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, RwLock};
use std::time::Duration;

/// Mock price source with per-symbol canned answers
#[derive(Debug, Default)]
pub struct MockPriceSource {
    answers: RwLock<HashMap<String, Result<f64, FetchError>>>,
    calls: Mutex<Vec<String>>,
    latency: RwLock<Duration>,
}

impl MockPriceSource {
    /// Create a source that knows no symbols
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: set a price
    pub fn with_price(self, symbol: &str, price: f64) -> Self {
        self.set_price(symbol, price);
        self
    }

    /// Set the price returned for a symbol
    pub fn set_price(&self, symbol: &str, price: f64) {
        self.answers
            .write()
            .unwrap()
            .insert(symbol.to_string(), Ok(price));
    }

    /// Make lookups for a symbol fail
    pub fn set_error(&self, symbol: &str, error: FetchError) {
        self.answers
            .write()
            .unwrap()
            .insert(symbol.to_string(), Err(error));
    }

    /// Delay every lookup
    pub fn set_latency(&self, latency: Duration) {
        *self.latency.write().unwrap() = latency;
    }

    /// Symbols requested so far, in call order
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of lookups for a symbol
    pub fn fetch_count(&self, symbol: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.as_str() == symbol)
            .count()
    }
}

impl PriceSource for MockPriceSource {
    fn fetch(&self, symbol: &str) -> Result<f64, FetchError> {
        self.calls.lock().unwrap().push(symbol.to_string());

        let latency = *self.latency.read().unwrap();
        if !latency.is_zero() {
            std::thread::sleep(latency);
        }

        self.answers
            .read()
            .unwrap()
            .get(symbol)
            .cloned()
            .unwrap_or_else(|| {
                Err(FetchError::MissingPrice {
                    symbol: symbol.to_string(),
                    currency: "usd".to_string(),
                })
            })
    }

    fn name(&self) -> &str {
        "mock"
    }
}

/// Failure injected into [`MockTransport`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockFailure {
    /// Session cannot be opened
    Connect,
    /// Credentials rejected
    Auth,
    /// Message rejected after authentication
    Transmit,
}

/// Transport that records delivered notifications
#[derive(Debug, Default)]
pub struct MockTransport {
    sent: Mutex<Vec<NotificationEvent>>,
    global_failure: RwLock<Option<MockFailure>>,
    recipient_failures: RwLock<HashMap<String, MockFailure>>,
    opened: AtomicUsize,
    closed: AtomicUsize,
}

impl MockTransport {
    /// Create a transport that accepts everything
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail every session at the given step
    pub fn fail_all(&self, failure: MockFailure) {
        *self.global_failure.write().unwrap() = Some(failure);
    }

    /// Fail deliveries to one recipient at transmit time
    pub fn fail_recipient(&self, recipient: &str, failure: MockFailure) {
        self.recipient_failures
            .write()
            .unwrap()
            .insert(recipient.to_string(), failure);
    }

    /// Notifications delivered so far
    pub fn sent(&self) -> Vec<NotificationEvent> {
        self.sent.lock().unwrap().clone()
    }

    /// Notifications delivered to a recipient
    pub fn sent_to(&self, recipient: &str) -> Vec<NotificationEvent> {
        self.sent()
            .into_iter()
            .filter(|e| e.recipient == recipient)
            .collect()
    }

    pub fn sessions_opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }

    pub fn sessions_closed(&self) -> usize {
        self.closed.load(Ordering::SeqCst)
    }

    fn global_failure(&self) -> Option<MockFailure> {
        *self.global_failure.read().unwrap()
    }
}

impl Transport for MockTransport {
    fn connect(&self) -> Result<Box<dyn TransportSession + '_>, SendError> {
        if self.global_failure() == Some(MockFailure::Connect) {
            return Err(SendError::Transient("connection refused".to_string()));
        }
        self.opened.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(MockSession { transport: self }))
    }

    fn name(&self) -> &str {
        "mock"
    }
}

struct MockSession<'a> {
    transport: &'a MockTransport,
}

impl TransportSession for MockSession<'_> {
    fn authenticate(&mut self) -> Result<(), SendError> {
        if self.transport.global_failure() == Some(MockFailure::Auth) {
            return Err(SendError::Auth("535 credentials rejected".to_string()));
        }
        Ok(())
    }

    fn transmit(&mut self, event: &NotificationEvent) -> Result<(), SendError> {
        let failure = self
            .transport
            .recipient_failures
            .read()
            .unwrap()
            .get(&event.recipient)
            .copied()
            .or(self.transport.global_failure());

        match failure {
            Some(MockFailure::Transmit) | Some(MockFailure::Connect) => {
                Err(SendError::Transient("connection reset".to_string()))
            }
            Some(MockFailure::Auth) => Err(SendError::Auth("535 credentials rejected".to_string())),
            None => {
                self.transport.sent.lock().unwrap().push(event.clone());
                Ok(())
            }
        }
    }

    fn close(&mut self) {
        self.transport.closed.fetch_add(1, Ordering::SeqCst);
    }
}
