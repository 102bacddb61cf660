//! Terminal transport
//!
//! Prints notifications instead of delivering them. Useful for dry runs and
//! for machines without mail credentials.

use super::traits::{Transport, TransportSession};
use crate::alerts::NotificationEvent;
use crate::error::SendError;
use std::io::{self, Write};
use std::time::{SystemTime, UNIX_EPOCH};

/// Terminal/console transport
///
/// Outputs notifications to stderr with optional colored formatting
pub struct TerminalTransport {
    /// Use colors (ANSI escape codes)
    use_colors: bool,
}

impl TerminalTransport {
    /// Create a new terminal transport writing to stderr
    pub fn new() -> Self {
        Self {
            use_colors: Self::supports_color(),
        }
    }

    fn supports_color() -> bool {
        std::env::var("TERM")
            .map(|term| term != "dumb")
            .unwrap_or(false)
    }

    fn format_event(&self, event: &NotificationEvent) -> String {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| {
                let secs = d.as_secs();
                format!(
                    "{:02}:{:02}:{:02}",
                    (secs % 86400) / 3600,
                    (secs % 3600) / 60,
                    secs % 60
                )
            })
            .unwrap_or_else(|_| "??:??:??".to_string());

        let subject = if self.use_colors {
            format!("\x1b[33m{}\x1b[0m", event.subject) // Yellow
        } else {
            event.subject.clone()
        };

        format!(
            "[{}] {} -> {}: {}",
            timestamp, subject, event.recipient, event.body
        )
    }
}

impl Default for TerminalTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for TerminalTransport {
    fn connect(&self) -> Result<Box<dyn TransportSession + '_>, SendError> {
        Ok(Box::new(TerminalSession { transport: self }))
    }

    fn name(&self) -> &str {
        "terminal"
    }
}

struct TerminalSession<'a> {
    transport: &'a TerminalTransport,
}

impl TransportSession for TerminalSession<'_> {
    fn authenticate(&mut self) -> Result<(), SendError> {
        Ok(())
    }

    fn transmit(&mut self, event: &NotificationEvent) -> Result<(), SendError> {
        let line = self.transport.format_event(event);

        writeln!(io::stderr().lock(), "{}", line).map_err(|e| SendError::Transient(e.to_string()))
    }

    fn close(&mut self) {}
}
