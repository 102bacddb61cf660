//! Notification sender
//!
//! Wraps a [`Transport`] and turns every delivery into one scoped session.

use super::traits::{Transport, TransportSession};
use crate::alerts::NotificationEvent;
use crate::error::SendError;
use std::ops::{Deref, DerefMut};

/// Delivers notifications through a single transport
pub struct NotificationSender {
    transport: Box<dyn Transport>,
}

impl NotificationSender {
    /// Create a sender over the given transport
    pub fn new(transport: Box<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Name of the underlying transport
    pub fn transport_name(&self) -> &str {
        self.transport.name()
    }

    /// Send a message to a recipient
    pub fn send(&self, recipient: &str, subject: &str, body: &str) -> Result<(), SendError> {
        self.deliver(&NotificationEvent::new(recipient, subject, body))
    }

    /// Deliver a prepared notification
    ///
    /// The session is closed on every path out of this function.
    pub fn deliver(&self, event: &NotificationEvent) -> Result<(), SendError> {
        log::info!(
            "Attempting to send notification to {} via {}",
            event.recipient,
            self.transport.name()
        );

        let mut session = SessionGuard::new(self.transport.connect()?);
        session.authenticate()?;
        log::debug!("Authenticated with {}", self.transport.name());
        session.transmit(event)?;

        log::info!("Notification sent to {}", event.recipient);
        Ok(())
    }
}

/// Closes the wrapped session when dropped
struct SessionGuard<'a> {
    session: Box<dyn TransportSession + 'a>,
}

impl<'a> SessionGuard<'a> {
    fn new(session: Box<dyn TransportSession + 'a>) -> Self {
        Self { session }
    }
}

impl<'a> Deref for SessionGuard<'a> {
    type Target = dyn TransportSession + 'a;

    fn deref(&self) -> &Self::Target {
        self.session.as_ref()
    }
}

impl<'a> DerefMut for SessionGuard<'a> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.session.as_mut()
    }
}

impl Drop for SessionGuard<'_> {
    fn drop(&mut self) {
        self.session.close();
    }
}
