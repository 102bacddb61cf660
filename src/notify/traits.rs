//! Trait definitions for notification transports

use crate::alerts::NotificationEvent;
use crate::error::SendError;

/// Notification channel able to open delivery sessions
pub trait Transport: Send + Sync {
    /// Open a new session (connection established, not yet authenticated)
    fn connect(&self) -> Result<Box<dyn TransportSession + '_>, SendError>;

    /// Channel name for identification
    fn name(&self) -> &str;
}

/// One open connection to a transport
///
/// Callers must invoke [`close`](TransportSession::close) exactly once when
/// done, whether or not the earlier steps succeeded.
pub trait TransportSession {
    /// Present credentials; failures should map to [`SendError::Auth`]
    fn authenticate(&mut self) -> Result<(), SendError>;

    /// Deliver a single message
    fn transmit(&mut self, event: &NotificationEvent) -> Result<(), SendError>;

    /// Release the session
    fn close(&mut self);
}

impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    fn connect(&self) -> Result<Box<dyn TransportSession + '_>, SendError> {
        (**self).connect()
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
