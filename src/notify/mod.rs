//! Notification delivery
//!
//! A [`NotificationSender`] drives one scoped [`Transport`] session per
//! message: connect, authenticate, transmit, close.

pub mod sender;
pub mod smtp;
pub mod terminal;
pub mod traits;

pub use sender::NotificationSender;
pub use smtp::{SmtpConfig, SmtpTransport};
pub use terminal::TerminalTransport;
pub use traits::{Transport, TransportSession};
