//! SMTP transport
//!
//! Email delivery over a fresh SMTP connection per message: connect,
//! STARTTLS, AUTH, send, QUIT.

use super::traits::{Transport, TransportSession};
use crate::alerts::NotificationEvent;
use crate::error::{ConfigError, SendError};
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::{Credentials, Mechanism};
use lettre::transport::smtp::client::{SmtpConnection, TlsParameters};
use lettre::transport::smtp::extension::ClientId;
use lettre::Message;
use std::fmt;
use std::time::Duration;

/// SMTP connection settings
#[derive(Clone)]
pub struct SmtpConfig {
    /// Server host name
    pub server: String,
    /// Server port (587 for submission with STARTTLS)
    pub port: u16,
    /// Upgrade the connection with STARTTLS before authenticating
    pub starttls: bool,
    /// Login user; authentication is skipped when unset
    pub username: Option<String>,
    /// Login password
    pub password: Option<String>,
    /// From address; defaults to the username
    pub sender: Option<String>,
    /// Connect and command timeout
    pub timeout: Duration,
    /// Name announced in EHLO
    pub hello_name: String,
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            server: "smtp.gmail.com".to_string(),
            port: 587,
            starttls: true,
            username: None,
            password: None,
            sender: None,
            timeout: Duration::from_secs(10),
            hello_name: "localhost".to_string(),
        }
    }
}

impl fmt::Debug for SmtpConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmtpConfig")
            .field("server", &self.server)
            .field("port", &self.port)
            .field("starttls", &self.starttls)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("sender", &self.sender)
            .field("timeout", &self.timeout)
            .field("hello_name", &self.hello_name)
            .finish()
    }
}

impl SmtpConfig {
    /// Effective From address
    pub fn sender_address(&self) -> Option<&str> {
        self.sender.as_deref().or(self.username.as_deref())
    }

    fn credentials(&self) -> Option<Credentials> {
        match (&self.username, &self.password) {
            (Some(user), Some(pass)) => Some(Credentials::new(user.clone(), pass.clone())),
            _ => None,
        }
    }
}

/// Email transport
pub struct SmtpTransport {
    config: SmtpConfig,
    sender: String,
}

impl SmtpTransport {
    /// Create a transport; a sender address (or username) is required
    pub fn new(config: SmtpConfig) -> Result<Self, ConfigError> {
        let sender = config
            .sender_address()
            .ok_or_else(|| ConfigError::MissingField("smtp.sender".to_string()))?
            .to_string();

        if config.username.is_some() != config.password.is_some() {
            return Err(ConfigError::InvalidValue {
                key: "smtp".to_string(),
                message: "username and password must be set together".to_string(),
            });
        }

        Ok(Self { config, sender })
    }

    /// Get the transport configuration
    pub fn config(&self) -> &SmtpConfig {
        &self.config
    }
}

impl Transport for SmtpTransport {
    fn connect(&self) -> Result<Box<dyn TransportSession + '_>, SendError> {
        let hello = ClientId::Domain(self.config.hello_name.clone());

        log::info!(
            "Connecting to SMTP server: {}:{}",
            self.config.server,
            self.config.port
        );
        let mut connection = SmtpConnection::connect(
            (self.config.server.as_str(), self.config.port),
            Some(self.config.timeout),
            &hello,
            None,
            None,
        )
        .map_err(|e| SendError::Transient(e.to_string()))?;

        if self.config.starttls {
            let upgraded = TlsParameters::new(self.config.server.clone())
                .and_then(|tls| connection.starttls(&tls, &hello));
            if let Err(e) = upgraded {
                connection.abort();
                return Err(SendError::Transient(format!("STARTTLS failed: {}", e)));
            }
        }

        Ok(Box::new(SmtpSession {
            connection,
            transport: self,
        }))
    }

    fn name(&self) -> &str {
        "smtp"
    }
}

struct SmtpSession<'a> {
    connection: SmtpConnection,
    transport: &'a SmtpTransport,
}

impl TransportSession for SmtpSession<'_> {
    fn authenticate(&mut self) -> Result<(), SendError> {
        let Some(credentials) = self.transport.config.credentials() else {
            log::debug!("No SMTP credentials configured, skipping AUTH");
            return Ok(());
        };

        if let Some(user) = &self.transport.config.username {
            log::info!("Attempting to login with username: {}", user);
        }

        match self
            .connection
            .auth(&[Mechanism::Plain, Mechanism::Login], &credentials)
        {
            Ok(_) => Ok(()),
            Err(e) if e.is_permanent() || e.is_client() => Err(SendError::Auth(e.to_string())),
            Err(e) => Err(SendError::Transient(e.to_string())),
        }
    }

    fn transmit(&mut self, event: &NotificationEvent) -> Result<(), SendError> {
        let message = build_message(&self.transport.sender, event)?;
        self.connection
            .send(message.envelope(), &message.formatted())
            .map_err(|e| SendError::Transient(e.to_string()))?;
        Ok(())
    }

    fn close(&mut self) {
        if let Err(e) = self.connection.quit() {
            log::debug!("SMTP QUIT failed: {}", e);
            self.connection.abort();
        }
    }
}

/// Compose a plain-text email for a notification
pub fn build_message(sender: &str, event: &NotificationEvent) -> Result<Message, SendError> {
    let from: Mailbox = sender
        .parse()
        .map_err(|e| SendError::InvalidMessage(format!("sender '{}': {}", sender, e)))?;
    let to: Mailbox = event
        .recipient
        .parse()
        .map_err(|e| SendError::InvalidMessage(format!("recipient '{}': {}", event.recipient, e)))?;

    Message::builder()
        .from(from)
        .to(to)
        .subject(event.subject.clone())
        .header(ContentType::TEXT_PLAIN)
        .body(event.body.clone())
        .map_err(|e| SendError::InvalidMessage(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SmtpConfig::default();
        assert_eq!(config.server, "smtp.gmail.com");
        assert_eq!(config.port, 587);
        assert!(config.starttls);
        assert_eq!(config.sender_address(), None);
    }

    #[test]
    fn test_sender_falls_back_to_username() {
        let config = SmtpConfig {
            username: Some("me@x.com".to_string()),
            password: Some("secret".to_string()),
            ..SmtpConfig::default()
        };
        assert_eq!(config.sender_address(), Some("me@x.com"));

        let transport = SmtpTransport::new(config).unwrap();
        assert_eq!(transport.sender, "me@x.com");
        assert_eq!(transport.config().server, "smtp.gmail.com");
    }

    #[test]
    fn test_missing_sender_rejected() {
        let result = SmtpTransport::new(SmtpConfig::default());
        assert!(matches!(result, Err(ConfigError::MissingField(_))));
    }

    #[test]
    fn test_half_credentials_rejected() {
        let config = SmtpConfig {
            username: Some("me@x.com".to_string()),
            ..SmtpConfig::default()
        };
        assert!(matches!(
            SmtpTransport::new(config),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_debug_redacts_password() {
        let config = SmtpConfig {
            password: Some("hunter2".to_string()),
            ..SmtpConfig::default()
        };
        let debug = format!("{:?}", config);
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn test_build_message() {
        let event = NotificationEvent::new("a@x.com", "Crypto Price Alert", "body text");
        let message = build_message("me@x.com", &event).unwrap();
        let formatted = String::from_utf8(message.formatted()).unwrap();
        assert!(formatted.contains("Subject: Crypto Price Alert"));
        assert!(formatted.contains("To: a@x.com"));
        assert!(formatted.contains("body text"));
    }

    #[test]
    fn test_build_message_invalid_recipient() {
        let event = NotificationEvent::new("not an address", "s", "b");
        assert!(matches!(
            build_message("me@x.com", &event),
            Err(SendError::InvalidMessage(_))
        ));
    }

    #[test]
    fn test_connect_refused_is_transient() {
        let config = SmtpConfig {
            server: "127.0.0.1".to_string(),
            port: 9,
            starttls: false,
            sender: Some("me@x.com".to_string()),
            timeout: Duration::from_millis(500),
            ..SmtpConfig::default()
        };
        let transport = SmtpTransport::new(config).unwrap();
        assert!(matches!(
            transport.connect().map(|_| ()),
            Err(SendError::Transient(_))
        ));
    }
}
