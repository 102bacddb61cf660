//! Test email command implementation

use crate::cli::args::OutputFormat;
use crate::cli::output::{print_output, Message};
use crate::commands::build_transport;
use crate::config::Config;
use crate::error::{ConfigError, Result};
use crate::notify::NotificationSender;

const TEST_SUBJECT: &str = "Test Email";
const TEST_BODY: &str = "This is a test email from the price alert watcher";

/// Execute the test-email command
pub fn run_test_email(to: Option<&str>, config: &Config, format: OutputFormat) -> Result<()> {
    config.validate()?;

    let smtp = config.smtp_config();
    let recipient = match to {
        Some(to) => to.to_string(),
        None => smtp
            .sender_address()
            .map(str::to_string)
            .ok_or_else(|| ConfigError::MissingField("smtp.sender".to_string()))?,
    };

    let sender = NotificationSender::new(build_transport(config)?);
    sender.send(&recipient, TEST_SUBJECT, TEST_BODY)?;

    let msg = Message {
        message: format!("Test email sent to {}", recipient),
        success: true,
    };
    print_output(&msg, format)?;
    Ok(())
}
