//! Command handlers
//!
//! Each command handler orchestrates the execution of a CLI command.

pub mod check;
pub mod price;
pub mod rules;
pub mod test_email;
pub mod watch;

pub use check::run_check;
pub use price::run_price;
pub use rules::run_rules;
pub use test_email::run_test_email;
pub use watch::run_watch;

use crate::alerts::{AlertEvaluator, RuleStore, RulesFile};
use crate::config::{Config, TransportKind};
use crate::error::Result;
use crate::notify::{NotificationSender, SmtpTransport, TerminalTransport, Transport};
use crate::price::HttpPriceFetcher;
use std::path::PathBuf;

/// Build the configured notification transport
pub(crate) fn build_transport(config: &Config) -> Result<Box<dyn Transport>> {
    let transport: Box<dyn Transport> = match config.notify.transport {
        TransportKind::Smtp => Box::new(SmtpTransport::new(config.smtp_config())?),
        TransportKind::Terminal => Box::new(TerminalTransport::new()),
    };
    log::debug!("Using {} transport", transport.name());
    Ok(transport)
}

/// Build an evaluator over `store` wired to the real price source
pub(crate) fn build_evaluator(config: &Config, store: RuleStore) -> Result<AlertEvaluator> {
    let fetcher = HttpPriceFetcher::new(config.price_fetcher_config())?;
    let sender = NotificationSender::new(build_transport(config)?);

    Ok(AlertEvaluator::new(store, Box::new(fetcher), sender).with_subject(&config.notify.subject))
}

/// Resolve the seed rules path
pub(crate) fn rules_path(config: &Config) -> PathBuf {
    config
        .general
        .rules_file
        .as_ref()
        .map(PathBuf::from)
        .unwrap_or_else(RulesFile::default_path)
}

/// Create a store seeded from the rules file
pub(crate) fn load_rules(config: &Config) -> Result<RuleStore> {
    let path = rules_path(config);
    let rules = RulesFile::load_or_default(&path)?;

    let store = RuleStore::new();
    let summary = rules.seed(&store);
    for (index, reason) in &summary.rejected {
        log::warn!("Skipping rule #{} in {}: {}", index, path.display(), reason);
    }
    log::info!("Loaded {} rule(s) from {}", summary.accepted, path.display());

    Ok(store)
}
