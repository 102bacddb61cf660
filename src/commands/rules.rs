//! Rules command implementation
//!
//! Lists and edits the seed rules file.

use crate::alerts::{normalize_symbol, AlertRule, RegistrationRequest, RulesFile};
use crate::cli::args::{OutputFormat, RulesCommands};
use crate::cli::output::{print_output, Message, RuleList, RuleListEntry};
use crate::commands::rules_path;
use crate::config::Config;
use crate::error::Result;
use std::path::Path;

/// Execute rules commands
pub fn run_rules(command: &RulesCommands, config: &Config, format: OutputFormat) -> Result<()> {
    let path = rules_path(config);

    match command {
        RulesCommands::List { .. } => run_rules_list(&path, format),
        RulesCommands::Add {
            symbol,
            upper,
            lower,
            recipient,
            ..
        } => run_rules_add(&path, symbol, *upper, *lower, recipient, format),
    }
}

fn run_rules_list(path: &Path, format: OutputFormat) -> Result<()> {
    let rules = RulesFile::load_or_default(path)?;

    let list = RuleList {
        path: path.display().to_string(),
        rules: rules
            .rules
            .iter()
            .enumerate()
            .map(|(i, r)| RuleListEntry::new(i, r))
            .collect(),
    };

    print_output(&list, format)?;
    Ok(())
}

fn run_rules_add(
    path: &Path,
    symbol: &str,
    upper: f64,
    lower: f64,
    recipient: &str,
    format: OutputFormat,
) -> Result<()> {
    let symbol = append_rule(path, symbol, upper, lower, recipient)?;

    let msg = Message {
        message: format!("Added rule for {} to {}", symbol, path.display()),
        success: true,
    };
    print_output(&msg, format)?;
    Ok(())
}

/// Validate a rule and append it to the file, returning the stored symbol
fn append_rule(path: &Path, symbol: &str, upper: f64, lower: f64, recipient: &str) -> Result<String> {
    let symbol = normalize_symbol(symbol)?;
    let rule = AlertRule::new(upper, lower, recipient)?;

    let mut rules = RulesFile::load_or_default(path)?;
    rules.rules.push(RegistrationRequest::new(
        symbol.as_str(),
        rule.upper_bound(),
        rule.lower_bound(),
        rule.recipient(),
    ));
    rules.save(path)?;

    Ok(symbol)
}
