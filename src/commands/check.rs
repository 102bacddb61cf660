//! Check command implementation
//!
//! Runs a single evaluation pass.

use crate::cli::args::OutputFormat;
use crate::cli::output::print_output;
use crate::commands::{build_evaluator, load_rules};
use crate::config::Config;
use crate::error::Result;

/// Execute the check command
pub fn run_check(config: &Config, format: OutputFormat) -> Result<()> {
    config.validate()?;

    let store = load_rules(config)?;
    if store.is_empty() {
        log::warn!("No rules registered; nothing to check");
    }

    let evaluator = build_evaluator(config, store)?;
    let report = evaluator.tick();

    print_output(&report, format)?;
    Ok(())
}
