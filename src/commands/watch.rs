//! Watch command implementation
//!
//! Runs the scheduler until Ctrl+C, optionally accepting new rules as JSON
//! lines on stdin while it runs.

use crate::alerts::{register_json, RegistrationResponse, RuleStore};
use crate::cli::args::OutputFormat;
use crate::cli::output::{print_output, Message};
use crate::commands::{build_evaluator, load_rules};
use crate::config::Config;
use crate::error::{AppError, Result};
use crate::services::Scheduler;

use std::io::{self, BufRead, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Execute the watch command
pub fn run_watch(config: &Config, read_stdin: bool, format: OutputFormat) -> Result<()> {
    config.validate()?;

    let store = load_rules(config)?;
    let evaluator = Arc::new(build_evaluator(config, store.clone())?);

    let running = Arc::new(AtomicBool::new(true));
    let r = Arc::clone(&running);
    ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
    })
    .map_err(|e| AppError::Signal(e.to_string()))?;

    let scheduler_config = config.scheduler_config();
    log::info!("Starting price watch");
    log::info!("  Interval: {:?}", scheduler_config.interval);
    log::info!("  Rules: {}", store.len());

    let mut scheduler = Scheduler::new(scheduler_config);
    let tick_evaluator = Arc::clone(&evaluator);
    scheduler.start(move || {
        tick_evaluator.tick();
    })?;

    if read_stdin {
        spawn_stdin_reader(store.clone())?;
    }

    eprintln!(
        "Watching {} rule(s) every {}s. Press Ctrl+C to stop.",
        store.len(),
        config.general.interval_seconds
    );

    while running.load(Ordering::SeqCst) {
        thread::sleep(Duration::from_millis(100));
    }

    log::info!("Shutting down");
    scheduler.stop();

    let msg = Message {
        message: format!(
            "Stopped after {} check(s) with {} rule(s) registered",
            scheduler.tick_count(),
            store.len()
        ),
        success: true,
    };
    print_output(&msg, format)?;
    Ok(())
}

/// Register one rule per stdin line, answering each with a JSON response line
///
/// The thread ends at EOF; the watch keeps running.
fn spawn_stdin_reader(store: RuleStore) -> io::Result<()> {
    thread::Builder::new()
        .name("rule-intake".to_string())
        .spawn(move || {
            let stdin = io::stdin();
            let mut out = io::stdout();
            if let Err(e) = process_lines(&store, stdin.lock(), &mut out) {
                log::error!("Stopped reading registrations: {}", e);
            }
            log::debug!("Registration input closed");
        })?;
    Ok(())
}

/// Answer each input line; only read or write failures end the loop
fn process_lines<R: BufRead, W: Write>(store: &RuleStore, input: R, out: &mut W) -> io::Result<()> {
    for raw in input.split(b'\n') {
        let raw = raw?;

        let response = match std::str::from_utf8(&raw) {
            Ok(line) if line.trim().is_empty() => continue,
            Ok(line) => register_json(store, line),
            Err(e) => {
                log::warn!("Invalid registration payload: {}", e);
                RegistrationResponse::Error {
                    message: "Invalid request: input is not valid UTF-8".to_string(),
                }
            }
        };

        let json = serde_json::to_string(&response).map_err(io::Error::other)?;
        writeln!(out, "{}", json)?;
        out.flush()?;
    }
    Ok(())
}
