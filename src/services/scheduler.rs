//! Periodic job scheduler
//!
//! Runs a job on a dedicated thread at a fixed nominal interval. Ticks never
//! overlap: when a tick overruns the interval the next one starts as soon as
//! it finishes, and missed intervals are not replayed.

use std::io;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Configuration for the scheduler
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchedulerConfig {
    /// Nominal time between tick starts
    pub interval: Duration,
    /// Run the first tick at start instead of after one interval
    pub run_immediately: bool,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(30),
            run_immediately: false,
        }
    }
}

/// Background periodic task with explicit start/stop lifecycle
pub struct Scheduler {
    config: SchedulerConfig,
    running: Arc<AtomicBool>,
    ticks: Arc<AtomicU64>,
    stop_tx: Option<Sender<()>>,
    handle: Option<thread::JoinHandle<()>>,
}

impl Scheduler {
    /// Create a new scheduler (not started)
    pub fn new(config: SchedulerConfig) -> Self {
        Self {
            config,
            running: Arc::new(AtomicBool::new(false)),
            ticks: Arc::new(AtomicU64::new(0)),
            stop_tx: None,
            handle: None,
        }
    }

    /// Get the scheduler configuration
    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Check if the worker thread is running
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Number of completed ticks since creation
    pub fn tick_count(&self) -> u64 {
        self.ticks.load(Ordering::SeqCst)
    }

    /// Start running `job` on the worker thread
    ///
    /// Does nothing if already running.
    pub fn start<F>(&mut self, mut job: F) -> io::Result<()>
    where
        F: FnMut() + Send + 'static,
    {
        if self.handle.is_some() {
            log::warn!("Scheduler already running");
            return Ok(());
        }

        let (stop_tx, stop_rx) = mpsc::channel::<()>();
        let running = Arc::clone(&self.running);
        let ticks = Arc::clone(&self.ticks);
        let interval = self.config.interval;
        let first_run = if self.config.run_immediately {
            Duration::ZERO
        } else {
            interval
        };

        running.store(true, Ordering::SeqCst);

        let spawned = thread::Builder::new()
            .name("alert-scheduler".to_string())
            .spawn(move || {
                log::info!("Scheduler started (interval: {:?})", interval);
                let mut next_run = Instant::now() + first_run;

                loop {
                    let wait = next_run.saturating_duration_since(Instant::now());
                    match stop_rx.recv_timeout(wait) {
                        Err(RecvTimeoutError::Timeout) => {}
                        Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                    }

                    let started = Instant::now();
                    job();
                    ticks.fetch_add(1, Ordering::SeqCst);

                    let elapsed = started.elapsed();
                    if elapsed > interval {
                        log::warn!(
                            "Tick took {:?}, longer than the {:?} interval",
                            elapsed,
                            interval
                        );
                    }
                    next_run = started + interval;
                }

                running.store(false, Ordering::SeqCst);
                log::info!("Scheduler stopped");
            });

        match spawned {
            Ok(handle) => {
                self.stop_tx = Some(stop_tx);
                self.handle = Some(handle);
                Ok(())
            }
            Err(e) => {
                self.running.store(false, Ordering::SeqCst);
                Err(e)
            }
        }
    }

    /// Stop the scheduler
    ///
    /// Waits for an in-flight tick to finish; never interrupts one.
    pub fn stop(&mut self) {
        if let Some(stop_tx) = self.stop_tx.take() {
            let _ = stop_tx.send(());
        }

        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::error!("Scheduler thread panicked");
                self.running.store(false, Ordering::SeqCst);
            }
        }
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new(SchedulerConfig::default())
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        self.stop();
    }
}
