//! Background services
//!
//! Services own the long-running parts of the watcher.

pub mod scheduler;

pub use scheduler::{Scheduler, SchedulerConfig};
