//! pricealert - cryptocurrency price alert library
//!
//! This library provides the core functionality for watching cryptocurrency
//! prices and notifying recipients when a price leaves its configured band.
//!
//! # Modules
//!
//! - [`alerts`]: Rule store, registration and evaluation
//! - [`cli`]: Command-line interface definitions
//! - [`commands`]: Command handlers
//! - [`config`]: Configuration system
//! - [`error`]: Error types
//! - [`notify`]: Notification transports
//! - [`price`]: Price source abstraction
//! - [`services`]: Background scheduling

pub mod alerts;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod notify;
pub mod price;
pub mod services;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use error::{AppError, Result};
