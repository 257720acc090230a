//! Phone Simulator Core - Foundation types, error handling, configuration, and logging.
//!
//! This crate provides the shared foundation used by all other phone simulator crates:
//! - Application configuration (database, notes, status bar, simulation)
//! - Global error types covering store, query and validation failures
//! - Structured logging with tracing
//! - Platform directory resolution
//! - Common constants (setting keys, routes, seed values)

pub mod config;
pub mod error;
pub mod logging;
pub mod platform;
pub mod constants;

// Re-export commonly used items at the crate root
pub use config::{AppConfig, ConfigHandle};
pub use error::{PsError, PsResult};
pub use logging::init_logging;
