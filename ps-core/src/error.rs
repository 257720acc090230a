//! Global error types for the phone simulator.
//!
//! All error categories are unified into a single `PsError` enum. The three
//! categories the screens care about are `StoreInit` (the store cannot be
//! opened), `Query` (one operation failed) and `Validation` (a required
//! field was empty and the call never reached the store).

use thiserror::Error;

/// Convenience type alias for Results using PsError.
pub type PsResult<T> = Result<T, PsError>;

/// Unified error type covering all error categories in the phone simulator.
#[derive(Error, Debug)]
pub enum PsError {
    // -- Configuration errors --
    /// Failed to load or parse application configuration.
    #[error("configuration error: {0}")]
    Config(String),

    // -- Store errors --
    /// The store could not be opened or created. Every facade call fails
    /// with this until initialization is retried successfully.
    #[error("store initialization failed: {0}")]
    StoreInit(String),

    /// A single query or mutation failed.
    #[error("query failed: {0}")]
    Query(String),

    /// Database connection pool error.
    #[error("connection pool error: {0}")]
    Pool(String),

    /// Database integrity check failed.
    #[error("database integrity check failed: {0}")]
    IntegrityCheck(String),

    // -- Caller errors --
    /// A required field was empty or malformed.
    #[error("{0}")]
    Validation(String),

    // -- File/IO errors --
    /// File system operation failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),

    // -- Service errors --
    /// A service failed to initialize.
    #[error("service init error: {0}")]
    ServiceInit(String),

    /// A service is not yet initialized.
    #[error("service not initialized: {0}")]
    ServiceNotInitialized(String),

    // -- Generic --
    /// An unexpected internal error.
    #[error("internal error: {0}")]
    Internal(String),

    /// Wrapping anyhow errors for interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PsError {
    /// Shorthand for a validation failure.
    pub fn validation(msg: impl Into<String>) -> Self {
        PsError::Validation(msg.into())
    }

    /// Whether this error was raised before reaching the store.
    pub fn is_validation(&self) -> bool {
        matches!(self, PsError::Validation(_))
    }

    /// Whether the store itself is unavailable, as opposed to a single
    /// operation failing.
    pub fn is_store_unavailable(&self) -> bool {
        matches!(self, PsError::StoreInit(_) | PsError::Pool(_))
    }
}

impl From<serde_json::Error> for PsError {
    fn from(e: serde_json::Error) -> Self {
        PsError::Serialization(e.to_string())
    }
}

impl From<toml::de::Error> for PsError {
    fn from(e: toml::de::Error) -> Self {
        PsError::Config(e.to_string())
    }
}
