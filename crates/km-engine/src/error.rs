//! Error types for the kingdom engine.

use thiserror::Error;

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors that can occur while running kingdom commands.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The command does not make sense for the kingdom as it is.
    #[error("invalid action: {0}")]
    InvalidAction(String),

    /// The store could not read or write a kingdom.
    #[error("persistence error: {0}")]
    Persistence(String),

    /// A stored kingdom or settings file is not valid JSON for its type.
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// The ledger thread has shut down.
    #[error("the kingdom ledger is no longer running")]
    LedgerClosed,

    /// Check or dice error.
    #[error("{0}")]
    Mech(#[from] km_mechanics::MechError),

    /// Core data error.
    #[error("{0}")]
    Core(#[from] km_core::KmError),
}

impl From<std::io::Error> for EngineError {
    fn from(err: std::io::Error) -> Self {
        Self::Persistence(err.to_string())
    }
}
