//! Error types for the FACTZ core library.

use thiserror::Error;

/// Top-level error type for all FACTZ operations.
#[derive(Error, Debug)]
pub enum FactzError {
    /// A textual payload could not be parsed as the cell's value kind.
    #[error("invalid {kind} payload: {raw:?}")]
    Parse {
        /// The value kind that rejected the payload.
        kind: &'static str,
        /// The offending input, for diagnostics.
        raw: String,
    },

    /// The cell kind defines no load encoding (derived cells are recomputed,
    /// never restored).
    #[error("value '{0}' does not support loading")]
    LoadUnsupported(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Generic I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience Result type alias.
pub type Result<T> = std::result::Result<T, FactzError>;
