//! Errors raised at the engine boundary.

use std::path::PathBuf;

use thiserror::Error;

use crate::base::DecodeError;

/// Failures loading or invoking the statement engine.
///
/// Malformed schema input is never an `EngineError`; it surfaces as a
/// terminal [`StatusCode`](super::StatusCode) instead.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The engine module file does not exist.
    #[error("engine module not found at {}", path.display())]
    ModuleNotFound { path: PathBuf },

    /// The engine module exists but could not be read.
    #[error("failed to read engine module {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The module bytes are not a loadable engine.
    #[error("invalid engine module: {0}")]
    InvalidModule(String),

    /// The host runtime rejected the module.
    #[error("failed to instantiate engine: {0}")]
    Instantiate(String),

    /// Loading was abandoned because the request was cancelled.
    #[error("engine load cancelled")]
    Cancelled,

    /// A scratch allocation did not fit in the engine stack.
    #[error("scratch stack overflow: requested {requested} bytes, {available} available")]
    StackOverflow { requested: u32, available: u32 },

    /// The engine aborted while running.
    #[error("engine trapped: {0}")]
    Trap(String),

    /// Engine memory did not match the expected record layout.
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

impl EngineError {
    /// Create an invalid module error.
    pub fn invalid_module(message: impl Into<String>) -> Self {
        Self::InvalidModule(message.into())
    }

    /// Create an instantiation error.
    pub fn instantiate(message: impl Into<String>) -> Self {
        Self::Instantiate(message.into())
    }

    /// Create a trap error.
    pub fn trap(message: impl Into<String>) -> Self {
        Self::Trap(message.into())
    }
}
