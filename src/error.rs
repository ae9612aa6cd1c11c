//! Error types for the non-simulation layers.
//!
//! The simulation itself has no failure modes: terminal game events are
//! reported as [`crate::sim::SessionEnded`] values, not errors.

use std::io;

use thiserror::Error;

/// Score store failures. Never fatal to a session.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Malformed score file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Score store unavailable: {0}")]
    Unavailable(String),
}

/// Configuration loading failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("Parse error in '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid tuning value `{field}`: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

/// Errors raised before a session can start.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("Username cannot be empty")]
    BlankUsername,
}
