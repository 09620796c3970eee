//! Error types and result aliases for the ctxlog library.
//!
//! This module defines the core error type [`LogError`] and the [`Result`] type alias
//! used throughout the library. Attribute resolution itself never fails; errors come from
//! sinks (writers, user handlers) and from configuration parsing.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LogError {
    #[error("passing record to inner handler: {source}")]
    HandlerError {
        #[source]
        source: Box<LogError>,
    },

    #[error("Sink error: {0}")]
    SinkError(String),

    #[error("invalid log level: {0}")]
    InvalidLevel(String),

    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl LogError {
    /// Wrap an error returned by a downstream handler.
    pub fn handler(source: LogError) -> Self {
        LogError::HandlerError {
            source: Box::new(source),
        }
    }
}

pub type Result<T> = std::result::Result<T, LogError>;
