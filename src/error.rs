// src/error.rs

//! Unified error handling for the homework bot.

use std::fmt;

use thiserror::Error;

/// Result type alias for bot operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// Transport-level failure (DNS, connect, TLS, body read)
    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),

    /// The review API answered with something other than 200 OK
    #[error("Unexpected HTTP status {status} from {endpoint}")]
    BadStatus { status: u16, endpoint: String },

    /// The review API reported an error inside a 200 response
    #[error("API error: {0}")]
    Api(String),

    /// Response body has the wrong shape or types
    #[error("Response format error: {0}")]
    Format(String),

    /// Message delivery to the chat failed
    #[error("Messenger error: {0}")]
    Messenger(String),

    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration or credentials error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),
}

impl AppError {
    /// Create a bad status error.
    pub fn bad_status(status: u16, endpoint: impl Into<String>) -> Self {
        Self::BadStatus {
            status,
            endpoint: endpoint.into(),
        }
    }

    /// Create an upstream API error.
    pub fn api(message: impl fmt::Display) -> Self {
        Self::Api(message.to_string())
    }

    /// Create a response format error.
    pub fn format(message: impl Into<String>) -> Self {
        Self::Format(message.into())
    }

    /// Create a messenger error.
    pub fn messenger(message: impl fmt::Display) -> Self {
        Self::Messenger(message.to_string())
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}
