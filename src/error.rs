// src/error.rs

//! Unified error handling for the scanner application.

use std::fmt;

use thiserror::Error;

/// Result type alias for scanner operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// CSS selector parsing failed
    #[error("Invalid selector '{selector}': {message}")]
    Selector { selector: String, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Post source fetch failed for one account; isolated to that account
    #[error("Source error for @{handle}: {message}")]
    Source { handle: String, message: String },

    /// Persistence layer unreachable; fatal for the current scan cycle
    #[error("Store error: {0}")]
    Store(String),

    /// Uniqueness invariant violated on insert; callers treat this as a duplicate
    #[error("Duplicate {key}: {value}")]
    DuplicateKey { key: &'static str, value: String },

    /// No monitored account with the given handle
    #[error("Account not found: @{0}")]
    AccountNotFound(String),
}

impl AppError {
    /// Create a selector parsing error.
    pub fn selector(selector: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Selector {
            selector: selector.into(),
            message: message.to_string(),
        }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a source error scoped to one account handle.
    pub fn source(handle: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Source {
            handle: handle.into(),
            message: message.to_string(),
        }
    }

    /// Create a store error.
    pub fn store(message: impl fmt::Display) -> Self {
        Self::Store(message.to_string())
    }

    /// Create a duplicate-key error for the named uniqueness key.
    pub fn duplicate(key: &'static str, value: impl Into<String>) -> Self {
        Self::DuplicateKey {
            key,
            value: value.into(),
        }
    }

    /// Whether this error is a store uniqueness conflict.
    ///
    /// Conflicts are the safety net for concurrent scans and are handled as
    /// duplicates rather than failures.
    pub fn is_duplicate(&self) -> bool {
        matches!(self, Self::DuplicateKey { .. })
    }
}
