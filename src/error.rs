//! Error types for vecscore.
//!
//! Only configuration problems are fatal. Anything that goes wrong while a
//! single document is being scored degrades to a score of `0.0` and never
//! surfaces as a [`VecScoreError`] to the query issuer.
//!
//! # Examples
//!
//! ```
//! use vecscore::error::{Result, VecScoreError};
//!
//! fn bind_field(params: &serde_json::Value) -> Result<String> {
//!     params
//!         .get("field")
//!         .and_then(|v| v.as_str())
//!         .map(str::to_string)
//!         .ok_or_else(|| VecScoreError::config("Missing parameter [field]"))
//! }
//!
//! assert!(bind_field(&serde_json::json!({})).is_err());
//! ```

use std::io;

use thiserror::Error;

/// The main error type for vecscore operations.
#[derive(Error, Debug)]
pub enum VecScoreError {
    /// I/O errors (reading parameter or document files)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Fatal query configuration errors: missing parameters, unknown
    /// methods, unknown script sources or a wrong script context.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Malformed stored bytes outside of the scoring loop
    #[error("Decode error: {0}")]
    Decode(String),

    /// Failures raised by a host value accessor
    #[error("Accessor error: {0}")]
    Accessor(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error for other cases
    #[error("Error: {0}")]
    Other(String),

    /// Generic anyhow error
    #[error("Anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

/// Result type alias for operations that may fail with VecScoreError.
pub type Result<T> = std::result::Result<T, VecScoreError>;

impl VecScoreError {
    /// Create a new configuration error.
    pub fn config<S: Into<String>>(msg: S) -> Self {
        VecScoreError::Config(msg.into())
    }

    /// Create a new decode error.
    pub fn decode<S: Into<String>>(msg: S) -> Self {
        VecScoreError::Decode(msg.into())
    }

    /// Create a new accessor error.
    pub fn accessor<S: Into<String>>(msg: S) -> Self {
        VecScoreError::Accessor(msg.into())
    }

    /// Create a new invalid argument error.
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        VecScoreError::Other(format!("Invalid argument: {}", msg.into()))
    }

    /// Whether this error must abort the whole query.
    pub fn is_config(&self) -> bool {
        matches!(self, VecScoreError::Config(_))
    }
}
