//! Custom error types for VenueSender
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions.
//!
//! Errors fall into three severity bands:
//!
//! - fatal at startup: [`VenueError::Config`], [`VenueError::DatabaseUnavailable`]
//! - non-fatal, re-prompt or skip: input validation, per-row data errors,
//!   duplicate selections
//! - per-operation: credential handling and per-message dispatch errors, which
//!   abort the operation that raised them but never the whole process

use thiserror::Error;

/// The main error type for VenueSender operations
#[derive(Error, Debug)]
pub enum VenueError {
    /// Configuration loading or sanity-check failures (fatal at startup)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Neither the CSV file nor the encrypted database could be opened
    /// (fatal at startup)
    #[error("No venue source available: {0}")]
    DatabaseUnavailable(String),

    /// A malformed venue row (wrong field count, non-numeric capacity);
    /// the row is skipped and loading continues
    #[error("Data format error: {0}")]
    DataFormat(String),

    /// Interactive input that is not a valid menu token
    #[error("Invalid input: {0}")]
    InputFormat(String),

    /// A 1-based menu index outside the displayed range
    #[error("Index {index} is out of range (1-{max})")]
    IndexOutOfRange { index: usize, max: usize },

    /// A venue was already selected earlier in this session
    #[error("Venue already selected: {venue}")]
    AlreadySelected { venue: String },

    /// Encryption of a secret failed
    #[error("Encryption error: {0}")]
    Encryption(String),

    /// Authentication tag verification failed (tampered or corrupt secret)
    #[error("Decryption error: {0}")]
    Decryption(String),

    /// A sealed secret is structurally invalid (too short to hold
    /// nonce and tag)
    #[error("Secret format error: {0}")]
    SecretFormat(String),

    /// SMTP connection-level failure (network, TLS, timeout)
    #[error("Connection error: {0}")]
    Connection(String),

    /// SMTP authentication rejected
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Any other transport failure while delivering a message
    #[error("Transport error: {0}")]
    Transport(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),
}

impl VenueError {
    /// Check if this error should terminate startup
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Config(_) | Self::DatabaseUnavailable(_))
    }

    /// Check if this is a re-promptable interactive error
    pub fn is_interactive(&self) -> bool {
        matches!(
            self,
            Self::InputFormat(_) | Self::IndexOutOfRange { .. } | Self::AlreadySelected { .. }
        )
    }
}

// Implement From traits for common error types

impl From<std::io::Error> for VenueError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for VenueError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias for VenueSender operations
pub type VenueResult<T> = Result<T, VenueError>;
