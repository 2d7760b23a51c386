//! Error types and handling for the pharmacy locator
//!
//! The `Display` text of every search error is the message shown in the
//! status line, so it is written for the person at the keyboard. Transport
//! and decoding detail goes to the log instead.

use thiserror::Error;

/// Message shown when an error carries no text of its own
pub const FALLBACK_MESSAGE: &str = "Something went wrong.";

/// Main error type for the pharmacy locator
#[derive(Error, Debug)]
pub enum LocatorError {
    /// The submitted postal code or radius was rejected before any lookup
    #[error("{message}")]
    Validation { message: String },

    /// The geocoding service could not be reached or answered with an error
    #[error("{message}")]
    LookupFailure { message: String },

    /// The geocoding service answered but had no candidate for the code
    #[error("{message}")]
    NotFound { message: String },

    /// The places service could not be reached or answered with an error
    #[error("{message}")]
    QueryFailure { message: String },

    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl LocatorError {
    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new geocoding transport error
    pub fn lookup_failure<S: Into<String>>(message: S) -> Self {
        Self::LookupFailure {
            message: message.into(),
        }
    }

    /// Create a new not-found error
    pub fn not_found<S: Into<String>>(message: S) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Create a new places transport error
    pub fn query_failure<S: Into<String>>(message: S) -> Self {
        Self::QueryFailure {
            message: message.into(),
        }
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Get the text for the status line, falling back to a generic message
    #[must_use]
    pub fn user_message(&self) -> String {
        let message = self.to_string();
        if message.trim().is_empty() {
            FALLBACK_MESSAGE.to_string()
        } else {
            message
        }
    }

    /// Whether this error came from one of the remote services
    #[must_use]
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            LocatorError::LookupFailure { .. } | LocatorError::QueryFailure { .. }
        )
    }
}
