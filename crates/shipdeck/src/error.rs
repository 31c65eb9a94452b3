//! Error types for shipdeck.
//!
//! This module defines all error types used throughout the shipdeck crate,
//! providing detailed context for debugging and user-friendly error messages.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// The remote operation an error originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Fetching the full ship list.
    List,
    /// Fetching a single ship.
    Get,
    /// Querying ships by field filters.
    Search,
    /// Creating a ship.
    Create,
    /// Replacing a ship's fields.
    Update,
    /// Deleting a ship.
    Delete,
    /// Probing the service health endpoint.
    Ping,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::List => write!(f, "fetch ships"),
            Self::Get => write!(f, "fetch ship"),
            Self::Search => write!(f, "search ships"),
            Self::Create => write!(f, "create ship"),
            Self::Update => write!(f, "update ship"),
            Self::Delete => write!(f, "delete ship"),
            Self::Ping => write!(f, "reach ship service"),
        }
    }
}

/// The main error type for shipdeck operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Store Errors ===
    /// A store call failed: non-success status or transport failure.
    #[error("failed to {operation}: {reason}")]
    Network {
        /// The operation that failed.
        operation: Operation,
        /// Status line or transport message.
        reason: String,
    },

    // === Session Errors ===
    /// No authenticated session is available.
    #[error("not signed in")]
    Unauthenticated,

    /// The session token could not be decoded.
    #[error("invalid session token: {message}")]
    InvalidToken {
        /// Description of what went wrong.
        message: String,
    },

    // === Input Errors ===
    /// User input could not be applied to the view.
    #[error("invalid input: {message}")]
    InvalidInput {
        /// What was wrong with the input.
        message: String,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to read a seed file.
    #[error("failed to read seed file {path}: {source}")]
    SeedRead {
        /// Path of the seed file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // === Generic Errors ===
    /// An internal error occurred (bug).
    #[error("internal error: {0}")]
    Internal(String),
}

/// A specialized Result type for shipdeck operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a new network error for the given operation.
    #[must_use]
    pub fn network(operation: Operation, reason: impl Into<String>) -> Self {
        Self::Network {
            operation,
            reason: reason.into(),
        }
    }

    /// Create a new invalid token error.
    #[must_use]
    pub fn invalid_token(message: impl Into<String>) -> Self {
        Self::InvalidToken {
            message: message.into(),
        }
    }

    /// Create a new invalid input error.
    #[must_use]
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Create a new internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Check if this error came from a store call.
    #[must_use]
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network { .. })
    }

    /// Check if this error means the user has to sign in first.
    #[must_use]
    pub fn is_unauthenticated(&self) -> bool {
        matches!(self, Self::Unauthenticated)
    }

    /// The operation a network error originated from.
    #[must_use]
    pub fn operation(&self) -> Option<Operation> {
        match self {
            Self::Network { operation, .. } => Some(*operation),
            _ => None,
        }
    }
}
