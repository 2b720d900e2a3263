//! Error types for taxi-glance.
//!
//! Defines the main error enum used throughout the application.

use thiserror::Error;

/// Main error type for taxi-glance operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GlanceError {
    /// The requested query name is not in the catalog (or none was given).
    #[error("Invalid or missing query selection{}", selection_suffix(.0))]
    InvalidSelection(String),

    /// The backend could not be reached (host unreachable, auth failed, refused, etc.)
    #[error("Connection error: {0}")]
    Connection(String),

    /// The backend answered with a non-success status.
    #[error("Backend error: {0}")]
    Backend(String),

    /// Query execution errors (syntax errors, unknown tables, bad payloads, etc.)
    #[error("Query error: {0}")]
    Query(String),

    /// Configuration errors (invalid config file, missing required fields, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal application errors (unexpected states, bugs, etc.)
    #[error("Internal error: {0}")]
    Internal(String),
}

fn selection_suffix(name: &str) -> String {
    if name.is_empty() {
        String::new()
    } else {
        format!(": '{name}'")
    }
}

impl GlanceError {
    /// Creates an invalid selection error for the given query name.
    pub fn invalid_selection(name: impl Into<String>) -> Self {
        Self::InvalidSelection(name.into())
    }

    /// Creates a connection error with the given message.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    /// Creates a backend status error with the given message.
    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }

    /// Creates a query error with the given message.
    pub fn query(msg: impl Into<String>) -> Self {
        Self::Query(msg.into())
    }

    /// Creates a configuration error with the given message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates an internal error with the given message.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Returns true for failures raised while talking to a backend.
    pub fn is_execution_error(&self) -> bool {
        matches!(
            self,
            Self::Connection(_) | Self::Backend(_) | Self::Query(_)
        )
    }

    /// Returns the error category as a string for display purposes.
    pub fn category(&self) -> &'static str {
        match self {
            Self::InvalidSelection(_) => "Invalid Selection",
            Self::Connection(_) => "Connection Error",
            Self::Backend(_) => "Backend Error",
            Self::Query(_) => "Query Error",
            Self::Config(_) => "Configuration Error",
            Self::Internal(_) => "Internal Error",
        }
    }
}

/// Result type alias using GlanceError.
pub type Result<T> = std::result::Result<T, GlanceError>;
