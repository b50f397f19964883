//! Error types for matchql.

use thiserror::Error;

/// The main error type for matchql operations.
///
/// Programmer mistakes made while *building* a query (a function template
/// whose slots don't match its arguments, a join without an ON condition)
/// panic at construction time instead of showing up here.
#[derive(Debug, Error)]
pub enum MatchError {
    /// The table name of a source or join target could not be determined.
    #[error("Cannot resolve table name: {0}")]
    UnresolvedTable(String),

    /// An update was requested without any column to set.
    #[error("Nothing to update on table '{table}'")]
    NothingToUpdate { table: String },

    /// The executor found no row for a single-row fetch.
    #[error("Record not found")]
    RecordNotFound,

    /// Query execution error reported by the database driver.
    #[error("Execution error: {0}")]
    Execution(String),

    /// Malformed query document.
    #[error("Invalid query document: {0}")]
    Document(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON decoding error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML decoding error.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl MatchError {
    /// Create a table resolution error.
    pub fn unresolved(what: impl Into<String>) -> Self {
        Self::UnresolvedTable(what.into())
    }

    /// Create a document error.
    pub fn document(message: impl Into<String>) -> Self {
        Self::Document(message.into())
    }
}

/// Result type alias for matchql operations.
pub type MatchResult<T> = Result<T, MatchError>;
