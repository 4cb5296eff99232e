//! Error types for preprint-submit

use crate::wizard::Section;
use thiserror::Error;

/// Errors produced by the wizard, its collaborators and the CLI
#[derive(Debug, Error)]
pub enum Error {
    /// A record store operation was rejected
    #[error("store error: {0}")]
    Store(String),

    /// The REST API answered with an error status
    #[error("API error: {0}")]
    Api(String),

    /// Transport-level HTTP failure
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON (de)serialization failure
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Filesystem failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Missing or invalid credentials
    #[error("authentication error: {0}")]
    Auth(String),

    /// Invalid configuration
    #[error("configuration error: {0}")]
    Config(String),

    /// Unparseable input (manifest, URL, date)
    #[error("parse error: {0}")]
    Parse(String),

    /// Local validation failure
    #[error("validation failed: {0}")]
    Validation(String),

    /// A section cannot be committed because its pending values are invalid
    #[error("section {0} has invalid fields")]
    SectionInvalid(Section),

    /// The container/file binding has been locked
    #[error("upload is locked; container and file can no longer change")]
    Locked,

    /// Another commit or submission has not resolved yet
    #[error("another operation is still in flight: {0}")]
    OperationInFlight(String),

    /// The final submission is already running
    #[error("submission already in progress")]
    SubmitInProgress,

    /// A required record is missing
    #[error("not found: {0}")]
    NotFound(String),

    /// The requested action is not valid from the current state
    #[error("invalid transition: {0}")]
    InvalidTransition(String),

    /// A commit failed and the corrective save failed as well
    #[error("rollback failed after '{original}': {rollback}")]
    RollbackFailed {
        /// Error that triggered the rollback
        original: String,
        /// Error raised while pushing the rollback
        rollback: String,
    },

    /// Internal invariant violation
    #[error("internal error: {0}")]
    Internal(String),
}

/// Result alias using the crate error type
pub type Result<T> = std::result::Result<T, Error>;
