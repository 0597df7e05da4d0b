//! Unified error types for the budgeting service.
//!
//! Every failure a handler can surface is one of these kinds. The pure core
//! functions (policy, ledger, history) raise no domain errors themselves;
//! everything here originates at the boundary: gateway calls, auth checks,
//! and input validation.

use thiserror::Error;

/// Crate-wide error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Application configuration is missing or malformed.
    #[error("configuration error: {message}")]
    Config {
        /// Description of the configuration problem
        message: String,
    },

    /// Input failed boundary validation (e.g. percentages not summing to 100).
    #[error("validation failed: {message}")]
    Validation {
        /// Description of what was rejected
        message: String,
    },

    /// No valid session for the request.
    #[error("no active session")]
    Unauthenticated,

    /// Acting on a resource owned by another user.
    #[error("not allowed: {message}")]
    Unauthorized {
        /// Description of the denied action
        message: String,
    },

    /// A referenced record is absent.
    #[error("{what} not found")]
    NotFound {
        /// What was looked up (e.g. `"expense 42"`)
        what: String,
    },

    /// Creation would duplicate a record that must be unique.
    #[error("{what} already exists")]
    AlreadyExists {
        /// What already exists (e.g. `"monthly budget for 2024-05"`)
        what: String,
    },

    /// A derived record references a parent that disappeared.
    /// This signals an inconsistent reference and is never retried.
    #[error("inconsistent state: {message}")]
    InconsistentState {
        /// Description of the broken reference
        message: String,
    },

    /// Persistence gateway failure (connection, transaction, commit).
    #[error("database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Session token could not be issued or verified.
    #[error("session token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    /// I/O error (server socket, dotenv file).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience `Result` type.
pub type Result<T> = std::result::Result<T, Error>;
