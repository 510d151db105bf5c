//! Error taxonomy for the lead pipeline core

use thiserror::Error;

/// Result alias used across the workspace
pub type Result<T> = std::result::Result<T, Error>;

/// Core errors
///
/// Validation, not-found and conflict errors are detected before any
/// mutation and returned synchronously. Delivery errors are handled
/// per-item with a compensating status revert rather than aborting the
/// whole dispatch batch.
#[derive(Error, Debug)]
pub enum Error {
    /// Missing or malformed field on an inbound request
    #[error("invalid field `{field}`: {message}")]
    Validation { field: String, message: String },

    /// Referenced lead/profile does not exist or belongs to another company
    #[error("not found: {0}")]
    NotFound(String),

    /// Activation batch would exceed the daily capacity
    #[error("daily activation limit exceeded: {remaining} activation(s) remaining today")]
    QuotaExceeded { remaining: u32 },

    /// One or more leads are not in the expected source state
    #[error("conflict: {0}")]
    Conflict(String),

    /// Outbound contact-initiation call failed
    #[error("upstream delivery failed: {0}")]
    UpstreamDelivery(String),

    /// Persisted store unreachable
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),
}

impl Error {
    /// Create a validation error for a named field
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a not-found error
    pub fn not_found(what: impl Into<String>) -> Self {
        Error::NotFound(what.into())
    }

    /// Create a conflict error
    pub fn conflict(message: impl Into<String>) -> Self {
        Error::Conflict(message.into())
    }
}
