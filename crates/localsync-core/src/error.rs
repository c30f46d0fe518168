//! Store error types

use thiserror::Error;

/// Errors that can occur during store and backend operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The backing substrate could not be obtained
    #[error("storage environment unavailable: {0}")]
    EnvironmentUnavailable(String),

    /// A write was refused because the substrate is out of capacity
    #[error("quota exceeded writing '{key}': {requested} bytes over a limit of {limit}")]
    QuotaExceeded {
        key: String,
        requested: usize,
        limit: usize,
    },

    /// Any other backend fault
    #[error("{0}")]
    Backend(String),

    /// Record encode/decode error
    #[error("serialization error: {0}")]
    Serialization(String),

    /// The record has no value under its id attribute
    #[error("record has no '{id_attribute}'")]
    MissingId { id_attribute: String },

    /// Ids are comma-joined in the index, so they may not contain one
    #[error("invalid record id '{0}': ids must not contain ','")]
    InvalidId(String),
}

impl StoreError {
    /// Whether this fault is a persistence-capacity condition.
    pub fn is_quota_exceeded(&self) -> bool {
        matches!(self, StoreError::QuotaExceeded { .. })
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serialization(err.to_string())
    }
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;
