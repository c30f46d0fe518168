//! Sync error types

use thiserror::Error;

/// Errors surfaced by the sync layer
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyncError {
    /// The operation failed; carries the message delivered to `error`
    #[error("{0}")]
    Failed(String),

    /// Verb not handled by the dispatcher
    #[error("unsupported sync method '{0}'")]
    UnsupportedMethod(String),

    /// The deferred was dropped without settling
    #[error("sync promise dropped before it settled")]
    Dropped,
}

impl SyncError {
    /// The failure message, as delivered to `error` callbacks.
    pub fn message(&self) -> String {
        self.to_string()
    }
}
