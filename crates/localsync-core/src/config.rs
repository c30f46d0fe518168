//! Sync configuration
//!
//! Host-wide settings that used to be implied by the environment: which
//! callback calling convention the host expects, and whether calls hand back
//! a promise.

use serde::{Deserialize, Serialize};

/// Calling convention for `success`/`error` callbacks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CallbackStyle {
    /// `success(response)`, `error(message)`
    #[default]
    Current,
    /// `success(model, response, options)`, `error(model, message, options)`
    Legacy,
}

/// Dispatcher configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    pub callback_style: CallbackStyle,
    /// Create a deferred per call and return its promise.
    pub promises: bool,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            callback_style: CallbackStyle::Current,
            promises: true,
        }
    }
}

impl SyncConfig {
    /// Default settings with legacy positional callbacks.
    pub fn legacy() -> Self {
        Self {
            callback_style: CallbackStyle::Legacy,
            ..Self::default()
        }
    }

    /// Callbacks only, no promise returned.
    pub fn without_promises(mut self) -> Self {
        self.promises = false;
        self
    }

    /// Parse a JSON config document. Missing fields take their defaults.
    pub fn from_json(input: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(input)
    }
}
