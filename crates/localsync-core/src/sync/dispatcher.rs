//! Store-backed sync
//!
//! [`dispatch`] runs one verb against the model's store and folds every
//! result into a [`SyncOutcome`]. [`LocalSync`] projects that outcome onto
//! the caller's callbacks and promise.

use serde_json::Value;
use tracing::{debug, warn};

use crate::config::SyncConfig;
use crate::error::StoreError;
use crate::record::Syncable;
use crate::store::Store;
use crate::sync::deferred::{Deferred, Promise};
use crate::sync::method::Method;
use crate::sync::options::SyncOptions;

/// Failure message when an operation produced nothing.
pub const RECORD_NOT_FOUND_MESSAGE: &str = "Record Not Found";

/// Failure message for a quota fault on a substrate that holds nothing.
pub const PRIVATE_BROWSING_MESSAGE: &str = "Private browsing is unsupported";

/// Result of one local sync operation.
#[derive(Debug, Clone, PartialEq)]
pub enum SyncOutcome {
    Success(Value),
    /// `response` is whatever the operation produced, possibly a falsy value.
    Failure {
        message: String,
        response: Option<Value>,
    },
}

impl SyncOutcome {
    fn not_found(response: Option<Value>) -> Self {
        SyncOutcome::Failure {
            message: RECORD_NOT_FOUND_MESSAGE.to_string(),
            response,
        }
    }

    /// A failure carrying no response, as remote strategies usually report.
    pub fn failure(message: impl Into<String>) -> Self {
        SyncOutcome::Failure {
            message: message.into(),
            response: None,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, SyncOutcome::Success(_))
    }

    /// The response handed to `complete`.
    pub fn response(&self) -> Option<&Value> {
        match self {
            SyncOutcome::Success(value) => Some(value),
            SyncOutcome::Failure { response, .. } => response.as_ref(),
        }
    }
}

/// Run `method` against the store the model resolves to.
///
/// Never fails: store faults, empty results and unresolvable stores all come
/// back as `SyncOutcome::Failure`.
pub fn dispatch(method: Method, model: &mut dyn Syncable) -> SyncOutcome {
    let Some(shared) = model.resolve_store() else {
        warn!(%method, "no store resolvable for model");
        return SyncOutcome::not_found(None);
    };
    let mut store = shared.lock();

    let result = match method {
        Method::Read => {
            if model.id().is_some() {
                store.find(&*model)
            } else {
                store.find_all().map(|records| Some(Value::Array(records)))
            }
        }
        Method::Create => store.create(&mut *model),
        Method::Update => store.update(&*model),
        Method::Delete => store.destroy(&*model).map(Some),
    };

    match result {
        Ok(Some(value)) if is_truthy(&value) => {
            debug!(store = %store.name(), %method, "local sync succeeded");
            SyncOutcome::Success(value)
        }
        Ok(response) => SyncOutcome::not_found(response),
        Err(err) => {
            let message = classify_fault(&err, &store);
            warn!(store = %store.name(), %method, error = %err, "local sync failed");
            SyncOutcome::failure(message)
        }
    }
}

/// Turn a store fault into the message delivered to callers.
fn classify_fault(err: &StoreError, store: &Store) -> String {
    if err.is_quota_exceeded() && matches!(store.size(), Ok(0)) {
        return PRIVATE_BROWSING_MESSAGE.to_string();
    }
    match err.to_string() {
        message if message.is_empty() => RECORD_NOT_FOUND_MESSAGE.to_string(),
        message => message,
    }
}

/// JSON truthiness: `null`, `false`, `0` and `""` are falsy.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// The store-backed sync strategy.
#[derive(Debug, Clone, Default)]
pub struct LocalSync {
    config: SyncConfig,
}

impl LocalSync {
    pub fn new(config: SyncConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Run `method` locally and deliver the outcome.
    ///
    /// Returns a promise when promises are enabled in the config.
    pub fn sync(
        &self,
        method: Method,
        model: &mut dyn Syncable,
        options: SyncOptions<'_>,
    ) -> Option<Promise> {
        let (deferred, promise) = if self.config.promises {
            let (deferred, promise) = Deferred::new();
            (Some(deferred), Some(promise))
        } else {
            (None, None)
        };

        let outcome = dispatch(method, model);
        options.deliver(
            self.config.callback_style,
            &model.to_json(),
            &outcome,
            deferred,
        );

        promise
    }
}
