//! Per-call sync options and callback calling conventions

use std::fmt;

use serde_json::Value;

use crate::config::CallbackStyle;
use crate::sync::deferred::Deferred;
use crate::sync::dispatcher::SyncOutcome;

/// Flags of a sync call, passed back to legacy-style callbacks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncFlags {
    /// Force the remote strategy even if a local store resolves.
    pub ajax_sync: bool,
}

/// How a callback is being invoked.
///
/// `Current` carries only the payload. `Legacy` is the positional form
/// `(model, payload, options)` used by older hosts, selected through
/// [`CallbackStyle::Legacy`].
#[derive(Debug)]
pub enum Invocation<'r, T: ?Sized> {
    Current(&'r T),
    Legacy {
        model: &'r Value,
        payload: &'r T,
        options: SyncFlags,
    },
}

impl<'r, T: ?Sized> Invocation<'r, T> {
    /// The response (for `success`) or message (for `error`).
    pub fn payload(&self) -> &'r T {
        match *self {
            Invocation::Current(payload) => payload,
            Invocation::Legacy { payload, .. } => payload,
        }
    }

    /// The model, only passed in the legacy form.
    pub fn model(&self) -> Option<&'r Value> {
        match *self {
            Invocation::Current(_) => None,
            Invocation::Legacy { model, .. } => Some(model),
        }
    }

    fn build(
        style: CallbackStyle,
        model: &'r Value,
        payload: &'r T,
        options: SyncFlags,
    ) -> Self {
        match style {
            CallbackStyle::Current => Invocation::Current(payload),
            CallbackStyle::Legacy => Invocation::Legacy {
                model,
                payload,
                options,
            },
        }
    }
}

type SuccessCallback<'a> = Box<dyn FnOnce(Invocation<'_, Value>) + 'a>;
type ErrorCallback<'a> = Box<dyn FnOnce(Invocation<'_, str>) + 'a>;
type CompleteCallback<'a> = Box<dyn FnOnce(Option<&Value>) + 'a>;

/// Callbacks and flags for one sync call.
///
/// Each callback runs at most once. `complete` always runs last, with
/// whatever response the operation produced, falsy values included.
#[derive(Default)]
pub struct SyncOptions<'a> {
    success: Option<SuccessCallback<'a>>,
    error: Option<ErrorCallback<'a>>,
    complete: Option<CompleteCallback<'a>>,
    flags: SyncFlags,
}

impl<'a> SyncOptions<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_success<F>(mut self, f: F) -> Self
    where
        F: FnOnce(Invocation<'_, Value>) + 'a,
    {
        self.success = Some(Box::new(f));
        self
    }

    pub fn on_error<F>(mut self, f: F) -> Self
    where
        F: FnOnce(Invocation<'_, str>) + 'a,
    {
        self.error = Some(Box::new(f));
        self
    }

    pub fn on_complete<F>(mut self, f: F) -> Self
    where
        F: FnOnce(Option<&Value>) + 'a,
    {
        self.complete = Some(Box::new(f));
        self
    }

    /// Force the remote strategy for this call.
    pub fn ajax_sync(mut self, force: bool) -> Self {
        self.flags.ajax_sync = force;
        self
    }

    pub fn flags(&self) -> SyncFlags {
        self.flags
    }

    /// Deliver an outcome: `success` or `error`, then the deferred, then
    /// `complete`.
    ///
    /// Strategies outside this crate use this to honour the same contract
    /// as local sync.
    pub fn deliver(
        self,
        style: CallbackStyle,
        model: &Value,
        outcome: &SyncOutcome,
        deferred: Option<Deferred>,
    ) {
        let SyncOptions {
            success,
            error,
            complete,
            flags,
        } = self;

        match outcome {
            SyncOutcome::Success(response) => {
                if let Some(success) = success {
                    success(Invocation::build(style, model, response, flags));
                }
                if let Some(deferred) = deferred {
                    deferred.resolve(response.clone());
                }
            }
            SyncOutcome::Failure { message, .. } => {
                if let Some(error) = error {
                    error(Invocation::build(style, model, message.as_str(), flags));
                }
                if let Some(deferred) = deferred {
                    deferred.reject(message.clone());
                }
            }
        }

        if let Some(complete) = complete {
            complete(outcome.response());
        }
    }
}

impl fmt::Debug for SyncOptions<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncOptions")
            .field("success", &self.success.is_some())
            .field("error", &self.error.is_some())
            .field("complete", &self.complete.is_some())
            .field("flags", &self.flags)
            .finish()
    }
}
