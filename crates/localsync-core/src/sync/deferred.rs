//! One-shot deferred/promise pair
//!
//! The dispatcher settles a [`Deferred`] synchronously, inside the same
//! `sync` call that ran the store operation. Any asynchrony a caller sees
//! comes from awaiting the [`Promise`], never from the dispatcher.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use serde_json::Value;
use tokio::sync::oneshot;
use tokio::sync::oneshot::error::TryRecvError;

use crate::sync::error::SyncError;

type Settlement = Result<Value, SyncError>;

/// Settling half. Consumed by `resolve` or `reject`, so it settles at most once.
#[derive(Debug)]
pub struct Deferred {
    tx: oneshot::Sender<Settlement>,
}

/// Observing half, returned from `sync`.
#[derive(Debug)]
pub struct Promise {
    rx: oneshot::Receiver<Settlement>,
}

impl Deferred {
    /// Create a linked deferred/promise pair.
    pub fn new() -> (Deferred, Promise) {
        let (tx, rx) = oneshot::channel();
        (Deferred { tx }, Promise { rx })
    }

    pub fn resolve(self, value: Value) {
        // A dropped promise means nobody is listening.
        let _ = self.tx.send(Ok(value));
    }

    pub fn reject(self, message: impl Into<String>) {
        let _ = self.tx.send(Err(SyncError::Failed(message.into())));
    }
}

impl Promise {
    /// Take the settlement without waiting.
    ///
    /// Returns `None` while pending. The value can be taken once; later calls
    /// report `SyncError::Dropped`.
    pub fn try_take(&mut self) -> Option<Settlement> {
        match self.rx.try_recv() {
            Ok(settlement) => Some(settlement),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Closed) => Some(Err(SyncError::Dropped)),
        }
    }
}

impl Future for Promise {
    type Output = Settlement;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.rx)
            .poll(cx)
            .map(|received| received.unwrap_or(Err(SyncError::Dropped)))
    }
}
