//! Strategy selection between local and remote sync

use tracing::debug;

use crate::config::SyncConfig;
use crate::record::Syncable;
use crate::sync::deferred::Promise;
use crate::sync::dispatcher::LocalSync;
use crate::sync::method::Method;
use crate::sync::options::SyncOptions;

/// Anything that can carry out a sync call.
///
/// Remote strategies follow the same delivery contract as [`LocalSync`]:
/// callbacks, then `complete`, and optionally a promise.
pub trait SyncStrategy {
    fn sync(
        &self,
        method: Method,
        model: &mut dyn Syncable,
        options: SyncOptions<'_>,
    ) -> Option<Promise>;
}

impl SyncStrategy for LocalSync {
    fn sync(
        &self,
        method: Method,
        model: &mut dyn Syncable,
        options: SyncOptions<'_>,
    ) -> Option<Promise> {
        LocalSync::sync(self, method, model, options)
    }
}

/// A strategy backed by a plain function or closure.
#[derive(Debug, Clone, Copy)]
pub struct FnStrategy<F>(F);

/// Wrap a closure as a [`SyncStrategy`], typically the host's remote sync.
pub fn remote_fn<F>(f: F) -> FnStrategy<F>
where
    F: Fn(Method, &mut dyn Syncable, SyncOptions<'_>) -> Option<Promise>,
{
    FnStrategy(f)
}

impl<F> SyncStrategy for FnStrategy<F>
where
    F: Fn(Method, &mut dyn Syncable, SyncOptions<'_>) -> Option<Promise>,
{
    fn sync(
        &self,
        method: Method,
        model: &mut dyn Syncable,
        options: SyncOptions<'_>,
    ) -> Option<Promise> {
        (self.0)(method, model, options)
    }
}

/// Which strategy a call goes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Local,
    Remote,
}

/// Pick local sync when the model or its collection has a store, unless the
/// call forces the remote path.
pub fn select_strategy(model: &dyn Syncable, options: &SyncOptions<'_>) -> Strategy {
    if !options.flags().ajax_sync && model.resolve_store().is_some() {
        Strategy::Local
    } else {
        Strategy::Remote
    }
}

/// General sync entry point.
///
/// `sync` routes each call; `local_sync` and `remote_sync` stay callable on
/// their own so either path can be forced explicitly.
#[derive(Debug, Clone)]
pub struct SyncRouter<R> {
    local: LocalSync,
    remote: R,
}

impl<R: SyncStrategy> SyncRouter<R> {
    pub fn new(config: SyncConfig, remote: R) -> Self {
        Self {
            local: LocalSync::new(config),
            remote,
        }
    }

    pub fn strategy_for(&self, model: &dyn Syncable, options: &SyncOptions<'_>) -> Strategy {
        select_strategy(model, options)
    }

    /// Route a call to local or remote sync.
    pub fn sync(
        &self,
        method: Method,
        model: &mut dyn Syncable,
        options: SyncOptions<'_>,
    ) -> Option<Promise> {
        let strategy = self.strategy_for(&*model, &options);
        debug!(%method, ?strategy, "routing sync");
        match strategy {
            Strategy::Local => self.local.sync(method, model, options),
            Strategy::Remote => self.remote.sync(method, model, options),
        }
    }

    /// Always use the local store.
    pub fn local_sync(
        &self,
        method: Method,
        model: &mut dyn Syncable,
        options: SyncOptions<'_>,
    ) -> Option<Promise> {
        self.local.sync(method, model, options)
    }

    /// Always use the remote strategy.
    pub fn remote_sync(
        &self,
        method: Method,
        model: &mut dyn Syncable,
        options: SyncOptions<'_>,
    ) -> Option<Promise> {
        self.remote.sync(method, model, options)
    }

    pub fn local(&self) -> &LocalSync {
        &self.local
    }

    pub fn remote(&self) -> &R {
        &self.remote
    }
}

impl<R: SyncStrategy> SyncStrategy for SyncRouter<R> {
    fn sync(
        &self,
        method: Method,
        model: &mut dyn Syncable,
        options: SyncOptions<'_>,
    ) -> Option<Promise> {
        SyncRouter::sync(self, method, model, options)
    }
}
