//! Teardown handles for a context cache

use crate::cache::{store::Cache, types::ClearReport};
use std::sync::Arc;
use tracing::{debug, warn};

/// Handle that tears down a cache
///
/// Every clone, and every handle returned by a repeated [`init`](crate::init)
/// on the same context chain, drives the same one-way clear. Only the first
/// [`cancel`](Teardown::cancel) purges anything; later calls are no-ops and
/// may come from any thread.
#[derive(Clone)]
pub struct Teardown {
    cache: Arc<Cache>,
}

impl Teardown {
    pub(crate) fn new(cache: Arc<Cache>) -> Self {
        Self { cache }
    }

    /// Tear the cache down. Returns true only for the call that cleared it.
    pub fn cancel(&self) -> bool {
        self.cancel_with_report().is_some()
    }

    /// Tear the cache down and return what was purged, if this call did it
    pub fn cancel_with_report(&self) -> Option<ClearReport> {
        let report = self.cache.clear();
        if report.is_none() {
            debug!(cache_id = %self.cache.id(), "Cache already cleared, teardown is a no-op");
        }
        report
    }

    /// Whether the cache has been torn down
    pub fn is_cancelled(&self) -> bool {
        self.cache.is_cleared()
    }

    /// Wrap this handle in a guard that cancels on drop
    pub fn guard(&self) -> TeardownGuard {
        TeardownGuard {
            teardown: self.clone(),
        }
    }
}

impl PartialEq for Teardown {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.cache, &other.cache)
    }
}

impl Eq for Teardown {}

impl std::fmt::Debug for Teardown {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Teardown")
            .field("cache_id", &self.cache.id())
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}

/// Scope guard that tears the cache down when dropped
///
/// ```rust
/// use ctxcache::{Context, TypedKey};
///
/// const USER: TypedKey<String> = TypedKey::new("user");
///
/// let (ctx, teardown) = ctxcache::init(&Context::background());
/// {
///     let _guard = teardown.guard();
///     ctxcache::declare(&ctx, &[USER]);
///     ctxcache::set(&ctx, &USER, "alice".to_string()).unwrap();
/// }
/// assert!(teardown.is_cancelled());
/// ```
#[must_use = "the cache is torn down as soon as the guard is dropped"]
#[derive(Debug)]
pub struct TeardownGuard {
    teardown: Teardown,
}

impl TeardownGuard {
    /// The handle this guard will cancel
    pub fn teardown(&self) -> &Teardown {
        &self.teardown
    }
}

impl Drop for TeardownGuard {
    fn drop(&mut self) {
        if std::thread::panicking() {
            warn!(
                cache_id = %self.teardown.cache.id(),
                "Tearing down context cache during panic unwind"
            );
        }
        self.teardown.cancel();
    }
}
