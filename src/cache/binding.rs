//! Binding between a [`Context`] and its cache
//!
//! These functions are the main entry points of the crate. Each one finds
//! the cache bound to the context chain and forwards to [`Cache`]. `declare`
//! and `keep_alive` are safe to call speculatively: they do nothing on a
//! context without a cache or after teardown. `set` and `get` report those
//! conditions as errors.

use crate::cache::{
    config::CacheConfig,
    key::TypedKey,
    store::Cache,
    teardown::Teardown,
    types::CacheStats,
};
use crate::context::{BoundCache, Context};
use crate::error::{CacheError, ErrorKind, Result};
use std::sync::Arc;
use tracing::{debug, warn};

/// Bind a cache with the default configuration to a context.
///
/// If the chain already carries a cache, the same context and a teardown
/// handle for that cache are returned; nothing new is allocated.
pub fn init(ctx: &Context) -> (Context, Teardown) {
    init_with_config(ctx, CacheConfig::default())
}

/// Bind a cache with the given configuration to a context.
///
/// An invalid configuration is replaced by the default one. The configuration
/// is ignored when the chain already carries a cache.
pub fn init_with_config(ctx: &Context, config: CacheConfig) -> (Context, Teardown) {
    if let Some(cache) = ctx.cache() {
        debug!(cache_id = %cache.id(), "Context already carries a cache, reusing it");
        return (ctx.clone(), Teardown::new(cache));
    }

    let config = match config.validate() {
        Ok(()) => config,
        Err(reason) => {
            warn!("Invalid cache configuration ({}), using defaults", reason);
            CacheConfig::default()
        }
    };

    let cache = Arc::new(Cache::new(config));
    let ctx = ctx.with_value(BoundCache(Arc::clone(&cache)));
    (ctx, Teardown::new(cache))
}

/// The cache bound to the context chain, for explicit passing
pub fn cache(ctx: &Context) -> Option<Arc<Cache>> {
    ctx.cache()
}

/// Declare keys of one value type; see [`Cache::declare`]
pub fn declare<T>(ctx: &Context, keys: &[TypedKey<T>])
where
    T: Send + Sync + 'static,
{
    if let Some(cache) = ctx.cache() {
        cache.declare(keys);
    }
}

/// Set the value of a declared key; see [`Cache::set`]
pub fn set<T>(ctx: &Context, key: &TypedKey<T>, value: T) -> Result<()>
where
    T: Send + Sync + 'static,
{
    bound(ctx, key)?.set(key, value)
}

/// Get the value of a declared and set key; see [`Cache::get`]
pub fn get<T>(ctx: &Context, key: &TypedKey<T>) -> Result<T>
where
    T: Clone + Send + Sync + 'static,
{
    bound(ctx, key)?.get(key)
}

/// Exempt a key from the teardown purge; see [`Cache::keep_alive`].
///
/// This only protects the entry from teardown. The data lives as long as
/// something holds the context (or the cache); a background task that needs
/// it must keep a clone of the context. Reads through [`get`] still fail
/// with `CacheAlreadyCleared` once the cache is torn down.
pub fn keep_alive<T: 'static>(ctx: &Context, key: &TypedKey<T>) {
    if let Some(cache) = ctx.cache() {
        cache.keep_alive(key);
    }
}

/// Whether the bound cache holds an entry for `key`, ignoring the cleared flag
pub fn contains<T: 'static>(ctx: &Context, key: &TypedKey<T>) -> bool {
    ctx.cache().is_some_and(|cache| cache.contains(key))
}

/// Whether the context carries a cache that has been torn down
pub fn is_cleared(ctx: &Context) -> bool {
    ctx.cache().is_some_and(|cache| cache.is_cleared())
}

/// Snapshot of the bound cache, if any
pub fn stats(ctx: &Context) -> Option<CacheStats> {
    ctx.cache().map(|cache| cache.stats())
}

fn bound<T>(ctx: &Context, key: &TypedKey<T>) -> Result<Arc<Cache>> {
    ctx.cache()
        .ok_or_else(|| CacheError::new(ErrorKind::CacheNotInitialized, key))
}
