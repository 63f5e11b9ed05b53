//! # ctxcache
//!
//! A strongly-typed, write-once cache scoped to a request context.
//!
//! A cache is attached to a [`Context`] at the request boundary, keys are
//! declared where the business logic starts, each value is set exactly once
//! and read any number of times, and the cache is torn down when the request
//! ends. Data can flow between modules this way without widening every
//! function signature.
//!
//! This is not a general-purpose cache: there is no eviction, no expiry and no
//! persistence. Entries live until teardown.
//!
//! ## Usage
//!
//! ```rust
//! use ctxcache::{Context, TypedKey};
//!
//! const USER_NAME: TypedKey<String> = TypedKey::new("user_name");
//! const PERMISSIONS: TypedKey<Vec<String>> = TypedKey::new("permissions");
//!
//! # fn main() -> ctxcache::Result<()> {
//! // Request boundary, e.g. HTTP middleware
//! let (ctx, teardown) = ctxcache::init(&Context::background());
//! let _guard = teardown.guard();
//!
//! // Entry point of the handler
//! ctxcache::declare(&ctx, &[USER_NAME]);
//! ctxcache::declare(&ctx, &[PERMISSIONS]);
//!
//! ctxcache::set(&ctx, &USER_NAME, "Alice".to_string())?;
//! ctxcache::set(&ctx, &PERMISSIONS, vec!["read".to_string(), "write".to_string()])?;
//!
//! // Anywhere further down the call chain
//! assert_eq!(ctxcache::get(&ctx, &USER_NAME)?, "Alice");
//! assert_eq!(ctxcache::get(&ctx, &PERMISSIONS)?.len(), 2);
//! # Ok(())
//! # }
//! ```
//!
//! ## Background work
//!
//! [`keep_alive`] exempts an entry from the teardown purge. It does not
//! extend any other lifetime: the task must hold a clone of the context, and
//! reads through [`get`] fail with `CacheAlreadyCleared` after teardown. The
//! retained entry is visible through [`contains`] and [`stats`].

pub mod cache;
pub mod context;
pub mod error;

// Re-export main types for convenience
pub use cache::{
    cache, contains, declare, get, init, init_with_config, is_cleared, keep_alive, key, set,
    stats, Cache, CacheConfig, CacheConfigBuilder, CacheStats, ClearReport, Teardown,
    TeardownGuard, TypedKey,
};
pub use context::Context;
pub use error::{CacheError, ErrorKind, Result};
