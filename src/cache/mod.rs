//! # Context-Scoped Typed Cache
//!
//! A write-once key-value store bound to the lifetime of a request context.
//!
//! ## Features
//!
//! - **Typed keys**: a key is a name plus a value type; same name, different
//!   type never collide
//! - **Explicit declaration**: keys must be declared before they can be set or read
//! - **Write-once**: each key accepts exactly one value
//! - **One-way teardown**: clearing purges entries and disables the cache for good
//! - **Keep-alive**: selected entries survive the teardown purge
//!
//! ## Lifecycle
//!
//! `Unbound -> Active -> Cleared`. `init` moves a context from unbound to
//! active, the first `Teardown::cancel` moves it to cleared.
//!
//! ## Example
//!
//! ```rust
//! use ctxcache::{Context, ErrorKind, TypedKey};
//!
//! const USER_ID: TypedKey<u64> = TypedKey::new("user_id");
//!
//! # fn main() -> ctxcache::Result<()> {
//! let (ctx, teardown) = ctxcache::init(&Context::background());
//!
//! ctxcache::declare(&ctx, &[USER_ID]);
//! ctxcache::set(&ctx, &USER_ID, 12345)?;
//! assert_eq!(ctxcache::get(&ctx, &USER_ID)?, 12345);
//!
//! let again = ctxcache::set(&ctx, &USER_ID, 1).unwrap_err();
//! assert_eq!(again.kind(), ErrorKind::ValueAlreadySet);
//!
//! teardown.cancel();
//! # Ok(())
//! # }
//! ```

pub mod binding;
pub mod config;
pub(crate) mod entry;
pub mod key;
pub mod store;
pub mod teardown;
pub mod types;

pub use binding::{
    cache, contains, declare, get, init, init_with_config, is_cleared, keep_alive, set, stats,
};
pub use config::{CacheConfig, CacheConfigBuilder};
pub use key::{key, TypedKey};
pub use store::Cache;
pub use teardown::{Teardown, TeardownGuard};
pub use types::{CacheStats, ClearReport};
