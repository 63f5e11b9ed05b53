//! Write-once typed cache store

use crate::cache::{
    config::CacheConfig,
    entry::{CacheEntry, ErasedKey},
    key::TypedKey,
    types::{CacheStats, ClearReport},
};
use crate::error::{CacheError, ErrorKind, Result};
use chrono::Utc;
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use tracing::{debug, info, trace};
use uuid::Uuid;

/// Concurrency-safe, write-once store of typed values
///
/// This implementation provides:
/// - One mutex around all state; every operation locks, works and releases
/// - Keys partitioned by name and value type
/// - Exactly-once assignment per key
/// - A one-way transition into the cleared state
///
/// Most callers reach a `Cache` through a [`Context`](crate::Context) and the
/// free functions of this crate, but the handle can also be passed explicitly.
pub struct Cache {
    id: Uuid,
    config: CacheConfig,
    state: Mutex<CacheState>,
}

/// Internal cache storage
struct CacheState {
    /// Declared slots: key -> entry
    entries: HashMap<ErasedKey, CacheEntry>,

    /// Keys exempt from the teardown purge
    keep_alive: HashSet<ErasedKey>,

    /// Set once by teardown, never reset
    cleared: bool,
}

impl Cache {
    /// Create an empty cache
    pub fn new(config: CacheConfig) -> Self {
        let id = Uuid::new_v4();
        debug!(
            cache_id = %id,
            label = config.label.as_deref().unwrap_or(""),
            "Initializing context cache"
        );

        let state = CacheState {
            entries: HashMap::with_capacity(config.initial_capacity),
            keep_alive: HashSet::new(),
            cleared: false,
        };

        Self {
            id,
            config,
            state: Mutex::new(state),
        }
    }

    /// Identifier of this cache instance
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Configuration the cache was created with
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Register keys as unset slots.
    ///
    /// Keys that already have an entry are left alone, so re-declaring never
    /// resets a value. Does nothing once the cache is cleared.
    pub fn declare<T>(&self, keys: &[TypedKey<T>])
    where
        T: Send + Sync + 'static,
    {
        let mut state = self.state.lock();
        if state.cleared {
            return;
        }

        for key in keys {
            state
                .entries
                .entry(key.erased())
                .or_insert_with(|| {
                    debug!(cache_id = %self.id, key = %key, "Declared cache key");
                    CacheEntry::declared::<T>()
                });
        }
    }

    /// Assign the value of a declared key; each key accepts exactly one value
    pub fn set<T>(&self, key: &TypedKey<T>, value: T) -> Result<()>
    where
        T: Send + Sync + 'static,
    {
        let mut state = self.state.lock();
        if state.cleared {
            return Err(CacheError::new(ErrorKind::CacheAlreadyCleared, key));
        }

        let entry = state
            .entries
            .get_mut(&key.erased())
            .ok_or_else(|| CacheError::new(ErrorKind::KeyNotDeclared, key))?;

        match entry.with_slot_mut::<T, _>(|slot| slot.fill(value)) {
            None => Err(CacheError::new(ErrorKind::KeyTypeMismatch, key)),
            Some(Err(_)) => Err(CacheError::new(ErrorKind::ValueAlreadySet, key)),
            Some(Ok(())) => {
                debug!(cache_id = %self.id, key = %key, "Set cache value");
                Ok(())
            }
        }
    }

    /// Read the value of a declared and set key.
    ///
    /// `T::clone` runs while the cache lock is held, so a `Clone` impl must
    /// not call back into the same cache.
    pub fn get<T>(&self, key: &TypedKey<T>) -> Result<T>
    where
        T: Clone + Send + Sync + 'static,
    {
        let state = self.state.lock();
        if state.cleared {
            return Err(CacheError::new(ErrorKind::CacheAlreadyCleared, key));
        }

        let entry = state
            .entries
            .get(&key.erased())
            .ok_or_else(|| CacheError::new(ErrorKind::KeyNotDeclared, key))?;

        let slot = entry
            .slot::<T>()
            .ok_or_else(|| CacheError::new(ErrorKind::KeyTypeMismatch, key))?;

        let value = slot
            .value()
            .cloned()
            .ok_or_else(|| CacheError::new(ErrorKind::ValueNotSet, key))?;

        if self.config.trace_reads {
            trace!(cache_id = %self.id, key = %key, "Read cache value");
        }
        Ok(value)
    }

    /// Exempt a key from the teardown purge.
    ///
    /// The key does not need a value yet. Does nothing once cleared.
    pub fn keep_alive<T: 'static>(&self, key: &TypedKey<T>) {
        let mut state = self.state.lock();
        if state.cleared {
            return;
        }

        if state.keep_alive.insert(key.erased()) {
            debug!(cache_id = %self.id, key = %key, "Marked cache key keep-alive");
        }
    }

    /// Whether an entry exists for the key, regardless of the cleared flag
    pub fn contains<T: 'static>(&self, key: &TypedKey<T>) -> bool {
        self.state.lock().entries.contains_key(&key.erased())
    }

    /// Whether teardown has run
    pub fn is_cleared(&self) -> bool {
        self.state.lock().cleared
    }

    /// Get a snapshot of the cache contents
    pub fn stats(&self) -> CacheStats {
        let state = self.state.lock();

        CacheStats {
            cache_id: self.id,
            label: self.config.label.clone(),
            declared: state.entries.len(),
            set: state.entries.values().filter(|e| e.is_set()).count(),
            keep_alive: state.keep_alive.len(),
            cleared: state.cleared,
        }
    }

    /// Purge every entry not marked keep-alive and mark the cache cleared.
    ///
    /// Only the first call does anything; later calls return `None`.
    pub fn clear(&self) -> Option<ClearReport> {
        let mut state = self.state.lock();
        if state.cleared {
            return None;
        }
        state.cleared = true;

        let before = state.entries.len();
        let CacheState {
            entries,
            keep_alive,
            ..
        } = &mut *state;
        entries.retain(|key, _| keep_alive.contains(key));
        keep_alive.clear();

        let retained = state.entries.len();
        let report = ClearReport {
            cache_id: self.id,
            removed: before - retained,
            retained,
            cleared_at: Utc::now(),
        };

        info!(
            cache_id = %self.id,
            removed = report.removed,
            retained = report.retained,
            "Cleared context cache"
        );
        Some(report)
    }
}

impl std::fmt::Debug for Cache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cache")
            .field("id", &self.id)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
