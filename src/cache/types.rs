//! Snapshot and report types for the cache

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Point-in-time view of a cache's contents
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    /// Identifier of the cache instance
    pub cache_id: Uuid,

    /// Optional label from the cache configuration
    pub label: Option<String>,

    /// Number of entries in the map (set or not)
    pub declared: usize,

    /// Number of entries holding a value
    pub set: usize,

    /// Number of keys marked keep-alive
    pub keep_alive: usize,

    /// Whether teardown has run
    pub cleared: bool,
}

impl CacheStats {
    /// Entries declared but still waiting for a value
    pub fn unset(&self) -> usize {
        self.declared.saturating_sub(self.set)
    }
}

impl fmt::Display for CacheStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CacheStats {{ id: {}, declared: {}, set: {}, keep_alive: {}, cleared: {} }}",
            self.cache_id, self.declared, self.set, self.keep_alive, self.cleared
        )
    }
}

/// Outcome of the single teardown of a cache
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClearReport {
    /// Identifier of the cleared cache
    pub cache_id: Uuid,

    /// Entries purged
    pub removed: usize,

    /// Entries kept because they were marked keep-alive
    pub retained: usize,

    /// When the clear happened
    pub cleared_at: DateTime<Utc>,
}

impl fmt::Display for ClearReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "cleared cache {}: removed {}, retained {}",
            self.cache_id, self.removed, self.retained
        )
    }
}
