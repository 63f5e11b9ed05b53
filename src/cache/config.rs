//! Configuration for a context cache

use serde::{Deserialize, Serialize};

/// Upper bound for `initial_capacity`; larger values are a configuration mistake
pub const MAX_INITIAL_CAPACITY: usize = 1 << 20;

/// Configuration for a single context cache
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Label attached to log events and stats
    pub label: Option<String>,

    /// Number of entries the map is pre-sized for
    pub initial_capacity: usize,

    /// Emit a `trace` event for every read
    pub trace_reads: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            label: None,
            initial_capacity: 16,
            trace_reads: false,
        }
    }
}

impl CacheConfig {
    /// Create a new builder for cache configuration
    pub fn builder() -> CacheConfigBuilder {
        CacheConfigBuilder::default()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.initial_capacity > MAX_INITIAL_CAPACITY {
            return Err(format!(
                "initial_capacity must be at most {}",
                MAX_INITIAL_CAPACITY
            ));
        }

        if let Some(label) = &self.label {
            if label.trim().is_empty() {
                return Err("label must not be empty".to_string());
            }
        }

        Ok(())
    }
}

/// Preset configurations
impl CacheConfig {
    /// Per-request cache, the default
    pub fn request() -> Self {
        Self::default()
    }

    /// Cache for long-lived background jobs
    pub fn background() -> Self {
        Self {
            label: Some("background".to_string()),
            initial_capacity: 64,
            ..Default::default()
        }
    }
}

/// Builder for cache configuration
#[derive(Debug, Default)]
pub struct CacheConfigBuilder {
    label: Option<String>,
    initial_capacity: Option<usize>,
    trace_reads: Option<bool>,
}

impl CacheConfigBuilder {
    /// Set the label used in log events
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Set the initial map capacity
    pub fn initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = Some(capacity);
        self
    }

    /// Enable or disable read tracing
    pub fn trace_reads(mut self, enable: bool) -> Self {
        self.trace_reads = Some(enable);
        self
    }

    /// Build the cache configuration
    pub fn build(self) -> CacheConfig {
        let defaults = CacheConfig::default();

        CacheConfig {
            label: self.label.or(defaults.label),
            initial_capacity: self.initial_capacity.unwrap_or(defaults.initial_capacity),
            trace_reads: self.trace_reads.unwrap_or(defaults.trace_reads),
        }
    }
}
