//! Error types for cache operations
//!
//! Every failure carries the rendered identity of the key involved
//! (`name(Type)`) so that messages point straight at the offending call site.

use std::fmt;
use thiserror::Error;

/// Main error type for cache operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// No cache is bound to the context
    #[error("{key}: cache not initialized")]
    CacheNotInitialized { key: String },

    /// The cache was torn down
    #[error("{key}: cache already cleared")]
    CacheAlreadyCleared { key: String },

    /// The key was never passed to `declare`
    #[error("{key}: key not declared")]
    KeyNotDeclared { key: String },

    /// The stored slot does not hold the key's value type
    #[error("{key}: key type mismatch")]
    KeyTypeMismatch { key: String },

    /// The key was declared but never set
    #[error("{key}: value not set")]
    ValueNotSet { key: String },

    /// The key already holds a value
    #[error("{key}: value already set")]
    ValueAlreadySet { key: String },
}

/// Discriminant of a [`CacheError`], for matching without the key payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    CacheNotInitialized,
    CacheAlreadyCleared,
    KeyNotDeclared,
    KeyTypeMismatch,
    ValueNotSet,
    ValueAlreadySet,
}

impl CacheError {
    pub(crate) fn new(kind: ErrorKind, key: impl fmt::Display) -> Self {
        let key = key.to_string();
        match kind {
            ErrorKind::CacheNotInitialized => CacheError::CacheNotInitialized { key },
            ErrorKind::CacheAlreadyCleared => CacheError::CacheAlreadyCleared { key },
            ErrorKind::KeyNotDeclared => CacheError::KeyNotDeclared { key },
            ErrorKind::KeyTypeMismatch => CacheError::KeyTypeMismatch { key },
            ErrorKind::ValueNotSet => CacheError::ValueNotSet { key },
            ErrorKind::ValueAlreadySet => CacheError::ValueAlreadySet { key },
        }
    }

    /// The kind of failure
    pub fn kind(&self) -> ErrorKind {
        match self {
            CacheError::CacheNotInitialized { .. } => ErrorKind::CacheNotInitialized,
            CacheError::CacheAlreadyCleared { .. } => ErrorKind::CacheAlreadyCleared,
            CacheError::KeyNotDeclared { .. } => ErrorKind::KeyNotDeclared,
            CacheError::KeyTypeMismatch { .. } => ErrorKind::KeyTypeMismatch,
            CacheError::ValueNotSet { .. } => ErrorKind::ValueNotSet,
            CacheError::ValueAlreadySet { .. } => ErrorKind::ValueAlreadySet,
        }
    }

    /// Rendered identity of the key, e.g. `user_id(i64)`
    pub fn key(&self) -> &str {
        match self {
            CacheError::CacheNotInitialized { key }
            | CacheError::CacheAlreadyCleared { key }
            | CacheError::KeyNotDeclared { key }
            | CacheError::KeyTypeMismatch { key }
            | CacheError::ValueNotSet { key }
            | CacheError::ValueAlreadySet { key } => key,
        }
    }

    /// Check whether this error is of the given kind
    pub fn is(&self, kind: ErrorKind) -> bool {
        self.kind() == kind
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::CacheNotInitialized => write!(f, "cache not initialized"),
            ErrorKind::CacheAlreadyCleared => write!(f, "cache already cleared"),
            ErrorKind::KeyNotDeclared => write!(f, "key not declared"),
            ErrorKind::KeyTypeMismatch => write!(f, "key type mismatch"),
            ErrorKind::ValueNotSet => write!(f, "value not set"),
            ErrorKind::ValueAlreadySet => write!(f, "value already set"),
        }
    }
}

/// Result type alias for cache operations
pub type Result<T> = std::result::Result<T, CacheError>;
