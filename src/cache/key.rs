//! Strongly typed cache keys

use crate::cache::entry::ErasedKey;
use std::any::{type_name, TypeId};
use std::borrow::Cow;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

/// A cache key bound to a value type
///
/// Two keys are the same key only when both the name and `T` match, so
/// `TypedKey::<String>::new("k")` and `TypedKey::<i32>::new("k")` address
/// independent slots. Keys are plain values and can live in constants:
///
/// ```rust
/// use ctxcache::TypedKey;
///
/// const USER_ID: TypedKey<u64> = TypedKey::new("user_id");
/// assert_eq!(USER_ID.to_string(), "user_id(u64)");
/// ```
pub struct TypedKey<T> {
    name: Cow<'static, str>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> TypedKey<T> {
    /// Create a key from a static name; usable in `const` items
    pub const fn new(name: &'static str) -> Self {
        Self {
            name: Cow::Borrowed(name),
            _marker: PhantomData,
        }
    }

    /// Create a key from a name built at runtime
    pub fn from_name(name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            name: name.into(),
            _marker: PhantomData,
        }
    }

    /// The string part of the key
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Short name of the value type, e.g. `Vec<String>`
    pub fn type_name(&self) -> String {
        short_type_name(type_name::<T>())
    }
}

impl<T: 'static> TypedKey<T> {
    pub(crate) fn erased(&self) -> ErasedKey {
        ErasedKey::new(self.name.clone(), TypeId::of::<T>())
    }
}

/// Shorthand for [`TypedKey::from_name`]
pub fn key<T>(name: impl Into<Cow<'static, str>>) -> TypedKey<T> {
    TypedKey::from_name(name)
}

impl<T> Clone for TypedKey<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T> PartialEq for TypedKey<T> {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl<T> Eq for TypedKey<T> {}

impl<T> Hash for TypedKey<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl<T> fmt::Display for TypedKey<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name, self.type_name())
    }
}

impl<T> fmt::Debug for TypedKey<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypedKey")
            .field("name", &self.name)
            .field("type", &self.type_name())
            .finish()
    }
}

/// Drop module paths from a `std::any::type_name` rendering
///
/// `alloc::vec::Vec<alloc::string::String>` becomes `Vec<String>`.
pub(crate) fn short_type_name(full: &str) -> String {
    let mut out = String::with_capacity(full.len());
    let mut segment = String::new();

    for c in full.chars() {
        if c.is_alphanumeric() || c == '_' {
            segment.push(c);
        } else if c == ':' {
            // `a::b` - everything before the separator is a path
            segment.clear();
        } else {
            out.push_str(&segment);
            segment.clear();
            out.push(c);
        }
    }
    out.push_str(&segment);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_display() {
        assert_eq!(TypedKey::<i32>::new("x").to_string(), "x(i32)");
        assert_eq!(TypedKey::<String>::new("name").to_string(), "name(String)");
        assert_eq!(
            TypedKey::<Vec<String>>::new("roles").to_string(),
            "roles(Vec<String>)"
        );
    }

    #[test]
    fn test_short_type_name() {
        assert_eq!(short_type_name("i32"), "i32");
        assert_eq!(short_type_name("&str"), "&str");
        assert_eq!(
            short_type_name("std::collections::hash::map::HashMap<alloc::string::String, u64>"),
            "HashMap<String, u64>"
        );
        assert_eq!(
            short_type_name("core::option::Option<(i32, alloc::sync::Arc<[u8]>)>"),
            "Option<(i32, Arc<[u8]>)>"
        );
    }

    #[test]
    fn test_const_key() {
        const USER: TypedKey<u64> = TypedKey::new("user");
        let other: TypedKey<u64> = key("user".to_string());
        assert_eq!(USER, other);
        assert_eq!(USER.name(), "user");
    }

    #[test]
    fn test_erased_identity_includes_type() {
        let a = TypedKey::<String>::new("k").erased();
        let b = TypedKey::<i32>::new("k").erased();
        let c = TypedKey::<String>::from_name("k").erased();

        assert_ne!(a, b);
        assert_eq!(a, c);
    }
}
