//! Type-erased cache entries

use std::any::{Any, TypeId};
use std::borrow::Cow;

/// Map key with the value type erased to its `TypeId`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct ErasedKey {
    name: Cow<'static, str>,
    type_id: TypeId,
}

impl ErasedKey {
    pub(crate) fn new(name: Cow<'static, str>, type_id: TypeId) -> Self {
        Self { name, type_id }
    }
}

/// Write-once slot for a single typed value
#[derive(Debug, Clone)]
pub(crate) struct Slot<T> {
    value: Option<T>,
}

impl<T> Slot<T> {
    /// A declared slot with no value yet
    pub(crate) fn unset() -> Self {
        Self { value: None }
    }

    pub(crate) fn is_set(&self) -> bool {
        self.value.is_some()
    }

    pub(crate) fn value(&self) -> Option<&T> {
        self.value.as_ref()
    }

    /// Store a value; hands it back if the slot is already filled
    pub(crate) fn fill(&mut self, value: T) -> Result<(), T> {
        if self.value.is_some() {
            return Err(value);
        }
        self.value = Some(value);
        Ok(())
    }
}

/// A stored entry: some `Slot<T>` behind `Any`
pub(crate) struct CacheEntry {
    slot: Box<dyn Any + Send + Sync>,
    is_set: bool,
}

impl CacheEntry {
    pub(crate) fn declared<T: Send + Sync + 'static>() -> Self {
        Self {
            slot: Box::new(Slot::<T>::unset()),
            is_set: false,
        }
    }

    /// Whether the slot holds a value, without knowing `T`
    pub(crate) fn is_set(&self) -> bool {
        self.is_set
    }

    pub(crate) fn slot<T: 'static>(&self) -> Option<&Slot<T>> {
        self.slot.downcast_ref::<Slot<T>>()
    }

    /// Run `f` against the typed slot, keeping the erased flag in sync
    pub(crate) fn with_slot_mut<T: 'static, R>(
        &mut self,
        f: impl FnOnce(&mut Slot<T>) -> R,
    ) -> Option<R> {
        let slot = self.slot.downcast_mut::<Slot<T>>()?;
        let out = f(slot);
        self.is_set = slot.is_set();
        Some(out)
    }
}

impl std::fmt::Debug for CacheEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheEntry")
            .field("is_set", &self.is_set)
            .finish_non_exhaustive()
    }
}
