use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use crate::reflect::{Reflect, Slot, Type, Value};

/// Injection slot for a record field.
///
/// Resolved instances are shared, so a record reachable from several places
/// is populated in place; the slot is therefore written through `&self`.
///
/// ```rust
/// use std::sync::Arc;
/// use tagwire_core::Inject;
///
/// let slot: Inject<String> = Inject::new();
/// assert!(slot.get().is_none());
///
/// slot.set(Arc::new("ready".to_string()));
/// assert_eq!(slot.get().as_deref().map(String::as_str), Some("ready"));
/// ```
pub struct Inject<T: ?Sized> {
    cell: RwLock<Option<Arc<T>>>,
}

impl<T: ?Sized> Inject<T> {
    /// An empty slot
    pub fn new() -> Self {
        Self {
            cell: RwLock::new(None),
        }
    }

    /// A slot that already holds `instance`
    pub fn with(instance: Arc<T>) -> Self {
        Self {
            cell: RwLock::new(Some(instance)),
        }
    }

    /// Current content of the slot
    pub fn get(&self) -> Option<Arc<T>> {
        self.cell
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn set(&self, instance: Arc<T>) {
        *self.cell.write().unwrap_or_else(PoisonError::into_inner) = Some(instance);
    }

    pub fn is_populated(&self) -> bool {
        self.cell
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}

impl<T: ?Sized> Default for Inject<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized> Clone for Inject<T> {
    fn clone(&self) -> Self {
        Self {
            cell: RwLock::new(self.get()),
        }
    }
}

impl<T: ?Sized> fmt::Debug for Inject<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Inject")
            .field("type", &std::any::type_name::<T>())
            .field("populated", &self.is_populated())
            .finish()
    }
}

impl<T: ?Sized + Reflect> Slot for Inject<T> {
    fn declared_type(&self) -> Type {
        T::type_of()
    }

    fn assign(&self, value: &Value) -> bool {
        match value.downcast::<T>() {
            Some(instance) => {
                self.set(instance);
                true
            }
            None => false,
        }
    }
}
