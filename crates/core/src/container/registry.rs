use dashmap::DashMap;
use std::fmt;

use crate::factory::Factory;
use crate::reflect::{TypeKind, Value};

/// Binding entry stored in the registry
#[derive(Clone)]
pub enum Binding {
    /// A shared instance (record value or reference)
    Instance(Value),
    /// A factory invoked on every resolution
    Factory(Factory),
}

impl Binding {
    /// Dynamic kind of the stored concrete
    pub fn kind(&self) -> TypeKind {
        match self {
            Binding::Instance(value) => value.kind(),
            Binding::Factory(factory) => factory.ty().kind(),
        }
    }
}

impl From<Value> for Binding {
    fn from(value: Value) -> Self {
        match value.as_factory() {
            Some(factory) => Binding::Factory(factory.clone()),
            None => Binding::Instance(value),
        }
    }
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Binding::Instance(value) => f.debug_tuple("Instance").field(&value.type_name()).finish(),
            Binding::Factory(factory) => f.debug_tuple("Factory").field(&factory.ty().name()).finish(),
        }
    }
}

/// Concurrent map from abstraction key to binding entry
#[derive(Debug, Default)]
pub struct Registry {
    entries: DashMap<&'static str, Binding>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a binding, returning the entry it replaced
    pub fn store(&self, key: &'static str, binding: Binding) -> Option<Binding> {
        self.entries.insert(key, binding)
    }

    /// Clone an entry out of the map so no shard lock outlives the call
    pub fn load(&self, key: &str) -> Option<Binding> {
        self.entries.get(key).map(|entry| entry.value().clone())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registered keys, sorted
    pub fn keys(&self) -> Vec<&'static str> {
        let mut keys: Vec<&'static str> = self.entries.iter().map(|entry| *entry.key()).collect();
        keys.sort_unstable();
        keys
    }
}
