//! The registry — the caller's named set of entries.
//!
//! The registry maps each [`Key`] to an [`Entry`] and remembers the order
//! in which keys were registered. That order drives eager resolution.

use indexmap::IndexMap;
use tracing::{debug, trace};

use deptap_support::rendering::suggest_similar;

use crate::error::{AlreadyRegisteredError, DeptapError, Result};
use crate::entry::Entry;
use crate::key::Key;

const MAX_SUGGESTIONS: usize = 3;

/// Stores all entries handed to a container.
///
/// The registry is populated before the container is built and is owned
/// by the container afterwards; it is never modified once resolution can
/// start.
///
/// # Examples
/// ```
/// use deptap_container::entry::{Component, Entry};
/// use deptap_container::registry::Registry;
///
/// let mut registry = Registry::new();
/// registry.register("a", Component::new("a").depends_on("c")).unwrap();
/// registry.register("c", Entry::value(42i32)).unwrap();
///
/// assert_eq!(registry.len(), 2);
/// assert!(registry.register("c", Entry::value(0i32)).is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Registry {
    entries: IndexMap<Key, Entry>,
}

impl Registry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `entry` under `key`.
    ///
    /// # Errors
    /// Returns [`DeptapError::AlreadyRegistered`] if the key is taken.
    pub fn register(&mut self, key: impl Into<Key>, entry: impl Into<Entry>) -> Result<()> {
        self.insert(key.into(), entry.into(), false)
    }

    /// Registers `entry`, replacing any entry already under `key`.
    ///
    /// A replaced entry keeps its original position.
    pub fn replace(&mut self, key: impl Into<Key>, entry: impl Into<Entry>) -> Option<Entry> {
        let key = key.into();
        debug!(key = %key, "Replacing entry");
        self.entries.insert(key, entry.into())
    }

    pub(crate) fn insert(&mut self, key: Key, entry: Entry, allow_override: bool) -> Result<()> {
        if !allow_override && self.entries.contains_key(&key) {
            return Err(DeptapError::AlreadyRegistered(AlreadyRegisteredError { key }));
        }

        debug!(
            key = %key,
            component = entry.is_component(),
            dependencies = entry.dependencies().len(),
            "Registered entry"
        );
        self.entries.insert(key, entry);
        Ok(())
    }

    /// Looks up an entry by key.
    pub fn get(&self, key: &str) -> Option<&Entry> {
        self.entries.get(key)
    }

    /// Looks up an entry together with its stored key.
    pub fn get_key_value(&self, key: &str) -> Option<(&Key, &Entry)> {
        let found = self.entries.get_key_value(key);
        if found.is_none() {
            trace!(key, "Registry miss");
        }
        found
    }

    #[inline]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Keys in registration order.
    pub fn keys(&self) -> impl Iterator<Item = &Key> {
        self.entries.keys()
    }

    /// Returns the number of registered entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is registered.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registered keys that resemble `key`, for "did you mean?" hints.
    pub(crate) fn suggestions_for(&self, key: &str) -> Vec<Key> {
        let available: Vec<&str> = self.entries.keys().map(Key::as_str).collect();
        suggest_similar(key, &available, MAX_SUGGESTIONS)
            .into_iter()
            .map(Key::from)
            .collect()
    }
}
