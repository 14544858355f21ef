//! Entry classification and recursive resolution.
//!
//! [`Resolver`] wires one key at a time. Each recursive call receives its
//! own copy of the resolution chain extended by the current key, so two
//! branches that share a dependency never see each other on the chain.
//! Only a path leading back to an ancestor on the current call stack is
//! a cycle.
//!
//! ```text
//!   a ──> b ──> d        chain at d: [a, b]
//!   └───> c ──> d        chain at d: [a, c]   (memo hit, no cycle)
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use indexmap::IndexMap;
use tracing::{debug, trace, warn};

use crate::entry::{Entry, Instance, ResolvedComponent, Slot};
use crate::error::{CircularDependencyError, DeptapError, NotRegisteredError, Result};
use crate::key::Key;
use crate::registry::Registry;

/// Decides whether `entry` gets wired as a component.
///
/// True iff the entry was declared as a [`Component`](crate::entry::Component)
/// and every name in its manifest is a key of `registry`. A manifest that
/// names an unknown key makes the entry an opaque value. Never fails.
pub fn is_component(entry: &Entry, registry: &Registry) -> bool {
    match entry {
        Entry::Value(_) => false,
        Entry::Component(component) => component
            .dependencies()
            .iter()
            .all(|dependency| registry.contains_key(dependency)),
    }
}

/// Keys whose dependencies have been fully wired, with the wired result.
///
/// One store per container. Once a key is in here the resolver returns the
/// stored instance and never walks that key's manifest again.
#[derive(Debug, Default)]
pub(crate) struct MemoStore {
    resolved: HashMap<Key, Arc<Instance>>,
}

impl MemoStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn has_resolved(&self, key: &str) -> bool {
        self.resolved.contains_key(key)
    }

    #[inline]
    pub fn get(&self, key: &str) -> Option<&Arc<Instance>> {
        self.resolved.get(key)
    }

    pub fn mark_resolved(&mut self, key: Key, instance: Arc<Instance>) {
        self.resolved.insert(key, instance);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.resolved.len()
    }
}

/// Wires entries of one registry into one memo store.
pub(crate) struct Resolver<'a> {
    registry: &'a Registry,
    store: &'a mut MemoStore,
}

impl<'a> Resolver<'a> {
    pub fn new(registry: &'a Registry, store: &'a mut MemoStore) -> Self {
        Self { registry, store }
    }

    /// Resolves `key` as a fresh entry point, with an empty chain.
    ///
    /// # Errors
    /// - [`DeptapError::NotRegistered`] — `key` is not in the registry
    /// - [`DeptapError::CircularDependency`] — a component reaches itself
    pub fn resolve_root(&mut self, key: &str) -> Result<Arc<Instance>> {
        if let Some(instance) = self.store.get(key) {
            trace!(key, "Already resolved");
            return Ok(Arc::clone(instance));
        }

        let registry = self.registry;
        let Some((key, _)) = registry.get_key_value(key) else {
            return Err(DeptapError::NotRegistered(NotRegisteredError {
                requested: Key::new(key),
                required_by: None,
                suggestions: registry.suggestions_for(key),
            }));
        };

        self.resolve(key, &[])
    }

    /// Resolves `key` given the chain of keys currently being wired.
    fn resolve(&mut self, key: &Key, chain: &[Key]) -> Result<Arc<Instance>> {
        if let Some(instance) = self.store.get(key) {
            trace!(key = %key, "Already resolved");
            return Ok(Arc::clone(instance));
        }

        // Only reachable through a classified component, whose manifest
        // names registered keys exclusively.
        let registry = self.registry;
        let entry = registry.get(key).ok_or_else(|| {
            DeptapError::NotRegistered(NotRegisteredError {
                requested: key.clone(),
                required_by: chain.last().cloned(),
                suggestions: registry.suggestions_for(key),
            })
        })?;

        let instance = match entry {
            Entry::Component(component) if is_component(entry, registry) => {
                if chain.contains(key) {
                    let mut cycle = chain.to_vec();
                    cycle.push(key.clone());
                    warn!(cycle = ?cycle, "Circular dependency detected");
                    return Err(DeptapError::CircularDependency(CircularDependencyError {
                        chain: cycle,
                    }));
                }

                let mut next_chain = chain.to_vec();
                next_chain.push(key.clone());
                trace!(key = %key, depth = next_chain.len(), "Wiring component");

                let mut depends = IndexMap::with_capacity(component.dependencies().len());
                for dependency in component.dependencies() {
                    let resolved = self.resolve(dependency, &next_chain)?;
                    depends.insert(dependency.clone(), Slot::Resolved(resolved));
                }

                debug!(key = %key, dependencies = depends.len(), "Component wired");
                Instance::Component(ResolvedComponent::new(component.payload().clone(), depends))
            }
            Entry::Component(component) => {
                debug!(
                    key = %key,
                    dependencies = ?component.dependencies(),
                    "Manifest names unregistered keys, passing component through unwired"
                );
                Instance::unwired(entry)
            }
            Entry::Value(_) => Instance::unwired(entry),
        };

        let instance = Arc::new(instance);
        self.store.mark_resolved(key.clone(), Arc::clone(&instance));
        Ok(instance)
    }
}
