//! Manifest validation for strict containers.
//!
//! Walks the whole registry before anything is resolved:
//! - Checks that every declared dependency is registered
//! - Detects circular dependencies
//!
//! Without strict mode neither check runs up front. An unknown dependency
//! just makes the component an opaque value, and cycles surface when the
//! resolver reaches them.

use std::collections::HashSet;

use tracing::{debug, instrument, warn};

use crate::error::{CircularDependencyError, DeptapError, NotRegisteredError};
use crate::key::Key;
use crate::registry::Registry;

/// Depth-first validator over a registry's dependency manifests.
///
/// Keeps a "visiting" set for cycle detection and a "validated" set so
/// shared subgraphs are walked once.
pub(crate) struct GraphValidator<'a> {
    registry: &'a Registry,
    /// Currently on the DFS path
    visiting: HashSet<Key>,
    /// Already validated (cache)
    validated: HashSet<Key>,
    /// Current DFS path (for error reporting)
    path: Vec<Key>,
}

impl<'a> GraphValidator<'a> {
    pub fn new(registry: &'a Registry) -> Self {
        Self {
            registry,
            visiting: HashSet::new(),
            validated: HashSet::new(),
            path: Vec::new(),
        }
    }

    /// Validates every key, in registration order.
    ///
    /// # Errors
    /// - [`DeptapError::NotRegistered`] — a manifest names an unknown key
    /// - [`DeptapError::CircularDependency`] — a component reaches itself
    #[instrument(skip(self), name = "graph_validation")]
    pub fn validate(&mut self) -> Result<(), DeptapError> {
        debug!(entries = self.registry.len(), "Starting manifest validation");

        let registry = self.registry;
        for key in registry.keys() {
            if !self.validated.contains(key) {
                self.validate_key(key)?;
            }
        }

        debug!("Manifest validation passed");
        Ok(())
    }

    fn validate_key(&mut self, key: &Key) -> Result<(), DeptapError> {
        if self.validated.contains(key) {
            return Ok(());
        }

        if self.visiting.contains(key) {
            let mut chain = self.path.clone();
            chain.push(key.clone());
            warn!(cycle = ?chain, "Circular dependency detected during validation");
            return Err(DeptapError::CircularDependency(CircularDependencyError { chain }));
        }

        let registry = self.registry;
        let Some(entry) = registry.get(key) else {
            return Ok(());
        };

        self.visiting.insert(key.clone());
        self.path.push(key.clone());

        for dependency in entry.dependencies() {
            if !registry.contains_key(dependency) {
                warn!(component = %key, dependency = %dependency, "Unregistered dependency");
                return Err(DeptapError::NotRegistered(NotRegisteredError {
                    requested: dependency.clone(),
                    required_by: Some(key.clone()),
                    suggestions: registry.suggestions_for(dependency),
                }));
            }

            self.validate_key(dependency)?;
        }

        self.path.pop();
        self.visiting.remove(key);
        self.validated.insert(key.clone());

        Ok(())
    }
}
