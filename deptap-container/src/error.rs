//! Error types for deptap container operations.
//!
//! Resolution itself knows a single failure, the circular dependency.
//! Registration and lookup add the "not registered" and "already
//! registered" cases so callers can tell a miss from a cycle.

use std::fmt;

use deptap_support::rendering::render_chain;

use crate::key::Key;

/// Main error type for all deptap operations.
#[derive(Debug, thiserror::Error)]
pub enum DeptapError {
    /// Requested key is not in the registry.
    #[error("{}", .0)]
    NotRegistered(NotRegisteredError),

    /// Resolution revisited a key already on the current chain.
    #[error("{}", .0)]
    CircularDependency(CircularDependencyError),

    /// The same key was registered twice while building.
    #[error("{}", .0)]
    AlreadyRegistered(AlreadyRegisteredError),
}

impl DeptapError {
    /// Returns the offending chain if this is a circular dependency.
    pub fn cycle(&self) -> Option<&[Key]> {
        match self {
            DeptapError::CircularDependency(err) => Some(&err.chain),
            _ => None,
        }
    }
}

/// Error when a key was not registered.
#[derive(Debug)]
pub struct NotRegisteredError {
    /// The key that was requested
    pub requested: Key,
    /// The component whose manifest named it (strict validation only)
    pub required_by: Option<Key>,
    /// Registered keys that look similar
    pub suggestions: Vec<Key>,
}

impl fmt::Display for NotRegisteredError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Entry not registered: {}", self.requested)?;

        if let Some(ref parent) = self.required_by {
            write!(f, "\n  Required by: {parent}")?;
        }

        if !self.suggestions.is_empty() {
            write!(f, "\n  Did you mean one of:")?;
            for suggestion in &self.suggestions {
                write!(f, "\n    - {suggestion}")?;
            }
        }

        Ok(())
    }
}

/// Error when a circular dependency is detected.
///
/// The chain is in traversal order and ends with the key that closed
/// the cycle, e.g. `["a", "b", "a"]`.
#[derive(Debug)]
pub struct CircularDependencyError {
    pub chain: Vec<Key>,
}

impl fmt::Display for CircularDependencyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Circular dependency detected: {}",
            render_chain(&self.chain)
        )?;
        write!(
            f,
            "\n  Hint: Break the cycle by removing one of the dependencies listed above"
        )
    }
}

/// Error when a key is registered more than once.
#[derive(Debug)]
pub struct AlreadyRegisteredError {
    pub key: Key,
}

impl fmt::Display for AlreadyRegisteredError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Entry already registered: {}", self.key)?;
        write!(
            f,
            "\n  Hint: Enable allow_override to let the later entry replace it"
        )
    }
}

/// Convenient Result type for deptap operations.
pub type Result<T> = std::result::Result<T, DeptapError>;
