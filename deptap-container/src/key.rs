//! Registry keys.
//!
//! [`Key`] uniquely identifies an entry within a registry. It is a cheap,
//! reference-counted string so resolution chains and memoization tables
//! can clone keys freely.

use std::borrow::Borrow;
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

/// Uniquely identifies an entry in the registry.
///
/// # Examples
/// ```
/// use deptap_container::key::Key;
///
/// let key = Key::new("database");
/// assert_eq!(key.as_str(), "database");
/// assert_eq!(key, Key::from("database"));
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Key(Arc<str>);

impl Key {
    /// Creates a key from anything string-like.
    #[inline]
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(Arc::from(name.as_ref()))
    }

    /// Returns the key as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Deref for Key {
    type Target = str;

    #[inline]
    fn deref(&self) -> &str {
        &self.0
    }
}

// lets `IndexMap<Key, _>` be queried with a plain `&str`
impl Borrow<str> for Key {
    #[inline]
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Key {
    #[inline]
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Key {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for Key {
    fn from(name: String) -> Self {
        Self(Arc::from(name))
    }
}

impl From<&Key> for Key {
    fn from(key: &Key) -> Self {
        key.clone()
    }
}

impl PartialEq<str> for Key {
    fn eq(&self, other: &str) -> bool {
        &*self.0 == other
    }
}

impl PartialEq<&str> for Key {
    fn eq(&self, other: &&str) -> bool {
        &*self.0 == *other
    }
}

impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Key({:?})", &*self.0)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_equality_same_name() {
        assert_eq!(Key::new("a"), Key::from(String::from("a")));
    }

    #[test]
    fn key_inequality_different_names() {
        assert_ne!(Key::new("a"), Key::new("b"));
    }

    #[test]
    fn key_compares_with_str() {
        let key = Key::new("cValue");
        assert!(key == "cValue");
        assert_eq!(key.len(), 6);
    }

    #[test]
    fn key_in_hashmap_by_str() {
        use std::collections::HashMap;
        let mut map = HashMap::new();
        map.insert(Key::new("a"), 1);
        map.insert(Key::new("b"), 2);
        assert_eq!(map.get("a"), Some(&1));
        assert_eq!(map.get("c"), None);
    }

    #[test]
    fn key_display_and_debug() {
        let key = Key::new("logger");
        assert_eq!(format!("{key}"), "logger");
        assert_eq!(format!("{key:?}"), "Key(\"logger\")");
    }

    #[test]
    fn clones_share_storage() {
        let key = Key::new("shared");
        let copy = key.clone();
        assert!(Arc::ptr_eq(&key.0, &copy.0));
    }
}
