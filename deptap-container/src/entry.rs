//! Registry entries and their resolved form.
//!
//! An [`Entry`] is declared by the caller: either an opaque value or a
//! [`Component`] listing the keys it depends on. The container hands out
//! [`Instance`]s, the wired counterpart of an entry, always behind an
//! [`Arc`] so shared dependencies are reference-identical.
//!
//! # Examples
//! ```
//! use deptap_container::entry::{Component, Entry};
//!
//! let value = Entry::value(42i32);
//! assert!(!value.is_component());
//!
//! let service = Component::new("userService")
//!     .depends_on("userRepo")
//!     .depends_on("logger");
//! assert_eq!(service.dependencies().len(), 2);
//! ```

use std::any::{Any, type_name};
use std::fmt;
use std::sync::Arc;

use deptap_support::rendering::shorten_type_name;
use indexmap::IndexMap;

use crate::key::Key;

/// A type-erased, shareable payload.
///
/// Cloning a payload clones the [`Arc`], never the value.
#[derive(Clone)]
pub struct Payload {
    value: Arc<dyn Any + Send + Sync>,
    type_name: &'static str,
}

impl Payload {
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self::shared(Arc::new(value))
    }

    /// Wraps a value that is already shared elsewhere.
    pub fn shared<T: Any + Send + Sync>(value: Arc<T>) -> Self {
        Self {
            value,
            type_name: type_name::<T>(),
        }
    }

    #[inline]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.value.downcast_ref::<T>()
    }

    /// Returns a new handle to the payload if it holds a `T`.
    pub fn downcast_arc<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        Arc::clone(&self.value).downcast::<T>().ok()
    }

    #[inline]
    pub fn is<T: Any>(&self) -> bool {
        self.value.is::<T>()
    }

    /// Full type name of the stored value.
    #[inline]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// True if both payloads point at the same allocation.
    #[inline]
    pub fn ptr_eq(&self, other: &Payload) -> bool {
        Arc::ptr_eq(&self.value, &other.value)
    }
}

impl fmt::Debug for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Payload({})", shorten_type_name(self.type_name))
    }
}

/// An entry declaring named dependencies to be wired by the container.
///
/// Dependencies keep their declaration order; declaring the same name
/// twice has no further effect.
#[derive(Clone, Debug)]
pub struct Component {
    payload: Payload,
    depends: Vec<Key>,
}

impl Component {
    /// Creates a component around `payload` with an empty manifest.
    pub fn new<T: Any + Send + Sync>(payload: T) -> Self {
        Self::from_payload(Payload::new(payload))
    }

    pub fn from_payload(payload: Payload) -> Self {
        Self {
            payload,
            depends: Vec::new(),
        }
    }

    /// Declares a dependency on `key`.
    pub fn depends_on(mut self, key: impl Into<Key>) -> Self {
        let key = key.into();
        if !self.depends.contains(&key) {
            self.depends.push(key);
        }
        self
    }

    /// Declares several dependencies at once.
    pub fn with_dependencies<K: Into<Key>>(self, keys: impl IntoIterator<Item = K>) -> Self {
        keys.into_iter()
            .fold(self, |component, key| component.depends_on(key))
    }

    #[inline]
    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    /// Declared dependency names, in declaration order.
    #[inline]
    pub fn dependencies(&self) -> &[Key] {
        &self.depends
    }
}

/// A registry entry.
#[derive(Clone, Debug)]
pub enum Entry {
    /// Opaque value, returned unchanged.
    Value(Payload),
    /// Value with a dependency manifest.
    Component(Component),
}

impl Entry {
    pub fn value<T: Any + Send + Sync>(value: T) -> Self {
        Entry::Value(Payload::new(value))
    }

    #[inline]
    pub fn payload(&self) -> &Payload {
        match self {
            Entry::Value(payload) => payload,
            Entry::Component(component) => component.payload(),
        }
    }

    /// Whether the entry was declared as a component.
    ///
    /// This is the declared shape only. A declared component may still be
    /// treated as a value when its manifest names unknown keys, see
    /// [`is_component`](crate::resolver::is_component).
    #[inline]
    pub fn is_component(&self) -> bool {
        matches!(self, Entry::Component(_))
    }

    /// Declared dependency names; empty for values.
    pub fn dependencies(&self) -> &[Key] {
        match self {
            Entry::Value(_) => &[],
            Entry::Component(component) => component.dependencies(),
        }
    }
}

impl From<Component> for Entry {
    fn from(component: Component) -> Self {
        Entry::Component(component)
    }
}

impl From<Payload> for Entry {
    fn from(payload: Payload) -> Self {
        Entry::Value(payload)
    }
}

/// A dependency slot of a resolved component.
#[derive(Clone)]
pub enum Slot {
    /// Placeholder; the component was not wired.
    Unresolved,
    /// The shared, resolved dependency.
    Resolved(Arc<Instance>),
}

impl Slot {
    #[inline]
    pub fn is_resolved(&self) -> bool {
        matches!(self, Slot::Resolved(_))
    }

    #[inline]
    pub fn instance(&self) -> Option<&Arc<Instance>> {
        match self {
            Slot::Resolved(instance) => Some(instance),
            Slot::Unresolved => None,
        }
    }
}

impl fmt::Debug for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Slot::Unresolved => f.write_str("Unresolved"),
            Slot::Resolved(instance) => {
                write!(f, "Resolved({})", shorten_type_name(instance.payload().type_name()))
            }
        }
    }
}

/// A component after resolution.
#[derive(Clone, Debug)]
pub struct ResolvedComponent {
    payload: Payload,
    depends: IndexMap<Key, Slot>,
}

impl ResolvedComponent {
    pub(crate) fn new(payload: Payload, depends: IndexMap<Key, Slot>) -> Self {
        Self { payload, depends }
    }

    /// Builds the form of a component that is passed through unwired:
    /// same payload, every slot left as a placeholder.
    pub(crate) fn unwired(component: &Component) -> Self {
        let depends = component
            .dependencies()
            .iter()
            .map(|key| (key.clone(), Slot::Unresolved))
            .collect();
        Self::new(component.payload().clone(), depends)
    }

    #[inline]
    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    /// The dependency mapping, in declaration order.
    #[inline]
    pub fn depends(&self) -> &IndexMap<Key, Slot> {
        &self.depends
    }
}

/// The resolved form of an [`Entry`].
#[derive(Clone, Debug)]
pub enum Instance {
    Value(Payload),
    Component(ResolvedComponent),
}

impl Instance {
    /// Resolved form of an entry that needs no wiring.
    pub(crate) fn unwired(entry: &Entry) -> Self {
        match entry {
            Entry::Value(payload) => Instance::Value(payload.clone()),
            Entry::Component(component) => {
                Instance::Component(ResolvedComponent::unwired(component))
            }
        }
    }

    #[inline]
    pub fn payload(&self) -> &Payload {
        match self {
            Instance::Value(payload) => payload,
            Instance::Component(component) => component.payload(),
        }
    }

    /// Shortcut for `self.payload().downcast_ref()`.
    #[inline]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.payload().downcast_ref::<T>()
    }

    #[inline]
    pub fn is_component(&self) -> bool {
        matches!(self, Instance::Component(_))
    }

    pub fn as_component(&self) -> Option<&ResolvedComponent> {
        match self {
            Instance::Component(component) => Some(component),
            Instance::Value(_) => None,
        }
    }

    /// Looks up a dependency slot by name.
    pub fn slot(&self, name: &str) -> Option<&Slot> {
        self.as_component()?.depends.get(name)
    }

    /// Returns the wired dependency called `name`, if any.
    ///
    /// ```
    /// use deptap_container::prelude::*;
    ///
    /// let container = Container::builder()
    ///     .component("a", Component::new("a").depends_on("c"))
    ///     .value("c", 42i32)
    ///     .build()
    ///     .unwrap();
    ///
    /// let a = container.resolve("a").unwrap();
    /// assert_eq!(a.dependency("c").unwrap().downcast_ref::<i32>(), Some(&42));
    /// ```
    pub fn dependency(&self, name: &str) -> Option<&Arc<Instance>> {
        self.slot(name)?.instance()
    }

    /// Returns the payload of dependency `name` as a `T`.
    ///
    /// `None` when the slot is missing, unresolved, or holds another type.
    pub fn dependency_as<T: Any>(&self, name: &str) -> Option<&T> {
        self.dependency(name)?.downcast_ref::<T>()
    }

    /// True if every slot of this instance holds a resolved dependency.
    /// Values are trivially wired.
    pub fn is_wired(&self) -> bool {
        match self {
            Instance::Value(_) => true,
            Instance::Component(component) => component.depends.values().all(Slot::is_resolved),
        }
    }
}
