//! # The Container — entry point of deptap
//!
//! Turns a [`Registry`] into a lookup that returns each entry with its
//! dependencies wired.
//!
//! # Architecture
//! ```text
//! ContainerBuilder ──build()──┐
//!                             ├──> Container ──resolve(key)──> Arc<Instance>
//! container_factory(reg, lazy)┘        │
//!                                      └── MemoStore (one per container)
//! ```
//!
//! # Examples
//! ```rust
//! use deptap_container::prelude::*;
//!
//! struct UserService {
//!     name: &'static str,
//! }
//!
//! let container = Container::builder()
//!     .component("userService", Component::new(UserService { name: "users" }).depends_on("userRepo"))
//!     .component("userRepo", Component::new("userRepo").depends_on("databaseUrl"))
//!     .value("databaseUrl", "postgres://localhost")
//!     .build()
//!     .expect("Failed to build container");
//!
//! let service = container.resolve("userService").expect("Failed to resolve");
//! assert_eq!(service.downcast_ref::<UserService>().unwrap().name, "users");
//!
//! let repo = service.dependency("userRepo").unwrap();
//! assert_eq!(repo.dependency_as::<&str>("databaseUrl"), Some(&"postgres://localhost"));
//! ```

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, info, instrument, trace};

use crate::entry::{Component, Entry, Instance, Payload};
use crate::error::Result;
use crate::graph::GraphValidator;
use crate::key::Key;
use crate::mode::{ContainerOptions, Mode};
use crate::provider::{Provider, ProviderRegistry};
use crate::registry::Registry;
use crate::resolver::{MemoStore, Resolver};

// ============================================================
// Factory
// ============================================================

/// Builds a container from `registry`.
///
/// With `lazy == false` every key is resolved now, in registry order, and
/// any reachable cycle fails this call. With `lazy == true` nothing is
/// resolved until the first lookup.
///
/// ```rust
/// use deptap_container::prelude::*;
///
/// let mut registry = Registry::new();
/// registry.register("a", Component::new("a").depends_on("b")).unwrap();
/// registry.register("b", Component::new("b").depends_on("a")).unwrap();
///
/// let err = container_factory(registry.clone(), false).unwrap_err();
/// assert!(err.to_string().starts_with("Circular dependency detected: a -> b -> a"));
///
/// let container = container_factory(registry, true).unwrap();
/// assert!(container.resolve("b").is_err());
/// ```
pub fn container_factory(registry: Registry, lazy: bool) -> Result<Container> {
    Container::from_registry(
        registry,
        ContainerOptions {
            mode: Mode::from_lazy(lazy),
            ..ContainerOptions::default()
        },
    )
}

// ============================================================
// ContainerBuilder
// ============================================================

/// Assembles a registry and the options for a [`Container`].
///
/// Registrations are recorded in order and applied by
/// [`build()`](ContainerBuilder::build), so flags may be set before or
/// after them. Flags set through [`mode`](Self::mode), [`strict`](Self::strict)
/// or [`allow_override`](Self::allow_override) win over [`options`](Self::options)
/// regardless of call order.
///
/// # Examples
/// ```rust
/// use deptap_container::prelude::*;
///
/// struct Config {
///     database_url: &'static str,
/// }
///
/// struct Database;
///
/// let container = Container::builder()
///     .lazy(true)
///     .value("config", Config { database_url: "postgres://localhost" })
///     .component("database", Component::new(Database).depends_on("config"))
///     .build()?;
///
/// let database = container.resolve("database")?;
/// let config = database.dependency_as::<Config>("config").unwrap();
/// assert_eq!(config.database_url, "postgres://localhost");
/// # Ok::<(), DeptapError>(())
/// ```
pub struct ContainerBuilder {
    registrations: Vec<(Key, Entry)>,
    options: ContainerOptions,
    mode: Option<Mode>,
    strict: Option<bool>,
    allow_override: Option<bool>,
}

impl ContainerBuilder {
    fn new() -> Self {
        Self {
            registrations: Vec::new(),
            options: ContainerOptions::default(),
            mode: None,
            strict: None,
            allow_override: None,
        }
    }

    /// Set base options, e.g. ones loaded from config.
    pub fn options(mut self, options: ContainerOptions) -> Self {
        self.options = options;
        self
    }

    pub fn mode(mut self, mode: Mode) -> Self {
        self.mode = Some(mode);
        self
    }

    /// Shorthand for [`mode`](Self::mode) with [`Mode::Lazy`] or [`Mode::Eager`].
    pub fn lazy(self, lazy: bool) -> Self {
        self.mode(Mode::from_lazy(lazy))
    }

    /// Validate every manifest against the registry before resolving.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = Some(strict);
        self
    }

    /// Allow later registrations to replace earlier ones with the same key.
    pub fn allow_override(mut self, allow: bool) -> Self {
        self.allow_override = Some(allow);
        self
    }

    /// The options `build()` will use.
    pub fn effective_options(&self) -> ContainerOptions {
        ContainerOptions {
            mode: self.mode.unwrap_or(self.options.mode),
            strict: self.strict.unwrap_or(self.options.strict),
            allow_override: self.allow_override.unwrap_or(self.options.allow_override),
        }
    }

    // ── Registration ──

    /// Register an opaque value.
    pub fn value<T: Any + Send + Sync>(self, key: impl Into<Key>, value: T) -> Self {
        self.entry(key, Entry::value(value))
    }

    /// Register a component.
    pub fn component(self, key: impl Into<Key>, component: Component) -> Self {
        self.entry(key, component)
    }

    /// Register any entry.
    pub fn entry(mut self, key: impl Into<Key>, entry: impl Into<Entry>) -> Self {
        self.registrations.push((key.into(), entry.into()));
        self
    }

    // ── Provider modules ──

    /// Add a [`Provider`] module.
    pub fn add_provider(mut self, provider: &dyn Provider) -> Self {
        debug!(provider = provider.name(), "Adding provider");
        provider.register(&mut self);
        self
    }

    // ── Build ──

    /// Build the container.
    ///
    /// # Errors
    /// - [`DeptapError::AlreadyRegistered`](crate::error::DeptapError::AlreadyRegistered) — a key was registered twice
    /// - [`DeptapError::CircularDependency`](crate::error::DeptapError::CircularDependency) — eager mode, or strict mode
    /// - [`DeptapError::NotRegistered`](crate::error::DeptapError::NotRegistered) — strict mode, unknown dependency
    pub fn build(self) -> Result<Container> {
        let options = self.effective_options();

        let mut registry = Registry::new();
        for (key, entry) in self.registrations {
            registry.insert(key, entry, options.allow_override)?;
        }

        Container::from_registry(registry, options)
    }
}

impl ProviderRegistry for ContainerBuilder {
    fn register_value(&mut self, key: Key, payload: Payload) {
        self.registrations.push((key, Entry::Value(payload)));
    }

    fn register_component(&mut self, key: Key, component: Component) {
        self.registrations.push((key, Entry::Component(component)));
    }
}

impl fmt::Debug for ContainerBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContainerBuilder")
            .field("registered", &self.registrations.len())
            .field("options", &self.effective_options())
            .finish()
    }
}

// ═══════════════════════════════════════════
// Container
// ═══════════════════════════════════════════

/// A wired registry.
///
/// Owns its registry and its memo store; two containers never share
/// resolution state, even when built from clones of the same registry.
/// The store lock is held for one whole top-level resolution, so lookups
/// from several threads are serialized.
pub struct Container {
    registry: Registry,
    store: Mutex<MemoStore>,
    mode: Mode,
}

impl Container {
    /// Create a new builder.
    pub fn builder() -> ContainerBuilder {
        ContainerBuilder::new()
    }

    #[instrument(skip(registry), name = "container_build", fields(entries = registry.len()))]
    pub(crate) fn from_registry(registry: Registry, options: ContainerOptions) -> Result<Self> {
        info!(mode = %options.mode, strict = options.strict, "Building container");

        if options.strict {
            GraphValidator::new(&registry).validate()?;
        }

        let mut store = MemoStore::new();
        if options.mode.is_eager() {
            let mut resolver = Resolver::new(&registry, &mut store);
            for key in registry.keys() {
                resolver.resolve_root(key)?;
            }
            debug!(resolved = store.len(), "Eager resolution finished");
        }

        info!("Container built");
        Ok(Self {
            registry,
            store: Mutex::new(store),
            mode: options.mode,
        })
    }

    /// Resolve the entry registered under `key`.
    ///
    /// The first call wires the entry and everything it depends on; later
    /// calls return the same [`Arc`].
    ///
    /// # Errors
    /// - [`DeptapError::NotRegistered`](crate::error::DeptapError::NotRegistered) — `key` is not in the registry
    /// - [`DeptapError::CircularDependency`](crate::error::DeptapError::CircularDependency) — the wiring of `key` loops
    pub fn resolve(&self, key: &str) -> Result<Arc<Instance>> {
        trace!(key, "Resolving");
        let mut store = self.store.lock();
        let mut resolver = Resolver::new(&self.registry, &mut store);
        resolver.resolve_root(key)
    }

    /// Resolve `key` and hand back its payload as a `T`.
    ///
    /// Returns `Ok(None)` when the payload holds another type.
    pub fn resolve_as<T: Any + Send + Sync>(&self, key: &str) -> Result<Option<Arc<T>>> {
        Ok(self.resolve(key)?.payload().downcast_arc::<T>())
    }

    /// Whether `key` has been wired already.
    pub fn is_resolved(&self, key: &str) -> bool {
        self.store.lock().has_resolved(key)
    }

    #[inline]
    pub fn contains(&self, key: &str) -> bool {
        self.registry.contains_key(key)
    }

    /// Registered keys, in registration order.
    pub fn keys(&self) -> impl Iterator<Item = &Key> {
        self.registry.keys()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.registry.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    #[inline]
    pub fn mode(&self) -> Mode {
        self.mode
    }
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Container")
            .field("registered", &self.registry.len())
            .field("resolved", &self.store.lock().len())
            .field("mode", &self.mode)
            .finish()
    }
}

// ═══════════════════════════════════════════
// Prelude
// ═══════════════════════════════════════════

pub mod prelude {
    pub use super::{Container, ContainerBuilder, container_factory};
    pub use crate::entry::{Component, Entry, Instance, Payload, Slot};
    pub use crate::error::{DeptapError, Result};
    pub use crate::key::Key;
    pub use crate::mode::{ContainerOptions, Mode};
    pub use crate::provider::{Provider, ProviderRegistry};
    pub use crate::registry::Registry;
}

// ═══════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════
