//! Provider trait — a module of related registrations.
//!
//! Providers group entries that belong together so an application can
//! assemble its registry by concern instead of in one long block.
//!
//! # Examples
//! ```rust
//! use deptap_container::prelude::*;
//!
//! struct StorageProvider;
//!
//! impl Provider for StorageProvider {
//!     fn register(&self, registry: &mut dyn ProviderRegistry) {
//!         registry.register_value(Key::new("databaseUrl"), Payload::new("postgres://localhost"));
//!         registry.register_component(
//!             Key::new("database"),
//!             Component::new("database").depends_on("databaseUrl"),
//!         );
//!     }
//! }
//!
//! let container = Container::builder()
//!     .add_provider(&StorageProvider)
//!     .build()
//!     .unwrap();
//!
//! let db = container.resolve("database").unwrap();
//! assert_eq!(db.dependency_as::<&str>("databaseUrl"), Some(&"postgres://localhost"));
//! ```

use crate::entry::{Component, Payload};
use crate::key::Key;

/// A module that registers related entries into a container.
pub trait Provider: Send + Sync {
    /// Register entries. Called once while the container is assembled.
    fn register(&self, registry: &mut dyn ProviderRegistry);

    /// Optional: human-readable name for logs.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

/// Interface that providers use to register entries.
///
/// A subset of [`ContainerBuilder`](crate::container::ContainerBuilder)'s
/// API, so providers can be exercised against a mock.
pub trait ProviderRegistry {
    /// Register an opaque value.
    fn register_value(&mut self, key: Key, payload: Payload);

    /// Register a component with its dependency manifest.
    fn register_component(&mut self, key: Key, component: Component);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct MockRegistry {
        values: Vec<Key>,
        components: Vec<(Key, usize)>,
    }

    impl ProviderRegistry for MockRegistry {
        fn register_value(&mut self, key: Key, _payload: Payload) {
            self.values.push(key);
        }

        fn register_component(&mut self, key: Key, component: Component) {
            self.components.push((key, component.dependencies().len()));
        }
    }

    struct TestProvider;

    impl Provider for TestProvider {
        fn register(&self, registry: &mut dyn ProviderRegistry) {
            registry.register_value(Key::new("cValue"), Payload::new(42i32));
            registry.register_component(
                Key::new("bComponent"),
                Component::new("bComponent").depends_on("cValue"),
            );
        }
    }

    #[test]
    fn provider_registers_entries() {
        let mut registry = MockRegistry::default();
        TestProvider.register(&mut registry);

        assert_eq!(registry.values, vec![Key::new("cValue")]);
        assert_eq!(registry.components, vec![(Key::new("bComponent"), 1)]);
    }

    #[test]
    fn provider_has_name() {
        assert!(TestProvider.name().contains("TestProvider"));
    }
}
