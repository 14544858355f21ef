//! Core container implementation for deptap.
//!
//! A registry of named entries goes in, a container comes out. Asking the
//! container for a key returns that entry with every declared dependency
//! resolved, each key wired at most once.

pub mod container;
pub mod entry;
pub mod error;
mod graph;
pub mod key;
pub mod mode;
pub mod provider;
pub mod registry;
pub mod resolver;

pub use container::{Container, ContainerBuilder, container_factory, prelude};
pub use entry::{Component, Entry, Instance, Payload, Slot};
pub use error::{DeptapError, Result};
pub use key::Key;
pub use mode::{ContainerOptions, Mode};
pub use registry::Registry;
