//! # deptap — Dependency Injection Container for Rust
//!
//! Register values and components under string keys, then look them up
//! with their dependencies wired in. Shared dependencies are shared
//! instances, and circular wiring is reported with the full chain.
//!
//! ```rust
//! use deptap::prelude::*;
//!
//! let container = Container::builder()
//!     .component("a", Component::new("a").depends_on("b").depends_on("c"))
//!     .component("b", Component::new("b").depends_on("d"))
//!     .component("c", Component::new("c").depends_on("d"))
//!     .value("d", 1i32)
//!     .build()
//!     .unwrap();
//!
//! let a = container.resolve("a").unwrap();
//! let via_b = a.dependency("b").unwrap().dependency("d").unwrap();
//! let via_c = a.dependency("c").unwrap().dependency("d").unwrap();
//! assert!(std::sync::Arc::ptr_eq(via_b, via_c));
//! ```

pub use deptap_container::*;
pub use deptap_support::*;
