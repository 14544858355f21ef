//! Resolution modes and container options.
//!
//! The mode decides when the registry gets wired:
//! - [`Mode::Eager`] — every key is resolved while the container is built
//! - [`Mode::Lazy`] — each key is resolved the first time it is requested
//!
//! [`ContainerOptions`] bundles the mode with the other build flags and can
//! be loaded from an application's own configuration through `serde`.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Defines when the container wires its entries.
///
/// # Examples
/// ```
/// use deptap_container::mode::Mode;
///
/// assert_eq!(Mode::default(), Mode::Eager);
/// assert_eq!(Mode::from_lazy(true), Mode::Lazy);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Resolve every key, in registry order, at construction time.
    ///
    /// Any cycle reachable from any key fails the build.
    #[default]
    Eager,

    /// Resolve keys on first demand.
    ///
    /// Cycles surface only when the cyclic part of the graph is reached.
    Lazy,
}

impl Mode {
    /// Maps the `lazy` flag of [`container_factory`](crate::container::container_factory).
    #[inline]
    pub fn from_lazy(lazy: bool) -> Self {
        if lazy { Mode::Lazy } else { Mode::Eager }
    }

    #[inline]
    pub fn is_lazy(&self) -> bool {
        matches!(self, Mode::Lazy)
    }

    #[inline]
    pub fn is_eager(&self) -> bool {
        matches!(self, Mode::Eager)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Eager => write!(f, "eager"),
            Mode::Lazy => write!(f, "lazy"),
        }
    }
}

/// Build-time options for a [`Container`](crate::container::Container).
///
/// Every field has a default, so a partial config section deserializes:
///
/// ```toml
/// [wiring]
/// mode = "lazy"
/// strict = true
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainerOptions {
    /// When entries get wired.
    pub mode: Mode,
    /// Validate every component's manifest against the registry before
    /// resolving anything. Unknown dependency names and cycles become
    /// build errors instead of being classified away.
    pub strict: bool,
    /// Let a later registration replace an earlier one with the same key.
    pub allow_override: bool,
}

impl ContainerOptions {
    pub fn lazy() -> Self {
        Self {
            mode: Mode::Lazy,
            ..Self::default()
        }
    }
}
