// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Finding the components of a scan.
//!
//! The engine only consumes [`ComponentDescriptor`]s. How they are found is up
//! to a [`Discovery`] implementation:
//!
//! * [`InventoryDiscovery`] walks the [`Registration`]s that the `Component`
//!   derive submits at compile time through `inventory`.
//! * [`StaticDiscovery`] is filled by hand, for callers that prefer explicit
//!   registration.

use crate::descriptor::{ComponentDescriptor, Injectable};
use crate::key::TypeKey;
use std::fmt;

/// A tag that selects which components a scan picks up.
///
/// Any `'static` type can serve as a marker; [`Component`] is the default one.
pub trait Marker: 'static {}

/// The default marker, used when a component does not name another one.
#[derive(Debug, Clone, Copy, Default)]
pub struct Component;

impl Marker for Component {}

/// A statically submitted component registration.
///
/// The `Component` derive emits one of these per type through
/// `inventory::submit!`.
pub struct Registration {
    marker: fn() -> TypeKey,
    module_path: &'static str,
    descriptor: fn() -> ComponentDescriptor,
}

impl Registration {
    /// Registers `T` under the marker `M`, declared in `module_path`.
    pub const fn new<T: Injectable, M: Marker>(module_path: &'static str) -> Self {
        Self {
            marker: TypeKey::of::<M>,
            module_path,
            descriptor: ComponentDescriptor::of::<T>,
        }
    }

    /// The marker this component carries.
    pub fn marker(&self) -> TypeKey {
        (self.marker)()
    }

    /// The module the component was declared in.
    pub fn module_path(&self) -> &'static str {
        self.module_path
    }

    /// Builds the component's descriptor.
    pub fn descriptor(&self) -> ComponentDescriptor {
        (self.descriptor)()
    }
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("marker", &self.marker())
            .field("module_path", &self.module_path)
            .finish_non_exhaustive()
    }
}

inventory::collect!(Registration);

/// A module-path prefix restricting which components a scan sees.
///
/// The empty scope contains every module. Otherwise a module is inside the
/// scope when its path equals the scope or continues it with `::`, so
/// `app::db` contains `app::db::pool` but not `app::dbx`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Scope(String);

impl Scope {
    /// Creates a scope from a module path. A trailing `::` is ignored.
    pub fn new(path: impl Into<String>) -> Self {
        let path = path.into();
        Self(path.trim().trim_end_matches("::").to_owned())
    }

    /// The scope containing every module.
    pub fn all() -> Self {
        Self::default()
    }

    /// The scope as written.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` if `module_path` lies inside this scope.
    pub fn contains(&self, module_path: &str) -> bool {
        if self.0.is_empty() {
            return true;
        }
        match module_path.strip_prefix(self.0.as_str()) {
            Some(rest) => rest.is_empty() || rest.starts_with("::"),
            None => false,
        }
    }
}

impl From<&str> for Scope {
    fn from(path: &str) -> Self {
        Scope::new(path)
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            f.write_str("<all modules>")
        } else {
            f.write_str(&self.0)
        }
    }
}

/// Produces the descriptors a scan works on.
///
/// Implementations return every component carrying `marker` whose module
/// lies in `scope`, in a stable order. The order is the tie-break order of
/// the construction sequence.
pub trait Discovery: Send + Sync {
    /// Finds the components for one scan.
    fn discover(&self, marker: TypeKey, scope: &Scope) -> Vec<ComponentDescriptor>;
}

/// Discovers the components submitted with `inventory` (what the `Component`
/// derive does).
#[derive(Debug, Clone, Copy, Default)]
pub struct InventoryDiscovery;

impl Discovery for InventoryDiscovery {
    fn discover(&self, marker: TypeKey, scope: &Scope) -> Vec<ComponentDescriptor> {
        inventory::iter::<Registration>
            .into_iter()
            .filter(|registration| {
                registration.marker() == marker && scope.contains(registration.module_path())
            })
            .map(Registration::descriptor)
            .collect()
    }
}

struct StaticEntry {
    marker: TypeKey,
    module_path: String,
    descriptor: ComponentDescriptor,
}

/// Discovery over an explicit, hand-built list of components.
///
/// Components are returned in registration order.
///
/// # Example
///
/// ```rust
/// use wiring_core::{
///     BoxError, Component, Dependencies, Injectable, Injector, StaticDiscovery, TypeKey,
/// };
///
/// struct Clock;
///
/// impl Injectable for Clock {
///     fn dependencies() -> Vec<TypeKey> {
///         Vec::new()
///     }
///
///     fn construct(_: &mut Dependencies<'_>) -> Result<Self, BoxError> {
///         Ok(Clock)
///     }
/// }
///
/// let discovery = StaticDiscovery::new().register::<Clock, Component>("app::time");
/// let injector = Injector::with_discovery(discovery);
/// injector.scan_components("app").unwrap();
/// assert!(injector.retrieve::<Clock>().is_ok());
/// ```
#[derive(Default)]
pub struct StaticDiscovery {
    entries: Vec<StaticEntry>,
}

impl StaticDiscovery {
    /// Creates an empty discovery.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `T`, marked with `M` and declared in `module_path`.
    pub fn register<T: Injectable, M: Marker>(mut self, module_path: &str) -> Self {
        self.add(TypeKey::of::<M>(), module_path, ComponentDescriptor::of::<T>());
        self
    }

    /// Adds an arbitrary descriptor.
    pub fn add(&mut self, marker: TypeKey, module_path: &str, descriptor: ComponentDescriptor) {
        self.entries.push(StaticEntry {
            marker,
            module_path: module_path.to_owned(),
            descriptor,
        });
    }

    /// Number of registered components, for any marker.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing was registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Discovery for StaticDiscovery {
    fn discover(&self, marker: TypeKey, scope: &Scope) -> Vec<ComponentDescriptor> {
        self.entries
            .iter()
            .filter(|entry| entry.marker == marker && scope.contains(&entry.module_path))
            .map(|entry| entry.descriptor.clone())
            .collect()
    }
}
