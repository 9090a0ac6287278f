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

//! The public-facing API of `wiring`, a small dependency-injection container.
//!
//! Mark structs with `#[derive(Component)]`, scan their module once at
//! startup, then retrieve the singletons or inject fresh instances.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use wiring::Component;
//!
//! #[derive(Component)]
//! struct Foo;
//!
//! #[derive(Component)]
//! struct Bar {
//!     foo: Arc<Foo>,
//! }
//!
//! fn main() -> anyhow::Result<()> {
//!     wiring::scan_components(module_path!())?;
//!
//!     let bar = wiring::retrieve::<Bar>()?;
//!     assert!(Arc::ptr_eq(&bar.foo, &wiring::retrieve::<Foo>()?));
//!
//!     let transient: Bar = wiring::inject()?;
//!     assert!(Arc::ptr_eq(&transient.foo, &bar.foo));
//!     Ok(())
//! }
//! ```
//!
//! The free functions share one process-wide [`Injector`]. Code that wants
//! its own container (tests, embedded scopes) creates an [`Injector`]
//! directly.

// Lets the `Component` derive refer to `::wiring` from inside this crate too.
extern crate self as wiring;

use anyhow::{Context, Result};
use std::path::Path;
use std::sync::{Arc, OnceLock};

pub use wiring_core::{
    BoxError, Component, ComponentDescriptor, ConfigError, Dependencies, Discovery,
    DuplicatePolicy, Injectable, Injector, InjectorError, InventoryDiscovery, Marker,
    Registration, ScanConfig, Scope, SingletonRegistry, StaticDiscovery, TypeKey,
};
pub use wiring_macros::Component;

/// Lower-level building blocks: graph, sort and engine.
pub use wiring_core as engine;

#[doc(hidden)]
pub use inventory;

/// The most common imports.
pub mod prelude {
    pub use crate::{Component, Dependencies, Injectable, Injector, InjectorError, Marker, TypeKey};
}

/// The process-wide injector behind the free functions of this crate.
pub fn injector() -> &'static Injector {
    static DEFAULT: OnceLock<Injector> = OnceLock::new();
    DEFAULT.get_or_init(Injector::new)
}

/// Scans `scope` for components marked with `M`.
///
/// See [`Injector::scan`].
pub fn scan<M: Marker>(scope: &str) -> Result<(), InjectorError> {
    injector().scan_marked::<M>(scope)
}

/// Scans `scope` for components carrying the default [`Component`] marker.
pub fn scan_components(scope: &str) -> Result<(), InjectorError> {
    injector().scan_components(scope)
}

/// Returns the singleton of type `T`.
pub fn retrieve<T: Send + Sync + 'static>() -> Result<Arc<T>, InjectorError> {
    injector().retrieve::<T>()
}

/// Builds a new, unregistered `T` from the current singletons.
pub fn inject<T: Injectable>() -> Result<T, InjectorError> {
    injector().inject::<T>()
}

/// Forgets the scanned singletons. Meant for tests.
pub fn clear() {
    injector().clear();
}

/// Loads [`ScanConfig::FILE_NAME`] from the working directory and scans the
/// configured scope for [`Component`]s.
pub fn bootstrap() -> Result<()> {
    bootstrap_from(ScanConfig::FILE_NAME)
}

/// Like [`bootstrap`], reading the configuration from `path`.
pub fn bootstrap_from(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let config = ScanConfig::load(path)
        .with_context(|| format!("loading scan configuration from {}", path.display()))?;
    injector()
        .scan_with(TypeKey::of::<Component>(), &config)
        .with_context(|| format!("scanning `{}`", Scope::new(config.scope.as_str())))?;
    log::info!("Bootstrap complete");
    Ok(())
}
