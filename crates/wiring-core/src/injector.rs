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

//! The injector: owns the singleton registry and its lifecycle.
//!
//! An [`Injector`] starts out empty. A successful scan builds and publishes a
//! [`SingletonRegistry`]; [`clear`](Injector::clear) drops it again so a later
//! scan can run. Readers ([`retrieve`](Injector::retrieve) and
//! [`inject`](Injector::inject)) only ever see a complete registry or none.

use crate::config::{DuplicatePolicy, ScanConfig};
use crate::descriptor::{ComponentDescriptor, Dependencies, Injectable};
use crate::discovery::{Component, Discovery, InventoryDiscovery, Marker, Scope};
use crate::engine::{instantiate, resolve_arguments};
use crate::error::InjectorError;
use crate::graph::{topological_sort, DependencyGraph};
use crate::key::{join_keys, Instance, TypeKey};
use crate::registry::SingletonRegistry;
use arc_swap::ArcSwapOption;
use std::collections::HashSet;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// A dependency-injection container with a single, atomically published
/// singleton registry.
///
/// Scans and clears are serialised by a lock. The registry itself sits
/// behind an [`ArcSwapOption`], so retrieval never takes that lock.
pub struct Injector {
    discovery: Box<dyn Discovery>,
    scan_lock: Mutex<()>,
    registry: ArcSwapOption<SingletonRegistry>,
}

impl Injector {
    /// Creates an injector that discovers components registered with the
    /// `Component` derive.
    pub fn new() -> Self {
        Self::with_discovery(InventoryDiscovery)
    }

    /// Creates an injector backed by a custom discovery.
    pub fn with_discovery(discovery: impl Discovery + 'static) -> Self {
        Self {
            discovery: Box::new(discovery),
            scan_lock: Mutex::new(()),
            registry: ArcSwapOption::empty(),
        }
    }

    /// Discovers every component marked with `marker` inside `scope`, then
    /// builds and publishes their singletons.
    ///
    /// Duplicate registrations keep the first one found.
    pub fn scan(&self, marker: TypeKey, scope: &str) -> Result<(), InjectorError> {
        let config = ScanConfig {
            scope: scope.to_owned(),
            ..ScanConfig::default()
        };
        self.scan_with(marker, &config)
    }

    /// Like [`scan`](Injector::scan), with a marker type instead of a key.
    pub fn scan_marked<M: Marker>(&self, scope: &str) -> Result<(), InjectorError> {
        self.scan(TypeKey::of::<M>(), scope)
    }

    /// Scans for components carrying the default [`Component`] marker.
    pub fn scan_components(&self, scope: &str) -> Result<(), InjectorError> {
        self.scan_marked::<Component>(scope)
    }

    /// Scans for `marker` using the scope and duplicate policy of `config`.
    pub fn scan_with(&self, marker: TypeKey, config: &ScanConfig) -> Result<(), InjectorError> {
        let _guard = self.lock_scan();
        self.ensure_not_scanned()?;

        let scope = Scope::new(config.scope.as_str());
        log::info!("Scanning for `{marker}` components in {scope}...");
        let descriptors = self.discovery.discover(marker, &scope);
        let descriptors = deduplicate(descriptors, config.duplicates)?;

        self.build_and_publish(&descriptors)
    }

    /// Builds and publishes singletons for descriptors the caller already
    /// discovered.
    pub fn scan_descriptors(
        &self,
        descriptors: Vec<ComponentDescriptor>,
    ) -> Result<(), InjectorError> {
        let _guard = self.lock_scan();
        self.ensure_not_scanned()?;

        let descriptors = deduplicate(descriptors, DuplicatePolicy::KeepFirst)?;
        self.build_and_publish(&descriptors)
    }

    fn build_and_publish(&self, descriptors: &[ComponentDescriptor]) -> Result<(), InjectorError> {
        let graph = DependencyGraph::build(descriptors);
        let order = topological_sort(&graph)?;
        log::debug!("Construction order: {}", join_keys(&order));

        let registry = instantiate(descriptors, &order)?;
        log::info!("Scan complete: {} singletons constructed", registry.len());

        self.registry.store(Some(Arc::new(registry)));
        Ok(())
    }

    /// Returns the singleton of type `T`.
    pub fn retrieve<T: Send + Sync + 'static>(&self) -> Result<Arc<T>, InjectorError> {
        let key = TypeKey::of::<T>();
        self.retrieve_instance(key)?
            .downcast::<T>()
            .map_err(|_| InjectorError::NoSuchSingleton(key))
    }

    /// Returns the type-erased singleton registered under `key`.
    pub fn retrieve_instance(&self, key: TypeKey) -> Result<Instance, InjectorError> {
        log::trace!("Retrieving `{key}`");
        self.published()?
            .get_instance(key)
            .ok_or(InjectorError::NoSuchSingleton(key))
    }

    /// Builds a new, unregistered instance of `T` from the current
    /// singletons.
    ///
    /// Every call returns an independent instance. `T` itself does not have
    /// to be a scanned component, only its dependencies do.
    pub fn inject<T: Injectable>(&self) -> Result<T, InjectorError> {
        let registry = self.published()?;
        let component = TypeKey::of::<T>();
        log::trace!("Injecting a transient `{component}`");

        let arguments = resolve_arguments(&T::dependencies(), |dependency| {
            registry
                .get_instance(dependency)
                .ok_or(InjectorError::NoSuchSingleton(dependency))
        })?;

        let mut deps = Dependencies::new(&arguments);
        T::construct(&mut deps)
            .map_err(|source| InjectorError::InstantiationFailed { component, source })
    }

    /// Forgets the published registry.
    ///
    /// Instances already handed out stay alive as long as they are
    /// referenced, and a following scan builds fresh ones next to them.
    /// Meant for tests.
    pub fn clear(&self) {
        let _guard = self.lock_scan();
        if self.registry.swap(None).is_some() {
            log::warn!("Injector cleared; previously retrieved singletons are not destroyed");
        }
    }

    /// Returns `true` once a scan has succeeded and until [`clear`](Injector::clear).
    pub fn is_scanned(&self) -> bool {
        self.registry.load().is_some()
    }

    /// The published registry, if any.
    pub fn registry(&self) -> Option<Arc<SingletonRegistry>> {
        self.registry.load_full()
    }

    /// Component types in the order the last scan constructed them.
    pub fn construction_order(&self) -> Vec<TypeKey> {
        self.registry()
            .map(|registry| registry.keys().to_vec())
            .unwrap_or_default()
    }

    fn published(&self) -> Result<Arc<SingletonRegistry>, InjectorError> {
        self.registry.load_full().ok_or(InjectorError::NotYetScanned)
    }

    fn ensure_not_scanned(&self) -> Result<(), InjectorError> {
        if self.is_scanned() {
            return Err(InjectorError::AlreadyScanned);
        }
        Ok(())
    }

    fn lock_scan(&self) -> MutexGuard<'_, ()> {
        // The guarded data is `()`, a panicking scan cannot leave it inconsistent.
        self.scan_lock.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for Injector {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Injector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Injector")
            .field("registry", &self.registry())
            .finish_non_exhaustive()
    }
}

fn deduplicate(
    descriptors: Vec<ComponentDescriptor>,
    policy: DuplicatePolicy,
) -> Result<Vec<ComponentDescriptor>, InjectorError> {
    let mut seen = HashSet::with_capacity(descriptors.len());
    let mut unique = Vec::with_capacity(descriptors.len());
    for descriptor in descriptors {
        let key = descriptor.key();
        if seen.insert(key) {
            unique.push(descriptor);
            continue;
        }
        match policy {
            DuplicatePolicy::KeepFirst => {
                log::warn!("`{key}` was discovered more than once, keeping the first")
            }
            DuplicatePolicy::Reject => return Err(InjectorError::DuplicateComponent(key)),
        }
    }
    Ok(unique)
}
