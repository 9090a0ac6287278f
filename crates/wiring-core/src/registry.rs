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

//! The singleton registry produced by a scan.
//!
//! A [`SingletonRegistry`] maps each component's [`TypeKey`] to its one shared
//! instance. It is filled by the instantiation engine while a scan runs and
//! is only published to readers once every component was built.

use crate::key::{Instance, TypeKey};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// A type-map of singleton instances keyed by [`TypeKey`].
///
/// Instances are stored as `Arc<dyn Any + Send + Sync>` and can be retrieved
/// by their concrete type via [`get`](SingletonRegistry::get).
///
/// # Example
///
/// ```rust
/// use wiring_core::SingletonRegistry;
///
/// struct Config { port: u16 }
///
/// let mut registry = SingletonRegistry::new();
/// registry.insert(Config { port: 8080 });
///
/// let config = registry.get::<Config>().unwrap();
/// assert_eq!(config.port, 8080);
/// ```
#[derive(Default, Clone)]
pub struct SingletonRegistry {
    singletons: HashMap<TypeKey, Instance>,
    order: Vec<TypeKey>,
}

impl SingletonRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a value, keyed by `T`'s [`TypeKey`].
    pub fn insert<T: Send + Sync + 'static>(&mut self, value: T) {
        self.insert_instance(TypeKey::of::<T>(), Arc::new(value));
    }

    /// Inserts an already type-erased instance under `key`.
    ///
    /// If an instance was already registered for `key`, it is replaced.
    pub fn insert_instance(&mut self, key: TypeKey, instance: Instance) {
        if self.singletons.insert(key, instance).is_none() {
            self.order.push(key);
        }
    }

    /// Retrieves the singleton of type `T`.
    ///
    /// Returns `None` if no instance of type `T` has been registered.
    #[must_use]
    pub fn get<T: Send + Sync + 'static>(&self) -> Option<Arc<T>> {
        self.get_instance(TypeKey::of::<T>())
            .and_then(|instance| instance.downcast::<T>().ok())
    }

    /// Retrieves the type-erased singleton registered under `key`.
    #[must_use]
    pub fn get_instance(&self, key: TypeKey) -> Option<Instance> {
        self.singletons.get(&key).cloned()
    }

    /// Returns `true` if an instance of type `T` is registered.
    #[must_use]
    pub fn contains<T: Send + Sync + 'static>(&self) -> bool {
        self.contains_key(TypeKey::of::<T>())
    }

    /// Returns `true` if an instance is registered under `key`.
    #[must_use]
    pub fn contains_key(&self, key: TypeKey) -> bool {
        self.singletons.contains_key(&key)
    }

    /// Keys in the order their instances were first inserted.
    ///
    /// For a registry built by a scan this is the construction order.
    pub fn keys(&self) -> &[TypeKey] {
        &self.order
    }

    /// Returns the number of registered singletons.
    #[must_use]
    pub fn len(&self) -> usize {
        self.singletons.len()
    }

    /// Returns `true` if no singletons are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.singletons.is_empty()
    }
}

impl fmt::Debug for SingletonRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SingletonRegistry")
            .field("singletons", &self.order)
            .finish()
    }
}
