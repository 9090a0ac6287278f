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

//! # Wiring Core
//!
//! The dependency graph resolution and instantiation engine behind `wiring`.
//!
//! A scan flows through these pieces, leaves first:
//!
//! 1. a [`Discovery`] yields the [`ComponentDescriptor`]s carrying a marker,
//! 2. [`DependencyGraph::build`] links every type to its dependencies,
//! 3. [`topological_sort`] orders them dependencies first and rejects cycles,
//! 4. [`instantiate`] constructs each singleton into a [`SingletonRegistry`],
//! 5. the [`Injector`] publishes that registry for
//!    [`retrieve`](Injector::retrieve) and [`inject`](Injector::inject).

#![warn(missing_docs)]

pub mod config;
pub mod descriptor;
pub mod discovery;
pub mod engine;
pub mod error;
pub mod graph;
pub mod injector;
pub mod key;
pub mod registry;

pub use config::{ConfigError, DuplicatePolicy, ScanConfig};
pub use descriptor::{ArgumentError, ComponentDescriptor, Dependencies, Injectable};
pub use discovery::{
    Component, Discovery, InventoryDiscovery, Marker, Registration, Scope, StaticDiscovery,
};
pub use engine::instantiate;
pub use error::InjectorError;
pub use graph::{topological_sort, CycleError, DependencyGraph, GraphNode};
pub use injector::Injector;
pub use key::{BoxError, Instance, TypeKey};
pub use registry::SingletonRegistry;
