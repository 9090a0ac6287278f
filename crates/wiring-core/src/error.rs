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

//! Errors reported by scanning, retrieval and injection.

use crate::graph::CycleError;
use crate::key::{join_keys, BoxError, TypeKey};
use thiserror::Error;

/// Every way a scan, a retrieval or an injection can fail.
///
/// None of these are retried; each is returned to the caller of the
/// operation that triggered it.
#[derive(Debug, Error)]
pub enum InjectorError {
    /// A scan was attempted while a registry is already published.
    #[error("components have already been scanned; clear the injector before scanning again")]
    AlreadyScanned,

    /// The dependency graph contains a cycle.
    #[error("cyclic dependencies detected among: {}", join_keys(.unresolved))]
    CyclicDependency {
        /// Nodes the sort could not order, in discovery order.
        unresolved: Vec<TypeKey>,
    },

    /// A component depends on a type that was never discovered.
    #[error("missing dependency: `{dependent}` requires `{dependency}`, which was not discovered")]
    MissingDependency {
        /// The component that could not be built.
        dependent: TypeKey,
        /// The type nothing provides.
        dependency: TypeKey,
    },

    /// A constructor returned an error.
    #[error("instantiation failed for `{component}`")]
    InstantiationFailed {
        /// The component whose constructor failed.
        component: TypeKey,
        /// What the constructor reported.
        #[source]
        source: BoxError,
    },

    /// `retrieve` or `inject` was called before any successful scan.
    #[error("components have not been scanned yet")]
    NotYetScanned,

    /// No singleton is registered for the type.
    #[error("no such singleton `{0}`")]
    NoSuchSingleton(TypeKey),

    /// Discovery produced the same component twice under the `reject` policy.
    #[error("component `{0}` was discovered more than once")]
    DuplicateComponent(TypeKey),
}

impl From<CycleError> for InjectorError {
    fn from(err: CycleError) -> Self {
        InjectorError::CyclicDependency {
            unresolved: err.into_unresolved(),
        }
    }
}
