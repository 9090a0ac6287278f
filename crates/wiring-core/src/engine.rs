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

//! The instantiation engine: builds every singleton in dependency order.

use crate::descriptor::{ComponentDescriptor, Dependencies};
use crate::error::InjectorError;
use crate::key::{Instance, TypeKey};
use crate::registry::SingletonRegistry;
use std::collections::HashMap;

/// Constructs one singleton per descriptor, following `order`.
///
/// `order` must list dependencies before their dependents, as produced by
/// [`topological_sort`](crate::graph::topological_sort). Keys without a
/// descriptor (dependencies nobody provides) are skipped; the first
/// component that needs one fails with
/// [`MissingDependency`](InjectorError::MissingDependency).
///
/// The registry is private to this call until it returns, so a failure never
/// exposes a partially built registry.
pub fn instantiate(
    descriptors: &[ComponentDescriptor],
    order: &[TypeKey],
) -> Result<SingletonRegistry, InjectorError> {
    let recipes: HashMap<TypeKey, &ComponentDescriptor> = descriptors
        .iter()
        .map(|descriptor| (descriptor.key(), descriptor))
        .collect();

    let mut registry = SingletonRegistry::new();
    for &key in order {
        let Some(descriptor) = recipes.get(&key) else {
            log::trace!("No recipe for `{key}`, leaving it to its dependents to report");
            continue;
        };

        let arguments = resolve_arguments(descriptor.dependencies(), |dependency| {
            registry
                .get_instance(dependency)
                .ok_or(InjectorError::MissingDependency {
                    dependent: key,
                    dependency,
                })
        })?;

        let instance = construct(descriptor, &arguments)?;
        log::debug!("Constructed singleton `{key}`");
        registry.insert_instance(key, instance);
    }

    Ok(registry)
}

/// Looks up every dependency with `lookup`, keeping declaration order.
pub(crate) fn resolve_arguments<F>(
    dependencies: &[TypeKey],
    mut lookup: F,
) -> Result<Vec<(TypeKey, Instance)>, InjectorError>
where
    F: FnMut(TypeKey) -> Result<Instance, InjectorError>,
{
    dependencies
        .iter()
        .map(|&dependency| lookup(dependency).map(|instance| (dependency, instance)))
        .collect()
}

fn construct(
    descriptor: &ComponentDescriptor,
    arguments: &[(TypeKey, Instance)],
) -> Result<Instance, InjectorError> {
    let mut deps = Dependencies::new(arguments);
    descriptor
        .construct(&mut deps)
        .map_err(|source| InjectorError::InstantiationFailed {
            component: descriptor.key(),
            source,
        })
}
