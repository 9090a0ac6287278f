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

//! Type Descriptors: what a component needs and how to build it.

use crate::key::{BoxError, Instance, TypeKey};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// A type that can be built from already-constructed dependencies.
///
/// Each implementing type has exactly one designated constructor,
/// [`construct`](Injectable::construct), whose parameters are listed in order
/// by [`dependencies`](Injectable::dependencies). The `Component` derive
/// implements this trait for structs whose fields are `Arc<T>` dependencies.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use wiring_core::{BoxError, Dependencies, Injectable, TypeKey};
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
/// struct Scheduler {
///     clock: Arc<Clock>,
/// }
///
/// impl Injectable for Scheduler {
///     fn dependencies() -> Vec<TypeKey> {
///         vec![TypeKey::of::<Clock>()]
///     }
///
///     fn construct(deps: &mut Dependencies<'_>) -> Result<Self, BoxError> {
///         Ok(Scheduler { clock: deps.take()? })
///     }
/// }
/// ```
pub trait Injectable: Sized + Send + Sync + 'static {
    /// The dependency types of the constructor, in parameter order.
    fn dependencies() -> Vec<TypeKey>;

    /// Builds an instance from the resolved dependencies.
    ///
    /// `deps` yields the instances in the order given by
    /// [`dependencies`](Injectable::dependencies).
    fn construct(deps: &mut Dependencies<'_>) -> Result<Self, BoxError>;
}

/// A constructor asked for an argument that does not match what was resolved.
#[derive(Debug, Error)]
pub enum ArgumentError {
    /// More arguments were taken than the constructor declared.
    #[error("argument #{index} was requested but only {available} were resolved")]
    Exhausted {
        /// Position of the requested argument.
        index: usize,
        /// Number of resolved arguments.
        available: usize,
    },
    /// The argument at this position is of a different type.
    #[error("argument #{index} is a `{declared}`, not the requested `{requested}`")]
    TypeMismatch {
        /// Position of the requested argument.
        index: usize,
        /// The type the constructor asked for.
        requested: &'static str,
        /// The type declared at that position.
        declared: TypeKey,
    },
}

/// Cursor over the resolved constructor arguments of one component.
pub struct Dependencies<'a> {
    arguments: &'a [(TypeKey, Instance)],
    cursor: usize,
}

impl<'a> Dependencies<'a> {
    pub(crate) fn new(arguments: &'a [(TypeKey, Instance)]) -> Self {
        Self {
            arguments,
            cursor: 0,
        }
    }

    /// Takes the next argument as an `Arc<T>`.
    pub fn take<T: Send + Sync + 'static>(&mut self) -> Result<Arc<T>, ArgumentError> {
        let index = self.cursor;
        let (declared, instance) = self.arguments.get(index).ok_or(ArgumentError::Exhausted {
            index,
            available: self.arguments.len(),
        })?;

        let typed = Arc::clone(instance)
            .downcast::<T>()
            .map_err(|_| ArgumentError::TypeMismatch {
                index,
                requested: std::any::type_name::<T>(),
                declared: *declared,
            })?;

        self.cursor += 1;
        Ok(typed)
    }

    /// Number of arguments not taken yet.
    pub fn remaining(&self) -> usize {
        self.arguments.len() - self.cursor
    }
}

type ConstructFn = fn(&mut Dependencies<'_>) -> Result<Instance, BoxError>;

/// The core-facing record of one discovered component type.
///
/// Holds the type's identity, the ordered list of its dependency types and a
/// type-erased handle on its constructor. Immutable once created.
#[derive(Clone)]
pub struct ComponentDescriptor {
    key: TypeKey,
    dependencies: Vec<TypeKey>,
    construct: ConstructFn,
}

impl ComponentDescriptor {
    /// Describes the [`Injectable`] type `T`.
    pub fn of<T: Injectable>() -> Self {
        Self {
            key: TypeKey::of::<T>(),
            dependencies: T::dependencies(),
            construct: construct_erased::<T>,
        }
    }

    /// Identity of the described type.
    pub fn key(&self) -> TypeKey {
        self.key
    }

    /// Dependency types in constructor parameter order.
    pub fn dependencies(&self) -> &[TypeKey] {
        &self.dependencies
    }

    /// Invokes the constructor.
    pub fn construct(&self, deps: &mut Dependencies<'_>) -> Result<Instance, BoxError> {
        (self.construct)(deps)
    }
}

impl fmt::Debug for ComponentDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentDescriptor")
            .field("key", &self.key)
            .field("dependencies", &self.dependencies)
            .finish_non_exhaustive()
    }
}

fn construct_erased<T: Injectable>(deps: &mut Dependencies<'_>) -> Result<Instance, BoxError> {
    let value = T::construct(deps)?;
    Ok(Arc::new(value))
}
