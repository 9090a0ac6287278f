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

//! Kahn's algorithm over consumer counts, producing a dependency-first order.

use super::builder::DependencyGraph;
use crate::key::{join_keys, TypeKey};
use std::collections::VecDeque;
use std::fmt;

/// An error indicating that a cycle was detected in the graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleError {
    unresolved: Vec<TypeKey>,
}

impl CycleError {
    /// The nodes that could not be ordered, in discovery order.
    ///
    /// This holds the members of every cycle plus everything they depend on.
    pub fn unresolved(&self) -> &[TypeKey] {
        &self.unresolved
    }

    pub(crate) fn into_unresolved(self) -> Vec<TypeKey> {
        self.unresolved
    }
}

impl fmt::Display for CycleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cycle detected among: {}", join_keys(&self.unresolved))
    }
}

impl std::error::Error for CycleError {}

/// Orders the graph so that every type comes before the types that depend on it.
///
/// Every node starts with its consumer count (the number of edges pointing
/// into it). Nodes nobody depends on seed the queue and are appended to the
/// output in discovery order. Each dequeued node releases its dependencies;
/// a dependency whose count drops to zero is queued and pushed to the
/// *front* of the output, so dependencies accumulate ahead of their
/// consumers.
///
/// # Returns
///
/// * `Ok(Vec<TypeKey>)`: every node, dependencies first.
/// * `Err(CycleError)`: if the graph contains one or more cycles.
pub fn topological_sort(graph: &DependencyGraph) -> Result<Vec<TypeKey>, CycleError> {
    if graph.is_empty() {
        return Ok(Vec::new());
    }

    // 1. Count how many edges point into every node.
    let mut consumer_count = graph.consumer_counts();

    // 2. Seed with every node nothing depends on.
    let mut queue: VecDeque<usize> = VecDeque::new();
    let mut sorted: VecDeque<usize> = VecDeque::with_capacity(graph.len());
    for (position, &count) in consumer_count.iter().enumerate() {
        if count == 0 {
            queue.push_back(position);
            sorted.push_back(position);
        }
    }

    // 3. Release the dependencies of each processed consumer.
    while let Some(consumer) = queue.pop_front() {
        for &dependency in graph.node_at(consumer).dependency_indices() {
            let count = &mut consumer_count[dependency];
            *count -= 1;
            if *count == 0 {
                queue.push_back(dependency);
                sorted.push_front(dependency);
            }
        }
    }

    // 4. Anything still holding consumers is stuck behind a cycle.
    if sorted.len() != graph.len() {
        let unresolved = consumer_count
            .iter()
            .enumerate()
            .filter(|&(_, &count)| count > 0)
            .map(|(position, _)| graph.node_at(position).key())
            .collect();
        return Err(CycleError { unresolved });
    }

    Ok(sorted
        .into_iter()
        .map(|position| graph.node_at(position).key())
        .collect())
}
