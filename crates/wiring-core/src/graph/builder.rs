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

//! Builds the dependency graph of one scan.

use crate::descriptor::ComponentDescriptor;
use crate::key::TypeKey;
use std::collections::HashMap;

/// One type in the dependency graph.
#[derive(Debug, Clone)]
pub struct GraphNode {
    key: TypeKey,
    dependencies: Vec<usize>,
    discovered: bool,
}

impl GraphNode {
    fn new(key: TypeKey) -> Self {
        Self {
            key,
            dependencies: Vec::new(),
            discovered: false,
        }
    }

    /// The type this node stands for.
    pub fn key(&self) -> TypeKey {
        self.key
    }

    /// Whether a descriptor was supplied for this type.
    ///
    /// Nodes that only appear as someone's dependency have no recipe and are
    /// never instantiated.
    pub fn is_discovered(&self) -> bool {
        self.discovered
    }

    /// Positions of the nodes this node depends on, in declaration order.
    pub(crate) fn dependency_indices(&self) -> &[usize] {
        &self.dependencies
    }
}

/// Directed graph with an edge from every type to each of its dependencies.
///
/// Nodes are kept in discovery order, which is also the tie-break order used
/// by [`topological_sort`](super::topological_sort). Each type identity maps
/// to exactly one node.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    nodes: Vec<GraphNode>,
    index: HashMap<TypeKey, usize>,
}

impl DependencyGraph {
    /// Builds the graph for the given descriptors.
    ///
    /// Dependency types without a descriptor of their own still become
    /// nodes, with no outgoing edges.
    pub fn build<'a, I>(descriptors: I) -> Self
    where
        I: IntoIterator<Item = &'a ComponentDescriptor>,
    {
        let mut graph = Self::default();
        for descriptor in descriptors {
            let node = graph.get_or_create(descriptor.key());
            graph.nodes[node].discovered = true;

            for &dependency in descriptor.dependencies() {
                let target = graph.get_or_create(dependency);
                graph.nodes[node].dependencies.push(target);
            }
        }
        graph
    }

    fn get_or_create(&mut self, key: TypeKey) -> usize {
        if let Some(&position) = self.index.get(&key) {
            return position;
        }
        let position = self.nodes.len();
        self.nodes.push(GraphNode::new(key));
        self.index.insert(key, position);
        position
    }

    /// Number of nodes, discovered or not.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if the graph has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns `true` if `key` is a node of the graph.
    pub fn contains(&self, key: TypeKey) -> bool {
        self.index.contains_key(&key)
    }

    /// Looks up the node for `key`.
    pub fn node(&self, key: TypeKey) -> Option<&GraphNode> {
        self.index.get(&key).map(|&position| &self.nodes[position])
    }

    /// All nodes in discovery order.
    pub fn nodes(&self) -> impl Iterator<Item = &GraphNode> {
        self.nodes.iter()
    }

    pub(crate) fn node_at(&self, position: usize) -> &GraphNode {
        &self.nodes[position]
    }

    /// The dependency keys of `key`, in declaration order.
    pub fn dependencies_of(&self, key: TypeKey) -> Option<Vec<TypeKey>> {
        self.node(key).map(|node| {
            node.dependencies
                .iter()
                .map(|&position| self.nodes[position].key)
                .collect()
        })
    }

    /// For every node (by position), the number of edges pointing into it,
    /// i.e. how many times it is declared as a dependency.
    pub fn consumer_counts(&self) -> Vec<usize> {
        let mut counts = vec![0; self.nodes.len()];
        for node in &self.nodes {
            for &dependency in &node.dependencies {
                counts[dependency] += 1;
            }
        }
        counts
    }
}
