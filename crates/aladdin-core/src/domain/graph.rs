//! Component dependency graph.
//!
//! The graph is a `petgraph` [`DiGraph`] whose edges point from a component
//! to its dependencies. Nodes are added in ascending name order, so a
//! [`NodeIndex`] ordering is the same as a name ordering, which is what makes
//! every traversal here deterministic.
//!
//! # Algorithms
//!
//! - Cycle detection: depth-first search with visiting/visited marks, roots and
//!   neighbours in ascending name order. Re-entering a node that is still being
//!   visited yields the cycle, starting at that node.
//! - Build order: Kahn's algorithm where the ready set is ordered, so among all
//!   components whose dependencies are placed, the smallest name goes next.

use std::collections::{BTreeMap, BTreeSet};

use petgraph::{
    Direction,
    graph::{DiGraph, NodeIndex},
    visit::{Dfs, Reversed},
};
use serde::Serialize;

use crate::domain::{
    entities::resolved::ResolvedComponentConfig, error::GraphError,
    value_objects::ComponentName,
};

/// Components in an order where each one follows all of its dependencies.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct BuildPlan {
    order: Vec<ComponentName>,
}

impl BuildPlan {
    /// Wrap an order computed elsewhere. No ordering check is done.
    pub fn new(order: Vec<ComponentName>) -> Self {
        Self { order }
    }

    pub fn components(&self) -> &[ComponentName] {
        &self.order
    }

    pub fn position(&self, name: &ComponentName) -> Option<usize> {
        self.order.iter().position(|n| n == name)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ComponentName> {
        self.order.iter()
    }
}

impl<'a> IntoIterator for &'a BuildPlan {
    type Item = &'a ComponentName;
    type IntoIter = std::slice::Iter<'a, ComponentName>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    Visiting,
    Visited,
}

/// Acyclic dependency graph over a set of components.
#[derive(Debug, Clone)]
pub struct ComponentGraph {
    /// Edge `a -> b`: `a` depends on `b`.
    graph: DiGraph<ComponentName, ()>,
    nodes: BTreeMap<ComponentName, NodeIndex>,
}

impl ComponentGraph {
    /// Build the graph of every resolved component.
    ///
    /// Fails on a dependency outside the set or on a cycle.
    pub fn build(
        configs: &BTreeMap<ComponentName, ResolvedComponentConfig>,
    ) -> Result<Self, GraphError> {
        Self::from_dependencies(
            configs
                .iter()
                .map(|(name, config)| (name.clone(), config.dependencies.clone())),
        )
    }

    /// Build from `(component, dependencies)` pairs.
    pub fn from_dependencies(
        components: impl IntoIterator<Item = (ComponentName, Vec<ComponentName>)>,
    ) -> Result<Self, GraphError> {
        let declared: BTreeMap<ComponentName, Vec<ComponentName>> =
            components.into_iter().collect();

        let mut graph = DiGraph::with_capacity(declared.len(), declared.len());
        let nodes: BTreeMap<ComponentName, NodeIndex> = declared
            .keys()
            .map(|name| (name.clone(), graph.add_node(name.clone())))
            .collect();

        for (name, deps) in &declared {
            let from = nodes[name];
            for dep in deps {
                let Some(&to) = nodes.get(dep) else {
                    return Err(GraphError::UnknownComponent {
                        component: name.clone(),
                        dependency: dep.to_string(),
                    });
                };
                graph.update_edge(from, to, ());
            }
        }

        let graph = Self { graph, nodes };
        graph.detect_cycle()?;
        Ok(graph)
    }

    /// The full build order.
    pub fn build_order(&self) -> Result<BuildPlan, GraphError> {
        self.detect_cycle()?;
        Ok(self.order(&vec![true; self.graph.node_count()]))
    }

    /// `selection` plus everything it transitively depends on, in build order.
    ///
    /// Names outside the graph are ignored.
    pub fn closure(&self, selection: &[ComponentName]) -> BuildPlan {
        let mut include = vec![false; self.graph.node_count()];
        let mut dfs = Dfs::empty(&self.graph);
        for start in selection.iter().filter_map(|n| self.nodes.get(n)) {
            dfs.move_to(*start);
            while let Some(node) = dfs.next(&self.graph) {
                include[node.index()] = true;
            }
        }
        self.order(&include)
    }

    /// Everything that transitively depends on `name`, in build order.
    ///
    /// `name` itself is not included. Empty for an unknown name.
    pub fn dependents_of(&self, name: &ComponentName) -> Vec<ComponentName> {
        let Some(&start) = self.nodes.get(name) else {
            return Vec::new();
        };
        let mut include = vec![false; self.graph.node_count()];
        let reversed = Reversed(&self.graph);
        let mut dfs = Dfs::new(reversed, start);
        while let Some(node) = dfs.next(reversed) {
            include[node.index()] = node != start;
        }
        self.order(&include).order
    }

    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Neighbours in one direction, ascending.
    fn neighbours(&self, node: NodeIndex, direction: Direction) -> Vec<NodeIndex> {
        let mut found: Vec<NodeIndex> = self.graph.neighbors_directed(node, direction).collect();
        found.sort_unstable();
        found
    }

    fn detect_cycle(&self) -> Result<(), GraphError> {
        let mut marks = vec![Mark::Unvisited; self.graph.node_count()];
        let mut path = Vec::new();
        for root in self.graph.node_indices() {
            if marks[root.index()] == Mark::Unvisited {
                self.visit(root, &mut marks, &mut path)?;
            }
        }
        Ok(())
    }

    fn visit(
        &self,
        node: NodeIndex,
        marks: &mut [Mark],
        path: &mut Vec<NodeIndex>,
    ) -> Result<(), GraphError> {
        marks[node.index()] = Mark::Visiting;
        path.push(node);
        for dep in self.neighbours(node, Direction::Outgoing) {
            match marks[dep.index()] {
                Mark::Visiting => {
                    let start = path.iter().position(|&n| n == dep).unwrap_or(0);
                    return Err(GraphError::CyclicDependency {
                        cycle: path[start..].iter().map(|&i| self.graph[i].clone()).collect(),
                    });
                }
                Mark::Unvisited => self.visit(dep, marks, path)?,
                Mark::Visited => {}
            }
        }
        path.pop();
        marks[node.index()] = Mark::Visited;
        Ok(())
    }

    /// Kahn's algorithm over the included nodes. Every dependency of an
    /// included node must itself be included.
    fn order(&self, include: &[bool]) -> BuildPlan {
        let mut pending: Vec<usize> = self
            .graph
            .node_indices()
            .map(|node| {
                self.graph
                    .neighbors_directed(node, Direction::Outgoing)
                    .filter(|dep| include[dep.index()])
                    .count()
            })
            .collect();
        let mut ready: BTreeSet<NodeIndex> = self
            .graph
            .node_indices()
            .filter(|node| include[node.index()] && pending[node.index()] == 0)
            .collect();

        let mut order = Vec::with_capacity(include.iter().filter(|&&i| i).count());
        while let Some(node) = ready.pop_first() {
            order.push(self.graph[node].clone());
            for dependent in self.graph.neighbors_directed(node, Direction::Incoming) {
                let i = dependent.index();
                if include[i] {
                    pending[i] -= 1;
                    if pending[i] == 0 {
                        ready.insert(dependent);
                    }
                }
            }
        }
        BuildPlan::new(order)
    }
}
