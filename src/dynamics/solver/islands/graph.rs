//! The pooled constraint graph that islands are found from.

use bevy::{ecs::entity::EntityHashMap, log::debug, prelude::*};

use super::IslandSolverError;
use crate::{
    data_structures::bit_vec::BitVec,
    dynamics::{rigid_body::IslandBody, solver::equation::SolverEquation},
};

/// A node in the [`IslandGraph`], bound to one body for the duration of a solve.
#[derive(Clone, Debug)]
struct IslandGraphNode {
    body: Entity,
    is_static: bool,
    /// Indices of adjacent nodes, with one entry per incident equation.
    neighbors: Vec<u32>,
    /// Indices of incident equations.
    equations: Vec<u32>,
}

impl Default for IslandGraphNode {
    fn default() -> Self {
        Self {
            body: Entity::PLACEHOLDER,
            is_static: false,
            neighbors: Vec::new(),
            equations: Vec::new(),
        }
    }
}

impl IslandGraphNode {
    #[inline]
    fn reset(&mut self, body: Entity, is_static: bool) {
        self.body = body;
        self.is_static = is_static;
        self.neighbors.clear();
        self.equations.clear();
    }
}

/// The constraint graph of the bodies and equations of a single solve.
///
/// Each body is a node, and each equation adds an edge in both directions between the nodes
/// of its two bodies. Edges are not deduplicated: two equations between the same bodies
/// produce two parallel edges.
///
/// Nodes are stored in a pool that is reused across time steps. The pool grows to fit the
/// largest body count seen so far and is never shrunk, so steady-state time steps
/// do not allocate.
#[derive(Clone, Debug, Default)]
pub struct IslandGraph {
    nodes: Vec<IslandGraphNode>,
    node_count: usize,
    body_nodes: EntityHashMap<u32>,
    visited_nodes: BitVec,
    visited_equations: BitVec,
}

impl IslandGraph {
    /// Creates a new [`IslandGraph`] with `node_capacity` preallocated nodes.
    pub fn with_capacity(node_capacity: usize) -> Self {
        Self {
            nodes: (0..node_capacity)
                .map(|_| IslandGraphNode::default())
                .collect(),
            visited_nodes: BitVec::with_capacity(node_capacity),
            ..default()
        }
    }

    /// Returns the number of nodes in the pool, including nodes not used by the current solve.
    #[inline]
    pub fn pool_len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the number of nodes bound to bodies in the current solve.
    #[inline]
    pub fn node_count(&self) -> usize {
        self.node_count
    }

    /// Returns the body bound to the given node.
    ///
    /// # Panics
    ///
    /// Panics if `node` is not less than [`node_count`](Self::node_count).
    #[inline]
    pub fn body(&self, node: usize) -> Entity {
        assert!(node < self.node_count, "node {node} is not in use");
        self.nodes[node].body
    }

    /// Returns the nodes adjacent to the given node, with one entry per incident equation.
    ///
    /// # Panics
    ///
    /// Panics if `node` is not less than [`node_count`](Self::node_count).
    #[inline]
    pub fn neighbors(&self, node: usize) -> &[u32] {
        assert!(node < self.node_count, "node {node} is not in use");
        &self.nodes[node].neighbors
    }

    /// Returns the indices of the equations incident to the given node.
    ///
    /// # Panics
    ///
    /// Panics if `node` is not less than [`node_count`](Self::node_count).
    #[inline]
    pub fn node_equations(&self, node: usize) -> &[u32] {
        assert!(node < self.node_count, "node {node} is not in use");
        &self.nodes[node].equations
    }

    /// Returns `true` if the given node has been added to an island during the current solve.
    #[inline]
    pub fn is_visited(&self, node: usize) -> bool {
        self.visited_nodes.get(node)
    }

    /// Rebuilds the graph for the given bodies and equations.
    ///
    /// The node of a body is its position in `bodies`. If an entity is listed more than once,
    /// equations are attached to the node of its first occurrence, and the later nodes
    /// stay isolated.
    ///
    /// # Errors
    ///
    /// Returns [`IslandSolverError::UnknownBody`] if an equation references an entity that is not in `bodies`.
    /// The graph is left empty in that case.
    pub fn build<B: IslandBody, E: SolverEquation>(
        &mut self,
        bodies: &[B],
        equations: &[E],
    ) -> Result<(), IslandSolverError> {
        if self.nodes.len() < bodies.len() {
            debug!(
                "growing island node pool from {} to {} nodes",
                self.nodes.len(),
                bodies.len()
            );
            self.nodes.resize_with(bodies.len(), IslandGraphNode::default);
        }

        self.node_count = bodies.len();
        self.body_nodes.clear();
        self.visited_nodes.set_bit_count_and_clear(bodies.len());
        self.visited_equations.set_bit_count_and_clear(equations.len());

        // Nodes past the body count keep their stale data until they are needed again.
        for (index, (node, body)) in self.nodes.iter_mut().zip(bodies).enumerate() {
            let entity = body.entity();
            node.reset(entity, body.rigid_body().is_static());
            self.body_nodes.entry(entity).or_insert(index as u32);
        }

        if let Err(error) = self.add_edges(equations) {
            // Some edges may already be in place.
            self.node_count = 0;
            self.body_nodes.clear();
            return Err(error);
        }

        Ok(())
    }

    fn add_edges<E: SolverEquation>(&mut self, equations: &[E]) -> Result<(), IslandSolverError> {
        for (index, equation) in equations.iter().enumerate() {
            let node1 = self.node_of(equation.body1(), equation)?;
            let node2 = self.node_of(equation.body2(), equation)?;

            let index = index as u32;

            let first = &mut self.nodes[node1];
            first.neighbors.push(node2 as u32);
            first.equations.push(index);

            let second = &mut self.nodes[node2];
            second.neighbors.push(node1 as u32);
            second.equations.push(index);
        }

        Ok(())
    }

    #[inline]
    fn node_of<E: SolverEquation>(
        &self,
        body: Entity,
        equation: &E,
    ) -> Result<usize, IslandSolverError> {
        self.body_nodes
            .get(&body)
            .map(|&node| node as usize)
            .ok_or(IslandSolverError::UnknownBody {
                equation: equation.id(),
                body,
            })
    }

    /// Returns the first node at or after `start` that can seed a new island.
    ///
    /// Seeds are unvisited non-static nodes with at least one incident equation.
    #[inline]
    pub(crate) fn next_seed(&self, start: usize) -> Option<usize> {
        (start..self.node_count).find(|&index| {
            let node = &self.nodes[index];
            !node.is_static && !node.equations.is_empty() && !self.visited_nodes.get(index)
        })
    }

    /// Collects the island containing `seed` with a depth-first traversal.
    ///
    /// The bodies of the island are written to `bodies` and the indices of its equations to
    /// `equations`, with every equation included once. All buffers are cleared first.
    ///
    /// Static nodes are entered like any other node unless `split_at_static_bodies` is set,
    /// in which case they are never entered and the equations touching them stay with
    /// the island of their other endpoint.
    pub(crate) fn collect_island(
        &mut self,
        seed: usize,
        split_at_static_bodies: bool,
        stack: &mut Vec<u32>,
        bodies: &mut Vec<Entity>,
        equations: &mut Vec<u32>,
    ) {
        let Self {
            nodes,
            visited_nodes,
            visited_equations,
            ..
        } = self;
        let nodes = &*nodes;

        stack.clear();
        bodies.clear();
        equations.clear();

        debug_assert!(!visited_nodes.get(seed));
        visited_nodes.set(seed);
        visit(&nodes[seed], visited_equations, bodies, equations);
        stack.push(seed as u32);

        while let Some(index) = stack.pop() {
            for &neighbor in &nodes[index as usize].neighbors {
                let neighbor_node = &nodes[neighbor as usize];

                if split_at_static_bodies && neighbor_node.is_static {
                    continue;
                }

                if visited_nodes.insert(neighbor as usize) {
                    visit(neighbor_node, visited_equations, bodies, equations);
                    stack.push(neighbor);
                }
            }
        }
    }
}

/// Adds the body of `node` and its not yet collected equations to the island.
#[inline]
fn visit(
    node: &IslandGraphNode,
    visited_equations: &mut BitVec,
    bodies: &mut Vec<Entity>,
    equations: &mut Vec<u32>,
) {
    bodies.push(node.body);
    for &equation in &node.equations {
        if visited_equations.insert(equation as usize) {
            equations.push(equation);
        }
    }
}
