//! Island splitting for constraint solving.
//!
//! An island is a maximal group of bodies connected by constraint equations. Equations in
//! different islands share no bodies, so each island can be solved on its own as if it were
//! the whole world, without any loss of correctness. The [`IslandSolver`] rebuilds the
//! islands from scratch every time step and hands them to an iterative [`Subsolver`] one by one.
//!
//! Static bodies never seed an island, since they are not moved by the solver. By default they
//! still *bridge* islands: two dynamic bodies resting on the same static body end up in the same
//! island. Setting [`IslandSolverConfig::split_at_static_bodies`] turns static bodies into
//! barriers instead, which produces smaller islands.

mod graph;

pub use graph::IslandGraph;

use bevy::{
    log::{debug, trace},
    platform::time::Instant,
    prelude::*,
};
use core::cmp::Reverse;
use thiserror::Error;

use crate::{
    dynamics::{
        rigid_body::IslandBody,
        solver::{
            diagnostics::IslandSolverDiagnostics,
            equation::{EquationId, SolverEquation},
            subsolver::Subsolver,
        },
    },
    math::Scalar,
};

/// Configuration for the [`IslandSolver`].
#[derive(Resource, Reflect, Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serialize", reflect(Serialize, Deserialize))]
#[reflect(Resource, Debug, Default, PartialEq)]
pub struct IslandSolverConfig {
    /// The maximum number of iterations the subsolver may use per island.
    ///
    /// Default: `10`
    pub iterations: u32,

    /// The error tolerance at which the subsolver may stop iterating early.
    ///
    /// Default: `1e-7`
    pub tolerance: Scalar,

    /// If `true`, static bodies are never added to an island, and the equations touching them
    /// are solved with the island of their other body.
    ///
    /// Otherwise, static bodies connect all of the islands that touch them into one.
    ///
    /// Default: `false`
    pub split_at_static_bodies: bool,

    /// The number of graph nodes to preallocate when the solver is created.
    ///
    /// The pool grows as needed, so this only avoids early reallocations.
    ///
    /// Default: `128`
    pub initial_node_capacity: usize,
}

impl Default for IslandSolverConfig {
    fn default() -> Self {
        Self {
            iterations: 10,
            tolerance: 1e-7,
            split_at_static_bodies: false,
            initial_node_capacity: 128,
        }
    }
}

/// An error returned by the [`IslandSolver`].
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum IslandSolverError {
    /// An equation references a body that is not in the body list.
    #[error("Equation {equation:?} references body {body:?}, which is not in the body list")]
    UnknownBody {
        /// The equation with the unknown body.
        equation: EquationId,
        /// The unknown body.
        body: Entity,
    },
}

/// A constraint solver that splits the constraint graph into independent islands,
/// and solves each island separately with a [`Subsolver`].
///
/// The solver owns the list of active equations, managed with [`add_equation`](Self::add_equation),
/// [`remove_equation`](Self::remove_equation) and [`remove_all_equations`](Self::remove_all_equations).
/// Equations owned elsewhere can be solved with [`solve_equations`](Self::solve_equations).
///
/// Within an island, equations are handed to the subsolver in descending [`EquationId`] order,
/// so results are deterministic for a given input regardless of how the islands were traversed.
#[derive(Debug)]
pub struct IslandSolver<E, S> {
    /// The configuration forwarded to the subsolver.
    pub config: IslandSolverConfig,
    subsolver: S,
    equations: Vec<E>,
    graph: IslandGraph,
    /// Depth-first traversal stack, reused for every island.
    stack: Vec<u32>,
    island_bodies: Vec<Entity>,
    island_equations: Vec<u32>,
    diagnostics: IslandSolverDiagnostics,
}

impl<E: SolverEquation, S: Subsolver<E>> IslandSolver<E, S> {
    /// Creates a new [`IslandSolver`] that solves islands with the given subsolver,
    /// using the default [`IslandSolverConfig`].
    pub fn new(subsolver: S) -> Self {
        Self::with_config(subsolver, IslandSolverConfig::default())
    }

    /// Creates a new [`IslandSolver`] that solves islands with the given subsolver and configuration.
    pub fn with_config(subsolver: S, config: IslandSolverConfig) -> Self {
        Self {
            config,
            subsolver,
            equations: Vec::new(),
            graph: IslandGraph::with_capacity(config.initial_node_capacity),
            stack: Vec::new(),
            island_bodies: Vec::new(),
            island_equations: Vec::new(),
            diagnostics: IslandSolverDiagnostics::default(),
        }
    }

    /// Adds an equation to be solved by [`solve`](Self::solve).
    #[inline]
    pub fn add_equation(&mut self, equation: E) {
        self.equations.push(equation);
    }

    /// Removes the equation with the given ID, returning it if it was found.
    pub fn remove_equation(&mut self, id: EquationId) -> Option<E> {
        let index = self.equations.iter().position(|eq| eq.id() == id)?;
        Some(self.equations.remove(index))
    }

    /// Removes all equations.
    #[inline]
    pub fn remove_all_equations(&mut self) {
        self.equations.clear();
    }

    /// Returns the equations solved by [`solve`](Self::solve).
    #[inline]
    pub fn equations(&self) -> &[E] {
        &self.equations
    }

    /// Returns a reference to the subsolver.
    #[inline]
    pub fn subsolver(&self) -> &S {
        &self.subsolver
    }

    /// Returns a mutable reference to the subsolver.
    #[inline]
    pub fn subsolver_mut(&mut self) -> &mut S {
        &mut self.subsolver
    }

    /// Consumes the solver, returning the subsolver.
    #[inline]
    pub fn into_subsolver(self) -> S {
        self.subsolver
    }

    /// Returns the constraint graph built by the most recent solve.
    #[inline]
    pub fn graph(&self) -> &IslandGraph {
        &self.graph
    }

    /// Returns the diagnostics of the most recent solve.
    #[inline]
    pub fn diagnostics(&self) -> &IslandSolverDiagnostics {
        &self.diagnostics
    }

    /// Splits the bodies and the added equations into islands, and solves each island
    /// with the subsolver over a time step of `delta_secs`.
    ///
    /// Returns the number of islands solved.
    ///
    /// # Errors
    ///
    /// Returns [`IslandSolverError::UnknownBody`] if an equation references a body that is
    /// not in `bodies`. Nothing is solved in that case.
    pub fn solve<B: IslandBody>(
        &mut self,
        delta_secs: Scalar,
        bodies: &[B],
    ) -> Result<usize, IslandSolverError> {
        let equations = core::mem::take(&mut self.equations);
        let result = self.solve_equations(delta_secs, bodies, &equations);
        self.equations = equations;
        result
    }

    /// Splits the given bodies and equations into islands, and solves each island
    /// with the subsolver over a time step of `delta_secs`.
    ///
    /// The equations added to the solver itself are ignored.
    /// Returns the number of islands solved.
    ///
    /// # Errors
    ///
    /// Returns [`IslandSolverError::UnknownBody`] if an equation references a body that is
    /// not in `bodies`. Nothing is solved in that case.
    pub fn solve_equations<B: IslandBody>(
        &mut self,
        delta_secs: Scalar,
        bodies: &[B],
        equations: &[E],
    ) -> Result<usize, IslandSolverError> {
        self.diagnostics = IslandSolverDiagnostics::default();

        let start = Instant::now();
        self.graph.build(bodies, equations)?;
        self.diagnostics.build_graph = start.elapsed();

        let start = Instant::now();
        let mut island_count = 0;
        let mut seed_cursor = 0;

        while let Some(seed) = self.graph.next_seed(seed_cursor) {
            seed_cursor = seed + 1;

            self.graph.collect_island(
                seed,
                self.config.split_at_static_bodies,
                &mut self.stack,
                &mut self.island_bodies,
                &mut self.island_equations,
            );

            // Solve in a fixed order, independent of the traversal order.
            self.island_equations
                .sort_unstable_by_key(|&index| Reverse(equations[index as usize].id()));

            self.subsolver.set_iterations(self.config.iterations);
            self.subsolver.set_tolerance(self.config.tolerance);

            for &index in &self.island_equations {
                self.subsolver.add_equation(&equations[index as usize]);
            }

            let iterations = self.subsolver.solve(delta_secs, &self.island_bodies);
            self.subsolver.remove_all_equations();

            trace!(
                "solved island {island_count} with {} bodies and {} equations in {iterations} iterations",
                self.island_bodies.len(),
                self.island_equations.len()
            );

            self.diagnostics.record_island(
                self.island_bodies.len(),
                self.island_equations.len(),
                iterations,
                self.config.iterations,
            );
            island_count += 1;
        }

        self.diagnostics.solve_islands = start.elapsed();

        if self.diagnostics.unconverged_islands > 0 {
            debug!(
                "{} of {island_count} islands used all {} solver iterations",
                self.diagnostics.unconverged_islands, self.config.iterations
            );
        }

        Ok(island_count)
    }
}
