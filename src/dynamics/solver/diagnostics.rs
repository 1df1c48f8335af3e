use bevy::{
    prelude::{ReflectResource, Resource},
    reflect::Reflect,
};
use core::time::Duration;

/// Diagnostics for the [`IslandSolver`](super::islands::IslandSolver).
///
/// Reset at the start of every [`IslandSolver::solve`](super::islands::IslandSolver::solve).
#[derive(Resource, Reflect, Clone, Debug, Default, PartialEq)]
#[reflect(Resource, Debug)]
pub struct IslandSolverDiagnostics {
    /// Time spent resetting the node pool and building the constraint graph.
    pub build_graph: Duration,
    /// Time spent finding islands and solving them with the subsolver.
    pub solve_islands: Duration,
    /// The number of islands solved.
    pub island_count: u32,
    /// The number of bodies that were part of some island.
    pub body_count: u32,
    /// The number of equations handed to the subsolver.
    pub equation_count: u32,
    /// The number of equations in the largest island.
    pub largest_island: u32,
    /// The sum of the iterations reported by the subsolver over all islands.
    pub total_iterations: u32,
    /// The number of islands for which the subsolver used its whole iteration budget.
    ///
    /// Non-convergence is an expected outcome of iterative solving with a tight budget,
    /// so this is only reported, never treated as an error.
    pub unconverged_islands: u32,
}

impl IslandSolverDiagnostics {
    /// Records the result of solving a single island.
    #[inline]
    pub(crate) fn record_island(
        &mut self,
        body_count: usize,
        equation_count: usize,
        iterations: u32,
        max_iterations: u32,
    ) {
        self.island_count += 1;
        self.body_count += body_count as u32;
        self.equation_count += equation_count as u32;
        self.largest_island = self.largest_island.max(equation_count as u32);
        self.total_iterations += iterations;
        if iterations >= max_iterations {
            self.unconverged_islands += 1;
        }
    }
}
