//! # Avian Islands
//!
//! Two building blocks of a rigid body physics step:
//!
//! - The [`PairTracker`](collision::PairTracker) diffs the broad phase's overlapping pairs
//!   between consecutive time steps, reporting which pairs *started* and *stopped* overlapping.
//!   The pair lists are kept sorted as they are filled, so the diff is linear in the number of pairs.
//! - The [`IslandSolver`](dynamics::solver::IslandSolver) partitions the constraint graph into
//!   *islands*, groups of bodies connected by constraint equations, and solves each island
//!   independently with a user-provided [`Subsolver`](dynamics::solver::Subsolver).
//!
//! A typical time step looks like this:
//!
//! 1. The broad phase calls [`PairTracker::record`](collision::PairTracker::record) for each candidate pair.
//! 2. [`PairTracker::advance`](collision::PairTracker::advance) commits the step, and
//!    [`PairTracker::diff`](collision::PairTracker::diff) reports the started and stopped pairs.
//! 3. The narrow phase turns overlaps into contact equations.
//! 4. [`IslandSolver::solve`](dynamics::solver::IslandSolver::solve) solves the equations island by island.
//!
//! ## Features
//!
//! - `f32` (default) or `f64`: the precision of [`Scalar`](math::Scalar).
//! - `serialize`: `serde` support for plain data types.
//!
//! ## References
//!
//! - [Box2D - Simulation Islands] by [Erin Catto]
//!
//! [Box2D - Simulation Islands]: https://box2d.org/posts/2023/10/simulation-islands/
//! [Erin Catto]: https://github.com/erincatto

pub mod collision;
pub mod data_structures;
pub mod dynamics;
pub mod math;

/// Re-exports common types.
pub mod prelude {
    pub use crate::{
        collision::{PairChanges, PairTracker},
        data_structures::pair_key::{MAX_PAIR_INDEX, PairKey, PairKeyError},
        dynamics::{
            IslandBody, RigidBody,
            solver::{
                EquationId, IslandSolver, IslandSolverConfig, IslandSolverDiagnostics,
                IslandSolverError, SolverEquation, Subsolver,
            },
        },
        math::Scalar,
    };
}

#[cfg(test)]
mod tests;
