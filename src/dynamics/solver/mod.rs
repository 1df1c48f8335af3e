//! Constraint solving split into independent islands.
//!
//! The [`IslandSolver`](islands::IslandSolver) partitions the constraint graph into islands
//! and delegates the numerical work for each island to a [`Subsolver`](subsolver::Subsolver).

pub mod diagnostics;
pub mod equation;
pub mod islands;
pub mod subsolver;

pub use diagnostics::IslandSolverDiagnostics;
pub use equation::{EquationId, SolverEquation};
pub use islands::{IslandGraph, IslandSolver, IslandSolverConfig, IslandSolverError};
pub use subsolver::Subsolver;
