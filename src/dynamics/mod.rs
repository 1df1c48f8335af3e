//! Rigid body dynamics: body types and the island-splitting constraint solver.

pub mod rigid_body;
pub mod solver;

pub use rigid_body::{IslandBody, RigidBody};
