//! Rigid body types as seen by the island solver.

use bevy::prelude::*;

/// The type of a rigid body, which determines how it takes part in island building.
///
/// Static bodies never seed an island. Dynamic and kinematic bodies do.
#[derive(Reflect, Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serialize", reflect(Serialize, Deserialize))]
#[reflect(Debug, Default, PartialEq, Hash)]
pub enum RigidBody {
    /// Dynamic bodies are affected by forces, velocity and constraints.
    #[default]
    Dynamic,

    /// Static bodies are not affected by any forces or constraints, and act as if they have infinite mass.
    ///
    /// Constraints between a static body and other bodies are still solved, as part of
    /// whichever island reaches the static body.
    Static,

    /// Kinematic bodies are moved by their velocity only and are not affected by constraints,
    /// but they still affect the dynamic bodies they are constrained to.
    Kinematic,
}

impl RigidBody {
    /// Checks if the rigid body is dynamic.
    #[inline]
    pub const fn is_dynamic(&self) -> bool {
        matches!(self, Self::Dynamic)
    }

    /// Checks if the rigid body is static.
    #[inline]
    pub const fn is_static(&self) -> bool {
        matches!(self, Self::Static)
    }

    /// Checks if the rigid body is kinematic.
    #[inline]
    pub const fn is_kinematic(&self) -> bool {
        matches!(self, Self::Kinematic)
    }
}

/// A body that can be partitioned into islands by the [`IslandSolver`](crate::dynamics::solver::islands::IslandSolver).
///
/// Bodies are identified by their [`Entity`], which the [`SolverEquation`]s refer to.
///
/// [`SolverEquation`]: crate::dynamics::solver::equation::SolverEquation
pub trait IslandBody {
    /// The entity identifying the body.
    fn entity(&self) -> Entity;

    /// The type of the body.
    fn rigid_body(&self) -> RigidBody;
}

impl IslandBody for (Entity, RigidBody) {
    #[inline]
    fn entity(&self) -> Entity {
        self.0
    }

    #[inline]
    fn rigid_body(&self) -> RigidBody {
        self.1
    }
}

impl<T: IslandBody> IslandBody for &T {
    #[inline]
    fn entity(&self) -> Entity {
        (**self).entity()
    }

    #[inline]
    fn rigid_body(&self) -> RigidBody {
        (**self).rigid_body()
    }
}
