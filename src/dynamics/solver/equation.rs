//! Constraint equations as seen by the island solver.

use bevy::prelude::*;
use derive_more::From;

/// A stable, unique identifier of a [`SolverEquation`].
///
/// Islands hand their equations to the subsolver in *descending* identifier order,
/// which makes the solve order independent of how the constraint graph was traversed.
#[derive(Clone, Copy, Debug, Deref, PartialEq, Eq, PartialOrd, Ord, Hash, From)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct EquationId(pub u32);

/// A constraint equation between exactly two bodies, such as a contact or a joint.
///
/// Equations are owned by the simulation. The island solver only reads them to build the
/// constraint graph, and forwards them to the [`Subsolver`](super::subsolver::Subsolver).
pub trait SolverEquation {
    /// The stable, unique identifier of the equation.
    fn id(&self) -> EquationId;

    /// The first body constrained by the equation.
    fn body1(&self) -> Entity;

    /// The second body constrained by the equation.
    fn body2(&self) -> Entity;
}

impl<T: SolverEquation> SolverEquation for &T {
    #[inline]
    fn id(&self) -> EquationId {
        (**self).id()
    }

    #[inline]
    fn body1(&self) -> Entity {
        (**self).body1()
    }

    #[inline]
    fn body2(&self) -> Entity {
        (**self).body2()
    }
}
