//! The interface of the iterative solver that the [`IslandSolver`] delegates to.
//!
//! [`IslandSolver`]: super::islands::IslandSolver

use bevy::prelude::*;

use crate::math::Scalar;

/// An iterative constraint solver that solves one island at a time for the [`IslandSolver`].
///
/// For every island, the island solver configures the subsolver, adds the island's
/// equations with [`add_equation`](Self::add_equation), calls [`solve`](Self::solve)
/// with the island's bodies, and finally calls [`remove_all_equations`](Self::remove_all_equations).
/// The subsolver therefore only ever sees one island, as if it were the whole world.
///
/// The numerical method used to solve the equations is entirely up to the implementation.
///
/// [`IslandSolver`]: super::islands::IslandSolver
pub trait Subsolver<E> {
    /// Adds an equation to be solved by the next call to [`solve`](Self::solve).
    fn add_equation(&mut self, equation: &E);

    /// Removes all equations added with [`add_equation`](Self::add_equation).
    fn remove_all_equations(&mut self);

    /// Solves the added equations for the given bodies over a time step of `delta_secs`.
    ///
    /// Returns the number of iterations used.
    fn solve(&mut self, delta_secs: Scalar, bodies: &[Entity]) -> u32;

    /// Sets the maximum number of iterations used by [`solve`](Self::solve).
    fn set_iterations(&mut self, iterations: u32);

    /// Sets the error tolerance at which [`solve`](Self::solve) may stop iterating early.
    fn set_tolerance(&mut self, tolerance: Scalar);
}

impl<E, S: Subsolver<E> + ?Sized> Subsolver<E> for Box<S> {
    #[inline]
    fn add_equation(&mut self, equation: &E) {
        (**self).add_equation(equation);
    }

    #[inline]
    fn remove_all_equations(&mut self) {
        (**self).remove_all_equations();
    }

    #[inline]
    fn solve(&mut self, delta_secs: Scalar, bodies: &[Entity]) -> u32 {
        (**self).solve(delta_secs, bodies)
    }

    #[inline]
    fn set_iterations(&mut self, iterations: u32) {
        (**self).set_iterations(iterations);
    }

    #[inline]
    fn set_tolerance(&mut self, tolerance: Scalar) {
        (**self).set_tolerance(tolerance);
    }
}
