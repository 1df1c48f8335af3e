//! Math types used throughout the crate.
//!
//! The floating point precision is selected with the `f32` (default) or `f64` feature.

#[cfg(all(feature = "f32", feature = "f64"))]
compile_error!("feature \"f32\" and feature \"f64\" cannot be enabled at the same time");

#[cfg(not(any(feature = "f32", feature = "f64")))]
compile_error!("either feature \"f32\" or feature \"f64\" must be enabled");

/// The floating point number type used by the solver.
#[cfg(feature = "f32")]
pub type Scalar = f32;

/// The floating point number type used by the solver.
#[cfg(feature = "f64")]
pub type Scalar = f64;
