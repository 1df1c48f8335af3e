//! Collision bookkeeping that sits between the broad phase and the narrow phase.
//!
//! The broad phase produces candidate overlapping pairs every time step. The
//! [`PairTracker`] turns that stream into the pairs that *started* and *stopped*
//! overlapping, which can be used to send collision events and to create or destroy
//! contact constraints.

pub mod pair_tracker;

pub use pair_tracker::{PairChanges, PairTracker};
