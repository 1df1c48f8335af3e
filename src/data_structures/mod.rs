//! Specialized data structures used by the pair tracker and the island solver.

pub mod bit_vec;
pub mod pair_key;
