//! Incremental tracking of overlapping pairs across time steps.
//!
//! The broad phase reports the pairs that overlap during a step with [`PairTracker::record`].
//! After the step, [`PairTracker::advance`] commits them, and [`PairTracker::diff`] reports
//! which pairs started or stopped overlapping compared to the step before.
//!
//! Every pair list is kept sorted while it is being filled, so the diff is a single
//! merge-style pass over two sorted lists instead of a hash set difference or a re-sort.

use bevy::{log::trace, prelude::*};

use crate::data_structures::pair_key::{PairKey, PairKeyError};

/// Tracks which pairs of indices overlap, and which pairs started or stopped overlapping
/// between consecutive time steps.
///
/// Three generations of sorted, deduplicated [`PairKey`] lists are kept:
///
/// - `current`: the pairs recorded during the ongoing step.
/// - `previous`: the pairs committed by the most recent [`advance`](Self::advance).
/// - `older`: the pairs committed by the advance before that.
///
/// [`diff`](Self::diff) compares `previous` against `older`.
///
/// # Example
///
/// ```
/// use avian_islands::prelude::*;
///
/// let mut tracker = PairTracker::new();
///
/// // Step 1: bodies 1 and 2 start overlapping.
/// tracker.record(1, 2).unwrap();
/// tracker.advance();
/// assert_eq!(tracker.diff().additions, vec![(1, 2)]);
///
/// // Step 2: the overlap ends.
/// tracker.advance();
/// assert_eq!(tracker.diff().removals, vec![(1, 2)]);
/// ```
#[derive(Resource, Reflect, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serialize", reflect(Serialize, Deserialize))]
#[reflect(Resource, Debug, PartialEq)]
pub struct PairTracker {
    current: Vec<PairKey>,
    previous: Vec<PairKey>,
    older: Vec<PairKey>,
}

/// The pairs that started and stopped overlapping during the last committed step,
/// computed by [`PairTracker::diff`].
///
/// Each pair is stored with the smaller index first, and both lists are sorted.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct PairChanges {
    /// Pairs that overlap now but did not overlap in the step before.
    pub additions: Vec<(u32, u32)>,
    /// Pairs that overlapped in the step before but no longer overlap.
    pub removals: Vec<(u32, u32)>,
}

impl PairChanges {
    /// Returns `true` if no pairs started or stopped overlapping.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.additions.is_empty() && self.removals.is_empty()
    }
}

impl PairTracker {
    /// Creates a new empty [`PairTracker`].
    #[inline]
    pub const fn new() -> Self {
        Self {
            current: Vec::new(),
            previous: Vec::new(),
            older: Vec::new(),
        }
    }

    /// Creates a new empty [`PairTracker`] with room for `capacity` pairs per step.
    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            current: Vec::with_capacity(capacity),
            previous: Vec::with_capacity(capacity),
            older: Vec::with_capacity(capacity),
        }
    }

    /// Records that the pair `(id1, id2)` overlaps during the ongoing step.
    ///
    /// The order of the indices does not matter. Recording the same pair more than once
    /// per step is a no-op. Returns `true` if the pair was not yet recorded this step.
    ///
    /// # Errors
    ///
    /// Returns [`PairKeyError::IndexOutOfRange`] if either index does not fit in 16 bits.
    /// The tracker is left unchanged in that case.
    #[inline]
    pub fn record(&mut self, id1: u32, id2: u32) -> Result<bool, PairKeyError> {
        let key = PairKey::try_new(id1, id2)?;
        Ok(self.record_key(key))
    }

    /// Records that the pair identified by `key` overlaps during the ongoing step.
    ///
    /// Returns `true` if the pair was not yet recorded this step.
    pub fn record_key(&mut self, key: PairKey) -> bool {
        debug_assert!(key.is_canonical());

        // Insertion keeps the list sorted, which makes the diff linear.
        match self.current.binary_search(&key) {
            Ok(_) => false,
            Err(index) => {
                self.current.insert(index, key);
                debug_assert!(self.current.is_sorted());
                true
            }
        }
    }

    /// Commits the pairs recorded during the ongoing step and starts a new, empty step.
    ///
    /// This only swaps buffers and never copies pairs. It should be called exactly once
    /// per time step, after all [`record`](Self::record) calls and before [`diff`](Self::diff).
    pub fn advance(&mut self) {
        // (current, previous, older) -> (older, current, previous)
        core::mem::swap(&mut self.older, &mut self.previous);
        core::mem::swap(&mut self.previous, &mut self.current);
        self.current.clear();

        trace!(
            "committed {} overlapping pairs ({} in the step before)",
            self.previous.len(),
            self.older.len()
        );
    }

    /// Computes which pairs started and stopped overlapping in the last committed step.
    pub fn diff(&self) -> PairChanges {
        let mut changes = PairChanges::default();
        self.diff_into(&mut changes.additions, &mut changes.removals);
        changes
    }

    /// Computes which pairs started and stopped overlapping in the last committed step,
    /// appending them to the given buffers.
    ///
    /// This is useful for reusing allocations across time steps.
    pub fn diff_into(&self, additions: &mut Vec<(u32, u32)>, removals: &mut Vec<(u32, u32)>) {
        sorted_difference_into(&self.previous, &self.older, additions);
        sorted_difference_into(&self.older, &self.previous, removals);
    }

    /// Returns `true` if the pair `(id1, id2)` was overlapping in the last committed step.
    ///
    /// Indices that cannot be encoded are never overlapping.
    #[inline]
    pub fn contains(&self, id1: u32, id2: u32) -> bool {
        PairKey::try_new(id1, id2).is_ok_and(|key| self.previous.binary_search(&key).is_ok())
    }

    /// Returns the sorted pairs recorded during the ongoing step.
    #[inline]
    pub fn current(&self) -> &[PairKey] {
        &self.current
    }

    /// Returns the sorted pairs committed by the most recent [`advance`](Self::advance).
    #[inline]
    pub fn previous(&self) -> &[PairKey] {
        &self.previous
    }

    /// Removes all pairs from every generation.
    ///
    /// The next [`diff`](Self::diff) after this reports no changes.
    #[inline]
    pub fn clear(&mut self) {
        self.current.clear();
        self.previous.clear();
        self.older.clear();
    }
}

/// Pushes the decoded pairs of `a \ b` to `out`, with both inputs sorted and deduplicated.
///
/// The cursor into `b` only moves forward, so this is `O(a.len() + b.len())`.
fn sorted_difference_into(a: &[PairKey], b: &[PairKey], out: &mut Vec<(u32, u32)>) {
    let mut j = 0;
    for &key in a {
        while j < b.len() && b[j] < key {
            j += 1;
        }
        if j == b.len() || b[j] != key {
            out.push(key.get());
        }
    }
}
