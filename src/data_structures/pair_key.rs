//! A unique key for an unordered pair of body indices.

use bevy::prelude::*;
use thiserror::Error;

/// The largest index that can be stored in one half of a [`PairKey`].
pub const MAX_PAIR_INDEX: u32 = u16::MAX as u32;

/// A unique key for an unordered pair of indices.
///
/// The smaller index is stored in the high 16 bits and the larger index in the low 16 bits,
/// so the encoding is canonical: `PairKey::new(a, b) == PairKey::new(b, a)`.
///
/// Keys are ordered first by the smaller index and then by the larger one.
/// The [`PairTracker`](crate::collision::pair_tracker::PairTracker) relies on this
/// to keep its pair lists sorted.
///
/// The raw value can be read through [`Deref`], but keys can only be created with
/// [`PairKey::new`] or [`PairKey::try_new`], so every key is canonical.
#[derive(Clone, Copy, Debug, Deref, PartialEq, Eq, PartialOrd, Ord, Hash, Reflect)]
#[reflect(Debug, PartialEq, Hash)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct PairKey(u32);

impl PairKey {
    /// Creates a new pair key from two indices.
    #[inline]
    pub const fn new(id1: u16, id2: u16) -> Self {
        if id1 < id2 {
            Self(((id1 as u32) << 16) | id2 as u32)
        } else {
            Self(((id2 as u32) << 16) | id1 as u32)
        }
    }

    /// Creates a new pair key from two indices, checking that both fit in 16 bits.
    ///
    /// # Errors
    ///
    /// Returns [`PairKeyError::IndexOutOfRange`] if either index exceeds [`MAX_PAIR_INDEX`].
    #[inline]
    pub fn try_new(id1: u32, id2: u32) -> Result<Self, PairKeyError> {
        let id1 = u16::try_from(id1).map_err(|_| PairKeyError::IndexOutOfRange { index: id1 })?;
        let id2 = u16::try_from(id2).map_err(|_| PairKeyError::IndexOutOfRange { index: id2 })?;
        Ok(Self::new(id1, id2))
    }

    /// Gets the two indices stored in the pair key in ascending order.
    #[inline]
    pub const fn get(&self) -> (u32, u32) {
        (self.0 >> 16, self.0 & 0xFFFF)
    }

    /// Returns `true` if the smaller index is stored in the high half.
    ///
    /// Always `true` for keys created with [`PairKey::new`] or [`PairKey::try_new`].
    #[inline]
    pub const fn is_canonical(&self) -> bool {
        let (low, high) = self.get();
        low <= high
    }
}

/// An error that can occur when encoding a [`PairKey`].
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum PairKeyError {
    /// An index does not fit in the 16 bits reserved for it.
    #[error("Pair index {index} is out of range (the maximum is {MAX_PAIR_INDEX})")]
    IndexOutOfRange {
        /// The offending index.
        index: u32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_order() {
        for (a, b) in [(0, 0), (1, 2), (7, 3), (0, 65535), (65535, 65535), (1234, 4321)] {
            let key = PairKey::new(a, b);
            assert_eq!(key, PairKey::new(b, a));
            assert_eq!(key.get(), (a.min(b) as u32, a.max(b) as u32));
        }
    }

    #[test]
    fn smaller_index_in_high_half() {
        assert_eq!(PairKey::new(5, 1).0, (1 << 16) | 5);
        assert!(PairKey::new(0, 65535) < PairKey::new(1, 2));
        assert_eq!(*PairKey::new(2, 0), 2);
    }

    #[test]
    fn constructed_keys_are_canonical() {
        assert!(PairKey::new(5, 1).is_canonical());
        assert!(PairKey::try_new(65535, 0).unwrap().is_canonical());
        assert!(!PairKey((5 << 16) | 1).is_canonical());
    }

    #[test]
    fn out_of_range() {
        assert_eq!(
            PairKey::try_new(65536, 3),
            Err(PairKeyError::IndexOutOfRange { index: 65536 })
        );
        assert_eq!(
            PairKey::try_new(3, u32::MAX),
            Err(PairKeyError::IndexOutOfRange { index: u32::MAX })
        );
        assert_eq!(PairKey::try_new(65535, 2), Ok(PairKey::new(2, 65535)));
    }
}
