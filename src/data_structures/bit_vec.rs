//! A minimalistic growable compact bit vector with a fixed block size of 64 bits.
//!
//! Used for the transient "visited" marks of graph traversals, where the set is
//! cleared and reused every time step.

/// A growable compact bit vector with a fixed block size of 64 bits.
///
/// The block storage only ever grows, so resetting the vector for a new time step
/// does not allocate unless the bit count exceeds anything seen before.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct BitVec {
    blocks: Vec<u64>,
    bit_count: usize,
}

#[inline]
fn bits_to_blocks(bits: usize) -> usize {
    bits.div_ceil(u64::BITS as usize)
}

impl BitVec {
    /// Creates a new [`BitVec`] with room for `bit_capacity` bits and a bit count of zero.
    #[inline]
    pub fn with_capacity(bit_capacity: usize) -> Self {
        Self {
            blocks: vec![0; bits_to_blocks(bit_capacity)],
            bit_count: 0,
        }
    }

    /// Sets the bit count of the [`BitVec`] and clears all bits.
    ///
    /// The block storage is grown if needed, but never shrunk.
    #[inline]
    pub fn set_bit_count_and_clear(&mut self, bit_count: usize) {
        let block_count = bits_to_blocks(bit_count);

        if self.blocks.len() < block_count {
            self.blocks.resize(block_count, 0);
        }

        self.bit_count = bit_count;
        self.blocks[..block_count].iter_mut().for_each(|b| *b = 0);
    }

    /// Returns the number of addressable bits.
    #[inline]
    pub fn bit_count(&self) -> usize {
        self.bit_count
    }

    /// Returns the number of bits that can be addressed without reallocating.
    #[inline]
    pub fn bit_capacity(&self) -> usize {
        self.blocks.len() * u64::BITS as usize
    }

    /// Sets the bit at the specified index.
    ///
    /// # Panics
    ///
    /// Panics if the index is out of bounds with `debug_assertions` enabled.
    #[inline]
    pub fn set(&mut self, index: usize) {
        debug_assert!(index < self.bit_count);
        self.blocks[index / 64] |= 1 << (index % 64);
    }

    /// Sets the bit at the specified index, returning `true` if it was previously unset.
    #[inline]
    pub fn insert(&mut self, index: usize) -> bool {
        debug_assert!(index < self.bit_count);
        let block = &mut self.blocks[index / 64];
        let mask = 1 << (index % 64);
        let was_unset = *block & mask == 0;
        *block |= mask;
        was_unset
    }

    /// Gets the bit at the specified index.
    ///
    /// Returns `false` if the index is out of bounds or the bit is unset.
    #[inline]
    pub fn get(&self, index: usize) -> bool {
        if index >= self.bit_count {
            return false;
        }
        (self.blocks[index / 64] & (1 << (index % 64))) != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_and_get() {
        let mut bits = BitVec::default();
        bits.set_bit_count_and_clear(130);

        bits.set(0);
        bits.set(64);
        bits.set(129);

        assert!(bits.get(0));
        assert!(bits.get(64));
        assert!(bits.get(129));
        assert!(!bits.get(1));
        assert!(!bits.get(128));
        // Out of bounds
        assert!(!bits.get(130));
    }

    #[test]
    fn insert_reports_first_set() {
        let mut bits = BitVec::with_capacity(8);
        bits.set_bit_count_and_clear(8);

        assert!(bits.insert(3));
        assert!(!bits.insert(3));
        assert!(bits.get(3));
    }

    #[test]
    fn reset_clears_and_keeps_capacity() {
        let mut bits = BitVec::default();
        bits.set_bit_count_and_clear(500);
        bits.set(499);
        let capacity = bits.bit_capacity();

        bits.set_bit_count_and_clear(10);
        assert_eq!(bits.bit_count(), 10);
        assert_eq!(bits.bit_capacity(), capacity);

        bits.set_bit_count_and_clear(500);
        assert!(!bits.get(499));
    }
}
