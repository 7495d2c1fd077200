//! bloom/bits: fixed-size bit array addressed by precomputed tags.
//!
//! Layout: M bits in `max(1, M/8)` bytes, bit `i` at byte `i / 8`, mask `1 << (i % 8)`.
//! Index of a tag is `tag & (M - 1)`; M is a power of two so any tag maps into range.

use std::fmt;

/// Bloom filter over M bits with K slots, agnostic to the hash functions.
///
/// Callers supply K tags per key; the filter only sets/tests bits.
/// `M` must be a power of two and `K` positive; other values fail to compile.
#[derive(Clone, PartialEq, Eq)]
pub struct BitFilter<const M: usize, const K: usize> {
    bits: Box<[u8]>,
}

impl<const M: usize, const K: usize> BitFilter<M, K> {
    const GEOMETRY_OK: () = {
        assert!(M.is_power_of_two(), "M must be power of 2");
        assert!(K > 0, "K must be positive");
    };

    const BYTES: usize = if M < 8 { 1 } else { M / 8 };

    /// Total number of bits (M).
    pub const BITS: usize = M;

    /// Number of tags per key (K).
    pub const SLOTS: usize = K;

    /// Empty filter (all bits unset).
    pub fn new() -> Self {
        let () = Self::GEOMETRY_OK;
        Self {
            bits: vec![0u8; Self::BYTES].into_boxed_slice(),
        }
    }

    /// Add a key given its K tags.
    pub fn add(&mut self, hashes: &[u32; K]) {
        for &h in hashes {
            self.add_hash(h);
        }
    }

    /// Test whether the filter may contain a key given its K tags.
    /// Stops at the first unset bit.
    pub fn contains(&self, hashes: &[u32; K]) -> bool {
        hashes.iter().all(|&h| self.has_hash(h))
    }

    /// Reset every bit.
    pub fn clear(&mut self) {
        self.bits.fill(0);
    }

    /// Set the bit of a single tag.
    #[inline]
    pub fn add_hash(&mut self, hash: u32) {
        set_bit(&mut self.bits, Self::index(hash));
    }

    /// Test the bit of a single tag.
    #[inline]
    pub fn has_hash(&self, hash: u32) -> bool {
        get_bit(&self.bits, Self::index(hash))
    }

    /// Number of set bits.
    pub fn count_ones(&self) -> usize {
        self.bits.iter().map(|b| b.count_ones() as usize).sum()
    }

    /// Share of set bits, 0.0..=1.0.
    pub fn fill_ratio(&self) -> f64 {
        self.count_ones() as f64 / M as f64
    }

    /// True if no bit is set.
    pub fn is_empty(&self) -> bool {
        self.bits.iter().all(|&b| b == 0)
    }

    #[inline]
    fn index(hash: u32) -> usize {
        (hash as usize) & (M - 1)
    }
}

impl<const M: usize, const K: usize> Default for BitFilter<M, K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const M: usize, const K: usize> fmt::Debug for BitFilter<M, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BitFilter")
            .field("bits", &M)
            .field("slots", &K)
            .field("ones", &self.count_ones())
            .finish()
    }
}

#[inline]
fn set_bit(bytes: &mut [u8], bit: usize) {
    let byte = bit / 8;
    let mask = 1u8 << (bit % 8);
    bytes[byte] |= mask;
}

#[inline]
fn get_bit(bytes: &[u8], bit: usize) -> bool {
    let byte = bit / 8;
    let mask = 1u8 << (bit % 8);
    (bytes[byte] & mask) != 0
}
