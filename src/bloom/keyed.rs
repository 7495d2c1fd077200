//! bloom/keyed: Bloom filter whose K hash functions are one keyed hash under K keys.

use anyhow::{anyhow, Result};
use std::fmt;
use std::marker::PhantomData;

use crate::bloom::bits::BitFilter;
use crate::bloom::estimate;
use crate::consts::HSIP_KEY_LEN;
use crate::hash::{HalfSipHash24, KeyedHash};
use crate::metrics;

/// Bloom filter keyed by K 8-byte keys, one per slot.
///
/// Keys are borrowed for `'k`: the caller keeps them alive and unchanged for
/// the whole life of the filter (changing a key would produce false negatives).
///
/// ```
/// use hsipbf::bloom::KeyedBitFilter;
///
/// let keys = [[0u8, 1, 2, 3, 4, 5, 6, 7], [0x10, 0x11, 0x12, 0x13, 0x14, 0x15, 0x16, 0x17]];
/// let mut bf = KeyedBitFilter::<256, 2>::new(&keys);
/// bf.add(b"alpha");
/// assert!(bf.contains(b"alpha"));
/// assert!(!bf.contains(b"beta"));
/// ```
pub struct KeyedBitFilter<'k, const M: usize, const K: usize, H = HalfSipHash24> {
    keys: &'k [[u8; HSIP_KEY_LEN]; K],
    filter: BitFilter<M, K>,
    _hash: PhantomData<fn() -> H>,
}

impl<'k, const M: usize, const K: usize, H: KeyedHash> KeyedBitFilter<'k, M, K, H> {
    /// Empty filter over the given keys.
    pub fn new(keys: &'k [[u8; HSIP_KEY_LEN]; K]) -> Self {
        Self {
            keys,
            filter: BitFilter::new(),
            _hash: PhantomData,
        }
    }

    /// Same as `new` for a runtime-sized key list (e.g. `KeyMaterial::slots`).
    pub fn try_new(keys: &'k [[u8; HSIP_KEY_LEN]]) -> Result<Self> {
        let fixed = <&[[u8; HSIP_KEY_LEN]; K]>::try_from(keys)
            .map_err(|_| anyhow!("filter needs exactly {} keys, got {}", K, keys.len()))?;
        Ok(Self::new(fixed))
    }

    /// Add a key.
    pub fn add(&mut self, input: &[u8]) {
        let tags = self.tags(input);
        self.filter.add(&tags);
        metrics::record_filter_add(input.len(), K);
    }

    /// Test whether the filter may contain a key.
    ///
    /// Slot tags are derived lazily: the first unset bit ends the test.
    pub fn contains(&self, input: &[u8]) -> bool {
        let mut hashed = 0usize;
        let hit = self.keys.iter().all(|key| {
            hashed += 1;
            self.filter.has_hash(H::tag_of(key, input))
        });
        metrics::record_filter_query(input.len(), hashed, hit);
        hit
    }

    /// Add a string key.
    #[inline]
    pub fn add_str(&mut self, s: &str) {
        self.add(s.as_bytes());
    }

    /// Test whether the filter may contain a string key.
    #[inline]
    pub fn contains_str(&self, s: &str) -> bool {
        self.contains(s.as_bytes())
    }

    /// Reset every bit. Keys stay the same.
    pub fn clear(&mut self) {
        self.filter.clear();
        metrics::record_filter_clear();
    }

    /// The K slot tags of an input (tag i under key i).
    pub fn tags(&self, input: &[u8]) -> [u32; K] {
        std::array::from_fn(|i| H::tag_of(&self.keys[i], input))
    }

    /// Underlying bit array.
    #[inline]
    pub fn bits(&self) -> &BitFilter<M, K> {
        &self.filter
    }

    /// Expected false-positive rate after `n` distinct adds.
    pub fn estimated_fpr(&self, n: usize) -> f64 {
        estimate::false_positive_rate(M, K, n)
    }
}

impl<const M: usize, const K: usize, H> fmt::Debug for KeyedBitFilter<'_, M, K, H> {
    // Keys are never printed.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyedBitFilter")
            .field("filter", &self.filter)
            .finish_non_exhaustive()
    }
}
