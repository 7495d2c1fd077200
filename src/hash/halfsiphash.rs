//! HalfSipHash with 32-bit tags, incremental over arbitrary chunking.
//!
//! State:
//! - v0..v3: four 32-bit mixing words, derived from the 8-byte key.
//! - block/left: pending bytes (0..=3) that did not fill a 4-byte block yet.
//! - cnt: number of absorbed bytes modulo 256 (goes into the last block).
//!
//! The byte counter is 8 bits wide: inputs of 256+ bytes get the
//! length tag `len mod 256`, same as every other HalfSipHash implementation.

use byteorder::{ByteOrder, LittleEndian};
use core::hash::Hasher;

use crate::consts::{
    HSIP_BLOCK_LEN, HSIP_FINAL_V2, HSIP_INIT_V2, HSIP_INIT_V3, HSIP_KEY_LEN, SIP13_C_ROUNDS,
    SIP13_D_ROUNDS, SIP24_C_ROUNDS, SIP24_D_ROUNDS,
};

/// HalfSipHash-C-D keyed stream hash producing a `u32` tag.
///
/// `C` is the number of compression rounds per 4-byte block, `D` the number
/// of finalization rounds. Both must be positive (checked at compile time).
///
/// ```
/// use hsipbf::hash::HalfSipHash24;
///
/// let key = [0u8, 1, 2, 3, 4, 5, 6, 7];
/// let mut h = HalfSipHash24::new(&key);
/// h.update(b"he");
/// h.update(b"llo");
/// assert_eq!(h.finalize(), HalfSipHash24::oneshot(&key, b"hello"));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct HalfSipHash<const C: usize, const D: usize> {
    v0: u32,
    v1: u32,
    v2: u32,
    v3: u32,
    block: [u8; HSIP_BLOCK_LEN],
    left: u8,
    cnt: u8,
}

/// 2 compression / 4 finalization rounds (default, more thorough).
pub type HalfSipHash24 = HalfSipHash<SIP24_C_ROUNDS, SIP24_D_ROUNDS>;

/// 1 compression / 3 finalization rounds (faster).
pub type HalfSipHash13 = HalfSipHash<SIP13_C_ROUNDS, SIP13_D_ROUNDS>;

impl<const C: usize, const D: usize> HalfSipHash<C, D> {
    const ROUNDS_OK: () = assert!(C > 0 && D > 0, "HalfSipHash rounds must be positive");

    /// Start a keyed computation.
    pub fn new(key: &[u8; HSIP_KEY_LEN]) -> Self {
        let () = Self::ROUNDS_OK;
        let mut h = Self {
            v0: 0,
            v1: 0,
            v2: 0,
            v3: 0,
            block: [0u8; HSIP_BLOCK_LEN],
            left: 0,
            cnt: 0,
        };
        h.init(key);
        h
    }

    /// Re-key this state and drop everything absorbed so far.
    pub fn init(&mut self, key: &[u8; HSIP_KEY_LEN]) {
        let k0 = LittleEndian::read_u32(&key[0..4]);
        let k1 = LittleEndian::read_u32(&key[4..8]);
        self.v0 = k0;
        self.v1 = k1;
        self.v2 = HSIP_INIT_V2 ^ k0;
        self.v3 = HSIP_INIT_V3 ^ k1;
        self.block = [0u8; HSIP_BLOCK_LEN];
        self.left = 0;
        self.cnt = 0;
    }

    /// Append input bytes. Any chunking of the same stream gives the same tag.
    pub fn update(&mut self, input: &[u8]) {
        // Truncation to u8 is part of the construction.
        self.cnt = self.cnt.wrapping_add(input.len() as u8);

        let mut input = input;
        if self.left > 0 {
            let start = self.left as usize;
            let take = (HSIP_BLOCK_LEN - start).min(input.len());
            self.block[start..start + take].copy_from_slice(&input[..take]);
            self.left += take as u8;
            input = &input[take..];

            if (self.left as usize) < HSIP_BLOCK_LEN {
                return;
            }
            let m = LittleEndian::read_u32(&self.block);
            self.compress(m);
            self.left = 0;
        }

        let mut words = input.chunks_exact(HSIP_BLOCK_LEN);
        for w in &mut words {
            self.compress(LittleEndian::read_u32(w));
        }

        let rest = words.remainder();
        self.block[..rest.len()].copy_from_slice(rest);
        self.left = rest.len() as u8;
    }

    /// Finish the computation and return the 32-bit tag.
    pub fn finalize(mut self) -> u32 {
        let left = self.left as usize;
        for b in &mut self.block[left..HSIP_BLOCK_LEN - 1] {
            *b = 0;
        }
        self.block[HSIP_BLOCK_LEN - 1] = self.cnt;
        let m = LittleEndian::read_u32(&self.block);
        self.compress(m);

        self.v2 ^= HSIP_FINAL_V2;
        for _ in 0..D {
            self.round();
        }
        self.v1 ^ self.v3
    }

    /// Tag of `data` under `key` in one call.
    #[inline]
    pub fn oneshot(key: &[u8; HSIP_KEY_LEN], data: &[u8]) -> u32 {
        let mut h = Self::new(key);
        h.update(data);
        h.finalize()
    }

    #[inline]
    fn compress(&mut self, m: u32) {
        self.v3 ^= m;
        for _ in 0..C {
            self.round();
        }
        self.v0 ^= m;
    }

    #[inline(always)]
    fn round(&mut self) {
        self.v0 = self.v0.wrapping_add(self.v1);
        self.v1 = self.v1.rotate_left(5);
        self.v1 ^= self.v0;
        self.v0 = self.v0.rotate_left(16);
        self.v2 = self.v2.wrapping_add(self.v3);
        self.v3 = self.v3.rotate_left(8);
        self.v3 ^= self.v2;
        self.v0 = self.v0.wrapping_add(self.v3);
        self.v3 = self.v3.rotate_left(7);
        self.v3 ^= self.v0;
        self.v2 = self.v2.wrapping_add(self.v1);
        self.v1 = self.v1.rotate_left(13);
        self.v1 ^= self.v2;
        self.v2 = self.v2.rotate_left(16);
    }
}

impl<const C: usize, const D: usize> Hasher for HalfSipHash<C, D> {
    #[inline]
    fn write(&mut self, bytes: &[u8]) {
        self.update(bytes);
    }

    /// Tag of everything written so far; the state itself is left untouched.
    ///
    /// The 32-bit tag is repeated in both halves: hash tables that take
    /// control bits from the top of the word see tag bits, not zeros.
    #[inline]
    fn finish(&self) -> u64 {
        let t = u64::from((*self).finalize());
        (t << 32) | t
    }
}

/// One-shot HalfSipHash-2-4.
#[inline]
pub fn halfsiphash24(key: &[u8; HSIP_KEY_LEN], data: &[u8]) -> u32 {
    HalfSipHash24::oneshot(key, data)
}

/// One-shot HalfSipHash-1-3.
#[inline]
pub fn halfsiphash13(key: &[u8; HSIP_KEY_LEN], data: &[u8]) -> u32 {
    HalfSipHash13::oneshot(key, data)
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: [u8; 8] = [0, 1, 2, 3, 4, 5, 6, 7];

    fn seq(n: usize) -> Vec<u8> {
        (0..n).map(|i| i as u8).collect()
    }

    // Reference 32-bit vectors: key 00..07, message 00..n-1 (tag read as LE u32).
    #[test]
    fn reference_vectors_24() {
        let expected: [(usize, u32); 9] = [
            (0, 0x5b9f_35a9),
            (1, 0xb85a_4727),
            (2, 0x03a6_62fa),
            (3, 0x04e7_fe8a),
            (4, 0x8946_6e2a),
            (7, 0xc563_cf8b),
            (8, 0x8f84_b8d0),
            (15, 0x972b_fe74),
            (63, 0x744a_ea59),
        ];
        for (n, tag) in expected {
            assert_eq!(halfsiphash24(&KEY, &seq(n)), tag, "len={}", n);
        }
    }

    #[test]
    fn golden_values_13() {
        assert_eq!(halfsiphash13(&KEY, &[]), 0x5814_c896);
        assert_eq!(halfsiphash13(&KEY, &seq(1)), 0xe7e8_64ca);
        assert_eq!(halfsiphash13(&KEY, &seq(2)), 0xbc4b_0e30);
        assert_eq!(halfsiphash13(&KEY, &seq(3)), 0x0153_9939);
    }

    #[test]
    fn split_hello() {
        let mut h = HalfSipHash24::new(&KEY);
        h.update(b"he");
        h.update(b"llo");
        assert_eq!(h.finalize(), 0x5f6e_3713);
        assert_eq!(halfsiphash24(&KEY, b"hello"), 0x5f6e_3713);
    }

    #[test]
    fn empty_updates_are_noops() {
        let mut h = HalfSipHash24::new(&KEY);
        h.update(&[]);
        h.update(b"a");
        h.update(&[]);
        h.update(b"bcde");
        h.update(&[]);
        assert_eq!(h.finalize(), halfsiphash24(&KEY, b"abcde"));
    }

    #[test]
    fn init_resets_state() {
        let other = [9u8; 8];
        let mut h = HalfSipHash24::new(&other);
        h.update(b"garbage that must be forgotten");
        h.init(&KEY);
        h.update(b"hello");
        assert_eq!(h.finalize(), halfsiphash24(&KEY, b"hello"));
    }

    #[test]
    fn length_counter_wraps_at_256() {
        let msg: Vec<u8> = (0..300usize).map(|i| i as u8).collect();
        assert_eq!(halfsiphash24(&KEY, &msg), 0x9201_d20b);
        assert_eq!(halfsiphash13(&KEY, &msg), 0x5d34_8cb1);
    }

    #[test]
    fn hasher_finish_is_repeatable() {
        let mut h = HalfSipHash24::new(&KEY);
        h.write(b"hel");
        let a = h.finish();
        let b = h.finish();
        assert_eq!(a, b);
        h.write(b"lo");
        assert_eq!(h.finish(), 0x5f6e_3713_5f6e_3713u64);
    }

    #[test]
    fn hasher_finish_fills_high_bits() {
        let mut h = HalfSipHash13::new(&KEY);
        h.write(b"hash table key");
        let v = h.finish();
        assert_eq!(v >> 32, v & 0xffff_ffff);
        assert_eq!(v as u32, halfsiphash13(&KEY, b"hash table key"));
    }

    #[test]
    fn forked_prefix_state() {
        let mut prefix = HalfSipHash24::new(&KEY);
        prefix.update(b"user:");
        let mut a = prefix;
        let mut b = prefix;
        a.update(b"alice");
        b.update(b"bob");
        assert_eq!(a.finalize(), halfsiphash24(&KEY, b"user:alice"));
        assert_eq!(b.finalize(), halfsiphash24(&KEY, b"user:bob"));
    }
}
