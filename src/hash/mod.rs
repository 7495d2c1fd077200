//! Keyed hashing used to derive filter slots.
//!
//! Goals:
//! - One explicit, stable keyed construction (HalfSipHash, 32-bit tags), so
//!   tags are identical across toolchains/platforms and other implementations.
//! - Let the filter stay generic over the construction via `KeyedHash`.
//! - Encode the preset as a small code for runtime selection (CLI/config/FFI).

use anyhow::{anyhow, Result};
use std::fmt;
use std::str::FromStr;

pub mod halfsiphash;

pub use halfsiphash::{halfsiphash13, halfsiphash24, HalfSipHash, HalfSipHash13, HalfSipHash24};

use crate::consts::HSIP_KEY_LEN;

/// A keyed 32-bit hash that can absorb input incrementally.
///
/// Implementations must produce the same tag for any chunking of the input.
pub trait KeyedHash: Sized {
    /// Fresh state keyed with an 8-byte key.
    fn with_key(key: &[u8; HSIP_KEY_LEN]) -> Self;

    /// Absorb more input.
    fn absorb(&mut self, data: &[u8]);

    /// Consume the state and produce the tag.
    fn tag(self) -> u32;

    /// Convenience: tag of a whole buffer.
    #[inline]
    fn tag_of(key: &[u8; HSIP_KEY_LEN], data: &[u8]) -> u32 {
        let mut h = Self::with_key(key);
        h.absorb(data);
        h.tag()
    }
}

impl<const C: usize, const D: usize> KeyedHash for HalfSipHash<C, D> {
    #[inline]
    fn with_key(key: &[u8; HSIP_KEY_LEN]) -> Self {
        HalfSipHash::new(key)
    }

    #[inline]
    fn absorb(&mut self, data: &[u8]) {
        self.update(data);
    }

    #[inline]
    fn tag(self) -> u32 {
        self.finalize()
    }
}

/// HalfSipHash preset selectable at runtime.
/// Stored as u32 where a compact code is needed (FFI, JSON).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HashKind {
    /// HalfSipHash-2-4: 2 compression, 4 finalization rounds.
    Sip24 = 1,
    /// HalfSipHash-1-3: 1 compression, 3 finalization rounds.
    Sip13 = 2,
}

impl HashKind {
    /// Convert to a compact u32 code.
    pub fn to_u32(self) -> u32 {
        match self {
            HashKind::Sip24 => 1,
            HashKind::Sip13 => 2,
        }
    }

    /// Parse from u32 code. Unknown codes return None.
    pub fn from_u32(code: u32) -> Option<Self> {
        match code {
            1 => Some(HashKind::Sip24),
            2 => Some(HashKind::Sip13),
            _ => None,
        }
    }

    /// Short name, as accepted by `FromStr`.
    pub fn as_str(self) -> &'static str {
        match self {
            HashKind::Sip24 => "sip24",
            HashKind::Sip13 => "sip13",
        }
    }
}

impl fmt::Display for HashKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HashKind::Sip24 => write!(f, "halfsiphash-2-4"),
            HashKind::Sip13 => write!(f, "halfsiphash-1-3"),
        }
    }
}

impl FromStr for HashKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sip24" | "2-4" | "24" | "halfsiphash24" | "halfsiphash-2-4" => Ok(HashKind::Sip24),
            "sip13" | "1-3" | "13" | "halfsiphash13" | "halfsiphash-1-3" => Ok(HashKind::Sip13),
            other => Err(anyhow!("unknown hash kind '{}' (expected sip24 or sip13)", other)),
        }
    }
}

/// Default preset for new filters.
pub const HASH_KIND_DEFAULT: HashKind = HashKind::Sip24;

/// Compute the tag of `data` under `key` for the given preset.
pub fn tag(kind: HashKind, key: &[u8; HSIP_KEY_LEN], data: &[u8]) -> u32 {
    match kind {
        HashKind::Sip24 => halfsiphash24(key, data),
        HashKind::Sip13 => halfsiphash13(key, data),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_codes_roundtrip() {
        for k in [HashKind::Sip24, HashKind::Sip13] {
            assert_eq!(HashKind::from_u32(k.to_u32()), Some(k));
            assert_eq!(k.as_str().parse::<HashKind>().unwrap(), k);
        }
        assert_eq!(HashKind::from_u32(0), None);
        assert_eq!(HashKind::from_u32(3), None);
    }

    #[test]
    fn kind_parse_aliases() {
        assert_eq!("2-4".parse::<HashKind>().unwrap(), HashKind::Sip24);
        assert_eq!(" HalfSipHash13 ".parse::<HashKind>().unwrap(), HashKind::Sip13);
        assert!("sip48".parse::<HashKind>().is_err());
    }

    #[test]
    fn tag_dispatches_by_kind() {
        let key = [0u8, 1, 2, 3, 4, 5, 6, 7];
        assert_eq!(tag(HashKind::Sip24, &key, b""), 0x5b9f_35a9);
        assert_eq!(tag(HashKind::Sip13, &key, b""), 0x5814_c896);
        assert_eq!(HalfSipHash24::tag_of(&key, b"hello"), tag(HashKind::Sip24, &key, b"hello"));
    }
}
