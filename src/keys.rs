//! keys: owned key material for keyed filters.
//!
//! A filter borrows `K` 8-byte keys; `KeyMaterial` is one convenient owner
//! for them (parsed from hex/base64 or freshly generated). Key bytes are
//! zeroized when the owner is dropped and never logged.
//! ENV keys are read by `FilterConfig::from_env` and parsed here.
//!
//! Usage:
//!   let km = KeyMaterial::from_hex("00010203040506071011121314151617")?;
//!   let bf = KeyedBitFilter::<1024, 2>::try_new(km.slots())?;

use anyhow::{anyhow, Context, Result};
use log::debug;
use rand::rngs::OsRng;
use rand::RngCore;
use std::fmt;
use zeroize::Zeroize;

use crate::consts::HSIP_KEY_LEN;
use crate::util::{decode_base64, decode_hex, to_base64, to_hex};

/// K keys of 8 bytes each, stored contiguously.
#[derive(Clone, PartialEq, Eq)]
pub struct KeyMaterial {
    slots: Vec<[u8; HSIP_KEY_LEN]>,
}

impl KeyMaterial {
    /// Split K*8 raw bytes into K keys. Length must be a positive multiple of 8.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.is_empty() || bytes.len() % HSIP_KEY_LEN != 0 {
            return Err(anyhow!(
                "key material must be a positive multiple of {} bytes, got {}",
                HSIP_KEY_LEN,
                bytes.len()
            ));
        }
        let slots = bytes
            .chunks_exact(HSIP_KEY_LEN)
            .map(|c| {
                let mut k = [0u8; HSIP_KEY_LEN];
                k.copy_from_slice(c);
                k
            })
            .collect::<Vec<_>>();
        debug!("key material: {} slot(s)", slots.len());
        Ok(Self { slots })
    }

    pub fn from_hex(s: &str) -> Result<Self> {
        let mut raw = decode_hex(s).context("decode hex keys")?;
        let km = Self::from_bytes(&raw);
        raw.zeroize();
        km
    }

    pub fn from_base64(s: &str) -> Result<Self> {
        let mut raw = decode_base64(s).context("decode base64 keys")?;
        let km = Self::from_bytes(&raw);
        raw.zeroize();
        km
    }

    /// `k` fresh random keys from the OS RNG.
    pub fn generate(k: usize) -> Result<Self> {
        if k == 0 {
            return Err(anyhow!("number of keys must be positive"));
        }
        let mut slots = vec![[0u8; HSIP_KEY_LEN]; k];
        for s in slots.iter_mut() {
            OsRng
                .try_fill_bytes(s)
                .map_err(|e| anyhow!("os rng: {}", e))?;
        }
        debug!("generated {} random key slot(s)", k);
        Ok(Self { slots })
    }

    /// Keys as a slice of 8-byte arrays, ready for `KeyedBitFilter::try_new`.
    #[inline]
    pub fn slots(&self) -> &[[u8; HSIP_KEY_LEN]] {
        &self.slots
    }

    /// Number of keys (K).
    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// All key bytes as hex (K*16 chars).
    pub fn to_hex(&self) -> String {
        to_hex(self.slots.concat().as_slice())
    }

    /// All key bytes as standard base64.
    pub fn to_base64(&self) -> String {
        to_base64(self.slots.concat().as_slice())
    }
}

// Key bytes stay out of Debug output.
impl fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyMaterial")
            .field("slots", &self.slots.len())
            .finish()
    }
}

impl Drop for KeyMaterial {
    fn drop(&mut self) {
        for s in self.slots.iter_mut() {
            s.zeroize();
        }
    }
}
