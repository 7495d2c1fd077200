//! Centralized configuration and builder for the hsipbf tools.
//!
//! Goals:
//! - Single place to collect tunables instead of scattering env lookups.
//! - FilterConfig::from_env() reads HSIPBF_* variables; builder-style setters override.
//!
//! The filter geometry (M, K) and hash preset of `KeyedBitFilter` are type
//! parameters; this config only carries the runtime choice the binaries
//! dispatch on.
//!
//! ENV:
//! - HSIPBF_HASH         = sip24|sip13 (default sip24)
//! - HSIPBF_BITS         = filter size in bits, power of two (default 1024)
//! - HSIPBF_KEYS_HEX     = K*8 key bytes in hex
//! - HSIPBF_KEYS_BASE64  = K*8 key bytes in base64 (used if HEX is not set)

use anyhow::{anyhow, Result};
use log::{debug, warn};
use std::fmt;

use crate::consts::{DEFAULT_FILTER_BITS, ENV_BITS, ENV_HASH, ENV_KEYS_BASE64, ENV_KEYS_HEX};
use crate::hash::{HashKind, HASH_KIND_DEFAULT};
use crate::keys::KeyMaterial;

/// Runtime configuration for building a keyed filter.
#[derive(Clone)]
pub struct FilterConfig {
    /// HalfSipHash preset.
    /// Env: HSIPBF_HASH (default sip24)
    pub hash_kind: HashKind,

    /// Filter size in bits (M). Must be a power of two.
    /// Env: HSIPBF_BITS (default 1024)
    pub bits: usize,

    /// Key bytes in hex (K*8 bytes). Takes precedence over base64.
    /// Env: HSIPBF_KEYS_HEX
    pub keys_hex: Option<String>,

    /// Key bytes in base64.
    /// Env: HSIPBF_KEYS_BASE64
    pub keys_base64: Option<String>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            hash_kind: HASH_KIND_DEFAULT,
            bits: DEFAULT_FILTER_BITS,
            keys_hex: None,
            keys_base64: None,
        }
    }
}

impl FilterConfig {
    /// Load configuration from environment variables. Invalid values are logged and ignored.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Ok(v) = std::env::var(ENV_HASH) {
            match v.parse::<HashKind>() {
                Ok(k) => cfg.hash_kind = k,
                Err(e) => warn!("{}: {}; using {}", ENV_HASH, e, cfg.hash_kind),
            }
        }

        if let Ok(v) = std::env::var(ENV_BITS) {
            match v.trim().parse::<usize>() {
                Ok(n) if n.is_power_of_two() => cfg.bits = n,
                _ => warn!(
                    "{}='{}' is not a power of two; using {}",
                    ENV_BITS,
                    v.trim(),
                    cfg.bits
                ),
            }
        }

        if let Ok(v) = std::env::var(ENV_KEYS_HEX) {
            let s = v.trim();
            if !s.is_empty() {
                cfg.keys_hex = Some(s.to_string());
            }
        }

        if let Ok(v) = std::env::var(ENV_KEYS_BASE64) {
            let s = v.trim();
            if !s.is_empty() {
                cfg.keys_base64 = Some(s.to_string());
            }
        }

        debug!("config from env: {}", cfg);
        cfg
    }

    /// Fluent setters (builder-style) to override specific fields.

    pub fn with_hash_kind(mut self, kind: HashKind) -> Self {
        self.hash_kind = kind;
        self
    }

    pub fn with_bits(mut self, bits: usize) -> Self {
        self.bits = bits;
        self
    }

    pub fn with_keys_hex<S: Into<String>>(mut self, hex: Option<S>) -> Self {
        self.keys_hex = hex.map(Into::into);
        self
    }

    pub fn with_keys_base64<S: Into<String>>(mut self, b64: Option<S>) -> Self {
        self.keys_base64 = b64.map(Into::into);
        self
    }

    /// Finish the builder: validate and obtain the configuration.
    pub fn build(self) -> Result<Self> {
        if !self.bits.is_power_of_two() {
            return Err(anyhow!("filter bits must be a power of two, got {}", self.bits));
        }
        Ok(self)
    }

    /// Parse the configured key material (hex first, then base64).
    pub fn load_keys(&self) -> Result<KeyMaterial> {
        if let Some(ref hex) = self.keys_hex {
            return KeyMaterial::from_hex(hex);
        }
        if let Some(ref b64) = self.keys_base64 {
            return KeyMaterial::from_base64(b64);
        }
        Err(anyhow!(
            "no keys configured (set {} or {}, or pass --keys)",
            ENV_KEYS_HEX,
            ENV_KEYS_BASE64
        ))
    }
}

impl fmt::Display for FilterConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Keys are reported as present/absent only.
        write!(
            f,
            "FilterConfig {{ hash_kind: {}, bits: {}, keys_hex: {}, keys_base64: {} }}",
            self.hash_kind,
            self.bits,
            if self.keys_hex.is_some() { "set" } else { "unset" },
            if self.keys_base64.is_some() { "set" } else { "unset" },
        )
    }
}

impl fmt::Debug for FilterConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
