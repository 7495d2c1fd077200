//! hsipbf: Bloom filter keyed by HalfSipHash, for small-memory membership tests.

// Core
pub mod consts;
pub mod hash;   // src/hash/{mod,halfsiphash}.rs
pub mod bloom;  // src/bloom/{mod,bits,keyed,estimate}.rs

// Key material, config, counters
pub mod keys;
pub mod config;
pub mod metrics;

// Utilities (hex/base64)
pub mod util;   // src/util/mod.rs

// C ABI: enabled with the "ffi" feature
#[cfg(feature = "ffi")]
pub mod ffi;

// Convenience re-exports
pub use bloom::{BitFilter, KeyedBitFilter};
pub use config::FilterConfig;
pub use hash::{HalfSipHash, HalfSipHash13, HalfSipHash24, HashKind, KeyedHash};
pub use keys::KeyMaterial;
