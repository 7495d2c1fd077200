//! Bloom filters: split into submodules
//! - bits.rs    : BitFilter<M, K>: bit array driven by precomputed tags
//! - keyed.rs   : KeyedBitFilter: K tags per input from one keyed hash under K keys
//! - estimate.rs: expected false-positive rate / optimal K

pub mod bits;
pub mod estimate;
pub mod keyed;

pub use bits::BitFilter;
pub use estimate::{false_positive_rate, optimal_k};
pub use keyed::KeyedBitFilter;
