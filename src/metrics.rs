//! Lightweight global metrics for hsipbf.
//!
//! Relaxed atomic counters for filter activity. Advisory only: the filters
//! themselves are not synchronized. With the `metrics` feature off every
//! recorder is a no-op and snapshots read zero.

use serde::Serialize;

#[cfg(feature = "metrics")]
use std::sync::atomic::{AtomicU64, Ordering};

#[cfg(feature = "metrics")]
static FILTER_ADDS: AtomicU64 = AtomicU64::new(0);
#[cfg(feature = "metrics")]
static FILTER_QUERIES: AtomicU64 = AtomicU64::new(0);
#[cfg(feature = "metrics")]
static FILTER_QUERY_HITS: AtomicU64 = AtomicU64::new(0);
#[cfg(feature = "metrics")]
static FILTER_CLEARS: AtomicU64 = AtomicU64::new(0);
#[cfg(feature = "metrics")]
static BYTES_HASHED: AtomicU64 = AtomicU64::new(0);

#[derive(Debug, Clone, Default, Serialize)]
pub struct MetricsSnapshot {
    pub filter_adds: u64,
    pub filter_queries: u64,
    pub filter_query_hits: u64,
    pub filter_clears: u64,
    /// Input bytes fed to the hash, counted once per derived slot tag.
    pub bytes_hashed: u64,
}

impl MetricsSnapshot {
    pub fn hit_ratio(&self) -> f64 {
        if self.filter_queries == 0 {
            0.0
        } else {
            self.filter_query_hits as f64 / self.filter_queries as f64
        }
    }
}

// ----- Recorders -----

#[inline]
pub fn record_filter_add(input_len: usize, slots: usize) {
    #[cfg(feature = "metrics")]
    {
        FILTER_ADDS.fetch_add(1, Ordering::Relaxed);
        BYTES_HASHED.fetch_add((input_len as u64).saturating_mul(slots as u64), Ordering::Relaxed);
    }
    #[cfg(not(feature = "metrics"))]
    let _ = (input_len, slots);
}

#[inline]
pub fn record_filter_query(input_len: usize, slots_hashed: usize, hit: bool) {
    #[cfg(feature = "metrics")]
    {
        FILTER_QUERIES.fetch_add(1, Ordering::Relaxed);
        if hit {
            FILTER_QUERY_HITS.fetch_add(1, Ordering::Relaxed);
        }
        BYTES_HASHED.fetch_add(
            (input_len as u64).saturating_mul(slots_hashed as u64),
            Ordering::Relaxed,
        );
    }
    #[cfg(not(feature = "metrics"))]
    let _ = (input_len, slots_hashed, hit);
}

#[inline]
pub fn record_filter_clear() {
    #[cfg(feature = "metrics")]
    FILTER_CLEARS.fetch_add(1, Ordering::Relaxed);
}

// ----- Snapshot / Reset -----

#[cfg(feature = "metrics")]
pub fn snapshot() -> MetricsSnapshot {
    MetricsSnapshot {
        filter_adds: FILTER_ADDS.load(Ordering::Relaxed),
        filter_queries: FILTER_QUERIES.load(Ordering::Relaxed),
        filter_query_hits: FILTER_QUERY_HITS.load(Ordering::Relaxed),
        filter_clears: FILTER_CLEARS.load(Ordering::Relaxed),
        bytes_hashed: BYTES_HASHED.load(Ordering::Relaxed),
    }
}

#[cfg(not(feature = "metrics"))]
pub fn snapshot() -> MetricsSnapshot {
    MetricsSnapshot::default()
}

pub fn reset() {
    #[cfg(feature = "metrics")]
    {
        FILTER_ADDS.store(0, Ordering::Relaxed);
        FILTER_QUERIES.store(0, Ordering::Relaxed);
        FILTER_QUERY_HITS.store(0, Ordering::Relaxed);
        FILTER_CLEARS.store(0, Ordering::Relaxed);
        BYTES_HASHED.store(0, Ordering::Relaxed);
    }
}
