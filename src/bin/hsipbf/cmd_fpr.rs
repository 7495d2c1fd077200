use anyhow::{anyhow, Result};
use log::{info, warn};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use serde::Serialize;
use std::collections::HashSet;

use hsipbf::bloom::{false_positive_rate, optimal_k};
use hsipbf::hash::{HalfSipHash13, HalfSipHash24, KeyedHash};
use hsipbf::metrics::{self, MetricsSnapshot};
use hsipbf::{HashKind, KeyMaterial, KeyedBitFilter};

use crate::util::effective_config;

#[derive(Serialize)]
struct FprReport {
    hash: &'static str,
    bits: usize,
    k: usize,
    n: usize,
    probes: usize,
    seed: u64,
    false_positives: usize,
    empirical_fpr: f64,
    estimated_fpr: f64,
    optimal_k: usize,
    fill_ratio: f64,
    metrics: MetricsSnapshot,
}

/// Random members and probes, generated up front from one seed.
struct Workload {
    members: Vec<[u8; 8]>,
    probes: Vec<[u8; 8]>,
}

/// CLI: fpr
/// - K keys, N members and P non-member probes are drawn from a seeded RNG (reproducible).
/// - Compares the measured false-positive rate with (1 - e^(-KN/M))^K.
pub fn exec(
    bits: Option<usize>,
    k: usize,
    n: usize,
    probes: usize,
    seed: u64,
    hash: Option<String>,
    json: bool,
) -> Result<()> {
    let cfg = effective_config(bits, None, hash)?;
    if k == 0 {
        return Err(anyhow!("--k must be positive"));
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut key_bytes = vec![0u8; k * 8];
    rng.fill_bytes(&mut key_bytes);
    let km = KeyMaterial::from_bytes(&key_bytes)?;

    let wl = workload(&mut rng, n, probes);
    info!(
        "fpr: bits={} k={} n={} probes={} hash={} seed={:#x}",
        cfg.bits, k, n, probes, cfg.hash_kind, seed
    );

    metrics::reset();
    let (false_positives, fill_ratio) =
        dispatch_geometry!(cfg.bits, k, measure_with(cfg.hash_kind, &km, &wl))?;

    let empirical = if probes == 0 {
        0.0
    } else {
        false_positives as f64 / probes as f64
    };
    let estimated = false_positive_rate(cfg.bits, k, n);
    if probes > 0 && estimated > 0.0 && empirical > estimated * 4.0 + 0.01 {
        warn!(
            "measured rate {:.6} is far above the estimate {:.6}",
            empirical, estimated
        );
    }

    let report = FprReport {
        hash: cfg.hash_kind.as_str(),
        bits: cfg.bits,
        k,
        n,
        probes,
        seed,
        false_positives,
        empirical_fpr: empirical,
        estimated_fpr: estimated,
        optimal_k: optimal_k(cfg.bits, n),
        fill_ratio,
        metrics: metrics::snapshot(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!(
            "fpr: bits={} k={} n={} hash={}",
            report.bits, report.k, report.n, report.hash
        );
        println!(
            "  false positives: {} / {} = {:.6}",
            report.false_positives, report.probes, report.empirical_fpr
        );
        println!("  estimate (1-e^(-kn/m))^k = {:.6}", report.estimated_fpr);
        println!("  fill ratio: {:.4}, optimal k for this load: {}", report.fill_ratio, report.optimal_k);
    }
    Ok(())
}

fn workload(rng: &mut StdRng, n: usize, probes: usize) -> Workload {
    let mut seen: HashSet<u64> = HashSet::with_capacity(n);
    let mut members = Vec::with_capacity(n);
    while members.len() < n {
        let v = rng.next_u64();
        if seen.insert(v) {
            members.push(v.to_le_bytes());
        }
    }
    let mut out = Vec::with_capacity(probes);
    while out.len() < probes {
        let v = rng.next_u64();
        if !seen.contains(&v) {
            out.push(v.to_le_bytes());
        }
    }
    Workload { members, probes: out }
}

fn measure_with<const M: usize, const K: usize>(
    kind: HashKind,
    km: &KeyMaterial,
    wl: &Workload,
) -> Result<(usize, f64)> {
    match kind {
        HashKind::Sip24 => measure::<M, K, HalfSipHash24>(km, wl),
        HashKind::Sip13 => measure::<M, K, HalfSipHash13>(km, wl),
    }
}

fn measure<const M: usize, const K: usize, H: KeyedHash>(
    km: &KeyMaterial,
    wl: &Workload,
) -> Result<(usize, f64)> {
    let mut bf = KeyedBitFilter::<M, K, H>::try_new(km.slots())?;
    for m in &wl.members {
        bf.add(m);
    }
    // Sanity: no false negatives.
    if let Some(miss) = wl.members.iter().position(|m| !bf.contains(m)) {
        return Err(anyhow!("false negative for member #{}", miss));
    }
    let fp = wl.probes.iter().filter(|p| bf.contains(&p[..])).count();
    Ok((fp, bf.bits().fill_ratio()))
}
