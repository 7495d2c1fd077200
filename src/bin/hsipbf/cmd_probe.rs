use anyhow::{Context, Result};
use log::info;
use serde::Serialize;
use std::path::PathBuf;

use hsipbf::hash::{HalfSipHash13, HalfSipHash24, KeyedHash};
use hsipbf::{BitFilter, HashKind, KeyMaterial, KeyedBitFilter};

use crate::util::{effective_config, read_lines};

#[derive(Serialize)]
struct QueryResult {
    query: String,
    maybe_present: bool,
}

#[derive(Serialize)]
struct ProbeReport {
    hash: &'static str,
    bits: usize,
    k: usize,
    members: usize,
    ones: usize,
    fill_ratio: f64,
    estimated_fpr: f64,
    results: Vec<QueryResult>,
}

/// CLI: probe
/// - Builds an in-memory filter from every non-empty line of --members.
/// - Reports, per --query, "maybe" (possibly a member) or "no" (definitely not).
pub fn exec(
    members: PathBuf,
    queries: Vec<String>,
    bits: Option<usize>,
    keys: Option<String>,
    hash: Option<String>,
    json: bool,
) -> Result<()> {
    let cfg = effective_config(bits, keys, hash)?;
    let km = cfg.load_keys().context("load filter keys")?;
    let lines = read_lines(&members)?;
    info!(
        "probe: {} member(s), bits={}, k={}, hash={}",
        lines.len(),
        cfg.bits,
        km.len(),
        cfg.hash_kind
    );

    let report = dispatch_geometry!(cfg.bits, km.len(), probe_with(cfg.hash_kind, &km, &lines, &queries))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!(
            "filter: bits={} k={} hash={} members={} fill={:.4} est_fpr={:.6}",
            report.bits,
            report.k,
            report.hash,
            report.members,
            report.fill_ratio,
            report.estimated_fpr
        );
        for r in &report.results {
            println!("{}\t{}", if r.maybe_present { "maybe" } else { "no" }, r.query);
        }
    }
    Ok(())
}

fn probe_with<const M: usize, const K: usize>(
    kind: HashKind,
    km: &KeyMaterial,
    members: &[String],
    queries: &[String],
) -> Result<ProbeReport> {
    match kind {
        HashKind::Sip24 => build_and_query::<M, K, HalfSipHash24>(kind, km, members, queries),
        HashKind::Sip13 => build_and_query::<M, K, HalfSipHash13>(kind, km, members, queries),
    }
}

fn build_and_query<const M: usize, const K: usize, H: KeyedHash>(
    kind: HashKind,
    km: &KeyMaterial,
    members: &[String],
    queries: &[String],
) -> Result<ProbeReport> {
    let mut bf = KeyedBitFilter::<M, K, H>::try_new(km.slots())?;
    for m in members {
        bf.add_str(m);
    }

    let results = queries
        .iter()
        .map(|q| QueryResult {
            query: q.clone(),
            maybe_present: bf.contains_str(q),
        })
        .collect();

    Ok(ProbeReport {
        hash: kind.as_str(),
        bits: BitFilter::<M, K>::BITS,
        k: BitFilter::<M, K>::SLOTS,
        members: members.len(),
        ones: bf.bits().count_ones(),
        fill_ratio: bf.bits().fill_ratio(),
        estimated_fpr: bf.estimated_fpr(members.len()),
        results,
    })
}
