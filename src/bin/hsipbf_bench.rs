use anyhow::{anyhow, Result};
use clap::Parser;
use serde::Serialize;
use std::hint::black_box;
use std::time::{Duration, Instant};

use hsipbf::bloom::false_positive_rate;
use hsipbf::hash::{HalfSipHash13, HalfSipHash24, KeyedHash};
use hsipbf::metrics::{self, MetricsSnapshot};
use hsipbf::KeyedBitFilter;

/// Simple deterministic PRNG (SplitMix64).
/// Good enough for benches; not cryptographic.
#[derive(Clone)]
struct Rng64 {
    state: u64,
}
impl Rng64 {
    fn new(seed: u64) -> Self {
        Self { state: seed }
    }
    #[inline]
    fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }
    fn fill(&mut self, buf: &mut [u8]) {
        for chunk in buf.chunks_mut(8) {
            let v = self.next_u64().to_le_bytes();
            chunk.copy_from_slice(&v[..chunk.len()]);
        }
    }
}

/// Progress report in ~10 steps.
struct Progress<'a> {
    name: &'a str,
    total: usize,
    step: usize,
    next: usize,
    start: Instant,
    enabled: bool,
}
impl<'a> Progress<'a> {
    fn new(name: &'a str, total: usize, enabled: bool) -> Self {
        let step = std::cmp::max(1, total / 10);
        Self {
            name,
            total,
            step,
            next: step,
            start: Instant::now(),
            enabled,
        }
    }
    fn bump(&mut self, cur: usize) {
        if !self.enabled {
            return;
        }
        if cur >= self.next || cur == self.total {
            let pct = (cur as f64 / self.total.max(1) as f64) * 100.0;
            let elapsed = self.start.elapsed().as_secs_f64();
            let tput = if elapsed > 0.0 { cur as f64 / elapsed } else { 0.0 };
            println!(
                "[{:>14}] {:>9} / {:<9} ({:>5.1}%) elapsed={:.2}s, tput={:.0} ops/s",
                self.name, cur, self.total, pct, elapsed, tput
            );
            self.next = cur.saturating_add(self.step);
        }
    }
}

// Filter geometry under test: 64 Ki bits, 4 slots.
const BENCH_BITS: usize = 65536;
const BENCH_K: usize = 4;

// Ops are timed in batches; per-op latency is batch time / batch size.
const BATCH: usize = 256;

/// hsipbf micro-benchmark CLI
///
/// Examples:
///   hsipbf_bench --n 1000000 --json
///   hsipbf_bench --sizes 4,16,64,1024 --members 4000
#[derive(Parser, Debug)]
#[command(name = "hsipbf_bench", version, about = "hsipbf micro-bench CLI")]
struct Opt {
    /// Operations per hash phase
    #[arg(long, default_value_t = 1_000_000)]
    n: usize,

    /// Input sizes (bytes) for the hash phases
    #[arg(long, value_delimiter = ',', default_value = "4,16,64,256")]
    sizes: Vec<usize>,

    /// Members added to the filter (and number of hit/miss probes)
    #[arg(long, default_value_t = 5_000)]
    members: usize,

    /// Member/probe key size (bytes)
    #[arg(long, default_value_t = 16)]
    key_size: usize,

    /// Random seed
    #[arg(long, default_value_t = 0xA1B2_C3D4_E5F6_7788)]
    seed: u64,

    /// JSON output
    #[arg(long, default_value_t = false)]
    json: bool,

    /// Show progress for each phase
    #[arg(long, default_value_t = true)]
    progress: bool,
}

#[derive(Debug, Clone, Serialize)]
struct PhaseStats {
    name: String,
    ops: u64,
    elapsed_sec: f64,
    tput_ops: f64,
    p50_ns: f64,
    p90_ns: f64,
    p99_ns: f64,
}

#[derive(Debug, Clone, Serialize)]
struct BenchReport {
    phases: Vec<PhaseStats>,
    bits: usize,
    k: usize,
    members: usize,
    false_positives: usize,
    empirical_fpr: f64,
    estimated_fpr: f64,
    fill_ratio: f64,
    metrics: MetricsSnapshot,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("bench error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let opt = Opt::parse();
    if opt.n == 0 || opt.members == 0 || opt.key_size == 0 {
        return Err(anyhow!("--n, --members and --key-size must be positive"));
    }

    // Reset counters so the report covers this run only.
    metrics::reset();

    let mut rng = Rng64::new(opt.seed);
    let mut phases: Vec<PhaseStats> = Vec::new();

    // Phase A: raw hash throughput per preset and input size
    let mut key = [0u8; 8];
    rng.fill(&mut key);
    for &size in &opt.sizes {
        let mut input = vec![0u8; size];
        rng.fill(&mut input);

        let name = format!("sip24_{}B", size);
        println!("==> Phase: {} ({} ops)", name, opt.n);
        phases.push(phase_hash::<HalfSipHash24>(&opt, &name, &key, &input));

        let name = format!("sip13_{}B", size);
        println!("==> Phase: {} ({} ops)", name, opt.n);
        phases.push(phase_hash::<HalfSipHash13>(&opt, &name, &key, &input));
    }

    // Phase B: filter add / contains (hits, misses)
    let mut keys = [[0u8; 8]; BENCH_K];
    for k in keys.iter_mut() {
        rng.fill(k);
    }
    let members = random_inputs(&mut rng, opt.members, opt.key_size, b'm');
    let misses = random_inputs(&mut rng, opt.members, opt.key_size, b'x');

    let mut bf = KeyedBitFilter::<BENCH_BITS, BENCH_K>::new(&keys);

    println!("==> Phase: add ({} keys)", members.len());
    phases.push(timed(&opt, "add", members.len(), |i| {
        bf.add(&members[i]);
        true
    }));

    println!("==> Phase: contains_hits ({} keys)", members.len());
    let mut hits = 0usize;
    phases.push(timed(&opt, "contains_hits", members.len(), |i| {
        let r = bf.contains(&members[i]);
        hits += r as usize;
        r
    }));
    if hits != members.len() {
        return Err(anyhow!(
            "false negatives: {} of {} members not found",
            members.len() - hits,
            members.len()
        ));
    }

    println!("==> Phase: contains_miss ({} keys)", misses.len());
    let mut false_positives = 0usize;
    phases.push(timed(&opt, "contains_miss", misses.len(), |i| {
        let r = bf.contains(&misses[i]);
        false_positives += r as usize;
        r
    }));

    let report = BenchReport {
        phases,
        bits: BENCH_BITS,
        k: BENCH_K,
        members: members.len(),
        false_positives,
        empirical_fpr: false_positives as f64 / misses.len() as f64,
        estimated_fpr: false_positive_rate(BENCH_BITS, BENCH_K, members.len()),
        fill_ratio: bf.bits().fill_ratio(),
        metrics: metrics::snapshot(),
    };

    if opt.json {
        println!("{}", serde_json::to_string(&report)?);
    } else {
        print_report_human(&report);
    }
    Ok(())
}

// ---------- phases ----------

fn phase_hash<H: KeyedHash>(opt: &Opt, name: &str, key: &[u8; 8], input: &[u8]) -> PhaseStats {
    timed(opt, name, opt.n, |_| {
        let t = H::tag_of(black_box(key), black_box(input));
        black_box(t) != 0
    })
}

fn timed<F: FnMut(usize) -> bool>(opt: &Opt, name: &str, ops: usize, mut f: F) -> PhaseStats {
    let mut lat = Vec::with_capacity(ops / BATCH + 1);
    let mut prog = Progress::new(name, ops, opt.progress);
    let start = Instant::now();
    let mut i = 0;
    while i < ops {
        let end = (i + BATCH).min(ops);
        let t0 = Instant::now();
        for j in i..end {
            black_box(f(j));
        }
        lat.push(t0.elapsed() / (end - i) as u32);
        i = end;
        prog.bump(i);
    }
    let elapsed = start.elapsed();
    let stats = stats(name, ops as u64, elapsed, &mut lat);
    print_phase_summary(&stats);
    stats
}

// ---------- helpers ----------

fn random_inputs(rng: &mut Rng64, n: usize, size: usize, tag: u8) -> Vec<Vec<u8>> {
    (0..n)
        .map(|_| {
            let mut v = vec![0u8; size];
            rng.fill(&mut v);
            // Members and misses never collide: first byte differs.
            v[0] = tag;
            v
        })
        .collect()
}

fn print_phase_summary(p: &PhaseStats) {
    println!(
        "    {:>14} done: ops={} elapsed={:.3}s, tput={:.0} ops/s, p50={:.1}ns p90={:.1}ns p99={:.1}ns",
        p.name, p.ops, p.elapsed_sec, p.tput_ops, p.p50_ns, p.p90_ns, p.p99_ns
    );
}

fn stats(name: &str, ops: u64, elapsed: Duration, lat: &mut [Duration]) -> PhaseStats {
    lat.sort_unstable();
    let to_ns = |d: Duration| d.as_secs_f64() * 1e9;
    let p = |q: f64| -> f64 {
        if lat.is_empty() {
            return 0.0;
        }
        let idx = ((lat.len() as f64 - 1.0) * q).round() as usize;
        to_ns(lat[idx])
    };
    let tput = if elapsed.as_secs_f64() > 0.0 {
        ops as f64 / elapsed.as_secs_f64()
    } else {
        0.0
    };
    PhaseStats {
        name: name.to_string(),
        ops,
        elapsed_sec: elapsed.as_secs_f64(),
        tput_ops: tput,
        p50_ns: p(0.50),
        p90_ns: p(0.90),
        p99_ns: p(0.99),
    }
}

fn print_report_human(r: &BenchReport) {
    println!();
    println!("== hsipbf bench ==");
    for p in &r.phases {
        println!(
            "{:>16}: {:>12.0} ops/s  p50={:.1}ns p99={:.1}ns",
            p.name, p.tput_ops, p.p50_ns, p.p99_ns
        );
    }
    println!(
        "filter: bits={} k={} members={} fill={:.4}",
        r.bits, r.k, r.members, r.fill_ratio
    );
    println!(
        "false positives: {} (rate {:.6}, estimate {:.6})",
        r.false_positives, r.empirical_fpr, r.estimated_fpr
    );
    let m = &r.metrics;
    println!(
        "metrics: adds={} queries={} hits={} hit_ratio={:.3} bytes_hashed={}",
        m.filter_adds,
        m.filter_queries,
        m.filter_query_hits,
        m.hit_ratio(),
        m.bytes_hashed
    );
}
