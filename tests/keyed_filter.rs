use anyhow::Result;
use oorandom::Rand64;
use std::collections::HashSet;

use hsipbf::bloom::{false_positive_rate, BitFilter, KeyedBitFilter};
use hsipbf::hash::{halfsiphash24, HalfSipHash13};
use hsipbf::KeyMaterial;

const KEYS: [[u8; 8]; 2] = [
    [0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07],
    [0x10, 0x11, 0x12, 0x13, 0x14, 0x15, 0x16, 0x17],
];

fn random_keys<const K: usize>(rng: &mut Rand64) -> [[u8; 8]; K] {
    let mut keys = [[0u8; 8]; K];
    for k in keys.iter_mut() {
        k.copy_from_slice(&rng.rand_u64().to_le_bytes());
    }
    keys
}

/// Distinct members, then probes that are not members.
fn workload(rng: &mut Rand64, n: usize, probes: usize) -> (Vec<[u8; 8]>, Vec<[u8; 8]>) {
    let mut seen = HashSet::new();
    let mut members = Vec::with_capacity(n);
    while members.len() < n {
        let v = rng.rand_u64();
        if seen.insert(v) {
            members.push(v.to_le_bytes());
        }
    }
    let mut out = Vec::with_capacity(probes);
    while out.len() < probes {
        let v = rng.rand_u64();
        if !seen.contains(&v) {
            out.push(v.to_le_bytes());
        }
    }
    (members, out)
}

/// Two keys, 256 bits: "alpha" lands on bits 114 and 49, "beta" is rejected.
#[test]
fn alpha_beta_end_to_end() -> Result<()> {
    let mut bf = KeyedBitFilter::<256, 2>::new(&KEYS);
    assert!(!bf.contains(b"alpha"));
    bf.add(b"alpha");

    assert!(bf.contains(b"alpha"));
    assert!(!bf.contains(b"beta"), "beta maps to bits 70/61, both unset");

    let ones: Vec<usize> = (0..256).filter(|&i| bf.bits().has_hash(i as u32)).collect();
    assert_eq!(ones, vec![49, 114]);
    Ok(())
}

/// The keyed filter is the plain filter fed with per-key tags.
#[test]
fn keyed_filter_equals_manual_composition() -> Result<()> {
    let mut keyed = KeyedBitFilter::<1024, 2>::new(&KEYS);
    let mut plain = BitFilter::<1024, 2>::new();
    for word in ["alpha", "beta", "gamma", "delta"] {
        keyed.add_str(word);
        let tags = [
            halfsiphash24(&KEYS[0], word.as_bytes()),
            halfsiphash24(&KEYS[1], word.as_bytes()),
        ];
        plain.add(&tags);
    }
    assert_eq!(keyed.bits(), &plain);
    Ok(())
}

#[test]
fn no_false_negatives_under_load() -> Result<()> {
    let mut rng = Rand64::new(0xb100_0001);
    let keys = random_keys::<4>(&mut rng);
    let mut bf = KeyedBitFilter::<4096, 4>::new(&keys);

    let (members, _) = workload(&mut rng, 600, 0);
    for (i, m) in members.iter().enumerate() {
        bf.add(m);
        // Everything added so far stays present while unrelated keys go in.
        for prev in &members[..=i] {
            if !bf.contains(prev) {
                anyhow::bail!("false negative after {} adds", i + 1);
            }
        }
    }
    Ok(())
}

/// M=1024, K=4, N=50: estimate ~0.001. The measured rate stays near it.
#[test]
fn false_positive_rate_tracks_estimate() -> Result<()> {
    let mut rng = Rand64::new(0xf9a0_0042);
    let keys = random_keys::<4>(&mut rng);
    let (members, probes) = workload(&mut rng, 50, 10_000);

    let mut bf = KeyedBitFilter::<1024, 4>::new(&keys);
    for m in &members {
        bf.add(m);
    }
    let fp = probes.iter().filter(|p| bf.contains(&p[..])).count();
    let empirical = fp as f64 / probes.len() as f64;
    let estimate = false_positive_rate(1024, 4, members.len());

    assert!((estimate - 0.00099).abs() < 0.0001, "estimate={}", estimate);
    assert!(
        empirical <= estimate * 4.0 + 0.002,
        "empirical={} estimate={}",
        empirical,
        estimate
    );
    // About 10 expected.
    assert!(fp >= 1, "no false positives in {} probes, estimate={}", probes.len(), estimate);
    assert!((bf.estimated_fpr(members.len()) - estimate).abs() < 1e-12);
    Ok(())
}

#[test]
fn clear_resets_to_empty() -> Result<()> {
    let mut rng = Rand64::new(0xc1ea_0003);
    let keys = random_keys::<3>(&mut rng);
    let (members, probes) = workload(&mut rng, 200, 2_000);

    let mut bf = KeyedBitFilter::<2048, 3>::new(&keys);
    for m in &members {
        bf.add(m);
    }
    assert!(!bf.bits().is_empty());

    bf.clear();
    assert!(bf.bits().is_empty());
    assert_eq!(bf.bits().count_ones(), 0);
    // Empty filter: no member and no probe is reported.
    assert!(members.iter().all(|m| !bf.contains(m)));
    assert!(probes.iter().all(|p| !bf.contains(p)));

    // Usable again with the same keys.
    bf.add(&members[0]);
    assert!(bf.contains(&members[0]));
    Ok(())
}

/// Same inputs under different keys land on different bits.
#[test]
fn different_keys_give_different_filters() -> Result<()> {
    let mut rng = Rand64::new(0x6e75_0004);
    let keys_a = random_keys::<2>(&mut rng);
    let keys_b = random_keys::<2>(&mut rng);
    let mut a = KeyedBitFilter::<65536, 2>::new(&keys_a);
    let mut b = KeyedBitFilter::<65536, 2>::new(&keys_b);
    for i in 0u32..32 {
        a.add(&i.to_le_bytes());
        b.add(&i.to_le_bytes());
    }
    assert_ne!(a.bits(), b.bits());
    assert_ne!(a.tags(b"x"), b.tags(b"x"));
    Ok(())
}

#[test]
fn sip13_filter_from_key_material() -> Result<()> {
    let km = KeyMaterial::from_hex("00010203040506071011121314151617")?;
    let mut bf = KeyedBitFilter::<256, 2, HalfSipHash13>::try_new(km.slots())?;
    assert_eq!(bf.tags(b"alpha"), [0xfaf3_82f4, 0x963d_66a5]);
    bf.add_str("alpha");
    assert!(bf.contains_str("alpha"));

    // Wrong number of keys for K=3.
    assert!(KeyedBitFilter::<256, 3>::try_new(km.slots()).is_err());
    Ok(())
}

#[test]
fn tiny_filter_uses_one_byte() -> Result<()> {
    let keys = [KEYS[0]];
    let mut bf = KeyedBitFilter::<1, 1>::new(&keys);
    assert!(!bf.contains(b"anything"));
    bf.add(b"anything");
    // One bit: every input now tests positive.
    assert!(bf.contains(b"something else"));
    assert_eq!(bf.bits().count_ones(), 1);
    Ok(())
}
