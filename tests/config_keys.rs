use anyhow::Result;

use hsipbf::config::FilterConfig;
use hsipbf::consts::{DEFAULT_FILTER_BITS, ENV_BITS, ENV_HASH, ENV_KEYS_BASE64, ENV_KEYS_HEX};
use hsipbf::{HashKind, KeyMaterial, KeyedBitFilter};

const HEX2: &str = "00010203040506071011121314151617";

#[test]
fn builder_defaults_and_overrides() -> Result<()> {
    let cfg = FilterConfig::default().build()?;
    assert_eq!(cfg.hash_kind, HashKind::Sip24);
    assert_eq!(cfg.bits, DEFAULT_FILTER_BITS);
    assert!(cfg.load_keys().is_err(), "no keys configured by default");

    let cfg = FilterConfig::default()
        .with_hash_kind(HashKind::Sip13)
        .with_bits(4096)
        .with_keys_hex(Some(HEX2))
        .build()?;
    assert_eq!(cfg.hash_kind, HashKind::Sip13);
    assert_eq!(cfg.bits, 4096);
    assert_eq!(cfg.load_keys()?.len(), 2);

    assert!(FilterConfig::default().with_bits(1000).build().is_err());
    Ok(())
}

#[test]
fn hex_keys_take_precedence_over_base64() -> Result<()> {
    let other = KeyMaterial::from_hex("ffffffffffffffff")?;
    let cfg = FilterConfig::default()
        .with_keys_base64(Some(other.to_base64()))
        .with_keys_hex(Some(HEX2))
        .build()?;
    let km = cfg.load_keys()?;
    assert_eq!(km.to_hex(), HEX2);

    let cfg = cfg.with_keys_hex(None::<String>);
    assert_eq!(cfg.load_keys()?, other);
    Ok(())
}

#[test]
fn config_output_never_shows_keys() -> Result<()> {
    let cfg = FilterConfig::default().with_keys_hex(Some(HEX2)).build()?;
    let shown = format!("{} {:?}", cfg, cfg);
    assert!(!shown.contains(HEX2));
    assert!(shown.contains("keys_hex: set"));

    let km = cfg.load_keys()?;
    assert!(!format!("{:?}", km).contains("0001"));
    Ok(())
}

#[test]
fn key_material_formats() -> Result<()> {
    let km = KeyMaterial::from_hex(HEX2)?;
    assert_eq!(km.slots()[1], [0x10, 0x11, 0x12, 0x13, 0x14, 0x15, 0x16, 0x17]);
    assert_eq!(KeyMaterial::from_base64(&km.to_base64())?, km);
    assert_eq!(KeyMaterial::from_hex(&format!("0x{}", HEX2))?, km);

    assert!(KeyMaterial::from_hex("0001020304").is_err(), "5 bytes");
    assert!(KeyMaterial::from_hex("").is_err());
    assert!(KeyMaterial::from_hex("zz01020304050607").is_err());
    assert!(KeyMaterial::generate(0).is_err());

    let fresh = KeyMaterial::generate(3)?;
    assert_eq!(fresh.len(), 3);
    let bf = KeyedBitFilter::<512, 3>::try_new(fresh.slots())?;
    assert!(!bf.contains(b"nothing added"));
    Ok(())
}

/// The only test in this binary that touches process ENV.
#[test]
fn from_env_reads_and_ignores_invalid() -> Result<()> {
    std::env::set_var(ENV_HASH, "1-3");
    std::env::set_var(ENV_BITS, "2048");
    std::env::set_var(ENV_KEYS_HEX, HEX2);
    std::env::remove_var(ENV_KEYS_BASE64);

    let cfg = FilterConfig::from_env().build()?;
    assert_eq!(cfg.hash_kind, HashKind::Sip13);
    assert_eq!(cfg.bits, 2048);
    assert_eq!(cfg.load_keys()?.to_hex(), HEX2);

    // Invalid values fall back to defaults.
    std::env::set_var(ENV_HASH, "md5");
    std::env::set_var(ENV_BITS, "1000");
    let cfg = FilterConfig::from_env();
    assert_eq!(cfg.hash_kind, HashKind::Sip24);
    assert_eq!(cfg.bits, DEFAULT_FILTER_BITS);

    for v in [ENV_HASH, ENV_BITS, ENV_KEYS_HEX] {
        std::env::remove_var(v);
    }
    Ok(())
}
