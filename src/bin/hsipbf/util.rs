use anyhow::{anyhow, Context, Result};
use std::fs::OpenOptions;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use hsipbf::consts::HSIP_KEY_LEN;
use hsipbf::util::decode_hex;
use hsipbf::{FilterConfig, HashKind};

/// Decode an input argument: `-` (stdin), `@file`, `hex:..` or a literal string.
pub fn decode_value_arg(arg: &str) -> Result<(Vec<u8>, &'static str)> {
    decode_value_from(arg, std::io::stdin())
}

/// Same as `decode_value_arg`, with `-` read from `stdin`.
fn decode_value_from<R: Read>(arg: &str, mut stdin: R) -> Result<(Vec<u8>, &'static str)> {
    if arg == "-" {
        let mut buf = Vec::new();
        stdin.read_to_end(&mut buf).context("read stdin")?;
        return Ok((buf, "stdin"));
    }
    if let Some(p) = arg.strip_prefix('@') {
        let mut f = OpenOptions::new()
            .read(true)
            .open(p)
            .map_err(|e| anyhow!("open input file {}: {}", p, e))?;
        let mut buf = Vec::new();
        f.read_to_end(&mut buf)?;
        return Ok((buf, "file"));
    }
    if let Some(hx) = arg.strip_prefix("hex:") {
        let v = decode_hex(hx)?;
        return Ok((v, "hex"));
    }
    Ok((arg.as_bytes().to_vec(), "literal"))
}

/// Exactly one 8-byte key from hex.
pub fn decode_key_arg(hex: &str) -> Result<[u8; HSIP_KEY_LEN]> {
    let raw = decode_hex(hex).context("decode --key")?;
    <[u8; HSIP_KEY_LEN]>::try_from(raw.as_slice())
        .map_err(|_| anyhow!("--key must be exactly {} bytes, got {}", HSIP_KEY_LEN, raw.len()))
}

/// Non-empty lines of a text file (trailing `\r` stripped).
pub fn read_lines(p: &Path) -> Result<Vec<String>> {
    let f = OpenOptions::new()
        .read(true)
        .open(p)
        .with_context(|| format!("open {}", p.display()))?;
    let mut out = Vec::new();
    for line in BufReader::new(f).lines() {
        let line = line.with_context(|| format!("read {}", p.display()))?;
        let line = line.trim_end_matches('\r');
        if !line.is_empty() {
            out.push(line.to_string());
        }
    }
    Ok(out)
}

/// ENV-based config with CLI overrides applied on top.
pub fn effective_config(
    bits: Option<usize>,
    keys_hex: Option<String>,
    hash: Option<String>,
) -> Result<FilterConfig> {
    let mut cfg = FilterConfig::from_env();
    if let Some(b) = bits {
        cfg = cfg.with_bits(b);
    }
    if keys_hex.is_some() {
        cfg = cfg.with_keys_hex(keys_hex);
    }
    if let Some(h) = hash {
        cfg = cfg.with_hash_kind(h.parse::<HashKind>()?);
    }
    cfg.build()
}
