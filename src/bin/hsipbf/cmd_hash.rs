use anyhow::{anyhow, Result};
use log::debug;
use serde::Serialize;

use hsipbf::consts::HSIP_KEY_LEN;
use hsipbf::hash::{HalfSipHash13, HalfSipHash24, KeyedHash};
use hsipbf::HashKind;

use crate::util::{decode_key_arg, decode_value_arg, effective_config};

#[derive(Serialize)]
struct HashReport {
    hash: String,
    source: &'static str,
    len: usize,
    chunk: Option<usize>,
    tag: String,
}

/// CLI: hash
/// - Key from --key, otherwise slot 0 of the configured key material.
/// - With --chunk N the input is absorbed N bytes at a time.
pub fn exec(
    key: Option<String>,
    input: String,
    hash: Option<String>,
    chunk: Option<usize>,
    json: bool,
) -> Result<()> {
    let cfg = effective_config(None, None, hash)?;
    let key = match key {
        Some(hex) => decode_key_arg(&hex)?,
        None => cfg.load_keys()?.slots()[0],
    };
    if chunk == Some(0) {
        return Err(anyhow!("--chunk must be positive"));
    }

    let (data, source) = decode_value_arg(&input)?;
    debug!("hash: {} bytes from {}, kind={}", data.len(), source, cfg.hash_kind);

    let tag = match cfg.hash_kind {
        HashKind::Sip24 => chunked::<HalfSipHash24>(&key, &data, chunk),
        HashKind::Sip13 => chunked::<HalfSipHash13>(&key, &data, chunk),
    };

    if json {
        let r = HashReport {
            hash: cfg.hash_kind.as_str().to_string(),
            source,
            len: data.len(),
            chunk,
            tag: format!("{:08x}", tag),
        };
        println!("{}", serde_json::to_string(&r)?);
    } else {
        println!("{:08x}", tag);
    }
    Ok(())
}

fn chunked<H: KeyedHash>(key: &[u8; HSIP_KEY_LEN], data: &[u8], chunk: Option<usize>) -> u32 {
    let mut h = H::with_key(key);
    match chunk {
        Some(n) => {
            for piece in data.chunks(n) {
                h.absorb(piece);
            }
        }
        None => h.absorb(data),
    }
    h.tag()
}
