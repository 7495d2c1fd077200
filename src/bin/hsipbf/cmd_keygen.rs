use anyhow::Result;
use log::info;

use hsipbf::KeyMaterial;

/// CLI: keygen: K random keys from the OS RNG, printed as one string.
/// Feed the output to --keys or HSIPBF_KEYS_HEX / HSIPBF_KEYS_BASE64.
pub fn exec(k: usize, base64: bool) -> Result<()> {
    let km = KeyMaterial::generate(k)?;
    info!("generated {} key(s), {} bytes", km.len(), km.len() * 8);
    if base64 {
        println!("{}", km.to_base64());
    } else {
        println!("{}", km.to_hex());
    }
    Ok(())
}
