use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// hsipbf: HalfSipHash tags and keyed Bloom filter tools
#[derive(Parser, Debug)]
#[command(name = "hsipbf", version, about = "HalfSipHash keyed Bloom filter CLI")]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Cmd,
}

#[derive(Subcommand, Debug)]
pub enum Cmd {
    /// Compute the 32-bit tag of an input under one 8-byte key
    ///
    /// Input forms: literal text, hex:<bytes>, @<file>, or - for stdin.
    ///   hsipbf hash --key 0001020304050607 --input hello
    ///   hsipbf hash --key 0001020304050607 --input @./names.txt --chunk 3
    Hash {
        /// Key, 8 bytes in hex. If omitted, the first configured key slot is used.
        #[arg(long)]
        key: Option<String>,
        #[arg(long)]
        input: String,
        /// sip24 (default) or sip13
        #[arg(long)]
        hash: Option<String>,
        /// Feed the input in pieces of N bytes (the tag must not change)
        #[arg(long)]
        chunk: Option<usize>,
        /// JSON output
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Generate K random 8-byte keys (hex, or base64 with --base64)
    Keygen {
        #[arg(long, default_value_t = 4)]
        k: usize,
        #[arg(long, default_value_t = false)]
        base64: bool,
    },
    /// Build a filter from the lines of a file and test queries against it
    ///
    /// K is the number of keys. Keys come from --keys or HSIPBF_KEYS_HEX / HSIPBF_KEYS_BASE64.
    ///   hsipbf probe --members ./seen.txt --keys 00010203040506071011121314151617 --query alice --query bob
    Probe {
        /// File with one member per line (empty lines skipped)
        #[arg(long)]
        members: PathBuf,
        /// Query string (repeatable)
        #[arg(long, required = true)]
        query: Vec<String>,
        /// Filter size in bits (power of two; default HSIPBF_BITS or 1024)
        #[arg(long)]
        bits: Option<usize>,
        /// K*8 key bytes in hex
        #[arg(long)]
        keys: Option<String>,
        /// sip24 (default) or sip13
        #[arg(long)]
        hash: Option<String>,
        /// JSON output
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Measure the false-positive rate on random data against the textbook estimate
    ///
    ///   hsipbf fpr --bits 1024 --k 4 --n 50 --probes 10000
    Fpr {
        /// Filter size in bits (power of two; default HSIPBF_BITS or 1024)
        #[arg(long)]
        bits: Option<usize>,
        /// Number of keys/slots
        #[arg(long, default_value_t = 4)]
        k: usize,
        /// Members to add
        #[arg(long, default_value_t = 50)]
        n: usize,
        /// Non-member probes
        #[arg(long, default_value_t = 10_000)]
        probes: usize,
        /// RNG seed for keys and data
        #[arg(long, default_value_t = 0x5EED_0F_B100_F11E)]
        seed: u64,
        /// sip24 (default) or sip13
        #[arg(long)]
        hash: Option<String>,
        /// JSON output
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

impl Cli {
    pub fn parse() -> Self {
        <Cli as Parser>::parse()
    }
}
