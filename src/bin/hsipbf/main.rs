use anyhow::Result;
use env_logger::{Builder, Env};
use log::error;

#[macro_use]
mod geometry;
mod cli;
mod util;
mod cmd_hash;
mod cmd_keygen;
mod cmd_probe;
mod cmd_fpr;

fn init_logger() {
    // Level from RUST_LOG, default info.
    // Example: RUST_LOG=debug hsipbf probe ...
    Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();
}

fn main() {
    init_logger();

    if let Err(e) = run() {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = cli::Cli::parse();
    match cli.cmd {
        cli::Cmd::Hash { key, input, hash, chunk, json } =>
            cmd_hash::exec(key, input, hash, chunk, json),

        cli::Cmd::Keygen { k, base64 } =>
            cmd_keygen::exec(k, base64),

        cli::Cmd::Probe { members, query, bits, keys, hash, json } =>
            cmd_probe::exec(members, query, bits, keys, hash, json),

        cli::Cmd::Fpr { bits, k, n, probes, seed, hash, json } =>
            cmd_fpr::exec(bits, k, n, probes, seed, hash, json),
    }
}
