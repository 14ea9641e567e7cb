//! CLI module for relay-node

use std::path::PathBuf;

pub mod show;
pub mod start;

/// Build the key store from clap args / environment
pub fn key_store(key_file: PathBuf, skip_pairing_check: bool) -> relay_id::KeyStore {
    relay_id::KeyStore::new(key_file).verify_pairing(!skip_pairing_check)
}

/// Log to stderr, filtered by RUST_LOG (defaults to info)
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
