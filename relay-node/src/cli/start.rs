//! Start command: obtain the identity the relay will run under

use colored::Colorize;
use eyre::WrapErr;

/// Load or create the node identity and report it.
///
/// Any failure aborts startup: a relay must not come up under an identity
/// the operator did not expect.
pub fn run(store: &relay_id::KeyStore) -> eyre::Result<()> {
    let identity = store.obtain_identity().wrap_err_with(|| {
        format!(
            "cannot obtain node identity from {}",
            store.path().display()
        )
    })?;

    let (private_key, public_key) = identity.into_keys();
    tracing::debug!(?private_key, "Identity ready for the network layer");

    println!("🔑 Identity file: {}", store.path().display());
    println!("   ID52:    {}", public_key.id52());
    println!("   Peer ID: {}", public_key.peer_id().green());

    Ok(())
}
