//! Show command: inspect an existing identity file without creating one

use eyre::WrapErr;

pub fn run(store: &relay_id::KeyStore, pem: bool) -> eyre::Result<()> {
    let identity = store
        .load_identity()
        .wrap_err_with(|| format!("cannot read identity from {}", store.path().display()))?;

    println!("ID52:    {}", identity.public_key().id52());
    println!("Peer ID: {}", identity.public_key().peer_id());

    if pem {
        println!();
        print!("{}", identity.public_key_text());
    }

    Ok(())
}
