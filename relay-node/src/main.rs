//! relay-node: relay entry point
//!
//! Obtains the node's persistent identity before anything else starts. The
//! network listener and circuit relay service take the key pair from here.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod cli;

#[derive(Parser)]
#[command(name = "relay-node")]
#[command(about = "P2P relay node with a persistent identity")]
struct Cli {
    /// Identity file (created on first start)
    #[arg(long, env = "RELAY_KEY_FILE", default_value = relay_id::DEFAULT_KEY_FILE, global = true)]
    key_file: PathBuf,

    /// Trust the stored public key without deriving it from the private key
    #[arg(long, env = "RELAY_SKIP_PAIRING_CHECK", global = true)]
    skip_pairing_check: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load the node identity, creating it on first start
    Start,
    /// Print the identity of an existing identity file
    Show {
        /// Also print the armored public key
        #[arg(long)]
        pem: bool,
    },
}

fn main() -> eyre::Result<()> {
    let cli = Cli::parse();
    cli::init_tracing();

    let store = cli::key_store(cli.key_file, cli.skip_pairing_check);

    match cli.command {
        Commands::Start => cli::start::run(&store),
        Commands::Show { pem } => cli::show::run(&store, pem),
    }
}
