//! Twenty48 terminal driver.

use std::io;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use twenty48_core::Engine;

mod command;
mod config;
mod play;
mod store;

use config::Config;
use store::FileStore;

fn main() -> anyhow::Result<()> {
    // Initialize tracing on stderr so the board owns stdout
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let config = Config::from_env();
    info!("Using data directory {}", config.data_dir.display());

    let mut engine = Engine::new(FileStore::new(config.data_dir));

    let stdin = io::stdin();
    let stdout = io::stdout();
    play::run(&mut engine, stdin.lock(), stdout.lock())
}
