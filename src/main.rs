//! # Enveloping Relay
//!
//! A relay service that executes user-signed meta-transactions paid for in
//! ERC20 tokens instead of native gas.

use clap::Parser;
use enveloping_relay::cli::{Args, run};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[tokio::main]
async fn main() -> eyre::Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .init();

    let args = Args::parse();
    let config = args.into_config()?;
    run(config).await
}
