//! Coupons CLI - database maintenance and demo data.

mod commands;
mod fixture;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use commands::CommandLine;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,coupons=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = CommandLine::parse();
    cli.run().await
}
