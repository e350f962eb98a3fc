//! Binary crate for the `weather-server` HTTP service.
//!
//! This crate focuses on:
//! - Parsing CLI arguments and loading configuration
//! - Interactive credential setup
//! - Serving the weather record API over HTTP

use clap::Parser;

mod cli;
mod logging;
mod routes;
mod server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init();

    let cmd = cli::Cli::parse();
    cmd.run().await
}
