//! Binary crate for the `nws-server` command-line tool.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Serving the registered tools over stdio
//! - Direct one-shot lookups for manual testing

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr: in serve mode, stdout is the protocol channel.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cmd = cli::Cli::parse();
    cmd.run().await
}
