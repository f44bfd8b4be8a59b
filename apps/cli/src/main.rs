//! devreach CLI — dependent-discovery and outreach-email generation.
//!
//! Streams run progress as newline-delimited JSON on stdout and keeps
//! logs on stderr.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli).await
}
