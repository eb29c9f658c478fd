//! Rumah CLI - predict Kuala Lumpur house prices from the command line.
//!
//! Logs go to stderr so that the price lines on stdout stay clean.

use anyhow::Result;
use clap::Parser;
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use rumah_cli::Cli;

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive("rumah=info".parse()?))
        .init();

    let cli = Cli::parse();
    debug!("Rumah CLI starting: {:?}", cli.command);

    cli.command.run()
}
