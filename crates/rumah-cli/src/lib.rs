//! Rumah CLI Library
//!
//! Command-line surface for the Kuala Lumpur house price predictor:
//!
//! - **Predict**: one prediction from flags
//! - **Form**: the same form, answered interactively
//! - **Catalog**: the selectable locations, property types and furnishing levels
//! - **Decompress**: expand a compressed model artifact ahead of time
//!
//! # Example
//!
//! ```bash
//! # Predict a price, adjusted for 3% yearly inflation
//! rumah predict -d ./artifacts -l Ampang -t Condominium -f "Fully Furnished" \
//!     --rooms 3 --size 1200 --adjust-for-inflation
//!
//! # Answer the form on the terminal
//! RUMAH_ARTIFACT_DIR=./artifacts rumah form
//!
//! # List selectable locations
//! rumah catalog -d ./artifacts --field location
//! ```

pub mod commands;

use clap::{Parser, Subcommand};

pub use commands::{
    ArtifactArgs, CatalogCommand, DecompressCommand, FormCommand, PredictCommand,
};

/// Rumah - house price prediction for Kuala Lumpur
///
/// Predicts a property price from its location, type, furnishing, room
/// counts and size, optionally adjusted for inflation since the training
/// data was collected.
#[derive(Parser, Debug)]
#[command(name = "rumah")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Predict the price of one property
    Predict(PredictCommand),

    /// Fill in the prediction form interactively
    Form(FormCommand),

    /// List selectable category values
    Catalog(CatalogCommand),

    /// Decompress the model artifact
    Decompress(DecompressCommand),
}

impl Commands {
    /// Run the selected command.
    pub fn run(&self) -> CliResult<()> {
        match self {
            Commands::Predict(cmd) => cmd.run(),
            Commands::Form(cmd) => cmd.run(),
            Commands::Catalog(cmd) => cmd.run(),
            Commands::Decompress(cmd) => cmd.run(),
        }
    }
}

/// Result type alias for CLI operations
pub type CliResult<T> = anyhow::Result<T>;
