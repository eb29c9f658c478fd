//! Decompress Command Implementation

use super::ArtifactArgs;
use anyhow::{bail, Context, Result};
use clap::Args;
use rumah_serving::{ArtifactLoader, DecompressOutcome};
use std::io::Write;
use tracing::info;

/// Decompress the model artifact without loading it
///
/// Does nothing when the decompressed model already exists.
#[derive(Args, Debug, Clone)]
pub struct DecompressCommand {
    /// Artifact location
    #[command(flatten)]
    pub artifacts: ArtifactArgs,
}

impl DecompressCommand {
    /// Execute the decompress command
    pub fn run(&self) -> Result<()> {
        let stdout = std::io::stdout();
        self.run_with(&mut stdout.lock()).map(|_| ())
    }

    /// Execute, reporting what happened to `out`.
    pub fn run_with<W: Write>(&self, out: &mut W) -> Result<DecompressOutcome> {
        let config = self.artifacts.to_config()?;
        if config.compressed_model_file.is_none() {
            bail!("No compressed model file configured");
        }
        let model_path = config.model_path();
        let loader = ArtifactLoader::new(config);
        let outcome = loader
            .prepare_model()
            .context("Failed to decompress the model")?;

        info!("Decompression outcome: {:?}", outcome);
        match &outcome {
            DecompressOutcome::AlreadyPresent => {
                writeln!(out, "{} already present", model_path.display())?
            }
            DecompressOutcome::Decompressed { bytes } => {
                writeln!(out, "Wrote {} bytes to {}", bytes, model_path.display())?
            }
            DecompressOutcome::SourceMissing => {
                bail!("Compressed model not found next to {}", model_path.display())
            }
        }
        Ok(outcome)
    }
}
