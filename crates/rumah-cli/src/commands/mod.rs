//! CLI Command Implementations
//!
//! - [`predict`]: one prediction from command-line flags
//! - [`form`]: the same form, answered interactively
//! - [`catalog`]: list selectable category values
//! - [`decompress`]: run the model decompression step alone

mod catalog;
mod decompress;
mod form;
mod predict;

pub use catalog::CatalogCommand;
pub use decompress::DecompressCommand;
pub use form::{run_interactive, FormCommand};
pub use predict::PredictCommand;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Args;
use rumah_core::{Clock, FixedClock, SystemClock};
use rumah_serving::ArtifactConfig;
use std::path::PathBuf;
use std::sync::Arc;

/// Where to find the artifacts. Flags override the config file, which
/// overrides the built-in defaults.
#[derive(Args, Debug, Clone, Default)]
pub struct ArtifactArgs {
    /// JSON configuration file
    #[arg(long, short = 'c', env = "RUMAH_CONFIG")]
    pub config: Option<PathBuf>,

    /// Directory containing the artifacts
    #[arg(long, short = 'd', env = "RUMAH_ARTIFACT_DIR")]
    pub artifact_dir: Option<PathBuf>,

    /// Feature column list file name
    #[arg(long, env = "RUMAH_COLUMNS_FILE")]
    pub columns_file: Option<String>,

    /// Scaler file name
    #[arg(long, env = "RUMAH_SCALER_FILE")]
    pub scaler_file: Option<String>,

    /// Model file name
    #[arg(long, env = "RUMAH_MODEL_FILE")]
    pub model_file: Option<String>,

    /// Compressed model file name
    #[arg(long, env = "RUMAH_COMPRESSED_MODEL_FILE")]
    pub compressed_model_file: Option<String>,

    /// Do not look for a compressed model
    #[arg(long, conflicts_with = "compressed_model_file")]
    pub no_decompress: bool,

    /// Date to treat as today for inflation (YYYY-MM-DD)
    #[arg(long, env = "RUMAH_TODAY")]
    pub today: Option<NaiveDate>,
}

impl ArtifactArgs {
    /// Resolve the artifact configuration.
    pub fn to_config(&self) -> Result<ArtifactConfig> {
        let mut config = match &self.config {
            Some(path) => ArtifactConfig::from_json_file(path)
                .with_context(|| format!("Failed to load config {:?}", path))?,
            None => ArtifactConfig::default(),
        };

        if let Some(dir) = &self.artifact_dir {
            config.artifact_dir = dir.clone();
        }
        if let Some(name) = &self.columns_file {
            config.columns_file = name.clone();
        }
        if let Some(name) = &self.scaler_file {
            config.scaler_file = name.clone();
        }
        if let Some(name) = &self.model_file {
            config.model_file = name.clone();
        }
        if let Some(name) = &self.compressed_model_file {
            config.compressed_model_file = Some(name.clone());
        }
        if self.no_decompress {
            config.compressed_model_file = None;
        }

        Ok(config)
    }

    /// The clock inflation is measured with.
    pub fn clock(&self) -> Arc<dyn Clock> {
        match self.today {
            Some(date) => Arc::new(FixedClock(date)),
            None => Arc::new(SystemClock),
        }
    }
}
