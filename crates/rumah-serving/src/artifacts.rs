//! Artifact loading.
//!
//! This module provides the [`ArtifactLoader`], which turns the files named by
//! an [`ArtifactConfig`] into [`LoadedArtifacts`]: the feature column set and
//! its category catalog, the fitted scaler and the fitted model. Loading runs
//! once at startup; the result is immutable and shared behind an `Arc` for
//! the life of the process.

use crate::compression::{ensure_decompressed, DecompressOutcome};
use crate::config::ArtifactConfig;
use crate::error::{ServingError, ServingResult};
use crate::inference::{build_model, ModelSpec, PriceModel};
use crate::scaler::{FeatureScaler, ScalerSpec};
use rumah_core::{CategoryCatalog, FeatureAssembler, FeatureColumnSet};
use serde::de::DeserializeOwned;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Artifacts ready for serving.
pub struct LoadedArtifacts {
    /// Column layout shared by the assembler, scaler and model.
    pub columns: Arc<FeatureColumnSet>,

    /// Assembler (and catalog) built for `columns`.
    pub assembler: FeatureAssembler,

    /// Fitted scaler.
    pub scaler: FeatureScaler,

    /// Fitted model.
    pub model: Arc<dyn PriceModel>,
}

impl std::fmt::Debug for LoadedArtifacts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadedArtifacts")
            .field("columns_len", &self.columns.len())
            .field("scaler_features", &self.scaler.n_features())
            .field("model", &self.model.name())
            .finish()
    }
}

impl LoadedArtifacts {
    /// Assemble artifacts from in-memory parts, checking that the scaler and
    /// the model were fit on the same column set.
    pub fn from_parts(
        columns: FeatureColumnSet,
        scaler: FeatureScaler,
        model: Arc<dyn PriceModel>,
    ) -> ServingResult<Self> {
        let width = columns.len();
        if scaler.n_features() != width {
            return Err(ServingError::config(format!(
                "feature column set has {} columns but the scaler expects {}",
                width,
                scaler.n_features()
            )));
        }
        if model.input_dim() != width {
            return Err(ServingError::config(format!(
                "feature column set has {} columns but the model expects {}",
                width,
                model.input_dim()
            )));
        }

        let columns = Arc::new(columns);
        let assembler = FeatureAssembler::new(Arc::clone(&columns))?;

        Ok(Self {
            columns,
            assembler,
            scaler,
            model,
        })
    }

    /// The category catalog offered to the user.
    pub fn catalog(&self) -> &CategoryCatalog {
        self.assembler.catalog()
    }
}

/// Loads prediction artifacts from disk.
///
/// # Example
///
/// ```no_run
/// use rumah_serving::artifacts::ArtifactLoader;
/// use rumah_serving::config::ArtifactConfig;
///
/// let config = ArtifactConfig::builder().artifact_dir("/srv/rumah").build();
/// let artifacts = ArtifactLoader::new(config).load()?;
/// println!("{} feature columns", artifacts.columns.len());
/// # Ok::<(), rumah_serving::ServingError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ArtifactLoader {
    config: ArtifactConfig,
}

impl ArtifactLoader {
    /// Create a new loader for the given configuration.
    pub fn new(config: ArtifactConfig) -> Self {
        Self { config }
    }

    /// Get the loader configuration.
    pub fn config(&self) -> &ArtifactConfig {
        &self.config
    }

    /// Decompress the model if needed, then read and cross-check every
    /// artifact.
    ///
    /// # Errors
    ///
    /// Any error here is configuration-level: a missing or malformed file,
    /// a failed decompression, or artifacts fit on different column sets.
    pub fn load(&self) -> ServingResult<LoadedArtifacts> {
        let dir = &self.config.artifact_dir;
        info!("Loading artifacts from: {:?}", dir);

        self.config
            .validate()
            .map_err(|e| ServingError::config(e.to_string()))?;

        self.prepare_model()?;

        let names: Vec<String> = read_json(&self.config.columns_path(), "feature columns")?;
        let columns = FeatureColumnSet::new(names)?;
        debug!("Loaded {} feature columns", columns.len());

        let scaler_spec: ScalerSpec = read_json(&self.config.scaler_path(), "scaler")?;
        let scaler = FeatureScaler::from_spec(&scaler_spec)?;
        debug!("Loaded scaler over {} columns", scaler.n_features());

        let model_spec: ModelSpec = read_json(&self.config.model_path(), "model")?;
        let model: Arc<dyn PriceModel> = Arc::from(build_model(&model_spec)?);
        debug!("Loaded {} model over {} columns", model.name(), model.input_dim());

        let artifacts = LoadedArtifacts::from_parts(columns, scaler, model)?;
        info!(
            "Artifacts loaded: {} columns, {} locations, {} property types, {} furnishing levels",
            artifacts.columns.len(),
            artifacts.catalog().len(rumah_core::CategoryField::Location),
            artifacts.catalog().len(rumah_core::CategoryField::PropertyType),
            artifacts.catalog().len(rumah_core::CategoryField::Furnishing),
        );
        Ok(artifacts)
    }

    /// Run the decompression setup step for the model artifact.
    pub fn prepare_model(&self) -> ServingResult<DecompressOutcome> {
        let Some(compressed) = self.config.compressed_model_path() else {
            return Ok(DecompressOutcome::SourceMissing);
        };
        let outcome = ensure_decompressed(&compressed, &self.config.model_path())?;
        if outcome == DecompressOutcome::SourceMissing && !self.config.model_path().exists() {
            warn!(
                "Neither {:?} nor {:?} exists",
                self.config.model_path(),
                compressed
            );
        }
        Ok(outcome)
    }
}

fn read_json<T: DeserializeOwned>(path: &Path, what: &str) -> ServingResult<T> {
    let text = std::fs::read_to_string(path).map_err(|e| {
        ServingError::artifact_load(format!("Failed to read {} at {:?}: {}", what, path, e))
    })?;
    serde_json::from_str(&text).map_err(|e| {
        ServingError::artifact_load(format!("Failed to parse {} at {:?}: {}", what, path, e))
    })
}
