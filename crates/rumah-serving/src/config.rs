//! Artifact configuration.
//!
//! Names the files the offline training process produced and the dataset
//! snapshot date inflation is measured from.

use chrono::NaiveDate;
use rumah_core::{InputLimits, DATASET_SNAPSHOT_DATE};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default file name of the ordered feature column list.
pub const DEFAULT_COLUMNS_FILE: &str = "feature_columns.json";
/// Default file name of the fitted scaler.
pub const DEFAULT_SCALER_FILE: &str = "scaler.json";
/// Default file name of the fitted model.
pub const DEFAULT_MODEL_FILE: &str = "model.json";
/// Default file name of the compressed model.
pub const DEFAULT_COMPRESSED_MODEL_FILE: &str = "model.json.gz";

/// Where to find the prediction artifacts and how to interpret them.
///
/// # Example
///
/// ```
/// use rumah_serving::config::ArtifactConfig;
///
/// let config = ArtifactConfig::builder()
///     .artifact_dir("/srv/rumah")
///     .model_file("rf_model.json")
///     .build();
/// assert_eq!(config.model_path().to_str(), Some("/srv/rumah/rf_model.json"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtifactConfig {
    /// Directory holding every artifact file.
    pub artifact_dir: PathBuf,

    /// Feature column list, relative to `artifact_dir`.
    pub columns_file: String,

    /// Fitted scaler, relative to `artifact_dir`.
    pub scaler_file: String,

    /// Fitted model, relative to `artifact_dir`.
    pub model_file: String,

    /// Compressed copy of the model, decompressed into `model_file` when the
    /// latter is missing. `None` disables the setup step.
    pub compressed_model_file: Option<String>,

    /// Snapshot date of the training dataset.
    pub reference_date: NaiveDate,

    /// Accepted ranges and defaults of the form fields.
    pub limits: InputLimits,
}

impl Default for ArtifactConfig {
    fn default() -> Self {
        Self {
            artifact_dir: PathBuf::from("./artifacts"),
            columns_file: DEFAULT_COLUMNS_FILE.to_string(),
            scaler_file: DEFAULT_SCALER_FILE.to_string(),
            model_file: DEFAULT_MODEL_FILE.to_string(),
            compressed_model_file: Some(DEFAULT_COMPRESSED_MODEL_FILE.to_string()),
            reference_date: DATASET_SNAPSHOT_DATE,
            limits: InputLimits::default(),
        }
    }
}

impl ArtifactConfig {
    /// Create a new configuration builder.
    pub fn builder() -> ArtifactConfigBuilder {
        ArtifactConfigBuilder::default()
    }

    /// Load a configuration from a JSON file. Missing keys take defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::InvalidConfigFile(format!("{}: {}", path.display(), e)))?;
        serde_json::from_str(&text)
            .map_err(|e| ConfigError::InvalidConfigFile(format!("{}: {}", path.display(), e)))
    }

    /// Path of the feature column list.
    pub fn columns_path(&self) -> PathBuf {
        self.artifact_dir.join(&self.columns_file)
    }

    /// Path of the scaler.
    pub fn scaler_path(&self) -> PathBuf {
        self.artifact_dir.join(&self.scaler_file)
    }

    /// Path of the model.
    pub fn model_path(&self) -> PathBuf {
        self.artifact_dir.join(&self.model_file)
    }

    /// Path of the compressed model, if configured.
    pub fn compressed_model_path(&self) -> Option<PathBuf> {
        self.compressed_model_file
            .as_ref()
            .map(|name| self.artifact_dir.join(name))
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (key, name) in [
            ("columns_file", &self.columns_file),
            ("scaler_file", &self.scaler_file),
            ("model_file", &self.model_file),
        ] {
            if name.trim().is_empty() {
                return Err(ConfigError::EmptyFileName(key));
            }
        }
        if self.compressed_model_file.as_deref() == Some(self.model_file.as_str()) {
            return Err(ConfigError::CompressedSameAsModel);
        }
        if !self.artifact_dir.is_dir() {
            return Err(ConfigError::ArtifactDirNotFound(self.artifact_dir.clone()));
        }
        let rate = &self.limits.inflation_rate;
        if !(rate.min <= rate.default && rate.default <= rate.max) {
            return Err(ConfigError::InvalidLimits("inflation_rate"));
        }
        Ok(())
    }
}

/// Builder for [`ArtifactConfig`].
#[derive(Debug, Default)]
pub struct ArtifactConfigBuilder {
    artifact_dir: Option<PathBuf>,
    columns_file: Option<String>,
    scaler_file: Option<String>,
    model_file: Option<String>,
    compressed_model_file: Option<Option<String>>,
    reference_date: Option<NaiveDate>,
    limits: Option<InputLimits>,
}

impl ArtifactConfigBuilder {
    /// Set the artifact directory.
    pub fn artifact_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.artifact_dir = Some(dir.into());
        self
    }

    /// Set the feature column file name.
    pub fn columns_file(mut self, name: impl Into<String>) -> Self {
        self.columns_file = Some(name.into());
        self
    }

    /// Set the scaler file name.
    pub fn scaler_file(mut self, name: impl Into<String>) -> Self {
        self.scaler_file = Some(name.into());
        self
    }

    /// Set the model file name.
    pub fn model_file(mut self, name: impl Into<String>) -> Self {
        self.model_file = Some(name.into());
        self
    }

    /// Set the compressed model file name, or `None` to skip decompression.
    pub fn compressed_model_file(mut self, name: Option<String>) -> Self {
        self.compressed_model_file = Some(name);
        self
    }

    /// Set the dataset snapshot date.
    pub fn reference_date(mut self, date: NaiveDate) -> Self {
        self.reference_date = Some(date);
        self
    }

    /// Set the input limits.
    pub fn limits(mut self, limits: InputLimits) -> Self {
        self.limits = Some(limits);
        self
    }

    /// Build the configuration.
    pub fn build(self) -> ArtifactConfig {
        let default = ArtifactConfig::default();
        ArtifactConfig {
            artifact_dir: self.artifact_dir.unwrap_or(default.artifact_dir),
            columns_file: self.columns_file.unwrap_or(default.columns_file),
            scaler_file: self.scaler_file.unwrap_or(default.scaler_file),
            model_file: self.model_file.unwrap_or(default.model_file),
            compressed_model_file: self
                .compressed_model_file
                .unwrap_or(default.compressed_model_file),
            reference_date: self.reference_date.unwrap_or(default.reference_date),
            limits: self.limits.unwrap_or(default.limits),
        }
    }
}

/// Configuration errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    /// Artifact directory not found
    #[error("Artifact directory not found: {0}")]
    ArtifactDirNotFound(PathBuf),

    /// A file name setting is empty
    #[error("File name setting {0} is empty")]
    EmptyFileName(&'static str),

    /// Compressed model would overwrite itself
    #[error("Compressed model file must differ from the model file")]
    CompressedSameAsModel,

    /// Input limits are inconsistent
    #[error("Invalid limits for {0}: default must lie within min..=max")]
    InvalidLimits(&'static str),

    /// Invalid configuration file
    #[error("Invalid configuration file: {0}")]
    InvalidConfigFile(String),
}
