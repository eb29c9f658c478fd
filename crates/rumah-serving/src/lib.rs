//! Artifact loading and prediction serving for Kuala Lumpur house prices.
//!
//! This crate turns the files produced by the offline training process into a
//! ready-to-use [`PredictionForm`], and renders what it returns.
//!
//! # Overview
//!
//! - **ArtifactConfig**: where the artifacts live and how to read them
//! - **ensure_decompressed**: one-time, idempotent model decompression
//! - **ArtifactLoader**: reads and cross-checks columns, scaler and model
//! - **PricePredictor**: scale-then-predict over a feature vector
//! - **PredictionForm**: the whole submit flow, including inflation
//! - **render**: currency formatting and the result lines
//!
//! # Flow
//!
//! ```text
//! ArtifactConfig ──▶ ensure_decompressed ──▶ ArtifactLoader ──▶ LoadedArtifacts (Arc)
//!                                                                     │
//!   FormInput ──▶ PredictionForm::submit ──▶ FeatureAssembler ──▶ PricePredictor
//!                                                                     │
//!                        render_outcome ◀── InflationAdjuster ◀───────┘
//! ```
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use rumah_core::{InflationRequest, RawInput, SizeUnit, SystemClock};
//! use rumah_serving::{render_outcome, ArtifactConfig, FormInput, PredictionForm};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ArtifactConfig::builder().artifact_dir("/srv/rumah").build();
//! let form = PredictionForm::load(&config, Arc::new(SystemClock))?;
//!
//! let outcome = form.submit(&FormInput {
//!     raw: RawInput {
//!         location: "Ampang".into(),
//!         property_type: "Condominium".into(),
//!         furnishing: "Fully Furnished".into(),
//!         rooms: 3,
//!         bathrooms: 2,
//!         car_parks: 1,
//!         size: 1200.0,
//!         size_unit: SizeUnit::SquareFeet,
//!     },
//!     inflation: InflationRequest::at_rate(3.0),
//! })?;
//!
//! for line in render_outcome(&outcome) {
//!     println!("{}", line);
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod artifacts;
pub mod compression;
pub mod config;
pub mod error;
pub mod form;
pub mod inference;
pub mod predictor;
pub mod render;
pub mod scaler;

// Re-export main types at crate root for convenience
pub use artifacts::{ArtifactLoader, LoadedArtifacts};
pub use compression::{decompress, ensure_decompressed, CompressionType, DecompressOutcome};
pub use config::{ArtifactConfig, ArtifactConfigBuilder, ConfigError};
pub use error::{ServingError, ServingResult};
pub use form::{FormInput, PredictionForm, PredictionOutcome};
pub use inference::{build_model, ModelSpec, PriceModel};
pub use predictor::PricePredictor;
pub use render::{dataset_note, format_currency, render_outcome, CURRENCY_LABEL};
pub use scaler::{FeatureScaler, ScalerSpec};
