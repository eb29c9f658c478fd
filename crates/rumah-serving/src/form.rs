//! The prediction form: one submit runs the whole request/response flow.
//!
//! Validate the raw input, assemble the one-hot vector, scale and predict,
//! then optionally adjust for inflation. The form holds only immutable,
//! `Arc`-shared state and may be used from several threads at once.

use crate::artifacts::{ArtifactLoader, LoadedArtifacts};
use crate::config::ArtifactConfig;
use crate::error::ServingResult;
use crate::predictor::PricePredictor;
use chrono::NaiveDate;
use rumah_core::{
    CategoryCatalog, Clock, InflationAdjuster, InflationAdjustment, InflationRequest,
    InputLimits, RawInput,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

/// Everything the user submits at once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormInput {
    /// Property details.
    #[serde(flatten)]
    pub raw: RawInput,
    /// Inflation adjustment settings.
    #[serde(default)]
    pub inflation: InflationRequest,
}

/// Result of one submit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionOutcome {
    /// Model prediction in RM.
    pub price: f64,
    /// Present when an adjustment was requested.
    pub adjustment: Option<InflationAdjustment>,
}

impl PredictionOutcome {
    /// The price to show last: adjusted if available.
    pub fn final_price(&self) -> f64 {
        self.adjustment
            .map(|adj| adj.adjusted_price)
            .unwrap_or(self.price)
    }
}

/// Form handler bound to a set of loaded artifacts.
#[derive(Debug, Clone)]
pub struct PredictionForm {
    artifacts: Arc<LoadedArtifacts>,
    predictor: PricePredictor,
    adjuster: InflationAdjuster,
    limits: InputLimits,
}

impl PredictionForm {
    /// Create a form over already-loaded artifacts.
    pub fn new(
        artifacts: Arc<LoadedArtifacts>,
        limits: InputLimits,
        reference_date: NaiveDate,
        clock: Arc<dyn Clock>,
    ) -> ServingResult<Self> {
        let predictor = PricePredictor::new(
            Arc::clone(&artifacts.columns),
            artifacts.scaler.clone(),
            Arc::clone(&artifacts.model),
        )?;
        let adjuster = InflationAdjuster::new(reference_date, clock, limits.inflation_rate);
        Ok(Self {
            artifacts,
            predictor,
            adjuster,
            limits,
        })
    }

    /// Load the artifacts named by `config` and build a form over them.
    pub fn load(config: &ArtifactConfig, clock: Arc<dyn Clock>) -> ServingResult<Self> {
        let artifacts = ArtifactLoader::new(config.clone()).load()?;
        Self::new(
            Arc::new(artifacts),
            config.limits,
            config.reference_date,
            clock,
        )
    }

    /// Selectable values per categorical field.
    pub fn catalog(&self) -> &CategoryCatalog {
        self.artifacts.catalog()
    }

    /// Field ranges and defaults.
    pub fn limits(&self) -> &InputLimits {
        &self.limits
    }

    /// Dataset snapshot date.
    pub fn reference_date(&self) -> NaiveDate {
        self.adjuster.reference_date()
    }

    /// The shared artifacts.
    pub fn artifacts(&self) -> &Arc<LoadedArtifacts> {
        &self.artifacts
    }

    /// Run one prediction.
    ///
    /// Out-of-range fields and unknown category values come back as client
    /// errors; artifact problems as configuration errors; a failing model as
    /// a server error.
    pub fn submit(&self, input: &FormInput) -> ServingResult<PredictionOutcome> {
        self.limits.validate(&input.raw)?;

        let vector = self.artifacts.assembler.assemble(&input.raw)?;
        debug!(
            "Assembled {} columns for {} / {} / {}",
            vector.len(),
            input.raw.location,
            input.raw.property_type,
            input.raw.furnishing
        );

        let price = self.predictor.predict(&vector)?;
        let adjustment = self.adjuster.adjust(price, &input.inflation)?;

        match &adjustment {
            Some(adj) => info!(
                "Predicted RM {:.2}, adjusted to RM {:.2} at {}% over {} years",
                price, adj.adjusted_price, adj.rate_percent, adj.years
            ),
            None => info!("Predicted RM {:.2}", price),
        }

        Ok(PredictionOutcome { price, adjustment })
    }
}
