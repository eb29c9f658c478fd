//! Scale-then-predict over an assembled feature vector.

use crate::error::{ServingError, ServingResult};
use crate::inference::PriceModel;
use crate::scaler::FeatureScaler;
use ndarray::ArrayView1;
use rumah_core::{FeatureColumnSet, FeatureVector};
use std::sync::Arc;
use tracing::debug;

/// Applies the fitted scaler and model to one feature vector.
#[derive(Clone)]
pub struct PricePredictor {
    columns: Arc<FeatureColumnSet>,
    scaler: FeatureScaler,
    model: Arc<dyn PriceModel>,
}

impl std::fmt::Debug for PricePredictor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PricePredictor")
            .field("columns", &self.columns.len())
            .field("model", &self.model.name())
            .finish()
    }
}

impl PricePredictor {
    /// Create a predictor. The scaler and model must both be fit on `columns`.
    pub fn new(
        columns: Arc<FeatureColumnSet>,
        scaler: FeatureScaler,
        model: Arc<dyn PriceModel>,
    ) -> ServingResult<Self> {
        if scaler.n_features() != columns.len() || model.input_dim() != columns.len() {
            return Err(ServingError::config(format!(
                "column set has {} columns, scaler {}, model {}",
                columns.len(),
                scaler.n_features(),
                model.input_dim()
            )));
        }
        Ok(Self {
            columns,
            scaler,
            model,
        })
    }

    /// The column set this predictor expects.
    pub fn columns(&self) -> &Arc<FeatureColumnSet> {
        &self.columns
    }

    /// Predict the price for `vector`.
    ///
    /// A vector laid out over a different column set is a configuration
    /// error, not a user error.
    pub fn predict(&self, vector: &FeatureVector) -> ServingResult<f64> {
        if !vector.is_aligned_with(&self.columns) {
            return Err(ServingError::config(
                "feature vector was assembled over a different column set",
            ));
        }

        let row = ArrayView1::from(vector.values());
        let scaled = self.scaler.transform(row)?;
        let price = self.model.predict(scaled.view())?;
        debug!("{} model predicted {:.2}", self.model.name(), price);
        Ok(price)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inference::{build_model, LinearSpec, ModelSpec};
    use crate::scaler::ScalerSpec;

    fn columns() -> Arc<FeatureColumnSet> {
        Arc::new(
            FeatureColumnSet::new([
                "Rooms",
                "Size",
                "Location_Ampang",
                "Property Type_Condominium",
                "Furnishing_Unfurnished",
            ])
            .unwrap(),
        )
    }

    fn predictor(width: usize) -> PricePredictor {
        let scaler = FeatureScaler::from_spec(&ScalerSpec::Standard {
            mean: vec![0.0, 1000.0, 0.0, 0.0, 0.0],
            scale: vec![1.0, 100.0, 1.0, 1.0, 1.0],
        })
        .unwrap();
        let model = build_model(&ModelSpec::Linear(LinearSpec {
            coefficients: vec![10_000.0; width],
            intercept: 400_000.0,
        }))
        .unwrap();
        PricePredictor::new(columns(), scaler, Arc::from(model)).unwrap()
    }

    #[test]
    fn test_scales_before_predicting() {
        let predictor = predictor(5);
        let vector =
            FeatureVector::from_values(columns(), vec![3.0, 1200.0, 1.0, 1.0, 0.0]).unwrap();

        // scaled row is [3, 2, 1, 1, 0]
        let price = predictor.predict(&vector).unwrap();
        assert!((price - 470_000.0).abs() < 1e-6);
    }

    #[test]
    fn test_vector_over_shared_columns() {
        let predictor = predictor(5);
        let shared = Arc::clone(predictor.columns());
        let vector = FeatureVector::from_values(shared, vec![3.0, 1200.0, 1.0, 1.0, 0.0]).unwrap();
        assert!(vector.is_aligned_with(predictor.columns()));

        let price = predictor.predict(&vector).unwrap();
        assert!((price - 470_000.0).abs() < 1e-6);
    }

    #[test]
    fn test_mismatched_model_is_rejected() {
        let scaler = FeatureScaler::from_spec(&ScalerSpec::Standard {
            mean: vec![0.0; 5],
            scale: vec![1.0; 5],
        })
        .unwrap();
        let model = build_model(&ModelSpec::Linear(LinearSpec {
            coefficients: vec![1.0; 4],
            intercept: 0.0,
        }))
        .unwrap();
        let err = PricePredictor::new(columns(), scaler, Arc::from(model)).unwrap_err();
        assert!(err.is_config_error());
    }

    #[test]
    fn test_foreign_vector_is_rejected() {
        let predictor = predictor(5);
        let other = Arc::new(FeatureColumnSet::new(["A", "B", "C", "D", "E"]).unwrap());
        let vector = FeatureVector::from_values(other, vec![0.0; 5]).unwrap();
        assert!(predictor.predict(&vector).unwrap_err().is_config_error());
    }
}
