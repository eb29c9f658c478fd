//! Pre-fit per-column scaling applied before inference.

use crate::error::{ServingError, ServingResult};
use ndarray::{Array1, ArrayView1};
use serde::{Deserialize, Serialize};

/// Scaler artifact as persisted by the training process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScalerSpec {
    /// `(x - mean) / scale`
    Standard {
        /// Per-column mean.
        mean: Vec<f64>,
        /// Per-column standard deviation.
        scale: Vec<f64>,
    },
    /// `x * scale + min`
    MinMax {
        /// Per-column offset.
        min: Vec<f64>,
        /// Per-column factor.
        scale: Vec<f64>,
    },
}

/// A fitted, immutable linear transform over feature columns.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureScaler {
    kind: ScalerKind,
    offset: Array1<f64>,
    factor: Array1<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScalerKind {
    Standard,
    MinMax,
}

impl FeatureScaler {
    /// Build a scaler from its persisted form.
    ///
    /// Zero entries of a standard scaler's `scale` are treated as 1, the way
    /// constant columns are handled at fit time.
    pub fn from_spec(spec: &ScalerSpec) -> ServingResult<Self> {
        let (kind, offset, factor) = match spec {
            ScalerSpec::Standard { mean, scale } => {
                let scale: Vec<f64> = scale
                    .iter()
                    .map(|&s| if s == 0.0 { 1.0 } else { s })
                    .collect();
                (ScalerKind::Standard, mean, scale)
            }
            ScalerSpec::MinMax { min, scale } => (ScalerKind::MinMax, min, scale.clone()),
        };

        if offset.len() != factor.len() {
            return Err(ServingError::config(format!(
                "scaler offset has {} entries but scale has {}",
                offset.len(),
                factor.len()
            )));
        }
        if offset.is_empty() {
            return Err(ServingError::config("scaler has no columns"));
        }
        if offset.iter().chain(factor.iter()).any(|v| !v.is_finite()) {
            return Err(ServingError::config("scaler contains non-finite values"));
        }

        Ok(Self {
            kind,
            offset: Array1::from_vec(offset.clone()),
            factor: Array1::from_vec(factor),
        })
    }

    /// Number of columns the scaler was fit on.
    pub fn n_features(&self) -> usize {
        self.offset.len()
    }

    /// Scale one row.
    pub fn transform(&self, row: ArrayView1<'_, f64>) -> ServingResult<Array1<f64>> {
        if row.len() != self.n_features() {
            return Err(ServingError::config(format!(
                "scaler expects {} columns, got {}",
                self.n_features(),
                row.len()
            )));
        }
        let scaled = match self.kind {
            ScalerKind::Standard => (&row - &self.offset) / &self.factor,
            ScalerKind::MinMax => &row * &self.factor + &self.offset,
        };
        Ok(scaled)
    }
}
