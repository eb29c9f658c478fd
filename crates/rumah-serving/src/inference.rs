//! Regression models for price inference.
//!
//! The model artifact is produced offline. Serving reconstructs it from a
//! small JSON description and only ever evaluates it; nothing here fits or
//! updates a model.
//!
//! Supported families:
//! - linear regression (`coefficients`, `intercept`)
//! - random forest regression, stored as flat node arrays per tree. A node is
//!   a leaf when `children_left` is `-1`; otherwise the walk goes left when
//!   `x[feature] <= threshold`. The forest predicts the mean over its trees.

use crate::error::{ServingError, ServingResult};
use ndarray::{Array1, ArrayView1};
use serde::{Deserialize, Serialize};

/// Leaf marker in the child arrays.
pub const TREE_LEAF: i64 = -1;

/// Model specification stored in the model artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ModelSpec {
    /// Ordinary linear regression.
    Linear(LinearSpec),
    /// Averaged ensemble of regression trees.
    RandomForest(ForestSpec),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearSpec {
    pub coefficients: Vec<f64>,
    #[serde(default)]
    pub intercept: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForestSpec {
    pub n_features: usize,
    pub trees: Vec<TreeSpec>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeSpec {
    pub children_left: Vec<i64>,
    pub children_right: Vec<i64>,
    pub feature: Vec<i64>,
    pub threshold: Vec<f64>,
    pub value: Vec<f64>,
}

impl ModelSpec {
    /// Number of input columns the model expects.
    pub fn input_dim(&self) -> usize {
        match self {
            ModelSpec::Linear(s) => s.coefficients.len(),
            ModelSpec::RandomForest(s) => s.n_features,
        }
    }
}

/// Inference model interface (single-row inference).
pub trait PriceModel: Send + Sync {
    /// Number of input columns.
    fn input_dim(&self) -> usize;

    /// Predict a price from one scaled row.
    fn predict(&self, row: ArrayView1<'_, f64>) -> ServingResult<f64>;

    /// Short model family name for logs.
    fn name(&self) -> &'static str;
}

/// Build a model from its specification, validating its structure.
pub fn build_model(spec: &ModelSpec) -> ServingResult<Box<dyn PriceModel>> {
    match spec {
        ModelSpec::Linear(s) => Ok(Box::new(LinearModel::from_spec(s)?)),
        ModelSpec::RandomForest(s) => Ok(Box::new(ForestModel::from_spec(s)?)),
    }
}

fn check_width(expected: usize, row: &ArrayView1<'_, f64>) -> ServingResult<()> {
    if row.len() != expected {
        return Err(ServingError::config(format!(
            "model expects {} columns, got {}",
            expected,
            row.len()
        )));
    }
    Ok(())
}

fn finite(value: f64, model: &str) -> ServingResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ServingError::prediction(format!(
            "{model} produced a non-finite value"
        )))
    }
}

#[derive(Debug)]
struct LinearModel {
    coefficients: Array1<f64>,
    intercept: f64,
}

impl LinearModel {
    fn from_spec(spec: &LinearSpec) -> ServingResult<Self> {
        if spec.coefficients.is_empty() {
            return Err(ServingError::config("linear model has no coefficients"));
        }
        Ok(Self {
            coefficients: Array1::from_vec(spec.coefficients.clone()),
            intercept: spec.intercept,
        })
    }
}

impl PriceModel for LinearModel {
    fn input_dim(&self) -> usize {
        self.coefficients.len()
    }

    fn predict(&self, row: ArrayView1<'_, f64>) -> ServingResult<f64> {
        check_width(self.input_dim(), &row)?;
        finite(row.dot(&self.coefficients) + self.intercept, self.name())
    }

    fn name(&self) -> &'static str {
        "linear"
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Node {
    Leaf(f64),
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

#[derive(Debug)]
struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    /// Validate and convert a flat tree.
    ///
    /// Children must come after their parent, which bounds every walk by the
    /// node count.
    fn from_spec(spec: &TreeSpec, n_features: usize, idx: usize) -> ServingResult<Self> {
        let n = spec.children_left.len();
        if n == 0 {
            return Err(ServingError::config(format!("tree {idx} has no nodes")));
        }
        if [
            spec.children_right.len(),
            spec.feature.len(),
            spec.threshold.len(),
            spec.value.len(),
        ]
        .iter()
        .any(|&len| len != n)
        {
            return Err(ServingError::config(format!(
                "tree {idx} node arrays have different lengths"
            )));
        }

        let mut nodes = Vec::with_capacity(n);
        for i in 0..n {
            let (left, right) = (spec.children_left[i], spec.children_right[i]);
            if left == TREE_LEAF {
                if right != TREE_LEAF {
                    return Err(ServingError::config(format!(
                        "tree {idx} node {i} has only one child"
                    )));
                }
                nodes.push(Node::Leaf(spec.value[i]));
                continue;
            }

            let child = |c: i64| -> ServingResult<usize> {
                usize::try_from(c)
                    .ok()
                    .filter(|&c| c > i && c < n)
                    .ok_or_else(|| {
                        ServingError::config(format!(
                            "tree {idx} node {i} has invalid child {c}"
                        ))
                    })
            };
            let feature = usize::try_from(spec.feature[i])
                .ok()
                .filter(|&f| f < n_features)
                .ok_or_else(|| {
                    ServingError::config(format!(
                        "tree {idx} node {i} splits on invalid feature {}",
                        spec.feature[i]
                    ))
                })?;

            nodes.push(Node::Split {
                feature,
                threshold: spec.threshold[i],
                left: child(left)?,
                right: child(right)?,
            });
        }

        Ok(Self { nodes })
    }

    fn predict(&self, row: &ArrayView1<'_, f64>) -> f64 {
        let mut idx = 0;
        loop {
            match self.nodes[idx] {
                Node::Leaf(value) => return value,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    idx = if row[feature] <= threshold { left } else { right };
                }
            }
        }
    }
}

#[derive(Debug)]
struct ForestModel {
    n_features: usize,
    trees: Vec<Tree>,
}

impl ForestModel {
    fn from_spec(spec: &ForestSpec) -> ServingResult<Self> {
        if spec.n_features == 0 {
            return Err(ServingError::config("random forest has zero input features"));
        }
        if spec.trees.is_empty() {
            return Err(ServingError::config("random forest has no trees"));
        }
        let trees = spec
            .trees
            .iter()
            .enumerate()
            .map(|(i, t)| Tree::from_spec(t, spec.n_features, i))
            .collect::<ServingResult<Vec<_>>>()?;
        Ok(Self {
            n_features: spec.n_features,
            trees,
        })
    }
}

impl PriceModel for ForestModel {
    fn input_dim(&self) -> usize {
        self.n_features
    }

    fn predict(&self, row: ArrayView1<'_, f64>) -> ServingResult<f64> {
        check_width(self.n_features, &row)?;
        let sum: f64 = self.trees.iter().map(|t| t.predict(&row)).sum();
        finite(sum / self.trees.len() as f64, self.name())
    }

    fn name(&self) -> &'static str {
        "random_forest"
    }
}
