//! Feature vector assembly.
//!
//! Maps raw user input onto the training-time column layout: numeric fields
//! land under their exact column name, each categorical field sets exactly one
//! indicator column to 1, and every other column is 0. Numeric fields whose
//! column is absent from the set are dropped.

use std::sync::Arc;

use tracing::warn;

use crate::catalog::{CategoryCatalog, CategoryChoice, CategoryField};
use crate::columns::{FeatureColumnSet, NumericField};
use crate::error::{CoreError, CoreResult};
use crate::input::RawInput;

/// A single row aligned with a [`FeatureColumnSet`].
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    columns: Arc<FeatureColumnSet>,
    values: Vec<f64>,
}

impl FeatureVector {
    /// Wrap pre-computed values, checking their width.
    pub fn from_values(columns: Arc<FeatureColumnSet>, values: Vec<f64>) -> CoreResult<Self> {
        if values.len() != columns.len() {
            return Err(CoreError::DimensionMismatch {
                expected: columns.len(),
                actual: values.len(),
            });
        }
        Ok(Self { columns, values })
    }

    /// The column set this vector is aligned with.
    pub fn columns(&self) -> &FeatureColumnSet {
        &self.columns
    }

    /// True when this vector is laid out over `columns`. Vectors assembled
    /// from the same shared set skip the column-by-column comparison.
    pub fn is_aligned_with(&self, columns: &Arc<FeatureColumnSet>) -> bool {
        Arc::ptr_eq(&self.columns, columns) || *self.columns == **columns
    }

    /// Values in column order.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Consume the vector, returning its values.
    pub fn into_values(self) -> Vec<f64> {
        self.values
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True only for a zero-width vector, which a valid column set never yields.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value of a named column.
    pub fn get(&self, name: &str) -> Option<f64> {
        self.columns.position(name).map(|idx| self.values[idx])
    }

    /// Iterate over `(column, value)` pairs in column order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.columns.iter().zip(self.values.iter().copied())
    }
}

/// Builds feature vectors for one column set.
///
/// Column positions of the numeric fields and of every category value are
/// resolved once here; assembling a request only indexes into them.
#[derive(Debug, Clone)]
pub struct FeatureAssembler {
    columns: Arc<FeatureColumnSet>,
    catalog: CategoryCatalog,
    numeric: [Option<usize>; 4],
}

impl FeatureAssembler {
    /// Build an assembler and its category catalog from a column set.
    pub fn new(columns: Arc<FeatureColumnSet>) -> CoreResult<Self> {
        let catalog = CategoryCatalog::from_columns(&columns)?;

        let mut numeric = [None; 4];
        for field in NumericField::ALL {
            numeric[field.slot()] = columns.position(field.column_name());
            if numeric[field.slot()].is_none() {
                warn!(
                    "Column {:?} is not in the feature column set; its input will be dropped",
                    field.column_name()
                );
            }
        }

        Ok(Self {
            columns,
            catalog,
            numeric,
        })
    }

    /// The column set vectors are aligned with.
    pub fn columns(&self) -> &Arc<FeatureColumnSet> {
        &self.columns
    }

    /// The category catalog derived from the column set.
    pub fn catalog(&self) -> &CategoryCatalog {
        &self.catalog
    }

    /// Resolve the three categorical selections of a raw input.
    pub fn select_categories(&self, input: &RawInput) -> CoreResult<[CategoryChoice; 3]> {
        Ok([
            self.catalog
                .select(CategoryField::Location, &input.location)?,
            self.catalog
                .select(CategoryField::PropertyType, &input.property_type)?,
            self.catalog
                .select(CategoryField::Furnishing, &input.furnishing)?,
        ])
    }

    /// Assemble a feature vector from raw input.
    ///
    /// Size is converted to square feet first. An unknown category value is
    /// rejected with [`CoreError::UnknownCategory`].
    pub fn assemble(&self, input: &RawInput) -> CoreResult<FeatureVector> {
        let choices = self.select_categories(input)?;
        let numeric = [
            (NumericField::Rooms, f64::from(input.rooms)),
            (NumericField::Bathrooms, f64::from(input.bathrooms)),
            (NumericField::CarParks, f64::from(input.car_parks)),
            (NumericField::Size, input.size_in_square_feet()),
        ];
        self.assemble_parts(&numeric, &choices)
    }

    /// Assemble from already-resolved parts.
    ///
    /// Choices must have been produced by this assembler's catalog; at most
    /// one choice per field is accepted.
    pub fn assemble_parts(
        &self,
        numeric: &[(NumericField, f64)],
        choices: &[CategoryChoice],
    ) -> CoreResult<FeatureVector> {
        let mut values = vec![0.0; self.columns.len()];

        for (field, value) in numeric {
            if let Some(idx) = self.numeric[field.slot()] {
                values[idx] = *value;
            }
        }

        let mut seen: [bool; 3] = [false; 3];
        for choice in choices {
            let slot = choice.field.slot();
            if seen[slot] {
                return Err(CoreError::invalid_input(
                    choice.field.label(),
                    "selected more than once",
                ));
            }
            seen[slot] = true;

            let bound = self.catalog.select(choice.field, &choice.value)?;
            if bound.column != choice.column {
                return Err(CoreError::UnknownCategory {
                    field: choice.field,
                    value: choice.value.clone(),
                });
            }
            values[bound.column] = 1.0;
        }

        Ok(FeatureVector {
            columns: Arc::clone(&self.columns),
            values,
        })
    }
}
