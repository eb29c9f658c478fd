//! The ordered feature column set the model was trained on.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// Numeric fields copied verbatim into the feature vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NumericField {
    /// Number of rooms.
    Rooms,
    /// Number of bathrooms.
    Bathrooms,
    /// Number of car parks.
    CarParks,
    /// Built-up size in square feet.
    Size,
}

impl NumericField {
    /// All numeric fields in column-set order.
    pub const ALL: [NumericField; 4] = [
        NumericField::Rooms,
        NumericField::Bathrooms,
        NumericField::CarParks,
        NumericField::Size,
    ];

    /// The exact column name this field occupies.
    pub fn column_name(&self) -> &'static str {
        match self {
            NumericField::Rooms => "Rooms",
            NumericField::Bathrooms => "Bathrooms",
            NumericField::CarParks => "Car Parks",
            NumericField::Size => "Size",
        }
    }

    pub(crate) fn slot(&self) -> usize {
        match self {
            NumericField::Rooms => 0,
            NumericField::Bathrooms => 1,
            NumericField::CarParks => 2,
            NumericField::Size => 3,
        }
    }
}

impl fmt::Display for NumericField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column_name())
    }
}

/// An ordered, duplicate-free list of column names fixed at training time.
///
/// Every vector handed to the scaler and the model has exactly these columns
/// in exactly this order.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureColumnSet {
    names: Vec<String>,
    positions: HashMap<String, usize>,
}

impl FeatureColumnSet {
    /// Build a column set, rejecting empty lists and duplicate names.
    pub fn new<I, S>(names: I) -> CoreResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        if names.is_empty() {
            return Err(CoreError::EmptyColumnSet);
        }

        let mut positions = HashMap::with_capacity(names.len());
        for (idx, name) in names.iter().enumerate() {
            if positions.insert(name.clone(), idx).is_some() {
                return Err(CoreError::DuplicateColumn { name: name.clone() });
            }
        }

        Ok(Self { names, positions })
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Always false for a constructed set; present for API symmetry.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Column names in training order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Index of a column, if present.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.positions.get(name).copied()
    }

    /// Check whether a column is present.
    pub fn contains(&self, name: &str) -> bool {
        self.positions.contains_key(name)
    }

    /// Iterate over column names in order.
    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.names.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positions_follow_order() {
        let set = FeatureColumnSet::new(["Rooms", "Size", "Location_Ampang"]).unwrap();
        assert_eq!(set.len(), 3);
        assert_eq!(set.position("Rooms"), Some(0));
        assert_eq!(set.position("Location_Ampang"), Some(2));
        assert_eq!(set.position("Bathrooms"), None);
        assert_eq!(
            set.iter().collect::<Vec<_>>(),
            vec!["Rooms", "Size", "Location_Ampang"]
        );
    }

    #[test]
    fn test_rejects_empty_and_duplicates() {
        let empty: Vec<String> = Vec::new();
        assert_eq!(
            FeatureColumnSet::new(empty).unwrap_err(),
            CoreError::EmptyColumnSet
        );

        let err = FeatureColumnSet::new(["Rooms", "Size", "Rooms"]).unwrap_err();
        assert_eq!(
            err,
            CoreError::DuplicateColumn {
                name: "Rooms".to_string()
            }
        );
    }

    #[test]
    fn test_numeric_column_names() {
        assert_eq!(NumericField::CarParks.column_name(), "Car Parks");
        assert_eq!(NumericField::Size.to_string(), "Size");
    }
}
