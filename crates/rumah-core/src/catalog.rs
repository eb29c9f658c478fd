//! Category catalog extraction.
//!
//! Selectable values for each categorical field are recovered from the
//! indicator columns of the feature column set by stripping the field's fixed
//! prefix. Each value is mapped to its column index once, at construction, so
//! assembling a request is a table lookup.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::columns::FeatureColumnSet;
use crate::error::{CoreError, CoreResult};

/// A categorical input field, one-hot encoded in the feature column set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CategoryField {
    /// Neighbourhood of the property.
    Location,
    /// Building type, e.g. condominium or terrace house.
    PropertyType,
    /// Furnishing level.
    Furnishing,
}

impl CategoryField {
    /// All categorical fields.
    pub const ALL: [CategoryField; 3] = [
        CategoryField::Location,
        CategoryField::PropertyType,
        CategoryField::Furnishing,
    ];

    /// Prefix of this field's indicator columns.
    pub fn prefix(&self) -> &'static str {
        match self {
            CategoryField::Location => "Location_",
            CategoryField::PropertyType => "Property Type_",
            CategoryField::Furnishing => "Furnishing_",
        }
    }

    /// Human-readable field label.
    pub fn label(&self) -> &'static str {
        match self {
            CategoryField::Location => "Location",
            CategoryField::PropertyType => "Property Type",
            CategoryField::Furnishing => "Furnishing",
        }
    }

    /// Indicator column name for a value of this field.
    pub fn indicator_column(&self, value: &str) -> String {
        format!("{}{}", self.prefix(), value)
    }

    pub(crate) fn slot(&self) -> usize {
        match self {
            CategoryField::Location => 0,
            CategoryField::PropertyType => 1,
            CategoryField::Furnishing => 2,
        }
    }
}

impl fmt::Display for CategoryField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A validated categorical selection, bound to its indicator column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryChoice {
    /// The field this choice belongs to.
    pub field: CategoryField,
    /// The selected value, without prefix.
    pub value: String,
    /// Index of the indicator column in the feature column set.
    pub column: usize,
}

/// Selectable values per categorical field, each mapped to a column index.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryCatalog {
    fields: [BTreeMap<String, usize>; 3],
}

impl CategoryCatalog {
    /// Extract the catalog from a feature column set.
    ///
    /// A column that mentions more than one category prefix, or mentions a
    /// prefix anywhere but at its start, is a configuration error. So is a
    /// field without any indicator column.
    pub fn from_columns(columns: &FeatureColumnSet) -> CoreResult<Self> {
        let mut fields: [BTreeMap<String, usize>; 3] = Default::default();

        for (idx, name) in columns.iter().enumerate() {
            let matching: Vec<CategoryField> = CategoryField::ALL
                .into_iter()
                .filter(|field| name.contains(field.prefix()))
                .collect();

            let field = match matching.as_slice() {
                [] => continue,
                [field] => *field,
                _ => {
                    let prefixes: Vec<&str> = matching.iter().map(|f| f.prefix()).collect();
                    return Err(CoreError::AmbiguousColumn {
                        name: name.to_string(),
                        reason: format!("matches prefixes {:?}", prefixes),
                    });
                }
            };

            let value = name.strip_prefix(field.prefix()).ok_or_else(|| {
                CoreError::AmbiguousColumn {
                    name: name.to_string(),
                    reason: format!("prefix {:?} is not at the start", field.prefix()),
                }
            })?;
            if value.is_empty() {
                return Err(CoreError::AmbiguousColumn {
                    name: name.to_string(),
                    reason: "empty category value".to_string(),
                });
            }

            fields[field.slot()].insert(value.to_string(), idx);
        }

        for field in CategoryField::ALL {
            let values = &fields[field.slot()];
            if values.is_empty() {
                return Err(CoreError::EmptyCategory { field });
            }
            debug!("Category {} has {} values", field, values.len());
        }

        Ok(Self { fields })
    }

    /// Selectable values of a field, sorted ascending.
    pub fn values(&self, field: CategoryField) -> impl Iterator<Item = &str> + '_ {
        self.fields[field.slot()].keys().map(String::as_str)
    }

    /// Number of selectable values of a field.
    pub fn len(&self, field: CategoryField) -> usize {
        self.fields[field.slot()].len()
    }

    /// Check whether a value is selectable for a field.
    pub fn contains(&self, field: CategoryField, value: &str) -> bool {
        self.fields[field.slot()].contains_key(value)
    }

    /// Column indices of every indicator belonging to a field.
    pub fn indicator_columns(&self, field: CategoryField) -> impl Iterator<Item = usize> + '_ {
        self.fields[field.slot()].values().copied()
    }

    /// Resolve a user selection to its indicator column.
    ///
    /// Values without an indicator column are rejected here, before any
    /// vector is assembled.
    pub fn select(&self, field: CategoryField, value: &str) -> CoreResult<CategoryChoice> {
        self.fields[field.slot()]
            .get(value)
            .map(|&column| CategoryChoice {
                field,
                value: value.to_string(),
                column,
            })
            .ok_or_else(|| CoreError::UnknownCategory {
                field,
                value: value.to_string(),
            })
    }
}
