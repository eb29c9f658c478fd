//! Error types for the rumah-core crate.
//!
//! Errors fall into two groups: configuration problems with the feature
//! column set (fatal at startup) and invalid user input (reported back to the
//! caller, who may correct the input and resubmit).

use thiserror::Error;

use crate::catalog::CategoryField;

/// Result type alias for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors produced by the domain logic.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoreError {
    /// The feature column set is empty.
    #[error("Feature column set is empty")]
    EmptyColumnSet,

    /// The same column name occurs twice in the feature column set.
    #[error("Duplicate feature column: {name:?}")]
    DuplicateColumn {
        /// The repeated column name.
        name: String,
    },

    /// A column name matches more than one category prefix, or contains a
    /// category prefix somewhere other than at its start.
    #[error("Ambiguous feature column {name:?}: {reason}")]
    AmbiguousColumn {
        /// The offending column name.
        name: String,
        /// What made the column ambiguous.
        reason: String,
    },

    /// A categorical field has no indicator columns at all.
    #[error("No indicator columns for category {field}")]
    EmptyCategory {
        /// The field with no selectable values.
        field: CategoryField,
    },

    /// The user selected a category value with no indicator column.
    #[error("Unknown {field} value: {value:?}")]
    UnknownCategory {
        /// The categorical field.
        field: CategoryField,
        /// The rejected value.
        value: String,
    },

    /// A vector does not have the width the column set requires.
    #[error("Dimension mismatch: expected {expected} columns, got {actual}")]
    DimensionMismatch {
        /// Width required by the feature column set.
        expected: usize,
        /// Width actually supplied.
        actual: usize,
    },

    /// A user-supplied value is out of range or missing.
    #[error("Invalid input for {field}: {message}")]
    InvalidInput {
        /// Name of the offending field.
        field: &'static str,
        /// Why the value was rejected.
        message: String,
    },
}

impl CoreError {
    /// Create an invalid input error.
    pub fn invalid_input(field: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidInput {
            field,
            message: message.into(),
        }
    }

    /// Check if this error stems from the feature column configuration.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::EmptyColumnSet
                | Self::DuplicateColumn { .. }
                | Self::AmbiguousColumn { .. }
                | Self::EmptyCategory { .. }
                | Self::DimensionMismatch { .. }
        )
    }

    /// Check if this error was caused by user input.
    pub fn is_input_error(&self) -> bool {
        matches!(self, Self::UnknownCategory { .. } | Self::InvalidInput { .. })
    }
}
