//! Domain logic for Kuala Lumpur house price prediction.
//!
//! This crate holds everything between the user's form input and the numeric
//! row handed to the model, plus the inflation adjustment applied afterwards.
//! It performs no I/O.
//!
//! # Overview
//!
//! - [`FeatureColumnSet`]: the ordered columns the model was trained on
//! - [`CategoryCatalog`]: selectable values per categorical field, recovered
//!   from the indicator column names
//! - [`FeatureAssembler`]: builds a one-hot [`FeatureVector`] from [`RawInput`]
//! - [`InflationAdjuster`]: compound growth since the dataset snapshot, driven
//!   by an injected [`Clock`]
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use rumah_core::{FeatureAssembler, FeatureColumnSet, RawInput, SizeUnit};
//!
//! let columns = FeatureColumnSet::new([
//!     "Rooms", "Bathrooms", "Car Parks", "Size",
//!     "Location_Ampang", "Location_Cheras",
//!     "Property Type_Condominium",
//!     "Furnishing_Fully Furnished", "Furnishing_Unfurnished",
//! ])
//! .unwrap();
//! let assembler = FeatureAssembler::new(Arc::new(columns)).unwrap();
//!
//! let input = RawInput {
//!     location: "Ampang".into(),
//!     property_type: "Condominium".into(),
//!     furnishing: "Fully Furnished".into(),
//!     rooms: 3,
//!     bathrooms: 2,
//!     car_parks: 1,
//!     size: 1200.0,
//!     size_unit: SizeUnit::SquareFeet,
//! };
//! let vector = assembler.assemble(&input).unwrap();
//! assert_eq!(vector.get("Location_Ampang"), Some(1.0));
//! assert_eq!(vector.get("Location_Cheras"), Some(0.0));
//! ```

#![warn(missing_docs)]

pub mod assembler;
pub mod catalog;
pub mod columns;
pub mod error;
pub mod inflation;
pub mod input;

pub use assembler::{FeatureAssembler, FeatureVector};
pub use catalog::{CategoryCatalog, CategoryChoice, CategoryField};
pub use columns::{FeatureColumnSet, NumericField};
pub use error::{CoreError, CoreResult};
pub use inflation::{
    compound, elapsed_years, Clock, FixedClock, InflationAdjuster, InflationAdjustment,
    InflationRequest, SystemClock, DATASET_SNAPSHOT_DATE,
};
pub use input::{InputLimits, IntBounds, RateBounds, RawInput, SizeUnit, SQ_FT_PER_SQ_M};
