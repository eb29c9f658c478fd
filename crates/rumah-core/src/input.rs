//! Raw user input and its limits.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// Square feet per square metre.
pub const SQ_FT_PER_SQ_M: f64 = 10.7639;

/// Unit the user entered the size in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SizeUnit {
    /// Square feet, the unit the model was trained on.
    #[default]
    SquareFeet,
    /// Square metres.
    SquareMeters,
}

impl SizeUnit {
    /// Convert a size in this unit to square feet.
    pub fn to_square_feet(&self, size: f64) -> f64 {
        match self {
            SizeUnit::SquareFeet => size,
            SizeUnit::SquareMeters => size * SQ_FT_PER_SQ_M,
        }
    }

    /// Display label.
    pub fn label(&self) -> &'static str {
        match self {
            SizeUnit::SquareFeet => "Square Feet (sq. ft.)",
            SizeUnit::SquareMeters => "Square Meters (sq. m.)",
        }
    }
}

impl fmt::Display for SizeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SizeUnit {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sqft" | "sq ft" | "sq. ft." | "ft2" | "square feet" => Ok(SizeUnit::SquareFeet),
            "sqm" | "sq m" | "sq. m." | "m2" | "square meters" | "square metres" => {
                Ok(SizeUnit::SquareMeters)
            }
            other => Err(CoreError::invalid_input(
                "size_unit",
                format!("unknown unit {:?} (expected sqft or sqm)", other),
            )),
        }
    }
}

/// Property attributes as entered by the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawInput {
    /// Selected location.
    pub location: String,
    /// Selected property type.
    pub property_type: String,
    /// Selected furnishing level.
    pub furnishing: String,
    /// Number of rooms.
    pub rooms: u32,
    /// Number of bathrooms.
    pub bathrooms: u32,
    /// Number of car parks.
    pub car_parks: u32,
    /// Size in `size_unit`.
    pub size: f64,
    /// Unit of `size`.
    #[serde(default)]
    pub size_unit: SizeUnit,
}

impl RawInput {
    /// Size normalized to square feet.
    pub fn size_in_square_feet(&self) -> f64 {
        self.size_unit.to_square_feet(self.size)
    }
}

/// Inclusive bounds and default of an integer field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntBounds {
    /// Smallest accepted value.
    pub min: u32,
    /// Largest accepted value.
    pub max: u32,
    /// Value offered when the user gives none.
    pub default: u32,
}

impl IntBounds {
    /// Check whether a value lies within bounds.
    pub fn contains(&self, value: u32) -> bool {
        (self.min..=self.max).contains(&value)
    }

    fn check(&self, field: &'static str, value: u32) -> CoreResult<()> {
        if self.contains(value) {
            Ok(())
        } else {
            Err(CoreError::invalid_input(
                field,
                format!("{} is outside {}..={}", value, self.min, self.max),
            ))
        }
    }
}

/// Inclusive bounds and default of the inflation rate, in percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateBounds {
    /// Smallest accepted rate.
    pub min: f64,
    /// Largest accepted rate.
    pub max: f64,
    /// Rate offered when the user gives none.
    pub default: f64,
}

impl RateBounds {
    /// Check a rate against the bounds.
    pub fn check(&self, rate: f64) -> CoreResult<()> {
        if rate.is_finite() && rate >= self.min && rate <= self.max {
            Ok(())
        } else {
            Err(CoreError::invalid_input(
                "inflation_rate",
                format!("{} is outside {}..={}", rate, self.min, self.max),
            ))
        }
    }
}

/// Accepted ranges and defaults of every form field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InputLimits {
    /// Rooms: 1 to 20, default 2.
    pub rooms: IntBounds,
    /// Bathrooms: 1 to 20, default 2.
    pub bathrooms: IntBounds,
    /// Car parks: 0 to 10, default 1.
    pub car_parks: IntBounds,
    /// Default size.
    pub default_size: f64,
    /// Annual inflation rate in percent: 0 to 100, default 3.0.
    pub inflation_rate: RateBounds,
}

impl Default for InputLimits {
    fn default() -> Self {
        Self {
            rooms: IntBounds {
                min: 1,
                max: 20,
                default: 2,
            },
            bathrooms: IntBounds {
                min: 1,
                max: 20,
                default: 2,
            },
            car_parks: IntBounds {
                min: 0,
                max: 10,
                default: 1,
            },
            default_size: 1500.0,
            inflation_rate: RateBounds {
                min: 0.0,
                max: 100.0,
                default: 3.0,
            },
        }
    }
}

impl InputLimits {
    /// Validate the numeric fields of a raw input.
    pub fn validate(&self, input: &RawInput) -> CoreResult<()> {
        self.rooms.check("rooms", input.rooms)?;
        self.bathrooms.check("bathrooms", input.bathrooms)?;
        self.car_parks.check("car_parks", input.car_parks)?;
        if !input.size.is_finite() || input.size <= 0.0 {
            return Err(CoreError::invalid_input(
                "size",
                format!("{} is not a positive size", input.size),
            ));
        }
        Ok(())
    }
}
