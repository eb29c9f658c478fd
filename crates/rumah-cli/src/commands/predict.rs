//! Predict Command Implementation
//!
//! Runs one form submission built from command-line flags.

use super::ArtifactArgs;
use anyhow::{Context, Result};
use clap::Args;
use rumah_core::{InflationRequest, InputLimits, RawInput, SizeUnit};
use rumah_serving::{dataset_note, render_outcome, FormInput, PredictionForm};
use std::io::Write;
use tracing::info;

/// Predict the price of one property
///
/// # Example
///
/// ```bash
/// rumah predict \
///     --artifact-dir ./artifacts \
///     --location Ampang \
///     --property-type Condominium \
///     --furnishing "Fully Furnished" \
///     --rooms 3 --size 1200 \
///     --adjust-for-inflation --inflation-rate 3.5
/// ```
#[derive(Args, Debug, Clone)]
pub struct PredictCommand {
    /// Artifact location
    #[command(flatten)]
    pub artifacts: ArtifactArgs,

    /// Location of the property
    #[arg(long, short = 'l')]
    pub location: String,

    /// Property type
    #[arg(long, short = 't')]
    pub property_type: String,

    /// Furnishing level
    #[arg(long, short = 'f')]
    pub furnishing: String,

    /// Number of rooms [default: from the configured limits]
    #[arg(long)]
    pub rooms: Option<u32>,

    /// Number of bathrooms [default: from the configured limits]
    #[arg(long)]
    pub bathrooms: Option<u32>,

    /// Number of car parks [default: from the configured limits]
    #[arg(long)]
    pub car_parks: Option<u32>,

    /// Size of the property [default: from the configured limits]
    #[arg(long, value_parser = parse_size)]
    pub size: Option<f64>,

    /// Unit of --size: sqft or sqm
    #[arg(long, short = 'u', default_value = "sqft")]
    pub unit: SizeUnit,

    /// Also show the price adjusted for inflation since the dataset snapshot
    #[arg(long)]
    pub adjust_for_inflation: bool,

    /// Average annual inflation rate in percent [default: from the configured limits]
    #[arg(long, value_parser = parse_rate)]
    pub inflation_rate: Option<f64>,
}

impl PredictCommand {
    /// Execute the predict command
    pub fn run(&self) -> Result<()> {
        let stdout = std::io::stdout();
        self.run_with(&mut stdout.lock())
    }

    /// Execute, writing the result lines to `out`.
    pub fn run_with<W: Write>(&self, out: &mut W) -> Result<()> {
        let config = self.artifacts.to_config()?;
        let form = PredictionForm::load(&config, self.artifacts.clock())
            .context("Failed to load prediction artifacts")?;

        info!(
            "Predicting for {} / {} / {}",
            self.location, self.property_type, self.furnishing
        );
        let outcome = form
            .submit(&self.form_input(form.limits()))
            .context("Prediction failed")?;

        for line in render_outcome(&outcome) {
            writeln!(out, "{}", line)?;
        }
        writeln!(out)?;
        writeln!(out, "{}", dataset_note(form.reference_date()))?;
        Ok(())
    }

    /// The form submission these flags describe. Omitted fields take the
    /// defaults of `limits`; range checks happen on submit.
    pub fn form_input(&self, limits: &InputLimits) -> FormInput {
        FormInput {
            raw: RawInput {
                location: self.location.clone(),
                property_type: self.property_type.clone(),
                furnishing: self.furnishing.clone(),
                rooms: self.rooms.unwrap_or(limits.rooms.default),
                bathrooms: self.bathrooms.unwrap_or(limits.bathrooms.default),
                car_parks: self.car_parks.unwrap_or(limits.car_parks.default),
                size: self.size.unwrap_or(limits.default_size),
                size_unit: self.unit,
            },
            inflation: if self.adjust_for_inflation {
                InflationRequest::at_rate(
                    self.inflation_rate.unwrap_or(limits.inflation_rate.default),
                )
            } else {
                InflationRequest::none()
            },
        }
    }
}

fn parse_size(s: &str) -> Result<f64, String> {
    let size: f64 = s.parse().map_err(|e| format!("{}", e))?;
    if size.is_finite() && size > 0.0 {
        Ok(size)
    } else {
        Err(format!("{} is not a positive size", s))
    }
}

fn parse_rate(s: &str) -> Result<f64, String> {
    let rate: f64 = s.parse().map_err(|e| format!("{}", e))?;
    if rate.is_finite() {
        Ok(rate)
    } else {
        Err(format!("{} is not a finite rate", s))
    }
}
