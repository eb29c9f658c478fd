//! Form Command Implementation
//!
//! Asks for each form field on stdin, then prints the prediction. Empty
//! answers take the field's default.

use super::ArtifactArgs;
use anyhow::{bail, Context, Result};
use clap::Args;
use rumah_core::{CategoryField, InflationRequest, IntBounds, RawInput, SizeUnit};
use rumah_serving::{dataset_note, render_outcome, FormInput, PredictionForm, PredictionOutcome};
use std::io::{BufRead, Write};

/// Fill in the prediction form interactively
#[derive(Args, Debug, Clone)]
pub struct FormCommand {
    /// Artifact location
    #[command(flatten)]
    pub artifacts: ArtifactArgs,
}

impl FormCommand {
    /// Execute the form command
    pub fn run(&self) -> Result<()> {
        let config = self.artifacts.to_config()?;
        let form = PredictionForm::load(&config, self.artifacts.clock())
            .context("Failed to load prediction artifacts")?;

        let stdin = std::io::stdin();
        let stdout = std::io::stdout();
        run_interactive(&form, &mut stdin.lock(), &mut stdout.lock())?;
        Ok(())
    }
}

/// Ask for every field, submit, and print the result.
pub fn run_interactive<R: BufRead, W: Write>(
    form: &PredictionForm,
    input: &mut R,
    out: &mut W,
) -> Result<PredictionOutcome> {
    writeln!(out, "Kuala Lumpur House Price Prediction")?;
    writeln!(out)?;

    let mut prompter = Prompter { input, out };
    let location = prompter.choose(form, CategoryField::Location)?;
    let property_type = prompter.choose(form, CategoryField::PropertyType)?;
    let furnishing = prompter.choose(form, CategoryField::Furnishing)?;

    let limits = *form.limits();
    let rooms = prompter.count("Rooms", &limits.rooms)?;
    let bathrooms = prompter.count("Bathrooms", &limits.bathrooms)?;
    let car_parks = prompter.count("Car Parks", &limits.car_parks)?;

    let size_unit = prompter.ask("Size unit (sqft/sqm)", "sqft", |s| {
        s.parse::<SizeUnit>().map_err(|e| e.to_string())
    })?;
    let size = prompter.ask(
        &format!("Size in {}", size_unit),
        &limits.default_size.to_string(),
        |s| match s.parse::<f64>() {
            Ok(v) if v.is_finite() && v > 0.0 => Ok(v),
            _ => Err("Enter a positive number.".to_string()),
        },
    )?;

    let adjust = prompter.ask("Adjust for inflation? (y/N)", "n", |s| {
        match s.to_lowercase().as_str() {
            "y" | "yes" => Ok(true),
            "n" | "no" => Ok(false),
            _ => Err("Answer y or n.".to_string()),
        }
    })?;
    let inflation = if adjust {
        let bounds = limits.inflation_rate;
        let rate = prompter.ask(
            "Average annual inflation rate (%)",
            &format!("{:.1}", bounds.default),
            |s| {
                let rate = s.parse::<f64>().map_err(|e| e.to_string())?;
                bounds.check(rate).map(|_| rate).map_err(|e| e.to_string())
            },
        )?;
        InflationRequest::at_rate(rate)
    } else {
        InflationRequest::none()
    };

    let request = FormInput {
        raw: RawInput {
            location,
            property_type,
            furnishing,
            rooms,
            bathrooms,
            car_parks,
            size,
            size_unit,
        },
        inflation,
    };
    let outcome = form.submit(&request).context("Prediction failed")?;

    let out = prompter.out;
    writeln!(out)?;
    for line in render_outcome(&outcome) {
        writeln!(out, "{}", line)?;
    }
    writeln!(out)?;
    writeln!(out, "{}", dataset_note(form.reference_date()))?;
    Ok(outcome)
}

struct Prompter<'a, R, W> {
    input: &'a mut R,
    out: &'a mut W,
}

impl<R: BufRead, W: Write> Prompter<'_, R, W> {
    /// Re-asks until `parse` accepts the answer.
    fn ask<T>(
        &mut self,
        question: &str,
        default: &str,
        parse: impl Fn(&str) -> Result<T, String>,
    ) -> Result<T> {
        loop {
            write!(self.out, "{} [{}]: ", question, default)?;
            self.out.flush()?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                bail!("Input ended before the form was complete");
            }
            let answer = match line.trim() {
                "" => default,
                answer => answer,
            };
            match parse(answer) {
                Ok(value) => return Ok(value),
                Err(msg) => writeln!(self.out, "  {}", msg)?,
            }
        }
    }

    fn count(&mut self, question: &str, bounds: &IntBounds) -> Result<u32> {
        let bounds = *bounds;
        self.ask(question, &bounds.default.to_string(), move |s| {
            match s.parse::<u32>() {
                Ok(v) if bounds.contains(v) => Ok(v),
                _ => Err(format!(
                    "Enter a whole number between {} and {}.",
                    bounds.min, bounds.max
                )),
            }
        })
    }

    /// Lists the field's values and accepts a number or a name.
    fn choose(&mut self, form: &PredictionForm, field: CategoryField) -> Result<String> {
        let values: Vec<&str> = form.catalog().values(field).collect();
        writeln!(self.out, "{}:", field.label())?;
        for (i, value) in values.iter().enumerate() {
            writeln!(self.out, "  {:>3}) {}", i + 1, value)?;
        }

        let choice = self.ask(&format!("Select {}", field.label()), "1", |s| {
            if let Ok(n) = s.parse::<usize>() {
                if (1..=values.len()).contains(&n) {
                    return Ok(values[n - 1].to_string());
                }
            }
            values
                .iter()
                .find(|v| v.eq_ignore_ascii_case(s))
                .map(|v| v.to_string())
                .ok_or_else(|| "Choose one of the listed values.".to_string())
        })?;
        writeln!(self.out)?;
        Ok(choice)
    }
}
