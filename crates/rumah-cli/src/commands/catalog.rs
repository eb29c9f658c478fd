//! Catalog Command Implementation

use super::ArtifactArgs;
use anyhow::{Context, Result};
use clap::Args;
use rumah_core::{CategoryCatalog, CategoryField};
use rumah_serving::ArtifactLoader;
use std::io::Write;

/// List the selectable values of each categorical field
#[derive(Args, Debug, Clone)]
pub struct CatalogCommand {
    /// Artifact location
    #[command(flatten)]
    pub artifacts: ArtifactArgs,

    /// Only list this field: location, property-type or furnishing
    #[arg(long, value_parser = parse_field)]
    pub field: Option<CategoryField>,
}

impl CatalogCommand {
    /// Execute the catalog command
    pub fn run(&self) -> Result<()> {
        let stdout = std::io::stdout();
        self.run_with(&mut stdout.lock())
    }

    /// Execute, writing the listing to `out`.
    pub fn run_with<W: Write>(&self, out: &mut W) -> Result<()> {
        let config = self.artifacts.to_config()?;
        let artifacts = ArtifactLoader::new(config)
            .load()
            .context("Failed to load prediction artifacts")?;
        write_catalog(artifacts.catalog(), self.field, out)
    }
}

fn write_catalog<W: Write>(
    catalog: &CategoryCatalog,
    only: Option<CategoryField>,
    out: &mut W,
) -> Result<()> {
    for field in CategoryField::ALL {
        if only.is_some_and(|f| f != field) {
            continue;
        }
        writeln!(out, "{} ({}):", field.label(), catalog.len(field))?;
        for value in catalog.values(field) {
            writeln!(out, "  {}", value)?;
        }
    }
    Ok(())
}

fn parse_field(s: &str) -> Result<CategoryField, String> {
    match s.to_lowercase().replace(['_', ' '], "-").as_str() {
        "location" => Ok(CategoryField::Location),
        "property-type" => Ok(CategoryField::PropertyType),
        "furnishing" => Ok(CategoryField::Furnishing),
        other => Err(format!(
            "unknown field {:?} (expected location, property-type or furnishing)",
            other
        )),
    }
}
