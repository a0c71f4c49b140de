//! Loading florb catalogs from TOML or JSON files

use std::path::Path;

use anyhow::{Context, Result};

use crate::domain::value_objects::FlorbCatalog;

/// Read and validate a catalog file; the format follows the file extension
pub fn load_catalog(path: impl AsRef<Path>) -> Result<FlorbCatalog> {
    let path = path.as_ref();
    let catalog: FlorbCatalog = config::Config::builder()
        .add_source(config::File::from(path).required(true))
        .build()
        .with_context(|| format!("Failed to read catalog file {}", path.display()))?
        .try_deserialize()
        .with_context(|| format!("Malformed catalog file {}", path.display()))?;

    catalog
        .validate()
        .with_context(|| format!("Invalid catalog in {}", path.display()))?;

    tracing::info!(
        catalog = catalog.name(),
        tiers = catalog.tier_count(),
        effects = catalog.effects().len(),
        "Loaded florb catalog from {}",
        path.display()
    );
    Ok(catalog)
}

/// The catalog at `path`, or the built-in standard catalog when no path is set
pub fn load_or_standard(path: Option<&Path>) -> Result<FlorbCatalog> {
    match path {
        Some(path) => load_catalog(path),
        None => Ok(FlorbCatalog::standard()),
    }
}
