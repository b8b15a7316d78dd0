//! Loading of the cleaned catalog and ratings tables.
//!
//! Both tables arrive as JSON arrays of flat rows, already cleaned by the
//! ingestion side. Row counts are logged so nothing is dropped silently.

use std::path::Path;

use tracing::info;

use crate::error::AppResult;
use crate::models::{CatalogItem, RatingRow};

/// Reads the catalog snapshot rows from a JSON file.
pub fn load_catalog(path: impl AsRef<Path>) -> AppResult<Vec<CatalogItem>> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)?;
    let items: Vec<CatalogItem> = serde_json::from_slice(&bytes)?;
    info!("loaded {} catalog items from {}", items.len(), path.display());
    Ok(items)
}

/// Reads the flat ratings table from a JSON file.
pub fn load_ratings(path: impl AsRef<Path>) -> AppResult<Vec<RatingRow>> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)?;
    let rows: Vec<RatingRow> = serde_json::from_slice(&bytes)?;
    info!("loaded {} rating rows from {}", rows.len(), path.display());
    Ok(rows)
}
