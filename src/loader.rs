//! Catalog loader
//!
//! Fetches the columnar snapshot from the external store into memory. The
//! ingestion job materializes the catalog as one JSON object per line, with
//! the flattened column names `CatalogRecord` deserializes from. The loader
//! performs a single bulk read; retry policy belongs to the caller.

use std::path::{Path, PathBuf};

use crate::record::CatalogRecord;
use crate::snapshot::CatalogSnapshot;
use crate::{Error, Result};

/// Columns every snapshot materialization must carry
const REQUIRED_COLUMNS: &[&str] = &[
    "features_properties_id",
    "features_properties_title_en",
    "features_properties_title_fr",
];

/// A bulk source of catalog rows.
///
/// The seam between the core and the external materialization store; tests
/// and the snapshot cache depend on this trait rather than a concrete store.
pub trait CatalogSource: Send + Sync {
    /// Read the full row set.
    ///
    /// Fails with `StorageUnavailable` when the store cannot be read and
    /// `SchemaMismatch` when required columns are absent. No retry here.
    fn load(&self) -> Result<CatalogSnapshot>;
}

/// File-backed NDJSON snapshot source
#[derive(Debug, Clone)]
pub struct NdjsonCatalog {
    path: PathBuf,
}

impl NdjsonCatalog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Verify the first materialized row carries the required columns
    fn check_schema(first_row: &serde_json::Value) -> Result<()> {
        for column in REQUIRED_COLUMNS {
            if first_row.get(column).is_none() {
                return Err(Error::SchemaMismatch((*column).to_string()));
            }
        }
        Ok(())
    }
}

impl CatalogSource for NdjsonCatalog {
    fn load(&self) -> Result<CatalogSnapshot> {
        let contents = std::fs::read_to_string(&self.path).map_err(|e| {
            Error::StorageUnavailable(format!("{}: {}", self.path.display(), e))
        })?;

        let mut rows = Vec::new();
        let mut checked = false;

        for (line_no, line) in contents.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }

            // Best-effort extraction: a malformed row degrades to a skip,
            // never a failed load
            let value: serde_json::Value = match serde_json::from_str(line) {
                Ok(value) => value,
                Err(e) => {
                    tracing::warn!(line = line_no + 1, error = %e, "skipping malformed snapshot row");
                    continue;
                }
            };

            // The first well-formed row decides whether the materialization
            // carries the columns this schema requires
            if !checked {
                Self::check_schema(&value)?;
                checked = true;
            }

            match serde_json::from_value::<CatalogRecord>(value) {
                Ok(record) => rows.push(record),
                Err(e) => {
                    tracing::warn!(line = line_no + 1, error = %e, "skipping snapshot row with bad fields");
                }
            }
        }

        tracing::debug!(rows = rows.len(), path = %self.path.display(), "snapshot read complete");
        Ok(CatalogSnapshot::new(rows))
    }
}
