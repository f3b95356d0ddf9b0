//! Catalog Loader Module
//! Handles CSV loading and process-wide memoization using Polars.

use polars::prelude::*;
use std::path::Path;
use std::sync::{Arc, Mutex};
use thiserror::Error;

use super::catalog::{columns, Catalog};

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to load CSV: {0}")]
    CsvError(#[from] PolarsError),
    #[error("Catalog is missing required column '{0}'")]
    MissingColumn(&'static str),
}

/// Reads the catalog CSV with Polars.
pub struct CatalogLoader;

impl CatalogLoader {
    /// Load the full catalog from disk. Malformed numeric cells become
    /// nulls; a missing file or a missing required column is fatal.
    pub fn load_csv(path: &Path) -> Result<Catalog, LoaderError> {
        log::debug!("reading catalog from {}", path.display());

        // Lazy scan, then collect the whole table once
        let df = LazyCsvReader::new(path)
            .with_infer_schema_length(Some(10000))
            .with_ignore_errors(true)
            .finish()?
            .collect()?;

        for name in columns::REQUIRED {
            if df.column(name).is_err() {
                return Err(LoaderError::MissingColumn(name));
            }
        }

        log::info!(
            "loaded catalog: {} rows, {} columns",
            df.height(),
            df.width()
        );
        Ok(Catalog::new(df))
    }
}

/// Lazily-initialized, process-wide handle to the loaded catalog.
///
/// The first `get_or_load` performs the read while holding the lock, so a
/// racing first access serializes to a single load. Later calls return the
/// memoized `Arc` without touching storage. `invalidate` clears the slot;
/// the next access reloads.
pub struct CatalogCache {
    slot: Mutex<Option<Arc<Catalog>>>,
}

impl Default for CatalogCache {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogCache {
    pub const fn new() -> Self {
        Self {
            slot: Mutex::new(None),
        }
    }

    /// Return the cached catalog, loading it on first access.
    pub fn get_or_load(&self, path: &Path) -> Result<Arc<Catalog>, LoaderError> {
        // A poisoned lock means another render died mid-load; the slot
        // itself is still coherent.
        let mut slot = self.slot.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(catalog) = slot.as_ref() {
            log::debug!("catalog cache hit");
            return Ok(Arc::clone(catalog));
        }

        let catalog = Arc::new(CatalogLoader::load_csv(path)?);
        *slot = Some(Arc::clone(&catalog));
        Ok(catalog)
    }

    /// Drop the memoized catalog. The next `get_or_load` reads from disk.
    pub fn invalidate(&self) {
        let mut slot = self.slot.lock().unwrap_or_else(|e| e.into_inner());
        *slot = None;
    }
}

static SHARED: CatalogCache = CatalogCache::new();

/// The process-wide catalog cache used by the dashboard binary.
pub fn shared_cache() -> &'static CatalogCache {
    &SHARED
}
