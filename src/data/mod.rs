//! Data module - catalog loading and typed projections

mod catalog;
mod loader;

pub use catalog::{columns, parse_date, parse_magnitude, Catalog, CatalogRecord, MapPoint};
pub use loader::{shared_cache, CatalogCache, CatalogLoader, LoaderError};

#[cfg(test)]
pub(crate) use catalog::sample_catalog;
