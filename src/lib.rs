//! # Geolink - Bilingual Catalog Relationship Service
//!
//! Resolves hierarchical relationships (self, parent, children, siblings)
//! for records in a large, append-mostly metadata catalog and serves them
//! as bilingual (English/French) JSON responses.
//!
//! Geolink provides:
//! - NDJSON snapshot loading from the external materialization store
//! - A process-wide single-slot snapshot cache with single-flight cold start
//! - A derived catalog index (id → record, parent → children)
//! - Language-aware relationship resolution with capped child/sibling lists
//! - Full bilingual detail projection with none-safe embedded-JSON parsing
//! - A per-`(id, lang)` result cache with day-granularity expiry
//! - A paged modified-date listing for harvest-style change polling

pub mod analytics;
pub mod cache;
pub mod config;
pub mod detail;
pub mod index;
pub mod listing;
pub mod loader;
pub mod record;
pub mod resolver;
pub mod server;
pub mod service;
pub mod snapshot;

// Re-exports for convenient access
pub use cache::ResultCache;
pub use index::CatalogIndex;
pub use listing::{ModifiedEntry, ModifiedPage};
pub use loader::{CatalogSource, NdjsonCatalog};
pub use record::{CatalogRecord, RelatedRecord};
pub use service::CatalogService;
pub use snapshot::{CatalogSnapshot, SnapshotCache};

/// Result type alias for Geolink operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for Geolink operations
///
/// Only snapshot-level failures surface here. Per-field extraction
/// failures degrade to null values inside the detail projection, and the
/// service layer converts every error into a well-formed response body.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Catalog store unavailable: {0}")]
    StorageUnavailable(String),

    #[error("Snapshot schema mismatch: missing column {0}")]
    SchemaMismatch(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
