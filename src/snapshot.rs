//! Catalog snapshot and the process-wide snapshot cache
//!
//! A `CatalogSnapshot` is one immutable, point-in-time load of the full
//! catalog table. Once installed it is never mutated, only replaced
//! wholesale. Its index is built lazily on first use and reused for every
//! subsequent lookup against the same snapshot; replacing the snapshot
//! replaces the index with it.
//!
//! The `SnapshotCache` is a single-slot, last-write-wins store shared by all
//! requests in one process instance. `None` is the cold-start sentinel and
//! is distinct from a loaded snapshot with zero rows. The cold-start
//! check-then-act sequence (observe empty → load → install) is guarded by a
//! reload mutex so at most one load is in flight per process; callers that
//! lose the race wait and reuse the winner's install instead of duplicating
//! the load. A failed load never replaces a previously installed snapshot.

use std::sync::{Arc, Mutex, OnceLock, RwLock};

use crate::index::CatalogIndex;
use crate::loader::CatalogSource;
use crate::record::CatalogRecord;
use crate::Result;

/// One immutable load of the full catalog table
#[derive(Debug)]
pub struct CatalogSnapshot {
    rows: Vec<CatalogRecord>,
    index: OnceLock<CatalogIndex>,
}

impl CatalogSnapshot {
    /// Wrap loaded rows into a snapshot
    pub fn new(rows: Vec<CatalogRecord>) -> Self {
        Self { rows, index: OnceLock::new() }
    }

    /// All rows, in snapshot order
    pub fn rows(&self) -> &[CatalogRecord] {
        &self.rows
    }

    /// Number of rows in the snapshot
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if the snapshot holds zero rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The derived index, built on first use
    pub fn index(&self) -> &CatalogIndex {
        self.index.get_or_init(|| CatalogIndex::build(&self.rows))
    }

    /// Look up a record by id
    pub fn get(&self, id: &str) -> Option<&CatalogRecord> {
        self.index().position(id).map(|pos| &self.rows[pos])
    }

    /// Records whose `parent_id` equals `id`, in snapshot order
    pub fn children_of(&self, id: &str) -> Vec<&CatalogRecord> {
        self.index()
            .children_of(id)
            .iter()
            .map(|&pos| &self.rows[pos])
            .collect()
    }
}

/// Single-slot snapshot cache shared across concurrent requests
#[derive(Debug, Default)]
pub struct SnapshotCache {
    slot: RwLock<Option<Arc<CatalogSnapshot>>>,
    // Scopes one snapshot reload; see module docs for the race this guards
    reload: Mutex<()>,
}

impl SnapshotCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Currently installed snapshot, or `None` in the cold-start state
    pub fn get(&self) -> Option<Arc<CatalogSnapshot>> {
        self.slot.read().expect("snapshot slot poisoned").clone()
    }

    /// Install a snapshot, replacing any previous one (last write wins)
    pub fn set(&self, snapshot: Arc<CatalogSnapshot>) {
        *self.slot.write().expect("snapshot slot poisoned") = Some(snapshot);
    }

    /// Serve the installed snapshot, loading from `source` on cold start.
    ///
    /// Only load failures propagate; a previously installed snapshot is
    /// never dropped on failure.
    pub fn get_or_load(&self, source: &dyn CatalogSource) -> Result<Arc<CatalogSnapshot>> {
        if let Some(snapshot) = self.get() {
            return Ok(snapshot);
        }

        let _guard = self.reload.lock().expect("reload lock poisoned");
        // Another caller may have finished loading while we waited
        if let Some(snapshot) = self.get() {
            return Ok(snapshot);
        }

        tracing::info!("snapshot cache cold, loading catalog from source");
        let snapshot = Arc::new(source.load()?);
        tracing::info!(rows = snapshot.len(), "catalog snapshot installed");
        self.set(snapshot.clone());
        Ok(snapshot)
    }
}
