//! Catalog index
//!
//! Secondary structures built once per snapshot load:
//! - `by_id`: id → row position
//! - `children`: parent id → row positions of its children
//!
//! Building is a pure O(n) pass over the snapshot rows. Row positions within
//! a children group follow snapshot order; presentation order is decided by
//! the resolver, not here.

use std::collections::HashMap;

use crate::record::CatalogRecord;

/// Derived, read-only lookup structures over one snapshot
#[derive(Debug, Default)]
pub struct CatalogIndex {
    /// id → position in the snapshot row vector
    by_id: HashMap<String, usize>,
    /// parent id → positions of rows listing it as parent, in snapshot order
    children: HashMap<String, Vec<usize>>,
}

impl CatalogIndex {
    /// Build the index from snapshot rows.
    ///
    /// Duplicate ids are not expected in a snapshot; if one slips through,
    /// the last row wins for `by_id`, matching last-write-wins elsewhere.
    pub fn build(rows: &[CatalogRecord]) -> Self {
        let mut by_id = HashMap::with_capacity(rows.len());
        let mut children: HashMap<String, Vec<usize>> = HashMap::new();

        for (pos, record) in rows.iter().enumerate() {
            by_id.insert(record.id.clone(), pos);
            if let Some(parent_id) = &record.parent_id {
                children.entry(parent_id.clone()).or_default().push(pos);
            }
        }

        Self { by_id, children }
    }

    /// Row position for an id, if present
    pub fn position(&self, id: &str) -> Option<usize> {
        self.by_id.get(id).copied()
    }

    /// Row positions of records whose `parent_id` equals `id`
    pub fn children_of(&self, id: &str) -> &[usize] {
        self.children.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of indexed records
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    /// Check if the index is empty
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    /// Number of distinct parent ids referenced by at least one row
    pub fn parent_count(&self) -> usize {
        self.children.len()
    }
}
