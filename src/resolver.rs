//! Relationship resolver
//!
//! Computes self/parent/children/siblings for one record id against an
//! immutable snapshot, caps list lengths in snapshot order, applies
//! language-aware ordering to the capped list, and reports the true totals.
//!
//! Ordering: descending by the language-appropriate title. `en` sorts on the
//! English title; `fr` and every unrecognized language value sort on the
//! French title. The asymmetric fallback mirrors the long-standing observed
//! behavior of the API and is kept bug-for-bug; see DESIGN.md.

use crate::record::RelatedRecord;
use crate::snapshot::CatalogSnapshot;

/// Output of one relationship resolution
#[derive(Debug, Clone)]
pub struct RelationshipResult {
    pub record: Option<RelatedRecord>,
    pub parent: Option<RelatedRecord>,
    /// Resolved parent id. Falls back to the queried id itself when no real
    /// parent exists; downstream logic treats `parent_id == id` as
    /// "no parent".
    pub parent_id: String,
    /// Capped at the configured maximum in snapshot order, then sorted
    pub children: Vec<RelatedRecord>,
    /// True total before capping
    pub child_count: usize,
    /// Only populated when `children` is empty and a real parent exists
    pub siblings: Vec<RelatedRecord>,
    pub sibling_count: usize,
}

/// Resolver over one immutable snapshot
pub struct RelationshipResolver<'a> {
    snapshot: &'a CatalogSnapshot,
    /// Maximum child/sibling list length in a response
    max_related: usize,
}

impl<'a> RelationshipResolver<'a> {
    pub fn new(snapshot: &'a CatalogSnapshot, max_related: usize) -> Self {
        Self { snapshot, max_related }
    }

    /// The record for `id`, projected to its bilingual related form
    pub fn resolve_self(&self, id: &str) -> Option<RelatedRecord> {
        self.snapshot.get(id).map(|record| record.related())
    }

    /// The parent record for `id`, plus the resolved parent id.
    ///
    /// If the record is missing, has no parent reference, or the reference
    /// dangles, the parent is absent and the id falls back to `id` itself.
    pub fn resolve_parent(&self, id: &str) -> (Option<RelatedRecord>, String) {
        let parent = self
            .snapshot
            .get(id)
            .and_then(|record| record.parent_id.as_deref())
            .and_then(|parent_id| self.snapshot.get(parent_id));

        match parent {
            Some(record) => (Some(record.related()), record.id.clone()),
            None => (None, id.to_string()),
        }
    }

    /// Records whose parent is `id`, capped and sorted.
    ///
    /// Returns the capped list and the true total. A self-referential row
    /// never lists itself as its own child.
    pub fn resolve_children(&self, id: &str, lang: &str) -> (Vec<RelatedRecord>, usize) {
        self.collect_related(id, id, lang)
    }

    /// Records sharing `parent_id`, excluding `exclude_id`, capped and sorted
    pub fn resolve_siblings(&self, parent_id: &str, exclude_id: &str, lang: &str) -> (Vec<RelatedRecord>, usize) {
        self.collect_related(parent_id, exclude_id, lang)
    }

    /// Full per-request orchestration: self, parent, children, and siblings
    /// when children are empty and a real parent exists. All four reads
    /// share the same snapshot reference; no coordination needed.
    pub fn resolve(&self, id: &str, lang: &str) -> RelationshipResult {
        let record = self.resolve_self(id);
        let (parent, parent_id) = self.resolve_parent(id);
        let (children, child_count) = self.resolve_children(id, lang);

        let (siblings, sibling_count) = if children.is_empty() && parent.is_some() {
            self.resolve_siblings(&parent_id, id, lang)
        } else {
            (Vec::new(), 0)
        };

        RelationshipResult {
            record,
            parent,
            parent_id,
            children,
            child_count,
            siblings,
            sibling_count,
        }
    }

    fn collect_related(&self, parent_id: &str, exclude_id: &str, lang: &str) -> (Vec<RelatedRecord>, usize) {
        let mut related: Vec<RelatedRecord> = self
            .snapshot
            .children_of(parent_id)
            .into_iter()
            .filter(|record| record.id != exclude_id)
            .map(|record| record.related())
            .collect();

        let total = related.len();
        // Cap in snapshot order, then sort the capped list. Which members
        // survive an over-cap truncation is part of the observed wire
        // behavior; changing to sort-then-cap needs product sign-off.
        related.truncate(self.max_related);
        sort_by_title(&mut related, lang);
        (related, total)
    }
}

/// Descending title sort; `en` on the English title, everything else French
fn sort_by_title(records: &mut [RelatedRecord], lang: &str) {
    if lang == "en" {
        records.sort_by(|a, b| b.description_en.cmp(&a.description_en));
    } else {
        records.sort_by(|a, b| b.description_fr.cmp(&a.description_fr));
    }
}
