//! Modified-date catalog listing
//!
//! A paged projection of the full catalog to `{id, modified, source}`,
//! ordered by modification timestamp descending. Harvest jobs poll this to
//! find records changed since their last run. Timestamps are ISO-8601
//! strings, so the descending order is a plain reverse lexicographic sort;
//! rows without a modification timestamp sort last, in snapshot order.

use serde::{Deserialize, Serialize};

use crate::snapshot::CatalogSnapshot;

/// Default page size when the caller does not pass a limit
pub const DEFAULT_PAGE_LIMIT: usize = 10_000;

/// One row of the modified listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModifiedEntry {
    pub id: String,
    pub modified: Option<String>,
    pub source: Option<String>,
}

/// One page of the modified listing.
///
/// `total` counts every matching row after the source-system filter and
/// before pagination, so callers can derive the page count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModifiedPage {
    pub page: usize,
    pub limit: usize,
    pub total: usize,
    pub results: Vec<ModifiedEntry>,
}

/// Build one page of the listing from a snapshot.
///
/// `page` is 1-based; zero clamps to the first page. A page past the end
/// returns an empty result set with the total unchanged.
pub fn modified_page(
    snapshot: &CatalogSnapshot,
    page: usize,
    limit: usize,
    source_system: Option<&str>,
) -> ModifiedPage {
    let mut entries: Vec<ModifiedEntry> = snapshot
        .rows()
        .iter()
        .filter(|record| {
            source_system.is_none_or(|wanted| record.source_system_name.as_deref() == Some(wanted))
        })
        .map(|record| ModifiedEntry {
            id: record.id.clone(),
            modified: record.date_modified.clone(),
            source: record.source_system_name.clone(),
        })
        .collect();

    entries.sort_by(|a, b| match (&a.modified, &b.modified) {
        (Some(a), Some(b)) => b.cmp(a),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });

    let total = entries.len();
    let lower = page.saturating_sub(1).saturating_mul(limit);
    let results = entries.into_iter().skip(lower).take(limit).collect();

    ModifiedPage { page, limit, total, results }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::CatalogRecord;

    fn dated(id: &str, modified: Option<&str>, source: Option<&str>) -> CatalogRecord {
        let mut record = CatalogRecord::new(id, id, id);
        record.date_modified = modified.map(String::from);
        record.source_system_name = source.map(String::from);
        record
    }

    fn snapshot() -> CatalogSnapshot {
        CatalogSnapshot::new(vec![
            dated("old", Some("2019-03-01T08:00:00"), Some("geonetwork")),
            dated("new", Some("2024-11-30T12:30:00"), Some("eodms")),
            dated("mid", Some("2022-06-15T00:00:00"), Some("geonetwork")),
            dated("undated", None, Some("geonetwork")),
        ])
    }

    #[test]
    fn test_sorted_by_modified_descending() {
        let snapshot = snapshot();
        let page = modified_page(&snapshot, 1, 10, None);

        let ids: Vec<_> = page.results.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["new", "mid", "old", "undated"]);
        assert_eq!(page.total, 4);
    }

    #[test]
    fn test_undated_rows_sort_last() {
        let snapshot = snapshot();
        let page = modified_page(&snapshot, 1, 10, None);

        assert_eq!(page.results.last().unwrap().id, "undated");
        assert!(page.results.last().unwrap().modified.is_none());
    }

    #[test]
    fn test_source_system_filter() {
        let snapshot = snapshot();
        let page = modified_page(&snapshot, 1, 10, Some("geonetwork"));

        assert_eq!(page.total, 3);
        assert!(page.results.iter().all(|e| e.source.as_deref() == Some("geonetwork")));

        let none = modified_page(&snapshot, 1, 10, Some("nope"));
        assert_eq!(none.total, 0);
        assert!(none.results.is_empty());
    }

    #[test]
    fn test_pagination_slices_with_stable_total() {
        let snapshot = snapshot();

        let first = modified_page(&snapshot, 1, 2, None);
        assert_eq!(first.total, 4);
        assert_eq!(first.results.len(), 2);
        assert_eq!(first.results[0].id, "new");

        let second = modified_page(&snapshot, 2, 2, None);
        assert_eq!(second.total, 4);
        assert_eq!(second.results[0].id, "old");

        // Past the end: empty results, total unchanged
        let beyond = modified_page(&snapshot, 5, 2, None);
        assert!(beyond.results.is_empty());
        assert_eq!(beyond.total, 4);
    }

    #[test]
    fn test_page_zero_clamps_to_first_page() {
        let snapshot = snapshot();
        let zero = modified_page(&snapshot, 0, 2, None);
        let first = modified_page(&snapshot, 1, 2, None);
        assert_eq!(zero.results, first.results);
    }
}
