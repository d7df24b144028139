//! Catalog service - request orchestration and response shaping
//!
//! Ties the layers together per request: result-cache lookup, snapshot
//! cache (loading on cold start), relationship or detail resolution,
//! analytics notification, and result-cache store. Every code path returns
//! a well-formed response value with `statusCode: 200`; errors travel in
//! the body per the long-standing compatibility contract of this API.

use std::time::SystemTime;

use serde::Serialize;
use serde_json::json;

use crate::analytics::{AccessEvent, AnalyticsSink, HitCounts, NullSink, RequestOrigin};
use crate::cache::{compound_key, ResultCache};
use crate::detail::{detail_item, Language};
use crate::listing::{modified_page, ModifiedPage};
use crate::loader::CatalogSource;
use crate::record::RelatedRecord;
use crate::resolver::RelationshipResolver;
use crate::snapshot::SnapshotCache;
use crate::Result;

const USAGE_RELATED: &str = "No id parameter was passed. Usage: ?id=XYZ";
const STORAGE_ERROR_BODY: &str = "Error accessing catalog snapshot";

const USAGE_DETAIL_EN: &str = "id and language must be provided. Example usage: ?id=XYZ&lang=en";
const USAGE_DETAIL_FR: &str =
    "id et la langue doivent être fournis. Exemple d'utilisation : ?id=XYZ&lang=fr";
const NOT_FOUND_EN: &str = "uuid not found";
const NOT_FOUND_FR: &str = "uuid introuvable";
const STORAGE_ERROR_EN: &str = "Error accessing the catalog snapshot";
const STORAGE_ERROR_FR: &str = "Erreur d'accès à l'instantané du catalogue";

/// Relationship-query response.
///
/// Parameter and storage failures surface as a `Message` with a descriptive
/// body; there is no non-200 status in this API.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RelatedResponse {
    Message {
        #[serde(rename = "statusCode")]
        status_code: u16,
        body: String,
    },
    Related {
        #[serde(rename = "statusCode")]
        status_code: u16,
        sibling_count: usize,
        child_count: usize,
        #[serde(rename = "self")]
        record: Option<RelatedRecord>,
        parent: Option<RelatedRecord>,
        /// `null` when empty, never `[]`
        sibling: Option<Vec<RelatedRecord>>,
        child: Option<Vec<RelatedRecord>>,
    },
}

impl RelatedResponse {
    fn message(body: impl Into<String>) -> Self {
        RelatedResponse::Message { status_code: 200, body: body.into() }
    }
}

/// Bilingual status message carried by detail responses
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BilingualMessage {
    pub message_en: String,
    pub message_fr: String,
}

impl BilingualMessage {
    fn new(en: &str, fr: &str) -> Self {
        Self { message_en: en.to_string(), message_fr: fr.to_string() }
    }

    fn empty() -> Self {
        Self::new("", "")
    }
}

/// Detail-query response
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub message: BilingualMessage,
    /// `{"Items": [...]}` on success, `null` otherwise
    pub body: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hits: Option<HitCounts>,
}

impl DetailResponse {
    fn message(en: &str, fr: &str) -> Self {
        Self { status_code: 200, message: BilingualMessage::new(en, fr), body: None, hits: None }
    }
}

/// Aggregate view of the loaded catalog and cache population
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CatalogStats {
    pub rows: usize,
    pub roots: usize,
    pub parented: usize,
    pub distinct_parents: usize,
    pub related_cache_entries: usize,
    pub detail_cache_entries: usize,
}

impl std::fmt::Display for CatalogStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Catalog Statistics:")?;
        writeln!(f, "  Rows: {}", self.rows)?;
        writeln!(f, "  Root records: {}", self.roots)?;
        writeln!(f, "  Parented records: {}", self.parented)?;
        writeln!(f, "  Distinct parents: {}", self.distinct_parents)?;
        writeln!(f, "  Cached relationship results: {}", self.related_cache_entries)?;
        write!(f, "  Cached detail results: {}", self.detail_cache_entries)
    }
}

/// Tunables carried from config/CLI into the service
#[derive(Debug, Clone, Copy)]
pub struct ServiceSettings {
    /// Maximum child/sibling list length in a response
    pub max_related: usize,
    /// Result-cache expiry threshold in whole days
    pub cache_expiry_days: u64,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self { max_related: 10, cache_expiry_days: 7 }
    }
}

/// The per-process catalog service.
///
/// Owns both cache tiers and the seams to the snapshot store and the
/// analytics sink. Constructed once per process instance and shared by
/// reference across requests; cache effectiveness is therefore best-effort,
/// scoped to how long the instance stays warm.
pub struct CatalogService {
    source: Box<dyn CatalogSource>,
    sink: Box<dyn AnalyticsSink>,
    snapshots: SnapshotCache,
    related_cache: ResultCache<RelatedResponse>,
    detail_cache: ResultCache<DetailResponse>,
    max_related: usize,
}

impl CatalogService {
    pub fn new(source: Box<dyn CatalogSource>, settings: ServiceSettings) -> Self {
        Self {
            source,
            sink: Box::new(NullSink),
            snapshots: SnapshotCache::new(),
            related_cache: ResultCache::new(settings.cache_expiry_days),
            detail_cache: ResultCache::new(settings.cache_expiry_days),
            max_related: settings.max_related,
        }
    }

    /// Wire up an analytics sink (the default discards events)
    pub fn with_sink(mut self, sink: Box<dyn AnalyticsSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Relationship query. `lang` defaults to `en` when absent.
    pub fn related(&self, id: Option<&str>, lang: Option<&str>) -> RelatedResponse {
        self.related_for(id, lang, RequestOrigin::default())
    }

    /// Relationship query carrying request-origin attributes for analytics
    pub fn related_for(&self, id: Option<&str>, lang: Option<&str>, origin: RequestOrigin) -> RelatedResponse {
        self.related_at(id, lang, origin, SystemTime::now())
    }

    /// Relationship query with an explicit clock, for expiry-sensitive tests
    pub fn related_at(
        &self,
        id: Option<&str>,
        lang: Option<&str>,
        origin: RequestOrigin,
        now: SystemTime,
    ) -> RelatedResponse {
        let Some(id) = id else {
            return RelatedResponse::message(USAGE_RELATED);
        };
        let lang = lang.unwrap_or("en");
        let key = compound_key(id, lang);

        if let Some(cached) = self.related_cache.get(&key, now) {
            self.notify(AccessEvent::new(id, lang, true).with_origin(&origin));
            return cached;
        }

        let snapshot = match self.snapshots.get_or_load(&*self.source) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::error!(error = %e, "relationship query failed to load snapshot");
                // Not cached: the next request should retry the load
                return RelatedResponse::message(STORAGE_ERROR_BODY);
            }
        };

        let result = RelationshipResolver::new(&snapshot, self.max_related).resolve(id, lang);

        let mut event = AccessEvent::new(id, lang, false).with_origin(&origin);
        if let Some(record) = &result.record {
            event = event.with_titles(&record.description_en, &record.description_fr);
        }
        self.notify(event);

        let response = RelatedResponse::Related {
            status_code: 200,
            sibling_count: result.sibling_count,
            child_count: result.child_count,
            record: result.record,
            parent: result.parent,
            sibling: (!result.siblings.is_empty()).then_some(result.siblings),
            child: (!result.children.is_empty()).then_some(result.children),
        };

        self.related_cache.put(&key, response.clone(), now);
        response
    }

    /// Detail query. Both `id` and a valid `lang` are required.
    pub fn detail(&self, id: Option<&str>, lang: Option<&str>) -> DetailResponse {
        self.detail_for(id, lang, RequestOrigin::default())
    }

    /// Detail query carrying request-origin attributes for analytics
    pub fn detail_for(&self, id: Option<&str>, lang: Option<&str>, origin: RequestOrigin) -> DetailResponse {
        self.detail_at(id, lang, origin, SystemTime::now())
    }

    /// Detail query with an explicit clock
    pub fn detail_at(
        &self,
        id: Option<&str>,
        lang: Option<&str>,
        origin: RequestOrigin,
        now: SystemTime,
    ) -> DetailResponse {
        let (Some(id), Some(lang)) = (id, lang.and_then(Language::parse)) else {
            return DetailResponse::message(USAGE_DETAIL_EN, USAGE_DETAIL_FR);
        };
        let key = compound_key(id, lang.as_str());

        if let Some(cached) = self.detail_cache.get(&key, now) {
            self.notify(AccessEvent::new(id, lang.as_str(), true).with_origin(&origin));
            return cached;
        }

        let snapshot = match self.snapshots.get_or_load(&*self.source) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::error!(error = %e, "detail query failed to load snapshot");
                return DetailResponse::message(STORAGE_ERROR_EN, STORAGE_ERROR_FR);
            }
        };

        let Some(record) = snapshot.get(id) else {
            // Unknown ids are not cached; the record may appear in a later
            // snapshot while the process is still warm
            return DetailResponse::message(NOT_FOUND_EN, NOT_FOUND_FR);
        };

        self.notify(
            AccessEvent::new(id, lang.as_str(), false)
                .with_titles(&record.title_en, &record.title_fr)
                .with_origin(&origin),
        );

        let hits = self.sink.hit_counts(id).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "hit count lookup failed, substituting zeroes");
            HitCounts::default()
        });

        let response = DetailResponse {
            status_code: 200,
            message: BilingualMessage::empty(),
            body: Some(json!({ "Items": [detail_item(record, lang)] })),
            hits: Some(hits),
        };

        self.detail_cache.put(&key, response.clone(), now);
        response
    }

    /// Paged modified-date listing, loading on cold start.
    ///
    /// Unlike the relationship and detail queries this surface reports real
    /// errors; harvest jobs polling it need to distinguish an outage from an
    /// empty page. Results are not cached: pollers want the live ordering.
    pub fn modified(&self, page: usize, limit: usize, source_system: Option<&str>) -> Result<ModifiedPage> {
        let snapshot = self.snapshots.get_or_load(&*self.source)?;
        Ok(modified_page(&snapshot, page, limit, source_system))
    }

    /// Aggregate catalog and cache statistics, loading on cold start
    pub fn stats(&self) -> Result<CatalogStats> {
        let snapshot = self.snapshots.get_or_load(&*self.source)?;
        let parented = snapshot.rows().iter().filter(|r| r.parent_id.is_some()).count();

        Ok(CatalogStats {
            rows: snapshot.len(),
            roots: snapshot.len() - parented,
            parented,
            distinct_parents: snapshot.index().parent_count(),
            related_cache_entries: self.related_cache.len(),
            detail_cache_entries: self.detail_cache.len(),
        })
    }

    /// Fire-and-forget analytics notification
    fn notify(&self, event: AccessEvent) {
        if let Err(e) = self.sink.notify(&event) {
            tracing::warn!(error = %e, id = %event.id, "analytics notify failed, swallowing");
        }
    }
}
