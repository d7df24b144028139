//! Search-analytics sink interface
//!
//! The sink that records access events and aggregates hit counts lives
//! outside this crate; the core only needs a seam to notify it through and
//! to pull per-id hit counts for response enrichment. Sink failures never
//! affect correctness: the service logs and swallows notify errors and
//! substitutes zero counts when the hit-count query fails.

use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use crate::Result;

/// Request-origin attributes forwarded from the transport layer.
///
/// The HTTP surface fills these from the `Referer` header and the
/// `organization` query parameter; standalone CLI invocations leave them
/// empty.
#[derive(Debug, Clone, Default)]
pub struct RequestOrigin {
    pub referrer: Option<String>,
    pub organization: Option<String>,
}

/// One catalog access, reported per request (cache hits included)
#[derive(Debug, Clone, Serialize)]
pub struct AccessEvent {
    pub id: String,
    pub lang: String,
    /// Whether the response came from the result cache
    pub cached: bool,
    pub title_en: String,
    pub title_fr: String,
    pub referrer: Option<String>,
    pub organization: Option<String>,
}

impl AccessEvent {
    pub fn new(id: impl Into<String>, lang: impl Into<String>, cached: bool) -> Self {
        Self {
            id: id.into(),
            lang: lang.into(),
            cached,
            title_en: String::new(),
            title_fr: String::new(),
            referrer: None,
            organization: None,
        }
    }

    pub fn with_titles(mut self, title_en: impl Into<String>, title_fr: impl Into<String>) -> Self {
        self.title_en = title_en.into();
        self.title_fr = title_fr.into();
        self
    }

    pub fn with_origin(mut self, origin: &RequestOrigin) -> Self {
        self.referrer = origin.referrer.clone();
        self.organization = origin.organization.clone();
        self
    }
}

/// Aggregate access counts for one record id
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HitCounts {
    pub last_30_days: u64,
    pub all_time: u64,
}

/// Seam to the external search-analytics service
pub trait AnalyticsSink: Send + Sync {
    /// Record one access event. Fire-and-forget from the caller's view.
    fn notify(&self, event: &AccessEvent) -> Result<()>;

    /// Aggregate hit counts for an id. Best-effort; callers fall back to
    /// zero counts on failure.
    fn hit_counts(&self, id: &str) -> Result<HitCounts>;
}

/// Sink that discards everything; the default when analytics is not wired up
#[derive(Debug, Default)]
pub struct NullSink;

impl AnalyticsSink for NullSink {
    fn notify(&self, _event: &AccessEvent) -> Result<()> {
        Ok(())
    }

    fn hit_counts(&self, _id: &str) -> Result<HitCounts> {
        Ok(HitCounts::default())
    }
}

/// In-process sink holding events for the lifetime of the instance.
///
/// Used by tests and the standalone CLI commands. The 30-day window and the
/// all-time count coincide here because nothing outlives the process.
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<AccessEvent>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the recorded events
    pub fn events(&self) -> Vec<AccessEvent> {
        self.events.lock().expect("analytics events poisoned").clone()
    }
}

impl AnalyticsSink for MemorySink {
    fn notify(&self, event: &AccessEvent) -> Result<()> {
        tracing::debug!(id = %event.id, lang = %event.lang, cached = event.cached, "access event");
        self.events.lock().expect("analytics events poisoned").push(event.clone());
        Ok(())
    }

    fn hit_counts(&self, id: &str) -> Result<HitCounts> {
        let hits = self
            .events
            .lock()
            .expect("analytics events poisoned")
            .iter()
            .filter(|event| event.id == id)
            .count() as u64;
        Ok(HitCounts { last_30_days: hits, all_time: hits })
    }
}
