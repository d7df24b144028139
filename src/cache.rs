//! Result cache
//!
//! Maps a compound `(id, lang)` key to a previously shaped response and the
//! time it was stored. Entries are valid while the number of whole days
//! elapsed is below the configured threshold; an entry stored 23 hours ago
//! is still fresh under a 1-day expiry because zero whole days have passed.
//!
//! There is no eviction sweep: an expired entry sits in place until the next
//! miss for its key overwrites it. Growth is unbounded, which is acceptable
//! for the bounded-lifetime process model this serves (see DESIGN.md).

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::SystemTime;

const SECONDS_PER_DAY: u64 = 86_400;

/// Build the compound cache key for an id/language pair
pub fn compound_key(id: &str, lang: &str) -> String {
    format!("{}_{}", id, lang)
}

#[derive(Debug, Clone)]
struct CacheEntry<T> {
    payload: T,
    stored_at: SystemTime,
}

/// Time-expiring response cache keyed by compound id+language
#[derive(Debug)]
pub struct ResultCache<T> {
    entries: Mutex<HashMap<String, CacheEntry<T>>>,
    expiry_days: u64,
}

impl<T: Clone> ResultCache<T> {
    pub fn new(expiry_days: u64) -> Self {
        Self { entries: Mutex::new(HashMap::new()), expiry_days }
    }

    /// Fetch the payload for `key` if stored and still fresh at `now`
    pub fn get(&self, key: &str, now: SystemTime) -> Option<T> {
        let entries = self.entries.lock().expect("result cache poisoned");
        let entry = entries.get(key)?;
        if days_elapsed(entry.stored_at, now) < self.expiry_days {
            Some(entry.payload.clone())
        } else {
            None
        }
    }

    /// Store a payload for `key`, superseding any previous entry
    pub fn put(&self, key: &str, payload: T, now: SystemTime) {
        let mut entries = self.entries.lock().expect("result cache poisoned");
        entries.insert(key.to_string(), CacheEntry { payload, stored_at: now });
    }

    /// Number of stored entries, fresh and expired alike
    pub fn len(&self) -> usize {
        self.entries.lock().expect("result cache poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Whole days between two instants, truncating fractional days.
/// A clock that moved backwards reads as zero days elapsed.
fn days_elapsed(stored: SystemTime, now: SystemTime) -> u64 {
    now.duration_since(stored)
        .map(|elapsed| elapsed.as_secs() / SECONDS_PER_DAY)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, UNIX_EPOCH};

    fn at(seconds: u64) -> SystemTime {
        UNIX_EPOCH + Duration::from_secs(seconds)
    }

    const DAY: u64 = SECONDS_PER_DAY;

    #[test]
    fn test_consecutive_reads_are_identical() {
        let cache = ResultCache::new(2);
        cache.put("a_en", "payload".to_string(), at(0));

        let first = cache.get("a_en", at(100)).unwrap();
        let second = cache.get("a_en", at(200)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_fractional_days_truncate() {
        let cache = ResultCache::new(2);
        cache.put("a_en", 1u32, at(0));

        // 23 hours is zero whole days
        assert!(cache.get("a_en", at(23 * 3_600)).is_some());
        // 1 day 23 hours is one whole day, still under a 2-day expiry
        assert!(cache.get("a_en", at(DAY + 23 * 3_600)).is_some());
    }

    #[test]
    fn test_expiry_boundary() {
        let expiry_days = 3;
        let cache = ResultCache::new(expiry_days);
        cache.put("a_en", 1u32, at(0));

        // Still served one day before expiry
        assert!(cache.get("a_en", at((expiry_days - 1) * DAY)).is_some());
        // Recomputed exactly at the expiry threshold
        assert!(cache.get("a_en", at(expiry_days * DAY)).is_none());
    }

    #[test]
    fn test_supersede_refreshes_entry() {
        let cache = ResultCache::new(1);
        cache.put("a_en", 1u32, at(0));
        assert!(cache.get("a_en", at(DAY)).is_none());

        cache.put("a_en", 2u32, at(DAY));
        assert_eq!(cache.get("a_en", at(DAY)), Some(2));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_languages_cache_independently() {
        let cache = ResultCache::new(1);
        cache.put(&compound_key("a", "en"), "english".to_string(), at(0));

        assert!(cache.get(&compound_key("a", "fr"), at(0)).is_none());
        assert_eq!(cache.get(&compound_key("a", "en"), at(0)).unwrap(), "english");
    }

    #[test]
    fn test_backwards_clock_reads_fresh() {
        let cache = ResultCache::new(1);
        cache.put("a_en", 1u32, at(DAY));
        assert!(cache.get("a_en", at(0)).is_some());
    }
}
