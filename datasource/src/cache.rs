// TTL cache for fetched season documents. Caching is an optimization, never
// a correctness requirement: every failure path degrades to a miss and any
// stale or undecodable entry is removed on the way out.
use crate::documents::DocumentKind;
use crate::metrics_defs::{CACHE_EXPIRED, CACHE_HIT, CACHE_MISS, CACHE_PURGED};
use crate::storage::StorageBackend;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use shared::counter;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Stored cache value: the raw document plus its write time.
#[derive(Debug, Serialize, Deserialize)]
struct Envelope {
    timestamp: u64,
    content: Value,
}

#[derive(Clone)]
pub struct CacheStore {
    backend: Arc<dyn StorageBackend>,
    ttl: Duration,
}

impl CacheStore {
    pub fn new(backend: Arc<dyn StorageBackend>, ttl: Duration) -> Self {
        CacheStore { backend, ttl }
    }

    fn cache_key(kind: DocumentKind, season: i32) -> String {
        format!("f1_{}_{}", kind.as_str(), season)
    }

    /// Returns the cached document iff a valid, unexpired entry exists.
    /// Expired and undecodable entries are removed before reporting a miss.
    pub fn get(&self, kind: DocumentKind, season: i32) -> Option<Value> {
        let key = Self::cache_key(kind, season);

        let raw = match self.backend.get(&key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                counter!(CACHE_MISS).increment(1);
                return None;
            }
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Cache read failed, treating as miss");
                counter!(CACHE_MISS).increment(1);
                return None;
            }
        };

        let envelope: Envelope = match serde_json::from_str(&raw) {
            Ok(envelope) => envelope,
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Corrupt cache entry, purging");
                self.purge(&key);
                counter!(CACHE_MISS).increment(1);
                return None;
            }
        };

        let age_millis = now_millis().saturating_sub(envelope.timestamp);
        if age_millis < self.ttl.as_millis() as u64 {
            tracing::debug!(key = %key, "Cache hit");
            counter!(CACHE_HIT).increment(1);
            Some(envelope.content)
        } else {
            tracing::debug!(key = %key, age_millis, "Cache entry expired");
            counter!(CACHE_EXPIRED).increment(1);
            self.purge(&key);
            None
        }
    }

    /// Best-effort write; storage failures are logged and swallowed.
    pub fn set(&self, kind: DocumentKind, season: i32, content: &Value) {
        let key = Self::cache_key(kind, season);
        let envelope = Envelope {
            timestamp: now_millis(),
            content: content.clone(),
        };

        let raw = match serde_json::to_string(&envelope) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Failed to encode cache entry");
                return;
            }
        };

        match self.backend.set(&key, &raw) {
            Ok(()) => tracing::debug!(key = %key, "Cached document"),
            Err(e) => tracing::warn!(key = %key, error = %e, "Cache write failed"),
        }
    }

    /// Best-effort removal, used when a cached document fails validation.
    pub fn remove(&self, kind: DocumentKind, season: i32) {
        self.purge(&Self::cache_key(kind, season));
    }

    fn purge(&self, key: &str) {
        match self.backend.remove(key) {
            Ok(()) => counter!(CACHE_PURGED).increment(1),
            Err(e) => tracing::warn!(key = %key, error = %e, "Failed to remove cache entry"),
        }
    }
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use serde_json::json;

    fn test_store(ttl: Duration) -> (Arc<MemoryStorage>, CacheStore) {
        let backend = Arc::new(MemoryStorage::new());
        let store = CacheStore::new(backend.clone(), ttl);
        (backend, store)
    }

    #[test]
    fn test_roundtrip_within_ttl() {
        let (_, store) = test_store(Duration::from_secs(60));
        let content = json!({"data": {"x": 1}});

        store.set(DocumentKind::Overview, 2026, &content);
        assert_eq!(store.get(DocumentKind::Overview, 2026), Some(content));
    }

    #[test]
    fn test_fresh_entry_is_a_hit() {
        let (backend, store) = test_store(Duration::from_secs(60 * 60 * 24));

        // Entry written one second ago against a 24h TTL.
        let envelope = json!({
            "timestamp": now_millis() - 1000,
            "content": {"data": {}}
        });
        backend
            .set("f1_overview_2026", &envelope.to_string())
            .unwrap();

        assert_eq!(
            store.get(DocumentKind::Overview, 2026),
            Some(json!({"data": {}}))
        );
    }

    #[test]
    fn test_expired_entry_is_removed() {
        let (backend, store) = test_store(Duration::from_millis(500));

        let envelope = json!({
            "timestamp": now_millis() - 10_000,
            "content": {"data": {}}
        });
        backend
            .set("f1_standings_2026", &envelope.to_string())
            .unwrap();

        assert!(store.get(DocumentKind::Standings, 2026).is_none());
        // Purged on read, not just skipped.
        assert!(backend.get("f1_standings_2026").unwrap().is_none());
    }

    #[test]
    fn test_corrupt_entry_is_removed() {
        let (backend, store) = test_store(Duration::from_secs(60));

        backend.set("f1_overview_2026", "not json at all").unwrap();

        assert!(store.get(DocumentKind::Overview, 2026).is_none());
        assert!(backend.get("f1_overview_2026").unwrap().is_none());
    }

    #[test]
    fn test_kinds_and_seasons_do_not_collide() {
        let (_, store) = test_store(Duration::from_secs(60));

        store.set(DocumentKind::Overview, 2025, &json!(1));
        store.set(DocumentKind::Overview, 2026, &json!(2));
        store.set(DocumentKind::Standings, 2026, &json!(3));

        assert_eq!(store.get(DocumentKind::Overview, 2025), Some(json!(1)));
        assert_eq!(store.get(DocumentKind::Overview, 2026), Some(json!(2)));
        assert_eq!(store.get(DocumentKind::Standings, 2026), Some(json!(3)));
    }

    #[test]
    fn test_remove() {
        let (_, store) = test_store(Duration::from_secs(60));
        store.set(DocumentKind::Overview, 2026, &json!({"data": {}}));
        store.remove(DocumentKind::Overview, 2026);
        assert!(store.get(DocumentKind::Overview, 2026).is_none());
    }
}
