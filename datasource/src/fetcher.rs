//! Cache-first document fetcher.
//!
//! Consults the cache store, falls back to one HTTP GET against the season
//! API, and populates the cache on success. No retry happens at this layer;
//! retry policy, if any, belongs to the caller. Concurrent fetches for the
//! same (kind, season) are not de-duplicated: request volume is
//! caller-initiated and low-frequency, so a redundant in-flight request is
//! cheaper than coordinating them.

use crate::cache::CacheStore;
use crate::documents::{DocumentKind, OverviewDocument, StandingsDocument};
use crate::metrics_defs::{FETCH_ERRORS, FETCH_REQUESTS};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::Value;
use shared::counter;

#[derive(thiserror::Error, Debug)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    HttpStatus(StatusCode),

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

pub struct Fetcher {
    client: reqwest::Client,
    base_url: String,
    cache: CacheStore,
}

impl Fetcher {
    pub fn new(base_url: &str, cache: CacheStore) -> Self {
        Fetcher {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            cache,
        }
    }

    pub async fn fetch_overview(&self, season: i32) -> Result<OverviewDocument, FetchError> {
        self.fetch(DocumentKind::Overview, season).await
    }

    pub async fn fetch_standings(&self, season: i32) -> Result<StandingsDocument, FetchError> {
        self.fetch(DocumentKind::Standings, season).await
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        kind: DocumentKind,
        season: i32,
    ) -> Result<T, FetchError> {
        if let Some(cached) = self.cache.get(kind, season) {
            match serde_json::from_value::<T>(cached) {
                Ok(document) => return Ok(document),
                Err(e) => {
                    // A cached document that no longer validates is purged
                    // and refetched, same as any other corrupt entry.
                    tracing::warn!(
                        kind = kind.as_str(),
                        season,
                        error = %e,
                        "Cached document failed validation, refetching"
                    );
                    self.cache.remove(kind, season);
                }
            }
        }

        let url = format!("{}/{}/{}.json", self.base_url, kind.as_str(), season);
        tracing::debug!(url = %url, "Fetching document");
        counter!(FETCH_REQUESTS).increment(1);

        let response = self.client.get(&url).send().await.inspect_err(|e| {
            tracing::error!(url = %url, error = %e, "Network error");
            counter!(FETCH_ERRORS).increment(1);
        })?;

        if response.status() != StatusCode::OK {
            tracing::error!(url = %url, status = %response.status(), "Unexpected HTTP status");
            counter!(FETCH_ERRORS).increment(1);
            return Err(FetchError::HttpStatus(response.status()));
        }

        let body = response.text().await?;
        let raw: Value = serde_json::from_str(&body).inspect_err(|_| {
            counter!(FETCH_ERRORS).increment(1);
        })?;
        let document: T = serde_json::from_value(raw.clone()).inspect_err(|_| {
            counter!(FETCH_ERRORS).increment(1);
        })?;

        // Cached only after the document validates, so the cache never
        // holds a payload the typed layer would reject.
        self.cache.set(kind, season, &raw);
        Ok(document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStorage, StorageBackend};
    use serde_json::json;
    use std::sync::Arc;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn overview_body() -> Value {
        json!({
            "data": {
                "monaco": {
                    "round": 7,
                    "name": "Monaco Grand Prix",
                    "circuit": {"city": "Monte Carlo", "country": "Monaco", "name": "Circuit de Monaco"},
                    "date": "2026-05-24",
                    "schedule": []
                }
            }
        })
    }

    fn test_fetcher(base_url: &str) -> (Arc<MemoryStorage>, Fetcher) {
        let backend = Arc::new(MemoryStorage::new());
        let cache = CacheStore::new(backend.clone(), Duration::from_secs(60 * 60 * 12));
        (backend, Fetcher::new(base_url, cache))
    }

    #[tokio::test]
    async fn test_fetch_populates_cache() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/overview/2026.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(overview_body()))
            .expect(1)
            .mount(&server)
            .await;

        let (backend, fetcher) = test_fetcher(&server.uri());

        let doc = fetcher.fetch_overview(2026).await.unwrap();
        assert_eq!(doc.data.get("monaco").unwrap().round, 7);
        assert!(backend.get("f1_overview_2026").unwrap().is_some());

        // Second fetch is served from cache: the mock's expect(1) would
        // fail on a second network call.
        let doc = fetcher.fetch_overview(2026).await.unwrap();
        assert_eq!(doc.data.get("monaco").unwrap().name, "Monaco Grand Prix");
    }

    #[tokio::test]
    async fn test_cache_hit_skips_network() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(overview_body()))
            .expect(0)
            .mount(&server)
            .await;

        let (_, fetcher) = test_fetcher(&server.uri());
        fetcher
            .cache
            .set(DocumentKind::Overview, 2026, &overview_body());

        let doc = fetcher.fetch_overview(2026).await.unwrap();
        assert_eq!(doc.data.len(), 1);
    }

    #[tokio::test]
    async fn test_invalid_cached_document_is_refetched() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/overview/2026.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(overview_body()))
            .expect(1)
            .mount(&server)
            .await;

        let (backend, fetcher) = test_fetcher(&server.uri());
        // Valid JSON, but not a valid overview document.
        fetcher
            .cache
            .set(DocumentKind::Overview, 2026, &json!({"unexpected": true}));

        let doc = fetcher.fetch_overview(2026).await.unwrap();
        assert_eq!(doc.data.get("monaco").unwrap().round, 7);
        // The bad entry was replaced with the fetched document.
        let stored = backend.get("f1_overview_2026").unwrap().unwrap();
        assert!(stored.contains("Monaco Grand Prix"));
    }

    #[tokio::test]
    async fn test_non_200_is_an_http_status_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/standings/2026.json"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let (backend, fetcher) = test_fetcher(&server.uri());
        let err = fetcher.fetch_standings(2026).await.unwrap_err();
        assert!(matches!(
            err,
            FetchError::HttpStatus(status) if status == StatusCode::NOT_FOUND
        ));
        // Failures never populate the cache.
        assert!(backend.get("f1_standings_2026").unwrap().is_none());
    }

    #[tokio::test]
    async fn test_unparseable_body_is_a_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/overview/2026.json"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{not json"))
            .mount(&server)
            .await;

        let (backend, fetcher) = test_fetcher(&server.uri());
        let err = fetcher.fetch_overview(2026).await.unwrap_err();
        assert!(matches!(err, FetchError::Parse(_)));
        assert!(backend.get("f1_overview_2026").unwrap().is_none());
    }

    #[tokio::test]
    async fn test_malformed_document_is_a_parse_error_and_not_cached() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/overview/2026.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": "nope"})))
            .mount(&server)
            .await;

        let (backend, fetcher) = test_fetcher(&server.uri());
        let err = fetcher.fetch_overview(2026).await.unwrap_err();
        assert!(matches!(err, FetchError::Parse(_)));
        assert!(backend.get("f1_overview_2026").unwrap().is_none());
    }
}
