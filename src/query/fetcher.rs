//! Turns a [`QueryKey`] into a normalized page via the cache.
//!
//! Whatever happens on the wire, the renderer receives a well-formed
//! `{items, total_pages}` shape; failures are recorded as entry status,
//! not propagated. The one exception is an authorization failure, which
//! surfaces immediately so the caller can drop into a login flow.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;

use crate::api::ApiBackend;
use crate::config::RetryProfile;
use crate::error::{ConsoleError, Result};

use super::cache::{CacheEntry, FetchError, FetchOutcome, FetchStatus, Page, QueryCache};
use super::key::QueryKey;
use super::location::ListParams;

const RETRY_BACKOFF: Duration = Duration::from_millis(200);

/// What a mounted table sees after a load
#[derive(Debug, Clone)]
pub struct ListSnapshot {
    pub status: FetchStatus,
    pub page: Page<Value>,
    /// Data survives from before the most recent failure
    pub stale: bool,
}

impl ListSnapshot {
    fn from_entry(entry: &CacheEntry<Value>) -> Self {
        Self {
            status: entry.status,
            page: entry.page(),
            stale: entry.is_stale(),
        }
    }
}

/// Performs list fetches for query keys and publishes into the cache
pub struct ListFetcher {
    backend: Arc<dyn ApiBackend>,
    cache: Arc<QueryCache<Value>>,
    retry: RetryProfile,
}

impl ListFetcher {
    pub fn new(
        backend: Arc<dyn ApiBackend>,
        cache: Arc<QueryCache<Value>>,
        retry: RetryProfile,
    ) -> Self {
        Self {
            backend,
            cache,
            retry,
        }
    }

    /// Derive the cache key for a resource from location-held list state
    pub fn key_for(resource: &str, params: &ListParams) -> QueryKey {
        QueryKey::new(resource)
            .with_search(params.q.clone())
            .with_page(params.page)
    }

    /// Load the page for a key, fetching through the cache as needed.
    ///
    /// Only returns `Err` for authorization failures; every other failure
    /// comes back as a snapshot with error/paused status and an empty (or
    /// stale) page.
    pub async fn load(&self, key: &QueryKey) -> Result<ListSnapshot> {
        let backend = self.backend.clone();
        let max_retries = self.retry.max_retries();
        let fetch_key = key.clone();

        let entry = self
            .cache
            .fetch_with(key, move || {
                fetch_with_retries(backend, fetch_key, max_retries)
            })
            .await;

        if let Some(FetchError::Auth(message)) = &entry.error {
            return Err(ConsoleError::Auth(message.clone()));
        }
        Ok(ListSnapshot::from_entry(&entry))
    }
}

async fn fetch_with_retries(
    backend: Arc<dyn ApiBackend>,
    key: QueryKey,
    max_retries: u32,
) -> FetchOutcome<Value> {
    let search = (!key.search.is_empty()).then_some(key.search.as_str());
    let mut attempt: u32 = 0;

    loop {
        let result = backend
            .fetch_page(&key.resource, key.page, search, &key.extra)
            .await;

        let error = match result {
            Ok(envelope) => {
                let message = envelope.message.clone();
                return match envelope.into_page() {
                    Some(page) => FetchOutcome::Page(page),
                    // The server said no; that is an answer, not a glitch.
                    None => FetchOutcome::Failed(FetchError::Server(message)),
                };
            }
            Err(err) => err,
        };

        match error {
            ConsoleError::Auth(message) => {
                tracing::warn!(key = %key, "authorization failure, not retrying");
                return FetchOutcome::Failed(FetchError::Auth(message));
            }
            ConsoleError::Offline(message) => {
                return FetchOutcome::Failed(FetchError::Offline(message));
            }
            err if attempt < max_retries => {
                attempt += 1;
                tracing::warn!(key = %key, attempt, error = %err, "list fetch failed, retrying");
                tokio::time::sleep(RETRY_BACKOFF * attempt).await;
            }
            ConsoleError::Api(message) => {
                return FetchOutcome::Failed(FetchError::Server(Some(message)));
            }
            err => {
                return FetchOutcome::Failed(FetchError::Transport(err.to_string()));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::sync::atomic::{AtomicU32, Ordering};

    use async_trait::async_trait;
    use serde_json::json;

    use crate::api::{ListEnvelope, MutationEnvelope};

    use super::*;

    /// Backend that fails a fixed number of times before answering
    struct FlakyBackend {
        failures_before_success: u32,
        calls: AtomicU32,
        failure: fn() -> ConsoleError,
    }

    impl FlakyBackend {
        fn new(failures_before_success: u32, failure: fn() -> ConsoleError) -> Self {
            Self {
                failures_before_success,
                calls: AtomicU32::new(0),
                failure,
            }
        }
    }

    #[async_trait]
    impl ApiBackend for FlakyBackend {
        async fn fetch_page(
            &self,
            _resource: &str,
            _page: u32,
            _search: Option<&str>,
            _extra: &BTreeMap<String, String>,
        ) -> Result<ListEnvelope> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call < self.failures_before_success {
                return Err((self.failure)());
            }
            Ok(serde_json::from_value(json!({
                "success": true,
                "data": { "items": [{"id": 1}], "totalPages": 1 }
            }))
            .unwrap())
        }

        async fn create(&self, _: &str, _: Value) -> Result<MutationEnvelope> {
            unimplemented!("list-only backend")
        }
        async fn update(&self, _: &str, _: &str, _: Value) -> Result<MutationEnvelope> {
            unimplemented!("list-only backend")
        }
        async fn delete(&self, _: &str, _: &str) -> Result<MutationEnvelope> {
            unimplemented!("list-only backend")
        }
    }

    fn fetcher(backend: Arc<FlakyBackend>, retry: RetryProfile) -> ListFetcher {
        ListFetcher::new(backend, Arc::new(QueryCache::new()), retry)
    }

    #[tokio::test(start_paused = true)]
    async fn test_transient_failures_retry_in_production() {
        let backend = Arc::new(FlakyBackend::new(2, || {
            ConsoleError::Api("server error: status 502".into())
        }));
        let snapshot = fetcher(backend.clone(), RetryProfile::Production)
            .load(&QueryKey::new("courses"))
            .await
            .unwrap();

        assert_eq!(backend.calls.load(Ordering::SeqCst), 3);
        assert_eq!(snapshot.status, FetchStatus::Success);
        assert_eq!(snapshot.page.items.len(), 1);
    }

    #[tokio::test]
    async fn test_development_profile_does_not_retry() {
        let backend = Arc::new(FlakyBackend::new(1, || {
            ConsoleError::Api("server error: status 502".into())
        }));
        let snapshot = fetcher(backend.clone(), RetryProfile::Development)
            .load(&QueryKey::new("courses"))
            .await
            .unwrap();

        assert_eq!(backend.calls.load(Ordering::SeqCst), 1);
        assert_eq!(snapshot.status, FetchStatus::Error);
        assert!(snapshot.page.items.is_empty());
    }

    #[tokio::test]
    async fn test_auth_failure_surfaces_without_retry() {
        let backend = Arc::new(FlakyBackend::new(u32::MAX, || {
            ConsoleError::Auth("request rejected with status 401".into())
        }));
        let result = fetcher(backend.clone(), RetryProfile::Production)
            .load(&QueryKey::new("courses"))
            .await;

        assert_eq!(backend.calls.load(Ordering::SeqCst), 1);
        assert!(matches!(result, Err(ConsoleError::Auth(_))));
    }

    #[tokio::test]
    async fn test_offline_pauses_without_retry() {
        let backend = Arc::new(FlakyBackend::new(u32::MAX, || {
            ConsoleError::Offline("connection refused".into())
        }));
        let snapshot = fetcher(backend.clone(), RetryProfile::Production)
            .load(&QueryKey::new("courses"))
            .await
            .unwrap();

        assert_eq!(backend.calls.load(Ordering::SeqCst), 1);
        assert_eq!(snapshot.status, FetchStatus::Paused);
    }

    #[tokio::test]
    async fn test_key_for_uses_debounced_location_state() {
        let params = ListParams { q: "algebra".into(), page: 4 };
        let key = ListFetcher::key_for("courses", &params);
        assert_eq!(key.resource, "courses");
        assert_eq!(key.search, "algebra");
        assert_eq!(key.page, 4);
    }
}
