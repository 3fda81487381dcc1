//! Shared response cache for list fetches.
//!
//! Entries are keyed by the full [`QueryKey`] and live for the process
//! lifetime; explicit invalidation marks them idle so the next read
//! refetches. At most one network call is in flight per key: concurrent
//! readers of the same key attach to one shared future instead of racing
//! a duplicate request.

use std::future::Future;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use jiff::Timestamp;

use super::key::QueryKey;

/// Lifecycle state of one cache entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchStatus {
    /// Created but never fetched, or explicitly invalidated
    #[default]
    Idle,
    /// A network call is in flight
    Fetching,
    /// Data is populated and current
    Success,
    /// The last fetch failed; any previous data is retained
    Error,
    /// Connectivity is gone; resumes on the next read
    Paused,
}

/// One page of a server-paginated list, already normalized
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_pages: u32,
}

impl<T> Page<T> {
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            total_pages: 0,
        }
    }

    pub fn new(items: Vec<T>, total_pages: u32) -> Self {
        Self { items, total_pages }
    }
}

/// Why a fetch failed, recorded on the entry rather than thrown
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// 401/403; never retried, surfaced so the caller can redirect to login
    Auth(String),
    /// The server answered with `success: false` or a 5xx
    Server(Option<String>),
    /// Transport-level failure other than lost connectivity
    Transport(String),
    /// No connectivity; the entry parks as `Paused`
    Offline(String),
}

/// Result of one fetch attempt, fed back into the cache
#[derive(Debug, Clone)]
pub enum FetchOutcome<T> {
    Page(Page<T>),
    Failed(FetchError),
}

/// The stored result (and status) for one QueryKey
#[derive(Debug, Clone)]
pub struct CacheEntry<T> {
    pub status: FetchStatus,
    /// Retained across errors so the table can show stale rows while retrying
    pub data: Option<Page<T>>,
    pub error: Option<FetchError>,
    pub fetched_at: Option<Timestamp>,
}

// Written out so an idle entry exists for any item type
impl<T> Default for CacheEntry<T> {
    fn default() -> Self {
        Self {
            status: FetchStatus::default(),
            data: None,
            error: None,
            fetched_at: None,
        }
    }
}

impl<T: Clone> CacheEntry<T> {
    /// Data for rendering: the last good page, or an empty one
    pub fn page(&self) -> Page<T> {
        self.data.clone().unwrap_or_else(Page::empty)
    }

    /// Whether `data` survives from before the recorded failure
    pub fn is_stale(&self) -> bool {
        self.data.is_some() && matches!(self.status, FetchStatus::Error | FetchStatus::Paused)
    }
}

type SharedFetch<T> = Shared<BoxFuture<'static, FetchOutcome<T>>>;

/// Cache of in-flight and completed list fetches
pub struct QueryCache<T: Clone + Send + Sync + 'static> {
    entries: DashMap<QueryKey, CacheEntry<T>>,
    in_flight: DashMap<QueryKey, SharedFetch<T>>,
}

impl<T: Clone + Send + Sync + 'static> Default for QueryCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + Send + Sync + 'static> QueryCache<T> {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
            in_flight: DashMap::new(),
        }
    }

    /// Read the entry for a key, creating an idle one if absent
    pub fn get(&self, key: &QueryKey) -> CacheEntry<T> {
        self.entries
            .entry(key.clone())
            .or_default()
            .value()
            .clone()
    }

    /// Read the entry through the cache, fetching if it is not current.
    ///
    /// `make` is only called when no fetch for this key is already in
    /// flight; a concurrent reader awaits the same shared outcome.
    pub async fn fetch_with<F>(&self, key: &QueryKey, make: impl FnOnce() -> F) -> CacheEntry<T>
    where
        F: Future<Output = FetchOutcome<T>> + Send + 'static,
    {
        {
            let entry = self.entries.entry(key.clone()).or_default();
            if entry.status == FetchStatus::Success {
                return entry.value().clone();
            }
        }

        // Check-and-insert through one entry lock so two workers can never
        // both miss and start duplicate requests for the same key.
        let fetch = match self.in_flight.entry(key.clone()) {
            Entry::Occupied(existing) => existing.get().clone(),
            Entry::Vacant(slot) => {
                self.mark_fetching(key);
                let shared = make().boxed().shared();
                slot.insert(shared.clone());
                shared
            }
        };

        let outcome = fetch.await;

        // Whichever awaiter resolves first clears the in-flight slot and
        // records the outcome; the rest just read the settled entry.
        if self.in_flight.remove(key).is_some() {
            self.record(key, outcome);
        }
        self.get(key)
    }

    /// Mark matching entries idle so their next read refetches.
    ///
    /// Returns how many entries were invalidated. In-flight fetches are not
    /// canceled; a late resolution lands under its own key and is harmless.
    pub fn invalidate(&self, predicate: impl Fn(&QueryKey) -> bool) -> usize {
        let mut count = 0;
        for mut entry in self.entries.iter_mut() {
            if predicate(entry.key()) {
                entry.value_mut().status = FetchStatus::Idle;
                count += 1;
            }
        }
        count
    }

    /// Invalidate every key belonging to a resource, regardless of
    /// search term, page, or extra params
    pub fn invalidate_resource(&self, resource: &str) -> usize {
        let count = self.invalidate(|key| key.is_for_resource(resource));
        tracing::debug!(resource, count, "invalidated cache entries");
        count
    }

    fn mark_fetching(&self, key: &QueryKey) {
        let mut entry = self.entries.entry(key.clone()).or_default();
        entry.value_mut().status = FetchStatus::Fetching;
    }

    fn record(&self, key: &QueryKey, outcome: FetchOutcome<T>) {
        let mut entry = self.entries.entry(key.clone()).or_default();
        let entry = entry.value_mut();
        match outcome {
            FetchOutcome::Page(page) => {
                entry.status = FetchStatus::Success;
                entry.data = Some(page);
                entry.error = None;
                entry.fetched_at = Some(Timestamp::now());
            }
            FetchOutcome::Failed(error) => {
                entry.status = match error {
                    FetchError::Offline(_) => FetchStatus::Paused,
                    _ => FetchStatus::Error,
                };
                // entry.data is deliberately left alone: stale-while-retrying
                entry.error = Some(error);
            }
        }
    }
}
