//! The remote-data layer: query keys, the shared response cache,
//! debounced search, URL-synchronized pagination, and the list fetcher.

pub mod cache;
pub mod debounce;
pub mod fetcher;
pub mod key;
pub mod location;

pub use cache::{CacheEntry, FetchError, FetchOutcome, FetchStatus, Page, QueryCache};
pub use debounce::{DEBOUNCE_WINDOW, Debouncer};
pub use fetcher::{ListFetcher, ListSnapshot};
pub use key::QueryKey;
pub use location::{
    ListParams, MemoryNavigator, Navigator, PAGE_SIZE, handle_pagination,
};
