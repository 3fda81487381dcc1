//! Cache keys for server-paginated list fetches.
//!
//! A key must carry every parameter that affects the server response;
//! leaving one out aliases unrelated responses onto the same cache entry,
//! which shows up as stale-for-a-different-filter tables. That discipline
//! is the load-bearing invariant of the whole data layer.

use std::collections::BTreeMap;
use std::fmt;

/// Identifies one variant of a server list fetch
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    /// Resource segment of the endpoint, e.g. "courses"
    pub resource: String,
    /// Debounced search term ("" when unfiltered)
    pub search: String,
    /// 1-based page number
    pub page: u32,
    /// Any further parameters the endpoint filters on; BTreeMap so two keys
    /// with the same pairs compare equal regardless of insertion order
    pub extra: BTreeMap<String, String>,
}

impl QueryKey {
    /// Create a key for an unfiltered first page
    pub fn new(resource: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            search: String::new(),
            page: 1,
            extra: BTreeMap::new(),
        }
    }

    /// Set the search term
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    /// Set the page, clamping 0 up to the 1-based minimum
    pub fn with_page(mut self, page: u32) -> Self {
        self.page = page.max(1);
        self
    }

    /// Add an extra query parameter
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.insert(name.into(), value.into());
        self
    }

    /// Whether this key belongs to the given resource, regardless of
    /// search/page/extra. Invalidation after a mutation matches on this.
    pub fn is_for_resource(&self, resource: &str) -> bool {
        self.resource == resource
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}?page={}", self.resource, self.page)?;
        if !self.search.is_empty() {
            write!(f, "&q={}", self.search)?;
        }
        for (name, value) in &self.extra {
            write!(f, "&{}={}", name, value)?;
        }
        Ok(())
    }
}
