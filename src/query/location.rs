//! URL-synchronized list state.
//!
//! The navigable location is the durable source of truth for `q` and
//! `page`: reloads, back/forward, and shareable links all reproduce the
//! same screen. List state is only ever changed by navigating to a new
//! location; mutating local copies without navigating lets the rendered
//! screen and the URL drift apart.

use url::Url;

/// Rows per page across every list screen
pub const PAGE_SIZE: usize = 10;

/// List state read from a location's query parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListParams {
    /// Search term, default ""
    pub q: String,
    /// 1-based page, default 1; invalid input fails closed to 1
    pub page: u32,
}

impl Default for ListParams {
    fn default() -> Self {
        Self {
            q: String::new(),
            page: 1,
        }
    }
}

impl ListParams {
    /// Parse from a location. Missing, non-numeric, or out-of-range values
    /// never error; they fall back to the defaults.
    pub fn from_url(url: &Url) -> Self {
        let mut params = ListParams::default();
        for (name, value) in url.query_pairs() {
            match name.as_ref() {
                "q" => params.q = value.into_owned(),
                "page" => {
                    params.page = value.parse::<u32>().ok().filter(|p| *p >= 1).unwrap_or(1);
                }
                _ => {}
            }
        }
        params
    }

    /// 0-based page index mirror for the table layer
    pub fn page_index(&self) -> usize {
        (self.page - 1) as usize
    }

    /// Change the search term. A filter change invalidates the meaning of
    /// the old page, so the page resets to 1.
    pub fn with_search(&self, q: impl Into<String>) -> Self {
        Self {
            q: q.into(),
            page: 1,
        }
    }

    /// Change the page, keeping the search term
    pub fn with_page(&self, page: u32) -> Self {
        Self {
            q: self.q.clone(),
            page: page.max(1),
        }
    }

    fn write_to(&self, url: &mut Url) {
        let mut pairs = url.query_pairs_mut();
        pairs.clear();
        if !self.q.is_empty() {
            pairs.append_pair("q", &self.q);
        }
        pairs.append_pair("page", &self.page.to_string());
    }
}

/// The navigate-to-a-new-location primitive the console runs against
pub trait Navigator {
    /// Replace the current location with `path` and the given list state
    fn navigate(&mut self, path: &str, params: &ListParams);

    /// The current location
    fn current(&self) -> &Url;

    /// List state of the current location
    fn params(&self) -> ListParams {
        ListParams::from_url(self.current())
    }
}

/// In-process navigator with a history stack
pub struct MemoryNavigator {
    current: Url,
    history: Vec<Url>,
}

impl MemoryNavigator {
    pub fn new(path: &str) -> Self {
        Self {
            current: Self::url_for(path),
            history: Vec::new(),
        }
    }

    /// Pop back to the previous location, if any
    pub fn back(&mut self) -> bool {
        match self.history.pop() {
            Some(url) => {
                self.current = url;
                true
            }
            None => false,
        }
    }

    fn url_for(path: &str) -> Url {
        let mut url = Url::parse("console://app/").expect("static base url is valid");
        url.set_path(path);
        url
    }
}

impl Navigator for MemoryNavigator {
    fn navigate(&mut self, path: &str, params: &ListParams) {
        let mut next = Self::url_for(path);
        params.write_to(&mut next);
        self.history.push(std::mem::replace(&mut self.current, next));
    }

    fn current(&self) -> &Url {
        &self.current
    }
}

/// The sole page-change entry point for table pagination controls.
///
/// A 0-based index outside `[0, total_pages)` is rejected rather than
/// clamped; the boundary controls are disabled in the pager view, so such
/// a request never navigates. Returns whether a navigation happened.
pub fn handle_pagination(
    nav: &mut dyn Navigator,
    new_page_index: i64,
    total_pages: u32,
) -> bool {
    if new_page_index < 0 || new_page_index >= i64::from(total_pages) {
        return false;
    }

    let current = nav.params();
    let target = current.with_page(new_page_index as u32 + 1);
    if target.page == current.page {
        return false;
    }

    let path = nav.current().path().to_string();
    nav.navigate(&path, &target);
    true
}
