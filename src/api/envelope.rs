//! Wire envelopes for the platform REST API.
//!
//! Every list endpoint answers `{success, data: {items, totalPages}}` and
//! every mutation endpoint answers `{success, message?}`. The console never
//! relies on anything beyond that shape; record fields stay opaque JSON.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::query::Page;

/// Response envelope for list endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct ListEnvelope {
    pub success: bool,
    #[serde(default)]
    pub data: Option<ListData>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Payload of a successful list response
#[derive(Debug, Clone, Deserialize)]
pub struct ListData {
    #[serde(default)]
    pub items: Vec<Value>,
    #[serde(rename = "totalPages", default)]
    pub total_pages: u32,
}

impl ListEnvelope {
    /// Normalize into the `{items, totalPages}` shape the renderer consumes.
    ///
    /// A `success: false` envelope or a missing payload yields `None`;
    /// the caller records `FetchStatus::Error` separately.
    pub fn into_page(self) -> Option<Page<Value>> {
        if !self.success {
            return None;
        }
        let data = self.data?;
        Some(Page {
            items: data.items,
            total_pages: data.total_pages,
        })
    }
}

/// Response envelope for mutation endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MutationEnvelope {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}
