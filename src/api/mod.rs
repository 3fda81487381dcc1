//! HTTP access to the platform REST API.
//!
//! The `ApiBackend` trait is the seam between the data layer and the wire;
//! tests script it, the binary uses the reqwest-backed `HttpBackend`.
//! Endpoint shapes:
//! - `GET /{resource}/get?page={n}&q={term}`
//! - `POST /{resource}/add`
//! - `PUT /{resource}/edit/{id}`
//! - `DELETE /{resource}/delete/{id}`

pub mod envelope;

use std::collections::BTreeMap;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;

use crate::config::Config;
use crate::error::{ConsoleError, Result};

pub use envelope::{ListData, ListEnvelope, MutationEnvelope};

/// Common interface for the platform API
#[async_trait]
pub trait ApiBackend: Send + Sync {
    /// Fetch one page of a server-paginated list
    async fn fetch_page(
        &self,
        resource: &str,
        page: u32,
        search: Option<&str>,
        extra: &BTreeMap<String, String>,
    ) -> Result<ListEnvelope>;

    /// Create a record
    async fn create(&self, resource: &str, body: Value) -> Result<MutationEnvelope>;

    /// Update a record
    async fn update(&self, resource: &str, id: &str, body: Value) -> Result<MutationEnvelope>;

    /// Delete a record
    async fn delete(&self, resource: &str, id: &str) -> Result<MutationEnvelope>;
}

/// Reqwest-backed API client
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl HttpBackend {
    /// Create a backend from configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| ConsoleError::Api(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            token: config.api_token(),
        })
    }

    fn endpoint(&self, resource: &str, tail: &str) -> String {
        format!("{}/{}/{}", self.base_url, resource, tail)
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Classify a transport failure and decode the envelope.
    ///
    /// 401/403 become `ConsoleError::Auth` so callers can bail out to a login
    /// flow instead of retrying; connection-level failures become
    /// `ConsoleError::Offline` so the cache can mark the entry paused.
    async fn decode<T: serde::de::DeserializeOwned>(
        &self,
        response: std::result::Result<reqwest::Response, reqwest::Error>,
    ) -> Result<T> {
        let response = response.map_err(classify_transport)?;

        match response.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                return Err(ConsoleError::Auth(format!(
                    "request rejected with status {}",
                    response.status()
                )));
            }
            status if status.is_server_error() => {
                return Err(ConsoleError::Api(format!("server error: status {}", status)));
            }
            _ => {}
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ConsoleError::Api(format!("malformed response envelope: {}", e)))
    }
}

fn classify_transport(err: reqwest::Error) -> ConsoleError {
    if err.is_connect() || err.is_timeout() {
        ConsoleError::Offline(err.to_string())
    } else {
        ConsoleError::Http(err)
    }
}

#[async_trait]
impl ApiBackend for HttpBackend {
    async fn fetch_page(
        &self,
        resource: &str,
        page: u32,
        search: Option<&str>,
        extra: &BTreeMap<String, String>,
    ) -> Result<ListEnvelope> {
        let mut request = self
            .client
            .get(self.endpoint(resource, "get"))
            .query(&[("page", page.to_string())]);

        if let Some(term) = search
            && !term.is_empty()
        {
            request = request.query(&[("q", term)]);
        }
        for (name, value) in extra {
            request = request.query(&[(name.as_str(), value.as_str())]);
        }

        self.decode(self.authorize(request).send().await).await
    }

    async fn create(&self, resource: &str, body: Value) -> Result<MutationEnvelope> {
        let request = self.client.post(self.endpoint(resource, "add")).json(&body);
        self.decode(self.authorize(request).send().await).await
    }

    async fn update(&self, resource: &str, id: &str, body: Value) -> Result<MutationEnvelope> {
        let request = self
            .client
            .put(self.endpoint(resource, &format!("edit/{}", id)))
            .json(&body);
        self.decode(self.authorize(request).send().await).await
    }

    async fn delete(&self, resource: &str, id: &str) -> Result<MutationEnvelope> {
        let request = self
            .client
            .delete(self.endpoint(resource, &format!("delete/{}", id)));
        self.decode(self.authorize(request).send().await).await
    }
}
