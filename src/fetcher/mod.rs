//! Document fetching abstractions.
//!
//! The pipeline never talks to the network directly. It hands a
//! [`FetchRequest`] to a [`DocumentFetcher`] and receives a [`Document`]
//! carrying the final location and the raw body:
//!
//! ```text
//! FetchRequest { url, headers }
//!        │
//!        ▼
//! DocumentFetcher::fetch ──► Document { location, body }
//!                                   │
//!                                   ├── html()  → scraper::Html
//!                                   └── json()  → serde_json
//! ```
//!
//! Parsed `Html` is not `Send`, so services parse inside synchronous
//! helpers and only keep owned data across await points.

pub mod http;
#[cfg(test)]
pub(crate) mod mock;

use async_trait::async_trait;
use scraper::Html;
use serde::de::DeserializeOwned;
use url::Url;

use crate::error::Result;

// Re-export for convenience
pub use http::HttpFetcher;

/// A GET request for one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub url: Url,
    pub headers: Vec<(String, String)>,
}

impl FetchRequest {
    pub fn new(url: Url) -> Self {
        Self {
            url,
            headers: Vec::new(),
        }
    }

    /// Attach headers, replacing any earlier value of the same name.
    pub fn with_headers(mut self, headers: &[(String, String)]) -> Self {
        for (name, value) in headers {
            self.headers
                .retain(|(existing, _)| !existing.eq_ignore_ascii_case(name));
            self.headers.push((name.clone(), value.clone()));
        }
        self
    }
}

/// A fetched response body and the URL it was finally served from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub location: Url,
    pub body: String,
}

impl Document {
    pub fn new(location: Url, body: impl Into<String>) -> Self {
        Self {
            location,
            body: body.into(),
        }
    }

    /// Parse the body as HTML.
    pub fn html(&self) -> Html {
        Html::parse_document(&self.body)
    }

    /// Parse the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_str(&self.body)?)
    }
}

/// Trait for document fetching backends.
#[async_trait]
pub trait DocumentFetcher: Send + Sync {
    /// Fetch one document.
    ///
    /// Transport failures surface as `AppError::Http`, non-success status
    /// codes as `AppError::Status`.
    async fn fetch(&self, request: &FetchRequest) -> Result<Document>;
}

#[async_trait]
impl<F: DocumentFetcher + ?Sized> DocumentFetcher for std::sync::Arc<F> {
    async fn fetch(&self, request: &FetchRequest) -> Result<Document> {
        (**self).fetch(request).await
    }
}
