//! reqwest-backed document fetcher.

use async_trait::async_trait;
use reqwest::Client;

use crate::error::{AppError, Result};
use crate::fetcher::{Document, DocumentFetcher, FetchRequest};
use crate::models::FetcherConfig;
use crate::utils::http::{create_async_client, header_map};

/// Fetches documents over HTTP.
#[derive(Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Create a fetcher with a client built from the fetcher settings.
    pub fn new(config: &FetcherConfig) -> Result<Self> {
        Ok(Self {
            client: create_async_client(config)?,
        })
    }
}

#[async_trait]
impl DocumentFetcher for HttpFetcher {
    async fn fetch(&self, request: &FetchRequest) -> Result<Document> {
        log::debug!("GET {}", request.url);

        let response = self
            .client
            .get(request.url.clone())
            .headers(header_map(&request.headers)?)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Status {
                url: request.url.to_string(),
                status: status.as_u16(),
            });
        }

        let location = response.url().clone();
        let body = response.text().await?;
        Ok(Document::new(location, body))
    }
}
