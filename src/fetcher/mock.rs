//! In-memory fetcher used by the unit tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::{AppError, Result};
use crate::fetcher::{Document, DocumentFetcher, FetchRequest};

/// Serves canned bodies by URL and records every request.
#[derive(Default)]
pub struct MockFetcher {
    pages: Mutex<HashMap<String, String>>,
    failures: Mutex<HashMap<String, u16>>,
    calls: Mutex<Vec<FetchRequest>>,
    delay: Option<Duration>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `body` for `url`.
    pub fn page(self, url: &str, body: &str) -> Self {
        self.set_page(url, body);
        self
    }

    /// Answer `url` with a non-success status.
    pub fn failing(self, url: &str, status: u16) -> Self {
        self.failures.lock().unwrap().insert(url.to_string(), status);
        self
    }

    /// Hold every response for `delay` before answering.
    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn set_page(&self, url: &str, body: &str) {
        self.failures.lock().unwrap().remove(url);
        self.pages
            .lock()
            .unwrap()
            .insert(url.to_string(), body.to_string());
    }

    /// Total number of fetches.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Number of fetches of one URL.
    pub fn calls_to(&self, url: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.url.as_str() == url)
            .count()
    }

    pub fn last_request(&self) -> Option<FetchRequest> {
        self.calls.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl DocumentFetcher for MockFetcher {
    async fn fetch(&self, request: &FetchRequest) -> Result<Document> {
        self.calls.lock().unwrap().push(request.clone());
        let url = request.url.to_string();
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if let Some(status) = self.failures.lock().unwrap().get(&url) {
            return Err(AppError::Status {
                url,
                status: *status,
            });
        }

        let body = self.pages.lock().unwrap().get(&url).cloned();
        match body {
            Some(body) => Ok(Document::new(request.url.clone(), body)),
            None => Err(AppError::Status { url, status: 404 }),
        }
    }
}
