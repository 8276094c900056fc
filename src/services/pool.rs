//! Bounded worker pool shared by every secondary fetch of a source.

use std::future::Future;
use std::sync::Arc;

use futures::stream::{self, StreamExt};
use tokio::sync::Semaphore;

/// Caps concurrent secondary fetches across all calls on one source.
///
/// Per-season page fetches and per-candidate resolution fetches both draw
/// permits from the same semaphore, so two detail requests running at once
/// never exceed `size` in-flight fetches together.
#[derive(Debug, Clone)]
pub struct WorkerPool {
    semaphore: Arc<Semaphore>,
    size: usize,
}

impl WorkerPool {
    pub fn new(size: usize) -> Self {
        let size = size.max(1);
        Self {
            semaphore: Arc::new(Semaphore::new(size)),
            size,
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Run one unit of work while holding a permit.
    pub async fn run<T>(&self, work: impl Future<Output = T>) -> T {
        // The semaphore is never closed, so acquire only fails on shutdown.
        let _permit = self.semaphore.acquire().await.ok();
        work.await
    }

    /// Run `f` over `items` concurrently; results keep input order.
    pub async fn map_ordered<I, F, Fut, T>(&self, items: I, f: F) -> Vec<T>
    where
        I: IntoIterator,
        F: FnMut(I::Item) -> Fut,
        Fut: Future<Output = T>,
    {
        stream::iter(items)
            .map(f)
            .map(|work| self.run(work))
            .buffered(self.size)
            .collect()
            .await
    }
}
