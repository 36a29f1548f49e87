pub mod html_fetcher;

pub use html_fetcher::{HtmlFetcher, retry_with_backoff};

use async_trait::async_trait;

use crate::error::ScrapeError;

/// Retrieves the raw bytes of a page.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, ScrapeError>;
}
