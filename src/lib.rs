//! Best-effort extraction of brand, price and primary image from retail
//! product pages.
//!
//! - `fetcher`: browser-like page retrieval
//! - `document`: parser-independent document model, `scraper` backend
//! - `extractor`: the heuristic cascades
//! - `pipeline`: fetch, parse and extract in one call

pub mod config;
pub mod document;
pub mod error;
pub mod extractor;
pub mod fetcher;
pub mod models;
pub mod pipeline;

pub use config::ExtractorConfig;
pub use error::{ErrorKind, ScrapeError};
pub use extractor::extract;
pub use fetcher::{HtmlFetcher, PageFetcher};
pub use models::ProductInfo;
pub use pipeline::scrape_product;
