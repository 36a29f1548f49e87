pub mod extractor_config;

pub use extractor_config::{ExtractorConfig, FetchConfig};
