use anyhow::{Context, Result};
use product_extractor::document::parse_document;
use product_extractor::extract;
use std::env;
use tracing_subscriber::EnvFilter;

/// Run the extractor on a saved page, without touching the network.
///
/// Usage: extract_html <file.html> <source-url>
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut args = env::args().skip(1);
    let path = args.next().context("Usage: extract_html <file.html> <source-url>")?;
    let source_url = args.next().unwrap_or_default();

    let bytes = std::fs::read(&path).with_context(|| format!("Failed to read {}", path))?;
    let document = parse_document(&bytes).with_context(|| format!("Failed to parse {}", path))?;

    let product = extract(&document, &source_url);
    println!("{}", serde_json::to_string_pretty(&product)?);

    Ok(())
}
