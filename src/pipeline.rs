use tracing::info;

use crate::document::parse_document;
use crate::error::ScrapeError;
use crate::extractor::extract;
use crate::fetcher::PageFetcher;
use crate::models::ProductInfo;

/// Fetch `url`, parse it and extract product metadata.
///
/// `Err` means the page could not be retrieved or is not markup; the
/// extractor never ran. `Ok` with empty fields means it ran and found
/// nothing.
pub async fn scrape_product<F>(fetcher: &F, url: &str) -> Result<ProductInfo, ScrapeError>
where
    F: PageFetcher + ?Sized,
{
    let body = fetcher.fetch(url).await?;
    let document = parse_document(&body)?;
    let info = extract(&document, url);

    info!(
        brand = info.brand.is_some(),
        price = info.price.is_some(),
        image = info.image_url.is_some(),
        "Extracted product information from {}",
        url
    );

    Ok(info)
}
