//! Heuristic product metadata extraction.
//!
//! Each field is resolved independently through an ordered cascade of
//! strategies (see [`cascade`]). Nothing here fails: a field that cannot be
//! determined is simply left empty.

pub mod brand;
pub mod cascade;
pub mod image;
pub mod price;

use tracing::debug;

use crate::document::MarkupDocument;
use crate::models::ProductInfo;

/// Inputs shared by the page-level strategies.
pub struct ExtractionContext<'d, D> {
    pub document: &'d D,
    pub source_url: &'d str,
}

/// Extract brand, price and image from a parsed page.
///
/// Pure and deterministic: the same document and URL always give the same
/// result, and the document is never modified.
pub fn extract<D: MarkupDocument>(document: &D, source_url: &str) -> ProductInfo {
    let ctx = ExtractionContext { document, source_url };
    let brand = brand::resolve_brand(&ctx);

    let root = document.root();
    let price = price::find_price(&root);
    let image_url = image::resolve_image(&root, price.as_ref().map(|p| &p.anchor));

    let info = ProductInfo {
        brand,
        price: price.map(|p| p.text),
        image_url,
    };
    debug!(?info, "Extraction finished for {}", source_url);

    info
}
