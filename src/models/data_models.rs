use serde::{Deserialize, Serialize};
use std::fmt;

const NOT_FOUND: &str = "not found";

/// Best-guess product metadata extracted from a single page.
///
/// Every field is independently optional: a missing price says nothing
/// about the brand or the image.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductInfo {
    pub brand: Option<String>,
    /// Raw matched text including the currency symbol, e.g. `$19.99`.
    pub price: Option<String>,
    /// Image URL exactly as it appears in the markup (may be relative).
    pub image_url: Option<String>,
}

impl ProductInfo {
    /// True when the page was processed but nothing could be determined.
    pub fn is_empty(&self) -> bool {
        self.brand.is_none() && self.price.is_none() && self.image_url.is_none()
    }
}

impl fmt::Display for ProductInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Product Information ===")?;
        writeln!(f, "Brand: {}", self.brand.as_deref().unwrap_or(NOT_FOUND))?;
        writeln!(f, "Price: {}", self.price.as_deref().unwrap_or(NOT_FOUND))?;
        write!(f, "Image URL: {}", self.image_url.as_deref().unwrap_or(NOT_FOUND))
    }
}
