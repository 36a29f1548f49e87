use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::document::{MarkupDocument, MarkupNode};
use crate::extractor::ExtractionContext;
use crate::extractor::cascade::{Strategy, run_cascade};

const STRUCTURED_DATA_SELECTOR: &str = r#"script[type="application/ld+json"]"#;

/// Tried in this order; the first selector that matches anything is the
/// only one consulted.
const BRAND_SELECTORS: [&str; 4] = [
    r#"[itemprop="brand"]"#,
    ".product-brand",
    r#"[data-testid="product-brand"]"#,
    r#"meta[property="og:brand"]"#,
];

/// Structured data, then well-known brand elements, then the site name.
pub fn resolve_brand<D: MarkupDocument>(ctx: &ExtractionContext<'_, D>) -> Option<String> {
    let strategies: [Strategy<ExtractionContext<'_, D>>; 3] = [
        Strategy::new("structured_data", from_structured_data::<D>),
        Strategy::new("selectors", from_selectors::<D>),
        Strategy::new("source_url", from_source_url::<D>),
    ];

    run_cascade("brand", &strategies, ctx)
}

fn from_structured_data<D: MarkupDocument>(ctx: &ExtractionContext<'_, D>) -> Option<String> {
    let script = ctx.document.select_first(STRUCTURED_DATA_SELECTOR)?;
    brand_from_json_ld(&script.text())
}

/// Read `brand` (or `brand.name`) from a JSON-LD payload. A top-level array
/// contributes its first element only.
fn brand_from_json_ld(payload: &str) -> Option<String> {
    let data: Value = match serde_json::from_str(payload) {
        Ok(data) => data,
        Err(e) => {
            debug!("Ignoring malformed structured data: {}", e);
            return None;
        }
    };

    let entity = match &data {
        Value::Array(items) => items.first()?,
        other => other,
    };

    match entity.get("brand")? {
        Value::Object(brand) => brand.get("name").and_then(scalar_to_string),
        other => scalar_to_string(other),
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn from_selectors<D: MarkupDocument>(ctx: &ExtractionContext<'_, D>) -> Option<String> {
    let (selector, element) = BRAND_SELECTORS
        .iter()
        .find_map(|selector| ctx.document.select_first(selector).map(|el| (*selector, el)))?;

    debug!("Brand element matched selector {}", selector);

    if element.is_element("meta") {
        element.attr("content").map(str::to_string)
    } else {
        Some(element.text().trim().to_string())
    }
}

fn from_source_url<D: MarkupDocument>(ctx: &ExtractionContext<'_, D>) -> Option<String> {
    brand_from_url(ctx.source_url)
}

/// Title-cased first label of the host, ignoring a leading `www.`.
///
/// `https://www.nike.com/shoes` gives `Nike`. A missing scheme is tolerated.
pub fn brand_from_url(source_url: &str) -> Option<String> {
    let source_url = source_url.trim();
    let candidate = if source_url.contains("://") {
        source_url.to_string()
    } else {
        format!("http://{}", source_url)
    };
    let parsed = Url::parse(&candidate).ok()?;

    let host = parsed.host_str()?;
    let host = host.strip_prefix("www.").unwrap_or(host);
    let label = host.split('.').next().filter(|label| !label.is_empty())?;

    Some(title_case(label))
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}
