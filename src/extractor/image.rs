use crate::document::MarkupNode;
use crate::extractor::cascade::{Strategy, run_cascade};

/// Containers examined around the price, the anchor itself included.
pub const MAX_ANCESTOR_LEVELS: usize = 10;

/// Attributes that may carry the image URL, most authoritative first.
const SOURCE_ATTRIBUTES: [&str; 3] = ["src", "data-src", "data-original"];

const PROXIMITY_BLOCKLIST: [&str; 3] = ["icon", "logo", "sprite"];
// `thumb` is only rejected page-wide; near the price a thumbnail is still
// the best candidate.
const PAGE_BLOCKLIST: [&str; 4] = ["icon", "logo", "sprite", "thumb"];

/// Where to look for the product image.
pub struct ImageSearch<'n, N> {
    pub root: &'n N,
    /// Element holding the price, if one was found.
    pub anchor: Option<&'n N>,
}

/// Nearest usable image around the price, else the first usable image on
/// the page.
pub fn resolve_image<N: MarkupNode>(root: &N, anchor: Option<&N>) -> Option<String> {
    let strategies: [Strategy<ImageSearch<'_, N>>; 2] = [
        Strategy::new("price_proximity", near_price::<N>),
        Strategy::new("page_wide", page_wide::<N>),
    ];

    run_cascade("image", &strategies, &ImageSearch { root, anchor })
}

fn near_price<N: MarkupNode>(search: &ImageSearch<'_, N>) -> Option<String> {
    let mut container = Some(search.anchor?.clone());

    for _ in 0..MAX_ANCESTOR_LEVELS {
        let node = container?;

        let found = images_under(&node)
            .into_iter()
            .filter(|img| {
                !img.attr("src")
                    .is_some_and(|src| contains_any(src, &PROXIMITY_BLOCKLIST))
            })
            .find_map(|img| image_source(&img));
        if found.is_some() {
            return found;
        }

        container = node.parent();
    }

    None
}

fn page_wide<N: MarkupNode>(search: &ImageSearch<'_, N>) -> Option<String> {
    images_under(search.root)
        .iter()
        .filter_map(image_source)
        .find(|src| !contains_any(src, &PAGE_BLOCKLIST))
}

fn images_under<N: MarkupNode>(node: &N) -> Vec<N> {
    node.descendants()
        .into_iter()
        .filter(|n| n.is_element("img"))
        .collect()
}

/// First non-blank of `src`, `data-src`, `data-original`.
fn image_source<N: MarkupNode>(img: &N) -> Option<String> {
    SOURCE_ATTRIBUTES
        .iter()
        .filter_map(|name| img.attr(name))
        .find(|value| !value.trim().is_empty())
        .map(str::to_string)
}

fn contains_any(value: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| value.contains(needle))
}
