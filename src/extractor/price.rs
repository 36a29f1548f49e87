use regex::Regex;
use std::sync::LazyLock;

use crate::document::MarkupNode;

/// Currency symbol, optional space, digits, a `.` or `,` separator and
/// exactly two decimals. The trailing group rejects a third decimal digit.
static PRICE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([\$£€]\s*\d+[.,]\d{2})(?:\D|$)").unwrap());

/// First price found on the page and where it was found.
#[derive(Debug, Clone)]
pub struct PriceMatch<N> {
    pub text: String,
    /// Element holding the matching text node.
    pub anchor: N,
}

/// Return the exact price substring if `text` contains one.
pub fn match_price(text: &str) -> Option<&str> {
    PRICE_PATTERN
        .captures(text)
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str())
}

/// Scan text nodes in document order and stop at the first price.
pub fn find_price<N: MarkupNode>(root: &N) -> Option<PriceMatch<N>> {
    root.descendants().into_iter().find_map(|node| {
        let price = match_price(node.text_content()?)?.to_string();
        let anchor = node.parent().unwrap_or_else(|| node.clone());
        Some(PriceMatch { text: price, anchor })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::MarkupDocument;
    use scraper::Html;

    #[test]
    fn test_price_pattern_matches() {
        assert_eq!(match_price("$19.99"), Some("$19.99"));
        assert_eq!(match_price("Now only £5.00!"), Some("£5.00"));
        assert_eq!(match_price("€100,00 incl. VAT"), Some("€100,00"));
        assert_eq!(match_price("Price: € 5,00"), Some("€ 5,00"));
        assert_eq!(match_price("$19.99USD"), Some("$19.99"));
    }

    #[test]
    fn test_price_pattern_rejects() {
        assert_eq!(match_price("$5"), None);
        assert_eq!(match_price("19.99"), None);
        assert_eq!(match_price("$19.999"), None);
        assert_eq!(match_price("$19.9"), None);
        assert_eq!(match_price("¥1200.00"), None);
    }

    #[test]
    fn test_later_price_after_rejected_one() {
        assert_eq!(match_price("was $19.999, now $15.00"), Some("$15.00"));
    }

    #[test]
    fn test_first_text_node_wins() {
        let html = Html::parse_document(
            r#"<body><p>Ships for 5.00</p><div class="deal"><b>Sale: $9.50</b></div><span>$12.00</span></body>"#,
        );

        let found = find_price(&html.root()).unwrap();
        assert_eq!(found.text, "$9.50");
        assert_eq!(found.anchor.tag_name(), Some("b"));
    }

    #[test]
    fn test_no_price() {
        let html = Html::parse_document("<p>$5 or 19.99 or $19.999</p>");
        assert!(find_price(&html.root()).is_none());
    }
}
