use encoding_rs::{Encoding, UTF_8};
use regex::bytes::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;
use tracing::debug;

/// How far into the body a `<meta>` charset declaration is looked for.
const META_PRESCAN_BYTES: usize = 1024;

/// `<meta charset="...">` as well as the older
/// `<meta http-equiv="Content-Type" content="text/html; charset=...">`.
static META_CHARSET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i-u)<meta[^>]*?charset\s*=\s*["']?\s*([a-z0-9_:.\-]+)"#).unwrap()
});

/// Decode a page body into text.
///
/// A byte order mark wins, then valid UTF-8, then a `<meta>` charset
/// declaration near the top of the page. Anything else is decoded as
/// UTF-8 with replacement characters.
pub fn decode_markup(bytes: &[u8]) -> Cow<'_, str> {
    if let Some((encoding, bom_length)) = Encoding::for_bom(bytes) {
        return encoding.decode_without_bom_handling(&bytes[bom_length..]).0;
    }

    if let Ok(text) = std::str::from_utf8(bytes) {
        return Cow::Borrowed(text);
    }

    if let Some(encoding) = declared_encoding(bytes) {
        debug!("Decoding body as {} per <meta> declaration", encoding.name());
        return encoding.decode_without_bom_handling(bytes).0;
    }

    String::from_utf8_lossy(bytes)
}

fn declared_encoding(bytes: &[u8]) -> Option<&'static Encoding> {
    let head = &bytes[..bytes.len().min(META_PRESCAN_BYTES)];
    let label = META_CHARSET.captures(head)?.get(1)?.as_bytes();

    Encoding::for_label(label).map(Encoding::output_encoding)
}

/// `charset` parameter of a `Content-Type` header value.
pub fn charset_from_content_type(content_type: &str) -> Option<&str> {
    content_type
        .split(';')
        .skip(1)
        .find_map(|param| {
            let (name, value) = param.split_once('=')?;
            name.trim()
                .eq_ignore_ascii_case("charset")
                .then(|| value.trim().trim_matches(|c| c == '"' || c == '\''))
        })
        .filter(|charset| !charset.is_empty())
}

/// Re-encode a body as UTF-8 when the server declared another charset.
/// Unknown labels leave the bytes untouched.
pub fn transcode_to_utf8(bytes: &[u8], charset: Option<&str>) -> Vec<u8> {
    let Some(encoding) = charset.and_then(|label| Encoding::for_label(label.as_bytes())) else {
        return bytes.to_vec();
    };
    if encoding == UTF_8 {
        return bytes.to_vec();
    }

    debug!("Transcoding {} body to UTF-8", encoding.name());
    let (text, _, _) = encoding.decode(bytes);
    text.into_owned().into_bytes()
}
