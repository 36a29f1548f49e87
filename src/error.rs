use thiserror::Error;

/// Coarse classification of a total pipeline failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The page could not be retrieved.
    Network,
    /// The page was retrieved but is not markup.
    Parse,
}

/// Fatal errors: when one of these is returned the extractor never ran.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("network error: {0}")]
    Network(String),

    #[error("HTTP error {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("empty response body")]
    EmptyBody,

    #[error("response is not markup: {0}")]
    NotMarkup(&'static str),
}

impl ScrapeError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ScrapeError::InvalidUrl { .. }
            | ScrapeError::Network(_)
            | ScrapeError::HttpStatus { .. } => ErrorKind::Network,
            ScrapeError::EmptyBody | ScrapeError::NotMarkup(_) => ErrorKind::Parse,
        }
    }

    /// Whether another attempt within the same run could succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            ScrapeError::Network(_) => true,
            ScrapeError::HttpStatus { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert_eq!(ScrapeError::Network("refused".into()).kind(), ErrorKind::Network);
        assert_eq!(
            ScrapeError::HttpStatus { url: "https://a.com".into(), status: 404 }.kind(),
            ErrorKind::Network
        );
        assert_eq!(ScrapeError::EmptyBody.kind(), ErrorKind::Parse);
        assert_eq!(ScrapeError::NotMarkup("no tags").kind(), ErrorKind::Parse);
    }

    #[test]
    fn test_transient_statuses() {
        let status = |status| ScrapeError::HttpStatus { url: String::new(), status };

        assert!(status(503).is_transient());
        assert!(status(429).is_transient());
        assert!(!status(404).is_transient());
        assert!(!ScrapeError::EmptyBody.is_transient());
    }
}
