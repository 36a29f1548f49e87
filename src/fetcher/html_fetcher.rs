use anyhow::Result;
use async_trait::async_trait;
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, warn};
use url::Url;
use wreq::Client;
use wreq::header::CONTENT_TYPE;
use wreq_util::Emulation;

use crate::config::FetchConfig;
use crate::document::charset::{charset_from_content_type, transcode_to_utf8};
use crate::error::ScrapeError;
use crate::fetcher::PageFetcher;

/// Fetches product pages while presenting itself as a desktop browser.
///
/// The client emulates Firefox (TLS fingerprint, HTTP/2 settings and
/// default headers, User-Agent included) so that stores serve the same
/// markup a shopper would see.
pub struct HtmlFetcher {
    client: Client,
    config: FetchConfig,
}

impl HtmlFetcher {
    pub fn new(config: FetchConfig) -> Result<Self> {
        let client = Client::builder()
            .emulation(Emulation::Firefox136)
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(HtmlFetcher { client, config })
    }

    async fn fetch_once(&self, url: &Url) -> Result<Vec<u8>, ScrapeError> {
        let mut request = self.client.get(url.as_str());
        if let Some(ref user_agent) = self.config.user_agent {
            request = request.header("User-Agent", user_agent.as_str());
        }

        let response = request
            .send()
            .await
            .map_err(|e| ScrapeError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScrapeError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let charset = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .and_then(charset_from_content_type)
            .map(str::to_string);

        let body = response
            .bytes()
            .await
            .map_err(|e| ScrapeError::Network(format!("Failed to read response body: {}", e)))?;

        info!("Successfully fetched {} bytes from {}", body.len(), url);
        Ok(transcode_to_utf8(&body, charset.as_deref()))
    }
}

#[async_trait]
impl PageFetcher for HtmlFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, ScrapeError> {
        let url = validate_url(url)?;
        let url = &url;

        retry_with_backoff(
            self.config.max_attempts,
            self.config.retry_base_delay_ms,
            move || self.fetch_once(url),
        )
        .await
    }
}

/// Only absolute http(s) URLs can be fetched.
fn validate_url(url: &str) -> Result<Url, ScrapeError> {
    let parsed = Url::parse(url.trim()).map_err(|e| ScrapeError::InvalidUrl {
        url: url.to_string(),
        reason: e.to_string(),
    })?;

    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(ScrapeError::InvalidUrl {
            url: url.to_string(),
            reason: format!("unsupported scheme '{}'", other),
        }),
    }
}

/// Run `operation` up to `max_attempts` times, backing off exponentially
/// with random jitter between attempts. Only transient failures are
/// retried.
pub async fn retry_with_backoff<T, F, Fut>(
    max_attempts: usize,
    base_delay_ms: u64,
    mut operation: F,
) -> Result<T, ScrapeError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ScrapeError>>,
{
    let max_attempts = max_attempts.max(1);
    let mut attempt = 0;

    loop {
        attempt += 1;
        match operation().await {
            Ok(value) => return Ok(value),
            Err(e) if attempt < max_attempts && e.is_transient() => {
                let delay = backoff_delay(base_delay_ms, attempt);
                warn!(
                    "Attempt {}/{} failed, retrying in {:?}: {}",
                    attempt, max_attempts, delay, e
                );
                sleep(delay).await;
            }
            Err(e) => return Err(e),
        }
    }
}

/// Delay before the retry that follows failed attempt number `attempt`:
/// `base * 2^(attempt - 1)` plus up to `base` of jitter.
fn backoff_delay(base_delay_ms: u64, attempt: usize) -> Duration {
    let exponent = u32::try_from(attempt.saturating_sub(1)).unwrap_or(u32::MAX);
    let backoff = base_delay_ms.saturating_mul(2_u64.saturating_pow(exponent));
    let jitter = rand::random::<u64>() % base_delay_ms.saturating_add(1);
    Duration::from_millis(backoff.saturating_add(jitter))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_validate_url() {
        assert!(validate_url("https://www.nike.com/t/air-max").is_ok());
        assert!(validate_url(" http://shop.test/p?id=4 ").is_ok());

        for bad in ["", "nike.com/shoes", "ftp://files.test/a", "https://"] {
            let err = validate_url(bad).unwrap_err();
            assert!(matches!(err, ScrapeError::InvalidUrl { .. }), "url: {}", bad);
            assert_eq!(err.kind(), ErrorKind::Network);
        }
    }

    #[tokio::test]
    async fn test_retry_recovers_from_transient_errors() {
        let calls = AtomicUsize::new(0);

        let result = retry_with_backoff(3, 0, || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n < 2 {
                    Err(ScrapeError::Network("connection reset".into()))
                } else {
                    Ok(n)
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_retry_gives_up_after_max_attempts() {
        let calls = AtomicUsize::new(0);

        let result: Result<(), _> = retry_with_backoff(2, 0, || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(ScrapeError::HttpStatus { url: "https://a.test".into(), status: 503 }) }
        })
        .await;

        assert!(matches!(result, Err(ScrapeError::HttpStatus { status: 503, .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_retry_skips_permanent_errors() {
        let calls = AtomicUsize::new(0);

        let result: Result<(), _> = retry_with_backoff(5, 0, || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(ScrapeError::HttpStatus { url: "https://a.test".into(), status: 404 }) }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_backoff_delay_bounds() {
        assert_eq!(backoff_delay(0, 1), Duration::ZERO);

        let first = backoff_delay(100, 1);
        assert!(first >= Duration::from_millis(100) && first <= Duration::from_millis(200));

        let third = backoff_delay(100, 3);
        assert!(third >= Duration::from_millis(400) && third <= Duration::from_millis(500));

        assert_eq!(backoff_delay(u64::MAX, 1), Duration::from_millis(u64::MAX));
        assert_eq!(backoff_delay(u64::MAX, 64), Duration::from_millis(u64::MAX));
    }

    #[tokio::test]
    async fn test_invalid_url_never_hits_network() {
        let fetcher = HtmlFetcher::new(FetchConfig::default()).unwrap();
        let err = fetcher.fetch("javascript:alert(1)").await.unwrap_err();

        assert!(matches!(err, ScrapeError::InvalidUrl { .. }));
    }
}
