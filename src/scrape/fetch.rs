use std::time::Duration;

use reqwest::Client;
use thiserror::Error;
use url::Url;

use super::document::Document;

const DEFAULT_TIMEOUT_SECS: u64 = 20;

#[derive(Clone, Debug)]
pub struct FetchConfig {
    pub timeout: Duration,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self { timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS) }
    }
}

impl FetchConfig {
    pub fn from_env() -> Self {
        Self::from_value(std::env::var("SHOW_FETCH_TIMEOUT_SECS").ok().as_deref())
    }

    /// Zero and unparsable values keep the default; a zero timeout would fail every fetch.
    fn from_value(timeout_secs: Option<&str>) -> Self {
        let mut cfg = Self::default();
        if let Some(parsed) = timeout_secs.and_then(|v| v.trim().parse::<u64>().ok()) {
            if parsed > 0 {
                cfg.timeout = Duration::from_secs(parsed);
            }
        }
        cfg
    }
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("unreachable {url}: {source}")]
    Unreachable {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

impl FetchError {
    fn from_reqwest(url: &str, err: reqwest::Error) -> Self {
        if err.is_builder() {
            FetchError::InvalidInput(format!("{url}: {err}"))
        } else {
            FetchError::Unreachable { url: url.to_string(), source: err }
        }
    }
}

/// One GET per call; no retries, no caching.
#[derive(Clone)]
pub struct Fetcher {
    http: Client,
}

impl Fetcher {
    pub fn new(cfg: &FetchConfig) -> Result<Self, reqwest::Error> {
        let http = Client::builder().timeout(cfg.timeout).build()?;
        Ok(Self { http })
    }

    pub async fn fetch(&self, url: &str) -> Result<Document, FetchError> {
        let target = validate_url(url)?;
        let resp = self
            .http
            .get(target)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| FetchError::from_reqwest(url, e))?;
        let body = resp.text().await.map_err(|e| FetchError::from_reqwest(url, e))?;
        Ok(Document::parse(&body))
    }
}

#[cfg(test)]
impl Fetcher {
    /// Bypasses any proxy from the environment so loopback responders are reached.
    pub(crate) fn direct_for_tests() -> Self {
        Self::direct_for_tests_with(Duration::from_secs(5))
    }

    pub(crate) fn direct_for_tests_with(timeout: Duration) -> Self {
        let http = Client::builder()
            .timeout(timeout)
            .no_proxy()
            .build()
            .unwrap();
        Self { http }
    }
}

/// Rejects blank, malformed and non-http(s) input before any I/O.
pub fn validate_url(url: &str) -> Result<Url, FetchError> {
    if url.trim().is_empty() {
        return Err(FetchError::InvalidInput("blank url".to_string()));
    }
    let parsed = Url::parse(url).map_err(|e| FetchError::InvalidInput(format!("{url}: {e}")))?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(FetchError::InvalidInput(format!("unsupported scheme: {other}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scrape::testutil::{closed_port_url, serve_once, serve_silent};

    fn fetcher() -> Fetcher {
        Fetcher::direct_for_tests()
    }

    #[test]
    fn timeout_comes_from_config() {
        let cfg = FetchConfig { timeout: Duration::from_secs(3) };
        assert!(Fetcher::new(&cfg).is_ok());
        assert_eq!(FetchConfig::default().timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
    }

    #[test]
    fn timeout_setting_accepts_positive_seconds_only() {
        let default = Duration::from_secs(DEFAULT_TIMEOUT_SECS);
        assert_eq!(FetchConfig::from_value(Some("7")).timeout, Duration::from_secs(7));
        assert_eq!(FetchConfig::from_value(Some(" 3 ")).timeout, Duration::from_secs(3));
        assert_eq!(FetchConfig::from_value(Some("0")).timeout, default);
        assert_eq!(FetchConfig::from_value(Some("-5")).timeout, default);
        assert_eq!(FetchConfig::from_value(Some("soon")).timeout, default);
        assert_eq!(FetchConfig::from_value(None).timeout, default);
    }

    #[tokio::test]
    async fn blank_input_never_hits_the_network() {
        for input in ["", "   ", "\t\n"] {
            let err = fetcher().fetch(input).await.unwrap_err();
            assert!(matches!(err, FetchError::InvalidInput(_)), "{input:?} -> {err}");
        }
    }

    #[test]
    fn malformed_and_unsupported_urls_are_invalid_input() {
        assert!(matches!(validate_url("imdb title please"), Err(FetchError::InvalidInput(_))));
        assert!(matches!(validate_url("ftp://www.imdb.com/title/tt0944947/"), Err(FetchError::InvalidInput(_))));
        assert!(validate_url("https://m.imdb.com/title/tt0944947/").is_ok());
    }

    #[tokio::test]
    async fn success_returns_a_queryable_document() {
        let url = serve_once("200 OK", "<html><body><h1>Dark</h1></body></html>").await;
        let doc = fetcher().fetch(&url).await.unwrap();
        assert_eq!(doc.text_of("h1").as_deref(), Some("Dark"));
    }

    #[tokio::test]
    async fn non_success_status_is_unreachable() {
        let url = serve_once("404 Not Found", "<html><body>gone</body></html>").await;
        let err = fetcher().fetch(&url).await.unwrap_err();
        assert!(matches!(err, FetchError::Unreachable { .. }), "{err}");
    }

    #[tokio::test]
    async fn refused_connection_is_unreachable() {
        let url = closed_port_url().await;
        let err = fetcher().fetch(&url).await.unwrap_err();
        assert!(matches!(err, FetchError::Unreachable { .. }), "{err}");
    }

    #[tokio::test]
    async fn silent_server_times_out_as_unreachable() {
        let url = serve_silent().await;
        let slow = Fetcher::direct_for_tests_with(Duration::from_millis(200));
        let started = std::time::Instant::now();
        let err = slow.fetch(&url).await.unwrap_err();
        assert!(matches!(err, FetchError::Unreachable { .. }), "{err}");
        assert!(started.elapsed() < Duration::from_secs(5));
    }
}
