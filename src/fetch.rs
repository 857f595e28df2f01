//! Submission archive download
//!
//! [`HttpFetcher`] performs a single GET per submission. There is no retry and
//! no size limit: the whole body is buffered in memory, so an unexpectedly
//! large archive is bounded only by the function's memory.

use crate::config::FetchConfig;
use crate::error::FetchError;
use reqwest::header::CONTENT_TYPE;

/// User agent sent with every download request
const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Downloads submission archives over HTTP(S)
#[derive(Clone, Debug)]
pub struct HttpFetcher {
    client: reqwest::Client,
    expected_content_type: String,
}

impl HttpFetcher {
    /// Create a fetcher with the configured timeout and accepted media type
    pub fn new(config: &FetchConfig) -> crate::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            expected_content_type: config.expected_content_type.clone(),
        })
    }

    /// Media type the fetcher accepts
    pub fn expected_content_type(&self) -> &str {
        &self.expected_content_type
    }

    /// Fetch `url` and return its body
    ///
    /// The `Content-Type` header must equal the expected media type exactly;
    /// it is checked before any of the body is read.
    #[tracing::instrument(skip(self))]
    pub async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let response = self.client.get(url).send().await.map_err(|e| {
            let reason = if e.is_timeout() {
                format!("request timed out: {e}")
            } else if e.is_connect() {
                format!("connection failed: {e}")
            } else {
                e.to_string()
            };
            FetchError::Transport {
                url: url.to_string(),
                reason,
            }
        })?;

        if !response.status().is_success() {
            return Err(FetchError::HttpStatus {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned());
        if content_type.as_deref() != Some(self.expected_content_type.as_str()) {
            return Err(FetchError::UnsupportedContentType {
                url: url.to_string(),
                expected: self.expected_content_type.clone(),
                found: content_type,
            });
        }

        let body = response.bytes().await.map_err(|e| FetchError::Read {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        tracing::debug!(bytes = body.len(), "submission downloaded");
        Ok(body.to_vec())
    }
}
