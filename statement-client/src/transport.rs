//! HTTP transport for the statement service.
//!
//! The [`StatementTransport`] trait is the seam between request routing and the
//! network, so the client can be exercised against a stub in tests.

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use std::time::Duration;
use tracing::debug;
use url::Url;

use crate::error::{ClientError, ClientResult};

/// Status and body of a completed HTTP exchange, success or not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends one JSON POST and returns whatever the service answered.
///
/// Implementations make exactly one outbound call and never retry. Failing to get a
/// response at all is reported as [`ClientError::Transport`].
#[async_trait]
pub trait StatementTransport: Send + Sync {
    async fn post_json(&self, path: &str, body: Vec<u8>) -> ClientResult<RawResponse>;
}

/// reqwest-backed transport against a configured base URL.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpTransport {
    pub fn new(base_url: &str) -> ClientResult<Self> {
        Self::with_timeout(base_url, None)
    }

    /// `timeout = None` leaves reqwest's default in place.
    pub fn with_timeout(base_url: &str, timeout: Option<Duration>) -> ClientResult<Self> {
        let base_url = parse_base_url(base_url)?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve an endpoint path below the base URL, keeping any base path prefix.
    pub fn endpoint_url(&self, path: &str) -> ClientResult<Url> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|source| ClientError::InvalidBaseUrl {
                url: self.base_url.to_string(),
                source,
            })
    }
}

fn parse_base_url(raw: &str) -> ClientResult<Url> {
    let invalid = |source| ClientError::InvalidBaseUrl {
        url: raw.to_string(),
        source,
    };

    let mut url = Url::parse(raw.trim()).map_err(invalid)?;
    if url.cannot_be_a_base() {
        return Err(invalid(url::ParseError::RelativeUrlWithCannotBeABaseBase));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

#[async_trait]
impl StatementTransport for HttpTransport {
    async fn post_json(&self, path: &str, body: Vec<u8>) -> ClientResult<RawResponse> {
        let url = self.endpoint_url(path)?;
        debug!(%url, bytes = body.len(), "POST statement request");

        let resp = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        let status = resp.status().as_u16();
        let body = resp
            .bytes()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        Ok(RawResponse::new(status, body.to_vec()))
    }
}
