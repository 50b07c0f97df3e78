//! The network seam.
//!
//! [`Transport`] performs exactly one call per invocation: no retries, no
//! client-enforced deadline, no de-duplication. [`HttpTransport`] is the
//! production implementation on top of `reqwest`; tests substitute their own.

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::CONTENT_TYPE;

use crate::error::TransportError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// One outbound call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundRequest {
    pub method: Method,
    pub url: String,
    /// JSON body; `Some` implies `Content-Type: application/json`.
    pub body: Option<Bytes>,
}

impl OutboundRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            url: url.into(),
            body: None,
        }
    }

    pub fn post_json(url: impl Into<String>, body: impl Into<Bytes>) -> Self {
        Self {
            method: Method::Post,
            url: url.into(),
            body: Some(body.into()),
        }
    }
}

/// Status code and fully read body of a reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: Bytes,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// `200..=299`.
    pub fn is_success(&self) -> bool {
        (200..=299).contains(&self.status)
    }
}

#[async_trait]
pub trait Transport: Send + Sync {
    /// Performs the call. Any reply, whatever its status, is `Ok`; only a
    /// call that cannot complete (including an interrupted body read) is
    /// an error.
    async fn send(&self, request: OutboundRequest) -> Result<RawResponse, TransportError>;
}

/// `reqwest`-backed transport. Cloning shares the connection pool.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self, TransportError> {
        let client = reqwest::Client::builder().build()?;
        Ok(Self { client })
    }

    /// Wraps a caller-configured client, e.g. one with proxies or custom TLS
    /// roots.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: OutboundRequest) -> Result<RawResponse, TransportError> {
        let builder = match request.method {
            Method::Get => self.client.get(&request.url),
            Method::Post => self.client.post(&request.url),
        };
        let builder = match request.body {
            Some(body) => builder.header(CONTENT_TYPE, "application/json").body(body),
            None => builder,
        };

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?;

        Ok(RawResponse { status, body })
    }
}
