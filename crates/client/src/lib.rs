//! # regex-lite client (`client`)
//!
//! Talks to the regex-lite matching service over HTTP. The service owns all
//! pattern semantics; this crate only builds requests, sends them, and turns
//! whatever comes back into either a typed result or one [`ClientError`].
//!
//! ## Flow
//!
//! ```text
//! MatchRequest ──► RegexClient ──► Transport (POST {base}[/mock]/regex/match)
//!                                     │
//!                    status 2xx? ─────┤
//!                      yes: parse_json_safely ─► MatchResponse | ClientError::Decode
//!                      no:  {"detail": ...}    ─► ClientError::HttpStatus
//!                    no reply:                 ─► ClientError::Transport
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use client::{ClientConfig, MatchRequest, RegexClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), client::ClientError> {
//!     let client = RegexClient::new(ClientConfig::new("http://localhost:8000"))?;
//!     let text = "ab a";
//!     let response = client
//!         .match_pattern(&MatchRequest::new("a(b)?", "", text))
//!         .await?;
//!
//!     for m in &response {
//!         println!("{:?} -> {:?}", m.span, m.span.extract(text));
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Configuration
//!
//! [`ClientConfig::load`] reads an optional `regex-lite.*` file and the
//! `REGEX_LITE_BASE_URL` / `REGEX_LITE_USE_MOCK` environment variables. The
//! base URL falls back to [`DEFAULT_API_BASE`].
//!
//! ## Concurrency
//!
//! Calls do not retry, time out, or cancel one another. Overlapping calls
//! complete in whatever order the network delivers them.

pub mod api;
pub mod config;
pub mod error;
pub mod parse;
pub mod transport;
pub mod types;

pub use crate::api::{interpret, RegexClient};
pub use crate::config::{resolve_base_url, ClientConfig, DEFAULT_API_BASE, MOCK_PREFIX};
pub use crate::error::{ClientError, ConfigError, ErrorKind, TransportError};
pub use crate::parse::parse_json_safely;
pub use crate::transport::{HttpTransport, Method, OutboundRequest, RawResponse, Transport};
pub use crate::types::{
    Group, HealthResponse, InvalidSpan, Match, MatchRequest, MatchResponse, ReplaceRequest,
    ReplaceResponse, Span, SplitRequest, SplitResponse,
};
