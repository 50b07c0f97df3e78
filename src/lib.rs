//! Umbrella crate for the regex-lite client.
//!
//! Re-exports the [`client`] crate so callers can depend on one package, and
//! hosts the command-line front end in [`cli`].

pub mod cli;

pub use client::{
    interpret, parse_json_safely, resolve_base_url, ClientConfig, ClientError, ConfigError,
    ErrorKind, Group, HealthResponse, HttpTransport, InvalidSpan, Match, MatchRequest,
    MatchResponse, Method, OutboundRequest, RawResponse, RegexClient, ReplaceRequest,
    ReplaceResponse, Span, SplitRequest, SplitResponse, Transport, TransportError,
    DEFAULT_API_BASE, MOCK_PREFIX,
};
