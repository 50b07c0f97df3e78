//! Error types produced by the client crate.
//!
//! Every failure a caller can observe is a [`ClientError`]. Transport, status
//! and decoding problems are all folded into it, so call sites only ever match
//! on one type and can always show [`ClientError::message`] to a user.
//!
//! # Error Categories
//!
//! | Error | Kind | Message |
//! |-------|------|---------|
//! | [`Transport`](ClientError::Transport) | [`ErrorKind::Network`] | underlying transport description |
//! | [`HttpStatus`](ClientError::HttpStatus) | [`ErrorKind::HttpStatus`] | server `detail`, or `request failed with status N` |
//! | [`Decode`](ClientError::Decode) | [`ErrorKind::Parse`] | `the server response could not be parsed` |
//! | [`Unknown`](ClientError::Unknown) | [`ErrorKind::Unknown`] | `unexpected error while communicating with the API` |
//!
//! # Examples
//!
//! ```rust
//! use client::{ClientError, ErrorKind};
//!
//! let err = ClientError::from_status(500, br#"{"detail": "bad pattern"}"#);
//! assert_eq!(err.kind(), ErrorKind::HttpStatus);
//! assert_eq!(err.message(), "bad pattern");
//! assert_eq!(err.status(), Some(500));
//! ```

use std::error::Error as StdError;

use thiserror::Error;

use crate::parse::error_detail;

/// Coarse classification of a [`ClientError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The network call could not complete.
    Network,
    /// The service answered with a status outside `200..=299`.
    HttpStatus,
    /// The service answered successfully but the body had the wrong shape.
    Parse,
    /// Anything not covered above.
    Unknown,
}

impl ErrorKind {
    /// Stable lowercase label, used in log fields.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Network => "network",
            ErrorKind::HttpStatus => "http_status",
            ErrorKind::Parse => "parse",
            ErrorKind::Unknown => "unknown",
        }
    }
}

/// A network call that did not produce a response.
///
/// The message flattens the whole source chain so that the root cause
/// (`Connection refused`, DNS failures, resets) is visible in the one string a
/// caller displays.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct TransportError {
    message: String,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Builds a transport error from any error, appending each distinct
    /// source description.
    pub fn from_error(err: &(dyn StdError + 'static)) -> Self {
        let mut message = err.to_string();
        let mut source = err.source();
        while let Some(cause) = source {
            let text = cause.to_string();
            if !message.contains(&text) {
                message.push_str(": ");
                message.push_str(&text);
            }
            source = cause.source();
        }
        Self { message }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        TransportError::from_error(&err)
    }
}

/// The single failure value handed back by every client operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("{}", status_message(.status, .detail))]
    HttpStatus { status: u16, detail: Option<String> },

    #[error("the server response could not be parsed")]
    Decode,

    /// `context` is kept for logs; it never reaches the message.
    #[error("unexpected error while communicating with the API")]
    Unknown { context: String },
}

fn status_message(status: &u16, detail: &Option<String>) -> String {
    match detail {
        Some(detail) => detail.clone(),
        None => format!("request failed with status {status}"),
    }
}

impl ClientError {
    /// Normalizes a non-success response. The body is decoded as
    /// `{ "detail": ... }` when possible; anything else falls back to the
    /// generic status message.
    pub fn from_status(status: u16, body: &[u8]) -> Self {
        ClientError::HttpStatus {
            status,
            detail: error_detail(body),
        }
    }

    pub fn unknown(context: impl Into<String>) -> Self {
        ClientError::Unknown {
            context: context.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ClientError::Transport(_) => ErrorKind::Network,
            ClientError::HttpStatus { .. } => ErrorKind::HttpStatus,
            ClientError::Decode => ErrorKind::Parse,
            ClientError::Unknown { .. } => ErrorKind::Unknown,
        }
    }

    /// Human-readable message suitable for display.
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// Status code for [`ClientError::HttpStatus`], `None` otherwise.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Failures while loading [`ClientConfig`](crate::ClientConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load client configuration: {0}")]
    Load(#[from] config::ConfigError),
}
