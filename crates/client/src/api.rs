//! Client entry points for the matching service.
//!
//! Every operation POSTs (or GETs, for health) exactly once through the
//! configured [`Transport`], then hands the raw reply to [`interpret`].
//! Failures are never retried.

use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::parse::parse_json_safely;
use crate::transport::{HttpTransport, OutboundRequest, RawResponse, Transport};
use crate::types::{
    HealthResponse, MatchRequest, MatchResponse, ReplaceRequest, ReplaceResponse, SplitRequest,
    SplitResponse,
};

pub const MATCH_PATH: &str = "/regex/match";
pub const REPLACE_PATH: &str = "/regex/replace";
pub const SPLIT_PATH: &str = "/regex/split";
pub const HEALTH_PATH: &str = "/healthz";

/// Client for the matching service.
///
/// Holds no mutable state: each call builds its own request, performs one
/// network round trip, and returns either the decoded reply or a normalized
/// [`ClientError`]. Clones share the transport, and concurrent calls are
/// independent of each other.
#[derive(Clone)]
pub struct RegexClient {
    config: ClientConfig,
    transport: Arc<dyn Transport>,
}

impl fmt::Debug for RegexClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegexClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl RegexClient {
    /// Client over the default `reqwest` transport.
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let transport = HttpTransport::new()?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    pub fn with_transport(config: ClientConfig, transport: Arc<dyn Transport>) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Submits `request` to `/regex/match`.
    ///
    /// On success the matches are in the order the service found them and
    /// `matches` is empty, never absent, when nothing matched.
    pub async fn match_pattern(
        &self,
        request: &MatchRequest,
    ) -> Result<MatchResponse, ClientError> {
        self.post_json(MATCH_PATH, request).await
    }

    pub async fn replace(&self, request: &ReplaceRequest) -> Result<ReplaceResponse, ClientError> {
        self.post_json(REPLACE_PATH, request).await
    }

    pub async fn split(&self, request: &SplitRequest) -> Result<SplitResponse, ClientError> {
        self.post_json(SPLIT_PATH, request).await
    }

    /// Liveness probe. Always hits `/healthz` on the base URL, mock mode or not.
    pub async fn health(&self) -> Result<HealthResponse, ClientError> {
        let url = self.config.unprefixed_route(HEALTH_PATH);
        self.execute(OutboundRequest::get(url)).await
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let payload = serde_json::to_vec(body)
            .map_err(|e| ClientError::unknown(format!("request serialization failed: {e}")))?;
        let url = self.config.route(path);
        self.execute(OutboundRequest::post_json(url, payload)).await
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        request: OutboundRequest,
    ) -> Result<T, ClientError> {
        let url = request.url.clone();
        tracing::debug!(method = ?request.method, %url, "sending request");

        let result = match self.transport.send(request).await {
            Ok(raw) => {
                tracing::debug!(
                    %url,
                    status = raw.status,
                    bytes = raw.body.len(),
                    "response received"
                );
                interpret(raw)
            }
            Err(err) => Err(ClientError::from(err)),
        };

        result.inspect_err(|err| {
            tracing::warn!(
                %url,
                kind = err.kind().as_str(),
                status = err.status(),
                error = %err,
                "request failed"
            );
        })
    }
}

/// Maps a raw reply to the decoded body or a normalized error.
pub fn interpret<T: DeserializeOwned>(raw: RawResponse) -> Result<T, ClientError> {
    if !raw.is_success() {
        return Err(ClientError::from_status(raw.status, &raw.body));
    }
    parse_json_safely(&raw.body).ok_or(ClientError::Decode)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ErrorKind, TransportError};
    use crate::transport::Method;
    use crate::types::Span;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Replays one canned outcome and records what it was asked to send.
    struct CannedTransport {
        outcome: Result<RawResponse, TransportError>,
        seen: Mutex<Vec<OutboundRequest>>,
    }

    impl CannedTransport {
        fn reply(status: u16, body: &'static str) -> Arc<Self> {
            Arc::new(Self {
                outcome: Ok(RawResponse::new(status, body)),
                seen: Mutex::new(Vec::new()),
            })
        }

        fn fail(message: &str) -> Arc<Self> {
            Arc::new(Self {
                outcome: Err(TransportError::new(message)),
                seen: Mutex::new(Vec::new()),
            })
        }

        fn requests(&self) -> Vec<OutboundRequest> {
            self.seen.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Transport for CannedTransport {
        async fn send(&self, request: OutboundRequest) -> Result<RawResponse, TransportError> {
            self.seen.lock().unwrap().push(request);
            self.outcome.clone()
        }
    }

    fn client_with(transport: Arc<CannedTransport>, config: ClientConfig) -> RegexClient {
        RegexClient::with_transport(config, transport)
    }

    fn span(start: usize, end: usize) -> Span {
        Span::new(start, end).unwrap()
    }

    #[tokio::test]
    async fn match_posts_request_verbatim() {
        let transport = CannedTransport::reply(200, r#"{"matches": []}"#);
        let client = client_with(transport.clone(), ClientConfig::new("http://example.com/"));

        let request = MatchRequest::new(" a(b)? ", "im", "ab a");
        client.match_pattern(&request).await.unwrap();

        let sent = transport.requests();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].method, Method::Post);
        assert_eq!(sent[0].url, "http://example.com/regex/match");
        let body: serde_json::Value =
            serde_json::from_slice(sent[0].body.as_ref().unwrap()).unwrap();
        assert_eq!(
            body,
            serde_json::json!({"pattern": " a(b)? ", "flags": "im", "text": "ab a"})
        );
    }

    #[tokio::test]
    async fn empty_matches_is_success() {
        let client = client_with(
            CannedTransport::reply(200, r#"{"matches": []}"#),
            ClientConfig::default(),
        );
        let response = client
            .match_pattern(&MatchRequest::new("x", "", "abc"))
            .await
            .unwrap();
        assert!(response.is_empty());
    }

    #[tokio::test]
    async fn omitted_matches_is_empty_success() {
        let client = client_with(CannedTransport::reply(200, "{}"), ClientConfig::default());
        let response = client
            .match_pattern(&MatchRequest::new("x", "", "abc"))
            .await
            .unwrap();
        assert_eq!(response.matches, vec![]);
    }

    #[tokio::test]
    async fn decodes_spans_and_groups_in_order() {
        let client = client_with(
            CannedTransport::reply(
                200,
                r#"{"matches":[{"span":[0,2],"groups":[[1,2]]},{"span":[3,4],"groups":[null]}]}"#,
            ),
            ClientConfig::default(),
        );
        let response = client
            .match_pattern(&MatchRequest::new("a(b)?", "", "ab a"))
            .await
            .unwrap();

        assert_eq!(response.len(), 2);
        assert_eq!(response.matches[0].span, span(0, 2));
        assert_eq!(response.matches[0].groups, vec![Some(span(1, 2))]);
        assert_eq!(response.matches[1].span, span(3, 4));
        assert_eq!(response.matches[1].groups, vec![None]);
    }

    #[tokio::test]
    async fn server_detail_is_the_message() {
        let transport = CannedTransport::reply(500, r#"{"detail": "bad pattern"}"#);
        let client = client_with(transport.clone(), ClientConfig::default());
        let err = client
            .match_pattern(&MatchRequest::new("(", "", "x"))
            .await
            .unwrap_err();
        assert_eq!(err.message(), "bad pattern");
        assert_eq!(err.status(), Some(500));
        assert_eq!(transport.requests().len(), 1);
    }

    #[tokio::test]
    async fn unparsable_error_body_reports_status() {
        let client = client_with(
            CannedTransport::reply(500, "Internal Server Error"),
            ClientConfig::default(),
        );
        let err = client
            .match_pattern(&MatchRequest::new("x", "", "x"))
            .await
            .unwrap_err();
        assert!(err.message().contains("500"));
        assert_eq!(err.kind(), ErrorKind::HttpStatus);
    }

    #[tokio::test]
    async fn garbage_success_body_is_a_decode_error() {
        let transport = CannedTransport::reply(200, "<html>");
        let client = client_with(transport.clone(), ClientConfig::default());
        let err = client
            .match_pattern(&MatchRequest::new("x", "", "x"))
            .await
            .unwrap_err();
        assert_eq!(err, ClientError::Decode);
        assert_eq!(err.message(), "the server response could not be parsed");
        assert_eq!(transport.requests().len(), 1);
    }

    #[tokio::test]
    async fn inverted_span_is_a_decode_error() {
        let client = client_with(
            CannedTransport::reply(200, r#"{"matches":[{"span":[4,1],"groups":[]}]}"#),
            ClientConfig::default(),
        );
        let err = client
            .match_pattern(&MatchRequest::new("x", "", "x"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Parse);
    }

    #[tokio::test]
    async fn transport_failure_message_passes_through() {
        let transport = CannedTransport::fail("connection refused");
        let client = client_with(transport.clone(), ClientConfig::default());
        let err = client
            .match_pattern(&MatchRequest::new("x", "", "x"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Network);
        assert_eq!(err.message(), "connection refused");
        assert_eq!(transport.requests().len(), 1);
    }

    #[tokio::test]
    async fn mock_mode_routes_through_prefix() {
        let transport = CannedTransport::reply(200, r#"{"pieces": ["a", "b"]}"#);
        let client = client_with(
            transport.clone(),
            ClientConfig::new("http://svc:8000").with_mock(true),
        );
        let response = client
            .split(&SplitRequest::new(" ", "", "a b"))
            .await
            .unwrap();
        assert_eq!(response.pieces, vec!["a", "b"]);
        assert_eq!(transport.requests()[0].url, "http://svc:8000/mock/regex/split");
    }

    #[tokio::test]
    async fn replace_decodes_output_and_count() {
        let transport = CannedTransport::reply(200, r#"{"output": "abc # xyz", "count": 1}"#);
        let client = client_with(transport.clone(), ClientConfig::default());
        let response = client
            .replace(&ReplaceRequest::new(r"\d+", "", "abc 123 xyz", "#"))
            .await
            .unwrap();
        assert_eq!(response.output, "abc # xyz");
        assert_eq!(response.count, 1);
        assert_eq!(
            transport.requests()[0].url,
            "http://localhost:8000/regex/replace"
        );
    }

    #[tokio::test]
    async fn health_is_never_mock_prefixed() {
        let transport = CannedTransport::reply(200, r#"{"ok": true}"#);
        let client = client_with(
            transport.clone(),
            ClientConfig::new("http://svc").with_mock(true),
        );
        assert!(client.health().await.unwrap().ok);
        let sent = transport.requests();
        assert_eq!(sent[0].method, Method::Get);
        assert_eq!(sent[0].url, "http://svc/healthz");
        assert!(sent[0].body.is_none());
    }

    #[test]
    fn interpret_prefers_status_over_body() {
        let raw = RawResponse::new(422, r#"{"matches": []}"#);
        let err = interpret::<MatchResponse>(raw).unwrap_err();
        assert_eq!(err.message(), "request failed with status 422");
    }
}
