//! In-process stand-in for the matching service.
//!
//! Serves canned `(status, body)` pairs keyed by request path and records
//! every request it receives. Unknown paths get a FastAPI-style 404.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::body::Bytes;
use axum::extract::State;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;
use tokio::task::JoinHandle;

#[derive(Debug, Clone)]
pub struct Received {
    pub method: Method,
    pub path: String,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl Received {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).expect("request body is JSON")
    }
}

#[derive(Default)]
struct Inner {
    routes: HashMap<String, (u16, String)>,
    received: Vec<Received>,
}

type Shared = Arc<Mutex<Inner>>;

pub struct FakeService {
    state: Shared,
    pub base_url: String,
    server: JoinHandle<()>,
}

impl FakeService {
    pub async fn start(routes: &[(&str, u16, &str)]) -> Self {
        let inner = Inner {
            routes: routes
                .iter()
                .map(|(path, status, body)| (path.to_string(), (*status, body.to_string())))
                .collect(),
            received: Vec::new(),
        };
        let state = Arc::new(Mutex::new(inner));
        let app = Router::new().fallback(respond).with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind ephemeral port");
        let addr = listener.local_addr().expect("local addr");
        let server = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("fake service");
        });

        Self {
            state,
            base_url: format!("http://{addr}"),
            server,
        }
    }

    pub fn received(&self) -> Vec<Received> {
        self.state.lock().unwrap().received.clone()
    }
}

impl Drop for FakeService {
    fn drop(&mut self) {
        self.server.abort();
    }
}

async fn respond(
    State(state): State<Shared>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let mut inner = state.lock().unwrap();
    inner.received.push(Received {
        method,
        path: uri.path().to_string(),
        content_type: headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body: body.to_vec(),
    });

    match inner.routes.get(uri.path()) {
        Some((status, body)) => {
            let status = StatusCode::from_u16(*status).expect("valid status");
            (status, body.clone()).into_response()
        }
        None => (StatusCode::NOT_FOUND, r#"{"detail":"Not Found"}"#).into_response(),
    }
}

/// Address that refuses connections: bound once, then released.
pub async fn closed_address() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);
    format!("http://{addr}")
}
