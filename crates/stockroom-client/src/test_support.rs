//! Scripted transport and fixtures shared by the unit tests.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};
use url::Url;

use crate::events::NoOpEmitter;
use crate::http::transport::{OutboundRequest, RawResponse, Transport, TransportError};
use crate::http::ApiClient;
use crate::persist::MemoryStorage;
use crate::session::Session;

pub const BASE: &str = "http://localhost:3080/api";

type Handler = dyn Fn(&OutboundRequest) -> Result<RawResponse, TransportError> + Send + Sync;

/// Answers every request with a closure and records what was sent.
pub struct MockTransport {
    handler: Box<Handler>,
    log: Mutex<Vec<OutboundRequest>>,
    delays: Vec<(String, Duration)>,
}

impl MockTransport {
    pub fn new(
        handler: impl Fn(&OutboundRequest) -> Result<RawResponse, TransportError>
            + Send
            + Sync
            + 'static,
    ) -> Self {
        MockTransport {
            handler: Box::new(handler),
            log: Mutex::new(Vec::new()),
            delays: Vec::new(),
        }
    }

    /// Sleeps before answering requests to `path`, so concurrent callers
    /// can pile up behind it.
    pub fn with_delay_on(mut self, path: &str, delay: Duration) -> Self {
        self.delays.push((path.to_string(), delay));
        self
    }

    pub fn requests(&self) -> Vec<OutboundRequest> {
        self.log.lock().unwrap().clone()
    }

    pub fn requests_to(&self, path: &str) -> Vec<OutboundRequest> {
        self.requests()
            .into_iter()
            .filter(|req| path_of(req) == path)
            .collect()
    }

    pub fn count(&self, path: &str) -> usize {
        self.requests_to(path).len()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: OutboundRequest) -> Result<RawResponse, TransportError> {
        self.log.lock().unwrap().push(request.clone());
        let delay = self
            .delays
            .iter()
            .find(|(path, _)| path_of(&request) == path.as_str())
            .map(|(_, delay)| *delay);
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        (self.handler)(&request)
    }
}

/// Request path with the `/api` base prefix removed.
pub fn path_of(request: &OutboundRequest) -> &str {
    let path = request.url.path();
    path.strip_prefix("/api").unwrap_or(path)
}

pub fn bearer_of(request: &OutboundRequest) -> Option<&str> {
    request.bearer.as_deref()
}

pub fn status(code: u16, body: Value) -> Result<RawResponse, TransportError> {
    Ok(RawResponse {
        status: code,
        body: serde_json::to_vec(&body).unwrap(),
    })
}

/// `200 {"success": true, "message": "OK", "data": data}`.
pub fn ok(data: Value) -> Result<RawResponse, TransportError> {
    status(200, json!({"success": true, "message": "OK", "data": data}))
}

pub fn unauthorized() -> Result<RawResponse, TransportError> {
    status(401, json!({"success": false, "message": "Unauthorized"}))
}

/// List payload with a single-page pagination block.
pub fn page(items: Value) -> Value {
    let total = items.as_array().map(Vec::len).unwrap_or(0);
    json!({
        "data": items,
        "pagination": {
            "total_data": total.to_string(),
            "total_page": 1,
            "total_display": 10,
            "first_page": true,
            "last_page": true,
            "prev": 1,
            "current": 1,
            "next": 1,
            "detail": [1]
        }
    })
}

pub fn test_session() -> Session {
    Session::new(Arc::new(MemoryStorage::new()))
}

pub fn api_client(transport: Arc<MockTransport>, session: Session) -> ApiClient {
    ApiClient::new(
        Url::parse(BASE).unwrap(),
        transport,
        session,
        Arc::new(NoOpEmitter),
    )
}
