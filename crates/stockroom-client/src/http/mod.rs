//! # HTTP Dispatcher
//!
//! [`ApiClient`] is the only way the rest of the crate talks to the backend.
//! It attaches the bearer token, classifies responses, and turns a 401 into
//! one refresh plus one replay.
//!
//! ## Request Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        ApiClient::execute                               │
//! │                                                                         │
//! │  RequestEnvelope (immutable)          Attempt::Initial                  │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  bearer = session.access_token()                                        │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  transport.send() ──── Err ─────────────────────────► Network           │
//! │        │                                                                │
//! │        ├── 2xx ─────────────────────────────────────► Ok(response)      │
//! │        ├── 4xx/5xx (not 401) ───────────────────────► Server{status}    │
//! │        └── 401                                                          │
//! │             ├── Attempt::Replay ─────────────────────► Unauthorized     │
//! │             ├── no bearer sent ──────────────────────► Server{401}      │
//! │             └── coordinator.recover(stale)                              │
//! │                      ├── Err ────────────────────────► SessionExpired   │
//! │                      └── Ok(fresh) ─► Attempt::Replay, bearer = fresh   │
//! │                                        (loop once more)                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod envelope;
pub mod refresh;
pub mod transport;

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use stockroom_core::{Acknowledgement, ApiEnvelope, QueryParams};
use tracing::{debug, warn};
use url::Url;

pub use envelope::{Attempt, RequestEnvelope};
pub use refresh::{RefreshCoordinator, RefreshPhase, REFRESH_PATH};
pub use transport::{
    HttpMethod, OutboundRequest, RawResponse, ReqwestTransport, Transport, TransportError,
};

use crate::error::{ClientError, ClientResult};
use crate::events::SessionEventEmitter;
use crate::session::Session;

/// Authenticated JSON client for the admin backend.
///
/// Cheap to clone; clones share the session and the refresh coordinator.
#[derive(Clone)]
pub struct ApiClient {
    base_url: Url,
    transport: Arc<dyn Transport>,
    session: Session,
    coordinator: Arc<RefreshCoordinator>,
}

impl ApiClient {
    pub fn new(
        base_url: Url,
        transport: Arc<dyn Transport>,
        session: Session,
        emitter: Arc<dyn SessionEventEmitter>,
    ) -> Self {
        let coordinator = Arc::new(RefreshCoordinator::new(
            base_url.clone(),
            transport.clone(),
            session.clone(),
            emitter,
        ));

        ApiClient {
            base_url,
            transport,
            session,
            coordinator,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn coordinator(&self) -> &RefreshCoordinator {
        &self.coordinator
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // =========================================================================
    // Typed Requests
    // =========================================================================

    /// Sends a request and unwraps the `data` field of the response envelope.
    pub async fn request<T: DeserializeOwned>(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<Value>,
        query: QueryParams,
    ) -> ClientResult<T> {
        let envelope = RequestEnvelope::new(method, path, body, query);
        let response = self.execute(&envelope).await?;
        decode_data(&response)
    }

    /// Sends a request whose response carries no useful `data`.
    pub async fn request_ack(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<Value>,
    ) -> ClientResult<()> {
        let envelope = RequestEnvelope::new(method, path, body, QueryParams::new());
        let response = self.execute(&envelope).await?;
        let ack: Acknowledgement = response.json()?;
        reject_unsuccessful(&ack, response.status)
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str, query: QueryParams) -> ClientResult<T> {
        self.request(HttpMethod::Get, path, None, query).await
    }

    pub async fn post<T, B>(&self, path: &str, body: &B) -> ClientResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let body = serde_json::to_value(body)?;
        self.request(HttpMethod::Post, path, Some(body), QueryParams::new())
            .await
    }

    pub async fn put<T, B>(&self, path: &str, body: &B) -> ClientResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let body = serde_json::to_value(body)?;
        self.request(HttpMethod::Put, path, Some(body), QueryParams::new())
            .await
    }

    /// `PUT` without a body (status transitions).
    pub async fn put_empty<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        self.request(HttpMethod::Put, path, None, QueryParams::new())
            .await
    }

    /// `POST` without a bearer and outside the 401 interceptor, for calls
    /// that establish a session instead of using one. A 401 here is the
    /// server's answer, not an expired token.
    pub async fn post_anonymous<T, B>(&self, path: &str, body: &B) -> ClientResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let body = serde_json::to_value(body)?;
        let envelope = RequestEnvelope::new(HttpMethod::Post, path, Some(body), QueryParams::new());
        debug!(
            request_id = %envelope.id(),
            path = envelope.path(),
            "Sending anonymous request"
        );

        let response = self
            .transport
            .send(envelope.to_outbound(&self.base_url, None)?)
            .await?;
        let response = classify(&envelope, response)?;
        decode_data(&response)
    }

    pub async fn post_ack<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> ClientResult<()> {
        let body = serde_json::to_value(body)?;
        self.request_ack(HttpMethod::Post, path, Some(body)).await
    }

    pub async fn delete_ack(&self, path: &str) -> ClientResult<()> {
        self.request_ack(HttpMethod::Delete, path, None).await
    }

    // =========================================================================
    // Dispatch
    // =========================================================================

    async fn execute(&self, envelope: &RequestEnvelope) -> ClientResult<RawResponse> {
        let mut attempt = Attempt::Initial;
        let mut bearer = self.session.access_token();

        loop {
            debug!(
                request_id = %envelope.id(),
                method = %envelope.method(),
                path = envelope.path(),
                attempt = attempt.number(),
                authenticated = bearer.is_some(),
                "Sending request"
            );

            let outbound = envelope.to_outbound(&self.base_url, bearer.clone())?;
            let response = match self.transport.send(outbound).await {
                Ok(response) => response,
                Err(e) => {
                    warn!(
                        request_id = %envelope.id(),
                        path = envelope.path(),
                        error = %e,
                        "Request failed without a response"
                    );
                    return Err(e.into());
                }
            };

            if response.status != 401 {
                return classify(envelope, response);
            }

            match (attempt, bearer.as_deref()) {
                (Attempt::Replay, _) => {
                    warn!(
                        request_id = %envelope.id(),
                        path = envelope.path(),
                        "Replay rejected with 401"
                    );
                    return Err(ClientError::Unauthorized);
                }
                (Attempt::Initial, None) => {
                    return Err(ClientError::Server {
                        status: 401,
                        message: response
                            .server_message()
                            .unwrap_or_else(|| status_text(401)),
                    });
                }
                (Attempt::Initial, Some(stale)) => {
                    debug!(
                        request_id = %envelope.id(),
                        path = envelope.path(),
                        "Access token rejected, recovering session"
                    );
                    let fresh = self.coordinator.recover(stale).await?;
                    bearer = Some(fresh);
                    attempt = Attempt::Replay;
                }
            }
        }
    }
}

fn classify(envelope: &RequestEnvelope, response: RawResponse) -> ClientResult<RawResponse> {
    if response.is_success() {
        debug!(
            request_id = %envelope.id(),
            status = response.status,
            "Request succeeded"
        );
        return Ok(response);
    }

    let message = response
        .server_message()
        .unwrap_or_else(|| status_text(response.status));
    debug!(
        request_id = %envelope.id(),
        path = envelope.path(),
        status = response.status,
        message = %message,
        "Server returned an error"
    );
    Err(ClientError::Server {
        status: response.status,
        message,
    })
}

fn status_text(status: u16) -> String {
    format!("Request failed with status code {status}")
}

/// A 2xx can still carry `success: false`; that is checked before `data`
/// is decoded, since refused calls often send `data: null`.
fn decode_data<T: DeserializeOwned>(response: &RawResponse) -> ClientResult<T> {
    let ack: Acknowledgement = response.json()?;
    reject_unsuccessful(&ack, response.status)?;

    let envelope: ApiEnvelope<T> = response.json()?;
    Ok(envelope.into_data()?)
}

fn reject_unsuccessful(ack: &Acknowledgement, status: u16) -> ClientResult<()> {
    if ack.success {
        Ok(())
    } else {
        Err(ClientError::Server {
            status,
            message: ack.message.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{
        api_client, bearer_of, ok, path_of, status, test_session, unauthorized, MockTransport,
    };
    use serde_json::json;
    use std::time::Duration;
    use stockroom_core::{ListFilter, ToQuery};

    fn rotating_backend() -> MockTransport {
        MockTransport::new(|req| match path_of(req) {
            REFRESH_PATH => ok(json!({"token": "t2", "refreshToken": "r2"})),
            _ if bearer_of(req) == Some("t2") => ok(json!({"path": path_of(req)})),
            _ => unauthorized(),
        })
    }

    #[tokio::test]
    async fn test_attaches_bearer_from_session() {
        let transport = Arc::new(MockTransport::new(|_| ok(json!(1))));
        let session = test_session();
        let client = api_client(transport.clone(), session.clone());

        let _: u32 = client.get("/user/profile", QueryParams::new()).await.unwrap();
        session.set_tokens("t1", "r1");
        let _: u32 = client.get("/user/profile", QueryParams::new()).await.unwrap();

        let sent = transport.requests();
        assert_eq!(bearer_of(&sent[0]), None);
        assert_eq!(bearer_of(&sent[1]), Some("t1"));
    }

    #[tokio::test]
    async fn test_anonymous_post_ignores_session_and_never_refreshes() {
        let transport = Arc::new(MockTransport::new(|req| match path_of(req) {
            REFRESH_PATH => ok(json!({"token": "t2", "refreshToken": "r2"})),
            _ => status(401, json!({"success": false, "message": "Invalid email or password"})),
        }));
        let session = test_session();
        session.set_tokens("stale", "r-stale");
        let client = api_client(transport.clone(), session.clone());

        let err = client
            .post_anonymous::<Value, _>("/auth/login", &json!({"email": "a@b.c"}))
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(401));
        assert_eq!(err.display_message("Login failed"), "Invalid email or password");
        let sent = transport.requests();
        assert_eq!(sent.len(), 1);
        assert_eq!(bearer_of(&sent[0]), None);
        assert_eq!(transport.count(REFRESH_PATH), 0);
        assert_eq!(session.access_token().as_deref(), Some("stale"));
    }

    #[tokio::test]
    async fn test_query_string_is_exact() {
        let transport = Arc::new(MockTransport::new(|_| ok(json!(null))));
        let client = api_client(transport.clone(), test_session());

        let query = ListFilter::search("foo").with_page(2).to_query();
        let _: Value = client.get("/products/all", query).await.unwrap();

        let sent = transport.requests();
        assert_eq!(sent[0].url.query(), Some("search=foo&page=2"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_401s_share_one_refresh() {
        let transport = Arc::new(
            rotating_backend().with_delay_on(REFRESH_PATH, Duration::from_millis(200)),
        );
        let session = test_session();
        session.set_tokens("t1", "r1");
        let client = api_client(transport.clone(), session.clone());

        let (a, b) = tokio::join!(
            client.get::<Value>("/products/all", QueryParams::new()),
            client.get::<Value>("/categories/all", QueryParams::new()),
        );

        assert_eq!(a.unwrap()["path"], "/products/all");
        assert_eq!(b.unwrap()["path"], "/categories/all");
        assert_eq!(transport.count(REFRESH_PATH), 1);

        let replays: Vec<_> = transport
            .requests()
            .into_iter()
            .filter(|req| path_of(req) != REFRESH_PATH && bearer_of(req) == Some("t2"))
            .collect();
        assert_eq!(replays.len(), 2);
        assert_eq!(session.access_token().as_deref(), Some("t2"));
    }

    #[tokio::test]
    async fn test_401_after_replay_is_unauthorized() {
        let transport = Arc::new(MockTransport::new(|req| match path_of(req) {
            REFRESH_PATH => ok(json!({"token": "t2", "refreshToken": "r2"})),
            _ => unauthorized(),
        }));
        let session = test_session();
        session.set_tokens("t1", "r1");
        let client = api_client(transport.clone(), session.clone());

        let err = client
            .get::<Value>("/quotations", QueryParams::new())
            .await
            .unwrap_err();

        assert!(matches!(err, ClientError::Unauthorized));
        assert_eq!(transport.count(REFRESH_PATH), 1);
        assert_eq!(transport.count("/quotations"), 2);
        // The refreshed session stays; only a failed refresh tears it down.
        assert!(session.is_authenticated());
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_refresh_expires_every_waiter() {
        let transport = Arc::new(
            MockTransport::new(|req| match path_of(req) {
                REFRESH_PATH => status(500, json!({"success": false, "message": "boom"})),
                _ => unauthorized(),
            })
            .with_delay_on(REFRESH_PATH, Duration::from_millis(200)),
        );
        let session = test_session();
        session.set_tokens("t1", "r1");
        let client = api_client(transport.clone(), session.clone());

        let (a, b) = tokio::join!(
            client.get::<Value>("/store/all", QueryParams::new()),
            client.get::<Value>("/akun/all", QueryParams::new()),
        );

        assert!(matches!(a, Err(ClientError::SessionExpired)));
        assert!(matches!(b, Err(ClientError::SessionExpired)));
        assert_eq!(transport.count(REFRESH_PATH), 1);
        assert!(!session.is_authenticated());
    }

    #[tokio::test]
    async fn test_anonymous_401_does_not_refresh() {
        let transport = Arc::new(MockTransport::new(|_| {
            status(401, json!({"success": false, "message": "Invalid email or password"}))
        }));
        let client = api_client(transport.clone(), test_session());

        let err = client
            .post::<Value, _>("/auth/login", &json!({"email": "a@b.c", "password": "x"}))
            .await
            .unwrap_err();

        match err {
            ClientError::Server { status, message } => {
                assert_eq!(status, 401);
                assert_eq!(message, "Invalid email or password");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(transport.count(REFRESH_PATH), 0);
    }

    #[tokio::test]
    async fn test_server_error_message() {
        let transport = Arc::new(MockTransport::new(|req| match path_of(req) {
            "/categories/create" => status(500, json!({"message": "Database down"})),
            _ => Ok(RawResponse {
                status: 404,
                body: b"<html>Not Found</html>".to_vec(),
            }),
        }));
        let client = api_client(transport, test_session());

        let err = client
            .post::<Value, _>("/categories/create", &json!({"name": "Snacks"}))
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(500));
        assert_eq!(err.display_message("Failed"), "Database down");

        let err = client
            .get::<Value>("/nowhere", QueryParams::new())
            .await
            .unwrap_err();
        assert_eq!(
            err.display_message("fallback"),
            "Request failed with status code 404"
        );
    }

    #[tokio::test]
    async fn test_success_false_on_2xx_is_server_error() {
        let transport = Arc::new(MockTransport::new(|_| {
            status(200, json!({"success": false, "message": "Name already used", "data": null}))
        }));
        let client = api_client(transport, test_session());

        let err = client
            .post::<Value, _>("/store/create", &json!({"name": "Main"}))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ClientError::Server { status: 200, ref message } if message == "Name already used"
        ));

        let err = client.delete_ack("/quotations/Q1").await.unwrap_err();
        assert_eq!(err.display_message("Failed"), "Name already used");
    }

    #[tokio::test]
    async fn test_transport_failure_is_network_error() {
        let transport = Arc::new(MockTransport::new(|_| {
            Err(TransportError::Connect("connection refused".into()))
        }));
        let session = test_session();
        session.set_tokens("t1", "r1");
        let client = api_client(transport.clone(), session);

        let err = client
            .get::<Value>("/dashboard/summary-general", QueryParams::new())
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Network(_)));
        assert!(err.is_retryable());
        assert_eq!(transport.count(REFRESH_PATH), 0);
    }

    #[tokio::test]
    async fn test_malformed_success_body_is_decode_error() {
        let transport = Arc::new(MockTransport::new(|_| {
            ok(json!({"unexpected": true}))
        }));
        let client = api_client(transport, test_session());

        let err = client
            .get::<stockroom_core::UserProfile>("/user/profile", QueryParams::new())
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Decode(_)));
    }
}
