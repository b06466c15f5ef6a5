//! # Auth State
//!
//! Login, logout, the current user and the route guard.
//!
//! ```text
//! login(credentials)
//!    │  POST /auth/login ──► session.set_tokens(token, refreshToken)
//!    │  GET  /user/profile ─► session.set_profile(user)   (Bearer <token>)
//!    └► emit LoggedIn
//!
//! logout()
//!    │  POST /auth/logout   (best effort, failure only logged)
//!    │  session.clear()
//!    └► emit LoggedOut
//!
//! require_auth()
//!    ├─ no token ──────────► emit Expired, false
//!    └─ token ─► GET /user/profile ─► still authenticated?
//! ```

use std::sync::{Arc, Mutex, PoisonError};

use stockroom_core::{LoginCredentials, UserProfile};
use tracing::{info, warn};

use crate::error::{ClientError, ClientResult};
use crate::events::{SessionEvent, SessionEventEmitter};
use crate::services::AuthApi;
use crate::session::Session;

/// Progress of the last auth action.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthStatus {
    pub loading: bool,
    pub error: Option<String>,
}

#[derive(Clone)]
pub struct AuthState {
    api: AuthApi,
    session: Session,
    emitter: Arc<dyn SessionEventEmitter>,
    status: Arc<Mutex<AuthStatus>>,
}

impl AuthState {
    pub fn new(api: AuthApi, session: Session, emitter: Arc<dyn SessionEventEmitter>) -> Self {
        AuthState {
            api,
            session,
            emitter,
            status: Arc::new(Mutex::new(AuthStatus::default())),
        }
    }

    pub fn status(&self) -> AuthStatus {
        self.status
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    pub fn user(&self) -> Option<UserProfile> {
        self.session.profile()
    }

    /// Signs in, stores the token pair and loads the profile.
    ///
    /// An ordinary profile fetch failure does not fail the login. Losing the
    /// session while fetching it does.
    pub async fn login(&self, credentials: &LoginCredentials) -> ClientResult<()> {
        self.set_status(true, None);

        let pair = match self.api.login(credentials).await {
            Ok(pair) => pair,
            Err(e) => {
                let message = e.display_message("Login failed");
                warn!(email = %credentials.email, error = %e, "Login failed");
                self.set_status(false, Some(message));
                return Err(e);
            }
        };

        self.session.set_tokens(pair.token, pair.refresh_token);
        self.fetch_user_profile().await;

        // The profile call can still end the session if its 401 could not
        // be recovered from.
        if !self.session.is_authenticated() {
            let e = ClientError::SessionExpired;
            self.set_status(false, Some(e.to_string()));
            return Err(e);
        }
        self.set_status(false, None);

        info!(email = %credentials.email, "Logged in");
        self.emitter.emit(SessionEvent::LoggedIn);
        Ok(())
    }

    /// Loads the profile into the session. Does nothing without a token;
    /// failures are logged and otherwise ignored.
    pub async fn fetch_user_profile(&self) -> Option<UserProfile> {
        if !self.session.is_authenticated() {
            return None;
        }

        match self.api.profile().await {
            Ok(profile) => {
                self.session.set_profile(profile.clone());
                Some(profile)
            }
            Err(e) => {
                warn!(error = %e, "Failed to fetch user profile");
                None
            }
        }
    }

    pub async fn logout(&self) {
        if self.session.is_authenticated() {
            if let Err(e) = self.api.logout().await {
                warn!(error = %e, "Logout request failed, clearing session anyway");
            }
        }

        self.session.clear();
        self.set_status(false, None);
        info!("Logged out");
        self.emitter.emit(SessionEvent::LoggedOut);
    }

    /// Guard for anything that needs a session. Returns false, and announces
    /// it, when the user has to log in.
    pub async fn require_auth(&self) -> bool {
        if !self.session.is_authenticated() {
            self.emitter.emit(SessionEvent::Expired);
            return false;
        }

        match self.api.profile().await {
            Ok(profile) => {
                self.session.set_profile(profile);
                true
            }
            // The refresh coordinator already tore the session down and
            // emitted Expired.
            Err(ClientError::SessionExpired) => false,
            Err(ClientError::Unauthorized) => {
                self.emitter.emit(SessionEvent::Expired);
                false
            }
            Err(e) => {
                warn!(error = %e, "Could not revalidate session");
                self.session.is_authenticated()
            }
        }
    }

    fn set_status(&self, loading: bool, error: Option<String>) {
        let mut status = self.status.lock().unwrap_or_else(PoisonError::into_inner);
        status.loading = loading;
        status.error = error;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::BroadcastEmitter;
    use crate::http::REFRESH_PATH;
    use crate::services::auth::{LOGIN_PATH, LOGOUT_PATH, PROFILE_PATH};
    use crate::test_support::{
        api_client, bearer_of, ok, path_of, status, test_session, unauthorized, MockTransport,
    };
    use serde_json::json;
    use tokio::sync::broadcast::error::TryRecvError;

    fn profile() -> serde_json::Value {
        json!({"email": "admin@toko.id", "fullname": "Admin Toko", "usercreated": "2024-01-01"})
    }

    fn auth_state(transport: Arc<MockTransport>, session: Session) -> (AuthState, BroadcastEmitter) {
        let emitter = BroadcastEmitter::default();
        let state = AuthState::new(
            AuthApi::new(api_client(transport, session.clone())),
            session,
            Arc::new(emitter.clone()),
        );
        (state, emitter)
    }

    #[tokio::test]
    async fn test_login_stores_tokens_and_fetches_profile_with_bearer() {
        let transport = Arc::new(MockTransport::new(|req| match path_of(req) {
            LOGIN_PATH => ok(json!({"token": "t1", "refreshToken": "r1"})),
            PROFILE_PATH => ok(profile()),
            other => panic!("unexpected path {other}"),
        }));
        let session = test_session();
        let (state, emitter) = auth_state(transport.clone(), session.clone());
        let mut events = emitter.subscribe();

        state
            .login(&LoginCredentials::new("admin@toko.id", "rahasia"))
            .await
            .unwrap();

        assert_eq!(session.access_token().as_deref(), Some("t1"));
        assert_eq!(session.refresh_token().as_deref(), Some("r1"));
        assert_eq!(state.user().unwrap().fullname, "Admin Toko");
        assert_eq!(state.status(), AuthStatus::default());

        let profile_request = &transport.requests_to(PROFILE_PATH)[0];
        assert_eq!(bearer_of(profile_request), Some("t1"));
        assert_eq!(events.recv().await.unwrap(), SessionEvent::LoggedIn);
    }

    #[tokio::test]
    async fn test_rejected_login_records_server_message() {
        let transport = Arc::new(MockTransport::new(|_| {
            status(200, json!({"success": false, "message": "Invalid email or password", "data": null}))
        }));
        let session = test_session();
        let (state, emitter) = auth_state(transport, session.clone());
        let mut events = emitter.subscribe();

        let err = state
            .login(&LoginCredentials::new("admin@toko.id", "salah"))
            .await
            .unwrap_err();

        assert_eq!(err.display_message("Login failed"), "Invalid email or password");
        let status = state.status();
        assert!(!status.loading);
        assert_eq!(status.error.as_deref(), Some("Invalid email or password"));
        assert!(!session.is_authenticated());
        assert_eq!(events.try_recv(), Err(TryRecvError::Empty));
    }

    #[tokio::test]
    async fn test_login_over_stale_session_reports_bad_credentials() {
        let transport = Arc::new(MockTransport::new(|req| match path_of(req) {
            LOGIN_PATH => status(401, json!({"success": false, "message": "Invalid email or password"})),
            REFRESH_PATH => ok(json!({"token": "t2", "refreshToken": "r2"})),
            other => panic!("unexpected path {other}"),
        }));
        let session = test_session();
        session.set_tokens("t0", "r0");
        let (state, emitter) = auth_state(transport.clone(), session.clone());
        let mut events = emitter.subscribe();

        let err = state
            .login(&LoginCredentials::new("admin@toko.id", "salah"))
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(401));
        assert_eq!(state.status().error.as_deref(), Some("Invalid email or password"));
        assert_eq!(bearer_of(&transport.requests_to(LOGIN_PATH)[0]), None);
        assert_eq!(transport.count(REFRESH_PATH), 0);
        assert_eq!(session.access_token().as_deref(), Some("t0"));
        assert_eq!(events.try_recv(), Err(TryRecvError::Empty));
    }

    #[tokio::test]
    async fn test_logout_clears_session_even_when_request_fails() {
        let transport = Arc::new(MockTransport::new(|_| {
            status(500, json!({"message": "boom"}))
        }));
        let session = test_session();
        session.set_tokens("t1", "r1");
        let (state, emitter) = auth_state(transport.clone(), session.clone());
        let mut events = emitter.subscribe();

        state.logout().await;

        assert!(!session.is_authenticated());
        assert_eq!(transport.count(LOGOUT_PATH), 1);
        assert_eq!(events.recv().await.unwrap(), SessionEvent::LoggedOut);
    }

    #[tokio::test]
    async fn test_require_auth_without_token_emits_expired() {
        let transport = Arc::new(MockTransport::new(|_| ok(profile())));
        let (state, emitter) = auth_state(transport.clone(), test_session());
        let mut events = emitter.subscribe();

        assert!(!state.require_auth().await);
        assert_eq!(events.recv().await.unwrap(), SessionEvent::Expired);
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_require_auth_revalidates_profile() {
        let transport = Arc::new(MockTransport::new(|_| ok(profile())));
        let session = test_session();
        session.set_tokens("t1", "r1");
        let (state, _) = auth_state(transport, session.clone());

        assert!(state.require_auth().await);
        assert_eq!(session.profile().unwrap().email, "admin@toko.id");
    }

    #[tokio::test]
    async fn test_require_auth_fails_when_refresh_fails() {
        let transport = Arc::new(MockTransport::new(|req| match path_of(req) {
            REFRESH_PATH => status(401, json!({"message": "refresh token expired"})),
            _ => unauthorized(),
        }));
        let session = test_session();
        session.set_tokens("t1", "r1");
        let (state, _) = auth_state(transport, session.clone());

        assert!(!state.require_auth().await);
        assert!(!session.is_authenticated());
    }

    #[tokio::test]
    async fn test_profile_failure_is_swallowed() {
        let transport = Arc::new(MockTransport::new(|_| {
            status(500, json!({"message": "boom"}))
        }));
        let session = test_session();
        session.set_tokens("t1", "r1");
        let (state, _) = auth_state(transport, session);

        assert!(state.fetch_user_profile().await.is_none());
        assert!(state.status().error.is_none());
    }
}
