//! Login, profile and logout endpoints.
//!
//! The refresh endpoint is not here: it is owned by the
//! [`RefreshCoordinator`](crate::http::RefreshCoordinator) and never goes
//! through the 401 interceptor.

use stockroom_core::validation::validate_credentials;
use stockroom_core::{LoginCredentials, QueryParams, TokenPair, UserProfile};
use tracing::debug;

use crate::error::ClientResult;
use crate::http::{ApiClient, HttpMethod};

pub const LOGIN_PATH: &str = "/auth/login";
pub const LOGOUT_PATH: &str = "/auth/logout";
pub const PROFILE_PATH: &str = "/user/profile";

#[derive(Clone)]
pub struct AuthApi {
    client: ApiClient,
}

impl AuthApi {
    pub fn new(client: ApiClient) -> Self {
        AuthApi { client }
    }

    /// Exchanges credentials for a token pair. Does not touch the session,
    /// and is sent without whatever token the session still holds.
    pub async fn login(&self, credentials: &LoginCredentials) -> ClientResult<TokenPair> {
        validate_credentials(&credentials.email, &credentials.password)?;
        debug!(email = %credentials.email, "Logging in");
        self.client.post_anonymous(LOGIN_PATH, credentials).await
    }

    pub async fn profile(&self) -> ClientResult<UserProfile> {
        self.client.get(PROFILE_PATH, QueryParams::new()).await
    }

    pub async fn logout(&self) -> ClientResult<()> {
        self.client
            .request_ack(HttpMethod::Post, LOGOUT_PATH, None)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClientError;
    use crate::test_support::{api_client, ok, path_of, test_session, MockTransport};
    use serde_json::json;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_login_posts_credentials() {
        let transport = Arc::new(MockTransport::new(|req| {
            assert_eq!(path_of(req), LOGIN_PATH);
            assert_eq!(
                req.body,
                Some(json!({"email": "admin@toko.id", "password": "rahasia"}))
            );
            ok(json!({"token": "t1", "refreshToken": "r1"}))
        }));
        let api = AuthApi::new(api_client(transport, test_session()));

        let pair = api
            .login(&LoginCredentials::new("admin@toko.id", "rahasia"))
            .await
            .unwrap();
        assert_eq!(pair.token, "t1");
        assert_eq!(pair.refresh_token, "r1");
    }

    #[tokio::test]
    async fn test_blank_email_never_leaves_the_client() {
        let transport = Arc::new(MockTransport::new(|_| ok(json!(null))));
        let api = AuthApi::new(api_client(transport.clone(), test_session()));

        let err = api
            .login(&LoginCredentials::new("  ", "rahasia"))
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Validation(_)));
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_logout_accepts_missing_data() {
        let transport = Arc::new(MockTransport::new(|_| {
            ok(json!(null))
        }));
        let api = AuthApi::new(api_client(transport.clone(), test_session()));

        api.logout().await.unwrap();
        assert_eq!(transport.count(LOGOUT_PATH), 1);
    }
}
