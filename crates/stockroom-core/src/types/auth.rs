//! Authentication payloads.

use std::fmt;

use serde::{Deserialize, Serialize};

/// `POST /auth/login` body.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginCredentials {
    pub email: String,
    pub password: String,
}

impl LoginCredentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        LoginCredentials {
            email: email.into(),
            password: password.into(),
        }
    }
}

// Never print the password, not even under `{:?}`.
impl fmt::Debug for LoginCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginCredentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// `data` of both the login and the refresh-token responses.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub token: String,
    pub refresh_token: String,
}

impl fmt::Debug for TokenPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("TokenPair { .. }")
    }
}

/// `POST /auth/refresh-token` body.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

/// `GET /user/profile` payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub email: String,
    pub fullname: String,
    /// Account creation timestamp, as the server formats it.
    #[serde(default)]
    pub usercreated: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_pair_wire_names() {
        let pair: TokenPair =
            serde_json::from_str(r#"{"token": "t1", "refreshToken": "r1"}"#).unwrap();
        assert_eq!(pair.token, "t1");
        assert_eq!(pair.refresh_token, "r1");
    }

    #[test]
    fn test_secrets_are_not_debug_printed() {
        let creds = LoginCredentials::new("a@b.c", "hunter2");
        assert!(!format!("{creds:?}").contains("hunter2"));

        let pair = TokenPair {
            token: "t1".into(),
            refresh_token: "r1".into(),
        };
        assert!(!format!("{pair:?}").contains("t1"));
    }

    #[test]
    fn test_refresh_request_body() {
        let body = serde_json::to_value(RefreshTokenRequest {
            refresh_token: "r1".into(),
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({"refreshToken": "r1"}));
    }
}
