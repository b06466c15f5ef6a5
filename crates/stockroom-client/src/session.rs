//! # Session State
//!
//! The access token, the refresh token and the signed-in user's profile.
//!
//! ## Ownership
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Session Ownership                                │
//! │                                                                         │
//! │   AdminClient::new ── Session::restore(storage) ──┐                     │
//! │                                                   │ (cheap clones)      │
//! │          ┌────────────────────┬───────────────────┼──────────────┐      │
//! │          ▼                    ▼                   ▼              ▼      │
//! │     ApiClient          RefreshCoordinator      AuthState     CLI         │
//! │   reads bearer      set_tokens / clear()     login/logout   whoami      │
//! │                                                                         │
//! │   Every mutation writes through to KeyValueStorage["auth"]:             │
//! │     {"token": "...", "refreshToken": "...", "user": {...}}              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariant
//! `is_authenticated() == access_token().is_some()`. Nothing else counts:
//! a held refresh token or profile without an access token is logged out.
//!
//! Persistence failures are logged and swallowed; the in-memory state is
//! updated regardless.

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use serde::{Deserialize, Serialize};
use stockroom_core::UserProfile;
use tracing::{debug, warn};

use crate::persist::KeyValueStorage;

/// Storage key the session is persisted under.
pub const SESSION_KEY: &str = "auth";

/// Plain copy of the session, also its persisted form.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub user: Option<UserProfile>,
}

impl SessionSnapshot {
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }
}

impl fmt::Debug for SessionSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionSnapshot")
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "<redacted>"))
            .field("user", &self.user)
            .finish()
    }
}

/// Shared, persisted session handle.
#[derive(Clone)]
pub struct Session {
    state: Arc<RwLock<SessionSnapshot>>,
    storage: Arc<dyn KeyValueStorage>,
}

impl Session {
    /// Empty session that persists into `storage`.
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Session {
            state: Arc::new(RwLock::new(SessionSnapshot::default())),
            storage,
        }
    }

    /// Session restored from what a previous run persisted.
    ///
    /// Unreadable or corrupt data yields an empty session.
    pub fn restore(storage: Arc<dyn KeyValueStorage>) -> Self {
        let snapshot = match storage.load(SESSION_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<SessionSnapshot>(&raw) {
                Ok(snapshot) => {
                    debug!(authenticated = snapshot.is_authenticated(), "Restored session");
                    snapshot
                }
                Err(e) => {
                    warn!(error = %e, "Discarding unreadable persisted session");
                    SessionSnapshot::default()
                }
            },
            Ok(None) => SessionSnapshot::default(),
            Err(e) => {
                warn!(error = %e, "Failed to read persisted session");
                SessionSnapshot::default()
            }
        };

        Session {
            state: Arc::new(RwLock::new(snapshot)),
            storage,
        }
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Stores a fresh token pair (login or refresh). The profile is kept.
    pub fn set_tokens(&self, access: impl Into<String>, refresh: impl Into<String>) {
        let snapshot = self.update(|s| {
            s.token = Some(access.into());
            s.refresh_token = Some(refresh.into());
        });
        self.persist(&snapshot);
    }

    pub fn set_profile(&self, profile: UserProfile) {
        let snapshot = self.update(|s| s.user = Some(profile));
        self.persist(&snapshot);
    }

    /// Drops every field, in memory and on disk.
    pub fn clear(&self) {
        self.update(|s| *s = SessionSnapshot::default());
        if let Err(e) = self.storage.remove(SESSION_KEY) {
            warn!(error = %e, "Failed to remove persisted session");
        }
        debug!("Session cleared");
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn is_authenticated(&self) -> bool {
        self.read(|s| s.is_authenticated())
    }

    pub fn access_token(&self) -> Option<String> {
        self.read(|s| s.token.clone())
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.read(|s| s.refresh_token.clone())
    }

    pub fn profile(&self) -> Option<UserProfile> {
        self.read(|s| s.user.clone())
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.read(SessionSnapshot::clone)
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn read<R>(&self, f: impl FnOnce(&SessionSnapshot) -> R) -> R {
        let guard = self.state.read().unwrap_or_else(PoisonError::into_inner);
        f(&guard)
    }

    fn update(&self, f: impl FnOnce(&mut SessionSnapshot)) -> SessionSnapshot {
        let mut guard = self.state.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard);
        guard.clone()
    }

    fn persist(&self, snapshot: &SessionSnapshot) {
        let result = serde_json::to_string(snapshot)
            .map_err(crate::error::ClientError::from)
            .and_then(|raw| self.storage.save(SESSION_KEY, &raw));
        if let Err(e) = result {
            warn!(error = %e, "Failed to persist session");
        }
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("state", &self.snapshot())
            .finish_non_exhaustive()
    }
}
