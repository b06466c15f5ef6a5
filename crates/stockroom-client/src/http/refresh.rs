//! # Refresh Coordinator
//!
//! Turns a 401 into at most one call to `POST /auth/refresh-token`, no matter
//! how many requests hit the 401 at the same time.
//!
//! ## State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Refresh Coordinator                               │
//! │                                                                         │
//! │             first 401 with the current token                            │
//! │   ┌──────┐ ─────────────────────────────────► ┌────────────┐            │
//! │   │ Idle │                                    │ Refreshing │            │
//! │   └──────┘ ◄───────────────────────────────── └─────┬──────┘            │
//! │      ▲        success: session.set_tokens()         │                   │
//! │      │                                              │ failure           │
//! │      │        ┌────────┐                            │                   │
//! │      └─────── │ Failed │ ◄──────────────────────────┘                   │
//! │               └────────┘  session.clear(), emit Expired                 │
//! │                                                                         │
//! │  Concurrent 401s queue on an async mutex. A waiter that finds the       │
//! │  session token already different from the one that failed returns      │
//! │  the new token without refreshing again.                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The refresh call goes straight to the transport: it carries no bearer and
//! its own 401 is a refresh failure, never another interception.

use std::sync::{Arc, Mutex, PoisonError};

use stockroom_core::{ApiEnvelope, QueryParams, RefreshTokenRequest, TokenPair, ValidationError};
use tokio::sync::Mutex as AsyncMutex;
use tracing::{debug, info, warn};
use url::Url;

use super::envelope::RequestEnvelope;
use super::transport::{HttpMethod, Transport};
use crate::error::{ClientError, ClientResult};
use crate::events::{SessionEvent, SessionEventEmitter};
use crate::session::Session;

pub const REFRESH_PATH: &str = "/auth/refresh-token";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshPhase {
    /// Initial and resting state.
    Idle,
    Refreshing,
    /// Momentary; the coordinator returns to `Idle` once the session is torn down.
    Failed,
}

pub struct RefreshCoordinator {
    gate: AsyncMutex<()>,
    phase: Mutex<RefreshPhase>,
    base_url: Url,
    transport: Arc<dyn Transport>,
    session: Session,
    emitter: Arc<dyn SessionEventEmitter>,
}

impl RefreshCoordinator {
    pub fn new(
        base_url: Url,
        transport: Arc<dyn Transport>,
        session: Session,
        emitter: Arc<dyn SessionEventEmitter>,
    ) -> Self {
        RefreshCoordinator {
            gate: AsyncMutex::new(()),
            phase: Mutex::new(RefreshPhase::Idle),
            base_url,
            transport,
            session,
            emitter,
        }
    }

    pub fn phase(&self) -> RefreshPhase {
        *self.phase.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Produces a usable access token after `stale` was rejected with a 401.
    ///
    /// Returns [`ClientError::SessionExpired`] when the session cannot be
    /// renewed, including when an earlier waiter's refresh already failed.
    pub async fn recover(&self, stale: &str) -> ClientResult<String> {
        let _gate = self.gate.lock().await;

        match self.session.access_token() {
            None => {
                debug!("Session already cleared, not refreshing");
                Err(ClientError::SessionExpired)
            }
            Some(current) if current != stale => {
                debug!("Token already rotated by a concurrent refresh");
                Ok(current)
            }
            Some(_) => self.refresh().await,
        }
    }

    async fn refresh(&self) -> ClientResult<String> {
        self.set_phase(RefreshPhase::Refreshing);
        debug!("Refreshing access token");

        match self.request_new_tokens().await {
            Ok(pair) => {
                let token = pair.token.clone();
                self.session.set_tokens(pair.token, pair.refresh_token);
                self.set_phase(RefreshPhase::Idle);
                info!("Access token refreshed");
                Ok(token)
            }
            Err(reason) => {
                self.set_phase(RefreshPhase::Failed);
                warn!(error = %reason, "Token refresh failed, ending session");
                self.session.clear();
                self.emitter.emit(SessionEvent::Expired);
                self.set_phase(RefreshPhase::Idle);
                Err(ClientError::SessionExpired)
            }
        }
    }

    async fn request_new_tokens(&self) -> ClientResult<TokenPair> {
        let refresh_token = self
            .session
            .refresh_token()
            .ok_or_else(|| ValidationError::Required {
                field: "refreshToken".into(),
            })?;

        let body = serde_json::to_value(RefreshTokenRequest { refresh_token })?;
        let envelope =
            RequestEnvelope::new(HttpMethod::Post, REFRESH_PATH, Some(body), QueryParams::new());
        let response = self
            .transport
            .send(envelope.to_outbound(&self.base_url, None)?)
            .await?;

        if !response.is_success() {
            return Err(ClientError::Server {
                status: response.status,
                message: response.server_message().unwrap_or_default(),
            });
        }

        let envelope: ApiEnvelope<TokenPair> = response.json()?;
        Ok(envelope.into_data()?)
    }

    fn set_phase(&self, phase: RefreshPhase) {
        *self.phase.lock().unwrap_or_else(PoisonError::into_inner) = phase;
    }
}
