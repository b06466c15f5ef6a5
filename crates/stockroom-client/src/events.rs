//! # Session Events
//!
//! Side effects the client cannot perform itself (navigating to the login
//! screen, refreshing a header) are announced as events. A UI loop, or the
//! CLI, decides what to do with them.
//!
//! ```text
//! AuthState::login ────────────► LoggedIn
//! AuthState::logout ───────────► LoggedOut        ┐
//! AuthState::require_auth(no token) ► Expired      ├─► requires_login() == true
//! RefreshCoordinator (refresh failed) ► Expired    ┘
//! ```

use tokio::sync::broadcast;
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// Tokens stored and profile fetched.
    LoggedIn,

    /// The user signed out on purpose.
    LoggedOut,

    /// The session was torn down because it could not be renewed, or a
    /// guarded action found no session at all.
    Expired,
}

impl SessionEvent {
    /// Returns true if the listener should route to the login entry point.
    pub fn requires_login(&self) -> bool {
        matches!(self, SessionEvent::LoggedOut | SessionEvent::Expired)
    }
}

/// Trait for announcing session events (implemented by the UI integration).
pub trait SessionEventEmitter: Send + Sync {
    fn emit(&self, event: SessionEvent);
}

/// No-op event emitter for testing.
pub struct NoOpEmitter;

impl SessionEventEmitter for NoOpEmitter {
    fn emit(&self, _event: SessionEvent) {}
}

/// Fans events out to any number of subscribers.
///
/// Events emitted while nobody is subscribed are dropped.
#[derive(Debug, Clone)]
pub struct BroadcastEmitter {
    tx: broadcast::Sender<SessionEvent>,
}

impl BroadcastEmitter {
    pub fn new(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel(capacity.max(1));
        BroadcastEmitter { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.tx.subscribe()
    }
}

impl Default for BroadcastEmitter {
    fn default() -> Self {
        Self::new(16)
    }
}

impl SessionEventEmitter for BroadcastEmitter {
    fn emit(&self, event: SessionEvent) {
        let delivered = self.tx.send(event).unwrap_or(0);
        trace!(?event, delivered, "Session event emitted");
    }
}
