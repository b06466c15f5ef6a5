//! # stockroom-client: Authenticated API Access for the Stockroom Admin
//!
//! Everything that talks to the backend: the persisted session, the HTTP
//! dispatcher that attaches the bearer token and intercepts 401s, the
//! single-flight refresh coordinator, typed services per resource and the
//! state containers a UI binds to.
//!
//! ## Architecture Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Admin Client Architecture                        │
//! │                                                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                    AdminClient (composition root)                │  │
//! │  │  one Session ─ one ApiClient ─ one RefreshCoordinator            │  │
//! │  └────────────────────────────┬─────────────────────────────────────┘  │
//! │                               │                                         │
//! │         ┌─────────────────────┼─────────────────────┐                  │
//! │         ▼                     ▼                     ▼                   │
//! │  ┌────────────────┐  ┌────────────────┐  ┌────────────────────────┐    │
//! │  │  state/        │  │  services/     │  │  http/                 │    │
//! │  │                │  │                │  │                        │    │
//! │  │ AuthState      │─►│ AuthApi        │─►│ ApiClient              │    │
//! │  │ CatalogState   │  │ CatalogApi<R>  │  │  bearer ─ 401 ─ replay │    │
//! │  │ TransactionSt. │  │ TransactionApi │  │ RefreshCoordinator     │    │
//! │  │ DashboardState │  │ DashboardApi   │  │  one refresh in flight │    │
//! │  │ ToastQueue     │  │ ReportsApi     │  │ Transport (reqwest)    │    │
//! │  └────────────────┘  └────────────────┘  └────────────────────────┘    │
//! │                                                                         │
//! │  ┌────────────────┐  ┌────────────────┐  ┌────────────────────────┐    │
//! │  │   Session      │◄─│ KeyValueStorage│  │  SessionEventEmitter   │    │
//! │  │ token, refresh │  │ file / memory  │  │  LoggedIn, LoggedOut,  │    │
//! │  │ token, profile │  │ key "auth"     │  │  Expired               │    │
//! │  └────────────────┘  └────────────────┘  └────────────────────────┘    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`client`] - `AdminClient`, wires every part to one session
//! - [`config`] - Layered configuration (defaults, TOML file, environment)
//! - [`error`] - Client error type and user-facing messages
//! - [`events`] - Session events and their emitters
//! - [`http`] - Dispatcher, refresh coordinator and transport
//! - [`persist`] - Key-value storage for the session
//! - [`services`] - One typed API per backend resource
//! - [`session`] - Tokens and the signed-in profile
//! - [`state`] - Containers holding lists, selections and flags
//!
//! ## Usage
//!
//! ```rust,ignore
//! use stockroom_client::{AdminClient, ClientConfig};
//! use stockroom_core::{ListFilter, LoginCredentials};
//!
//! let admin = AdminClient::new(ClientConfig::load_or_default(None))?;
//! admin.auth.login(&LoginCredentials::new("admin@toko.id", "rahasia")).await?;
//!
//! admin.categories.fetch_all(&ListFilter::default()).await;
//! for category in admin.categories.snapshot().items {
//!     println!("{} {}", category.id, category.name);
//! }
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod client;
pub mod config;
pub mod error;
pub mod events;
pub mod http;
pub mod persist;
pub mod services;
pub mod session;
pub mod state;

#[cfg(test)]
mod test_support;

// =============================================================================
// Re-exports
// =============================================================================

pub use client::AdminClient;
pub use config::{ApiSettings, ClientConfig, NotificationSettings, StorageSettings};
pub use error::{ClientError, ClientResult};
pub use events::{BroadcastEmitter, NoOpEmitter, SessionEvent, SessionEventEmitter};
pub use http::{ApiClient, RefreshCoordinator, RefreshPhase, Transport};
pub use persist::{FileStorage, KeyValueStorage, MemoryStorage};
pub use session::{Session, SessionSnapshot};
pub use state::{Toast, ToastKind, ToastQueue};
