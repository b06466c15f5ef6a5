//! # Admin Client
//!
//! Composition root: builds one session, one dispatcher and one refresh
//! coordinator, then hands clones of the dispatcher to every service and
//! container.
//!
//! ```text
//! ClientConfig ──► KeyValueStorage ──► Session::restore
//!      │                                   │
//!      └──► ReqwestTransport ──► ApiClient ◄┘ ◄── BroadcastEmitter
//!                                   │
//!          ┌────────────┬───────────┼────────────┬──────────────┐
//!          ▼            ▼           ▼            ▼              ▼
//!      AuthState   CatalogState  TransactionState  DashboardState  ReportsApi
//! ```

use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::info;

use crate::config::ClientConfig;
use crate::error::ClientResult;
use crate::events::{BroadcastEmitter, SessionEvent, SessionEventEmitter};
use crate::http::{ApiClient, ReqwestTransport, Transport};
use crate::persist::{FileStorage, KeyValueStorage, MemoryStorage};
use crate::services::{AuthApi, CatalogApi, DashboardApi, ReportsApi, TransactionApi};
use crate::session::Session;
use crate::state::{
    AccountsState, AuthState, CategoriesState, DashboardState, ProductsState, PurchasesState,
    QuotationsState, StockMovementsState, StoresState, ToastQueue,
};

/// Every store of the admin client, wired to one session.
pub struct AdminClient {
    config: ClientConfig,
    api: ApiClient,
    events: BroadcastEmitter,

    pub auth: AuthState,
    pub categories: CategoriesState,
    pub stores: StoresState,
    pub accounts: AccountsState,
    pub products: ProductsState,
    pub quotations: QuotationsState,
    pub purchases: PurchasesState,
    pub stock_movements: StockMovementsState,
    pub dashboard: DashboardState,
    pub reports: ReportsApi,
    pub toasts: ToastQueue,
}

impl AdminClient {
    /// Production wiring: reqwest transport and file-backed session storage
    /// (in memory when no data directory can be resolved).
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        config.validate()?;

        let storage: Arc<dyn KeyValueStorage> = match config.data_dir() {
            Some(dir) => {
                info!(dir = %dir.display(), "Persisting session to disk");
                Arc::new(FileStorage::new(dir))
            }
            None => {
                info!("No data directory, session will not survive restart");
                Arc::new(MemoryStorage::new())
            }
        };
        let transport = Arc::new(ReqwestTransport::from_config(&config)?);

        Self::with_parts(config, transport, storage, BroadcastEmitter::default())
    }

    pub fn with_parts(
        config: ClientConfig,
        transport: Arc<dyn Transport>,
        storage: Arc<dyn KeyValueStorage>,
        events: BroadcastEmitter,
    ) -> ClientResult<Self> {
        let base_url = config.base_url()?;
        let session = Session::restore(storage);
        let emitter: Arc<dyn SessionEventEmitter> = Arc::new(events.clone());
        let api = ApiClient::new(base_url, transport, session.clone(), emitter.clone());

        info!(
            base_url = %api.base_url(),
            authenticated = session.is_authenticated(),
            "Admin client ready"
        );

        Ok(AdminClient {
            auth: AuthState::new(AuthApi::new(api.clone()), session, emitter),
            categories: CategoriesState::new(CatalogApi::new(api.clone())),
            stores: StoresState::new(CatalogApi::new(api.clone())),
            accounts: AccountsState::new(CatalogApi::new(api.clone())),
            products: ProductsState::new(CatalogApi::new(api.clone())),
            quotations: QuotationsState::new(TransactionApi::new(api.clone())),
            purchases: PurchasesState::new(TransactionApi::new(api.clone())),
            stock_movements: StockMovementsState::new(TransactionApi::new(api.clone())),
            dashboard: DashboardState::new(DashboardApi::new(api.clone())),
            reports: ReportsApi::new(api.clone()),
            toasts: ToastQueue::new(config.toast_ttl()),
            config,
            api,
            events,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn session(&self) -> &Session {
        self.api.session()
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    /// Session events from every part of the client.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::REFRESH_PATH;
    use crate::session::SESSION_KEY;
    use crate::test_support::{bearer_of, ok, page, path_of, status, unauthorized, MockTransport};
    use serde_json::json;
    use stockroom_core::{ListFilter, LoginCredentials};

    fn client(transport: Arc<MockTransport>, storage: Arc<dyn KeyValueStorage>) -> AdminClient {
        AdminClient::with_parts(
            ClientConfig::default(),
            transport,
            storage,
            BroadcastEmitter::default(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_restored_session_is_used_by_every_store() {
        let storage: Arc<dyn KeyValueStorage> = Arc::new(MemoryStorage::new());
        storage
            .save(SESSION_KEY, r#"{"token": "t1", "refreshToken": "r1", "user": null}"#)
            .unwrap();
        let transport = Arc::new(MockTransport::new(|_| ok(page(json!([])))));
        let admin = client(transport.clone(), storage);

        assert!(admin.auth.is_authenticated());
        admin.categories.fetch_all(&ListFilter::default()).await;
        admin.quotations.fetch_all(&ListFilter::default()).await;

        for request in transport.requests() {
            assert_eq!(bearer_of(&request), Some("t1"));
        }
    }

    #[tokio::test]
    async fn test_expired_refresh_reaches_subscribers() {
        let transport = Arc::new(MockTransport::new(|req| match path_of(req) {
            "/auth/login" => ok(json!({"token": "t1", "refreshToken": "r1"})),
            REFRESH_PATH => status(401, json!({"message": "refresh token expired"})),
            _ => unauthorized(),
        }));
        let admin = client(transport, Arc::new(MemoryStorage::new()));
        let mut events = admin.subscribe();

        // The profile fetch hits a 401 and the refresh is refused.
        let err = admin
            .auth
            .login(&LoginCredentials::new("admin@toko.id", "rahasia"))
            .await
            .unwrap_err();
        assert!(err.is_auth_failure());
        assert_eq!(events.recv().await.unwrap(), SessionEvent::Expired);
        assert!(!admin.session().is_authenticated());

        admin.products.fetch_all(&Default::default()).await;
        assert!(admin.products.snapshot().error.is_some());
    }

    #[test]
    fn test_invalid_base_url_is_rejected() {
        let mut config = ClientConfig::default();
        config.api.base_url = "ftp://example.com".into();
        assert!(AdminClient::new(config).is_err());
    }
}
