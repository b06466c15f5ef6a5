//! # Catalog State
//!
//! One container per catalog resource. Mutations are followed by a full
//! re-fetch with default filters, so the list always reflects the server.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Catalog Store Actions                                │
//! │                                                                         │
//! │  Action            Request                     Record change            │
//! │  ──────            ───────                     ─────────────            │
//! │  fetch_all() ────► GET  /<r>/all ────────────► items, pagination        │
//! │  fetch_detail() ─► POST /<r>/detail ─────────► selected                 │
//! │  create() ───────► POST /<r>/create ─┐                                  │
//! │  update() ───────► POST /<r>/update ─┼─► fetch_all(default) ─► items    │
//! │  delete() ───────► POST /<r>/delete ─┘                                  │
//! │                                                                         │
//! │  Reads record failures in `error` and return nothing.                   │
//! │  Writes record failures in `error` and also return them.                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::{Arc, Mutex, PoisonError};

use tracing::{debug, warn};

use super::record::EntityRecord;
use crate::error::{ClientError, ClientResult};
use crate::services::catalog::{CatalogApi, CatalogResource, EntityId};

pub struct CatalogState<R: CatalogResource> {
    api: CatalogApi<R>,
    record: Arc<Mutex<EntityRecord<R::Entity>>>,
}

impl<R: CatalogResource> Clone for CatalogState<R> {
    fn clone(&self) -> Self {
        CatalogState {
            api: self.api.clone(),
            record: self.record.clone(),
        }
    }
}

impl<R: CatalogResource> CatalogState<R> {
    pub fn new(api: CatalogApi<R>) -> Self {
        CatalogState {
            api,
            record: Arc::new(Mutex::new(EntityRecord::default())),
        }
    }

    /// Copy of the current record.
    pub fn snapshot(&self) -> EntityRecord<R::Entity> {
        self.with_record(|record| record.clone())
    }

    // =========================================================================
    // Reads
    // =========================================================================

    pub async fn fetch_all(&self, filter: &R::Filter) {
        self.with_record(EntityRecord::begin);

        match self.api.list(filter).await {
            Ok(page) => {
                debug!(resource = R::LABEL, count = page.items.len(), "Fetched list");
                self.with_record(|record| record.replace_page(page));
            }
            Err(e) => {
                self.record_failure(&format!("Failed to fetch {}", R::LABEL), e);
            }
        }
    }

    pub async fn fetch_detail(&self, id: &EntityId<R>) {
        self.with_record(EntityRecord::begin);

        match self.api.detail(id).await {
            Ok(entity) => self.with_record(|record| {
                record.selected = Some(entity);
                record.finish();
            }),
            Err(e) => {
                self.record_failure(&format!("Failed to fetch {} details", R::NOUN), e);
            }
        }
    }

    // =========================================================================
    // Writes
    // =========================================================================

    pub async fn create(&self, request: &R::Create) -> ClientResult<()> {
        self.with_record(EntityRecord::begin);
        match self.api.create(request).await {
            Ok(()) => {
                self.refetch().await;
                Ok(())
            }
            Err(e) => Err(self.record_failure(&format!("Failed to create {}", R::NOUN), e)),
        }
    }

    pub async fn update(&self, request: &R::Update) -> ClientResult<()> {
        self.with_record(EntityRecord::begin);
        match self.api.update(request).await {
            Ok(()) => {
                self.refetch().await;
                Ok(())
            }
            Err(e) => Err(self.record_failure(&format!("Failed to update {}", R::NOUN), e)),
        }
    }

    pub async fn delete(&self, id: &EntityId<R>) -> ClientResult<()> {
        self.with_record(EntityRecord::begin);
        match self.api.delete(id).await {
            Ok(()) => {
                self.with_record(|record| record.remove(id));
                self.refetch().await;
                Ok(())
            }
            Err(e) => Err(self.record_failure(&format!("Failed to delete {}", R::NOUN), e)),
        }
    }

    // =========================================================================
    // Internals
    // =========================================================================

    /// Re-runs the list with default filters. A failure here is recorded by
    /// `fetch_all`; the mutation itself already succeeded.
    async fn refetch(&self) {
        self.fetch_all(&R::Filter::default()).await;
    }

    /// Stores a readable message in `error` and hands the error back.
    fn record_failure(&self, fallback: &str, error: ClientError) -> ClientError {
        let message = error.display_message(fallback);
        warn!(resource = R::LABEL, error = %error, "{fallback}");
        self.with_record(|record| record.fail(message));
        error
    }

    fn with_record<T>(&self, f: impl FnOnce(&mut EntityRecord<R::Entity>) -> T) -> T {
        let mut guard = self.record.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }
}
