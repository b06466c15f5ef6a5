//! # Transaction State
//!
//! Containers for quotations, purchases and stock movements. Every mutation
//! endpoint answers with the entity as the server now sees it, so the record
//! is patched in place rather than re-fetched.
//!
//! ```text
//! create()      ──► items.insert(0, created)
//! update()      ──┐
//! transition()  ──┴► items[i] = returned   (selected too, when ids match)
//! delete()      ──► items.retain(id != deleted), selected cleared on match
//! ```
//!
//! Patches are applied only after the server confirmed the change.

use std::sync::{Arc, Mutex, PoisonError};

use stockroom_core::{
    ListFilter, Purchase, PurchaseAction, Quotation, QuotationAction, StockMovement,
    StockMovementAction, TransitionAction,
};
use tracing::{debug, warn};

use super::record::EntityRecord;
use crate::error::{ClientError, ClientResult};
use crate::services::transaction::{
    Purchases, Quotations, StockMovements, TransactionApi, TransactionId, TransactionResource,
};

pub struct TransactionState<R: TransactionResource> {
    api: TransactionApi<R>,
    record: Arc<Mutex<EntityRecord<R::Entity>>>,
}

impl<R: TransactionResource> Clone for TransactionState<R> {
    fn clone(&self) -> Self {
        TransactionState {
            api: self.api.clone(),
            record: self.record.clone(),
        }
    }
}

impl<R: TransactionResource> TransactionState<R> {
    pub fn new(api: TransactionApi<R>) -> Self {
        TransactionState {
            api,
            record: Arc::new(Mutex::new(EntityRecord::default())),
        }
    }

    pub fn snapshot(&self) -> EntityRecord<R::Entity> {
        self.with_record(|record| record.clone())
    }

    pub async fn fetch_all(&self, filter: &ListFilter) {
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

    pub async fn fetch_detail(&self, id: &TransactionId<R>) {
        self.with_record(EntityRecord::begin);

        match self.api.get(id).await {
            Ok(entity) => self.with_record(|record| {
                record.selected = Some(entity);
                record.finish();
            }),
            Err(e) => {
                self.record_failure(&format!("Failed to fetch {} details", R::NOUN), e);
            }
        }
    }

    pub async fn create(&self, request: &R::Create) -> ClientResult<R::Entity> {
        self.with_record(EntityRecord::begin);

        match self.api.create(request).await {
            Ok(created) => {
                self.with_record(|record| {
                    record.prepend(created.clone());
                    record.finish();
                });
                Ok(created)
            }
            Err(e) => Err(self.record_failure(&format!("Failed to create {}", R::NOUN), e)),
        }
    }

    pub async fn update(&self, request: &R::Update) -> ClientResult<R::Entity> {
        self.with_record(EntityRecord::begin);

        match self.api.update(request).await {
            Ok(updated) => {
                self.splice(updated.clone());
                Ok(updated)
            }
            Err(e) => Err(self.record_failure(&format!("Failed to update {}", R::NOUN), e)),
        }
    }

    pub async fn delete(&self, id: &TransactionId<R>) -> ClientResult<()> {
        self.with_record(EntityRecord::begin);

        match self.api.delete(id).await {
            Ok(()) => {
                self.with_record(|record| {
                    record.remove(id);
                    record.finish();
                });
                Ok(())
            }
            Err(e) => Err(self.record_failure(&format!("Failed to delete {}", R::NOUN), e)),
        }
    }

    /// Moves an entity through its lifecycle via the action endpoint.
    pub async fn transition(
        &self,
        id: &TransactionId<R>,
        action: R::Action,
    ) -> ClientResult<R::Entity> {
        self.with_record(EntityRecord::begin);

        match self.api.transition(id, action).await {
            Ok(entity) => {
                self.splice(entity.clone());
                Ok(entity)
            }
            Err(e) => {
                let fallback = format!("Failed to {} {}", action.segment(), R::NOUN);
                Err(self.record_failure(&fallback, e))
            }
        }
    }

    fn splice(&self, entity: R::Entity) {
        self.with_record(|record| {
            record.splice(entity);
            record.finish();
        });
    }

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

// =============================================================================
// Lifecycle Shortcuts
// =============================================================================

impl TransactionState<Quotations> {
    pub async fn send(&self, id: &str) -> ClientResult<Quotation> {
        self.transition(&id.to_string(), QuotationAction::Send).await
    }

    pub async fn approve(&self, id: &str) -> ClientResult<Quotation> {
        self.transition(&id.to_string(), QuotationAction::Approve).await
    }

    pub async fn reject(&self, id: &str) -> ClientResult<Quotation> {
        self.transition(&id.to_string(), QuotationAction::Reject).await
    }
}

impl TransactionState<Purchases> {
    pub async fn order(&self, id: &str) -> ClientResult<Purchase> {
        self.transition(&id.to_string(), PurchaseAction::Order).await
    }

    pub async fn receive(&self, id: &str) -> ClientResult<Purchase> {
        self.transition(&id.to_string(), PurchaseAction::Receive).await
    }

    pub async fn cancel(&self, id: &str) -> ClientResult<Purchase> {
        self.transition(&id.to_string(), PurchaseAction::Cancel).await
    }
}

impl TransactionState<StockMovements> {
    pub async fn complete(&self, id: i64) -> ClientResult<StockMovement> {
        self.transition(&id, StockMovementAction::Complete).await
    }

    pub async fn cancel(&self, id: i64) -> ClientResult<StockMovement> {
        self.transition(&id, StockMovementAction::Cancel).await
    }
}
