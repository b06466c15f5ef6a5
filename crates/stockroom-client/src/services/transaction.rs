//! # Transaction Services
//!
//! Quotations, purchases and stock movements use path-style REST:
//!
//! ```text
//! GET    <list path>?search&...&page     list
//! GET    /<resource>/{id}                one entity
//! POST   /<resource>                     created entity
//! PUT    /<resource>/{id}                updated entity
//! DELETE /<resource>/{id}                acknowledgement
//! PUT    /<resource>/{id}/<action>       entity after the transition
//! ```
//!
//! Mutations return the entity as the server now sees it, which is what lets
//! the transaction stores splice instead of re-fetching.

use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde::Serialize;
use stockroom_core::validation::{require_id, validate_filter};
use stockroom_core::{
    CreatePurchaseRequest, CreateQuotationRequest, CreateStockMovementRequest, Identified,
    ListFilter, ListPayload, Page, Purchase, PurchaseAction, QueryParams, Quotation,
    QuotationAction, StockMovement, StockMovementAction, ToQuery, TransitionAction,
    UpdatePurchaseRequest, UpdateQuotationRequest, UpdateStockMovementRequest,
};
use tracing::debug;
use url::form_urlencoded;

use crate::error::ClientResult;
use crate::http::ApiClient;

pub type TransactionId<R> = <<R as TransactionResource>::Entity as Identified>::Id;

/// Binds a transaction endpoint family to its types.
pub trait TransactionResource: Send + Sync + 'static {
    /// Prefix for item and action paths.
    const PATH: &'static str;

    /// Where the list lives; not always equal to [`Self::PATH`].
    const LIST_PATH: &'static str;

    const LABEL: &'static str;

    /// Singular form of [`Self::LABEL`].
    const NOUN: &'static str;

    type Entity: Identified + DeserializeOwned + Clone + Send + Sync + 'static;
    type Create: Serialize + Send + Sync;
    type Update: Serialize + Send + Sync;
    type Action: TransitionAction;

    /// The entity an update request targets.
    fn update_target(request: &Self::Update) -> &TransactionId<Self>;
}

pub enum Quotations {}

pub enum Purchases {}

pub enum StockMovements {}

impl TransactionResource for Quotations {
    const PATH: &'static str = "/quotations";
    const LIST_PATH: &'static str = "/quotations";
    const LABEL: &'static str = "quotations";
    const NOUN: &'static str = "quotation";
    type Entity = Quotation;
    type Create = CreateQuotationRequest;
    type Update = UpdateQuotationRequest;
    type Action = QuotationAction;

    fn update_target(request: &UpdateQuotationRequest) -> &String {
        &request.id
    }
}

impl TransactionResource for Purchases {
    const PATH: &'static str = "/purchases";
    const LIST_PATH: &'static str = "/purchases";
    const LABEL: &'static str = "purchases";
    const NOUN: &'static str = "purchase";
    type Entity = Purchase;
    type Create = CreatePurchaseRequest;
    type Update = UpdatePurchaseRequest;
    type Action = PurchaseAction;

    fn update_target(request: &UpdatePurchaseRequest) -> &String {
        &request.id
    }
}

impl TransactionResource for StockMovements {
    const PATH: &'static str = "/stock-movements";
    const LIST_PATH: &'static str = "/stock-movements/all";
    const LABEL: &'static str = "stock movements";
    const NOUN: &'static str = "stock movement";
    type Entity = StockMovement;
    type Create = CreateStockMovementRequest;
    type Update = UpdateStockMovementRequest;
    type Action = StockMovementAction;

    fn update_target(request: &UpdateStockMovementRequest) -> &i64 {
        &request.id
    }
}

/// Endpoint wrapper for one transaction resource.
pub struct TransactionApi<R> {
    client: ApiClient,
    _resource: PhantomData<fn() -> R>,
}

impl<R> Clone for TransactionApi<R> {
    fn clone(&self) -> Self {
        TransactionApi {
            client: self.client.clone(),
            _resource: PhantomData,
        }
    }
}

impl<R: TransactionResource> TransactionApi<R> {
    pub fn new(client: ApiClient) -> Self {
        TransactionApi {
            client,
            _resource: PhantomData,
        }
    }

    pub async fn list(&self, filter: &ListFilter) -> ClientResult<Page<R::Entity>> {
        validate_filter(filter)?;
        let query = filter.to_query();
        debug!(resource = R::LABEL, query = %query.encode(), "Listing");

        let payload: ListPayload<R::Entity> = self.client.get(R::LIST_PATH, query).await?;
        Ok(payload.into())
    }

    pub async fn get(&self, id: &TransactionId<R>) -> ClientResult<R::Entity> {
        self.client
            .get(&item_path::<R>(id)?, QueryParams::new())
            .await
    }

    pub async fn create(&self, request: &R::Create) -> ClientResult<R::Entity> {
        self.client.post(R::PATH, request).await
    }

    pub async fn update(&self, request: &R::Update) -> ClientResult<R::Entity> {
        let path = item_path::<R>(R::update_target(request))?;
        self.client.put(&path, request).await
    }

    pub async fn delete(&self, id: &TransactionId<R>) -> ClientResult<()> {
        self.client.delete_ack(&item_path::<R>(id)?).await
    }

    pub async fn transition(
        &self,
        id: &TransactionId<R>,
        action: R::Action,
    ) -> ClientResult<R::Entity> {
        let path = format!("{}/{}", item_path::<R>(id)?, action.segment());
        debug!(resource = R::LABEL, id = %id, action = ?action, "Requesting transition");
        self.client.put_empty(&path).await
    }
}

/// `/<resource>/{id}` with the id percent-encoded as one path segment.
/// A blank id would address the collection instead.
fn item_path<R: TransactionResource>(id: &TransactionId<R>) -> ClientResult<String> {
    let id = id.to_string();
    let id = require_id("id", &id)?;
    Ok(format!("{}/{}", R::PATH, encode_segment(id)))
}

fn encode_segment(segment: &str) -> String {
    // form encoding writes spaces as '+'; a literal '+' is already %2B.
    form_urlencoded::byte_serialize(segment.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClientError;
    use crate::http::HttpMethod;
    use crate::test_support::{api_client, ok, page, path_of, test_session, MockTransport};
    use serde_json::json;
    use std::sync::Arc;
    use stockroom_core::{MovementType, QuotationStatus};

    fn quotation(id: &str, status: &str) -> serde_json::Value {
        json!({"id": id, "quotationNumber": "QT-001", "status": status, "total": 150000.0})
    }

    #[tokio::test]
    async fn test_stock_movement_list_uses_all_path() {
        let transport = Arc::new(MockTransport::new(|_| ok(page(json!([])))));
        let api = TransactionApi::<StockMovements>::new(api_client(transport.clone(), test_session()));

        api.list(&ListFilter::search("beras")).await.unwrap();

        let sent = transport.requests();
        assert_eq!(path_of(&sent[0]), "/stock-movements/all");
        assert_eq!(sent[0].url.query(), Some("search=beras"));
    }

    #[tokio::test]
    async fn test_transition_puts_to_action_path() {
        let transport = Arc::new(MockTransport::new(|req| {
            assert_eq!(req.method, HttpMethod::Put);
            assert!(req.body.is_none());
            ok(quotation("Q1", "approved"))
        }));
        let api = TransactionApi::<Quotations>::new(api_client(transport.clone(), test_session()));

        let approved = api
            .transition(&"Q1".to_string(), QuotationAction::Approve)
            .await
            .unwrap();

        assert_eq!(approved.status, QuotationStatus::Approved);
        assert_eq!(path_of(&transport.requests()[0]), "/quotations/Q1/approve");
    }

    #[tokio::test]
    async fn test_update_puts_to_item_path() {
        let transport = Arc::new(MockTransport::new(|_| {
            ok(json!({
                "id": 12, "productId": 4, "quantity": 3.0, "movementType": "out", "storeId": 1
            }))
        }));
        let api = TransactionApi::<StockMovements>::new(api_client(transport.clone(), test_session()));

        let request = UpdateStockMovementRequest {
            id: 12,
            fields: CreateStockMovementRequest {
                product_id: 4,
                quantity: 3.0,
                movement_type: MovementType::Out,
                akun_id: None,
                store_id: 1,
                notes: None,
            },
        };
        let updated = api.update(&request).await.unwrap();

        assert_eq!(updated.id, 12);
        let sent = transport.requests();
        assert_eq!(sent[0].method, HttpMethod::Put);
        assert_eq!(path_of(&sent[0]), "/stock-movements/12");
        assert_eq!(sent[0].body.as_ref().unwrap()["movementType"], "out");
    }

    #[tokio::test]
    async fn test_delete_uses_http_delete() {
        let transport = Arc::new(MockTransport::new(|_| ok(json!(null))));
        let api = TransactionApi::<Purchases>::new(api_client(transport.clone(), test_session()));

        api.delete(&"PO-7".to_string()).await.unwrap();

        let sent = transport.requests();
        assert_eq!(sent[0].method, HttpMethod::Delete);
        assert_eq!(path_of(&sent[0]), "/purchases/PO-7");
    }

    #[tokio::test]
    async fn test_reserved_characters_in_id_stay_in_the_path() {
        let transport = Arc::new(MockTransport::new(|_| ok(quotation("Q?1", "approved"))));
        let api = TransactionApi::<Quotations>::new(api_client(transport.clone(), test_session()));

        api.transition(&"Q?1".to_string(), QuotationAction::Approve)
            .await
            .unwrap();
        api.delete(&"PO/7 b#".to_string()).await.unwrap();

        let sent = transport.requests();
        assert_eq!(path_of(&sent[0]), "/quotations/Q%3F1/approve");
        assert_eq!(sent[0].url.query(), None);
        assert_eq!(path_of(&sent[1]), "/quotations/PO%2F7%20b%23");
        assert_eq!(sent[1].url.fragment(), None);
    }

    #[tokio::test]
    async fn test_blank_id_is_rejected_locally() {
        let transport = Arc::new(MockTransport::new(|_| ok(page(json!([])))));
        let api = TransactionApi::<Quotations>::new(api_client(transport.clone(), test_session()));

        let err = api.get(&"  ".to_string()).await.unwrap_err();
        assert!(matches!(err, ClientError::Validation(_)));
        assert!(transport.requests().is_empty());
    }
}
