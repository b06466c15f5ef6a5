//! # Transactions
//!
//! Quotations, purchases and stock movements. Unlike catalog resources these
//! have a lifecycle; status changes go through dedicated action endpoints
//! (`PUT /<resource>/{id}/<action>`), never through a plain update.
//!
//! ## Lifecycles
//! ```text
//! Quotation:      draft ──send──► sent ──approve──► approved
//!                                   └───reject───► rejected
//!
//! Purchase:       draft ──order──► ordered ──receive──► received
//!                   └──────────cancel──────────► cancelled
//!
//! StockMovement:  pending ──complete──► completed
//!                    └──────cancel────► cancelled
//! ```
//!
//! The server owns the transition rules. The client sends the action and
//! stores whatever entity comes back.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A lifecycle action with its own endpoint segment.
pub trait TransitionAction: Copy + fmt::Debug + Send + Sync + 'static {
    /// Path segment appended after the entity id.
    fn segment(self) -> &'static str;
}

macro_rules! status_display {
    ($ty:ty { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(match self {
                    $(Self::$variant => $text,)+
                })
            }
        }
    };
}

// =============================================================================
// Quotation
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuotationStatus {
    Draft,
    Sent,
    Approved,
    Rejected,
}

status_display!(QuotationStatus {
    Draft => "draft",
    Sent => "sent",
    Approved => "approved",
    Rejected => "rejected",
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuotationItem {
    pub id: String,
    pub product_id: String,
    #[serde(default)]
    pub product_name: String,
    pub quantity: f64,
    pub unit_price: f64,
    #[serde(default)]
    pub total: f64,
}

/// A price offer made to a customer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quotation {
    pub id: String,
    #[serde(default)]
    pub quotation_number: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub customer_id: String,
    #[serde(default)]
    pub customer_name: String,
    pub status: QuotationStatus,
    #[serde(default)]
    pub total: f64,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub items: Vec<QuotationItem>,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

/// One requested line of a new quotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuotationLine {
    pub product_id: String,
    pub quantity: f64,
    pub unit_price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateQuotationRequest {
    pub customer_id: String,
    pub date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub items: Vec<QuotationLine>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateQuotationRequest {
    pub id: String,
    #[serde(flatten)]
    pub fields: CreateQuotationRequest,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<QuotationStatus>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuotationAction {
    Send,
    Approve,
    Reject,
}

impl TransitionAction for QuotationAction {
    fn segment(self) -> &'static str {
        match self {
            QuotationAction::Send => "send",
            QuotationAction::Approve => "approve",
            QuotationAction::Reject => "reject",
        }
    }
}

// =============================================================================
// Purchase
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PurchaseStatus {
    Draft,
    Ordered,
    Received,
    Cancelled,
}

status_display!(PurchaseStatus {
    Draft => "draft",
    Ordered => "ordered",
    Received => "received",
    Cancelled => "cancelled",
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseItem {
    pub id: String,
    pub product_id: String,
    #[serde(default)]
    pub product_name: String,
    pub quantity: f64,
    pub unit_cost: f64,
    #[serde(default)]
    pub total: f64,
}

/// A purchase order placed with a supplier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Purchase {
    pub id: String,
    #[serde(default)]
    pub purchase_number: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub supplier_id: String,
    #[serde(default)]
    pub supplier_name: String,
    pub status: PurchaseStatus,
    #[serde(default)]
    pub total: f64,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub items: Vec<PurchaseItem>,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseLine {
    pub product_id: String,
    pub quantity: f64,
    pub unit_cost: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePurchaseRequest {
    pub supplier_id: String,
    pub date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub items: Vec<PurchaseLine>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdatePurchaseRequest {
    pub id: String,
    #[serde(flatten)]
    pub fields: CreatePurchaseRequest,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<PurchaseStatus>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PurchaseAction {
    Order,
    Receive,
    Cancel,
}

impl TransitionAction for PurchaseAction {
    fn segment(self) -> &'static str {
        match self {
            PurchaseAction::Order => "order",
            PurchaseAction::Receive => "receive",
            PurchaseAction::Cancel => "cancel",
        }
    }
}

// =============================================================================
// Stock Movement
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovementType {
    In,
    Out,
}

status_display!(MovementType {
    In => "in",
    Out => "out",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StockMovementStatus {
    Pending,
    Completed,
    Cancelled,
}

status_display!(StockMovementStatus {
    Pending => "pending",
    Completed => "completed",
    Cancelled => "cancelled",
});

/// Goods entering or leaving a store.
///
/// `status` is only reported by backends that track the movement lifecycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockMovement {
    pub id: i64,
    pub product_id: i64,
    #[serde(default)]
    pub product_name: String,
    pub quantity: f64,
    #[serde(default)]
    pub product_sku: String,
    #[serde(default)]
    pub product_satuan: String,
    pub movement_type: MovementType,
    /// Supplier or customer on the other side of the movement.
    #[serde(default)]
    pub akun_id: Option<i64>,
    #[serde(default)]
    pub akun_name: String,
    pub store_id: i64,
    #[serde(default)]
    pub store_name: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<StockMovementStatus>,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateStockMovementRequest {
    pub product_id: i64,
    pub quantity: f64,
    pub movement_type: MovementType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub akun_id: Option<i64>,
    pub store_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateStockMovementRequest {
    pub id: i64,
    #[serde(flatten)]
    pub fields: CreateStockMovementRequest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockMovementAction {
    Complete,
    Cancel,
}

impl TransitionAction for StockMovementAction {
    fn segment(self) -> &'static str {
        match self {
            StockMovementAction::Complete => "complete",
            StockMovementAction::Cancel => "cancel",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_quotation_from_wire() {
        let quotation: Quotation = serde_json::from_value(json!({
            "id": "Q1",
            "quotationNumber": "QT-2024-001",
            "customerId": "C7",
            "status": "approved",
            "total": 150000.0,
            "items": [{
                "id": "QI1", "productId": "P1", "productName": "Teh",
                "quantity": 10, "unitPrice": 15000, "total": 150000
            }]
        }))
        .unwrap();
        assert_eq!(quotation.status, QuotationStatus::Approved);
        assert_eq!(quotation.items.len(), 1);
        assert_eq!(quotation.items[0].unit_price, 15000.0);
    }

    #[test]
    fn test_action_segments() {
        assert_eq!(QuotationAction::Approve.segment(), "approve");
        assert_eq!(PurchaseAction::Receive.segment(), "receive");
        assert_eq!(StockMovementAction::Complete.segment(), "complete");
    }

    #[test]
    fn test_stock_movement_without_status() {
        let movement: StockMovement = serde_json::from_value(json!({
            "id": 12, "productId": 3, "quantity": 5,
            "movementType": "out", "storeId": 1, "akunId": 9
        }))
        .unwrap();
        assert_eq!(movement.movement_type, MovementType::Out);
        assert_eq!(movement.akun_id, Some(9));
        assert!(movement.status.is_none());
    }

    #[test]
    fn test_update_purchase_body() {
        let body = serde_json::to_value(UpdatePurchaseRequest {
            id: "PO1".into(),
            fields: CreatePurchaseRequest {
                supplier_id: "S1".into(),
                date: "2024-05-01".into(),
                notes: None,
                items: vec![PurchaseLine {
                    product_id: "P1".into(),
                    quantity: 2.0,
                    unit_cost: 1000.0,
                }],
            },
            status: Some(PurchaseStatus::Ordered),
        })
        .unwrap();
        assert_eq!(body["id"], "PO1");
        assert_eq!(body["supplierId"], "S1");
        assert_eq!(body["status"], "ordered");
        assert!(body.get("notes").is_none());
        assert_eq!(body["items"][0]["unitCost"], 1000.0);
    }

    #[test]
    fn test_status_display_matches_wire() {
        assert_eq!(QuotationStatus::Rejected.to_string(), "rejected");
        assert_eq!(
            serde_json::to_value(PurchaseStatus::Cancelled).unwrap(),
            json!("cancelled")
        );
    }
}
