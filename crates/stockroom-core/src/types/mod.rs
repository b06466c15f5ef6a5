//! # Domain Types
//!
//! Entities and request DTOs exchanged with the Stockroom backend.
//!
//! ## Type Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  auth            catalog              transaction         read-only     │
//! │  ─────────────   ──────────────────   ─────────────────   ───────────── │
//! │  Credentials     Category  (id i64)   Quotation  (id str) GeneralSummary│
//! │  TokenPair       Store     (id i64)   Purchase   (id str) SpecificSum.. │
//! │  UserProfile     Account   (id i64)   StockMovement (i64) Report*Item   │
//! │                  Product   (id str)                                     │
//! │                                                                         │
//! │  Catalog mutations re-fetch the list; transaction mutations splice the  │
//! │  returned entity in place, matched by `Identified::id`.                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Field names follow the backend verbatim on the wire (camelCase, except the
//! few snake_case product prices and dashboard counters).

use std::fmt::{Debug, Display};

use serde::Serialize;

pub mod auth;
pub mod catalog;
pub mod dashboard;
pub mod report;
pub mod transaction;

pub use auth::{LoginCredentials, RefreshTokenRequest, TokenPair, UserProfile};
pub use catalog::{
    Account, AccountType, Category, CreateAccountRequest, CreateCategoryRequest,
    CreateProductRequest, CreateStoreRequest, IdRequest, Product, Store, UpdateAccountRequest,
    UpdateCategoryRequest, UpdateProductRequest, UpdateStoreRequest,
};
pub use dashboard::{GeneralSummary, SpecificSummary, TimeFilter};
pub use report::{
    InventoryReportItem, InventorySummary, PurchaseReportItem, ReportFilter, ReportKind,
    ReportPage, ReportPeriod, SalesReportItem, TopCategory, TopProduct, TransactionSummary,
};
pub use transaction::{
    CreatePurchaseRequest, CreateQuotationRequest, CreateStockMovementRequest, MovementType,
    Purchase, PurchaseAction, PurchaseItem, PurchaseLine, PurchaseStatus, Quotation,
    QuotationAction, QuotationItem, QuotationLine, QuotationStatus, StockMovement,
    StockMovementAction, StockMovementStatus, TransitionAction, UpdatePurchaseRequest,
    UpdateQuotationRequest, UpdateStockMovementRequest,
};

/// An entity the backend identifies by a single `id` field.
///
/// State containers use this to find the entry a mutation response replaces,
/// and services use the `Display` form to build `/<resource>/{id}` paths.
pub trait Identified {
    type Id: Clone + PartialEq + Debug + Display + Serialize + Send + Sync + 'static;

    fn id(&self) -> &Self::Id;
}

/// Implements [`Identified`] for entities whose key is a plain `id` field.
macro_rules! identified_by_id {
    ($($entity:ty => $id:ty),+ $(,)?) => {
        $(
            impl Identified for $entity {
                type Id = $id;

                fn id(&self) -> &$id {
                    &self.id
                }
            }
        )+
    };
}

identified_by_id! {
    Category => i64,
    Store => i64,
    Account => i64,
    Product => String,
    Quotation => String,
    Purchase => String,
    StockMovement => i64,
}
