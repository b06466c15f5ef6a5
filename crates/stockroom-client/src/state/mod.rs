//! # State Module
//!
//! Containers a UI binds to. Each owns one record behind `Arc<Mutex<_>>`
//! and exposes async actions that talk to a service and update the record.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌──────────────┐  ┌────────────────────┐  ┌────────────────────────┐   │
//! │  │  AuthState   │  │  CatalogState<R>   │  │  TransactionState<R>   │   │
//! │  │  session +   │  │  categories,       │  │  quotations,           │   │
//! │  │  profile     │  │  stores, accounts, │  │  purchases,            │   │
//! │  │              │  │  products          │  │  stock movements       │   │
//! │  └──────────────┘  └────────────────────┘  └────────────────────────┘   │
//! │                                                                         │
//! │  ┌──────────────┐  ┌────────────────────┐                               │
//! │  │DashboardState│  │    ToastQueue      │                               │
//! │  └──────────────┘  └────────────────────┘                               │
//! │                                                                         │
//! │  THREAD SAFETY:                                                         │
//! │  • Locks are held only while the record is read or patched, never       │
//! │    across a request. Overlapping fetches resolve last-resolved-wins.    │
//! │  • Every resolution, success or failure, clears `loading`.              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod auth;
mod catalog;
mod dashboard;
mod record;
mod toast;
mod transaction;

pub use auth::{AuthState, AuthStatus};
pub use catalog::CatalogState;
pub use dashboard::{DashboardRecord, DashboardState};
pub use record::EntityRecord;
pub use toast::{Toast, ToastKind, ToastQueue};
pub use transaction::TransactionState;

use crate::services::{
    Accounts, Categories, Products, Purchases, Quotations, StockMovements, Stores,
};

pub type CategoriesState = CatalogState<Categories>;
pub type StoresState = CatalogState<Stores>;
pub type AccountsState = CatalogState<Accounts>;
pub type ProductsState = CatalogState<Products>;

pub type QuotationsState = TransactionState<Quotations>;
pub type PurchasesState = TransactionState<Purchases>;
pub type StockMovementsState = TransactionState<StockMovements>;
