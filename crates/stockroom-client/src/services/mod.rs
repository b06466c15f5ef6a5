//! Typed endpoint wrappers over [`ApiClient`](crate::http::ApiClient).
//!
//! Services know paths, bodies and response shapes. They hold no state and
//! never record errors; that is the job of the containers in
//! [`crate::state`].

pub mod auth;
pub mod catalog;
pub mod dashboard;
pub mod reports;
pub mod transaction;

pub use auth::AuthApi;
pub use catalog::{Accounts, CatalogApi, CatalogResource, Categories, Products, Stores};
pub use dashboard::DashboardApi;
pub use reports::ReportsApi;
pub use transaction::{Purchases, Quotations, StockMovements, TransactionApi, TransactionResource};
