//! # stockroom-core: Pure Domain Model for the Stockroom Admin Client
//!
//! This crate holds everything the admin client knows about the backend's
//! data without ever talking to it: entities, request DTOs, response
//! envelopes, list filters and their query-string flattening.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Stockroom Admin Architecture                        │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    apps/admin-cli                               │   │
//! │  │    login ──► dashboard ──► list products ──► logout             │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 stockroom-client                                │   │
//! │  │   Session ─ ApiClient ─ RefreshCoordinator ─ State containers   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ stockroom-core (THIS CRATE) ★                   │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │ envelope  │  │   query   │  │ validation│  │   │
//! │  │   │ Category  │  │ApiEnvelope│  │ListFilter │  │ page size │  │   │
//! │  │   │ Quotation │  │ PageInfo  │  │QueryParams│  │ id checks │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • NO STORAGE • PURE FUNCTIONS             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Entities and request DTOs (Category, Product, Quotation, ...)
//! - [`envelope`] - `{success, message, data}` response wrapper and list payloads
//! - [`pagination`] - Server pagination object and the client-facing [`PageInfo`]
//! - [`query`] - List filters and their flattening into query parameters
//! - [`error`] - Domain error types
//! - [`validation`] - Checks applied before a request leaves the client
//!
//! ## Example Usage
//!
//! ```rust
//! use stockroom_core::query::{ListFilter, ToQuery};
//!
//! let filter = ListFilter {
//!     search: Some("foo".to_string()),
//!     page: Some(2),
//!     ..ListFilter::default()
//! };
//!
//! // Absent filters never reach the wire.
//! assert_eq!(filter.to_query().encode(), "search=foo&page=2");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod envelope;
pub mod error;
mod lenient;
pub mod pagination;
pub mod query;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use envelope::{Acknowledgement, ApiEnvelope, ListPayload, Page};
pub use error::{CoreError, CoreResult, ValidationError};
pub use pagination::{PageInfo, Pagination};
pub use query::{
    AccountFilter, ListFilter, PageSize, ProductFilter, QueryParams, SortField, SortOrder, ToQuery,
};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Page sizes the backend accepts for list endpoints.
pub const ALLOWED_PAGE_SIZES: [u32; 4] = [1, 10, 100, 1000];

/// Page size the backend applies when `limit` is omitted.
pub const DEFAULT_PAGE_SIZE: u32 = 10;
