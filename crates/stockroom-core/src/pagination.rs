//! # Pagination
//!
//! The backend describes every list page with its own pagination object.
//! The client never computes paging itself; it only renames what the server
//! sent into a shape the UI can bind to.
//!
//! ## Wire → Client Mapping
//! ```text
//! ┌──────────────────────────────┐        ┌──────────────────────────────┐
//! │ Pagination (wire)            │        │ PageInfo (client)            │
//! │ ───────────────────────────  │        │ ───────────────────────────  │
//! │ total_data   "42"            │ ─────► │ total_items   42             │
//! │ total_page   5               │ ─────► │ total_pages   5              │
//! │ total_display 10             │ ─────► │ page_size     10             │
//! │ current      2               │ ─────► │ current_page  2              │
//! │ last_page    false           │ ─────► │ has_next      true           │
//! │ first_page   false           │ ─────► │ has_prev      true           │
//! │ prev / next / detail         │  (kept on the wire type only)         │
//! └──────────────────────────────┘        └──────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};

use crate::lenient::u64_from_any;

/// Pagination object exactly as the backend sends it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// Total number of records (sent as a string by most endpoints).
    #[serde(default, deserialize_with = "u64_from_any")]
    pub total_data: u64,

    #[serde(default)]
    pub total_page: u32,

    /// Records per page.
    #[serde(default)]
    pub total_display: u32,

    #[serde(default)]
    pub first_page: bool,

    #[serde(default)]
    pub last_page: bool,

    #[serde(default)]
    pub prev: u32,

    #[serde(default)]
    pub current: u32,

    #[serde(default)]
    pub next: u32,

    /// Page numbers the server suggests rendering as links.
    #[serde(default)]
    pub detail: Vec<u32>,
}

/// Client-facing page metadata.
///
/// Deserializes straight from the wire [`Pagination`] shape, so list payloads
/// can declare `pagination: PageInfo` and never touch the raw form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Pagination", rename_all = "camelCase")]
pub struct PageInfo {
    pub total_items: u64,
    pub total_pages: u32,
    pub page_size: u32,
    pub current_page: u32,
    pub has_next: bool,
    pub has_prev: bool,
}

impl From<Pagination> for PageInfo {
    fn from(p: Pagination) -> Self {
        PageInfo {
            total_items: p.total_data,
            total_pages: p.total_page,
            page_size: p.total_display,
            current_page: p.current,
            has_next: !p.last_page,
            has_prev: !p.first_page,
        }
    }
}
