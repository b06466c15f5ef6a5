//! # List Filters & Query Parameters
//!
//! Every list screen sends a handful of optional filters. The backend treats
//! a present-but-empty parameter differently from an absent one, so the
//! rule here is strict: **a filter that is not set never reaches the wire**.
//!
//! ## Flattening
//! ```text
//! ListFilter { search: Some("foo"), sort_by: None, page: Some(2), .. }
//!      │
//!      ▼  to_query()
//! QueryParams [("search","foo"), ("page","2")]
//!      │
//!      ▼  encode()
//! "search=foo&page=2"
//! ```
//!
//! Parameter order is fixed (`search`, resource extras, `sortBy`,
//! `sortOrder`, `limit`, `page`) so identical filters always produce
//! identical URLs.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::types::AccountType;
use crate::ALLOWED_PAGE_SIZES;

// =============================================================================
// Query Parameters
// =============================================================================

/// Ordered, already-stringified query parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams(Vec<(String, String)>);

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a parameter unconditionally.
    pub fn push(&mut self, key: &str, value: impl fmt::Display) -> &mut Self {
        self.0.push((key.to_string(), value.to_string()));
        self
    }

    /// Appends a parameter only when a value is present.
    pub fn push_opt<V: fmt::Display>(&mut self, key: &str, value: Option<V>) -> &mut Self {
        if let Some(value) = value {
            self.push(key, value);
        }
        self
    }

    /// Appends free text only when it is present and not blank.
    pub fn push_text(&mut self, key: &str, value: Option<&str>) -> &mut Self {
        match value.map(str::trim) {
            Some(text) if !text.is_empty() => self.push(key, text),
            _ => self,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// `application/x-www-form-urlencoded` rendering, without the leading `?`.
    pub fn encode(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.iter())
            .finish()
    }
}

/// Anything that can be flattened into query parameters.
pub trait ToQuery {
    fn to_query(&self) -> QueryParams;
}

impl ToQuery for QueryParams {
    fn to_query(&self) -> QueryParams {
        self.clone()
    }
}

// =============================================================================
// Page Size
// =============================================================================

/// The page sizes list endpoints accept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum PageSize {
    One,
    #[default]
    Ten,
    Hundred,
    Thousand,
}

impl PageSize {
    pub const fn as_u32(self) -> u32 {
        match self {
            PageSize::One => 1,
            PageSize::Ten => 10,
            PageSize::Hundred => 100,
            PageSize::Thousand => 1000,
        }
    }
}

impl TryFrom<u32> for PageSize {
    type Error = ValidationError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(PageSize::One),
            10 => Ok(PageSize::Ten),
            100 => Ok(PageSize::Hundred),
            1000 => Ok(PageSize::Thousand),
            _ => Err(ValidationError::NotAllowed {
                field: "limit".to_string(),
                allowed: ALLOWED_PAGE_SIZES.iter().map(u32::to_string).collect(),
            }),
        }
    }
}

impl From<PageSize> for u32 {
    fn from(size: PageSize) -> Self {
        size.as_u32()
    }
}

impl fmt::Display for PageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_u32())
    }
}

// =============================================================================
// Sorting
// =============================================================================

/// Sortable columns on catalog lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    Name,
    CreatedAt,
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortField::Name => write!(f, "name"),
            SortField::CreatedAt => write!(f, "createdAt"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortOrder::Asc => write!(f, "asc"),
            SortOrder::Desc => write!(f, "desc"),
        }
    }
}

// =============================================================================
// Filters
// =============================================================================

/// Filters shared by every list endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListFilter {
    pub search: Option<String>,
    pub sort_by: Option<SortField>,
    pub sort_order: Option<SortOrder>,
    pub limit: Option<PageSize>,
    pub page: Option<u32>,
}

impl ListFilter {
    /// Free-text search on the first page.
    pub fn search(text: impl Into<String>) -> Self {
        ListFilter {
            search: Some(text.into()),
            ..Self::default()
        }
    }

    pub fn with_page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    pub fn with_limit(mut self, limit: PageSize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn sorted(mut self, field: SortField, order: SortOrder) -> Self {
        self.sort_by = Some(field);
        self.sort_order = Some(order);
        self
    }

    fn write_search(&self, query: &mut QueryParams) {
        query.push_text("search", self.search.as_deref());
    }

    fn write_ordering_and_paging(&self, query: &mut QueryParams) {
        query
            .push_opt("sortBy", self.sort_by)
            .push_opt("sortOrder", self.sort_order)
            .push_opt("limit", self.limit)
            .push_opt("page", self.page);
    }
}

impl ToQuery for ListFilter {
    fn to_query(&self) -> QueryParams {
        let mut query = QueryParams::new();
        self.write_search(&mut query);
        self.write_ordering_and_paging(&mut query);
        query
    }
}

/// Account list filters: the shared set plus supplier/customer narrowing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccountFilter {
    pub list: ListFilter,
    pub account_type: Option<AccountType>,
}

impl ToQuery for AccountFilter {
    fn to_query(&self) -> QueryParams {
        let mut query = QueryParams::new();
        self.list.write_search(&mut query);
        query.push_opt("type", self.account_type);
        self.list.write_ordering_and_paging(&mut query);
        query
    }
}

/// Product list filters: the shared set plus a category restriction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilter {
    pub list: ListFilter,
    pub category_id: Option<String>,
}

impl ToQuery for ProductFilter {
    fn to_query(&self) -> QueryParams {
        let mut query = QueryParams::new();
        self.list.write_search(&mut query);
        query.push_text("categoryId", self.category_id.as_deref());
        self.list.write_ordering_and_paging(&mut query);
        query
    }
}
