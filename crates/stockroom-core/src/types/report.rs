//! # Reports
//!
//! Read-only, date-bounded reports over sales, purchases and inventory.
//!
//! ```text
//! GET /reports/sales?startDate=2024-01-01&endDate=2024-01-31&type=daily&page=1&limit=10
//!                    └────────── required ───────────────┘ └─ optional ─┘ └─ paging ─┘
//! ```

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::pagination::PageInfo;
use crate::query::{PageSize, QueryParams, ToQuery};
use crate::validation::{validate_date_range, validate_page, ValidationResult};

/// Which report endpoint to call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportKind {
    Sales,
    Purchases,
    Inventory,
}

impl ReportKind {
    pub const fn path(self) -> &'static str {
        match self {
            ReportKind::Sales => "/reports/sales",
            ReportKind::Purchases => "/reports/purchases",
            ReportKind::Inventory => "/reports/inventory",
        }
    }
}

/// Aggregation bucket (`type` on the wire).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportPeriod {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl fmt::Display for ReportPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ReportPeriod::Daily => "daily",
            ReportPeriod::Weekly => "weekly",
            ReportPeriod::Monthly => "monthly",
            ReportPeriod::Yearly => "yearly",
        })
    }
}

/// Filter shared by all three reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportFilter {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub period: Option<ReportPeriod>,
    pub store_id: Option<i64>,
    pub category_id: Option<i64>,
    pub account_id: Option<i64>,
    pub page: u32,
    pub limit: PageSize,
}

impl ReportFilter {
    /// First page of ten rows over `[start, end]`.
    pub fn new(start_date: NaiveDate, end_date: NaiveDate) -> Self {
        ReportFilter {
            start_date,
            end_date,
            period: None,
            store_id: None,
            category_id: None,
            account_id: None,
            page: 1,
            limit: PageSize::Ten,
        }
    }

    pub fn validate(&self) -> ValidationResult<()> {
        validate_date_range(self.start_date, self.end_date)?;
        validate_page(self.page)
    }
}

impl ToQuery for ReportFilter {
    fn to_query(&self) -> QueryParams {
        let mut query = QueryParams::new();
        query
            .push("startDate", self.start_date.format("%Y-%m-%d"))
            .push("endDate", self.end_date.format("%Y-%m-%d"))
            .push_opt("type", self.period)
            .push_opt("storeId", self.store_id)
            .push_opt("categoryId", self.category_id)
            .push_opt("accountId", self.account_id)
            .push("page", self.page)
            .push("limit", self.limit);
        query
    }
}

// =============================================================================
// Rows
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesReportItem {
    pub id: String,
    pub date: String,
    pub product_name: String,
    pub quantity: f64,
    pub unit_price: f64,
    pub total: f64,
    #[serde(default)]
    pub customer_name: String,
    #[serde(default)]
    pub store_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseReportItem {
    pub id: String,
    pub date: String,
    pub product_name: String,
    pub quantity: f64,
    pub unit_cost: f64,
    pub total: f64,
    #[serde(default)]
    pub supplier_name: String,
    #[serde(default)]
    pub store_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryReportItem {
    pub id: String,
    pub product_name: String,
    #[serde(default)]
    pub sku: String,
    #[serde(default)]
    pub category_name: String,
    pub quantity: f64,
    pub unit_price: f64,
    pub total_value: f64,
    #[serde(default)]
    pub last_restock_date: Option<String>,
}

// =============================================================================
// Summaries
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopProduct {
    pub product_name: String,
    pub quantity: f64,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopCategory {
    pub category_name: String,
    pub total: f64,
}

/// Summary attached to the sales and purchases reports.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TransactionSummary {
    pub total_transactions: u64,
    pub total_amount: f64,
    pub average_transaction_value: f64,
    pub top_products: Vec<TopProduct>,
    pub top_categories: Vec<TopCategory>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InventorySummary {
    pub total_products: u64,
    pub total_value: f64,
    pub low_stock_items: u64,
}

/// `data` of a report response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportPage<I, S> {
    #[serde(default = "Vec::new")]
    pub items: Vec<I>,
    pub summary: S,
    #[serde(default)]
    pub pagination: Option<PageInfo>,
}
