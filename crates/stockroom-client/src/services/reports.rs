//! Sales, purchases and inventory reports.
//!
//! All three take the same [`ReportFilter`] and answer with rows, a summary
//! and optional pagination. Only the row and summary types differ.

use serde::de::DeserializeOwned;
use stockroom_core::{
    InventoryReportItem, InventorySummary, PurchaseReportItem, ReportFilter, ReportKind,
    ReportPage, SalesReportItem, ToQuery, TransactionSummary,
};
use tracing::debug;

use crate::error::ClientResult;
use crate::http::ApiClient;

pub type SalesReport = ReportPage<SalesReportItem, TransactionSummary>;
pub type PurchasesReport = ReportPage<PurchaseReportItem, TransactionSummary>;
pub type InventoryReport = ReportPage<InventoryReportItem, InventorySummary>;

#[derive(Clone)]
pub struct ReportsApi {
    client: ApiClient,
}

impl ReportsApi {
    pub fn new(client: ApiClient) -> Self {
        ReportsApi { client }
    }

    pub async fn sales(&self, filter: &ReportFilter) -> ClientResult<SalesReport> {
        self.fetch(ReportKind::Sales, filter).await
    }

    pub async fn purchases(&self, filter: &ReportFilter) -> ClientResult<PurchasesReport> {
        self.fetch(ReportKind::Purchases, filter).await
    }

    pub async fn inventory(&self, filter: &ReportFilter) -> ClientResult<InventoryReport> {
        self.fetch(ReportKind::Inventory, filter).await
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        kind: ReportKind,
        filter: &ReportFilter,
    ) -> ClientResult<T> {
        filter.validate()?;
        let query = filter.to_query();
        debug!(report = ?kind, query = %query.encode(), "Fetching report");
        self.client.get(kind.path(), query).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClientError;
    use crate::test_support::{api_client, ok, path_of, test_session, MockTransport};
    use chrono::NaiveDate;
    use serde_json::json;
    use std::sync::Arc;
    use stockroom_core::ReportPeriod;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[tokio::test]
    async fn test_sales_report_query_and_summary() {
        let transport = Arc::new(MockTransport::new(|_| {
            ok(json!({
                "items": [{
                    "id": "S1", "date": "2024-01-03", "productName": "Teh Botol",
                    "quantity": 10.0, "unitPrice": 5000.0, "total": 50000.0
                }],
                "summary": {
                    "totalTransactions": 1,
                    "totalAmount": 50000.0,
                    "averageTransactionValue": 50000.0,
                    "topProducts": [{"productName": "Teh Botol", "quantity": 10.0, "total": 50000.0}]
                }
            }))
        }));
        let api = ReportsApi::new(api_client(transport.clone(), test_session()));

        let mut filter = ReportFilter::new(date(2024, 1, 1), date(2024, 1, 31));
        filter.period = Some(ReportPeriod::Daily);
        filter.store_id = Some(2);
        let report = api.sales(&filter).await.unwrap();

        assert_eq!(report.items.len(), 1);
        assert_eq!(report.summary.total_transactions, 1);
        assert_eq!(report.summary.top_products[0].product_name, "Teh Botol");
        assert!(report.summary.top_categories.is_empty());
        assert!(report.pagination.is_none());

        let sent = transport.requests();
        assert_eq!(path_of(&sent[0]), "/reports/sales");
        assert_eq!(
            sent[0].url.query(),
            Some("startDate=2024-01-01&endDate=2024-01-31&type=daily&storeId=2&page=1&limit=10")
        );
    }

    #[tokio::test]
    async fn test_inventory_report_summary() {
        let transport = Arc::new(MockTransport::new(|_| {
            ok(json!({
                "items": [],
                "summary": {"totalProducts": 40, "totalValue": 1250000.0, "lowStockItems": 3}
            }))
        }));
        let api = ReportsApi::new(api_client(transport.clone(), test_session()));

        let report = api
            .inventory(&ReportFilter::new(date(2024, 2, 1), date(2024, 2, 29)))
            .await
            .unwrap();
        assert_eq!(report.summary.low_stock_items, 3);
        assert_eq!(path_of(&transport.requests()[0]), "/reports/inventory");
    }

    #[tokio::test]
    async fn test_inverted_range_is_rejected_locally() {
        let transport = Arc::new(MockTransport::new(|_| ok(json!(null))));
        let api = ReportsApi::new(api_client(transport.clone(), test_session()));

        let err = api
            .purchases(&ReportFilter::new(date(2024, 3, 1), date(2024, 2, 1)))
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Validation(_)));
        assert!(transport.requests().is_empty());
    }
}
