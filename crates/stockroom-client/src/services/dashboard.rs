//! Dashboard summary endpoints.

use stockroom_core::{GeneralSummary, QueryParams, SpecificSummary, TimeFilter};

use crate::error::ClientResult;
use crate::http::ApiClient;

pub const GENERAL_PATH: &str = "/dashboard/summary-general";
pub const SPECIFIC_PATH: &str = "/dashboard/summary-specific";

#[derive(Clone)]
pub struct DashboardApi {
    client: ApiClient,
}

impl DashboardApi {
    pub fn new(client: ApiClient) -> Self {
        DashboardApi { client }
    }

    pub async fn general(&self) -> ClientResult<GeneralSummary> {
        self.client.get(GENERAL_PATH, QueryParams::new()).await
    }

    pub async fn specific(&self, filter: TimeFilter) -> ClientResult<SpecificSummary> {
        let mut query = QueryParams::new();
        query.push("time_filter", filter);
        self.client.get(SPECIFIC_PATH, query).await
    }
}
