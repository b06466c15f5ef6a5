//! Dashboard summaries and the selected time window.

use std::sync::{Arc, Mutex, PoisonError};

use stockroom_core::{GeneralSummary, SpecificSummary, TimeFilter};
use tracing::warn;

use crate::services::DashboardApi;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DashboardRecord {
    pub general: Option<GeneralSummary>,
    pub specific: Option<SpecificSummary>,
    pub time_filter: TimeFilter,
    pub loading: bool,
    pub error: Option<String>,
}

#[derive(Clone)]
pub struct DashboardState {
    api: DashboardApi,
    record: Arc<Mutex<DashboardRecord>>,
}

impl DashboardState {
    pub fn new(api: DashboardApi) -> Self {
        DashboardState {
            api,
            record: Arc::new(Mutex::new(DashboardRecord::default())),
        }
    }

    pub fn snapshot(&self) -> DashboardRecord {
        self.with_record(|record| record.clone())
    }

    pub async fn fetch_general(&self) {
        self.with_record(|record| {
            record.loading = true;
            record.error = None;
        });

        let result = self.api.general().await;
        self.with_record(|record| {
            record.loading = false;
            match result {
                Ok(summary) => record.general = Some(summary),
                Err(e) => {
                    warn!(error = %e, "Failed to fetch general summary");
                    record.error = Some(e.display_message("Failed to fetch dashboard summary"));
                }
            }
        });
    }

    /// Switches the window and loads the totals for it.
    pub async fn fetch_specific(&self, filter: TimeFilter) {
        self.with_record(|record| {
            record.time_filter = filter;
            record.loading = true;
            record.error = None;
        });

        let result = self.api.specific(filter).await;
        self.with_record(|record| {
            record.loading = false;
            match result {
                Ok(summary) => record.specific = Some(summary),
                Err(e) => {
                    warn!(error = %e, time_filter = %filter, "Failed to fetch specific summary");
                    record.error = Some(e.display_message("Failed to fetch dashboard summary"));
                }
            }
        });
    }

    /// Loads both summaries for the current window.
    pub async fn refresh(&self) {
        let filter = self.with_record(|record| record.time_filter);
        tokio::join!(self.fetch_general(), self.fetch_specific(filter));
    }

    fn with_record<T>(&self, f: impl FnOnce(&mut DashboardRecord) -> T) -> T {
        let mut guard = self.record.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }
}
