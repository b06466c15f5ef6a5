//! Dashboard summaries.
//!
//! Every counter arrives as a string on most deployments and as a number on
//! a few; both are accepted and parsed into integers here so the UI never
//! does arithmetic on text.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::lenient::u64_from_any;

/// Store-wide totals, independent of time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneralSummary {
    #[serde(deserialize_with = "u64_from_any")]
    pub total_customers: u64,
    #[serde(deserialize_with = "u64_from_any")]
    pub total_suppliers: u64,
    #[serde(deserialize_with = "u64_from_any")]
    pub total_stores: u64,
    #[serde(deserialize_with = "u64_from_any")]
    pub total_products: u64,
}

/// Transaction totals within a [`TimeFilter`] window.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecificSummary {
    #[serde(deserialize_with = "u64_from_any")]
    pub total_quotations: u64,
    #[serde(deserialize_with = "u64_from_any")]
    pub total_purchases: u64,
    #[serde(deserialize_with = "u64_from_any")]
    pub total_stock_movements_in: u64,
    #[serde(deserialize_with = "u64_from_any")]
    pub total_stock_movements_out: u64,
    /// The window the server actually applied, echoed back.
    #[serde(default)]
    pub time_filter: String,
}

/// Reporting window for [`SpecificSummary`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeFilter {
    Today,
    Yesterday,
    ThisWeek,
    LastWeek,
    LastTwoWeeks,
    #[default]
    ThisMonth,
    LastMonth,
    LastYear,
}

impl TimeFilter {
    pub const ALL: [TimeFilter; 8] = [
        TimeFilter::Today,
        TimeFilter::Yesterday,
        TimeFilter::ThisWeek,
        TimeFilter::LastWeek,
        TimeFilter::LastTwoWeeks,
        TimeFilter::ThisMonth,
        TimeFilter::LastMonth,
        TimeFilter::LastYear,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            TimeFilter::Today => "today",
            TimeFilter::Yesterday => "yesterday",
            TimeFilter::ThisWeek => "this_week",
            TimeFilter::LastWeek => "last_week",
            TimeFilter::LastTwoWeeks => "last_two_weeks",
            TimeFilter::ThisMonth => "this_month",
            TimeFilter::LastMonth => "last_month",
            TimeFilter::LastYear => "last_year",
        }
    }
}

impl fmt::Display for TimeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeFilter {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TimeFilter::ALL
            .into_iter()
            .find(|filter| filter.as_str() == s)
            .ok_or_else(|| ValidationError::NotAllowed {
                field: "time_filter".to_string(),
                allowed: TimeFilter::ALL.iter().map(|f| f.to_string()).collect(),
            })
    }
}
