//! # Response Envelopes
//!
//! Every backend response shares one wrapper:
//!
//! ```json
//! { "success": true, "message": "OK", "data": { ... } }
//! ```
//!
//! List endpoints nest a second level inside `data`:
//!
//! ```json
//! { "success": true, "message": "OK",
//!   "data": { "data": [ ... ], "pagination": { ... } } }
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::pagination::PageInfo;

fn default_success() -> bool {
    true
}

/// `{success, message, data}` wrapper shared by every endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    /// Absent on a handful of endpoints; a 2xx without the flag is a success.
    #[serde(default = "default_success")]
    pub success: bool,

    #[serde(default)]
    pub message: String,

    pub data: T,
}

impl<T> ApiEnvelope<T> {
    /// Unwraps `data`, turning `success: false` into [`CoreError::Rejected`].
    pub fn into_data(self) -> CoreResult<T> {
        if self.success {
            Ok(self.data)
        } else {
            Err(CoreError::Rejected {
                message: self.message,
            })
        }
    }
}

/// Envelope for calls whose `data` carries nothing the client uses
/// (deletes, logout).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Acknowledgement {
    #[serde(default = "default_success")]
    pub success: bool,

    #[serde(default)]
    pub message: String,
}

impl Acknowledgement {
    pub fn into_result(self) -> CoreResult<()> {
        if self.success {
            Ok(())
        } else {
            Err(CoreError::Rejected {
                message: self.message,
            })
        }
    }
}

/// Inner `data` object of a list response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListPayload<E> {
    /// Older product endpoints named this array `products`.
    #[serde(alias = "products", default = "Vec::new")]
    pub data: Vec<E>,

    #[serde(default)]
    pub pagination: Option<PageInfo>,
}

/// One page of entities, as stored by the state containers.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<E> {
    pub items: Vec<E>,
    pub pagination: Option<PageInfo>,
}

impl<E> From<ListPayload<E>> for Page<E> {
    fn from(payload: ListPayload<E>) -> Self {
        Page {
            items: payload.data,
            pagination: payload.pagination,
        }
    }
}
