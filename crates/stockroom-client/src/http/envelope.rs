//! Immutable description of one logical call, kept so it can be replayed
//! after a token refresh.
//!
//! The envelope never changes between attempts; only the [`Attempt`] value
//! travelling beside it and the bearer token read from the session do.

use serde_json::Value;
use stockroom_core::QueryParams;
use url::Url;
use uuid::Uuid;

use super::transport::{HttpMethod, OutboundRequest};
use crate::error::{ClientError, ClientResult};

/// Which send of an envelope this is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attempt {
    Initial,
    /// The single resend after a successful refresh. A 401 here is final.
    Replay,
}

impl Attempt {
    pub fn number(self) -> u8 {
        match self {
            Attempt::Initial => 1,
            Attempt::Replay => 2,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RequestEnvelope {
    id: Uuid,
    method: HttpMethod,
    path: String,
    query: QueryParams,
    body: Option<Value>,
}

impl RequestEnvelope {
    pub fn new(
        method: HttpMethod,
        path: impl Into<String>,
        body: Option<Value>,
        query: QueryParams,
    ) -> Self {
        RequestEnvelope {
            id: Uuid::new_v4(),
            method,
            path: path.into(),
            query,
            body,
        }
    }

    /// Correlates the initial send and its replay in logs.
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query(&self) -> &QueryParams {
        &self.query
    }

    pub fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }

    /// `base` + `path`, plus the query string when there is one.
    pub fn url(&self, base: &Url) -> ClientResult<Url> {
        if !self.path.starts_with('/') {
            return Err(ClientError::InvalidUrl(format!(
                "request path must start with '/': {}",
                self.path
            )));
        }

        let joined = format!("{}{}", base.as_str().trim_end_matches('/'), self.path);
        let mut url = Url::parse(&joined)?;
        if !self.query.is_empty() {
            url.query_pairs_mut().extend_pairs(self.query.iter());
        }
        Ok(url)
    }

    pub fn to_outbound(&self, base: &Url, bearer: Option<String>) -> ClientResult<OutboundRequest> {
        Ok(OutboundRequest {
            method: self.method,
            url: self.url(base)?,
            bearer,
            body: self.body.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockroom_core::{ListFilter, ToQuery};

    fn base() -> Url {
        Url::parse("http://localhost:3080/api").unwrap()
    }

    #[test]
    fn test_url_keeps_base_path_prefix() {
        let env = RequestEnvelope::new(HttpMethod::Get, "/categories/all", None, QueryParams::new());
        assert_eq!(env.url(&base()).unwrap().as_str(), "http://localhost:3080/api/categories/all");

        let with_slash = Url::parse("http://localhost:3080/api/").unwrap();
        assert_eq!(
            env.url(&with_slash).unwrap().as_str(),
            "http://localhost:3080/api/categories/all"
        );
    }

    #[test]
    fn test_query_string_exact() {
        let query = ListFilter::search("foo").with_page(2).to_query();
        let env = RequestEnvelope::new(HttpMethod::Get, "/products/all", None, query);
        assert_eq!(env.url(&base()).unwrap().query(), Some("search=foo&page=2"));
    }

    #[test]
    fn test_no_trailing_question_mark_without_query() {
        let env = RequestEnvelope::new(HttpMethod::Get, "/quotations", None, QueryParams::new());
        let url = env.url(&base()).unwrap();
        assert_eq!(url.query(), None);
        assert!(!url.as_str().ends_with('?'));
    }

    #[test]
    fn test_relative_path_rejected() {
        let env = RequestEnvelope::new(HttpMethod::Get, "quotations", None, QueryParams::new());
        assert!(env.url(&base()).is_err());
    }

    #[test]
    fn test_outbound_carries_bearer_and_body() {
        let env = RequestEnvelope::new(
            HttpMethod::Post,
            "/categories/detail",
            Some(serde_json::json!({"id": 3})),
            QueryParams::new(),
        );
        let out = env.to_outbound(&base(), Some("t1".into())).unwrap();
        assert_eq!(out.method, HttpMethod::Post);
        assert_eq!(out.bearer.as_deref(), Some("t1"));
        assert_eq!(out.body, Some(serde_json::json!({"id": 3})));
    }
}
