//! Request descriptors and the token-attaching step of the pipeline.

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use reqwest::Method;
use serde::Serialize;

use crate::error::Result;

/// Path fragment that marks an auth endpoint (login, register, refresh, me).
const AUTH_SEGMENT: &str = "/auth/";

/// Which backend a request is addressed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Backend {
    /// Auth, users and sales.
    Accounts,
    /// Products.
    Catalog,
}

/// An outbound request, before the base URL is applied.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub backend: Backend,
    pub method: Method,
    /// Absolute path on the backend, always starting with `/`.
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,
    pub headers: HeaderMap,
    retried: bool,
}

impl ApiRequest {
    pub fn new(backend: Backend, method: Method, path: impl AsRef<str>) -> Self {
        let path = path.as_ref();
        let path = if path.starts_with('/') {
            path.to_string()
        } else {
            format!("/{}", path)
        };
        Self {
            backend,
            method,
            path,
            query: Vec::new(),
            body: None,
            headers: HeaderMap::new(),
            retried: false,
        }
    }

    pub fn get(backend: Backend, path: impl AsRef<str>) -> Self {
        Self::new(backend, Method::GET, path)
    }

    pub fn post(backend: Backend, path: impl AsRef<str>) -> Self {
        Self::new(backend, Method::POST, path)
    }

    pub fn put(backend: Backend, path: impl AsRef<str>) -> Self {
        Self::new(backend, Method::PUT, path)
    }

    pub fn patch(backend: Backend, path: impl AsRef<str>) -> Self {
        Self::new(backend, Method::PATCH, path)
    }

    pub fn delete(backend: Backend, path: impl AsRef<str>) -> Self {
        Self::new(backend, Method::DELETE, path)
    }

    /// Attach a JSON body.
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }

    /// Append a query parameter.
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Whether this request establishes or renews identity.
    ///
    /// Such requests are never queued behind or retried after a refresh.
    pub fn is_auth_endpoint(&self) -> bool {
        self.path.contains(AUTH_SEGMENT)
    }

    /// Whether this request has already been replayed after a refresh.
    pub fn is_retried(&self) -> bool {
        self.retried
    }

    pub(crate) fn mark_retried(&mut self) {
        self.retried = true;
    }

    /// The bearer token currently attached, if any.
    pub fn bearer(&self) -> Option<&str> {
        self.headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
    }
}

/// Set `Authorization: Bearer <token>` when a token exists.
///
/// Without a token, or with one that cannot be a header value, the request
/// is returned unchanged.
pub fn attach_bearer(mut request: ApiRequest, token: Option<&str>) -> ApiRequest {
    if let Some(token) = token.filter(|t| !t.is_empty())
        && let Ok(value) = HeaderValue::from_str(&format!("Bearer {}", token))
    {
        request.headers.insert(AUTHORIZATION, value);
    }
    request
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_is_normalized() {
        let req = ApiRequest::get(Backend::Catalog, "api/products");
        assert_eq!(req.path, "/api/products");
        assert_eq!(req.method, Method::GET);
    }

    #[test]
    fn test_attach_bearer_sets_exact_header() {
        let req = attach_bearer(ApiRequest::get(Backend::Accounts, "/api/sales"), Some("abc.def"));
        assert_eq!(req.headers.get(AUTHORIZATION).unwrap(), "Bearer abc.def");
        assert_eq!(req.bearer(), Some("abc.def"));
    }

    #[test]
    fn test_attach_bearer_without_token() {
        let req = attach_bearer(ApiRequest::get(Backend::Accounts, "/api/sales"), None);
        assert!(req.headers.get(AUTHORIZATION).is_none());

        let req = attach_bearer(ApiRequest::get(Backend::Accounts, "/api/sales"), Some(""));
        assert!(req.headers.get(AUTHORIZATION).is_none());
    }

    #[test]
    fn test_attach_bearer_replaces_stale_header() {
        let req = attach_bearer(ApiRequest::get(Backend::Catalog, "/api/products"), Some("old"));
        let req = attach_bearer(req, Some("new"));
        assert_eq!(req.headers.get_all(AUTHORIZATION).iter().count(), 1);
        assert_eq!(req.bearer(), Some("new"));
    }

    #[test]
    fn test_attach_bearer_ignores_invalid_header_value() {
        let req = attach_bearer(ApiRequest::get(Backend::Catalog, "/x"), Some("bad\ntoken"));
        assert!(req.headers.get(AUTHORIZATION).is_none());
    }

    #[test]
    fn test_auth_endpoints() {
        assert!(ApiRequest::post(Backend::Accounts, "/api/auth/login").is_auth_endpoint());
        assert!(ApiRequest::post(Backend::Accounts, "/api/auth/refresh-token").is_auth_endpoint());
        assert!(ApiRequest::get(Backend::Accounts, "/api/auth/me").is_auth_endpoint());
        assert!(!ApiRequest::get(Backend::Accounts, "/api/users").is_auth_endpoint());
        assert!(!ApiRequest::get(Backend::Catalog, "/api/products/authors").is_auth_endpoint());
    }

    #[test]
    fn test_json_body() {
        let req = ApiRequest::patch(Backend::Catalog, "/api/products/1/decrease-stock")
            .json(&serde_json::json!({"quantity": 2}))
            .unwrap();
        assert_eq!(req.body.unwrap()["quantity"], 2);
    }
}
