//! HTTP transport
//!
//! The seam between typed endpoint calls and the wire. The store only ever
//! sees [`Transport`], so tests can answer requests without a server.

use crate::api::error::{ApiError, ApiResult};
use async_trait::async_trait;
use reqwest::{Client, Method};
use serde_json::Value;
use std::time::Duration;

/// A single request against the platform API
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    /// Path relative to the base URL, starting with `/`
    pub path: String,
    /// JSON body, if any
    pub body: Option<Value>,
    /// Bearer token for the `Authorization` header
    pub bearer: Option<String>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
            bearer: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn bearer(mut self, token: Option<&str>) -> Self {
        self.bearer = token.map(str::to_string);
        self
    }
}

/// Executes [`ApiRequest`]s and returns the decoded JSON body
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: ApiRequest) -> ApiResult<Value>;
}

/// reqwest-backed transport
pub struct HttpTransport {
    client: Client,
    base_url: String,
}

impl HttpTransport {
    /// Create a transport for `base_url` with the given request timeout
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> ApiResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(&self, request: ApiRequest) -> ApiResult<Value> {
        let url = format!("{}{}", self.base_url, request.path);

        let mut builder = self.client.request(request.method.clone(), &url);
        if let Some(token) = &request.bearer {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(ApiError::from_transport)?;

        let status = response.status();
        let text = response.text().await.map_err(ApiError::from_transport)?;

        tracing::debug!("{} {} -> {}", request.method, request.path, status);

        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                message: text,
            });
        }

        parse_body(&text)
    }
}

/// Decode a response body; an empty body decodes to `null`
pub(crate) fn parse_body(text: &str) -> ApiResult<Value> {
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    Ok(serde_json::from_str(text)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_builder() {
        let request = ApiRequest::put("/api/user/profile")
            .json(json!({"role_name": "admin"}))
            .bearer(Some("abc"));

        assert_eq!(request.method, Method::PUT);
        assert_eq!(request.path, "/api/user/profile");
        assert_eq!(request.body, Some(json!({"role_name": "admin"})));
        assert_eq!(request.bearer.as_deref(), Some("abc"));
    }

    #[test]
    fn test_anonymous_request_has_no_bearer() {
        let request = ApiRequest::get("/api/user/profile").bearer(None);
        assert_eq!(request.bearer, None);
    }

    #[test]
    fn test_parse_body() {
        assert_eq!(parse_body("").unwrap(), Value::Null);
        assert_eq!(parse_body("  \n").unwrap(), Value::Null);
        assert_eq!(parse_body(r#"{"a":1}"#).unwrap(), json!({"a": 1}));
        assert!(matches!(parse_body("<html>"), Err(ApiError::Decode(_))));
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let transport =
            HttpTransport::new("http://localhost:5000/", Duration::from_secs(5)).unwrap();
        assert_eq!(transport.base_url(), "http://localhost:5000");
    }
}
