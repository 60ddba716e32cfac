//! Transport Trait
//!
//! Abstraction over "send this request to the learning API". The production
//! implementation is [`super::ApiClient`]; tests plug in in-memory doubles so
//! services, selectors and the controller can be exercised without a server.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::error::{ApiError, ApiResult};

/// HTTP method subset used by the learning API
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Method {
    /// GET
    Get,
    /// POST
    Post,
}

impl Method {
    /// Upper-case name
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A request relative to the configured base URL
#[derive(Clone, Debug, PartialEq)]
pub struct ApiRequest {
    /// HTTP method
    pub method: Method,
    /// Relative path, always starting with `/`
    pub path: String,
    /// Query parameters in insertion order
    pub query: Vec<(String, String)>,
    /// JSON body
    pub body: Option<serde_json::Value>,
    /// Extra headers
    pub headers: Vec<(String, String)>,
}

impl ApiRequest {
    /// Create a request
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        let mut path = path.into();
        if !path.starts_with('/') {
            path.insert(0, '/');
        }
        Self {
            method,
            path,
            query: Vec::new(),
            body: None,
            headers: Vec::new(),
        }
    }

    /// GET request
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    /// POST request
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::Post, path)
    }

    /// Add a query parameter
    #[must_use]
    pub fn with_query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    /// Add a query parameter only when the value is present
    #[must_use]
    pub fn with_optional_query<V: ToString>(self, key: impl Into<String>, value: Option<V>) -> Self {
        match value {
            Some(v) => self.with_query(key, v),
            None => self,
        }
    }

    /// Set a JSON body
    ///
    /// Serialization of the body types in this crate cannot fail; if a
    /// caller passes something unserializable the body is sent as `null`.
    #[must_use]
    pub fn with_body<B: Serialize>(mut self, body: &B) -> Self {
        self.body = Some(serde_json::to_value(body).unwrap_or(serde_json::Value::Null));
        self
    }

    /// Add a header
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Attach an opaque bearer token when one is configured
    #[must_use]
    pub fn with_bearer(self, token: Option<&str>) -> Self {
        match token {
            Some(t) if !t.is_empty() => self.with_header("Authorization", format!("Bearer {t}")),
            _ => self,
        }
    }

    /// Value of a query parameter (first occurrence)
    #[must_use]
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

impl std::fmt::Display for ApiRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.method, self.path)
    }
}

/// Something that can execute [`ApiRequest`]s
///
/// Implementations classify every failure into an [`ApiError`]; callers never
/// see raw transport errors.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Execute a request and return the decoded JSON payload
    async fn execute(&self, request: ApiRequest) -> ApiResult<serde_json::Value>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    async fn execute(&self, request: ApiRequest) -> ApiResult<serde_json::Value> {
        (**self).execute(request).await
    }
}

/// Execute a request and decode the payload into `T`
///
/// # Errors
///
/// Propagates the transport's [`ApiError`]; a payload that does not match
/// `T` becomes an [`super::ErrorKind::Unknown`] error.
pub async fn call<T, R>(transport: &T, request: ApiRequest) -> ApiResult<R>
where
    T: Transport + ?Sized,
    R: DeserializeOwned,
{
    let label = request.to_string();
    let value = transport.execute(request).await?;
    serde_json::from_value(value).map_err(|e| {
        tracing::warn!(request = %label, error = %e, "Failed to decode API payload");
        ApiError::unknown(e)
    })
}
