//! In-Memory Transport
//!
//! A [`Transport`] that answers from canned responses registered per
//! `(method, path)`. Test double only: compiled for this crate's tests and
//! for dependents that enable the `test-util` feature. No network involved.
//!
//! Unregistered routes answer with a 404 [`ApiError`], which matches what
//! the real backend does for unknown resources.

use std::collections::{HashMap, VecDeque};

use async_trait::async_trait;
use parking_lot::Mutex;
use serde::Serialize;

use super::error::{ApiError, ApiResult, ErrorKind};
use super::transport::{ApiRequest, Method, Transport};

#[derive(Default)]
struct RouteResponses {
    /// One-shot responses, consumed in order
    queued: VecDeque<ApiResult<serde_json::Value>>,
    /// Response used once the queue is empty
    sticky: Option<ApiResult<serde_json::Value>>,
}

/// Canned-response transport
#[derive(Default)]
pub struct InMemoryTransport {
    routes: Mutex<HashMap<(Method, String), RouteResponses>>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl InMemoryTransport {
    /// Create an empty transport (every route answers 404)
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Always answer `method path` with `value`
    pub fn respond<V: Serialize>(&self, method: Method, path: &str, value: V) -> &Self {
        let value = serde_json::to_value(value).unwrap_or(serde_json::Value::Null);
        self.routes
            .lock()
            .entry((method, path.to_string()))
            .or_default()
            .sticky = Some(Ok(value));
        self
    }

    /// Always fail `method path` with an error of `kind`
    pub fn fail(&self, method: Method, path: &str, kind: ErrorKind) -> &Self {
        self.routes
            .lock()
            .entry((method, path.to_string()))
            .or_default()
            .sticky = Some(Err(ApiError::of_kind(kind)));
        self
    }

    /// Answer the next `method path` call with `value`, then fall back
    pub fn respond_once<V: Serialize>(&self, method: Method, path: &str, value: V) -> &Self {
        let value = serde_json::to_value(value).unwrap_or(serde_json::Value::Null);
        self.routes
            .lock()
            .entry((method, path.to_string()))
            .or_default()
            .queued
            .push_back(Ok(value));
        self
    }

    /// Fail the next `method path` call with `kind`, then fall back
    pub fn fail_once(&self, method: Method, path: &str, kind: ErrorKind) -> &Self {
        self.routes
            .lock()
            .entry((method, path.to_string()))
            .or_default()
            .queued
            .push_back(Err(ApiError::of_kind(kind)));
        self
    }

    /// Every request executed so far, in order
    #[must_use]
    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().clone()
    }

    /// Number of calls made to `method path`
    #[must_use]
    pub fn count(&self, method: Method, path: &str) -> usize {
        self.requests
            .lock()
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .count()
    }

    /// Last request made to `method path`
    #[must_use]
    pub fn last(&self, method: Method, path: &str) -> Option<ApiRequest> {
        self.requests
            .lock()
            .iter()
            .rev()
            .find(|r| r.method == method && r.path == path)
            .cloned()
    }
}

#[async_trait]
impl Transport for InMemoryTransport {
    async fn execute(&self, request: ApiRequest) -> ApiResult<serde_json::Value> {
        let key = (request.method, request.path.clone());
        self.requests.lock().push(request);

        let mut routes = self.routes.lock();
        let Some(entry) = routes.get_mut(&key) else {
            return Err(ApiError::of_kind(ErrorKind::NotFound));
        };
        if let Some(response) = entry.queued.pop_front() {
            return response;
        }
        entry
            .sticky
            .clone()
            .unwrap_or_else(|| Err(ApiError::of_kind(ErrorKind::NotFound)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unregistered_route_is_not_found() {
        let transport = InMemoryTransport::new();
        let err = tokio_test::block_on(transport.execute(ApiRequest::get("/levels"))).unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(transport.count(Method::Get, "/levels"), 1);
    }

    #[tokio::test]
    async fn test_queued_then_sticky() {
        let transport = InMemoryTransport::new();
        transport
            .respond(Method::Get, "/levels", serde_json::json!([]))
            .fail_once(Method::Get, "/levels", ErrorKind::Server);

        let first = transport.execute(ApiRequest::get("/levels")).await;
        assert_eq!(first.unwrap_err().kind, ErrorKind::Server);

        let second = transport.execute(ApiRequest::get("/levels")).await;
        assert_eq!(second.unwrap(), serde_json::json!([]));
    }
}
