//! HTTP API Client
//!
//! reqwest-backed [`Transport`] for the learning API.
//!
//! - Joins relative paths onto the configured base URL
//! - Always sends `Content-Type: application/json`
//! - Applies the configured connect and request timeouts
//! - Maps every failure to an [`ApiError`]
//! - Logs requests and responses when request logging is enabled (non-production)

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::header::{HeaderValue, CONTENT_TYPE};

use super::error::{ApiError, ApiResult};
use super::transport::{ApiRequest, Method, Transport};
use crate::config::ApiConfig;

/// Client for the learning API
#[derive(Clone, Debug)]
pub struct ApiClient {
    /// Base URL without trailing slash (e.g. `http://localhost:8000/api`)
    base_url: String,
    /// Whether to log every request/response
    log_requests: bool,
    /// HTTP client
    http_client: reqwest::Client,
}

impl ApiClient {
    /// Create a client from configuration
    ///
    /// # Errors
    ///
    /// Returns an [`ErrorKind::Unknown`](super::ErrorKind::Unknown) error if
    /// the underlying HTTP client cannot be constructed (TLS backend failure).
    pub fn new(config: &ApiConfig) -> ApiResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .connect_timeout(Duration::from_millis(config.connect_timeout_ms))
            .build()
            .map_err(ApiError::unknown)?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            log_requests: config.log_requests,
            http_client,
        })
    }

    /// Base URL requests are sent to
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full URL for a relative path
    #[must_use]
    pub fn url_for(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    /// Check whether the backend answers `GET /health`
    pub async fn health_check(&self) -> bool {
        match self
            .http_client
            .get(self.url_for("/health"))
            .timeout(Duration::from_secs(5))
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                tracing::debug!(error = %e, "Health check failed");
                false
            }
        }
    }
}

#[async_trait]
impl Transport for ApiClient {
    async fn execute(&self, request: ApiRequest) -> ApiResult<serde_json::Value> {
        let url = self.url_for(&request.path);
        let started = Instant::now();

        if self.log_requests {
            tracing::debug!(method = %request.method, url = %url, "API request");
        }

        let mut builder = match request.method {
            Method::Get => self.http_client.get(&url),
            Method::Post => self.http_client.post(&url),
        };
        builder = builder.header(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(ref body) = request.body {
            builder = builder.json(body);
        } else if request.method == Method::Post {
            builder = builder.json(&serde_json::json!({}));
        }

        let response = match builder.send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(
                    method = %request.method,
                    url = %url,
                    error = %e,
                    "API error: no response"
                );
                return Err(if e.is_builder() {
                    ApiError::unknown(e)
                } else {
                    ApiError::network(e)
                });
            }
        };

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            tracing::warn!(url = %url, error = %e, "API error: failed to read body");
            ApiError::network(e)
        })?;

        if !status.is_success() {
            let error = ApiError::from_status(status.as_u16(), &body);
            tracing::warn!(
                method = %request.method,
                url = %url,
                status = status.as_u16(),
                kind = %error.kind,
                detail = ?error.detail,
                "API error"
            );
            return Err(error);
        }

        if self.log_requests {
            tracing::debug!(
                status = status.as_u16(),
                url = %url,
                elapsed_ms = started.elapsed().as_millis() as u64,
                "API response"
            );
        }

        if body.trim().is_empty() {
            return Ok(serde_json::Value::Null);
        }
        serde_json::from_str(&body).map_err(|e| {
            tracing::warn!(url = %url, error = %e, "API error: response is not JSON");
            ApiError::unknown(e)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> ApiClient {
        let config = ApiConfig {
            base_url: base.to_string(),
            ..ApiConfig::default()
        };
        ApiClient::new(&config).unwrap()
    }

    #[test]
    fn test_url_join() {
        let c = client("http://localhost:8000/api/");
        assert_eq!(c.base_url(), "http://localhost:8000/api");
        assert_eq!(c.url_for("/levels"), "http://localhost:8000/api/levels");
        assert_eq!(c.url_for("levels"), "http://localhost:8000/api/levels");
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_network_error() {
        // Port 9 (discard) on localhost is closed on CI machines
        let config = ApiConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            timeout_ms: 2_000,
            connect_timeout_ms: 1_000,
            ..ApiConfig::default()
        };
        let c = ApiClient::new(&config).unwrap();
        let err = c.execute(ApiRequest::get("/levels")).await.unwrap_err();
        assert_eq!(err.kind, super::super::ErrorKind::Network);
        assert_eq!(err.message, "Please check your network connection.");
    }
}
