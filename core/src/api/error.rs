//! API Error Types
//!
//! The API client is the only place that looks at raw transport failures.
//! Everything above it sees an [`ApiError`]: one of a fixed set of
//! categories plus a message that can be shown to the user as-is.

use serde::Deserialize;
use thiserror::Error;

/// Result type for API operations
pub type ApiResult<T> = Result<T, ApiError>;

/// User-facing error category
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// HTTP 400
    BadRequest,
    /// HTTP 401
    Unauthorized,
    /// HTTP 403
    Forbidden,
    /// HTTP 404
    NotFound,
    /// HTTP 422
    Validation,
    /// HTTP 5xx
    Server,
    /// No response reached us (connect failure, timeout)
    Network,
    /// Anything else, including payloads that fail to decode
    Unknown,
}

impl ErrorKind {
    /// Classify an HTTP status code
    #[must_use]
    pub fn from_status(status: u16) -> Self {
        match status {
            400 => Self::BadRequest,
            401 => Self::Unauthorized,
            403 => Self::Forbidden,
            404 => Self::NotFound,
            422 => Self::Validation,
            500..=599 => Self::Server,
            _ => Self::Unknown,
        }
    }

    /// Short machine-friendly name, used in logs
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BadRequest => "bad_request",
            Self::Unauthorized => "unauthorized",
            Self::Forbidden => "forbidden",
            Self::NotFound => "not_found",
            Self::Validation => "validation",
            Self::Server => "server",
            Self::Network => "network",
            Self::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalized API failure
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct ApiError {
    /// Category
    pub kind: ErrorKind,
    /// Human-readable message, safe to display
    pub message: String,
    /// HTTP status, if the server answered
    pub status: Option<u16>,
    /// Server-provided detail text, if the body carried one
    pub detail: Option<String>,
}

impl ApiError {
    /// Build the error for a non-2xx response
    #[must_use]
    pub fn from_status(status: u16, body: &str) -> Self {
        let kind = ErrorKind::from_status(status);
        let message = match status {
            400 => "The request is invalid.".to_string(),
            401 => "Authentication is required.".to_string(),
            403 => "You do not have permission to access this.".to_string(),
            404 => "The requested data could not be found.".to_string(),
            422 => "Please check the submitted data.".to_string(),
            500 => "A server error occurred.".to_string(),
            other => format!("Server error: {other}"),
        };
        Self {
            kind,
            message,
            status: Some(status),
            detail: extract_detail(body),
        }
    }

    /// The request never got a response
    #[must_use]
    pub fn network(cause: impl std::fmt::Display) -> Self {
        Self {
            kind: ErrorKind::Network,
            message: "Please check your network connection.".to_string(),
            status: None,
            detail: Some(cause.to_string()),
        }
    }

    /// Unclassified failure (bad URL, undecodable payload, ...)
    #[must_use]
    pub fn unknown(cause: impl std::fmt::Display) -> Self {
        Self {
            kind: ErrorKind::Unknown,
            message: "An unknown error occurred.".to_string(),
            status: None,
            detail: Some(cause.to_string()),
        }
    }

    /// Shorthand for tests and mocks: an error of the given kind with its
    /// standard message
    #[must_use]
    pub fn of_kind(kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::BadRequest => Self::from_status(400, ""),
            ErrorKind::Unauthorized => Self::from_status(401, ""),
            ErrorKind::Forbidden => Self::from_status(403, ""),
            ErrorKind::NotFound => Self::from_status(404, ""),
            ErrorKind::Validation => Self::from_status(422, ""),
            ErrorKind::Server => Self::from_status(500, ""),
            ErrorKind::Network => Self::network("connection refused"),
            ErrorKind::Unknown => Self::unknown("unclassified"),
        }
    }

    /// Whether this is a not-found condition
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.kind == ErrorKind::NotFound
    }
}

/// Error bodies look like `{"detail": "..."}` or, for validation errors,
/// `{"detail": [{"loc": [...], "msg": "...", "type": "..."}]}`
#[derive(Deserialize)]
struct ErrorBody {
    detail: DetailField,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum DetailField {
    Text(String),
    Items(Vec<ValidationItem>),
}

#[derive(Deserialize)]
struct ValidationItem {
    #[serde(default)]
    loc: Vec<serde_json::Value>,
    msg: String,
}

fn extract_detail(body: &str) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    match parsed.detail {
        DetailField::Text(text) if !text.is_empty() => Some(text),
        DetailField::Text(_) => None,
        DetailField::Items(items) if !items.is_empty() => Some(
            items
                .iter()
                .map(|item| {
                    let loc: Vec<String> = item
                        .loc
                        .iter()
                        .map(|v| match v {
                            serde_json::Value::String(s) => s.clone(),
                            other => other.to_string(),
                        })
                        .collect();
                    if loc.is_empty() {
                        item.msg.clone()
                    } else {
                        format!("{}: {}", loc.join("."), item.msg)
                    }
                })
                .collect::<Vec<_>>()
                .join("; "),
        ),
        DetailField::Items(_) => None,
    }
}
