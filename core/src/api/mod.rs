//! Learning API Access
//!
//! Everything that talks to the REST backend goes through a [`Transport`].
//!
//! # Available Transports
//!
//! - **ApiClient**: reqwest over HTTP (production)
//! - **InMemoryTransport**: canned responses for tests (`test-util` feature)
//!
//! # Usage
//!
//! ```ignore
//! use infou_core::api::{call, ApiClient, ApiRequest};
//!
//! let client = ApiClient::new(&config.api)?;
//! let levels: Vec<Level> = call(&client, ApiRequest::get("/levels")).await?;
//! ```

mod client;
mod error;
#[cfg(any(test, feature = "test-util"))]
mod in_memory;
mod transport;

pub use client::ApiClient;
pub use error::{ApiError, ApiResult, ErrorKind};
#[cfg(any(test, feature = "test-util"))]
pub use in_memory::InMemoryTransport;
pub use transport::{call, ApiRequest, Method, Transport};
