//! Levels service

use std::sync::Arc;

use crate::api::{call, ApiRequest, ApiResult, Transport};
use crate::types::Level;

use super::segment;

/// `GET /levels...`
pub struct LevelsService<T: ?Sized> {
    transport: Arc<T>,
}

impl<T: ?Sized> Clone for LevelsService<T> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
        }
    }
}

impl<T: Transport + ?Sized> LevelsService<T> {
    /// Create the service over a shared transport
    pub fn new(transport: Arc<T>) -> Self {
        Self { transport }
    }

    /// `GET /levels`
    pub async fn list(&self) -> ApiResult<Vec<Level>> {
        call(&*self.transport, ApiRequest::get("/levels")).await
    }

    /// `GET /levels/with-stats`
    pub async fn list_with_stats(&self) -> ApiResult<Vec<Level>> {
        call(&*self.transport, ApiRequest::get("/levels/with-stats")).await
    }

    /// `GET /levels/{code}`
    pub async fn get(&self, code: &str) -> ApiResult<Level> {
        call(&*self.transport, ApiRequest::get(format!("/levels/{}", segment(code)))).await
    }
}
