//! Learning paths service

use std::sync::Arc;

use crate::api::{call, ApiRequest, ApiResult, Transport};
use crate::types::{CurriculumItem, GenerateLearningPathRequest, LearningPath, LearningPathDetail};

use super::segment;

/// `GET /learning-paths...` and the sub-topic scoped path endpoints
pub struct LearningPathsService<T: ?Sized> {
    transport: Arc<T>,
}

impl<T: ?Sized> Clone for LearningPathsService<T> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
        }
    }
}

impl<T: Transport + ?Sized> LearningPathsService<T> {
    /// Create the service over a shared transport
    pub fn new(transport: Arc<T>) -> Self {
        Self { transport }
    }

    /// `GET /sub-topics/{id}/learning-paths`
    pub async fn for_sub_topic(&self, sub_topic_id: i64) -> ApiResult<Vec<LearningPath>> {
        let request = ApiRequest::get(format!("/sub-topics/{sub_topic_id}/learning-paths"));
        call(&*self.transport, request).await
    }

    /// `GET /learning-paths/{id}`
    pub async fn detail(&self, path_id: &str) -> ApiResult<LearningPathDetail> {
        let request = ApiRequest::get(format!("/learning-paths/{}", segment(path_id)));
        call(&*self.transport, request).await
    }

    /// `GET /learning-paths/{id}/curriculum-items`
    pub async fn curriculum_items(&self, path_id: &str) -> ApiResult<Vec<CurriculumItem>> {
        let path = format!("/learning-paths/{}/curriculum-items", segment(path_id));
        let request = ApiRequest::get(path);
        call(&*self.transport, request).await
    }

    /// `POST /sub-topics/{id}/learning-paths/generate`
    pub async fn generate(
        &self,
        sub_topic_id: i64,
        request: &GenerateLearningPathRequest,
    ) -> ApiResult<LearningPathDetail> {
        let request = ApiRequest::post(format!("/sub-topics/{sub_topic_id}/learning-paths/generate"))
            .with_body(request);
        call(&*self.transport, request).await
    }
}
