//! Topics service
//!
//! Main topics (paginated) and curated sub-topics.

use std::sync::Arc;

use crate::api::{call, ApiRequest, ApiResult, Transport};
use crate::types::{CuratedSubTopic, GenerateSubTopicRequest, MainTopic, Page, SubTopic};

use super::segment;

/// Filters for `GET /main-topics`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MainTopicQuery {
    /// Page number (1-based)
    pub page: u32,
    /// Page size
    pub size: u32,
    /// Only active (or inactive) topics
    pub is_active: Option<bool>,
    /// Free-text search
    pub search: Option<String>,
}

impl Default for MainTopicQuery {
    fn default() -> Self {
        Self {
            page: 1,
            size: 20,
            is_active: None,
            search: None,
        }
    }
}

impl MainTopicQuery {
    fn into_request(self) -> ApiRequest {
        ApiRequest::get("/main-topics")
            .with_query("page", self.page)
            .with_query("size", self.size)
            .with_optional_query("is_active", self.is_active)
            .with_optional_query("search", self.search.filter(|s| !s.trim().is_empty()))
    }
}

/// `GET /main-topics...` and `GET /sub-topics/curated...`
pub struct TopicsService<T: ?Sized> {
    transport: Arc<T>,
}

impl<T: ?Sized> Clone for TopicsService<T> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
        }
    }
}

impl<T: Transport + ?Sized> TopicsService<T> {
    /// Create the service over a shared transport
    pub fn new(transport: Arc<T>) -> Self {
        Self { transport }
    }

    /// `GET /main-topics?page&size&is_active&search`
    pub async fn main_topics(&self, query: MainTopicQuery) -> ApiResult<Page<MainTopic>> {
        call(&*self.transport, query.into_request()).await
    }

    /// `GET /main-topics/{id}`
    pub async fn main_topic(&self, id: i64) -> ApiResult<MainTopic> {
        call(&*self.transport, ApiRequest::get(format!("/main-topics/{id}"))).await
    }

    /// `GET /sub-topics/curated?page&size`
    pub async fn curated_sub_topics(
        &self,
        page: u32,
        size: u32,
    ) -> ApiResult<Page<CuratedSubTopic>> {
        let request = ApiRequest::get("/sub-topics/curated")
            .with_query("page", page)
            .with_query("size", size);
        call(&*self.transport, request).await
    }

    /// `GET /sub-topics/curated/by-level/{code}`
    pub async fn curated_by_level(&self, level_code: &str) -> ApiResult<Vec<CuratedSubTopic>> {
        let path = format!("/sub-topics/curated/by-level/{}", segment(level_code));
        let request = ApiRequest::get(path);
        call(&*self.transport, request).await
    }

    /// `GET /sub-topics/curated/by-main-topic/{id}`
    pub async fn curated_by_main_topic(
        &self,
        main_topic_id: i64,
    ) -> ApiResult<Vec<CuratedSubTopic>> {
        let request = ApiRequest::get(format!("/sub-topics/curated/by-main-topic/{main_topic_id}"));
        call(&*self.transport, request).await
    }

    /// `GET /sub-topics/curated/popular/{code}?limit=N`
    pub async fn popular(&self, level_code: &str, limit: u32) -> ApiResult<Vec<CuratedSubTopic>> {
        let path = format!("/sub-topics/curated/popular/{}", segment(level_code));
        let request = ApiRequest::get(path).with_query("limit", limit);
        call(&*self.transport, request).await
    }

    /// `POST /main-topics/{id}/sub-topics/generate`
    pub async fn generate_sub_topic(
        &self,
        main_topic_id: i64,
        request: &GenerateSubTopicRequest,
    ) -> ApiResult<SubTopic> {
        let request = ApiRequest::post(format!("/main-topics/{main_topic_id}/sub-topics/generate"))
            .with_body(request);
        call(&*self.transport, request).await
    }
}
