//! Articles service
//!
//! Article lookup, AI generation, sibling navigation, read receipts and
//! user progress. Endpoints that identify the reader carry the configured
//! bearer token when there is one.

use std::sync::Arc;

use crate::api::{call, ApiRequest, ApiResult, Transport};
use crate::types::{
    Article, ArticleNavigation, ArticleSummary, GenerateArticleRequest, Progress, ReadReceipt,
};

use super::segment;

/// `GET /articles...`, `GET /curriculum-items/{id}/articles...`, `GET /users/{id}/progress`
pub struct ArticlesService<T: ?Sized> {
    transport: Arc<T>,
    auth_token: Option<String>,
}

impl<T: ?Sized> Clone for ArticlesService<T> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            auth_token: self.auth_token.clone(),
        }
    }
}

impl<T: Transport + ?Sized> ArticlesService<T> {
    /// Create the service over a shared transport
    pub fn new(transport: Arc<T>, auth_token: Option<String>) -> Self {
        Self {
            transport,
            auth_token,
        }
    }

    /// `GET /curriculum-items/{id}/articles?level`
    pub async fn for_curriculum_item(
        &self,
        curriculum_item_id: &str,
        level: Option<&str>,
    ) -> ApiResult<Vec<ArticleSummary>> {
        let path = format!("/curriculum-items/{}/articles", segment(curriculum_item_id));
        let request = ApiRequest::get(path).with_optional_query("level", level);
        call(&*self.transport, request).await
    }

    /// `GET /curriculum-items/{id}/articles/{level}`
    pub async fn for_item_and_level(
        &self,
        curriculum_item_id: &str,
        level: &str,
    ) -> ApiResult<Article> {
        let path = format!(
            "/curriculum-items/{}/articles/{}",
            segment(curriculum_item_id),
            segment(level)
        );
        let request = ApiRequest::get(path);
        call(&*self.transport, request).await
    }

    /// `POST /curriculum-items/{id}/articles/generate`
    pub async fn generate(
        &self,
        curriculum_item_id: &str,
        request: &GenerateArticleRequest,
    ) -> ApiResult<Article> {
        let path = format!("/curriculum-items/{}/articles/generate", segment(curriculum_item_id));
        let request = ApiRequest::post(path).with_body(request);
        call(&*self.transport, request).await
    }

    /// `GET /articles/{id}`
    pub async fn get(&self, article_id: &str) -> ApiResult<Article> {
        let request = ApiRequest::get(format!("/articles/{}", segment(article_id)))
            .with_bearer(self.auth_token.as_deref());
        call(&*self.transport, request).await
    }

    /// `GET /articles/{id}/next?level`
    ///
    /// `None` when the backend answers `null` (no next article).
    pub async fn next(
        &self,
        article_id: &str,
        level: Option<&str>,
    ) -> ApiResult<Option<ArticleNavigation>> {
        let request = ApiRequest::get(format!("/articles/{}/next", segment(article_id)))
            .with_optional_query("level", level);
        call(&*self.transport, request).await
    }

    /// `GET /articles/{id}/previous?level`
    pub async fn previous(
        &self,
        article_id: &str,
        level: Option<&str>,
    ) -> ApiResult<Option<ArticleNavigation>> {
        let request = ApiRequest::get(format!("/articles/{}/previous", segment(article_id)))
            .with_optional_query("level", level);
        call(&*self.transport, request).await
    }

    /// `POST /articles/{id}/read`
    pub async fn mark_read(&self, article_id: &str) -> ApiResult<ReadReceipt> {
        let request = ApiRequest::post(format!("/articles/{}/read", segment(article_id)))
            .with_bearer(self.auth_token.as_deref());
        call(&*self.transport, request).await
    }

    /// `GET /users/{id}/progress?sub_topic_id`
    pub async fn user_progress(
        &self,
        user_id: &str,
        sub_topic_id: Option<i64>,
    ) -> ApiResult<Progress> {
        let request = ApiRequest::get(format!("/users/{}/progress", segment(user_id)))
            .with_optional_query("sub_topic_id", sub_topic_id)
            .with_bearer(self.auth_token.as_deref());
        call(&*self.transport, request).await
    }
}
