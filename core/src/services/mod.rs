//! Domain Services
//!
//! One async function per remote operation. Each service builds the request
//! for a fixed path template, runs it through the shared [`Transport`] and
//! returns the typed payload unchanged. Errors are propagated as the
//! transport classified them. No caching, no retries.

mod articles;
mod learning_paths;
mod levels;
mod topics;

use std::sync::Arc;

pub use articles::ArticlesService;
pub use learning_paths::LearningPathsService;
pub use levels::LevelsService;
pub use topics::{MainTopicQuery, TopicsService};

use crate::api::Transport;

/// Percent-encode one path segment; ids may contain `/` or spaces
fn segment(raw: &str) -> std::borrow::Cow<'_, str> {
    urlencoding::encode(raw)
}

/// All services over one shared transport
pub struct Services<T: ?Sized> {
    /// Levels
    pub levels: LevelsService<T>,
    /// Main topics and curated sub-topics
    pub topics: TopicsService<T>,
    /// Learning paths
    pub learning_paths: LearningPathsService<T>,
    /// Articles and progress
    pub articles: ArticlesService<T>,
}

impl<T: ?Sized> Clone for Services<T> {
    fn clone(&self) -> Self {
        Self {
            levels: self.levels.clone(),
            topics: self.topics.clone(),
            learning_paths: self.learning_paths.clone(),
            articles: self.articles.clone(),
        }
    }
}

impl<T: Transport + ?Sized> Services<T> {
    /// Bundle every service over `transport`
    pub fn new(transport: Arc<T>, auth_token: Option<String>) -> Self {
        Self {
            levels: LevelsService::new(Arc::clone(&transport)),
            topics: TopicsService::new(Arc::clone(&transport)),
            learning_paths: LearningPathsService::new(Arc::clone(&transport)),
            articles: ArticlesService::new(transport, auth_token),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use crate::api::{ErrorKind, InMemoryTransport, Method};
    use crate::types::{
        GenerateArticleRequest, GenerateLearningPathRequest, GenerateSubTopicRequest,
    };

    fn services() -> (Arc<InMemoryTransport>, Services<InMemoryTransport>) {
        let transport = Arc::new(InMemoryTransport::new());
        let services = Services::new(Arc::clone(&transport), Some("tok".to_string()));
        (transport, services)
    }

    #[tokio::test]
    async fn test_levels_with_stats() {
        let (transport, services) = services();
        transport.respond(
            Method::Get,
            "/levels/with-stats",
            json!([{"code": "beginner", "name": "Beginner", "order": 1, "main_topics_count": 4}]),
        );

        let levels = services.levels.list_with_stats().await.unwrap();
        assert_eq!(levels.len(), 1);
        assert_eq!(levels[0].main_topics_count, Some(4));
    }

    #[tokio::test]
    async fn test_main_topics_query_string() {
        let (transport, services) = services();
        transport.respond(Method::Get, "/main-topics", json!({"items": [], "total": 0}));

        let query = MainTopicQuery {
            page: 2,
            search: Some("neural".to_string()),
            ..MainTopicQuery::default()
        };
        let page = services.topics.main_topics(query).await.unwrap();
        assert!(page.items.is_empty());

        let request = transport.last(Method::Get, "/main-topics").unwrap();
        assert_eq!(request.query_value("page"), Some("2"));
        assert_eq!(request.query_value("size"), Some("20"));
        assert_eq!(request.query_value("search"), Some("neural"));
        assert_eq!(request.query_value("is_active"), None);
    }

    #[tokio::test]
    async fn test_blank_search_is_not_sent() {
        let (transport, services) = services();
        transport.respond(Method::Get, "/main-topics", json!({"items": []}));

        let query = MainTopicQuery {
            search: Some("  ".to_string()),
            ..MainTopicQuery::default()
        };
        services.topics.main_topics(query).await.unwrap();
        let request = transport.last(Method::Get, "/main-topics").unwrap();
        assert_eq!(request.query_value("search"), None);
    }

    #[tokio::test]
    async fn test_popular_sends_limit() {
        let (transport, services) = services();
        transport.respond(Method::Get, "/sub-topics/curated/popular/beginner", json!([]));

        services.topics.popular("beginner", 6).await.unwrap();
        let request = transport
            .last(Method::Get, "/sub-topics/curated/popular/beginner")
            .unwrap();
        assert_eq!(request.query_value("limit"), Some("6"));
    }

    #[tokio::test]
    async fn test_generate_learning_path_body() {
        let (transport, services) = services();
        transport.respond(
            Method::Post,
            "/sub-topics/42/learning-paths/generate",
            json!({"path_id": "p9", "title": "Generated", "curriculum_items": []}),
        );

        let request = GenerateLearningPathRequest {
            learning_objective: "Attention".to_string(),
            difficulty: "intermediate".to_string(),
            item_count: 5,
        };
        let detail = services.learning_paths.generate(42, &request).await.unwrap();
        assert_eq!(detail.path_id, "p9");

        let sent = transport
            .last(Method::Post, "/sub-topics/42/learning-paths/generate")
            .unwrap();
        assert_eq!(
            sent.body,
            Some(json!({"learning_objective": "Attention", "difficulty": "intermediate", "item_count": 5}))
        );
    }

    #[tokio::test]
    async fn test_article_generate_body() {
        let (transport, services) = services();
        transport.respond(
            Method::Post,
            "/curriculum-items/c1/articles/generate",
            json!({"article_id": "a1", "title": "T", "body": "x", "level_code": "beginner", "curriculum_item_id": "c1"}),
        );

        let request = GenerateArticleRequest {
            level: "beginner".to_string(),
            content_style: "concise".to_string(),
            word_count: 300,
        };
        services.articles.generate("c1", &request).await.unwrap();

        let sent = transport
            .last(Method::Post, "/curriculum-items/c1/articles/generate")
            .unwrap();
        assert_eq!(
            sent.body,
            Some(json!({"level": "beginner", "content_style": "concise", "word_count": 300}))
        );
    }

    #[tokio::test]
    async fn test_next_null_is_none() {
        let (transport, services) = services();
        transport.respond(Method::Get, "/articles/a1/next", serde_json::Value::Null);

        let next = services.articles.next("a1", Some("beginner")).await.unwrap();
        assert_eq!(next, None);
        let request = transport.last(Method::Get, "/articles/a1/next").unwrap();
        assert_eq!(request.query_value("level"), Some("beginner"));
    }

    #[tokio::test]
    async fn test_mark_read_carries_bearer() {
        let (transport, services) = services();
        transport.respond(Method::Post, "/articles/a1/read", json!({"article_id": "a1"}));

        let receipt = services.articles.mark_read("a1").await.unwrap();
        assert_eq!(receipt.article_id, "a1");
        let request = transport.last(Method::Post, "/articles/a1/read").unwrap();
        assert_eq!(request.headers[0].1, "Bearer tok");
    }

    #[tokio::test]
    async fn test_errors_pass_through_unchanged() {
        let (transport, services) = services();
        transport.fail(Method::Get, "/learning-paths/p1", ErrorKind::Forbidden);

        let err = services.learning_paths.detail("p1").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Forbidden);
        assert_eq!(err.message, "You do not have permission to access this.");
    }
    #[tokio::test]
    async fn test_path_templates() {
        let (transport, services) = services();
        // Nothing is registered; only the issued requests matter here
        let _ = services.levels.get("advanced").await;
        let _ = services.topics.main_topic(7).await;
        let _ = services.topics.curated_sub_topics(2, 10).await;
        let _ = services.topics.curated_by_level("beginner").await;
        let _ = services.topics.curated_by_main_topic(7).await;
        let hint = GenerateSubTopicRequest {
            topic_hint: "async".to_string(),
        };
        let _ = services.topics.generate_sub_topic(7, &hint).await;
        let _ = services.learning_paths.for_sub_topic(42).await;
        let _ = services.learning_paths.curriculum_items("p1").await;
        let _ = services.articles.for_curriculum_item("c1", None).await;
        let _ = services.articles.for_item_and_level("c1", "advanced").await;
        let _ = services.articles.get("a1").await;
        let _ = services.articles.previous("a1", None).await;
        let _ = services.articles.user_progress("u1", Some(42)).await;

        let issued: Vec<(Method, String)> = transport
            .requests()
            .into_iter()
            .map(|r| (r.method, r.path))
            .collect();
        let expected = [
            (Method::Get, "/levels/advanced"),
            (Method::Get, "/main-topics/7"),
            (Method::Get, "/sub-topics/curated"),
            (Method::Get, "/sub-topics/curated/by-level/beginner"),
            (Method::Get, "/sub-topics/curated/by-main-topic/7"),
            (Method::Post, "/main-topics/7/sub-topics/generate"),
            (Method::Get, "/sub-topics/42/learning-paths"),
            (Method::Get, "/learning-paths/p1/curriculum-items"),
            (Method::Get, "/curriculum-items/c1/articles"),
            (Method::Get, "/curriculum-items/c1/articles/advanced"),
            (Method::Get, "/articles/a1"),
            (Method::Get, "/articles/a1/previous"),
            (Method::Get, "/users/u1/progress"),
        ]
        .map(|(m, p)| (m, p.to_string()))
        .to_vec();
        assert_eq!(issued, expected);

        let progress = transport.last(Method::Get, "/users/u1/progress").unwrap();
        assert_eq!(progress.query_value("sub_topic_id"), Some("42"));
        let curated = transport.last(Method::Get, "/sub-topics/curated").unwrap();
        assert_eq!(curated.query_value("page"), Some("2"));
    }

    #[tokio::test]
    async fn test_path_segments_are_encoded() {
        let (transport, services) = services();
        let _ = services.articles.get("guides/intro").await;
        let _ = services.articles.for_item_and_level("c 1", "beginner").await;
        let _ = services.learning_paths.curriculum_items("p?1").await;

        let paths: Vec<String> = transport.requests().into_iter().map(|r| r.path).collect();
        assert_eq!(
            paths,
            vec![
                "/articles/guides%2Fintro".to_string(),
                "/curriculum-items/c%201/articles/beginner".to_string(),
                "/learning-paths/p%3F1/curriculum-items".to_string(),
            ]
        );
    }
}
