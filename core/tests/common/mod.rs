//! Shared fixtures for the controller integration tests
//!
//! The catalogue mirrors a small backend: three levels, two main topics,
//! a handful of curated sub-topics, one learning path with two items and
//! one article.

#![allow(dead_code)]

use std::sync::Arc;

use infou_core::{
    Article, ArticleNavigation, Controller, ControllerOptions, CuratedSubTopic, CurriculumItem,
    HomePage, InMemoryTransport, LearningPath, LearningPathDetail, Level, MainTopic, Method, Page,
    PersistedSelection, SelectionStore, Services,
};

pub fn levels() -> Vec<Level> {
    // Out of order on purpose; selectors sort by `order`
    vec![
        Level::new("intermediate", "Intermediate", 2),
        Level::new("beginner", "Beginner", 1),
        Level::new("advanced", "Advanced", 3),
    ]
}

pub fn level(code: &str) -> Level {
    levels()
        .into_iter()
        .find(|l| l.code == code)
        .expect("fixture level")
}

pub fn main_topic(id: i64, title: &str) -> MainTopic {
    MainTopic {
        id,
        title: title.to_string(),
        description: None,
        is_active: true,
    }
}

pub fn sub_topic(id: i64, title: &str, level_code: &str) -> CuratedSubTopic {
    CuratedSubTopic {
        id,
        title: title.to_string(),
        description: String::new(),
        main_topic_id: Some(7),
        level_id: None,
        level_code: Some(level_code.to_string()),
        keywords: Vec::new(),
        learning_objectives: Vec::new(),
        popularity_score: None,
        difficulty_score: Some(2.5),
        estimated_duration_minutes: Some(45),
    }
}

pub fn path(id: &str, title: &str) -> LearningPath {
    LearningPath {
        path_id: id.to_string(),
        title: title.to_string(),
        description: String::new(),
        curriculum_count: 2,
        estimated_hours: 3.0,
    }
}

pub fn item(id: &str, title: &str, sort_order: u32) -> CurriculumItem {
    CurriculumItem {
        curriculum_item_id: id.to_string(),
        title: title.to_string(),
        sort_order,
        has_articles: Some(true),
    }
}

pub fn article(id: &str, item_id: &str, level_code: &str) -> Article {
    Article {
        article_id: id.to_string(),
        title: format!("Article {id}"),
        body: "First paragraph.\n\nSecond paragraph.".to_string(),
        level_code: level_code.to_string(),
        curriculum_item_id: item_id.to_string(),
        is_read: Some(false),
    }
}

pub fn nav(id: &str, item_id: &str, level_code: &str) -> ArticleNavigation {
    ArticleNavigation {
        article_id: id.to_string(),
        title: format!("Article {id}"),
        curriculum_item_id: item_id.to_string(),
        level_code: level_code.to_string(),
    }
}

/// Backend with the whole fixture catalogue registered
pub fn backend() -> Arc<InMemoryTransport> {
    let t = InMemoryTransport::new();
    t.respond(Method::Get, "/levels", levels())
        .respond(Method::Get, "/levels/with-stats", levels())
        .respond(
            Method::Get,
            "/main-topics",
            infou_core::types::Page::single(vec![
                main_topic(7, "Programming"),
                main_topic(8, "Design"),
            ]),
        )
        .respond(
            Method::Get,
            "/sub-topics/curated/popular/intermediate",
            vec![sub_topic(42, "Rust Basics", "intermediate")],
        )
        .respond(
            Method::Get,
            "/sub-topics/curated/by-main-topic/7",
            vec![
                sub_topic(42, "Rust Basics", "intermediate"),
                sub_topic(43, "Hello World", "beginner"),
            ],
        )
        .respond(
            Method::Get,
            "/sub-topics/42/learning-paths",
            vec![path("p1", "Ownership in Practice")],
        )
        .respond(
            Method::Get,
            "/learning-paths/p1/curriculum-items",
            vec![item("c2", "Borrowing", 2), item("c1", "Moves", 1)],
        )
        .respond(
            Method::Get,
            "/learning-paths/p1",
            LearningPathDetail {
                path_id: "p1".to_string(),
                title: "Ownership in Practice".to_string(),
                description: String::new(),
                curriculum_items: vec![item("c2", "Borrowing", 2), item("c1", "Moves", 1)],
            },
        )
        .respond(
            Method::Get,
            "/curriculum-items/c1/articles/intermediate",
            article("a1", "c1", "intermediate"),
        )
        .respond(Method::Get, "/articles/a1", article("a1", "c1", "intermediate"))
        .respond(
            Method::Get,
            "/articles/a1/next",
            nav("a2", "c2", "intermediate"),
        )
        .respond(Method::Get, "/articles/a1/previous", serde_json::Value::Null);
    Arc::new(t)
}

/// Controller over `transport` with defaults and nothing persisted
pub fn controller(transport: Arc<InMemoryTransport>) -> Controller<InMemoryTransport> {
    Controller::new(
        Services::new(transport, None),
        ControllerOptions::default(),
        PersistedSelection::default(),
        SelectionStore::disabled(),
    )
}

pub fn home(controller: &Controller<InMemoryTransport>) -> &HomePage {
    match controller.page() {
        Page::Home(home) => home,
        other => panic!("expected home page, got {}", other.name()),
    }
}
