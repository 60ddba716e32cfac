//! App Integration Tests
//!
//! Drive the [`App`] with key presses against an [`InMemoryTransport`]
//! backend, then check controller state, the rendered frame and the
//! headless summary.
//!
//! # Test Coverage
//!
//! 1. **Keyboard flow**: wizard to curriculum to reader with only keys
//! 2. **Search prompt**: captures keys, submits a topic search
//! 3. **Rendering**: frames drawn on a `TestBackend`
//! 4. **Summary**: `--headless` output for a curriculum route

use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use pretty_assertions::assert_eq;
use ratatui::backend::TestBackend;
use ratatui::Terminal;

use infou_core::types::Page as ResultPage;
use infou_core::{
    Article, ArticleNavigation, ArticleStatus, Controller, ControllerOptions, CurriculumItem,
    CuratedSubTopic, InMemoryTransport, LearningPath, LearningPathDetail, Level, MainTopic, Method,
    PersistedSelection, Route, SelectionStore, Services, StepId,
};
use infou_tui::keymap::KeyContext;
use infou_tui::summary::summarize;
use infou_tui::App;

// ============================================================================
// Fixtures
// ============================================================================

fn sub_topic(id: i64, title: &str) -> CuratedSubTopic {
    CuratedSubTopic {
        id,
        title: title.to_string(),
        description: String::new(),
        main_topic_id: Some(7),
        level_id: None,
        level_code: Some("intermediate".to_string()),
        keywords: Vec::new(),
        learning_objectives: Vec::new(),
        popularity_score: None,
        difficulty_score: None,
        estimated_duration_minutes: None,
    }
}

fn item(id: &str, title: &str, sort_order: u32) -> CurriculumItem {
    CurriculumItem {
        curriculum_item_id: id.to_string(),
        title: title.to_string(),
        sort_order,
        has_articles: Some(true),
    }
}

fn backend() -> Arc<InMemoryTransport> {
    let levels = vec![
        Level::new("beginner", "Beginner", 1),
        Level::new("intermediate", "Intermediate", 2),
        Level::new("advanced", "Advanced", 3),
    ];
    let article = Article {
        article_id: "a1".to_string(),
        title: "Moving Values".to_string(),
        body: "Values move by default.\n\nBorrow to avoid moves.".to_string(),
        level_code: "intermediate".to_string(),
        curriculum_item_id: "c1".to_string(),
        is_read: Some(false),
    };
    let t = InMemoryTransport::new();
    t.respond(Method::Get, "/levels", levels.clone())
        .respond(Method::Get, "/levels/with-stats", levels)
        .respond(
            Method::Get,
            "/main-topics",
            ResultPage::single(vec![MainTopic {
                id: 7,
                title: "Programming".to_string(),
                description: None,
                is_active: true,
            }]),
        )
        .respond(
            Method::Get,
            "/sub-topics/curated/popular/intermediate",
            vec![sub_topic(42, "Rust Basics")],
        )
        .respond(
            Method::Get,
            "/sub-topics/42/learning-paths",
            vec![LearningPath {
                path_id: "p1".to_string(),
                title: "Ownership in Practice".to_string(),
                description: String::new(),
                curriculum_count: 2,
                estimated_hours: 3.0,
            }],
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
            article.clone(),
        )
        .respond(Method::Get, "/articles/a1", article)
        .respond(
            Method::Get,
            "/articles/a1/next",
            ArticleNavigation {
                article_id: "a2".to_string(),
                title: "Borrowing Rules".to_string(),
                curriculum_item_id: "c2".to_string(),
                level_code: "intermediate".to_string(),
            },
        )
        .respond(Method::Get, "/articles/a1/previous", None::<ArticleNavigation>);
    Arc::new(t)
}

fn app(transport: Arc<InMemoryTransport>, route: Route) -> App<InMemoryTransport> {
    let mut controller = Controller::new(
        Services::new(transport, None),
        ControllerOptions::default(),
        PersistedSelection::default(),
        SelectionStore::disabled(),
    );
    controller.start(route);
    App::new(controller)
}

fn press(app: &mut App<InMemoryTransport>, code: KeyCode) {
    app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
}

fn type_text(app: &mut App<InMemoryTransport>, text: &str) {
    for c in text.chars() {
        press(app, KeyCode::Char(c));
    }
}

fn step(app: &App<InMemoryTransport>) -> StepId {
    app.controller().store().wizard.machine().step()
}

fn screen(app: &mut App<InMemoryTransport>) -> String {
    let mut terminal = Terminal::new(TestBackend::new(80, 24)).expect("test terminal");
    terminal.draw(|frame| app.draw(frame)).expect("draw");
    let buffer = terminal.backend().buffer();
    let width = buffer.area.width as usize;
    buffer
        .content()
        .chunks(width)
        .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Drive the wizard to the topic step by keyboard
async fn to_topic_step(app: &mut App<InMemoryTransport>) {
    app.settle().await;
    press(app, KeyCode::Enter);
    app.settle().await;
    assert_eq!(step(app), StepId::Level);

    press(app, KeyCode::Down);
    press(app, KeyCode::Enter);
    app.settle().await;
    assert_eq!(step(app), StepId::Topic);
}

// ============================================================================
// Keyboard flow
// ============================================================================

#[tokio::test]
async fn test_keyboard_flow_reaches_reader() {
    let mut app = app(backend(), Route::Home);
    to_topic_step(&mut app).await;

    // First row is the popular sub-topic
    press(&mut app, KeyCode::Enter);
    app.settle().await;
    assert_eq!(step(&app), StepId::LearningPath);

    press(&mut app, KeyCode::Enter);
    app.settle().await;
    assert_eq!(step(&app), StepId::Summary);

    press(&mut app, KeyCode::Enter);
    app.settle().await;
    assert_eq!(
        app.controller().route(),
        &Route::Curriculum {
            path_id: "p1".to_string(),
            level: Some("intermediate".to_string()),
        }
    );
    assert_eq!(app.context(), KeyContext::Curriculum);

    // Items are sorted, so the first row is c1
    press(&mut app, KeyCode::Enter);
    app.settle().await;
    assert_eq!(
        app.controller().route(),
        &Route::ReadCurriculumItem {
            item_id: "c1".to_string(),
            level: Some("intermediate".to_string()),
        }
    );
    assert_eq!(app.context(), KeyContext::Reader);
    assert_eq!(app.controller().store().article.status(), &ArticleStatus::Ready);

    let text = screen(&mut app);
    assert!(text.contains("Moving Values"), "reader frame:\n{text}");
    assert!(text.contains("Values move by default."));

    // Esc walks history back to the curriculum
    press(&mut app, KeyCode::Esc);
    app.settle().await;
    assert_eq!(app.context(), KeyContext::Curriculum);
}

#[tokio::test]
async fn test_quit_key() {
    let mut app = app(backend(), Route::Home);
    assert!(app.is_running());
    press(&mut app, KeyCode::Char('q'));
    assert!(!app.is_running());
}

// ============================================================================
// Search prompt
// ============================================================================

#[tokio::test]
async fn test_search_only_opens_on_topic_step() {
    let mut app = app(backend(), Route::Home);
    app.settle().await;
    press(&mut app, KeyCode::Char('/'));
    assert_eq!(app.search(), None);
    assert_eq!(app.context(), KeyContext::Home);
}

#[tokio::test]
async fn test_search_prompt_captures_keys_and_submits() {
    let transport = backend();
    let mut app = app(transport.clone(), Route::Home);
    to_topic_step(&mut app).await;

    press(&mut app, KeyCode::Char('/'));
    assert_eq!(app.context(), KeyContext::Search);

    // `q` is text here, not quit
    type_text(&mut app, "rusq");
    press(&mut app, KeyCode::Backspace);
    type_text(&mut app, "t");
    assert!(app.is_running());
    assert_eq!(app.search(), Some("rust"));

    let text = screen(&mut app);
    assert!(text.contains("rust"), "search frame:\n{text}");

    press(&mut app, KeyCode::Enter);
    app.settle().await;
    assert_eq!(app.search(), None);
    assert_eq!(app.context(), KeyContext::Home);

    let request = transport
        .last(Method::Get, "/main-topics")
        .expect("main topics fetched");
    assert!(request
        .query
        .contains(&("search".to_string(), "rust".to_string())));
}

#[tokio::test]
async fn test_search_cancel_keeps_topics() {
    let transport = backend();
    let mut app = app(transport.clone(), Route::Home);
    to_topic_step(&mut app).await;
    let before = transport.count(Method::Get, "/main-topics");

    press(&mut app, KeyCode::Char('/'));
    type_text(&mut app, "xyz");
    press(&mut app, KeyCode::Esc);
    app.settle().await;

    assert_eq!(app.search(), None);
    assert_eq!(transport.count(Method::Get, "/main-topics"), before);
    assert_eq!(step(&app), StepId::Topic);
}

// ============================================================================
// Rendering
// ============================================================================

#[tokio::test]
async fn test_level_step_frame() {
    let mut app = app(backend(), Route::Home);
    app.settle().await;
    press(&mut app, KeyCode::Enter);
    app.settle().await;

    let text = screen(&mut app);
    assert!(text.contains("InfoU"));
    assert!(text.contains("Start learning"));
    for name in ["Beginner", "Intermediate", "Advanced"] {
        assert!(text.contains(name), "missing {name} in:\n{text}");
    }
}

#[tokio::test]
async fn test_curriculum_frame_lists_items_in_order() {
    let route = Route::Curriculum {
        path_id: "p1".to_string(),
        level: Some("intermediate".to_string()),
    };
    let mut app = app(backend(), route);
    app.settle().await;

    let text = screen(&mut app);
    let moves = text.find("Moves").expect("first item drawn");
    let borrowing = text.find("Borrowing").expect("second item drawn");
    assert!(moves < borrowing);
}

// ============================================================================
// Summary
// ============================================================================

#[tokio::test]
async fn test_headless_summary_for_curriculum() {
    let route = Route::Curriculum {
        path_id: "p1".to_string(),
        level: Some("intermediate".to_string()),
    };
    let mut app = app(backend(), route);
    app.settle().await;

    let c = app.controller();
    let summary = summarize(c.route(), c.page(), c.store());
    assert!(summary.contains("route: /curriculum/p1?level=intermediate"), "{summary}");
    assert!(summary.contains("level: intermediate"));
    assert!(summary.contains("item: 1 c1 Moves"));
    assert!(summary.contains("item: 2 c2 Borrowing"));
}

#[tokio::test]
async fn test_headless_summary_for_article() {
    let mut app = app(backend(), Route::Article { id: "a1".to_string() });
    app.settle().await;

    let c = app.controller();
    let summary = summarize(c.route(), c.page(), c.store());
    assert!(summary.contains("article: ready"), "{summary}");
    assert!(summary.contains("title: Moving Values"));
    assert!(summary.contains("next: a2"));
    assert!(!summary.contains("previous:"));
}
