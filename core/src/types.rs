//! Domain Types
//!
//! Records returned by the learning API. The backend owns all of them; the
//! client only holds short-lived read-only copies per view. Optional fields
//! default when absent so older and newer payload shapes both decode.

use serde::{Deserialize, Serialize};

// ============================================================================
// Levels
// ============================================================================

/// A difficulty tier (beginner, intermediate, expert, ...)
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Level {
    /// Numeric id, when the backend exposes one
    #[serde(default)]
    pub id: Option<i64>,
    /// Stable level code used in routes and requests
    pub code: String,
    /// Display name
    pub name: String,
    /// Longer description
    #[serde(default)]
    pub description: String,
    /// Who this level is aimed at
    #[serde(default)]
    pub target_audience: Option<String>,
    /// Ordinal rank (1 = easiest)
    #[serde(default)]
    pub order: u32,
    /// Short bullet characteristics
    #[serde(default)]
    pub characteristics: Vec<String>,
    /// Number of main topics available at this level
    #[serde(default)]
    pub main_topics_count: Option<u32>,
    /// Number of curated sub-topics available at this level
    #[serde(default)]
    pub curated_sub_topics_count: Option<u32>,
    /// Suggested weekly study time
    #[serde(default)]
    pub estimated_hours_per_week: Option<f32>,
}

impl Level {
    /// Minimal level with only code and name, mostly for tests and fixtures
    pub fn new(code: impl Into<String>, name: impl Into<String>, order: u32) -> Self {
        Self {
            id: None,
            code: code.into(),
            name: name.into(),
            description: String::new(),
            target_audience: None,
            order,
            characteristics: Vec::new(),
            main_topics_count: None,
            curated_sub_topics_count: None,
            estimated_hours_per_week: None,
        }
    }
}

/// Find the level whose code matches, if it is in the fetched list
#[must_use]
pub fn find_level<'a>(levels: &'a [Level], code: &str) -> Option<&'a Level> {
    levels.iter().find(|l| l.code == code)
}

// ============================================================================
// Topics
// ============================================================================

/// Top-level subject category
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MainTopic {
    /// Topic id
    pub id: i64,
    /// Display title
    pub title: String,
    /// Optional description
    #[serde(default)]
    pub description: Option<String>,
    /// Whether the topic is offered
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl MainTopic {
    /// URL-friendly slug derived from the title
    ///
    /// Lowercase ASCII alphanumerics; every other run of characters collapses
    /// into a single `-`.
    #[must_use]
    pub fn slug(&self) -> String {
        let mut slug = String::with_capacity(self.title.len());
        let mut pending_dash = false;
        for c in self.title.chars() {
            if c.is_alphanumeric() {
                if pending_dash && !slug.is_empty() {
                    slug.push('-');
                }
                pending_dash = false;
                slug.extend(c.to_lowercase());
            } else {
                pending_dash = true;
            }
        }
        slug
    }
}

/// A narrower subject under a main topic, scoped to a level
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CuratedSubTopic {
    /// Sub-topic id
    pub id: i64,
    /// Display title
    pub title: String,
    /// Description
    #[serde(default)]
    pub description: String,
    /// Parent main topic
    #[serde(default)]
    pub main_topic_id: Option<i64>,
    /// Parent level (numeric id)
    #[serde(default)]
    pub level_id: Option<i64>,
    /// Parent level (code)
    #[serde(default)]
    pub level_code: Option<String>,
    /// Search keywords
    #[serde(default)]
    pub keywords: Vec<String>,
    /// Learning objectives
    #[serde(default)]
    pub learning_objectives: Vec<String>,
    /// Popularity score
    #[serde(default)]
    pub popularity_score: Option<f32>,
    /// Difficulty score (1-5)
    #[serde(default)]
    pub difficulty_score: Option<f32>,
    /// Estimated duration in minutes
    #[serde(default)]
    pub estimated_duration_minutes: Option<u32>,
}

impl CuratedSubTopic {
    /// Whether this sub-topic belongs to the given level
    ///
    /// Matches on level code first, then numeric id. A sub-topic that
    /// carries neither reference is treated as matching.
    #[must_use]
    pub fn matches_level(&self, level: &Level) -> bool {
        if let Some(code) = &self.level_code {
            return *code == level.code;
        }
        match (self.level_id, level.id) {
            (Some(sub), Some(lvl)) => sub == lvl,
            _ => true,
        }
    }

    /// Human label for the difficulty score
    #[must_use]
    pub fn difficulty_label(&self) -> &'static str {
        match self.difficulty_score {
            None => "unrated",
            Some(s) if s <= 0.0 => "unrated",
            Some(s) if s <= 2.0 => "easy",
            Some(s) if s <= 4.0 => "moderate",
            Some(_) => "hard",
        }
    }
}

/// Sub-topic returned by AI generation
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SubTopic {
    /// Sub-topic id
    pub sub_topic_id: i64,
    /// Name
    pub name: String,
    /// Description
    #[serde(default)]
    pub description: String,
    /// Where the sub-topic came from ("ai", "curated", ...)
    #[serde(default)]
    pub source_type: String,
}

impl From<SubTopic> for CuratedSubTopic {
    fn from(sub: SubTopic) -> Self {
        Self {
            id: sub.sub_topic_id,
            title: sub.name,
            description: sub.description,
            main_topic_id: None,
            level_id: None,
            level_code: None,
            keywords: Vec::new(),
            learning_objectives: Vec::new(),
            popularity_score: None,
            difficulty_score: None,
            estimated_duration_minutes: None,
        }
    }
}

// ============================================================================
// Learning Paths
// ============================================================================

/// An ordered bundle of curriculum items for a sub-topic
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LearningPath {
    /// Path id
    pub path_id: String,
    /// Title
    pub title: String,
    /// Description
    #[serde(default)]
    pub description: String,
    /// Number of curriculum items
    #[serde(default)]
    pub curriculum_count: u32,
    /// Estimated total hours
    #[serde(default)]
    pub estimated_hours: f32,
}

/// Learning path with its curriculum items embedded
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LearningPathDetail {
    /// Path id
    pub path_id: String,
    /// Title
    pub title: String,
    /// Description
    #[serde(default)]
    pub description: String,
    /// Items in sort order
    #[serde(default)]
    pub curriculum_items: Vec<CurriculumItem>,
}

impl From<LearningPathDetail> for LearningPath {
    fn from(detail: LearningPathDetail) -> Self {
        Self {
            path_id: detail.path_id,
            title: detail.title,
            description: detail.description,
            curriculum_count: u32::try_from(detail.curriculum_items.len()).unwrap_or(u32::MAX),
            estimated_hours: 0.0,
        }
    }
}

/// One unit of a learning path
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CurriculumItem {
    /// Item id
    pub curriculum_item_id: String,
    /// Title
    pub title: String,
    /// Position within the path
    #[serde(default)]
    pub sort_order: u32,
    /// Whether any article exists yet
    #[serde(default)]
    pub has_articles: Option<bool>,
}

/// Body of `POST /sub-topics/{id}/learning-paths/generate`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateLearningPathRequest {
    /// What the learner wants to achieve
    pub learning_objective: String,
    /// Level code
    pub difficulty: String,
    /// Number of curriculum items to produce
    pub item_count: u32,
}

/// Body of `POST /main-topics/{id}/sub-topics/generate`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GenerateSubTopicRequest {
    /// Free-form hint for the generator
    pub topic_hint: String,
}

// ============================================================================
// Articles
// ============================================================================

/// Generated readable content for a curriculum item at a given level
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Article {
    /// Article id
    pub article_id: String,
    /// Title
    pub title: String,
    /// Plain text body; each line is a paragraph
    pub body: String,
    /// Level this article was written for
    pub level_code: String,
    /// Curriculum item this article belongs to
    pub curriculum_item_id: String,
    /// Read flag, when the backend knows the reader
    #[serde(default)]
    pub is_read: Option<bool>,
}

impl Article {
    /// Paragraphs of the body (blank lines dropped)
    pub fn paragraphs(&self) -> impl Iterator<Item = &str> {
        self.body
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
    }

    /// Whether the backend has acknowledged this article as read
    #[must_use]
    pub fn is_read(&self) -> bool {
        self.is_read.unwrap_or(false)
    }
}

/// Article list entry
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ArticleSummary {
    /// Article id
    pub article_id: String,
    /// Level code
    pub level_code: String,
    /// Title
    pub title: String,
    /// Short preview of the body
    #[serde(default)]
    pub preview: String,
}

/// Reference to a neighbouring article
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ArticleNavigation {
    /// Article id
    pub article_id: String,
    /// Title
    pub title: String,
    /// Curriculum item the sibling belongs to
    pub curriculum_item_id: String,
    /// Level of the sibling
    pub level_code: String,
}

/// Body of `POST /curriculum-items/{id}/articles/generate`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GenerateArticleRequest {
    /// Level code
    pub level: String,
    /// Writing style ("concise", ...)
    pub content_style: String,
    /// Target length
    pub word_count: u32,
}

/// Acknowledgment of `POST /articles/{id}/read`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReadReceipt {
    /// Article id
    pub article_id: String,
    /// Server timestamp
    #[serde(default)]
    pub read_at: String,
}

// ============================================================================
// Progress
// ============================================================================

/// A user's reading progress
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Progress {
    /// Articles available
    pub total_articles: u32,
    /// Articles read
    pub read_articles: u32,
    /// Percentage (0-100)
    pub progress_percentage: f32,
    /// Article the user is currently on
    #[serde(default)]
    pub current_article: Option<CurrentArticle>,
}

/// Pointer to the article a user is currently reading
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CurrentArticle {
    /// Article id
    pub article_id: String,
    /// Title
    pub title: String,
}

// ============================================================================
// Pagination
// ============================================================================

/// Pagination envelope used by list endpoints
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    /// Items on this page
    pub items: Vec<T>,
    /// Total number of items
    #[serde(default)]
    pub total: u64,
    /// Current page (1-based)
    #[serde(default = "default_page")]
    pub page: u32,
    /// Page size
    #[serde(default)]
    pub size: u32,
    /// Number of pages
    #[serde(default = "default_page")]
    pub pages: u32,
    /// Whether a next page exists
    #[serde(default)]
    pub has_next: bool,
    /// Whether a previous page exists
    #[serde(default)]
    pub has_prev: bool,
}

impl<T> Page<T> {
    /// Single page holding all given items
    pub fn single(items: Vec<T>) -> Self {
        let len = items.len();
        Self {
            items,
            total: len as u64,
            page: 1,
            size: u32::try_from(len).unwrap_or(u32::MAX),
            pages: 1,
            has_next: false,
            has_prev: false,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_page() -> u32 {
    1
}
