//! Page State
//!
//! One struct per client route. Pages hold the data they fetched for the
//! current view and the decisions that depend only on that data; the
//! [`Controller`](crate::Controller) runs their fetches and routes user
//! events to them.

use crate::api::ApiError;
use crate::routes::Route;
use crate::selectors::{
    step_cursor, FetchSlot, LearningPathSelector, LevelSelector, Loadable, Ticket, TopicSelector,
};
use crate::store::{ArticleSource, PersistedSelection};
use crate::types::{find_level, CurriculumItem, LearningPathDetail, Level, Progress};

/// Toast shown when a curriculum item is opened before a level is chosen
pub const SELECT_LEVEL_FIRST: &str = "Please select a level first.";

/// Current page
#[derive(Debug)]
pub enum Page {
    /// Selection wizard
    Home(HomePage),
    /// Learning path overview
    Curriculum(CurriculumPage),
    /// Article reader
    Reader(ReaderPage),
    /// Reading progress
    Profile(ProfilePage),
}

impl Page {
    /// Short name for logs and headers
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Home(_) => "home",
            Self::Curriculum(_) => "curriculum",
            Self::Reader(_) => "reader",
            Self::Profile(_) => "profile",
        }
    }
}

// ============================================================================
// Home
// ============================================================================

/// Wizard page: one selector per selecting step
#[derive(Debug)]
pub struct HomePage {
    /// Level step
    pub levels: LevelSelector,
    /// Topic step
    pub topics: TopicSelector,
    /// Learning path step
    pub paths: LearningPathSelector,
}

impl HomePage {
    /// Page seeded with the preferences from the last run
    #[must_use]
    pub fn new(preferences: &PersistedSelection, learning_path_items: u32) -> Self {
        Self {
            levels: LevelSelector::new(preferences.level_code.clone()),
            topics: TopicSelector::new(preferences.topic_slug.clone()),
            paths: LearningPathSelector::new(learning_path_items),
        }
    }
}

// ============================================================================
// Curriculum
// ============================================================================

/// What the curriculum page needs, fetched together
#[derive(Clone, Debug, PartialEq)]
pub struct CurriculumData {
    /// Learning path with its items
    pub path: LearningPathDetail,
    /// Levels to choose from
    pub levels: Vec<Level>,
}

/// Learning path overview
#[derive(Debug)]
pub struct CurriculumPage {
    path_id: String,
    selected_level: Option<Level>,
    requested_level: Option<String>,
    data: FetchSlot<CurriculumData>,
    cursor: usize,
}

impl CurriculumPage {
    /// Page for `path_id`, preselecting `level` once levels are known
    #[must_use]
    pub fn new(path_id: impl Into<String>, level: Option<String>) -> Self {
        Self {
            path_id: path_id.into(),
            selected_level: None,
            requested_level: level,
            data: FetchSlot::default(),
            cursor: 0,
        }
    }

    /// Learning path id
    #[must_use]
    pub fn path_id(&self) -> &str {
        &self.path_id
    }

    /// Issue the combined fetch
    pub fn start(&mut self) -> Ticket {
        self.data.start()
    }

    /// Apply the combined completion
    ///
    /// The requested level is selected if the fetched list contains it,
    /// otherwise no level is selected.
    pub fn apply(&mut self, ticket: Ticket, result: Result<CurriculumData, ApiError>) -> bool {
        let result = result.map(|mut data| {
            data.path.curriculum_items.sort_by_key(|i| i.sort_order);
            data.levels.sort_by_key(|l| l.order);
            data
        });
        if let Err(e) = &result {
            tracing::warn!(path_id = %self.path_id, error = %e, "Failed to load curriculum");
        }
        if !self.data.finish(ticket, result) {
            return false;
        }
        self.selected_level = match (self.requested_level.as_deref(), self.data.value()) {
            (Some(code), Some(data)) => find_level(&data.levels, code).cloned(),
            _ => None,
        };
        true
    }

    /// Fetch state
    #[must_use]
    pub fn state(&self) -> &Loadable<CurriculumData> {
        self.data.state()
    }

    /// Curriculum items in order
    #[must_use]
    pub fn items(&self) -> &[CurriculumItem] {
        self.data.value().map_or(&[], |d| d.path.curriculum_items.as_slice())
    }

    /// Levels in order
    #[must_use]
    pub fn levels(&self) -> &[Level] {
        self.data.value().map_or(&[], |d| d.levels.as_slice())
    }

    /// Selected level
    #[must_use]
    pub fn selected_level(&self) -> Option<&Level> {
        self.selected_level.as_ref()
    }

    /// Route for reading `item_id` at the selected level
    ///
    /// # Errors
    ///
    /// Returns the prompt to show when no level is selected.
    pub fn open_item(&self, item_id: &str) -> Result<Route, &'static str> {
        let level = self.selected_level.as_ref().ok_or(SELECT_LEVEL_FIRST)?;
        Ok(Route::ReadCurriculumItem {
            item_id: item_id.to_string(),
            level: Some(level.code.clone()),
        })
    }

    /// Route for the highlighted item
    ///
    /// # Errors
    ///
    /// Same as [`CurriculumPage::open_item`]; `Ok(None)` when nothing is highlighted.
    pub fn open_highlighted(&self) -> Result<Option<Route>, &'static str> {
        match self.items().get(self.cursor) {
            Some(item) => self.open_item(&item.curriculum_item_id).map(Some),
            None => Ok(None),
        }
    }

    /// Select a level; returns the route with the new level parameter
    pub fn select_level(&mut self, level: Level) -> Route {
        let route = Route::Curriculum {
            path_id: self.path_id.clone(),
            level: Some(level.code.clone()),
        };
        self.requested_level = Some(level.code.clone());
        self.selected_level = Some(level);
        route
    }

    /// Select the level `delta` places away from the current one
    pub fn cycle_level(&mut self, delta: isize) -> Option<Route> {
        let level = cycle(self.levels(), self.selected_level.as_ref(), delta)?.clone();
        Some(self.select_level(level))
    }

    /// Move the item highlight
    pub fn move_cursor(&mut self, delta: isize) {
        self.cursor = step_cursor(self.cursor, delta, self.items().len());
    }

    /// Highlight position
    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }
}

// ============================================================================
// Reader
// ============================================================================

/// Article reader: the level chooser around the article slice
#[derive(Debug)]
pub struct ReaderPage {
    source: ArticleSource,
    requested_level: Option<String>,
    selected_level: Option<Level>,
    levels: FetchSlot<Vec<Level>>,
}

impl ReaderPage {
    /// Reader for `source` at `level`
    #[must_use]
    pub fn new(source: ArticleSource, level: Option<String>) -> Self {
        Self {
            source,
            requested_level: level,
            selected_level: None,
            levels: FetchSlot::default(),
        }
    }

    /// What is being read
    #[must_use]
    pub fn source(&self) -> &ArticleSource {
        &self.source
    }

    /// Issue the levels fetch
    pub fn start(&mut self) -> Ticket {
        self.levels.start()
    }

    /// Apply the levels completion
    ///
    /// Returns the level to read at when the requested code is known.
    pub fn apply_levels(
        &mut self,
        ticket: Ticket,
        result: Result<Vec<Level>, ApiError>,
    ) -> Option<Level> {
        let result = result.map(|mut levels| {
            levels.sort_by_key(|l| l.order);
            levels
        });
        if let Err(e) = &result {
            tracing::warn!(error = %e, "Failed to load levels for reader");
        }
        if !self.levels.finish(ticket, result) {
            return None;
        }
        let code = self.requested_level.as_deref()?;
        self.selected_level = find_level(self.levels(), code).cloned();
        self.selected_level.clone()
    }

    /// An article arrived; align the chooser with its level
    pub fn note_article_level(&mut self, code: &str) {
        if self.selected_level.as_ref().is_some_and(|l| l.code == code) {
            return;
        }
        self.requested_level = Some(code.to_string());
        if let Some(level) = find_level(self.levels(), code) {
            self.selected_level = Some(level.clone());
        }
    }

    /// Levels fetch state
    #[must_use]
    pub fn levels_state(&self) -> &Loadable<Vec<Level>> {
        self.levels.state()
    }

    /// Levels in order
    #[must_use]
    pub fn levels(&self) -> &[Level] {
        self.levels.value().map_or(&[], Vec::as_slice)
    }

    /// Selected level
    #[must_use]
    pub fn selected_level(&self) -> Option<&Level> {
        self.selected_level.as_ref()
    }

    /// Switch level
    ///
    /// Returns the route to replace the current one with, or `None` when the
    /// level is unchanged or the article's curriculum item is unknown.
    pub fn select_level(&mut self, level: Level, curriculum_item_id: Option<&str>) -> Option<Route> {
        if self.selected_level.as_ref().is_some_and(|l| l.code == level.code) {
            return None;
        }
        let item_id = match &self.source {
            ArticleSource::CurriculumItem(id) => id.clone(),
            ArticleSource::ArticleId(_) => curriculum_item_id?.to_string(),
        };
        self.source = ArticleSource::CurriculumItem(item_id.clone());
        self.requested_level = Some(level.code.clone());
        self.selected_level = Some(level.clone());
        Some(Route::ReadCurriculumItem {
            item_id,
            level: Some(level.code),
        })
    }

    /// Level `delta` places away from the selected one
    #[must_use]
    pub fn cycled_level(&self, delta: isize) -> Option<Level> {
        cycle(self.levels(), self.selected_level.as_ref(), delta).cloned()
    }
}

// ============================================================================
// Profile
// ============================================================================

/// Reading progress for the configured user
#[derive(Debug)]
pub struct ProfilePage {
    user_id: Option<String>,
    progress: FetchSlot<Progress>,
}

impl ProfilePage {
    /// Page for `user_id` (none configured shows a notice)
    #[must_use]
    pub fn new(user_id: Option<String>) -> Self {
        Self {
            user_id,
            progress: FetchSlot::default(),
        }
    }

    /// Configured user
    #[must_use]
    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    /// Issue the progress fetch, if there is a user
    pub fn start(&mut self) -> Option<(Ticket, String)> {
        let user = self.user_id.clone()?;
        Some((self.progress.start(), user))
    }

    /// Apply the progress completion
    pub fn apply(&mut self, ticket: Ticket, result: Result<Progress, ApiError>) -> bool {
        if let Err(e) = &result {
            tracing::warn!(error = %e, "Failed to load progress");
        }
        self.progress.finish(ticket, result)
    }

    /// Progress fetch state
    #[must_use]
    pub fn state(&self) -> &Loadable<Progress> {
        self.progress.state()
    }
}

fn cycle<'a>(levels: &'a [Level], current: Option<&Level>, delta: isize) -> Option<&'a Level> {
    if levels.is_empty() {
        return None;
    }
    let index = current
        .and_then(|c| levels.iter().position(|l| l.code == c.code))
        .map_or(0, |i| step_cursor(i, delta, levels.len()));
    levels.get(index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    use crate::api::ErrorKind;

    fn levels() -> Vec<Level> {
        vec![
            Level::new("expert", "Expert", 3),
            Level::new("beginner", "Beginner", 1),
            Level::new("intermediate", "Intermediate", 2),
        ]
    }

    fn data() -> CurriculumData {
        CurriculumData {
            path: LearningPathDetail {
                path_id: "p1".to_string(),
                title: "Transformers".to_string(),
                description: String::new(),
                curriculum_items: vec![
                    CurriculumItem {
                        curriculum_item_id: "c2".to_string(),
                        title: "Second".to_string(),
                        sort_order: 2,
                        has_articles: None,
                    },
                    CurriculumItem {
                        curriculum_item_id: "c1".to_string(),
                        title: "First".to_string(),
                        sort_order: 1,
                        has_articles: Some(true),
                    },
                ],
            },
            levels: levels(),
        }
    }

    #[test]
    fn test_curriculum_resolves_known_level() {
        let mut page = CurriculumPage::new("p1", Some("intermediate".to_string()));
        let ticket = page.start();
        page.apply(ticket, Ok(data()));

        assert_eq!(page.selected_level().map(|l| l.code.as_str()), Some("intermediate"));
        assert_eq!(page.items()[0].curriculum_item_id, "c1");
        assert_eq!(page.levels()[0].code, "beginner");
    }

    #[test]
    fn test_curriculum_unknown_level_stays_unselected() {
        let mut page = CurriculumPage::new("p1", Some("wizard".to_string()));
        let ticket = page.start();
        page.apply(ticket, Ok(data()));
        assert!(page.selected_level().is_none());
        assert_eq!(page.open_item("c1"), Err(SELECT_LEVEL_FIRST));
    }

    #[test]
    fn test_curriculum_failure_is_all_or_nothing() {
        let mut page = CurriculumPage::new("p1", Some("beginner".to_string()));
        let ticket = page.start();
        page.apply(ticket, Err(ApiError::of_kind(ErrorKind::NotFound)));
        assert!(page.items().is_empty());
        assert!(page.levels().is_empty());
        assert!(page.state().error().is_some());
    }

    #[test]
    fn test_curriculum_level_change_updates_route() {
        let mut page = CurriculumPage::new("p1", None);
        let ticket = page.start();
        page.apply(ticket, Ok(data()));

        let route = page.cycle_level(1).unwrap();
        assert_eq!(route.to_path(), "/curriculum/p1?level=beginner");
        let route = page.cycle_level(1).unwrap();
        assert_eq!(route.to_path(), "/curriculum/p1?level=intermediate");

        assert_eq!(
            page.open_highlighted().unwrap().unwrap().to_path(),
            "/read/curriculum/c1?level=intermediate"
        );
    }

    #[test]
    fn test_reader_level_resolution() {
        let mut page = ReaderPage::new(
            ArticleSource::CurriculumItem("c1".to_string()),
            Some("beginner".to_string()),
        );
        let ticket = page.start();
        let level = page.apply_levels(ticket, Ok(levels()));
        assert_eq!(level.map(|l| l.code), Some("beginner".to_string()));
    }

    #[test]
    fn test_reader_select_level_by_article_uses_item() {
        let mut page = ReaderPage::new(ArticleSource::ArticleId("a1".to_string()), None);
        let ticket = page.start();
        assert!(page.apply_levels(ticket, Ok(levels())).is_none());

        assert!(page
            .select_level(Level::new("expert", "Expert", 3), None)
            .is_none());
        let route = page
            .select_level(Level::new("expert", "Expert", 3), Some("c7"))
            .unwrap();
        assert_eq!(route.to_path(), "/read/curriculum/c7?level=expert");
        assert_eq!(page.source(), &ArticleSource::CurriculumItem("c7".to_string()));
        assert!(page
            .select_level(Level::new("expert", "Expert", 3), Some("c7"))
            .is_none());
    }

    #[test]
    fn test_profile_without_user() {
        let mut page = ProfilePage::new(None);
        assert!(page.start().is_none());
        assert!(page.state().is_idle());
    }
}
