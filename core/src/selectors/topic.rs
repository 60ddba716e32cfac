//! Topic selector
//!
//! Three lists depend on the selected level:
//!
//! - main topics, paginated and searchable (independent of level)
//! - popular sub-topics for the level, shown only while no main topic is
//!   selected; failures are swallowed
//! - sub-topics of the selected main topic, filtered to the level; failures
//!   are shown inline

use crate::api::ApiError;
use crate::services::MainTopicQuery;
use crate::types::{CuratedSubTopic, Level, MainTopic, Page};

use super::{step_cursor, FetchSlot, Loadable, Ticket};

/// Main topics per page
pub const TOPIC_PAGE_SIZE: u32 = 20;

/// Popular sub-topics requested per level
pub const POPULAR_LIMIT: u32 = 6;

/// Fetch the controller should run for this selector
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TopicFetch {
    /// `GET /main-topics`
    MainTopics {
        /// Ticket
        ticket: Ticket,
        /// Page and search
        query: MainTopicQuery,
    },
    /// `GET /sub-topics/curated/popular/{code}`
    Popular {
        /// Ticket
        ticket: Ticket,
        /// Level code
        level_code: String,
    },
    /// `GET /sub-topics/curated/by-main-topic/{id}`
    SubTopics {
        /// Ticket
        ticket: Ticket,
        /// Main topic id
        main_topic_id: i64,
    },
}

/// One row of the topic step, in display order
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TopicEntry<'a> {
    /// Popular sub-topic shortcut
    Popular(&'a CuratedSubTopic),
    /// Main topic
    Main(&'a MainTopic),
    /// Sub-topic of the selected main topic
    Sub(&'a CuratedSubTopic),
}

/// Topic step state
#[derive(Debug, Default)]
pub struct TopicSelector {
    level: Option<Level>,
    selected_main: Option<MainTopic>,
    page: u32,
    search: String,
    main_topics: FetchSlot<Page<MainTopic>>,
    popular: FetchSlot<Vec<CuratedSubTopic>>,
    sub_topics: FetchSlot<Vec<CuratedSubTopic>>,
    preferred_slug: Option<String>,
    cursor: usize,
}

impl TopicSelector {
    /// Selector that initially highlights the main topic with `preferred_slug`
    #[must_use]
    pub fn new(preferred_slug: Option<String>) -> Self {
        Self {
            page: 1,
            preferred_slug,
            ..Self::default()
        }
    }

    /// Requests needed when the step is shown
    pub fn mount(&mut self) -> Vec<TopicFetch> {
        let mut fetches = Vec::new();
        if self.main_topics.state().is_idle() {
            fetches.push(self.fetch_main_topics());
        }
        if self.popular.state().is_idle() {
            fetches.extend(self.fetch_popular());
        }
        fetches
    }

    /// Level dependency changed
    ///
    /// Drops the main topic selection and both sub-topic lists when the
    /// level differs from the previous one.
    pub fn set_level(&mut self, level: Option<Level>) -> Vec<TopicFetch> {
        let same = self.level.as_ref().map(|l| &l.code) == level.as_ref().map(|l| &l.code);
        self.level = level;
        if same {
            return Vec::new();
        }
        self.selected_main = None;
        self.sub_topics.cancel();
        self.popular.cancel();
        self.cursor = 0;
        self.fetch_popular().into_iter().collect()
    }

    /// Main topic selection changed (mirrors the wizard)
    pub fn set_main_topic(&mut self, topic: Option<MainTopic>) -> Option<TopicFetch> {
        let same = self.selected_main.as_ref().map(|t| t.id) == topic.as_ref().map(|t| t.id);
        if same {
            return None;
        }
        self.selected_main = topic;
        self.cursor = 0;
        match &self.selected_main {
            Some(topic) => {
                let main_topic_id = topic.id;
                Some(TopicFetch::SubTopics {
                    ticket: self.sub_topics.start(),
                    main_topic_id,
                })
            }
            None => {
                self.sub_topics.cancel();
                None
            }
        }
    }

    /// What picking `topic` means: the topic, or `None` to toggle it off
    #[must_use]
    pub fn pick_main_topic(&self, topic: &MainTopic) -> Option<MainTopic> {
        if self.selected_main.as_ref().is_some_and(|t| t.id == topic.id) {
            None
        } else {
            Some(topic.clone())
        }
    }

    /// Change the search query; resets to page 1
    pub fn set_search(&mut self, search: impl Into<String>) -> Option<TopicFetch> {
        let search = search.into();
        if search == self.search {
            return None;
        }
        self.search = search;
        self.page = 1;
        self.cursor = 0;
        Some(self.fetch_main_topics())
    }

    /// Current search query
    #[must_use]
    pub fn search(&self) -> &str {
        &self.search
    }

    /// Current page
    #[must_use]
    pub fn page(&self) -> u32 {
        self.page.max(1)
    }

    /// Number of pages, once known
    #[must_use]
    pub fn pages(&self) -> u32 {
        self.main_topics.value().map_or(1, |p| p.pages.max(1))
    }

    /// Go to the next page of main topics
    pub fn next_page(&mut self) -> Option<TopicFetch> {
        if self.page() >= self.pages() {
            return None;
        }
        self.page = self.page() + 1;
        self.cursor = 0;
        Some(self.fetch_main_topics())
    }

    /// Go to the previous page of main topics
    pub fn previous_page(&mut self) -> Option<TopicFetch> {
        if self.page() <= 1 {
            return None;
        }
        self.page = self.page() - 1;
        self.cursor = 0;
        Some(self.fetch_main_topics())
    }

    /// Re-issue whatever failed
    pub fn retry(&mut self) -> Vec<TopicFetch> {
        let mut fetches = Vec::new();
        if self.main_topics.state().error().is_some() {
            fetches.push(self.fetch_main_topics());
        }
        if self.sub_topics.state().error().is_some() {
            if let Some(id) = self.selected_main.as_ref().map(|t| t.id) {
                fetches.push(TopicFetch::SubTopics {
                    ticket: self.sub_topics.start(),
                    main_topic_id: id,
                });
            }
        }
        fetches
    }

    /// Apply a main topics completion
    pub fn apply_main_topics(
        &mut self,
        ticket: Ticket,
        result: Result<Page<MainTopic>, ApiError>,
    ) -> bool {
        if let Err(e) = &result {
            tracing::warn!(error = %e, "Failed to fetch main topics");
        }
        if !self.main_topics.finish(ticket, result) {
            return false;
        }
        if let Some(slug) = self.preferred_slug.take() {
            let offset = self.entries().iter().position(
                |e| matches!(e, TopicEntry::Main(t) if t.slug() == slug),
            );
            if let Some(i) = offset {
                self.cursor = i;
            }
        }
        true
    }

    /// Apply a popular sub-topics completion; errors become an empty list
    pub fn apply_popular(
        &mut self,
        ticket: Ticket,
        result: Result<Vec<CuratedSubTopic>, ApiError>,
    ) -> bool {
        let result = result.or_else(|e| {
            tracing::debug!(error = %e, "Popular sub-topics unavailable");
            Ok(Vec::new())
        });
        self.popular.finish(ticket, result)
    }

    /// Apply a sub-topics completion, keeping only the selected level's
    pub fn apply_sub_topics(
        &mut self,
        ticket: Ticket,
        result: Result<Vec<CuratedSubTopic>, ApiError>,
    ) -> bool {
        let level = self.level.clone();
        let result = result.map(|subs| match &level {
            Some(level) => subs.into_iter().filter(|s| s.matches_level(level)).collect(),
            None => subs,
        });
        if let Err(e) = &result {
            tracing::warn!(error = %e, "Failed to fetch sub-topics");
        }
        self.sub_topics.finish(ticket, result)
    }

    /// Selected level
    #[must_use]
    pub fn level(&self) -> Option<&Level> {
        self.level.as_ref()
    }

    /// Selected main topic
    #[must_use]
    pub fn selected_main(&self) -> Option<&MainTopic> {
        self.selected_main.as_ref()
    }

    /// Main topics fetch state
    #[must_use]
    pub fn main_topics(&self) -> &Loadable<Page<MainTopic>> {
        self.main_topics.state()
    }

    /// Sub-topics fetch state
    #[must_use]
    pub fn sub_topics(&self) -> &Loadable<Vec<CuratedSubTopic>> {
        self.sub_topics.state()
    }

    /// Popular sub-topics, when they should be shown
    #[must_use]
    pub fn visible_popular(&self) -> &[CuratedSubTopic] {
        if self.selected_main.is_some() {
            return &[];
        }
        self.popular.value().map_or(&[], Vec::as_slice)
    }

    /// Rows in display order: popular, main topics, then sub-topics
    #[must_use]
    pub fn entries(&self) -> Vec<TopicEntry<'_>> {
        let mut entries: Vec<TopicEntry<'_>> =
            self.visible_popular().iter().map(TopicEntry::Popular).collect();
        if let Some(page) = self.main_topics.value() {
            entries.extend(page.items.iter().map(TopicEntry::Main));
        }
        if let Some(subs) = self.sub_topics.value() {
            entries.extend(subs.iter().map(TopicEntry::Sub));
        }
        entries
    }

    /// Move the highlight
    pub fn move_cursor(&mut self, delta: isize) {
        self.cursor = step_cursor(self.cursor, delta, self.entries().len());
    }

    /// Highlight position
    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Highlighted row
    #[must_use]
    pub fn highlighted(&self) -> Option<TopicEntry<'_>> {
        self.entries().get(self.cursor).copied()
    }

    fn fetch_main_topics(&mut self) -> TopicFetch {
        let search = self.search.trim();
        TopicFetch::MainTopics {
            query: MainTopicQuery {
                page: self.page(),
                size: TOPIC_PAGE_SIZE,
                is_active: None,
                search: (!search.is_empty()).then(|| search.to_string()),
            },
            ticket: self.main_topics.start(),
        }
    }

    fn fetch_popular(&mut self) -> Option<TopicFetch> {
        let level_code = self.level.as_ref()?.code.clone();
        Some(TopicFetch::Popular {
            ticket: self.popular.start(),
            level_code,
        })
    }
}
