//! Learning path selector
//!
//! Lists the learning paths of the selected sub-topic. When there are none,
//! the user can ask the backend to generate one.

use crate::api::ApiError;
use crate::types::{CuratedSubTopic, GenerateLearningPathRequest, LearningPath, LearningPathDetail};

use super::{step_cursor, FetchSlot, Loadable, Ticket};

/// Fetch the controller should run for this selector
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LearningPathFetch {
    /// `GET /sub-topics/{id}/learning-paths`
    List {
        /// Ticket
        ticket: Ticket,
        /// Sub-topic id
        sub_topic_id: i64,
    },
    /// `POST /sub-topics/{id}/learning-paths/generate`
    Generate {
        /// Ticket
        ticket: Ticket,
        /// Sub-topic id
        sub_topic_id: i64,
        /// Request body
        request: GenerateLearningPathRequest,
    },
}

/// Learning path step state
#[derive(Debug)]
pub struct LearningPathSelector {
    sub_topic: Option<CuratedSubTopic>,
    level_code: Option<String>,
    paths: FetchSlot<Vec<LearningPath>>,
    generation: FetchSlot<LearningPathDetail>,
    item_count: u32,
    cursor: usize,
}

impl Default for LearningPathSelector {
    fn default() -> Self {
        Self::new(5)
    }
}

impl LearningPathSelector {
    /// Selector that asks for `item_count` items when generating
    #[must_use]
    pub fn new(item_count: u32) -> Self {
        Self {
            sub_topic: None,
            level_code: None,
            paths: FetchSlot::default(),
            generation: FetchSlot::default(),
            item_count,
            cursor: 0,
        }
    }

    /// Dependencies changed (selected sub-topic and level)
    pub fn set_dependencies(
        &mut self,
        sub_topic: Option<CuratedSubTopic>,
        level_code: Option<String>,
    ) -> Option<LearningPathFetch> {
        self.level_code = level_code;
        let same = self.sub_topic.as_ref().map(|s| s.id) == sub_topic.as_ref().map(|s| s.id);
        if same {
            return None;
        }
        self.sub_topic = sub_topic;
        self.generation.cancel();
        self.cursor = 0;
        match self.sub_topic.as_ref().map(|s| s.id) {
            Some(sub_topic_id) => Some(LearningPathFetch::List {
                ticket: self.paths.start(),
                sub_topic_id,
            }),
            None => {
                self.paths.cancel();
                None
            }
        }
    }

    /// Request the list if the step is shown with nothing loaded
    pub fn mount(&mut self) -> Option<LearningPathFetch> {
        if !self.paths.state().is_idle() {
            return None;
        }
        let sub_topic_id = self.sub_topic.as_ref()?.id;
        Some(LearningPathFetch::List {
            ticket: self.paths.start(),
            sub_topic_id,
        })
    }

    /// Re-issue a failed list or generation request
    pub fn retry(&mut self) -> Option<LearningPathFetch> {
        if self.generation.state().error().is_some() {
            return self.begin_generate();
        }
        if self.paths.state().error().is_none() {
            return None;
        }
        let sub_topic_id = self.sub_topic.as_ref()?.id;
        Some(LearningPathFetch::List {
            ticket: self.paths.start(),
            sub_topic_id,
        })
    }

    /// Apply a list completion
    pub fn apply_paths(&mut self, ticket: Ticket, result: Result<Vec<LearningPath>, ApiError>) -> bool {
        if let Err(e) = &result {
            tracing::warn!(error = %e, "Failed to fetch learning paths");
        }
        self.paths.finish(ticket, result)
    }

    /// Whether generation is on offer (empty list, nothing in flight)
    #[must_use]
    pub fn can_generate(&self) -> bool {
        self.paths.value().is_some_and(Vec::is_empty)
            && self.sub_topic.is_some()
            && self.level_code.is_some()
            && !self.generation.state().is_loading()
    }

    /// Start generating a path for the selected sub-topic
    pub fn begin_generate(&mut self) -> Option<LearningPathFetch> {
        if !self.can_generate() {
            return None;
        }
        let sub_topic = self.sub_topic.as_ref()?;
        let request = GenerateLearningPathRequest {
            learning_objective: sub_topic.title.clone(),
            difficulty: self.level_code.clone()?,
            item_count: self.item_count,
        };
        let sub_topic_id = sub_topic.id;
        Some(LearningPathFetch::Generate {
            ticket: self.generation.start(),
            sub_topic_id,
            request,
        })
    }

    /// Apply a generation completion
    ///
    /// On success the new path joins the list and is returned.
    pub fn apply_generated(
        &mut self,
        ticket: Ticket,
        result: Result<LearningPathDetail, ApiError>,
    ) -> Option<LearningPath> {
        if let Err(e) = &result {
            tracing::warn!(error = %e, "Learning path generation failed");
        }
        if !self.generation.finish(ticket, result) {
            return None;
        }
        let path = LearningPath::from(self.generation.value()?.clone());
        if let Some(paths) = self.paths.value_mut() {
            paths.push(path.clone());
        }
        tracing::info!(path_id = %path.path_id, "Generated learning path");
        Some(path)
    }

    /// Selected sub-topic
    #[must_use]
    pub fn sub_topic(&self) -> Option<&CuratedSubTopic> {
        self.sub_topic.as_ref()
    }

    /// List fetch state
    #[must_use]
    pub fn state(&self) -> &Loadable<Vec<LearningPath>> {
        self.paths.state()
    }

    /// Generation state
    #[must_use]
    pub fn generation(&self) -> &Loadable<LearningPathDetail> {
        self.generation.state()
    }

    /// Loaded paths
    #[must_use]
    pub fn paths(&self) -> &[LearningPath] {
        self.paths.value().map_or(&[], Vec::as_slice)
    }

    /// Whether the list loaded empty
    #[must_use]
    pub fn is_empty_state(&self) -> bool {
        self.paths.value().is_some_and(Vec::is_empty)
    }

    /// Move the highlight
    pub fn move_cursor(&mut self, delta: isize) {
        self.cursor = step_cursor(self.cursor, delta, self.paths().len());
    }

    /// Highlight position
    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Highlighted path
    #[must_use]
    pub fn highlighted(&self) -> Option<&LearningPath> {
        self.paths().get(self.cursor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    use crate::api::ErrorKind;
    use crate::types::SubTopic;

    fn sub(id: i64) -> CuratedSubTopic {
        CuratedSubTopic::from(SubTopic {
            sub_topic_id: id,
            name: "Attention".to_string(),
            description: String::new(),
            source_type: "curated".to_string(),
        })
    }

    fn list_ticket(fetch: Option<LearningPathFetch>) -> Ticket {
        match fetch {
            Some(LearningPathFetch::List { ticket, .. }) => ticket,
            other => panic!("expected list fetch, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_list_offers_generation() {
        let mut selector = LearningPathSelector::new(5);
        let ticket = list_ticket(selector.set_dependencies(Some(sub(42)), Some("beginner".to_string())));
        assert!(!selector.can_generate());

        selector.apply_paths(ticket, Ok(Vec::new()));
        assert!(selector.is_empty_state());
        assert!(selector.can_generate());

        let Some(LearningPathFetch::Generate { ticket, sub_topic_id, request }) =
            selector.begin_generate()
        else {
            panic!("expected generation");
        };
        assert_eq!(sub_topic_id, 42);
        assert_eq!(
            request,
            GenerateLearningPathRequest {
                learning_objective: "Attention".to_string(),
                difficulty: "beginner".to_string(),
                item_count: 5,
            }
        );
        assert!(!selector.can_generate());

        let path = selector
            .apply_generated(
                ticket,
                Ok(LearningPathDetail {
                    path_id: "p9".to_string(),
                    title: "Attention basics".to_string(),
                    description: String::new(),
                    curriculum_items: Vec::new(),
                }),
            )
            .unwrap();
        assert_eq!(path.path_id, "p9");
        assert_eq!(selector.paths().len(), 1);
        assert!(!selector.is_empty_state());
    }

    #[test]
    fn test_generate_fetch_is_comparable() {
        fn same<T: Eq>(a: &T, b: &T) -> bool {
            a == b
        }

        let mut selector = LearningPathSelector::new(3);
        let ticket = list_ticket(selector.set_dependencies(Some(sub(42)), Some("advanced".to_string())));
        selector.apply_paths(ticket, Ok(Vec::new()));
        let fetch = selector.begin_generate().unwrap();
        assert!(same(&fetch, &fetch.clone()));
        assert!(!same(
            &fetch,
            &LearningPathFetch::List {
                ticket,
                sub_topic_id: 42,
            }
        ));
    }

    #[test]
    fn test_list_error_can_be_retried() {
        let mut selector = LearningPathSelector::default();
        let ticket = list_ticket(selector.set_dependencies(Some(sub(42)), Some("beginner".to_string())));
        selector.apply_paths(ticket, Err(ApiError::of_kind(ErrorKind::Network)));
        assert!(selector.state().error().is_some());
        assert!(!selector.can_generate());

        let ticket = list_ticket(selector.retry());
        assert!(selector.apply_paths(ticket, Ok(vec![])));
    }

    #[test]
    fn test_same_sub_topic_does_not_refetch() {
        let mut selector = LearningPathSelector::default();
        selector.set_dependencies(Some(sub(42)), Some("beginner".to_string()));
        assert!(selector
            .set_dependencies(Some(sub(42)), Some("beginner".to_string()))
            .is_none());
        assert!(selector.set_dependencies(None, None).is_none());
        assert!(selector.state().is_idle());
    }
}
