//! Wizard slice
//!
//! Wraps the [`WizardMachine`] and keeps the persisted preferences (topic
//! slug, level code) in step with it.

use crate::types::CurriculumItem;
use crate::wizard::{Transition, WizardAction, WizardFlow, WizardMachine, WizardSelection};

use super::persist::PersistedSelection;

/// Wizard slice
#[derive(Debug)]
pub struct WizardSlice {
    machine: WizardMachine,
    preferences: PersistedSelection,
    preview: Vec<CurriculumItem>,
    dirty: bool,
}

impl Default for WizardSlice {
    fn default() -> Self {
        Self::new(WizardFlow::default(), PersistedSelection::default())
    }
}

impl WizardSlice {
    /// Fresh wizard with preferences restored from the last run
    #[must_use]
    pub fn new(flow: WizardFlow, preferences: PersistedSelection) -> Self {
        Self {
            machine: WizardMachine::new(flow),
            preferences,
            preview: Vec::new(),
            dirty: false,
        }
    }

    /// Apply a wizard action
    pub fn dispatch(&mut self, action: WizardAction) -> Transition {
        let reset = action == WizardAction::Reset;
        let previous_path = self.selected_path_id().map(str::to_string);
        let transition = self.machine.apply(action);

        if reset {
            self.preview.clear();
            self.set_preferences(PersistedSelection::default());
        } else {
            let selection = self.machine.selection();
            let preferences = PersistedSelection {
                topic_slug: selection
                    .main_topic
                    .as_ref()
                    .map(crate::types::MainTopic::slug)
                    .or_else(|| self.preferences.topic_slug.clone()),
                level_code: selection
                    .level_code()
                    .map(str::to_string)
                    .or_else(|| self.preferences.level_code.clone()),
            };
            self.set_preferences(preferences);
            // The preview belongs to one path; a different pick needs a new fetch
            if self.selected_path_id() != previous_path.as_deref() {
                self.preview.clear();
            }
        }
        transition
    }

    fn selected_path_id(&self) -> Option<&str> {
        self.machine
            .selection()
            .learning_path
            .as_ref()
            .map(|p| p.path_id.as_str())
    }

    fn set_preferences(&mut self, preferences: PersistedSelection) {
        if preferences != self.preferences {
            self.preferences = preferences;
            self.dirty = true;
        }
    }

    /// State machine
    #[must_use]
    pub fn machine(&self) -> &WizardMachine {
        &self.machine
    }

    /// Current selection
    #[must_use]
    pub fn selection(&self) -> &WizardSelection {
        self.machine.selection()
    }

    /// Preferences to persist
    #[must_use]
    pub fn preferences(&self) -> &PersistedSelection {
        &self.preferences
    }

    /// Whether preferences changed since the last call
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    /// Curriculum preview for the selected learning path
    #[must_use]
    pub fn preview(&self) -> &[CurriculumItem] {
        &self.preview
    }

    /// Store the curriculum preview, if it belongs to the selected path
    pub fn load_preview(&mut self, path_id: &str, items: Vec<CurriculumItem>) {
        if self.selected_path_id() == Some(path_id) {
            self.preview = items;
            self.preview.sort_by_key(|item| item.sort_order);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    use crate::types::{LearningPath, Level, MainTopic};

    fn path(id: &str) -> LearningPath {
        LearningPath {
            path_id: id.to_string(),
            title: format!("Path {id}"),
            description: String::new(),
            curriculum_count: 1,
            estimated_hours: 1.0,
        }
    }

    fn item(id: &str, sort_order: u32) -> CurriculumItem {
        CurriculumItem {
            curriculum_item_id: id.to_string(),
            title: id.to_uppercase(),
            sort_order,
            has_articles: None,
        }
    }

    fn topic() -> MainTopic {
        MainTopic {
            id: 7,
            title: "Machine Learning".to_string(),
            description: None,
            is_active: true,
        }
    }

    #[test]
    fn test_preferences_follow_selection() {
        let mut slice = WizardSlice::default();
        slice.dispatch(WizardAction::SelectLevel(Level::new("beginner", "Beginner", 1)));
        slice.dispatch(WizardAction::SelectMainTopic(Some(topic())));

        assert_eq!(
            slice.preferences(),
            &PersistedSelection {
                topic_slug: Some("machine-learning".to_string()),
                level_code: Some("beginner".to_string()),
            }
        );
        assert!(slice.take_dirty());
        assert!(!slice.take_dirty());
    }

    #[test]
    fn test_restored_preferences_survive_until_changed() {
        let restored = PersistedSelection {
            topic_slug: Some("ai".to_string()),
            level_code: Some("expert".to_string()),
        };
        let mut slice = WizardSlice::new(WizardFlow::default(), restored.clone());
        slice.dispatch(WizardAction::Start);
        assert_eq!(slice.preferences(), &restored);
        assert!(!slice.take_dirty());
    }

    #[test]
    fn test_reset_clears_preferences() {
        let mut slice = WizardSlice::default();
        slice.dispatch(WizardAction::SelectLevel(Level::new("beginner", "Beginner", 1)));
        slice.take_dirty();
        slice.dispatch(WizardAction::Reset);
        assert_eq!(slice.preferences(), &PersistedSelection::default());
        assert!(slice.take_dirty());
        assert!(slice.selection().is_empty());
    }

    #[test]
    fn test_preview_follows_selected_path() {
        let mut slice = WizardSlice::default();
        slice.dispatch(WizardAction::SelectLearningPath(path("p1")));
        slice.load_preview("p1", vec![item("c2", 2), item("c1", 1)]);
        let ids: Vec<_> = slice.preview().iter().map(|i| i.curriculum_item_id.as_str()).collect();
        assert_eq!(ids, vec!["c1", "c2"]);

        // Re-picking the same path keeps the loaded curriculum
        slice.dispatch(WizardAction::SelectLearningPath(path("p1")));
        assert_eq!(slice.preview().len(), 2);

        slice.dispatch(WizardAction::SelectLearningPath(path("p2")));
        assert!(slice.preview().is_empty());

        // A late preview for the old path is ignored
        slice.load_preview("p1", vec![item("c1", 1)]);
        assert!(slice.preview().is_empty());
        slice.load_preview("p2", vec![item("z9", 1)]);
        assert_eq!(slice.preview()[0].curriculum_item_id, "z9");
    }
}
