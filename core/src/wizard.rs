//! Selection Wizard
//!
//! The home page walks the user through a declared sequence of steps. The
//! sequence is data ([`WizardFlow`]): each [`StepDescriptor`] names a step and
//! the predicate that must hold over the [`WizardSelection`] before the user
//! may move past it.
//!
//! All transitions go through [`WizardMachine::apply`], a pure reducer that
//! takes a [`WizardAction`] and reports what happened as a [`Transition`].
//!
//! # Rules
//!
//! - Picking a level, sub-topic or learning path stores it and moves to the
//!   step after the one that owns that pick.
//! - Picking a main topic only narrows the topic step; it never advances.
//! - A changed pick clears the picks that depend on it and were made later
//!   in the flow. Picking the same entity again clears nothing.
//! - `Next` needs the current step's predicate; `Previous` needs a step
//!   before the current one. `Reset` always works.
//! - `Confirm` on the summary step navigates to the curriculum route only
//!   when both a level and a learning path are selected.

use thiserror::Error;

use crate::routes::Route;
use crate::types::{CuratedSubTopic, LearningPath, Level, MainTopic};

/// Prompt shown when confirming an incomplete selection
pub const INCOMPLETE_SELECTION_PROMPT: &str = "Please complete your selection first.";

// ============================================================================
// Steps
// ============================================================================

/// Step identifier
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StepId {
    /// Greeting, nothing to select
    Welcome,
    /// Difficulty level
    Level,
    /// Main topic and sub-topic
    Topic,
    /// Learning path for the chosen sub-topic
    LearningPath,
    /// Review and confirm
    Summary,
}

impl StepId {
    /// Name used in configuration
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Welcome => "welcome",
            Self::Level => "level",
            Self::Topic => "topic",
            Self::LearningPath => "learning-path",
            Self::Summary => "summary",
        }
    }

    /// Parse a configuration name
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "welcome" => Some(Self::Welcome),
            "level" => Some(Self::Level),
            "topic" => Some(Self::Topic),
            "learning-path" => Some(Self::LearningPath),
            "summary" => Some(Self::Summary),
            _ => None,
        }
    }

    /// Heading shown above the step
    #[must_use]
    pub fn title(&self) -> &'static str {
        match self {
            Self::Welcome => "Welcome",
            Self::Level => "Choose your level",
            Self::Topic => "Choose a topic",
            Self::LearningPath => "Choose a learning path",
            Self::Summary => "Review your selection",
        }
    }
}

impl std::fmt::Display for StepId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// One declared step: id plus the predicate that allows moving past it
#[derive(Clone, Copy)]
pub struct StepDescriptor {
    /// Step identifier
    pub id: StepId,
    /// Whether `Next` is allowed from this step
    pub can_proceed: fn(&WizardSelection) -> bool,
}

impl StepDescriptor {
    /// Descriptor with the standard predicate for `id`
    #[must_use]
    pub fn standard(id: StepId) -> Self {
        let can_proceed: fn(&WizardSelection) -> bool = match id {
            StepId::Welcome => |_| true,
            StepId::Level => |s| s.level.is_some(),
            StepId::Topic => |s| s.sub_topic.is_some(),
            StepId::LearningPath => |s| s.learning_path.is_some(),
            StepId::Summary => |s| s.is_complete(),
        };
        Self { id, can_proceed }
    }
}

impl std::fmt::Debug for StepDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StepDescriptor").field("id", &self.id).finish()
    }
}

// ============================================================================
// Flow
// ============================================================================

/// Reasons a step list cannot be used as a flow
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum FlowError {
    /// A name that is not a known step
    #[error("unknown step {0:?}")]
    UnknownStep(String),

    /// The same step appears twice
    #[error("step {0} appears more than once")]
    Duplicate(StepId),

    /// A step the confirm action depends on is absent
    #[error("flow must contain the {0} step")]
    Missing(StepId),

    /// Summary is not the final step
    #[error("flow must end with the summary step")]
    SummaryNotLast,

    /// Welcome is somewhere other than the front
    #[error("the welcome step can only come first")]
    WelcomeNotFirst,

    /// Learning paths are listed per sub-topic, so topic must come first
    #[error("the topic step must come before the learning-path step")]
    TopicAfterLearningPath,
}

/// Ordered list of step descriptors
#[derive(Clone, Debug)]
pub struct WizardFlow {
    steps: Vec<StepDescriptor>,
}

impl Default for WizardFlow {
    /// `welcome → level → topic → learning-path → summary`
    fn default() -> Self {
        Self {
            steps: [
                StepId::Welcome,
                StepId::Level,
                StepId::Topic,
                StepId::LearningPath,
                StepId::Summary,
            ]
            .into_iter()
            .map(StepDescriptor::standard)
            .collect(),
        }
    }
}

impl WizardFlow {
    /// Build a flow from step ids
    ///
    /// # Errors
    ///
    /// Returns a [`FlowError`] when the order cannot drive the wizard to a
    /// confirmable selection.
    pub fn from_steps(ids: &[StepId]) -> Result<Self, FlowError> {
        for (i, id) in ids.iter().enumerate() {
            if ids[..i].contains(id) {
                return Err(FlowError::Duplicate(*id));
            }
        }
        for required in [StepId::Level, StepId::Topic, StepId::LearningPath, StepId::Summary] {
            if !ids.contains(&required) {
                return Err(FlowError::Missing(required));
            }
        }
        if ids.last() != Some(&StepId::Summary) {
            return Err(FlowError::SummaryNotLast);
        }
        if ids.iter().skip(1).any(|id| *id == StepId::Welcome) {
            return Err(FlowError::WelcomeNotFirst);
        }
        let position = |step: StepId| ids.iter().position(|id| *id == step);
        if position(StepId::Topic) > position(StepId::LearningPath) {
            return Err(FlowError::TopicAfterLearningPath);
        }

        Ok(Self {
            steps: ids.iter().copied().map(StepDescriptor::standard).collect(),
        })
    }

    /// Build a flow from configuration names
    ///
    /// # Errors
    ///
    /// [`FlowError::UnknownStep`] for an unrecognized name, otherwise the
    /// same as [`WizardFlow::from_steps`].
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Result<Self, FlowError> {
        let ids = names
            .iter()
            .map(|n| {
                StepId::from_name(n.as_ref())
                    .ok_or_else(|| FlowError::UnknownStep(n.as_ref().to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_steps(&ids)
    }

    /// Declared steps in order
    #[must_use]
    pub fn steps(&self) -> &[StepDescriptor] {
        &self.steps
    }

    /// Step ids in order
    pub fn ids(&self) -> impl Iterator<Item = StepId> + '_ {
        self.steps.iter().map(|d| d.id)
    }

    /// Initial step
    #[must_use]
    pub fn first(&self) -> StepId {
        // from_steps guarantees at least four steps
        self.steps.first().map_or(StepId::Summary, |d| d.id)
    }

    /// Position of `step` in the flow
    #[must_use]
    pub fn index_of(&self, step: StepId) -> Option<usize> {
        self.steps.iter().position(|d| d.id == step)
    }

    /// Step after `step`
    #[must_use]
    pub fn next_after(&self, step: StepId) -> Option<StepId> {
        let i = self.index_of(step)?;
        self.steps.get(i + 1).map(|d| d.id)
    }

    /// Step before `step`
    #[must_use]
    pub fn previous_before(&self, step: StepId) -> Option<StepId> {
        let i = self.index_of(step)?;
        i.checked_sub(1).and_then(|j| self.steps.get(j)).map(|d| d.id)
    }

    /// Whether `later` is declared after `earlier`
    #[must_use]
    pub fn comes_after(&self, later: StepId, earlier: StepId) -> bool {
        match (self.index_of(later), self.index_of(earlier)) {
            (Some(l), Some(e)) => l > e,
            _ => false,
        }
    }

    fn descriptor(&self, step: StepId) -> Option<&StepDescriptor> {
        self.steps.iter().find(|d| d.id == step)
    }
}

// ============================================================================
// Selection
// ============================================================================

/// What the user has picked so far
#[derive(Clone, Debug, PartialEq)]
pub struct WizardSelection {
    /// Current step
    pub step: StepId,
    /// Selected level
    pub level: Option<Level>,
    /// Selected main topic
    pub main_topic: Option<MainTopic>,
    /// Selected sub-topic
    pub sub_topic: Option<CuratedSubTopic>,
    /// Selected learning path
    pub learning_path: Option<LearningPath>,
}

impl WizardSelection {
    /// Empty selection positioned on `step`
    #[must_use]
    pub fn new(step: StepId) -> Self {
        Self {
            step,
            level: None,
            main_topic: None,
            sub_topic: None,
            learning_path: None,
        }
    }

    /// Whether every selection field is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.level.is_none()
            && self.main_topic.is_none()
            && self.sub_topic.is_none()
            && self.learning_path.is_none()
    }

    /// Whether confirm has what it needs
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.level.is_some() && self.learning_path.is_some()
    }

    /// Selected level code
    #[must_use]
    pub fn level_code(&self) -> Option<&str> {
        self.level.as_ref().map(|l| l.code.as_str())
    }

    fn clear_topic(&mut self) {
        self.main_topic = None;
        self.sub_topic = None;
        self.learning_path = None;
    }
}

// ============================================================================
// Machine
// ============================================================================

/// Everything the user can do to the wizard
#[derive(Clone, Debug, PartialEq)]
pub enum WizardAction {
    /// Leave the welcome step
    Start,
    /// Pick a level
    SelectLevel(Level),
    /// Pick (or clear) a main topic
    SelectMainTopic(Option<MainTopic>),
    /// Pick a sub-topic
    SelectSubTopic(CuratedSubTopic),
    /// Pick a learning path
    SelectLearningPath(LearningPath),
    /// Move forward one step
    Next,
    /// Move back one step
    Previous,
    /// Clear everything and return to the first step
    Reset,
    /// Leave the wizard for the curriculum view
    Confirm,
}

/// Why an action was refused
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rejection {
    /// The current step's selection is empty
    StepIncomplete(StepId),
    /// `Previous` on the first step
    AtFirstStep,
    /// `Next` on the last step
    AtLastStep,
    /// `Confirm` away from the summary step
    NotOnSummary,
    /// `Confirm` without a level and a learning path
    IncompleteSelection,
}

impl Rejection {
    /// Prompt to show the user, if this rejection warrants one
    #[must_use]
    pub fn prompt(&self) -> Option<&'static str> {
        match self {
            Self::IncompleteSelection => Some(INCOMPLETE_SELECTION_PROMPT),
            _ => None,
        }
    }
}

/// Result of applying an action
#[derive(Clone, Debug, PartialEq)]
pub enum Transition {
    /// Moved to another step
    Moved {
        /// Step before the action
        from: StepId,
        /// Step after the action
        to: StepId,
    },
    /// Selection changed, step did not
    Updated,
    /// Nothing changed
    Unchanged,
    /// Action refused
    Rejected(Rejection),
    /// Leave the wizard for this route
    Navigate(Route),
}

/// Wizard state plus the flow it runs
#[derive(Clone, Debug)]
pub struct WizardMachine {
    flow: WizardFlow,
    selection: WizardSelection,
}

impl Default for WizardMachine {
    fn default() -> Self {
        Self::new(WizardFlow::default())
    }
}

impl WizardMachine {
    /// Fresh machine on the flow's first step
    #[must_use]
    pub fn new(flow: WizardFlow) -> Self {
        let selection = WizardSelection::new(flow.first());
        Self { flow, selection }
    }

    /// Current selection
    #[must_use]
    pub fn selection(&self) -> &WizardSelection {
        &self.selection
    }

    /// Declared flow
    #[must_use]
    pub fn flow(&self) -> &WizardFlow {
        &self.flow
    }

    /// Current step
    #[must_use]
    pub fn step(&self) -> StepId {
        self.selection.step
    }

    /// Whether `Next` would be accepted
    #[must_use]
    pub fn can_advance(&self) -> bool {
        self.flow.next_after(self.selection.step).is_some()
            && self
                .flow
                .descriptor(self.selection.step)
                .is_some_and(|d| (d.can_proceed)(&self.selection))
    }

    /// Whether `Previous` would be accepted
    #[must_use]
    pub fn can_go_back(&self) -> bool {
        self.flow.previous_before(self.selection.step).is_some()
    }

    /// Apply one action
    pub fn apply(&mut self, action: WizardAction) -> Transition {
        let transition = match action {
            WizardAction::Start => {
                if self.selection.step == StepId::Welcome {
                    self.advance_from(StepId::Welcome)
                } else {
                    Transition::Unchanged
                }
            }
            WizardAction::SelectLevel(level) => {
                let changed = self.selection.level_code() != Some(level.code.as_str());
                if changed && self.flow.comes_after(StepId::Topic, StepId::Level) {
                    self.selection.clear_topic();
                }
                self.selection.level = Some(level);
                self.advance_from(StepId::Level)
            }
            WizardAction::SelectMainTopic(topic) => {
                let current = self.selection.main_topic.as_ref().map(|t| t.id);
                if current == topic.as_ref().map(|t| t.id) {
                    Transition::Unchanged
                } else {
                    self.selection.main_topic = topic;
                    self.selection.sub_topic = None;
                    self.selection.learning_path = None;
                    Transition::Updated
                }
            }
            WizardAction::SelectSubTopic(sub_topic) => {
                let current = self.selection.sub_topic.as_ref().map(|s| s.id);
                if current != Some(sub_topic.id) {
                    self.selection.learning_path = None;
                }
                self.selection.sub_topic = Some(sub_topic);
                self.advance_from(StepId::Topic)
            }
            WizardAction::SelectLearningPath(path) => {
                self.selection.learning_path = Some(path);
                self.advance_from(StepId::LearningPath)
            }
            WizardAction::Next => {
                if self.flow.next_after(self.selection.step).is_none() {
                    Transition::Rejected(Rejection::AtLastStep)
                } else if self.can_advance() {
                    self.advance_from(self.selection.step)
                } else {
                    Transition::Rejected(Rejection::StepIncomplete(self.selection.step))
                }
            }
            WizardAction::Previous => match self.flow.previous_before(self.selection.step) {
                Some(to) => self.move_to(to),
                None => Transition::Rejected(Rejection::AtFirstStep),
            },
            WizardAction::Reset => {
                let from = self.selection.step;
                self.selection = WizardSelection::new(self.flow.first());
                if from == self.selection.step {
                    Transition::Updated
                } else {
                    Transition::Moved {
                        from,
                        to: self.selection.step,
                    }
                }
            }
            WizardAction::Confirm => self.confirm(),
        };

        tracing::debug!(step = %self.selection.step, ?transition, "Wizard transition");
        transition
    }

    fn confirm(&self) -> Transition {
        if self.selection.step != StepId::Summary {
            return Transition::Rejected(Rejection::NotOnSummary);
        }
        match (&self.selection.learning_path, &self.selection.level) {
            (Some(path), Some(level)) => Transition::Navigate(Route::Curriculum {
                path_id: path.path_id.clone(),
                level: Some(level.code.clone()),
            }),
            _ => Transition::Rejected(Rejection::IncompleteSelection),
        }
    }

    /// Move to the step after `owner`, or stay put if `owner` is last
    fn advance_from(&mut self, owner: StepId) -> Transition {
        match self.flow.next_after(owner) {
            Some(to) => self.move_to(to),
            None => Transition::Updated,
        }
    }

    fn move_to(&mut self, to: StepId) -> Transition {
        let from = self.selection.step;
        if from == to {
            return Transition::Updated;
        }
        self.selection.step = to;
        Transition::Moved { from, to }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn level(code: &str) -> Level {
        Level::new(code, code, 1)
    }

    fn main_topic(id: i64) -> MainTopic {
        MainTopic {
            id,
            title: format!("Topic {id}"),
            description: None,
            is_active: true,
        }
    }

    fn sub_topic(id: i64) -> CuratedSubTopic {
        CuratedSubTopic {
            id,
            title: format!("Sub {id}"),
            description: String::new(),
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

    fn path(id: &str) -> LearningPath {
        LearningPath {
            path_id: id.to_string(),
            title: format!("Path {id}"),
            description: String::new(),
            curriculum_count: 3,
            estimated_hours: 1.0,
        }
    }

    fn every_action() -> Vec<WizardAction> {
        vec![
            WizardAction::Start,
            WizardAction::SelectLevel(level("beginner")),
            WizardAction::SelectMainTopic(Some(main_topic(7))),
            WizardAction::SelectSubTopic(sub_topic(42)),
            WizardAction::SelectLearningPath(path("p1")),
            WizardAction::Next,
            WizardAction::Previous,
            WizardAction::Confirm,
        ]
    }

    #[test]
    fn test_default_flow_order() {
        let ids: Vec<_> = WizardFlow::default().ids().collect();
        assert_eq!(
            ids,
            vec![
                StepId::Welcome,
                StepId::Level,
                StepId::Topic,
                StepId::LearningPath,
                StepId::Summary
            ]
        );
    }

    #[test]
    fn test_full_scenario_navigates_to_curriculum() {
        let mut wizard = WizardMachine::default();
        wizard.apply(WizardAction::Start);
        assert_eq!(wizard.step(), StepId::Level);

        wizard.apply(WizardAction::SelectLevel(level("intermediate")));
        assert_eq!(wizard.step(), StepId::Topic);

        assert_eq!(
            wizard.apply(WizardAction::SelectMainTopic(Some(main_topic(7)))),
            Transition::Updated
        );
        assert_eq!(wizard.step(), StepId::Topic);

        wizard.apply(WizardAction::SelectSubTopic(sub_topic(42)));
        assert_eq!(wizard.step(), StepId::LearningPath);

        wizard.apply(WizardAction::SelectLearningPath(path("p1")));
        assert_eq!(wizard.step(), StepId::Summary);

        let transition = wizard.apply(WizardAction::Confirm);
        let Transition::Navigate(route) = transition else {
            panic!("expected navigation, got {transition:?}");
        };
        assert_eq!(route.to_path(), "/curriculum/p1?level=intermediate");
    }

    #[test]
    fn test_next_blocked_while_step_selection_empty() {
        for flow in [
            WizardFlow::default(),
            WizardFlow::from_names(&["topic", "learning-path", "level", "summary"]).unwrap(),
        ] {
            let mut wizard = WizardMachine::new(flow.clone());
            wizard.apply(WizardAction::Start);
            for step in flow.ids() {
                if step == StepId::Welcome || step == StepId::Summary {
                    continue;
                }
                wizard.selection.step = step;
                wizard.selection.level = None;
                wizard.selection.sub_topic = None;
                wizard.selection.learning_path = None;
                assert!(!wizard.can_advance(), "{step} should block Next");
                assert_eq!(
                    wizard.apply(WizardAction::Next),
                    Transition::Rejected(Rejection::StepIncomplete(step))
                );
                assert_eq!(wizard.step(), step);
            }
        }
    }

    #[test]
    fn test_next_allowed_once_selected() {
        let mut wizard = WizardMachine::default();
        wizard.apply(WizardAction::Start);
        wizard.apply(WizardAction::SelectLevel(level("beginner")));
        wizard.apply(WizardAction::Previous);
        assert_eq!(wizard.step(), StepId::Level);
        assert!(wizard.can_advance());
        assert_eq!(
            wizard.apply(WizardAction::Next),
            Transition::Moved {
                from: StepId::Level,
                to: StepId::Topic
            }
        );
    }

    #[test]
    fn test_reset_from_every_step_clears_everything() {
        let mut wizard = WizardMachine::default();
        for action in every_action() {
            wizard.apply(action);
            let mut copy = wizard.clone();
            copy.apply(WizardAction::Reset);
            assert_eq!(copy.step(), StepId::Welcome);
            assert!(copy.selection().is_empty());
        }
    }

    #[test]
    fn test_changing_level_clears_topic_and_path() {
        let mut wizard = WizardMachine::default();
        wizard.apply(WizardAction::SelectLevel(level("beginner")));
        wizard.apply(WizardAction::SelectMainTopic(Some(main_topic(7))));
        wizard.apply(WizardAction::SelectSubTopic(sub_topic(42)));
        wizard.apply(WizardAction::SelectLearningPath(path("p1")));

        wizard.apply(WizardAction::SelectLevel(level("expert")));
        let selection = wizard.selection();
        assert_eq!(selection.level_code(), Some("expert"));
        assert!(selection.main_topic.is_none());
        assert!(selection.sub_topic.is_none());
        assert!(selection.learning_path.is_none());
    }

    #[test]
    fn test_same_level_keeps_downstream() {
        let mut wizard = WizardMachine::default();
        wizard.apply(WizardAction::SelectLevel(level("beginner")));
        wizard.apply(WizardAction::SelectSubTopic(sub_topic(42)));
        wizard.apply(WizardAction::SelectLevel(level("beginner")));
        assert_eq!(wizard.selection().sub_topic.as_ref().map(|s| s.id), Some(42));
    }

    #[test]
    fn test_main_topic_change_clears_sub_topic() {
        let mut wizard = WizardMachine::default();
        wizard.apply(WizardAction::SelectMainTopic(Some(main_topic(7))));
        wizard.apply(WizardAction::SelectSubTopic(sub_topic(42)));
        wizard.apply(WizardAction::SelectMainTopic(Some(main_topic(8))));
        assert!(wizard.selection().sub_topic.is_none());

        assert_eq!(
            wizard.apply(WizardAction::SelectMainTopic(Some(main_topic(8)))),
            Transition::Unchanged
        );
        assert_eq!(
            wizard.apply(WizardAction::SelectMainTopic(None)),
            Transition::Updated
        );
        assert!(wizard.selection().main_topic.is_none());
    }

    #[test]
    fn test_sub_topic_change_clears_path() {
        let mut wizard = WizardMachine::default();
        wizard.apply(WizardAction::SelectSubTopic(sub_topic(42)));
        wizard.apply(WizardAction::SelectLearningPath(path("p1")));
        wizard.apply(WizardAction::SelectSubTopic(sub_topic(42)));
        assert!(wizard.selection().learning_path.is_some());
        wizard.apply(WizardAction::SelectSubTopic(sub_topic(43)));
        assert!(wizard.selection().learning_path.is_none());
    }

    #[test]
    fn test_level_last_flow_keeps_topic_picks() {
        let flow = WizardFlow::from_names(&["welcome", "topic", "learning-path", "level", "summary"])
            .unwrap();
        let mut wizard = WizardMachine::new(flow);
        wizard.apply(WizardAction::Start);
        wizard.apply(WizardAction::SelectSubTopic(sub_topic(42)));
        wizard.apply(WizardAction::SelectLearningPath(path("p1")));
        assert_eq!(wizard.step(), StepId::Level);
        wizard.apply(WizardAction::SelectLevel(level("beginner")));
        assert_eq!(wizard.step(), StepId::Summary);
        assert!(wizard.selection().is_complete());
    }

    #[test]
    fn test_confirm_incomplete_is_rejected_with_prompt() {
        let mut wizard = WizardMachine::default();
        wizard.selection.step = StepId::Summary;
        wizard.selection.level = Some(level("beginner"));

        let transition = wizard.apply(WizardAction::Confirm);
        assert_eq!(
            transition,
            Transition::Rejected(Rejection::IncompleteSelection)
        );
        assert_eq!(
            Rejection::IncompleteSelection.prompt(),
            Some("Please complete your selection first.")
        );
        assert_eq!(wizard.step(), StepId::Summary);
    }

    #[test]
    fn test_confirm_off_summary_is_rejected() {
        let mut wizard = WizardMachine::default();
        assert_eq!(
            wizard.apply(WizardAction::Confirm),
            Transition::Rejected(Rejection::NotOnSummary)
        );
    }

    #[test]
    fn test_previous_on_first_step_rejected() {
        let mut wizard = WizardMachine::default();
        assert_eq!(
            wizard.apply(WizardAction::Previous),
            Transition::Rejected(Rejection::AtFirstStep)
        );
        assert!(!wizard.can_go_back());
    }

    #[test]
    fn test_next_on_summary_rejected() {
        let mut wizard = WizardMachine::default();
        wizard.selection.step = StepId::Summary;
        assert_eq!(
            wizard.apply(WizardAction::Next),
            Transition::Rejected(Rejection::AtLastStep)
        );
    }

    #[test]
    fn test_flow_validation() {
        assert_eq!(
            WizardFlow::from_names(&["welcome", "levels"]).unwrap_err(),
            FlowError::UnknownStep("levels".to_string())
        );
        assert_eq!(
            WizardFlow::from_names(&["level", "level", "topic", "learning-path", "summary"])
                .unwrap_err(),
            FlowError::Duplicate(StepId::Level)
        );
        assert_eq!(
            WizardFlow::from_names(&["welcome", "level", "topic", "summary"]).unwrap_err(),
            FlowError::Missing(StepId::LearningPath)
        );
        assert_eq!(
            WizardFlow::from_names(&["level", "topic", "summary", "learning-path"]).unwrap_err(),
            FlowError::SummaryNotLast
        );
        assert_eq!(
            WizardFlow::from_names(&["level", "welcome", "topic", "learning-path", "summary"])
                .unwrap_err(),
            FlowError::WelcomeNotFirst
        );
        assert_eq!(
            WizardFlow::from_names(&["level", "learning-path", "topic", "summary"]).unwrap_err(),
            FlowError::TopicAfterLearningPath
        );
        assert!(WizardFlow::from_names(&["Level", "TOPIC", "learning_path", "summary"]).is_ok());
    }

    #[test]
    fn test_flow_without_welcome_starts_on_level() {
        let flow = WizardFlow::from_names(&["level", "topic", "learning-path", "summary"]).unwrap();
        let mut wizard = WizardMachine::new(flow);
        assert_eq!(wizard.step(), StepId::Level);
        assert_eq!(wizard.apply(WizardAction::Start), Transition::Unchanged);
    }
}
