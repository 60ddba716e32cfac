//! User Events
//!
//! Everything a surface can ask the controller to do. Surfaces translate
//! their input (keys, clicks, CLI flags) into these and never touch the
//! store directly.

use crate::routes::Route;
use crate::types::{CuratedSubTopic, LearningPath, Level, MainTopic};

/// A user action
#[derive(Clone, Debug, PartialEq)]
pub enum UserEvent {
    /// Open a route, remembering the current one for `Back`
    Navigate(Route),
    /// Return to the previous route
    Back,

    /// Leave the welcome step
    Start,
    /// Wizard forward
    Next,
    /// Wizard back
    Previous,
    /// Clear the wizard
    Reset,
    /// Confirm the wizard selection
    Confirm,
    /// Pick a level (wizard, curriculum and reader)
    PickLevel(Level),
    /// Pick or toggle a main topic
    PickMainTopic(MainTopic),
    /// Pick a sub-topic
    PickSubTopic(CuratedSubTopic),
    /// Pick a learning path
    PickLearningPath(LearningPath),
    /// Change the main topic search query
    Search(String),
    /// Next page of main topics
    NextPage,
    /// Previous page of main topics
    PreviousPage,
    /// Generate a learning path for the selected sub-topic
    GenerateLearningPath,

    /// Open a curriculum item at the selected level
    OpenCurriculumItem(String),
    /// Switch to the level `n` places away (curriculum and reader)
    CycleLevel(isize),

    /// Generate the missing article
    GenerateArticle,
    /// Mark the current article read
    MarkRead,
    /// Open the next article
    NextArticle,
    /// Open the previous article
    PreviousArticle,

    /// Move the highlight in the current list
    MoveCursor(isize),
    /// Act on the highlighted entry
    Activate,
    /// Re-issue failed fetches on the current page
    Retry,
    /// Hide the toast
    DismissToast,
}
