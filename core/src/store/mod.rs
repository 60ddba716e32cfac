//! Client-Side Store
//!
//! One explicit application-state object with three slices:
//!
//! - [`WizardSlice`]: the selection wizard and the preferences persisted
//!   between runs
//! - [`ArticleSlice`]: the article being read, its siblings and read state
//! - [`UiState`]: global loading flag, global error and the toast
//!
//! The store is owned by the controller and only mutated from the task
//! that drives it; it holds no locks.

mod article;
mod persist;
mod ui;
mod wizard;

use std::time::Duration;

pub use article::{ArticleApplied, ArticleSlice, ArticleSource, ArticleStatus, Epoch};
pub use persist::{PersistError, PersistedSelection, SelectionStore};
pub use ui::{Toast, ToastKind, UiState, DEFAULT_TOAST_DURATION};
pub use wizard::WizardSlice;

use crate::wizard::WizardFlow;

/// Application state
#[derive(Debug, Default)]
pub struct AppStore {
    /// Wizard slice
    pub wizard: WizardSlice,
    /// Article slice
    pub article: ArticleSlice,
    /// UI slice
    pub ui: UiState,
}

impl AppStore {
    /// Store for `flow`, with preferences restored from the last run
    #[must_use]
    pub fn new(flow: WizardFlow, restored: PersistedSelection, toast_duration: Duration) -> Self {
        Self {
            wizard: WizardSlice::new(flow, restored),
            article: ArticleSlice::default(),
            ui: UiState::new(toast_duration),
        }
    }
}
