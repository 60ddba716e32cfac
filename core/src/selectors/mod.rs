//! Selector State
//!
//! Each wizard step mounts a selector that owns the lists it fetched and
//! their loading/error state. Selectors never perform I/O: they hand out
//! fetch descriptors tagged with a [`Ticket`], the controller runs them, and
//! the completion is applied back with the same ticket. A completion whose
//! ticket is no longer the latest for its slot is dropped, which covers both
//! dependency changes and unmounting.

mod learning_path;
mod level;
mod topic;

pub use learning_path::{LearningPathFetch, LearningPathSelector};
pub use level::LevelSelector;
pub use topic::{TopicEntry, TopicFetch, TopicSelector, POPULAR_LIMIT, TOPIC_PAGE_SIZE};

use crate::api::ApiError;

/// Identifies one issued fetch
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Ticket(u64);

/// State of something fetched from the backend
#[derive(Clone, Debug, PartialEq)]
pub enum Loadable<T> {
    /// Not requested
    Idle,
    /// Request in flight
    Loading,
    /// Request failed
    Failed(ApiError),
    /// Value available
    Loaded(T),
}

impl<T> Default for Loadable<T> {
    fn default() -> Self {
        Self::Idle
    }
}

impl<T> Loadable<T> {
    /// Loaded value
    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Loaded(v) => Some(v),
            _ => None,
        }
    }

    /// Error, if the last request failed
    pub fn error(&self) -> Option<&ApiError> {
        match self {
            Self::Failed(e) => Some(e),
            _ => None,
        }
    }

    /// Whether a request is in flight
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// Whether nothing has been requested
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }
}

/// A [`Loadable`] plus the ticket of the latest request
#[derive(Clone, Debug, PartialEq)]
pub struct FetchSlot<T> {
    latest: u64,
    state: Loadable<T>,
}

impl<T> Default for FetchSlot<T> {
    fn default() -> Self {
        Self {
            latest: 0,
            state: Loadable::Idle,
        }
    }
}

impl<T> FetchSlot<T> {
    /// Issue a new request; earlier tickets become stale
    pub fn start(&mut self) -> Ticket {
        self.latest += 1;
        self.state = Loadable::Loading;
        Ticket(self.latest)
    }

    /// Apply a completion; returns `false` when the ticket is stale
    pub fn finish(&mut self, ticket: Ticket, result: Result<T, ApiError>) -> bool {
        if ticket.0 != self.latest || !self.state.is_loading() {
            return false;
        }
        self.state = match result {
            Ok(value) => Loadable::Loaded(value),
            Err(e) => Loadable::Failed(e),
        };
        true
    }

    /// Drop the value and invalidate in-flight requests
    pub fn cancel(&mut self) {
        self.latest += 1;
        self.state = Loadable::Idle;
    }

    /// Current state
    pub fn state(&self) -> &Loadable<T> {
        &self.state
    }

    /// Mutable access to a loaded value
    pub fn value_mut(&mut self) -> Option<&mut T> {
        match &mut self.state {
            Loadable::Loaded(v) => Some(v),
            _ => None,
        }
    }

    /// Loaded value
    pub fn value(&self) -> Option<&T> {
        self.state.value()
    }
}

/// Clamp-and-move helper for list highlights
pub(crate) fn step_cursor(cursor: usize, delta: isize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    let max = len - 1;
    if delta.is_negative() {
        cursor.saturating_sub(delta.unsigned_abs())
    } else {
        cursor.saturating_add(delta.unsigned_abs()).min(max)
    }
}
