//! Level selector

use crate::api::ApiError;
use crate::types::Level;

use super::{step_cursor, FetchSlot, Loadable, Ticket};

/// Levels list for the level step
///
/// Fetched once on mount (`GET /levels/with-stats`) and kept sorted by the
/// backend's ordinal rank.
#[derive(Debug, Default)]
pub struct LevelSelector {
    levels: FetchSlot<Vec<Level>>,
    cursor: usize,
    preferred: Option<String>,
}

impl LevelSelector {
    /// Selector that initially highlights `preferred` once levels arrive
    #[must_use]
    pub fn new(preferred: Option<String>) -> Self {
        Self {
            preferred,
            ..Self::default()
        }
    }

    /// Request levels if they were never requested
    pub fn mount(&mut self) -> Option<Ticket> {
        self.levels.state().is_idle().then(|| self.levels.start())
    }

    /// Request levels again
    pub fn retry(&mut self) -> Ticket {
        self.levels.start()
    }

    /// Apply the levels completion
    pub fn apply(&mut self, ticket: Ticket, result: Result<Vec<Level>, ApiError>) -> bool {
        let result = result.map(|mut levels| {
            levels.sort_by_key(|l| l.order);
            levels
        });
        if !self.levels.finish(ticket, result) {
            return false;
        }
        if let Some(code) = self.preferred.as_deref() {
            if let Some(i) = self.levels().iter().position(|l| l.code == code) {
                self.cursor = i;
            }
        }
        true
    }

    /// Fetch state
    #[must_use]
    pub fn state(&self) -> &Loadable<Vec<Level>> {
        self.levels.state()
    }

    /// Loaded levels (empty while loading)
    #[must_use]
    pub fn levels(&self) -> &[Level] {
        self.levels.value().map_or(&[], Vec::as_slice)
    }

    /// Whether the backend returned no levels
    #[must_use]
    pub fn is_empty_state(&self) -> bool {
        self.levels.value().is_some_and(Vec::is_empty)
    }

    /// Remember the code to highlight (e.g. after a pick)
    pub fn set_preferred(&mut self, code: Option<String>) {
        self.preferred = code;
    }

    /// Move the highlight
    pub fn move_cursor(&mut self, delta: isize) {
        self.cursor = step_cursor(self.cursor, delta, self.levels().len());
    }

    /// Highlight position
    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Highlighted level
    #[must_use]
    pub fn highlighted(&self) -> Option<&Level> {
        self.levels().get(self.cursor)
    }
}
