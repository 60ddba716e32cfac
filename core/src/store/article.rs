//! Article slice
//!
//! Reading state for one (source, level) pair. Every fetch is tagged with
//! the [`Epoch`] that was current when it started; a completion from an
//! older epoch is dropped, so switching level or article never shows stale
//! content.
//!
//! ```text
//!  begin ──► Loading ──ok──► Ready ──► siblings, mark-read
//!               │
//!               ├─404──► Missing ──generate──► Generating ──ok──► Ready
//!               │                                  │
//!               └─err──► Failed ◄──────────err─────┘
//! ```

use crate::api::ApiError;
use crate::routes::Route;
use crate::types::{Article, ArticleNavigation, ReadReceipt};

/// Generation counter for article fetches
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Epoch(u64);

/// What the reader is showing
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ArticleSource {
    /// Article for a curriculum item at the requested level
    CurriculumItem(String),
    /// Article by id
    ArticleId(String),
}

/// Reader status
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ArticleStatus {
    /// Nothing requested (e.g. no level chosen yet)
    Idle,
    /// Fetch in flight
    Loading,
    /// No article exists for this item and level; generation is offered
    Missing,
    /// Generation in flight
    Generating,
    /// Article available
    Ready,
    /// Fetch or generation failed
    Failed(ApiError),
}

/// Outcome of applying an article completion
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ArticleApplied {
    /// Completion belonged to an older epoch and was dropped
    Stale,
    /// Article stored; siblings should be looked up for it
    Ready {
        /// Article id
        article_id: String,
        /// Level to look siblings up at
        level: String,
    },
    /// Backend has no article yet
    Missing,
    /// Error stored
    Failed,
}

/// Article slice
#[derive(Debug, Default)]
pub struct ArticleSlice {
    epoch: Epoch,
    source: Option<ArticleSource>,
    level: Option<String>,
    status: Option<ArticleStatus>,
    article: Option<Article>,
    next: Option<ArticleNavigation>,
    previous: Option<ArticleNavigation>,
    marking_read: bool,
    generation_attempted: bool,
}

impl ArticleSlice {
    /// Start reading `source` at `level`, dropping everything shown before
    pub fn begin(&mut self, source: ArticleSource, level: Option<String>) -> Epoch {
        self.clear();
        self.source = Some(source);
        self.level = level;
        self.status = Some(ArticleStatus::Loading);
        self.epoch
    }

    /// Forget the current article and siblings; in-flight completions become stale
    pub fn clear(&mut self) {
        self.epoch = Epoch(self.epoch.0 + 1);
        self.source = None;
        self.level = None;
        self.status = None;
        self.article = None;
        self.next = None;
        self.previous = None;
        self.marking_read = false;
        self.generation_attempted = false;
    }

    /// Current epoch
    #[must_use]
    pub fn epoch(&self) -> Epoch {
        self.epoch
    }

    /// Source being read
    #[must_use]
    pub fn source(&self) -> Option<&ArticleSource> {
        self.source.as_ref()
    }

    /// Requested level
    #[must_use]
    pub fn level(&self) -> Option<&str> {
        self.level.as_deref()
    }

    /// Reader status
    #[must_use]
    pub fn status(&self) -> &ArticleStatus {
        self.status.as_ref().unwrap_or(&ArticleStatus::Idle)
    }

    /// Article, when ready
    #[must_use]
    pub fn article(&self) -> Option<&Article> {
        self.article.as_ref()
    }

    /// Next sibling
    #[must_use]
    pub fn next(&self) -> Option<&ArticleNavigation> {
        self.next.as_ref()
    }

    /// Previous sibling
    #[must_use]
    pub fn previous(&self) -> Option<&ArticleNavigation> {
        self.previous.as_ref()
    }

    /// Whether a mark-read request is in flight
    #[must_use]
    pub fn is_marking_read(&self) -> bool {
        self.marking_read
    }

    /// Apply a fetch completion
    pub fn apply_article(
        &mut self,
        epoch: Epoch,
        result: Result<Article, ApiError>,
    ) -> ArticleApplied {
        if epoch != self.epoch {
            return ArticleApplied::Stale;
        }
        match result {
            Ok(article) => self.store_ready(article),
            Err(e) if e.is_not_found() && self.can_generate_for_source() => {
                tracing::info!(source = ?self.source, level = ?self.level, "No article yet, offering generation");
                self.status = Some(ArticleStatus::Missing);
                ArticleApplied::Missing
            }
            Err(e) => {
                tracing::warn!(error = %e, detail = ?e.detail, "Failed to load article");
                self.status = Some(ArticleStatus::Failed(e));
                ArticleApplied::Failed
            }
        }
    }

    /// Move to `Generating` if generation is on offer
    ///
    /// Returns the epoch, curriculum item id and level to generate for.
    pub fn begin_generation(&mut self) -> Option<(Epoch, String, String)> {
        let offered = match self.status() {
            ArticleStatus::Missing => true,
            ArticleStatus::Failed(_) => self.generation_attempted,
            _ => false,
        };
        if !offered {
            return None;
        }
        let Some(ArticleSource::CurriculumItem(item_id)) = &self.source else {
            return None;
        };
        let level = self.level.clone()?;
        let item_id = item_id.clone();
        self.status = Some(ArticleStatus::Generating);
        self.generation_attempted = true;
        Some((self.epoch, item_id, level))
    }

    /// Apply a generation completion
    pub fn apply_generated(
        &mut self,
        epoch: Epoch,
        result: Result<Article, ApiError>,
    ) -> ArticleApplied {
        if epoch != self.epoch {
            return ArticleApplied::Stale;
        }
        match result {
            Ok(article) => self.store_ready(article),
            Err(e) => {
                tracing::warn!(error = %e, detail = ?e.detail, "Article generation failed");
                self.status = Some(ArticleStatus::Failed(e));
                ArticleApplied::Failed
            }
        }
    }

    /// Apply the next-sibling lookup; failures leave the slot empty
    pub fn apply_next(
        &mut self,
        epoch: Epoch,
        result: Result<Option<ArticleNavigation>, ApiError>,
    ) -> bool {
        if epoch != self.epoch {
            return false;
        }
        match result {
            Ok(next) => self.next = next,
            Err(e) => tracing::warn!(error = %e, "Next article lookup failed"),
        }
        true
    }

    /// Apply the previous-sibling lookup; failures leave the slot empty
    pub fn apply_previous(
        &mut self,
        epoch: Epoch,
        result: Result<Option<ArticleNavigation>, ApiError>,
    ) -> bool {
        if epoch != self.epoch {
            return false;
        }
        match result {
            Ok(previous) => self.previous = previous,
            Err(e) => tracing::warn!(error = %e, "Previous article lookup failed"),
        }
        true
    }

    /// Start marking the current article read
    ///
    /// `None` when there is no ready article, it is already read, or a
    /// request is in flight.
    pub fn begin_mark_read(&mut self) -> Option<(Epoch, String)> {
        if self.marking_read {
            return None;
        }
        let article = self.article.as_ref().filter(|a| !a.is_read())?;
        let id = article.article_id.clone();
        self.marking_read = true;
        Some((self.epoch, id))
    }

    /// Apply the mark-read acknowledgment
    ///
    /// The read flag only flips after the backend acknowledged; failures are
    /// logged and otherwise ignored.
    pub fn apply_mark_read(
        &mut self,
        epoch: Epoch,
        article_id: &str,
        result: Result<ReadReceipt, ApiError>,
    ) -> bool {
        if epoch != self.epoch {
            return false;
        }
        self.marking_read = false;
        match result {
            Ok(_) => {
                if let Some(article) = self.article.as_mut().filter(|a| a.article_id == article_id) {
                    article.is_read = Some(true);
                }
                true
            }
            Err(e) => {
                tracing::warn!(article_id = %article_id, error = %e, "Failed to mark article read");
                false
            }
        }
    }

    /// Route to the next sibling
    #[must_use]
    pub fn next_route(&self) -> Option<Route> {
        self.next.as_ref().map(sibling_route)
    }

    /// Route to the previous sibling
    #[must_use]
    pub fn previous_route(&self) -> Option<Route> {
        self.previous.as_ref().map(sibling_route)
    }

    /// Leave the current article for its next sibling
    ///
    /// Clears the slice and returns the route to open, or `None` (leaving
    /// everything as is) when there is no next sibling.
    pub fn advance_next(&mut self) -> Option<Route> {
        let route = self.next_route()?;
        self.clear();
        Some(route)
    }

    fn can_generate_for_source(&self) -> bool {
        matches!(self.source, Some(ArticleSource::CurriculumItem(_))) && self.level.is_some()
    }

    fn store_ready(&mut self, article: Article) -> ArticleApplied {
        let level = self
            .level
            .clone()
            .unwrap_or_else(|| article.level_code.clone());
        let article_id = article.article_id.clone();
        tracing::debug!(article_id = %article_id, level = %level, "Article ready");
        self.article = Some(article);
        self.status = Some(ArticleStatus::Ready);
        ArticleApplied::Ready { article_id, level }
    }
}

fn sibling_route(nav: &ArticleNavigation) -> Route {
    Route::ReadCurriculumItem {
        item_id: nav.curriculum_item_id.clone(),
        level: Some(nav.level_code.clone()),
    }
}
