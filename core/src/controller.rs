//! Page Flow Controller
//!
//! The controller is the single owner of application state: current route,
//! navigation history, current page and the [`AppStore`]. Surfaces feed it
//! [`UserEvent`]s; it mutates state synchronously and spawns the fetches the
//! change calls for.
//!
//! # Fetch Lifecycle
//!
//! ```text
//!  handle_event ──► page/selector hands out (ticket, request)
//!        │
//!        └──► tokio::spawn(service call) ──► mpsc ──► poll_completions / settle
//!                                                          │
//!                                  page serial + ticket/epoch still current?
//!                                         yes: apply     no: drop
//! ```
//!
//! Every navigation bumps the page serial, so completions for a page that
//! is gone are dropped even if the new page reuses ticket numbers.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use crate::api::{ApiResult, Transport};
use crate::config::{InfouConfig, ReaderConfig};
use crate::events::UserEvent;
use crate::pages::{CurriculumData, CurriculumPage, HomePage, Page, ProfilePage, ReaderPage};
use crate::routes::Route;
use crate::selectors::{LearningPathFetch, Ticket, TopicEntry, TopicFetch, POPULAR_LIMIT};
use crate::services::Services;
use crate::store::{
    AppStore, ArticleApplied, ArticleSource, ArticleStatus, Epoch, PersistedSelection,
    SelectionStore, ToastKind,
};
use crate::types::{
    self, Article, ArticleNavigation, CurriculumItem, CuratedSubTopic, GenerateArticleRequest,
    LearningPath, LearningPathDetail, Level, MainTopic, Progress, ReadReceipt,
};
use crate::wizard::{StepId, Transition, WizardAction, WizardFlow};

/// Global error shown while the selection file cannot be written
pub const SAVE_FAILED: &str = "Could not save your selection.";

/// Settings the controller needs from configuration
#[derive(Clone, Debug)]
pub struct ControllerOptions {
    /// Wizard step order
    pub flow: WizardFlow,
    /// Article generation settings
    pub reader: ReaderConfig,
    /// Items requested when generating a learning path
    pub learning_path_items: u32,
    /// Toast lifetime
    pub toast_duration: Duration,
    /// User for the progress page
    pub user_id: Option<String>,
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self::from(&InfouConfig::default())
    }
}

impl From<&InfouConfig> for ControllerOptions {
    fn from(config: &InfouConfig) -> Self {
        Self {
            flow: config.wizard_flow.clone(),
            reader: config.reader.clone(),
            learning_path_items: config.learning_path_items,
            toast_duration: Duration::from_millis(config.toast_duration_ms),
            user_id: config.api.user_id.clone(),
        }
    }
}

/// A finished background operation
#[derive(Debug)]
enum Completion {
    HomeLevels {
        serial: u64,
        ticket: Ticket,
        result: ApiResult<Vec<Level>>,
    },
    MainTopics {
        serial: u64,
        ticket: Ticket,
        result: ApiResult<types::Page<MainTopic>>,
    },
    Popular {
        serial: u64,
        ticket: Ticket,
        result: ApiResult<Vec<CuratedSubTopic>>,
    },
    SubTopics {
        serial: u64,
        ticket: Ticket,
        result: ApiResult<Vec<CuratedSubTopic>>,
    },
    LearningPaths {
        serial: u64,
        ticket: Ticket,
        result: ApiResult<Vec<LearningPath>>,
    },
    GeneratedPath {
        serial: u64,
        ticket: Ticket,
        result: ApiResult<LearningPathDetail>,
    },
    Preview {
        path_id: String,
        result: ApiResult<Vec<CurriculumItem>>,
    },
    Curriculum {
        serial: u64,
        ticket: Ticket,
        result: ApiResult<CurriculumData>,
    },
    ReaderLevels {
        serial: u64,
        ticket: Ticket,
        result: ApiResult<Vec<Level>>,
    },
    Article {
        epoch: Epoch,
        result: ApiResult<Article>,
    },
    GeneratedArticle {
        epoch: Epoch,
        result: ApiResult<Article>,
    },
    NextArticle {
        epoch: Epoch,
        result: ApiResult<Option<ArticleNavigation>>,
    },
    PreviousArticle {
        epoch: Epoch,
        result: ApiResult<Option<ArticleNavigation>>,
    },
    MarkedRead {
        epoch: Epoch,
        article_id: String,
        result: ApiResult<ReadReceipt>,
    },
    Progress {
        serial: u64,
        ticket: Ticket,
        result: ApiResult<Progress>,
    },
    Saved {
        failed: bool,
    },
    ToastExpired(u64),
}

impl Completion {
    /// Toast timers are not fetches and are not awaited by `settle`
    fn is_fetch(&self) -> bool {
        !matches!(self, Self::ToastExpired(_))
    }
}

/// Work the home page asks for
enum HomeFetch {
    Levels(Ticket),
    Topic(TopicFetch),
    Path(LearningPathFetch),
    Preview(String),
}

/// Application controller
pub struct Controller<T: ?Sized> {
    services: Services<T>,
    options: ControllerOptions,
    store: AppStore,
    selection_store: SelectionStore,
    route: Route,
    history: Vec<Route>,
    page: Page,
    page_serial: u64,
    in_flight: usize,
    tx: mpsc::UnboundedSender<Completion>,
    rx: mpsc::UnboundedReceiver<Completion>,
}

impl<T: Transport + ?Sized + 'static> Controller<T> {
    /// Controller on the home route; call [`Controller::start`] to load it
    #[must_use]
    pub fn new(
        services: Services<T>,
        options: ControllerOptions,
        restored: PersistedSelection,
        selection_store: SelectionStore,
    ) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let store = AppStore::new(options.flow.clone(), restored, options.toast_duration);
        let page = Page::Home(HomePage::new(
            store.wizard.preferences(),
            options.learning_path_items,
        ));
        Self {
            services,
            options,
            store,
            selection_store,
            route: Route::Home,
            history: Vec::new(),
            page,
            page_serial: 0,
            in_flight: 0,
            tx,
            rx,
        }
    }

    /// Build a controller from configuration, restoring the persisted selection
    pub async fn bootstrap(
        transport: Arc<T>,
        config: &InfouConfig,
        selection_store: SelectionStore,
    ) -> Self {
        let selection_store = if config.persist_selection {
            selection_store
        } else {
            SelectionStore::disabled()
        };
        let restored = selection_store.load().await;
        let services = Services::new(transport, config.api.auth_token.clone());
        Self::new(
            services,
            ControllerOptions::from(config),
            restored,
            selection_store,
        )
    }

    /// Open the first route (no history entry)
    pub fn start(&mut self, route: Route) {
        self.open(route);
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Current route
    #[must_use]
    pub fn route(&self) -> &Route {
        &self.route
    }

    /// Current page
    #[must_use]
    pub fn page(&self) -> &Page {
        &self.page
    }

    /// Application state
    #[must_use]
    pub fn store(&self) -> &AppStore {
        &self.store
    }

    /// Options in effect
    #[must_use]
    pub fn options(&self) -> &ControllerOptions {
        &self.options
    }

    /// Whether `Back` has somewhere to go
    #[must_use]
    pub fn can_go_back(&self) -> bool {
        !self.history.is_empty()
    }

    /// Whether no fetch is in flight
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.in_flight == 0
    }

    // ========================================================================
    // Event Handling
    // ========================================================================

    /// Apply one user event
    pub fn handle_event(&mut self, event: UserEvent) {
        tracing::debug!(?event, page = self.page.name(), "User event");
        match event {
            UserEvent::Navigate(route) => self.navigate(route),
            UserEvent::Back => self.back(),

            UserEvent::Start => self.dispatch_wizard(WizardAction::Start),
            UserEvent::Next => self.dispatch_wizard(WizardAction::Next),
            UserEvent::Previous => self.dispatch_wizard(WizardAction::Previous),
            UserEvent::Reset => self.dispatch_wizard(WizardAction::Reset),
            UserEvent::Confirm => self.dispatch_wizard(WizardAction::Confirm),
            UserEvent::PickLevel(level) => self.pick_level(level),
            UserEvent::PickMainTopic(topic) => {
                if let Page::Home(home) = &self.page {
                    let pick = home.topics.pick_main_topic(&topic);
                    self.dispatch_wizard(WizardAction::SelectMainTopic(pick));
                }
            }
            UserEvent::PickSubTopic(sub_topic) => {
                self.dispatch_wizard(WizardAction::SelectSubTopic(sub_topic));
            }
            UserEvent::PickLearningPath(path) => {
                self.dispatch_wizard(WizardAction::SelectLearningPath(path));
            }
            UserEvent::Search(query) => {
                let fetch = self.home_mut().and_then(|h| h.topics.set_search(query));
                self.spawn_home(fetch.map(HomeFetch::Topic));
            }
            UserEvent::NextPage => {
                let fetch = self.home_mut().and_then(|h| h.topics.next_page());
                self.spawn_home(fetch.map(HomeFetch::Topic));
            }
            UserEvent::PreviousPage => {
                let fetch = self.home_mut().and_then(|h| h.topics.previous_page());
                self.spawn_home(fetch.map(HomeFetch::Topic));
            }
            UserEvent::GenerateLearningPath => {
                let fetch = self.home_mut().and_then(|h| h.paths.begin_generate());
                self.spawn_home(fetch.map(HomeFetch::Path));
            }

            UserEvent::OpenCurriculumItem(item_id) => {
                if let Page::Curriculum(page) = &self.page {
                    let opened = page.open_item(&item_id);
                    self.follow_curriculum(opened.map(Some));
                }
            }
            UserEvent::CycleLevel(delta) => self.cycle_level(delta),

            UserEvent::GenerateArticle => {
                self.generate_article();
            }
            UserEvent::MarkRead => self.mark_read(),
            UserEvent::NextArticle => {
                if let Some(route) = self.store.article.advance_next() {
                    self.navigate(route);
                }
            }
            UserEvent::PreviousArticle => {
                if let Some(route) = self.store.article.previous_route() {
                    self.navigate(route);
                }
            }

            UserEvent::MoveCursor(delta) => self.move_cursor(delta),
            UserEvent::Activate => self.activate(),
            UserEvent::Retry => self.retry(),
            UserEvent::DismissToast => self.store.ui.clear_toast(),
        }
    }

    /// Apply every completion that has arrived; returns how many were applied
    pub fn poll_completions(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(completion) = self.rx.try_recv() {
            self.apply(completion);
            applied += 1;
        }
        applied
    }

    /// Wait until no fetch is in flight, applying completions as they arrive
    ///
    /// Fetches started by applied completions are awaited too.
    pub async fn settle(&mut self) {
        self.poll_completions();
        while self.in_flight > 0 {
            match self.rx.recv().await {
                Some(completion) => self.apply(completion),
                None => break,
            }
        }
    }

    // ========================================================================
    // Navigation
    // ========================================================================

    fn navigate(&mut self, route: Route) {
        if route != self.route {
            self.history.push(self.route.clone());
        }
        self.open(route);
    }

    fn back(&mut self) {
        if let Some(previous) = self.history.pop() {
            self.open(previous);
        }
    }

    /// Update the route without reloading the page or touching history
    fn replace(&mut self, route: Route) {
        tracing::debug!(route = %route, "Replacing route");
        self.route = route;
    }

    fn open(&mut self, route: Route) {
        tracing::info!(route = %route, "Opening route");
        self.page_serial += 1;
        self.store.article.clear();
        self.route = route.clone();
        let serial = self.page_serial;

        match route {
            Route::Home => {
                self.page = Page::Home(HomePage::new(
                    self.store.wizard.preferences(),
                    self.options.learning_path_items,
                ));
                self.sync_home();
                self.mount_step();
            }
            Route::Curriculum { path_id, level } => {
                let mut page = CurriculumPage::new(path_id.clone(), level);
                let ticket = page.start();
                self.page = Page::Curriculum(page);
                let services = self.services.clone();
                self.spawn(async move {
                    let result = futures::future::try_join(
                        services.learning_paths.detail(&path_id),
                        services.levels.list(),
                    )
                    .await
                    .map(|(path, levels)| CurriculumData { path, levels });
                    Completion::Curriculum {
                        serial,
                        ticket,
                        result,
                    }
                });
            }
            Route::ReadCurriculumItem { item_id, level } => {
                self.open_reader(ArticleSource::CurriculumItem(item_id), level);
            }
            Route::Article { id } => {
                self.open_reader(ArticleSource::ArticleId(id.clone()), None);
                self.begin_article(ArticleSource::ArticleId(id), None);
            }
            Route::Profile => {
                let mut page = ProfilePage::new(self.options.user_id.clone());
                let started = page.start();
                self.page = Page::Profile(page);
                if let Some((ticket, user_id)) = started {
                    self.spawn_progress(serial, ticket, user_id);
                }
            }
        }
    }

    fn open_reader(&mut self, source: ArticleSource, level: Option<String>) {
        let serial = self.page_serial;
        let mut page = ReaderPage::new(source, level);
        let ticket = page.start();
        self.page = Page::Reader(page);
        self.spawn_reader_levels(serial, ticket);
    }

    // ========================================================================
    // Home / Wizard
    // ========================================================================

    fn home_mut(&mut self) -> Option<&mut HomePage> {
        match &mut self.page {
            Page::Home(home) => Some(home),
            _ => None,
        }
    }

    fn dispatch_wizard(&mut self, action: WizardAction) {
        if !matches!(self.page, Page::Home(_)) {
            return;
        }
        let transition = self.store.wizard.dispatch(action);
        self.sync_home();
        match transition {
            Transition::Navigate(route) => self.navigate(route),
            Transition::Rejected(rejection) => match rejection.prompt() {
                Some(prompt) => self.toast(ToastKind::Error, prompt),
                None => tracing::debug!(?rejection, "Wizard action rejected"),
            },
            Transition::Moved { .. } => self.mount_step(),
            Transition::Updated | Transition::Unchanged => {}
        }
        self.persist_if_dirty();
    }

    /// Push the wizard selection into the selectors that depend on it
    fn sync_home(&mut self) {
        let selection = self.store.wizard.selection().clone();
        let Some(home) = self.home_mut() else {
            return;
        };

        let mut fetches: Vec<HomeFetch> = home
            .topics
            .set_level(selection.level.clone())
            .into_iter()
            .map(HomeFetch::Topic)
            .collect();
        fetches.extend(
            home.topics
                .set_main_topic(selection.main_topic.clone())
                .map(HomeFetch::Topic),
        );
        fetches.extend(
            home.paths
                .set_dependencies(
                    selection.sub_topic.clone(),
                    selection.level.as_ref().map(|l| l.code.clone()),
                )
                .map(HomeFetch::Path),
        );
        if let Some(level) = &selection.level {
            home.levels.set_preferred(Some(level.code.clone()));
        }

        for fetch in fetches {
            self.spawn_home(Some(fetch));
        }
    }

    /// Fetch whatever the current step shows and has not loaded
    fn mount_step(&mut self) {
        let step = self.store.wizard.machine().step();
        let preview_for = (step == StepId::Summary && self.store.wizard.preview().is_empty())
            .then(|| {
                self.store
                    .wizard
                    .selection()
                    .learning_path
                    .as_ref()
                    .map(|p| p.path_id.clone())
            })
            .flatten();
        let Some(home) = self.home_mut() else {
            return;
        };

        let fetches: Vec<HomeFetch> = match step {
            StepId::Welcome => Vec::new(),
            StepId::Level => home.levels.mount().map(HomeFetch::Levels).into_iter().collect(),
            StepId::Topic => home.topics.mount().into_iter().map(HomeFetch::Topic).collect(),
            StepId::LearningPath => home.paths.mount().map(HomeFetch::Path).into_iter().collect(),
            StepId::Summary => preview_for.map(HomeFetch::Preview).into_iter().collect(),
        };
        for fetch in fetches {
            self.spawn_home(Some(fetch));
        }
    }

    fn pick_level(&mut self, level: Level) {
        match &mut self.page {
            Page::Home(_) => self.dispatch_wizard(WizardAction::SelectLevel(level)),
            Page::Curriculum(page) => {
                let route = page.select_level(level);
                self.replace(route);
            }
            Page::Reader(_) => self.change_reader_level(level),
            Page::Profile(_) => {}
        }
    }

    fn cycle_level(&mut self, delta: isize) {
        match &mut self.page {
            Page::Curriculum(page) => {
                if let Some(route) = page.cycle_level(delta) {
                    self.replace(route);
                }
            }
            Page::Reader(page) => {
                if let Some(level) = page.cycled_level(delta) {
                    self.change_reader_level(level);
                }
            }
            Page::Home(_) | Page::Profile(_) => {}
        }
    }

    fn follow_curriculum(&mut self, opened: Result<Option<Route>, &'static str>) {
        match opened {
            Ok(Some(route)) => self.navigate(route),
            Ok(None) => {}
            Err(prompt) => self.toast(ToastKind::Error, prompt),
        }
    }

    fn move_cursor(&mut self, delta: isize) {
        let step = self.store.wizard.machine().step();
        match &mut self.page {
            Page::Home(home) => match step {
                StepId::Level => home.levels.move_cursor(delta),
                StepId::Topic => home.topics.move_cursor(delta),
                StepId::LearningPath => home.paths.move_cursor(delta),
                StepId::Welcome | StepId::Summary => {}
            },
            Page::Curriculum(page) => page.move_cursor(delta),
            Page::Reader(_) | Page::Profile(_) => {}
        }
    }

    fn activate(&mut self) {
        if let Page::Curriculum(page) = &self.page {
            let opened = page.open_highlighted();
            self.follow_curriculum(opened);
            return;
        }
        let step = self.store.wizard.machine().step();
        let event = match &self.page {
            Page::Home(home) => match step {
                StepId::Welcome => Some(UserEvent::Start),
                StepId::Level => home.levels.highlighted().cloned().map(UserEvent::PickLevel),
                StepId::Topic => home.topics.highlighted().map(|entry| match entry {
                    TopicEntry::Main(topic) => UserEvent::PickMainTopic(topic.clone()),
                    TopicEntry::Popular(sub) | TopicEntry::Sub(sub) => {
                        UserEvent::PickSubTopic(sub.clone())
                    }
                }),
                StepId::LearningPath => match home.paths.highlighted() {
                    Some(path) => Some(UserEvent::PickLearningPath(path.clone())),
                    None if home.paths.can_generate() => Some(UserEvent::GenerateLearningPath),
                    None => None,
                },
                StepId::Summary => Some(UserEvent::Confirm),
            },
            Page::Curriculum(_) | Page::Profile(_) => None,
            Page::Reader(_) => match self.store.article.status() {
                ArticleStatus::Missing => Some(UserEvent::GenerateArticle),
                ArticleStatus::Ready => Some(UserEvent::MarkRead),
                _ => None,
            },
        };
        if let Some(event) = event {
            self.handle_event(event);
        }
    }

    fn retry(&mut self) {
        let serial = self.page_serial;
        let step = self.store.wizard.machine().step();
        match &mut self.page {
            Page::Home(home) => {
                let fetches: Vec<HomeFetch> = match step {
                    StepId::Level if home.levels.state().error().is_some() => {
                        vec![HomeFetch::Levels(home.levels.retry())]
                    }
                    StepId::Topic => home.topics.retry().into_iter().map(HomeFetch::Topic).collect(),
                    StepId::LearningPath => home.paths.retry().map(HomeFetch::Path).into_iter().collect(),
                    _ => Vec::new(),
                };
                for fetch in fetches {
                    self.spawn_home(Some(fetch));
                }
            }
            Page::Curriculum(page) => {
                if page.state().error().is_some() {
                    let route = self.route.clone();
                    self.open(route);
                }
            }
            Page::Reader(page) => {
                if page.levels_state().error().is_some() {
                    let ticket = page.start();
                    self.spawn_reader_levels(serial, ticket);
                } else if matches!(self.store.article.status(), ArticleStatus::Failed(_)) {
                    // a failed generation is retried as a generation
                    if !self.generate_article() {
                        self.reload_article();
                    }
                }
            }
            Page::Profile(page) => {
                if let Some((ticket, user_id)) = page.start() {
                    self.spawn_progress(serial, ticket, user_id);
                }
            }
        }
    }

    // ========================================================================
    // Reader
    // ========================================================================

    fn reader_source(&self) -> Option<ArticleSource> {
        match &self.page {
            Page::Reader(page) => Some(page.source().clone()),
            _ => None,
        }
    }

    fn reload_article(&mut self) {
        let Some(source) = self.reader_source() else {
            return;
        };
        let level = match (&source, &self.page) {
            (ArticleSource::CurriculumItem(_), Page::Reader(page)) => {
                page.selected_level().map(|l| l.code.clone())
            }
            _ => None,
        };
        self.begin_article(source, level);
    }

    fn begin_article(&mut self, source: ArticleSource, level: Option<String>) {
        let services = self.services.clone();
        match source {
            ArticleSource::CurriculumItem(item_id) => {
                let Some(level) = level else {
                    self.store.article.clear();
                    return;
                };
                let epoch = self
                    .store
                    .article
                    .begin(ArticleSource::CurriculumItem(item_id.clone()), Some(level.clone()));
                self.spawn(async move {
                    let result = services.articles.for_item_and_level(&item_id, &level).await;
                    Completion::Article { epoch, result }
                });
            }
            ArticleSource::ArticleId(id) => {
                let epoch = self
                    .store
                    .article
                    .begin(ArticleSource::ArticleId(id.clone()), level);
                self.spawn(async move {
                    let result = services.articles.get(&id).await;
                    Completion::Article { epoch, result }
                });
            }
        }
    }

    fn change_reader_level(&mut self, level: Level) {
        let item_id = self
            .store
            .article
            .article()
            .map(|a| a.curriculum_item_id.clone());
        let Page::Reader(page) = &mut self.page else {
            return;
        };
        let Some(route) = page.select_level(level, item_id.as_deref()) else {
            return;
        };
        let source = page.source().clone();
        let code = route.level().map(str::to_string);
        self.replace(route);
        self.begin_article(source, code);
    }

    fn generate_article(&mut self) -> bool {
        let Some((epoch, item_id, level)) = self.store.article.begin_generation() else {
            return false;
        };
        let request = GenerateArticleRequest {
            level,
            content_style: self.options.reader.content_style.clone(),
            word_count: self.options.reader.word_count,
        };
        tracing::info!(item_id = %item_id, level = %request.level, "Generating article");
        let services = self.services.clone();
        self.spawn(async move {
            let result = services.articles.generate(&item_id, &request).await;
            Completion::GeneratedArticle { epoch, result }
        });
        true
    }

    fn mark_read(&mut self) {
        let Some((epoch, article_id)) = self.store.article.begin_mark_read() else {
            return;
        };
        let services = self.services.clone();
        self.spawn(async move {
            let result = services.articles.mark_read(&article_id).await;
            Completion::MarkedRead {
                epoch,
                article_id,
                result,
            }
        });
    }

    fn after_article(&mut self, applied: ArticleApplied) {
        let ArticleApplied::Ready { article_id, level } = applied else {
            return;
        };
        if let Page::Reader(page) = &mut self.page {
            page.note_article_level(&level);
        }

        // Siblings load independently; either may fail without the other
        let epoch = self.store.article.epoch();
        let services = self.services.clone();
        let (id, lvl) = (article_id.clone(), level.clone());
        self.spawn(async move {
            let result = services.articles.next(&id, Some(&lvl)).await;
            Completion::NextArticle { epoch, result }
        });
        let services = self.services.clone();
        self.spawn(async move {
            let result = services.articles.previous(&article_id, Some(&level)).await;
            Completion::PreviousArticle { epoch, result }
        });
    }

    // ========================================================================
    // Completions
    // ========================================================================

    fn apply(&mut self, completion: Completion) {
        if completion.is_fetch() {
            self.in_flight = self.in_flight.saturating_sub(1);
        }
        let current = self.page_serial;

        match completion {
            Completion::HomeLevels {
                serial,
                ticket,
                result,
            } => {
                if let Some(home) = self.home_mut().filter(|_| serial == current) {
                    home.levels.apply(ticket, result);
                }
            }
            Completion::MainTopics {
                serial,
                ticket,
                result,
            } => {
                if let Some(home) = self.home_mut().filter(|_| serial == current) {
                    home.topics.apply_main_topics(ticket, result);
                }
            }
            Completion::Popular {
                serial,
                ticket,
                result,
            } => {
                if let Some(home) = self.home_mut().filter(|_| serial == current) {
                    home.topics.apply_popular(ticket, result);
                }
            }
            Completion::SubTopics {
                serial,
                ticket,
                result,
            } => {
                if let Some(home) = self.home_mut().filter(|_| serial == current) {
                    home.topics.apply_sub_topics(ticket, result);
                }
            }
            Completion::LearningPaths {
                serial,
                ticket,
                result,
            } => {
                if let Some(home) = self.home_mut().filter(|_| serial == current) {
                    home.paths.apply_paths(ticket, result);
                }
            }
            Completion::GeneratedPath {
                serial,
                ticket,
                result,
            } => {
                let failed = result.as_ref().err().map(|e| e.message.clone());
                let generated = self
                    .home_mut()
                    .filter(|_| serial == current)
                    .and_then(|home| home.paths.apply_generated(ticket, result));
                match (generated, failed) {
                    (Some(path), _) => {
                        self.toast(ToastKind::Success, format!("Generated \"{}\".", path.title));
                    }
                    (None, Some(message)) if serial == current => {
                        self.toast(ToastKind::Error, message);
                    }
                    _ => {}
                }
            }
            Completion::Preview { path_id, result } => match result {
                Ok(items) => self.store.wizard.load_preview(&path_id, items),
                Err(e) => tracing::debug!(path_id = %path_id, error = %e, "Curriculum preview unavailable"),
            },
            Completion::Curriculum {
                serial,
                ticket,
                result,
            } => {
                if let Page::Curriculum(page) = &mut self.page {
                    if serial == current {
                        page.apply(ticket, result);
                    }
                }
            }
            Completion::ReaderLevels {
                serial,
                ticket,
                result,
            } => {
                let resolved = match &mut self.page {
                    Page::Reader(page) if serial == current => page.apply_levels(ticket, result),
                    _ => None,
                };
                let source = self.reader_source();
                let already_reading = self.store.article.source().is_some();
                if let (Some(level), Some(source @ ArticleSource::CurriculumItem(_))) =
                    (resolved, source)
                {
                    if !already_reading {
                        self.begin_article(source, Some(level.code));
                    }
                }
            }
            Completion::Article { epoch, result } => {
                let applied = self.store.article.apply_article(epoch, result);
                self.after_article(applied);
            }
            Completion::GeneratedArticle { epoch, result } => {
                let applied = self.store.article.apply_generated(epoch, result);
                match &applied {
                    ArticleApplied::Ready { .. } => {
                        self.toast(ToastKind::Success, "Article generated.");
                    }
                    ArticleApplied::Failed => {
                        self.toast(ToastKind::Error, "Could not generate the article. Please try again.");
                    }
                    ArticleApplied::Stale | ArticleApplied::Missing => {}
                }
                self.after_article(applied);
            }
            Completion::NextArticle { epoch, result } => {
                self.store.article.apply_next(epoch, result);
            }
            Completion::PreviousArticle { epoch, result } => {
                self.store.article.apply_previous(epoch, result);
            }
            Completion::MarkedRead {
                epoch,
                article_id,
                result,
            } => {
                if self.store.article.apply_mark_read(epoch, &article_id, result) {
                    self.toast(ToastKind::Success, "Marked as read.");
                }
            }
            Completion::Progress {
                serial,
                ticket,
                result,
            } => {
                if let Page::Profile(page) = &mut self.page {
                    if serial == current {
                        page.apply(ticket, result);
                    }
                }
            }
            Completion::Saved { failed: true } => {
                self.store.ui.set_error(Some(SAVE_FAILED.to_string()));
            }
            // Only a later successful save clears its own failure
            Completion::Saved { failed: false } => {
                if self.store.ui.error() == Some(SAVE_FAILED) {
                    self.store.ui.set_error(None);
                }
            }
            Completion::ToastExpired(id) => {
                self.store.ui.expire_toast(id);
            }
        }

        self.store.ui.set_loading(self.in_flight > 0);
    }

    // ========================================================================
    // Spawning
    // ========================================================================

    fn spawn<F>(&mut self, work: F)
    where
        F: Future<Output = Completion> + Send + 'static,
    {
        self.in_flight += 1;
        self.store.ui.set_loading(true);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            // The receiver only goes away with the controller
            let _ = tx.send(work.await);
        });
    }

    fn spawn_home(&mut self, fetch: Option<HomeFetch>) {
        let Some(fetch) = fetch else {
            return;
        };
        let serial = self.page_serial;
        let services = self.services.clone();
        match fetch {
            HomeFetch::Levels(ticket) => self.spawn(async move {
                let result = services.levels.list_with_stats().await;
                Completion::HomeLevels {
                    serial,
                    ticket,
                    result,
                }
            }),
            HomeFetch::Topic(TopicFetch::MainTopics { ticket, query }) => self.spawn(async move {
                let result = services.topics.main_topics(query).await;
                Completion::MainTopics {
                    serial,
                    ticket,
                    result,
                }
            }),
            HomeFetch::Topic(TopicFetch::Popular { ticket, level_code }) => {
                self.spawn(async move {
                    let result = services.topics.popular(&level_code, POPULAR_LIMIT).await;
                    Completion::Popular {
                        serial,
                        ticket,
                        result,
                    }
                });
            }
            HomeFetch::Topic(TopicFetch::SubTopics {
                ticket,
                main_topic_id,
            }) => self.spawn(async move {
                let result = services.topics.curated_by_main_topic(main_topic_id).await;
                Completion::SubTopics {
                    serial,
                    ticket,
                    result,
                }
            }),
            HomeFetch::Path(LearningPathFetch::List {
                ticket,
                sub_topic_id,
            }) => self.spawn(async move {
                let result = services.learning_paths.for_sub_topic(sub_topic_id).await;
                Completion::LearningPaths {
                    serial,
                    ticket,
                    result,
                }
            }),
            HomeFetch::Path(LearningPathFetch::Generate {
                ticket,
                sub_topic_id,
                request,
            }) => {
                tracing::info!(sub_topic_id, "Generating learning path");
                self.spawn(async move {
                    let result = services.learning_paths.generate(sub_topic_id, &request).await;
                    Completion::GeneratedPath {
                        serial,
                        ticket,
                        result,
                    }
                });
            }
            HomeFetch::Preview(path_id) => self.spawn(async move {
                let result = services.learning_paths.curriculum_items(&path_id).await;
                Completion::Preview { path_id, result }
            }),
        }
    }

    fn spawn_reader_levels(&mut self, serial: u64, ticket: Ticket) {
        let services = self.services.clone();
        self.spawn(async move {
            let result = services.levels.list().await;
            Completion::ReaderLevels {
                serial,
                ticket,
                result,
            }
        });
    }

    fn spawn_progress(&mut self, serial: u64, ticket: Ticket, user_id: String) {
        let services = self.services.clone();
        self.spawn(async move {
            let result = services.articles.user_progress(&user_id, None).await;
            Completion::Progress {
                serial,
                ticket,
                result,
            }
        });
    }

    fn persist_if_dirty(&mut self) {
        if !self.store.wizard.take_dirty() {
            return;
        }
        let store = self.selection_store.clone();
        let selection = self.store.wizard.preferences().clone();
        self.spawn(async move {
            let failed = match store.save(&selection).await {
                Ok(()) => false,
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to persist selection");
                    true
                }
            };
            Completion::Saved { failed }
        });
    }

    fn toast(&mut self, kind: ToastKind, message: impl Into<String>) {
        let toast = self.store.ui.show_toast(kind, message);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(toast.duration).await;
            let _ = tx.send(Completion::ToastExpired(toast.id));
        });
    }
}
