//! Main Application
//!
//! The App is a thin display client over the [`Controller`]:
//! 1. Converts terminal key presses to [`Command`]s via the keymap
//! 2. Forwards controller events, keeps view-local state (search text,
//!    reader scroll) itself
//! 3. Polls controller completions every frame
//! 4. Renders from controller state

use std::time::Duration;

use crossterm::event::{Event, EventStream, KeyEvent, KeyEventKind};
use futures::StreamExt;
use ratatui::backend::Backend;
use ratatui::{Frame, Terminal};

use infou_core::{Controller, Page, Route, StepId, Transport, UserEvent};

use crate::keymap::{map_key, Command, KeyContext};
use crate::pages::{self, ViewState};

/// Upper bound between frames when nothing happens
const FRAME_DURATION: Duration = Duration::from_millis(50);

/// Main application state
pub struct App<T: ?Sized> {
    /// Is the app still running?
    running: bool,
    /// Owner of all client state
    controller: Controller<T>,
    /// Terminal-only state
    view: ViewState,
    /// Route the view state belongs to
    view_route: Route,
}

impl<T: Transport + ?Sized + 'static> App<T> {
    /// Wrap a started controller
    pub fn new(controller: Controller<T>) -> Self {
        let view_route = controller.route().clone();
        Self {
            running: true,
            controller,
            view: ViewState::default(),
            view_route,
        }
    }

    /// Controller, for inspection
    pub fn controller(&self) -> &Controller<T> {
        &self.controller
    }

    /// Whether the loop should keep going
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Text typed into the search prompt, if open
    pub fn search(&self) -> Option<&str> {
        self.view.search.as_deref()
    }

    /// Which key bindings apply right now
    pub fn context(&self) -> KeyContext {
        if self.view.search.is_some() {
            return KeyContext::Search;
        }
        match self.controller.page() {
            Page::Home(_) => KeyContext::Home,
            Page::Curriculum(_) => KeyContext::Curriculum,
            Page::Reader(_) => KeyContext::Reader,
            Page::Profile(_) => KeyContext::Profile,
        }
    }

    /// Main event loop
    pub async fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> anyhow::Result<()> {
        let mut event_stream = EventStream::new();

        // Render initial frame immediately so user sees UI
        terminal.draw(|frame| self.draw(frame))?;

        while self.running {
            tokio::select! {
                biased;

                maybe_event = event_stream.next() => match maybe_event {
                    // Only handle Press events (not Release or Repeat)
                    Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                        self.handle_key(key);
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        tracing::error!(error = %e, "Terminal event stream failed");
                        self.running = false;
                    }
                    None => self.running = false,
                },

                () = tokio::time::sleep(FRAME_DURATION) => {}
            }

            self.tick();
            terminal.draw(|frame| self.draw(frame))?;
        }

        tracing::info!(route = %self.controller.route(), "Leaving");
        Ok(())
    }

    /// Apply finished fetches and keep view state in step with the route
    pub fn tick(&mut self) {
        self.controller.poll_completions();
        self.sync_view();
    }

    /// Wait for every pending fetch, then bring view state up to date
    pub async fn settle(&mut self) {
        self.controller.settle().await;
        self.sync_view();
    }

    /// Handle one key press
    pub fn handle_key(&mut self, key: KeyEvent) {
        if let Some(command) = map_key(key, self.context()) {
            self.apply(command);
        }
    }

    /// Execute a command
    pub fn apply(&mut self, command: Command) {
        match command {
            Command::Quit => self.running = false,
            Command::Event(event) => self.controller.handle_event(event),
            Command::Scroll(delta) => self.view.reader.scroll(delta),
            Command::BeginSearch => {
                if self.on_topic_step() {
                    self.view.search = Some(String::new());
                }
            }
            Command::SearchInput(c) => {
                if let Some(search) = &mut self.view.search {
                    search.push(c);
                }
            }
            Command::SearchBackspace => {
                if let Some(search) = &mut self.view.search {
                    search.pop();
                }
            }
            Command::SubmitSearch => {
                if let Some(search) = self.view.search.take() {
                    self.controller.handle_event(UserEvent::Search(search));
                }
            }
            Command::CancelSearch => self.view.search = None,
        }
        self.sync_view();
    }

    /// Draw one frame
    pub fn draw(&mut self, frame: &mut Frame) {
        pages::draw(
            frame,
            self.controller.route(),
            self.controller.page(),
            self.controller.store(),
            &mut self.view,
        );
    }

    fn on_topic_step(&self) -> bool {
        matches!(self.controller.page(), Page::Home(_))
            && self.controller.store().wizard.machine().step() == StepId::Topic
    }

    fn sync_view(&mut self) {
        if self.controller.route() != &self.view_route {
            self.view_route = self.controller.route().clone();
            self.view.reader.scroll_to_top();
            self.view.search = None;
        }
    }
}
