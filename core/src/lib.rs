//! InfoU Core - Headless Learning Client
//!
//! This crate holds everything the InfoU learning client does that is not
//! drawing: the REST API client, the wizard state machine, selectors, page
//! state, the application store and the controller that ties them together.
//! The TUI is one surface on top of it; tests drive it headless.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                         Surfaces                              │
//! │     ┌─────────────┐                 ┌──────────────────┐     │
//! │     │ TUI(ratatui)│                 │ Headless / tests │     │
//! │     └──────┬──────┘                 └────────┬─────────┘     │
//! │            └──────── UserEvent (up) ─────────┘               │
//! │                  state reads (down)                          │
//! └───────────────────────────┬──────────────────────────────────┘
//!                             │
//! ┌───────────────────────────┼──────────────────────────────────┐
//! │                      INFOU CORE                               │
//! │  ┌────────────────────────┴───────────────────────────────┐  │
//! │  │                     Controller                          │  │
//! │  │ ┌────────┐ ┌───────────┐ ┌───────────┐ ┌─────────────┐ │  │
//! │  │ │ Router │ │   Pages   │ │ AppStore  │ │  Services   │ │  │
//! │  │ │(Route) │ │+Selectors │ │wizard/art/│ │ (Transport) │ │  │
//! │  │ │        │ │           │ │   ui      │ │             │ │  │
//! │  │ └────────┘ └───────────┘ └───────────┘ └─────────────┘ │  │
//! │  └────────────────────────────────────────────────────────┘  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Key Types
//!
//! - [`Controller`]: owns route, history, page and store; applies events
//! - [`UserEvent`]: everything a surface can ask for
//! - [`WizardMachine`]: the step-by-step selection flow
//! - [`AppStore`]: wizard, article and UI slices
//! - [`Services`]: typed access to the learning API over a [`Transport`]
//!
//! # Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use infou_core::{load_config, ApiClient, Controller, Route, SelectionStore, UserEvent};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = load_config()?;
//!     let client = Arc::new(ApiClient::new(&config.api)?);
//!     let mut controller =
//!         Controller::bootstrap(client, &config, SelectionStore::at_default_path()).await;
//!
//!     controller.start(Route::Home);
//!     controller.handle_event(UserEvent::Start);
//!     controller.settle().await;
//!     Ok(())
//! }
//! ```

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod api;
pub mod config;
pub mod controller;
pub mod events;
pub mod pages;
pub mod routes;
pub mod selectors;
pub mod services;
pub mod store;
pub mod types;
pub mod wizard;

// API access
pub use api::{call, ApiClient, ApiError, ApiRequest, ApiResult, ErrorKind, Method, Transport};

#[cfg(any(test, feature = "test-util"))]
pub use api::InMemoryTransport;

// Configuration
pub use config::{
    default_config_path, load_config, load_config_from_path, load_config_with_env, ApiConfig,
    ConfigError, ConfigOverrides, ConfigSource, InfouConfig, ReaderConfig, DEFAULT_API_URL,
};

// Controller and events
pub use controller::{Controller, ControllerOptions};
pub use events::UserEvent;

// Pages and selectors
pub use pages::{CurriculumData, CurriculumPage, HomePage, Page, ProfilePage, ReaderPage};
pub use selectors::{
    FetchSlot, LearningPathSelector, LevelSelector, Loadable, Ticket, TopicEntry, TopicSelector,
};

// Routing
pub use routes::{Route, RouteError};

// Services
pub use services::{MainTopicQuery, Services};

// Store
pub use store::{
    AppStore, ArticleSlice, ArticleSource, ArticleStatus, PersistedSelection, SelectionStore,
    Toast, ToastKind, UiState, WizardSlice,
};

// Domain types
pub use types::{
    Article, ArticleNavigation, CuratedSubTopic, CurriculumItem, LearningPath,
    LearningPathDetail, Level, MainTopic, Progress,
};

// Wizard
pub use wizard::{StepId, Transition, WizardAction, WizardFlow, WizardMachine, WizardSelection};
