//! InfoU TUI - Terminal client for the InfoU learning platform
//!
//! A thin surface over [`infou_core`]: key presses become
//! [`infou_core::UserEvent`]s, and every frame is drawn from the
//! controller's state.
//!
//! # Architecture
//!
//! - **App**: event loop (keys, resize, completion polling, frame tick)
//! - **Keymap**: key press to command mapping per page
//! - **Pages**: one renderer per controller page
//! - **Widgets**: borderless scrollable text for article bodies
//! - **Summary**: plain-text page description for headless runs

pub mod app;
pub mod keymap;
pub mod pages;
pub mod summary;
pub mod theme;
pub mod widgets;

pub use app::App;
