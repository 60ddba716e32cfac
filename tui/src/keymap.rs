//! Key Bindings
//!
//! Maps terminal key presses to [`Command`]s. The mapping depends only on
//! the key and the [`KeyContext`], so it is tested without a terminal.
//!
//! | Context | Keys |
//! |---------|------|
//! | everywhere | `q`/`Ctrl-C` quit, `Esc` back, `r` retry, `x` dismiss toast, `h` home, `p` profile |
//! | wizard | `↑↓`/`jk` move, `Enter` pick, `→`/`n` next, `←`/`b` previous, `c` confirm, `R` reset, `/` search, `[` `]` topic pages, `g` generate path |
//! | curriculum | `↑↓`/`jk` move, `Enter` open, `Tab`/`Shift-Tab` level |
//! | reader | `↑↓`/`jk` scroll, `n`/`b` next/previous article, `g` generate, `m` mark read, `Tab`/`Shift-Tab` level |

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use infou_core::{Route, UserEvent};

/// Lines scrolled per `PageUp`/`PageDown`
pub const PAGE_SCROLL: i32 = 10;

/// Which bindings apply
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyContext {
    /// Wizard
    Home,
    /// Typing a topic search
    Search,
    /// Learning path overview
    Curriculum,
    /// Article reader
    Reader,
    /// Progress
    Profile,
}

/// What a key press asks for
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Leave the application
    Quit,
    /// Forward to the controller
    Event(UserEvent),
    /// Scroll the reader by lines
    Scroll(i32),
    /// Start typing a search
    BeginSearch,
    /// Append to the search text
    SearchInput(char),
    /// Delete the last search character
    SearchBackspace,
    /// Run the search
    SubmitSearch,
    /// Leave search without running it
    CancelSearch,
}

impl From<UserEvent> for Command {
    fn from(event: UserEvent) -> Self {
        Self::Event(event)
    }
}

/// Map a key press
#[must_use]
pub fn map_key(key: KeyEvent, context: KeyContext) -> Option<Command> {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Some(Command::Quit);
    }
    if context == KeyContext::Search {
        return map_search(key);
    }

    let global = match key.code {
        KeyCode::Char('q') => Some(Command::Quit),
        KeyCode::Esc => Some(UserEvent::Back.into()),
        KeyCode::Char('r') => Some(UserEvent::Retry.into()),
        KeyCode::Char('x') => Some(UserEvent::DismissToast.into()),
        KeyCode::Char('h') => Some(UserEvent::Navigate(Route::Home).into()),
        KeyCode::Char('p') => Some(UserEvent::Navigate(Route::Profile).into()),
        _ => None,
    };
    if global.is_some() {
        return global;
    }

    match context {
        KeyContext::Home => map_home(key),
        KeyContext::Curriculum => map_curriculum(key),
        KeyContext::Reader => map_reader(key),
        KeyContext::Profile | KeyContext::Search => None,
    }
}

fn cursor(key: KeyEvent) -> Option<Command> {
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => Some(UserEvent::MoveCursor(-1).into()),
        KeyCode::Down | KeyCode::Char('j') => Some(UserEvent::MoveCursor(1).into()),
        KeyCode::Enter => Some(UserEvent::Activate.into()),
        _ => None,
    }
}

fn level_cycle(key: KeyEvent) -> Option<Command> {
    match key.code {
        KeyCode::Tab => Some(UserEvent::CycleLevel(1).into()),
        KeyCode::BackTab => Some(UserEvent::CycleLevel(-1).into()),
        _ => None,
    }
}

fn map_home(key: KeyEvent) -> Option<Command> {
    cursor(key).or_else(|| match key.code {
        KeyCode::Right | KeyCode::Char('n') => Some(UserEvent::Next.into()),
        KeyCode::Left | KeyCode::Char('b') => Some(UserEvent::Previous.into()),
        KeyCode::Char('c') => Some(UserEvent::Confirm.into()),
        KeyCode::Char('R') => Some(UserEvent::Reset.into()),
        KeyCode::Char('/') => Some(Command::BeginSearch),
        KeyCode::Char(']') => Some(UserEvent::NextPage.into()),
        KeyCode::Char('[') => Some(UserEvent::PreviousPage.into()),
        KeyCode::Char('g') => Some(UserEvent::GenerateLearningPath.into()),
        _ => None,
    })
}

fn map_curriculum(key: KeyEvent) -> Option<Command> {
    cursor(key).or_else(|| level_cycle(key))
}

fn map_reader(key: KeyEvent) -> Option<Command> {
    level_cycle(key).or_else(|| match key.code {
        KeyCode::Up | KeyCode::Char('k') => Some(Command::Scroll(-1)),
        KeyCode::Down | KeyCode::Char('j') => Some(Command::Scroll(1)),
        KeyCode::PageUp => Some(Command::Scroll(-PAGE_SCROLL)),
        KeyCode::PageDown | KeyCode::Char(' ') => Some(Command::Scroll(PAGE_SCROLL)),
        KeyCode::Char('n') => Some(UserEvent::NextArticle.into()),
        KeyCode::Char('b') => Some(UserEvent::PreviousArticle.into()),
        KeyCode::Char('g') => Some(UserEvent::GenerateArticle.into()),
        KeyCode::Char('m') => Some(UserEvent::MarkRead.into()),
        KeyCode::Enter => Some(UserEvent::Activate.into()),
        _ => None,
    })
}

fn map_search(key: KeyEvent) -> Option<Command> {
    match key.code {
        KeyCode::Enter => Some(Command::SubmitSearch),
        KeyCode::Esc => Some(Command::CancelSearch),
        KeyCode::Backspace => Some(Command::SearchBackspace),
        KeyCode::Char(c) => Some(Command::SearchInput(c)),
        _ => None,
    }
}
