//! Page Renderers
//!
//! Each controller page has a renderer that reads the page, the store and
//! some view-local state and draws it. Renderers never mutate controller
//! state; everything they show comes from [`infou_core`].
//!
//! ```text
//! ┌ InfoU ─────────────────────────── /curriculum/p1?level=beginner ┐
//! │ header: route + loading indicator                               │
//! ├─────────────────────────────────────────────────────────────────┤
//! │ body: page renderer                                             │
//! ├─────────────────────────────────────────────────────────────────┤
//! │ footer: toast, error or key hints                               │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

mod curriculum;
mod home;
mod profile;
mod reader;

use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};
use ratatui::Frame;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use infou_core::{AppStore, Level, Loadable, Page, Route};

use crate::theme;
use crate::widgets::TextBlockState;

/// View state that belongs to the terminal, not the controller
#[derive(Debug, Default)]
pub struct ViewState {
    /// Reader scroll position
    pub reader: TextBlockState,
    /// Search text being typed, when search input is open
    pub search: Option<String>,
}

/// Draw the whole screen
pub fn draw(frame: &mut Frame, route: &Route, page: &Page, store: &AppStore, view: &mut ViewState) {
    let [header, body, footer] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(3),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    draw_header(frame, header, route, store);

    let block = Block::bordered()
        .title(Span::styled(format!(" {} ", page_title(page)), theme::title()))
        .border_style(theme::dim());
    let inner = block.inner(body);
    frame.render_widget(block, body);
    match page {
        Page::Home(home) => home::render(frame, inner, home, store, view.search.as_deref()),
        Page::Curriculum(curriculum) => curriculum::render(frame, inner, curriculum),
        Page::Reader(reader) => reader::render(frame, inner, reader, store, &mut view.reader),
        Page::Profile(profile) => profile::render(frame, inner, profile),
    }

    draw_footer(frame, footer, page, store, view);
}

fn page_title(page: &Page) -> &'static str {
    match page {
        Page::Home(_) => "Start learning",
        Page::Curriculum(_) => "Curriculum",
        Page::Reader(_) => "Reader",
        Page::Profile(_) => "Progress",
    }
}

fn draw_header(frame: &mut Frame, area: Rect, route: &Route, store: &AppStore) {
    let mut spans = vec![Span::styled(
        "InfoU",
        Style::default().fg(theme::INFOU_BLUE).add_modifier(Modifier::BOLD),
    )];
    if store.ui.is_loading() {
        spans.push(Span::styled("  loading…", Style::default().fg(theme::INFO_CYAN)));
    }
    let path = route.to_path();
    let used: usize = spans.iter().map(|s| s.content.width()).sum();
    let pad = (area.width as usize).saturating_sub(used + path.width());
    spans.push(Span::raw(" ".repeat(pad)));
    spans.push(Span::styled(path, theme::dim()));
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_footer(frame: &mut Frame, area: Rect, page: &Page, store: &AppStore, view: &ViewState) {
    let line = if let Some(search) = &view.search {
        Line::from(vec![
            Span::styled("Search: ", theme::title()),
            Span::raw(search.clone()),
            Span::styled("▏  Enter to search, Esc to cancel", theme::dim()),
        ])
    } else if let Some(toast) = store.ui.toast() {
        Line::from(Span::styled(
            toast.message.clone(),
            Style::default().fg(theme::toast_color(toast.kind)),
        ))
    } else if let Some(error) = store.ui.error() {
        Line::from(Span::styled(error.to_string(), theme::error()))
    } else {
        Line::from(Span::styled(key_hints(page), theme::dim()))
    };
    frame.render_widget(Paragraph::new(line), area);
}

fn key_hints(page: &Page) -> &'static str {
    match page {
        Page::Home(_) => "↑↓ move  Enter pick  ←→ step  c confirm  R reset  / search  p progress  q quit",
        Page::Curriculum(_) => "↑↓ move  Enter read  Tab level  Esc back  q quit",
        Page::Reader(_) => "↑↓ scroll  n/b next/previous  Tab level  g generate  m mark read  Esc back",
        Page::Profile(_) => "Esc back  h home  q quit",
    }
}

// ============================================================================
// Shared Pieces
// ============================================================================

/// Status line for a fetch that is not loaded yet
///
/// `None` once the value is there (or nothing was requested).
pub(crate) fn loadable_notice<T>(state: &Loadable<T>, what: &str) -> Option<Line<'static>> {
    match state {
        Loadable::Loading => Some(Line::from(Span::styled(
            format!("Loading {what}…"),
            Style::default().fg(theme::INFO_CYAN),
        ))),
        Loadable::Failed(e) => Some(Line::from(vec![
            Span::styled(e.message.clone(), theme::error()),
            Span::styled("  (r to retry)", theme::dim()),
        ])),
        Loadable::Idle | Loadable::Loaded(_) => None,
    }
}

/// `Level: Beginner [Intermediate] Advanced`
pub(crate) fn level_bar(levels: &[Level], selected: Option<&Level>) -> Line<'static> {
    let mut spans = vec![Span::styled("Level: ", theme::dim())];
    for level in levels {
        let chosen = selected.is_some_and(|s| s.code == level.code);
        let color = theme::level_color(&level.code);
        if chosen {
            spans.push(Span::styled(
                format!("[{}]", level.name),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ));
        } else {
            spans.push(Span::styled(level.name.clone(), Style::default().fg(color)));
        }
        spans.push(Span::raw(" "));
    }
    if selected.is_none() && !levels.is_empty() {
        spans.push(Span::styled("(Tab to choose)", theme::dim()));
    }
    Line::from(spans)
}

/// A list row: cursor marker plus content
pub(crate) fn row(highlighted: bool, mut spans: Vec<Span<'static>>) -> Line<'static> {
    let marker = if highlighted {
        Span::styled("› ", theme::highlight())
    } else {
        Span::raw("  ")
    };
    if highlighted {
        if let Some(first) = spans.first_mut() {
            first.style = first.style.patch(theme::highlight());
        }
    }
    spans.insert(0, marker);
    Line::from(spans)
}

/// Cut `text` to `width` columns, marking the cut with `…`
pub(crate) fn truncate(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = UnicodeWidthChar::width(c).unwrap_or(0);
        if used + w + 1 > width {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

/// Render `lines` keeping line `focus` in view
pub(crate) fn render_lines(frame: &mut Frame, area: Rect, lines: Vec<Line<'static>>, focus: Option<usize>) {
    let height = area.height as usize;
    let offset = focus.map_or(0, |f| (f + 1).saturating_sub(height));
    let offset = u16::try_from(offset).unwrap_or(u16::MAX);
    frame.render_widget(Paragraph::new(lines).scroll((offset, 0)), area);
}
