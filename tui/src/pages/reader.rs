//! Reader renderer
//!
//! Level bar on top, then whatever the article slice holds: the article
//! body, a generation offer, progress, or an error with a retry hint.

use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use infou_core::{AppStore, ArticleSource, ArticleStatus, ReaderPage};

use super::{level_bar, loadable_notice, render_lines, truncate};
use crate::theme;
use crate::widgets::{TextBlock, TextBlockState};

pub(super) fn render(
    frame: &mut Frame,
    area: Rect,
    page: &ReaderPage,
    store: &AppStore,
    scroll: &mut TextBlockState,
) {
    let [levels, _, body, nav] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Min(1),
        Constraint::Length(1),
    ])
    .areas(area);

    let bar = loadable_notice(page.levels_state(), "levels")
        .unwrap_or_else(|| level_bar(page.levels(), page.selected_level()));
    frame.render_widget(Paragraph::new(bar), levels);

    let article = &store.article;
    let status_line = |text: &'static str| {
        vec![Line::from(Span::styled(text, Style::default().fg(theme::INFO_CYAN)))]
    };
    match article.status() {
        ArticleStatus::Idle => {
            let waiting_for_level = matches!(page.source(), ArticleSource::CurriculumItem(_))
                && page.selected_level().is_none()
                && page.levels_state().value().is_some();
            if waiting_for_level {
                render_lines(
                    frame,
                    body,
                    vec![Line::from(Span::styled(
                        "Choose a level (Tab) to read this item.",
                        theme::dim(),
                    ))],
                    None,
                );
            }
        }
        ArticleStatus::Loading => render_lines(frame, body, status_line("Loading article…"), None),
        ArticleStatus::Missing => render_lines(
            frame,
            body,
            vec![
                Line::raw("There is no article for this item at this level yet."),
                Line::from(Span::styled("Press g to generate one.", theme::dim())),
            ],
            None,
        ),
        ArticleStatus::Generating => render_lines(
            frame,
            body,
            status_line("Generating article… this can take a moment."),
            None,
        ),
        ArticleStatus::Failed(e) => {
            let mut lines = vec![Line::from(Span::styled(e.message.clone(), theme::error()))];
            if let Some(detail) = &e.detail {
                lines.push(Line::from(Span::styled(detail.clone(), theme::dim())));
            }
            lines.push(Line::from(Span::styled("Press r to retry.", theme::dim())));
            render_lines(frame, body, lines, None);
        }
        ArticleStatus::Ready => {
            if let Some(a) = article.article() {
                let [title, _, text] = Layout::vertical([
                    Constraint::Length(1),
                    Constraint::Length(1),
                    Constraint::Min(1),
                ])
                .areas(body);
                let read = if a.is_read() {
                    Span::styled("  ✓ read", Style::default().fg(theme::SUCCESS_GREEN))
                } else if article.is_marking_read() {
                    Span::styled("  marking…", theme::dim())
                } else {
                    Span::styled("  (m to mark read)", theme::dim())
                };
                frame.render_widget(
                    Paragraph::new(Line::from(vec![
                        Span::styled(
                            truncate(&a.title, (title.width as usize).saturating_sub(20)),
                            Style::default().add_modifier(Modifier::BOLD),
                        ),
                        read,
                    ])),
                    title,
                );
                frame.render_stateful_widget(
                    TextBlock::new(a.paragraphs()).style(Style::default().fg(theme::READING_TEXT)),
                    text,
                    scroll,
                );
            }
        }
    }

    let half = (nav.width as usize / 2).saturating_sub(6);
    let mut spans = Vec::new();
    if let Some(prev) = article.previous() {
        spans.push(Span::styled(format!("← b {}", truncate(&prev.title, half)), theme::dim()));
    }
    if let Some(next) = article.next() {
        if !spans.is_empty() {
            spans.push(Span::raw("   "));
        }
        spans.push(Span::styled(format!("n {} →", truncate(&next.title, half)), theme::dim()));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), nav);
}
