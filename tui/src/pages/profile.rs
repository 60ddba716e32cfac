//! Progress renderer

use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Gauge, Paragraph};
use ratatui::Frame;

use infou_core::ProfilePage;

use super::{loadable_notice, render_lines};
use crate::theme;

pub(super) fn render(frame: &mut Frame, area: Rect, page: &ProfilePage) {
    let Some(user) = page.user_id() else {
        render_lines(
            frame,
            area,
            vec![
                Line::raw("No user is configured."),
                Line::from(Span::styled(
                    "Set INFOU_USER_ID or [api] user_id in client.toml.",
                    theme::dim(),
                )),
            ],
            None,
        );
        return;
    };
    if let Some(notice) = loadable_notice(page.state(), "progress") {
        render_lines(frame, area, vec![notice], None);
        return;
    }
    let Some(progress) = page.state().value() else {
        return;
    };

    let [who, gauge, _, current] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Min(1),
    ])
    .areas(area);

    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled("Reader: ", theme::dim()),
            Span::raw(user.to_string()),
        ])),
        who,
    );
    let ratio = f64::from(progress.progress_percentage / 100.0).clamp(0.0, 1.0);
    frame.render_widget(
        Gauge::default()
            .ratio(ratio)
            .label(format!(
                "{}/{} articles ({:.0}%)",
                progress.read_articles, progress.total_articles, progress.progress_percentage
            ))
            .gauge_style(Style::default().fg(theme::INFOU_BLUE)),
        gauge,
    );
    let line = match &progress.current_article {
        Some(article) => Line::from(vec![
            Span::styled("Continue with: ", theme::dim()),
            Span::raw(article.title.clone()),
        ]),
        None => Line::from(Span::styled("Nothing in progress.", theme::dim())),
    };
    frame.render_widget(Paragraph::new(line), current);
}
