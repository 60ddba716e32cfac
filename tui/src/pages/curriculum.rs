//! Curriculum renderer: path title, level bar and the item list

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::Frame;

use infou_core::CurriculumPage;

use super::{level_bar, loadable_notice, render_lines, row, truncate};
use crate::theme;

pub(super) fn render(frame: &mut Frame, area: Rect, page: &CurriculumPage) {
    if let Some(notice) = loadable_notice(page.state(), "curriculum") {
        render_lines(frame, area, vec![notice], None);
        return;
    }
    let Some(data) = page.state().value() else {
        return;
    };

    let width = area.width as usize;
    let mut lines = vec![Line::from(Span::styled(
        truncate(&data.path.title, width),
        theme::title(),
    ))];
    if !data.path.description.is_empty() {
        lines.push(Line::from(Span::styled(
            truncate(&data.path.description, width),
            theme::dim(),
        )));
    }
    lines.push(level_bar(page.levels(), page.selected_level()));
    lines.push(Line::raw(""));

    if page.items().is_empty() {
        lines.push(Line::from(Span::styled(
            "This learning path has no items yet.",
            theme::dim(),
        )));
        render_lines(frame, area, lines, None);
        return;
    }

    let first = lines.len();
    for (i, item) in page.items().iter().enumerate() {
        let badge = match item.has_articles {
            Some(true) => "",
            Some(false) => "  (not written yet)",
            None => "",
        };
        lines.push(row(
            i == page.cursor(),
            vec![
                Span::raw(format!(
                    "{:>2}. {}",
                    i + 1,
                    truncate(&item.title, width.saturating_sub(26))
                )),
                Span::styled(badge, theme::dim()),
            ],
        ));
    }
    render_lines(frame, area, lines, Some(first + page.cursor()));
}
