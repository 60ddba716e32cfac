//! Wizard renderer: step bar plus the body of the current step

use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::Frame;

use infou_core::{AppStore, HomePage, StepId, TopicEntry};

use super::{loadable_notice, render_lines, row, truncate};
use crate::theme;

pub(super) fn render(
    frame: &mut Frame,
    area: Rect,
    home: &HomePage,
    store: &AppStore,
    search: Option<&str>,
) {
    let [steps, _, body] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Min(1),
    ])
    .areas(area);

    frame.render_widget(step_bar(store), steps);

    let width = body.width as usize;
    let (lines, focus) = match store.wizard.machine().step() {
        StepId::Welcome => (welcome(), None),
        StepId::Level => levels(home, store),
        StepId::Topic => topics(home, store, search, width),
        StepId::LearningPath => paths(home, width),
        StepId::Summary => (summary(store), None),
    };
    render_lines(frame, body, lines, focus);
}

fn step_bar(store: &AppStore) -> Line<'static> {
    let machine = store.wizard.machine();
    let current = machine.step();
    let mut spans = Vec::new();
    for (i, id) in machine.flow().ids().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" › ", theme::dim()));
        }
        let style = if id == current {
            theme::highlight()
        } else {
            theme::dim()
        };
        spans.push(Span::styled(id.title(), style));
    }
    Line::from(spans)
}

fn welcome() -> Vec<Line<'static>> {
    vec![
        Line::from(Span::styled("Welcome to InfoU", theme::title())),
        Line::raw(""),
        Line::raw("Pick a level, a topic and a learning path,"),
        Line::raw("then read articles written for your level."),
        Line::raw(""),
        Line::from(Span::styled("Press Enter to start.", theme::dim())),
    ]
}

fn levels(home: &HomePage, store: &AppStore) -> (Vec<Line<'static>>, Option<usize>) {
    if let Some(notice) = loadable_notice(home.levels.state(), "levels") {
        return (vec![notice], None);
    }
    if home.levels.is_empty_state() {
        return (
            vec![Line::from(Span::styled(
                "No levels are available yet.",
                theme::dim(),
            ))],
            None,
        );
    }

    let chosen = store.wizard.selection().level_code();
    let lines = home
        .levels
        .levels()
        .iter()
        .enumerate()
        .map(|(i, level)| {
            let check = if chosen == Some(level.code.as_str()) { " ✓" } else { "" };
            row(
                i == home.levels.cursor(),
                vec![
                    Span::styled(
                        level.name.clone(),
                        Style::default().fg(theme::level_color(&level.code)),
                    ),
                    Span::raw(check),
                    Span::styled(format!("  {}", level.description), theme::dim()),
                ],
            )
        })
        .collect();
    (lines, Some(home.levels.cursor()))
}

fn topics(
    home: &HomePage,
    store: &AppStore,
    search: Option<&str>,
    width: usize,
) -> (Vec<Line<'static>>, Option<usize>) {
    let topics = &home.topics;
    let selection = store.wizard.selection();
    let mut lines = Vec::new();

    let level = topics.level().map_or("any level", |l| l.name.as_str());
    let query = search.unwrap_or(topics.search());
    let mut header = vec![Span::styled(format!("For {level}"), theme::dim())];
    if !query.is_empty() {
        header.push(Span::styled(format!("  search \"{query}\""), theme::dim()));
    }
    if topics.pages() > 1 {
        header.push(Span::styled(
            format!("  page {}/{}  ([ ])", topics.page(), topics.pages()),
            theme::dim(),
        ));
    }
    lines.push(Line::from(header));

    if let Some(notice) = loadable_notice(topics.main_topics(), "topics") {
        lines.push(notice);
    }

    let mut focus = None;
    let mut section = "";
    for (i, entry) in topics.entries().into_iter().enumerate() {
        let (label, spans) = match entry {
            TopicEntry::Popular(sub) => (
                "Popular",
                vec![
                    Span::raw(truncate(&sub.title, width.saturating_sub(16))),
                    Span::styled(format!("  {}", sub.difficulty_label()), theme::dim()),
                ],
            ),
            TopicEntry::Main(topic) => {
                let picked = topics.selected_main().is_some_and(|m| m.id == topic.id);
                (
                    "Topics",
                    vec![
                        Span::raw(truncate(&topic.title, width.saturating_sub(6))),
                        Span::raw(if picked { " ▾" } else { "" }),
                    ],
                )
            }
            TopicEntry::Sub(sub) => {
                let picked = selection.sub_topic.as_ref().is_some_and(|s| s.id == sub.id);
                (
                    "Sub-topics",
                    vec![
                        Span::raw(format!("  {}", truncate(&sub.title, width.saturating_sub(18)))),
                        Span::raw(if picked { " ✓" } else { "" }),
                        Span::styled(format!("  {}", sub.difficulty_label()), theme::dim()),
                    ],
                )
            }
        };
        if label != section {
            lines.push(Line::from(Span::styled(label, theme::title())));
            section = label;
        }
        if i == topics.cursor() {
            focus = Some(lines.len());
        }
        lines.push(row(i == topics.cursor(), spans));
    }

    if topics.selected_main().is_some() {
        if let Some(notice) = loadable_notice(topics.sub_topics(), "sub-topics") {
            lines.push(notice);
        } else if topics.sub_topics().value().is_some_and(Vec::is_empty) {
            lines.push(Line::from(Span::styled(
                "No sub-topics for this level yet.",
                theme::dim(),
            )));
        }
    }
    (lines, focus)
}

fn paths(home: &HomePage, width: usize) -> (Vec<Line<'static>>, Option<usize>) {
    let paths = &home.paths;
    let mut lines = Vec::new();
    if let Some(sub) = paths.sub_topic() {
        lines.push(Line::from(vec![
            Span::styled("Sub-topic: ", theme::dim()),
            Span::raw(sub.title.clone()),
        ]));
    }
    if let Some(notice) = loadable_notice(paths.state(), "learning paths") {
        lines.push(notice);
        return (lines, None);
    }
    if paths.generation().is_loading() {
        lines.push(Line::from(Span::styled(
            "Generating a learning path…",
            Style::default().fg(theme::INFO_CYAN),
        )));
    }
    if paths.is_empty_state() {
        lines.push(Line::from(Span::styled(
            "No learning paths for this sub-topic yet. Press g to generate one.",
            theme::dim(),
        )));
        return (lines, None);
    }

    let first = lines.len();
    for (i, path) in paths.paths().iter().enumerate() {
        lines.push(row(
            i == paths.cursor(),
            vec![
                Span::raw(truncate(&path.title, width.saturating_sub(24))),
                Span::styled(
                    format!("  {} items, {:.1} h", path.curriculum_count, path.estimated_hours),
                    theme::dim(),
                ),
            ],
        ));
    }
    (lines, Some(first + paths.cursor()))
}

fn summary(store: &AppStore) -> Vec<Line<'static>> {
    let selection = store.wizard.selection();
    let field = |label: &'static str, value: Option<String>| {
        Line::from(vec![
            Span::styled(format!("{label:<14}"), theme::dim()),
            Span::raw(value.unwrap_or_else(|| "-".to_string())),
        ])
    };
    let mut lines = vec![
        field("Level", selection.level.as_ref().map(|l| l.name.clone())),
        field("Topic", selection.main_topic.as_ref().map(|t| t.title.clone())),
        field("Sub-topic", selection.sub_topic.as_ref().map(|s| s.title.clone())),
        field(
            "Learning path",
            selection.learning_path.as_ref().map(|p| p.title.clone()),
        ),
    ];

    let preview = store.wizard.preview();
    if !preview.is_empty() {
        lines.push(Line::raw(""));
        lines.push(Line::from(Span::styled("Curriculum", theme::title())));
        for (i, item) in preview.iter().enumerate() {
            lines.push(Line::raw(format!("{:>2}. {}", i + 1, item.title)));
        }
    }
    lines.push(Line::raw(""));
    lines.push(Line::from(Span::styled("Press c to start reading.", theme::dim())));
    lines
}
