//! Plain-text page summary for `--headless`
//!
//! One `key: value` fact per line, stable enough to grep in scripts.

use std::fmt::Write;

use infou_core::{AppStore, ArticleStatus, Loadable, Page, Route};

/// Describe what the current page shows
#[must_use]
pub fn summarize(route: &Route, page: &Page, store: &AppStore) -> String {
    let mut out = String::new();
    line(&mut out, "route", route.to_path());
    line(&mut out, "page", page.name());

    match page {
        Page::Home(home) => {
            let step = store.wizard.machine().step();
            line(&mut out, "step", step.name());
            loadable(&mut out, "levels", home.levels.state(), |levels| {
                levels.iter().map(|l| l.code.as_str()).collect::<Vec<_>>().join(",")
            });
            let selection = store.wizard.selection();
            if let Some(level) = &selection.level {
                line(&mut out, "level", &level.code);
            }
            if let Some(path) = &selection.learning_path {
                line(&mut out, "learning_path", &path.path_id);
            }
        }
        Page::Curriculum(curriculum) => {
            loadable(&mut out, "path", curriculum.state(), |data| data.path.title.clone());
            line(
                &mut out,
                "level",
                curriculum.selected_level().map_or("none", |l| l.code.as_str()),
            );
            for (i, item) in curriculum.items().iter().enumerate() {
                line(&mut out, "item", format!("{} {} {}", i + 1, item.curriculum_item_id, item.title));
            }
        }
        Page::Reader(_) => {
            let article = &store.article;
            let status = match article.status() {
                ArticleStatus::Idle => "idle".to_string(),
                ArticleStatus::Loading => "loading".to_string(),
                ArticleStatus::Missing => "missing".to_string(),
                ArticleStatus::Generating => "generating".to_string(),
                ArticleStatus::Ready => "ready".to_string(),
                ArticleStatus::Failed(e) => format!("failed ({})", e.message),
            };
            line(&mut out, "article", status);
            if let Some(a) = article.article() {
                line(&mut out, "title", &a.title);
                line(&mut out, "level", &a.level_code);
                line(&mut out, "curriculum_item", &a.curriculum_item_id);
                line(&mut out, "read", a.is_read());
            }
            if let Some(next) = article.next() {
                line(&mut out, "next", &next.article_id);
            }
            if let Some(previous) = article.previous() {
                line(&mut out, "previous", &previous.article_id);
            }
        }
        Page::Profile(profile) => match profile.user_id() {
            None => line(&mut out, "user", "none"),
            Some(user) => {
                line(&mut out, "user", user);
                loadable(&mut out, "progress", profile.state(), |p| {
                    format!("{}/{} ({:.0}%)", p.read_articles, p.total_articles, p.progress_percentage)
                });
            }
        },
    }
    out
}

fn line(out: &mut String, key: &str, value: impl std::fmt::Display) {
    // Writing to a String cannot fail
    let _ = writeln!(out, "{key}: {value}");
}

fn loadable<T>(out: &mut String, key: &str, state: &Loadable<T>, show: impl Fn(&T) -> String) {
    match state {
        Loadable::Idle => line(out, key, "idle"),
        Loadable::Loading => line(out, key, "loading"),
        Loadable::Failed(e) => line(out, key, format!("failed ({})", e.message)),
        Loadable::Loaded(value) => line(out, key, show(value)),
    }
}
