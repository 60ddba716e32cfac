//! Layering rules for the InfoU workspace

use std::fs;

use architectural_enforcement::{offending_lines, production_part, rust_sources, workspace_root};

fn violations(crate_dir: &str, needles: &[&str], production_only: bool) -> Vec<String> {
    let root = workspace_root().join(crate_dir).join("src");
    let mut found = Vec::new();
    for path in rust_sources(&root) {
        let Ok(text) = fs::read_to_string(&path) else {
            continue;
        };
        let text = if production_only {
            production_part(&text)
        } else {
            text.as_str()
        };
        for needle in needles {
            for line in offending_lines(text, needle) {
                found.push(format!("{}:{line}: {needle}", path.display()));
            }
        }
    }
    found
}

#[test]
fn test_core_manifest_has_no_terminal_crates() {
    let manifest = fs::read_to_string(workspace_root().join("core/Cargo.toml"))
        .expect("core manifest readable");
    for forbidden in ["ratatui", "crossterm"] {
        assert!(
            !manifest.contains(forbidden),
            "infou-core must stay headless but depends on {forbidden}"
        );
    }
}

#[test]
fn test_core_sources_have_no_terminal_imports() {
    let found = violations("core", &["ratatui::", "crossterm::"], false);
    assert!(found.is_empty(), "terminal imports in core:\n{}", found.join("\n"));
}

#[test]
fn test_no_blocking_http() {
    let mut found = violations("core", &["reqwest::blocking"], false);
    found.extend(violations("tui", &["reqwest::blocking"], false));
    assert!(found.is_empty(), "blocking HTTP:\n{}", found.join("\n"));
}

#[test]
fn test_no_thread_sleep_in_async_code() {
    let mut found = violations("core", &["std::thread::sleep", "thread::sleep("], false);
    found.extend(violations("tui", &["std::thread::sleep", "thread::sleep("], false));
    assert!(found.is_empty(), "blocking sleeps:\n{}", found.join("\n"));
}

#[test]
fn test_core_production_code_does_not_unwrap() {
    let found = violations("core", &[".unwrap()", ".expect("], true);
    assert!(found.is_empty(), "unwrap/expect in core:\n{}", found.join("\n"));
}

#[test]
fn test_in_memory_transport_is_gated() {
    for file in ["core/src/api/mod.rs", "core/src/lib.rs"] {
        let text = fs::read_to_string(workspace_root().join(file)).expect("source readable");
        let lines: Vec<&str> = text.lines().collect();
        for (i, line) in lines.iter().enumerate() {
            let declares = line.starts_with("mod in_memory")
                || (line.starts_with("pub use") && line.contains("InMemoryTransport"));
            if declares {
                let gate = i.checked_sub(1).map_or("", |prev| lines[prev]);
                assert!(
                    gate.contains("feature = \"test-util\""),
                    "{file}:{}: in-memory transport exported without the test-util gate",
                    i + 1
                );
            }
        }
    }
}
