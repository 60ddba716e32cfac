//! Architectural Enforcement Integration Tests
//!
//! Integration tests under `tests/` that keep the workspace layering honest:
//! - `infou-core` stays headless (no terminal crates, no blocking HTTP)
//! - No `std::thread::sleep` in async code
//! - No `unwrap()`/`expect()` outside tests in core
//!
//! Helpers here walk the workspace sources.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// Workspace root (two levels above this crate)
#[must_use]
pub fn workspace_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .ancestors()
        .nth(2)
        .map_or_else(|| PathBuf::from("."), Path::to_path_buf)
}

/// Every `.rs` file under `dir`, skipping build output
#[must_use]
pub fn rust_sources(dir: &Path) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .into_iter()
        .filter_entry(|e| e.file_name() != "target")
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .filter(|e| e.path().extension().is_some_and(|ext| ext == "rs"))
        .map(walkdir::DirEntry::into_path)
        .collect()
}

/// Source text with everything from the first `#[cfg(test)]` on removed
#[must_use]
pub fn production_part(source: &str) -> &str {
    source
        .find("#[cfg(test)]")
        .map_or(source, |idx| &source[..idx])
}

/// Lines of `source` (1-based) containing `needle`, ignoring comment lines
#[must_use]
pub fn offending_lines(source: &str, needle: &str) -> Vec<usize> {
    source
        .lines()
        .enumerate()
        .filter(|(_, line)| {
            let trimmed = line.trim_start();
            !trimmed.starts_with("//") && line.contains(needle)
        })
        .map(|(i, _)| i + 1)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_production_part_cuts_test_module() {
        let src = "fn a() {}\n#[cfg(test)]\nmod tests { fn b() { x.unwrap(); } }";
        assert_eq!(production_part(src), "fn a() {}\n");
    }

    #[test]
    fn test_offending_lines_skip_comments() {
        let src = "let a = 1;\n// x.unwrap()\nlet b = x.unwrap();";
        assert_eq!(offending_lines(src, ".unwrap()"), vec![3]);
    }
}
