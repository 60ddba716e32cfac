//! Theme and Colors
//!
//! InfoU's palette: a calm reading blue for accents, level colors that stay
//! the same on every screen, and the usual status colors.

use ratatui::style::{Color, Modifier, Style};

use infou_core::ToastKind;

// ============================================================================
// Brand
// ============================================================================

/// Accent for titles and the highlighted row
pub const INFOU_BLUE: Color = Color::Rgb(96, 165, 250);

/// Body text in the reader
pub const READING_TEXT: Color = Color::Rgb(226, 232, 240);

/// Secondary text (descriptions, hints)
pub const DIM_GRAY: Color = Color::Rgb(120, 120, 120);

// ============================================================================
// Levels
// ============================================================================

/// Beginner
pub const LEVEL_BEGINNER: Color = Color::Rgb(134, 239, 172);

/// Intermediate
pub const LEVEL_INTERMEDIATE: Color = Color::Rgb(253, 224, 71);

/// Advanced
pub const LEVEL_ADVANCED: Color = Color::Rgb(251, 146, 60);

/// Anything else the backend defines
pub const LEVEL_OTHER: Color = Color::Rgb(196, 181, 253);

// ============================================================================
// Status
// ============================================================================

/// Error red
pub const ERROR_RED: Color = Color::Rgb(255, 80, 80);

/// Success green
pub const SUCCESS_GREEN: Color = Color::Rgb(120, 230, 120);

/// Info / loading
pub const INFO_CYAN: Color = Color::Rgb(103, 232, 249);

/// Color for a level code
#[must_use]
pub fn level_color(code: &str) -> Color {
    match code {
        "beginner" => LEVEL_BEGINNER,
        "intermediate" => LEVEL_INTERMEDIATE,
        "advanced" => LEVEL_ADVANCED,
        _ => LEVEL_OTHER,
    }
}

/// Color for a toast
#[must_use]
pub fn toast_color(kind: ToastKind) -> Color {
    match kind {
        ToastKind::Success => SUCCESS_GREEN,
        ToastKind::Error => ERROR_RED,
        ToastKind::Info => INFO_CYAN,
    }
}

/// Highlighted list row
#[must_use]
pub fn highlight() -> Style {
    Style::default().fg(INFOU_BLUE).add_modifier(Modifier::BOLD)
}

/// Section title
#[must_use]
pub fn title() -> Style {
    Style::default().fg(INFOU_BLUE).add_modifier(Modifier::BOLD)
}

/// Secondary text
#[must_use]
pub fn dim() -> Style {
    Style::default().fg(DIM_GRAY)
}

/// Inline error text
#[must_use]
pub fn error() -> Style {
    Style::default().fg(ERROR_RED)
}
