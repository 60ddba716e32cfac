//! TextBlock Widget
//!
//! A borderless, scrollable text region. The reader uses it for article
//! bodies: paragraphs are wrapped to the area width and separated by a
//! blank line.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::StatefulWidget;
use textwrap::wrap;

/// State for a scrollable text block
#[derive(Debug, Default)]
pub struct TextBlockState {
    /// Scroll offset (lines from top)
    pub scroll_offset: usize,
    /// Total content lines at the last render
    pub total_lines: usize,
}

impl TextBlockState {
    /// Scroll by delta (positive = down)
    pub fn scroll(&mut self, delta: i32) {
        let magnitude = delta.unsigned_abs() as usize;
        self.scroll_offset = if delta < 0 {
            self.scroll_offset.saturating_sub(magnitude)
        } else {
            self.scroll_offset.saturating_add(magnitude)
        };
    }

    /// Back to the first line
    pub fn scroll_to_top(&mut self) {
        self.scroll_offset = 0;
    }
}

/// A borderless, scrollable text block
pub struct TextBlock<'a> {
    paragraphs: Vec<&'a str>,
    style: Style,
}

impl<'a> TextBlock<'a> {
    /// Block over the given paragraphs
    pub fn new(paragraphs: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            paragraphs: paragraphs.into_iter().collect(),
            style: Style::default(),
        }
    }

    /// Text style
    #[must_use]
    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    /// Wrapped lines for `width` columns
    fn lines(&self, width: usize) -> Vec<String> {
        let mut lines = Vec::new();
        for (i, paragraph) in self.paragraphs.iter().enumerate() {
            if i > 0 {
                lines.push(String::new());
            }
            lines.extend(wrap(paragraph, width.max(1)).into_iter().map(|cow| cow.to_string()));
        }
        lines
    }
}

impl StatefulWidget for TextBlock<'_> {
    type State = TextBlockState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let wrapped = self.lines(area.width as usize);
        state.total_lines = wrapped.len();

        // Clamp scroll
        let max_scroll = state.total_lines.saturating_sub(area.height as usize);
        state.scroll_offset = state.scroll_offset.min(max_scroll);

        for (i, line) in wrapped
            .iter()
            .skip(state.scroll_offset)
            .take(area.height as usize)
            .enumerate()
        {
            let y = area.y + i as u16;
            buf.set_string(area.x, y, line, self.style);
        }
    }
}
