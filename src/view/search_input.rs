//! Search input line, drawn in place of the status bar while searching.

use super::styles::Theme;
use crate::state::SearchInput;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};
use unicode_width::UnicodeWidthStr;

const PROMPT: &str = "/";

/// Search bar widget showing the draft query.
pub struct SearchBar<'a> {
    input: &'a SearchInput,
    theme: &'a Theme,
}

impl<'a> SearchBar<'a> {
    /// Bar showing `input`.
    pub fn new(input: &'a SearchInput, theme: &'a Theme) -> Self {
        Self { input, theme }
    }
}

impl Widget for SearchBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let line = Line::from(vec![
            Span::styled(PROMPT, self.theme.key),
            Span::raw(self.input.text()),
        ]);
        Paragraph::new(line).render(area, buf);
    }
}

/// Terminal column of the cursor, relative to the bar's left edge.
///
/// Measured in display cells so wide characters place the cursor correctly.
pub fn cursor_column(input: &SearchInput) -> u16 {
    let cells = PROMPT.width() + input.before_cursor().width();
    u16::try_from(cells).unwrap_or(u16::MAX)
}
