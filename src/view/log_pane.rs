//! Log pane widget: the viewport of the streaming log viewer.

use super::styles::{Severity, Theme};
use crate::state::{split_timestamp, Focusable, LogLine, LogViewer, StreamPhase};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

// ===== LogPane Widget =====

/// Renders the displayed lines currently inside the viewer's viewport.
///
/// - severity colors derived from the line text
/// - leading timestamps hidden unless timestamp visibility is on
/// - the current search match drawn in the match style
pub struct LogPane<'a> {
    viewer: &'a LogViewer,
    theme: &'a Theme,
    focused: bool,
}

impl<'a> LogPane<'a> {
    /// Pane over `viewer`; `focused` picks the border style.
    pub fn new(viewer: &'a LogViewer, theme: &'a Theme, focused: bool) -> Self {
        Self {
            viewer,
            theme,
            focused,
        }
    }

    fn placeholder(&self) -> &'static str {
        match self.viewer.phase() {
            StreamPhase::Idle => "no log stream",
            StreamPhase::Streaming if self.viewer.search().is_active() => "no matching lines",
            StreamPhase::Streaming => "waiting for log output…",
            StreamPhase::Stopped => "log stream ended",
            StreamPhase::Errored => "log stream failed to open",
        }
    }
}

impl Widget for LogPane<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(self.viewer.title())
            .borders(Borders::ALL)
            .border_style(self.theme.border_for(self.focused));

        let current = self.viewer.search().current_match();
        let lines: Vec<Line> = self
            .viewer
            .visible_lines()
            .into_iter()
            .map(|(index, line)| {
                render_line(
                    line,
                    self.viewer.show_timestamps(),
                    current == Some(index),
                    self.theme,
                )
            })
            .collect();

        let paragraph = if lines.is_empty() {
            Paragraph::new(Line::from(Span::styled(self.placeholder(), self.theme.muted)))
        } else {
            Paragraph::new(lines)
        };
        let paragraph = if self.viewer.wrap() {
            paragraph.wrap(Wrap { trim: false })
        } else {
            paragraph
        };

        paragraph.block(block).render(area, buf);
    }
}

/// Style one log line.
pub fn render_line<'a>(
    line: &'a LogLine,
    show_timestamps: bool,
    is_current_match: bool,
    theme: &Theme,
) -> Line<'a> {
    let (timestamp, body) = split_timestamp(&line.text);
    let mut style = theme.severity(Severity::of(body));
    if is_current_match {
        style = style.patch(theme.current_match);
    }

    let mut spans = Vec::with_capacity(3);
    if let (true, Some(ts)) = (show_timestamps, timestamp) {
        spans.push(Span::styled(ts, theme.timestamp));
        spans.push(Span::styled(" ", Style::default()));
    }
    spans.push(Span::styled(body, style));
    Line::from(spans)
}
