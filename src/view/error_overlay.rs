//! Error overlay: the most recent recoverable error, dismissed by any key.

use super::constants::{ERROR_POPUP_HEIGHT, ERROR_POPUP_WIDTH_PERCENT};
use super::styles::Theme;
use crate::model::ErrorReport;
use ratatui::{
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

/// Draw `report` in a centered popup over the frame.
pub fn render_error_overlay(frame: &mut Frame, report: &ErrorReport, theme: &Theme) {
    let area = popup_area(frame.area());
    frame.render_widget(Clear, area);

    let lines = vec![
        Line::from(Span::styled(report.message.as_str(), theme.error)),
        Line::default(),
        Line::from(Span::styled("press any key to dismiss", theme.muted)),
    ];
    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .title(format!(" Error: {} ", report.context))
                .borders(Borders::ALL)
                .border_style(theme.error),
        )
        .wrap(Wrap { trim: true })
        .alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}

fn popup_area(area: Rect) -> Rect {
    let width = area.width * ERROR_POPUP_WIDTH_PERCENT / 100;
    let height = ERROR_POPUP_HEIGHT.min(area.height);
    Rect {
        x: area.x + area.width.saturating_sub(width) / 2,
        y: area.y + area.height.saturating_sub(height) / 2,
        width,
        height,
    }
}
