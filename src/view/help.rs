//! Help overlay listing the active key bindings.
//!
//! Built from [`KeyBindings`], so rebinding a key in the config file shows up
//! here. Dismissed by `?` or `Esc`.

use super::constants::{HELP_POPUP_HEIGHT_PERCENT, HELP_POPUP_WIDTH_PERCENT};
use super::styles::Theme;
use crate::config::KeyBindings;
use crate::model::KeyAction;
use ratatui::{
    layout::{Alignment, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

/// Width of the key column.
const KEY_COLUMN: usize = 18;

const SECTIONS: [(&str, &[KeyAction]); 5] = [
    (
        "Application",
        &[KeyAction::Quit, KeyAction::Help, KeyAction::Refresh],
    ),
    (
        "Navigation",
        &[
            KeyAction::Confirm,
            KeyAction::Back,
            KeyAction::PanelNext,
            KeyAction::PanelPrev,
        ],
    ),
    (
        "Search",
        &[
            KeyAction::SearchEnter,
            KeyAction::SearchConfirm,
            KeyAction::SearchCancel,
            KeyAction::SearchNextMatch,
            KeyAction::SearchPrevMatch,
            KeyAction::ClearSearch,
        ],
    ),
    (
        "Logs",
        &[
            KeyAction::FollowToggle,
            KeyAction::WrapToggle,
            KeyAction::TimestampToggle,
            KeyAction::Save,
        ],
    ),
    (
        "Movement",
        &[
            KeyAction::ScrollUp,
            KeyAction::ScrollDown,
            KeyAction::PageUp,
            KeyAction::PageDown,
            KeyAction::ScrollToTop,
            KeyAction::ScrollToBottom,
        ],
    ),
];

/// Render the help overlay centered on the screen.
pub fn render_help_overlay(frame: &mut Frame, bindings: &KeyBindings, theme: &Theme) {
    let area = centered_rect(HELP_POPUP_WIDTH_PERCENT, HELP_POPUP_HEIGHT_PERCENT, frame.area());
    frame.render_widget(Clear, area);

    let paragraph = Paragraph::new(build_help_content(bindings, theme))
        .block(
            Block::default()
                .title(" Keyboard Shortcuts ")
                .borders(Borders::ALL)
                .border_style(theme.focused_border),
        )
        .wrap(Wrap { trim: false })
        .alignment(Alignment::Left);
    frame.render_widget(paragraph, area);

    let hint_area = Rect {
        x: area.x,
        y: area.y + area.height.saturating_sub(1),
        width: area.width,
        height: 1,
    };
    let hint = Paragraph::new(Line::from(Span::styled(
        " Press Esc or ? to close ",
        theme.muted.add_modifier(Modifier::DIM),
    )))
    .alignment(Alignment::Center);
    frame.render_widget(hint, hint_area);
}

/// Centered rect taking the given percentages of `area`.
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let width = area.width * percent_x / 100;
    let height = area.height * percent_y / 100;
    Rect {
        x: area.x + area.width.saturating_sub(width) / 2,
        y: area.y + area.height.saturating_sub(height) / 2,
        width,
        height,
    }
}

fn build_help_content(bindings: &KeyBindings, theme: &Theme) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for (heading, actions) in SECTIONS {
        if !lines.is_empty() {
            lines.push(Line::default());
        }
        lines.push(Line::from(Span::styled(heading, theme.header)));
        for action in actions {
            let keys = bindings.keys_for(*action);
            if keys.is_empty() {
                continue;
            }
            lines.push(Line::from(vec![
                Span::styled(format!("  {:<KEY_COLUMN$}", keys.join("/")), theme.key),
                Span::raw(action.description()),
            ]));
        }
    }
    lines
}

#[cfg(test)]
#[path = "help_tests.rs"]
mod tests;
