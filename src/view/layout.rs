//! Screen layout.
//!
//! ```text
//! ┌ breadcrumb ────────────────────────────────┐  HEADER_HEIGHT
//! │ panels of the current screen               │
//! │ (one, two or three columns, or the logs)   │
//! └ status text or search input ───────────────┘  STATUS_BAR_HEIGHT
//! ```
//!
//! Help and error overlays are drawn last, on top.

use super::constants::{HEADER_HEIGHT, STATUS_BAR_HEIGHT};
use super::error_overlay::render_error_overlay;
use super::help::render_help_overlay;
use super::list_pane::render_list;
use super::log_pane::LogPane;
use super::search_input::{cursor_column, SearchBar};
use super::styles::Theme;
use crate::model::{Panel, Screen};
use crate::state::AppState;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Draw the whole UI: breadcrumb, the current screen, status line and overlays.
pub fn render(frame: &mut Frame, app: &mut AppState, theme: &Theme) {
    let [header, body, status] = Layout::vertical([
        Constraint::Length(HEADER_HEIGHT),
        Constraint::Min(0),
        Constraint::Length(STATUS_BAR_HEIGHT),
    ])
    .areas(frame.area());

    render_header(frame, header, app, theme);
    render_body(frame, body, app, theme);
    render_status(frame, status, app, theme);

    if app.help_visible() {
        render_help_overlay(frame, app.bindings(), theme);
    }
    if let Some(report) = app.error() {
        render_error_overlay(frame, report, theme);
    }
}

fn render_header(frame: &mut Frame, area: Rect, app: &AppState, theme: &Theme) {
    let line = Line::from(vec![
        Span::styled(" kubeoptic ", theme.header),
        Span::raw(app.nav().breadcrumb()),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn render_body(frame: &mut Frame, area: Rect, app: &mut AppState, theme: &Theme) {
    let focused = app.nav().focused();
    match app.nav().current() {
        Screen::Context => {
            render_list(frame, area, app.contexts_mut(), focused == Panel::Context, theme);
        }
        Screen::Namespace => {
            let [left, right] =
                Layout::horizontal([Constraint::Percentage(30), Constraint::Percentage(70)])
                    .areas(area);
            render_list(frame, left, app.contexts_mut(), focused == Panel::Context, theme);
            render_list(
                frame,
                right,
                app.namespaces_mut(),
                focused == Panel::Namespace,
                theme,
            );
        }
        Screen::Workload => {
            let [left, middle, right] = Layout::horizontal([
                Constraint::Percentage(20),
                Constraint::Percentage(25),
                Constraint::Percentage(55),
            ])
            .areas(area);
            render_list(frame, left, app.contexts_mut(), focused == Panel::Context, theme);
            render_list(
                frame,
                middle,
                app.namespaces_mut(),
                focused == Panel::Namespace,
                theme,
            );
            render_list(
                frame,
                right,
                app.workloads_mut(),
                focused == Panel::Workload,
                theme,
            );
        }
        Screen::Log => {
            frame.render_widget(LogPane::new(app.viewer(), theme, true), area);
        }
    }
}

fn render_status(frame: &mut Frame, area: Rect, app: &AppState, theme: &Theme) {
    if app.nav().search_active() {
        let input = app.search_input();
        frame.render_widget(SearchBar::new(input, theme), area);
        let column = area.x.saturating_add(cursor_column(input));
        frame.set_cursor_position((column.min(area.right().saturating_sub(1)), area.y));
        return;
    }
    frame.render_widget(
        Paragraph::new(format!(" {}", app.status_text())).style(theme.status),
        area,
    );
}

#[cfg(test)]
#[path = "layout_tests.rs"]
mod tests;
