//! Context, namespace and workload lists.

use super::styles::Theme;
use crate::state::{Focusable, ListItem, ListPanel};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, List, Paragraph},
    Frame,
};

/// Render a list panel with its selection.
///
/// Takes the panel mutably because ratatui's `List` writes the scroll offset
/// back into the `ListState`.
pub fn render_list<T: ListItem>(
    frame: &mut Frame,
    area: Rect,
    panel: &mut ListPanel<T>,
    focused: bool,
    theme: &Theme,
) {
    let block = Block::default()
        .title(panel.title())
        .borders(Borders::ALL)
        .border_style(theme.border_for(focused));

    if panel.visible_len() == 0 {
        let text = if panel.is_loading() {
            "loading…"
        } else if panel.is_empty() {
            "nothing here"
        } else {
            "no matches"
        };
        frame.render_widget(
            Paragraph::new(Span::styled(text, theme.muted)).block(block),
            area,
        );
        return;
    }

    // Lines own their text so the panel can be borrowed mutably for the state.
    let items: Vec<Line<'static>> = panel.visible_items().map(|item| item_line(item, theme)).collect();
    let list = List::new(items)
        .block(block)
        .highlight_style(theme.selected)
        .highlight_symbol("> ");
    frame.render_stateful_widget(list, area, panel.state_mut());
}

fn item_line<T: ListItem>(item: &T, theme: &Theme) -> Line<'static> {
    let mut spans = vec![Span::raw(item.label().to_string())];
    if let Some(detail) = item.detail() {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(detail.to_string(), theme.muted));
    }
    Line::from(spans)
}
