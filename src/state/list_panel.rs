//! Selectable, filterable list backing the context, namespace and workload panels.

use crate::model::{KeyAction, KubeContext, Namespace, Workload};
use crate::state::panel::{Focusable, Scrollable, Searchable};
use ratatui::widgets::ListState;

/// An entry that can be shown in a [`ListPanel`].
pub trait ListItem {
    /// Text matched by the filter and shown first.
    fn label(&self) -> &str;

    /// Secondary column (e.g. a status), if any.
    fn detail(&self) -> Option<&str> {
        None
    }
}

impl ListItem for KubeContext {
    fn label(&self) -> &str {
        &self.name
    }
}

impl ListItem for Namespace {
    fn label(&self) -> &str {
        &self.name
    }

    fn detail(&self) -> Option<&str> {
        Some(&self.status)
    }
}

impl ListItem for Workload {
    fn label(&self) -> &str {
        &self.name
    }

    fn detail(&self) -> Option<&str> {
        Some(self.status.as_str())
    }
}

/// Already-materialized items, a filter over them and a selection.
///
/// The selection in `state` indexes the *visible* (filtered) items.
#[derive(Debug, Clone)]
pub struct ListPanel<T> {
    title: &'static str,
    items: Vec<T>,
    filter: String,
    visible: Vec<usize>,
    state: ListState,
    loading: bool,
    page_size: usize,
}

impl<T: ListItem> ListPanel<T> {
    /// Empty panel titled `title`.
    pub fn new(title: &'static str) -> Self {
        Self {
            title,
            items: Vec::new(),
            filter: String::new(),
            visible: Vec::new(),
            state: ListState::default(),
            loading: false,
            page_size: 10,
        }
    }

    /// Replace the items, keeping the selection index clamped to the new length.
    pub fn set_items(&mut self, items: Vec<T>) {
        self.items = items;
        self.loading = false;
        self.refilter();
    }

    /// Drop all items (the parent selection changed).
    pub fn clear(&mut self) {
        self.items.clear();
        self.visible.clear();
        self.filter.clear();
        self.state.select(None);
    }

    /// Mark a listing as in flight.
    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    /// Whether a listing is in flight.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Number of items, ignoring the filter.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether there are no items at all.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items passing the filter, in order.
    pub fn visible_items(&self) -> impl Iterator<Item = &T> + '_ {
        self.visible.iter().filter_map(|i| self.items.get(*i))
    }

    /// Number of items passing the filter.
    pub fn visible_len(&self) -> usize {
        self.visible.len()
    }

    /// Highlighted item, if any.
    pub fn selected(&self) -> Option<&T> {
        let visible_index = self.state.selected()?;
        let item_index = *self.visible.get(visible_index)?;
        self.items.get(item_index)
    }

    /// Select the first visible item matching `pred`. Returns whether one was found.
    pub fn select_where(&mut self, pred: impl Fn(&T) -> bool) -> bool {
        let found = self
            .visible
            .iter()
            .position(|i| self.items.get(*i).is_some_and(&pred));
        if let Some(pos) = found {
            self.state.select(Some(pos));
        }
        found.is_some()
    }

    /// Selection state handed to the ratatui `List` widget.
    pub fn state_mut(&mut self) -> &mut ListState {
        &mut self.state
    }

    fn refilter(&mut self) {
        let needle = self.filter.to_lowercase();
        self.visible = self
            .items
            .iter()
            .enumerate()
            .filter(|(_, item)| needle.is_empty() || item.label().to_lowercase().contains(&needle))
            .map(|(i, _)| i)
            .collect();

        let selected = match (self.state.selected(), self.visible.len()) {
            (_, 0) => None,
            (Some(i), len) => Some(i.min(len - 1)),
            (None, _) => Some(0),
        };
        self.state.select(selected);
    }

    fn move_by(&mut self, delta: isize) {
        if self.visible.is_empty() {
            return;
        }
        let last = self.visible.len() - 1;
        let current = self.state.selected().unwrap_or(0);
        let target = current.saturating_add_signed(delta).min(last);
        self.state.select(Some(target));
    }
}

impl<T: ListItem> Focusable for ListPanel<T> {
    fn title(&self) -> String {
        let mut title = format!("{} ({})", self.title, self.visible.len());
        if !self.filter.is_empty() {
            title.push_str(&format!(" /{}", self.filter));
        }
        if self.loading {
            title.push_str(" loading…");
        }
        title
    }
}

impl<T: ListItem> Searchable for ListPanel<T> {
    fn apply_query(&mut self, query: &str) {
        if self.filter != query {
            self.filter = query.to_string();
            self.refilter();
        }
    }

    fn applied_query(&self) -> &str {
        &self.filter
    }
}

impl<T: ListItem> Scrollable for ListPanel<T> {
    fn scroll(&mut self, action: KeyAction) -> bool {
        let page = self.page_size.max(1) as isize;
        match action {
            KeyAction::ScrollUp => self.move_by(-1),
            KeyAction::ScrollDown => self.move_by(1),
            KeyAction::PageUp => self.move_by(-page),
            KeyAction::PageDown => self.move_by(page),
            KeyAction::ScrollToTop => self.move_by(isize::MIN),
            KeyAction::ScrollToBottom => self.move_by(isize::MAX),
            _ => return false,
        }
        true
    }

    fn set_page_size(&mut self, rows: usize) {
        self.page_size = rows;
    }
}
