//! Capabilities shared by panels.
//!
//! The application dispatches on [`crate::model::Panel`] with a `match` and
//! calls these traits on the concrete panel state it owns.

use crate::model::KeyAction;

/// A panel that can hold keyboard focus.
pub trait Focusable {
    /// Title drawn on the panel border.
    fn title(&self) -> String;
}

/// A panel whose content can be narrowed by the search query.
pub trait Searchable {
    /// Apply `query` to the panel's content.
    fn apply_query(&mut self, query: &str);

    /// Query currently applied.
    fn applied_query(&self) -> &str;
}

/// A panel that reacts to movement actions.
pub trait Scrollable {
    /// Handle a movement action. Returns `false` if it was not a movement.
    fn scroll(&mut self, action: KeyAction) -> bool;

    /// Rows visible at once, used for paging.
    fn set_page_size(&mut self, rows: usize);
}
