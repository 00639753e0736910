//! Domain-level keyboard actions independent of key bindings.

/// Domain-level actions that can be mapped to configurable key bindings.
///
/// These represent user intent, not specific keys. The mapping from
/// crossterm::event::KeyEvent to KeyAction is handled by KeyBindings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyAction {
    // Application
    /// Exit the application. Default: q/Ctrl+c
    Quit,
    /// Show or hide the help overlay. Default: ?/F1
    Help,
    /// Reload the current screen's data. Default: r/Ctrl+r
    Refresh,

    // Navigation
    /// Select the highlighted item and enter the next screen. Default: Enter
    Confirm,
    /// Return to the previous screen. Default: Esc/Backspace
    Back,
    /// Focus the next panel on multi-panel screens. Default: Tab
    PanelNext,
    /// Focus the previous panel on multi-panel screens. Default: Shift+Tab
    PanelPrev,

    // Search
    /// Open the search input. Default: /
    SearchEnter,
    /// Apply the typed query and close the search input. Default: Enter
    SearchConfirm,
    /// Close the search input, restoring the previous query. Default: Esc
    SearchCancel,
    /// Jump to the next match. Default: n
    SearchNextMatch,
    /// Jump to the previous match. Default: N
    SearchPrevMatch,
    /// Drop the applied query or list filter. Default: x
    ClearSearch,

    // Log viewer
    /// Toggle auto-scroll to newest line. Default: f
    FollowToggle,
    /// Toggle line wrapping. Default: w
    WrapToggle,
    /// Toggle visibility of leading timestamps. Default: t
    TimestampToggle,
    /// Save the buffered log lines to a file. Default: s
    Save,

    // Scrolling (forwarded to the focused panel)
    /// Move up one line. Default: k/↑
    ScrollUp,
    /// Move down one line. Default: j/↓
    ScrollDown,
    /// Move up one page. Default: PageUp/Ctrl+u/b
    PageUp,
    /// Move down one page. Default: PageDown/Ctrl+d/Space
    PageDown,
    /// Jump to the first line. Default: g/Home
    ScrollToTop,
    /// Jump to the last line. Default: G/End
    ScrollToBottom,
}

impl KeyAction {
    /// Every action, in help-overlay order.
    pub const ALL: [KeyAction; 23] = [
        KeyAction::Quit,
        KeyAction::Help,
        KeyAction::Refresh,
        KeyAction::Confirm,
        KeyAction::Back,
        KeyAction::PanelNext,
        KeyAction::PanelPrev,
        KeyAction::SearchEnter,
        KeyAction::SearchConfirm,
        KeyAction::SearchCancel,
        KeyAction::SearchNextMatch,
        KeyAction::SearchPrevMatch,
        KeyAction::ClearSearch,
        KeyAction::FollowToggle,
        KeyAction::WrapToggle,
        KeyAction::TimestampToggle,
        KeyAction::Save,
        KeyAction::ScrollUp,
        KeyAction::ScrollDown,
        KeyAction::PageUp,
        KeyAction::PageDown,
        KeyAction::ScrollToTop,
        KeyAction::ScrollToBottom,
    ];

    /// Stable snake_case name used in the `[keybindings]` config table.
    pub fn config_name(self) -> &'static str {
        match self {
            KeyAction::Quit => "quit",
            KeyAction::Help => "help",
            KeyAction::Refresh => "refresh",
            KeyAction::Confirm => "confirm",
            KeyAction::Back => "back",
            KeyAction::PanelNext => "panel_next",
            KeyAction::PanelPrev => "panel_prev",
            KeyAction::SearchEnter => "search_enter",
            KeyAction::SearchConfirm => "search_confirm",
            KeyAction::SearchCancel => "search_cancel",
            KeyAction::SearchNextMatch => "search_next_match",
            KeyAction::SearchPrevMatch => "search_prev_match",
            KeyAction::ClearSearch => "clear_search",
            KeyAction::FollowToggle => "follow_toggle",
            KeyAction::WrapToggle => "wrap_toggle",
            KeyAction::TimestampToggle => "timestamp_toggle",
            KeyAction::Save => "save",
            KeyAction::ScrollUp => "scroll_up",
            KeyAction::ScrollDown => "scroll_down",
            KeyAction::PageUp => "page_up",
            KeyAction::PageDown => "page_down",
            KeyAction::ScrollToTop => "scroll_to_top",
            KeyAction::ScrollToBottom => "scroll_to_bottom",
        }
    }

    /// One-line description for the help overlay.
    pub fn description(self) -> &'static str {
        match self {
            KeyAction::Quit => "Quit",
            KeyAction::Help => "Toggle this help",
            KeyAction::Refresh => "Reload current screen",
            KeyAction::Confirm => "Select highlighted item",
            KeyAction::Back => "Back to previous screen",
            KeyAction::PanelNext => "Focus next panel",
            KeyAction::PanelPrev => "Focus previous panel",
            KeyAction::SearchEnter => "Search / filter",
            KeyAction::SearchConfirm => "Apply search",
            KeyAction::SearchCancel => "Cancel search",
            KeyAction::SearchNextMatch => "Next match",
            KeyAction::SearchPrevMatch => "Previous match",
            KeyAction::ClearSearch => "Clear search",
            KeyAction::FollowToggle => "Toggle follow",
            KeyAction::WrapToggle => "Toggle line wrap",
            KeyAction::TimestampToggle => "Toggle timestamps",
            KeyAction::Save => "Save logs to file",
            KeyAction::ScrollUp => "Up one line",
            KeyAction::ScrollDown => "Down one line",
            KeyAction::PageUp => "Up one page",
            KeyAction::PageDown => "Down one page",
            KeyAction::ScrollToTop => "Jump to top",
            KeyAction::ScrollToBottom => "Jump to bottom",
        }
    }

    /// Inverse of [`KeyAction::config_name`].
    pub fn from_config_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.config_name() == name)
    }

    /// Actions that only make sense while the search input is open.
    pub fn is_search_edit(self) -> bool {
        matches!(self, KeyAction::SearchConfirm | KeyAction::SearchCancel)
    }

    /// Movement actions handed to whichever panel holds focus.
    pub fn is_scroll(self) -> bool {
        matches!(
            self,
            KeyAction::ScrollUp
                | KeyAction::ScrollDown
                | KeyAction::PageUp
                | KeyAction::PageDown
                | KeyAction::ScrollToTop
                | KeyAction::ScrollToBottom
        )
    }
}
