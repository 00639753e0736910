//! Key routing.
//!
//! Decides, for each key press, whether it is a global action, a navigation
//! action (possibly producing follow-up messages), or input for the focused
//! panel. Stages are checked in order and the first match wins:
//!
//! 1. Global actions (quit, help)
//! 2. Search entry (confirm, cancel, or text for the search input)
//! 3. Screen and panel actions (confirm, log viewer toggles, refresh, search)
//! 4. Focus and back navigation
//! 5. Everything else goes to the focused panel

use crate::bus::Msg;
use crate::config::KeyBindings;
use crate::model::{CycleDirection, KeyAction, Panel, Screen};
use crate::state::navigation::NavigationSession;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Actions handled before anything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlobalAction {
    /// Leave the application.
    Quit,
    /// Show or hide the help overlay.
    ToggleHelp,
}

/// Routing decision for one key press.
#[derive(Debug)]
pub enum Routed {
    /// A global action; later stages are skipped.
    Global(GlobalAction),
    /// Consumed by navigation; the messages (possibly none) follow.
    Navigation(Vec<Msg>),
    /// Input for the owner of this panel.
    Forward(Panel, KeyEvent),
}

/// Turns key presses into routing decisions using the configured bindings.
#[derive(Debug, Clone, Default)]
pub struct EventRouter {
    bindings: KeyBindings,
}

impl EventRouter {
    /// Router resolving keys through `bindings`.
    pub fn new(bindings: KeyBindings) -> Self {
        Self { bindings }
    }

    /// Bindings in use.
    pub fn bindings(&self) -> &KeyBindings {
        &self.bindings
    }

    /// Decide what `key` means, updating `nav` for navigation actions.
    pub fn route(&self, nav: &mut NavigationSession, key: KeyEvent) -> Routed {
        if let Some(global) = self.global(nav, key) {
            return Routed::Global(global);
        }

        if nav.search_active() {
            return match self.bindings.get_in_search(key) {
                Some(KeyAction::SearchConfirm) => {
                    nav.exit_search();
                    Routed::Navigation(vec![Msg::SearchConfirmed])
                }
                Some(KeyAction::SearchCancel) => {
                    nav.exit_search();
                    Routed::Navigation(vec![Msg::SearchCancelled])
                }
                _ => Routed::Forward(Panel::Search, key),
            };
        }

        let Some(action) = self.bindings.get(key) else {
            return Routed::Forward(nav.focused(), key);
        };

        if let Some(msgs) = screen_action(nav, action) {
            return Routed::Navigation(msgs);
        }

        match action {
            KeyAction::PanelNext => {
                nav.cycle_panel(CycleDirection::Forward);
                Routed::Navigation(Vec::new())
            }
            KeyAction::PanelPrev => {
                nav.cycle_panel(CycleDirection::Backward);
                Routed::Navigation(Vec::new())
            }
            KeyAction::Back => {
                let leaving_log = nav.current() == Screen::Log;
                if nav.navigate_back() && leaving_log {
                    Routed::Navigation(vec![Msg::StopStream])
                } else {
                    Routed::Navigation(Vec::new())
                }
            }
            _ => Routed::Forward(nav.focused(), key),
        }
    }

    fn global(&self, nav: &NavigationSession, key: KeyEvent) -> Option<GlobalAction> {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Some(GlobalAction::Quit);
        }
        if nav.search_active() && is_text_input(key) {
            return None;
        }
        match self.bindings.get(key) {
            Some(KeyAction::Quit) => Some(GlobalAction::Quit),
            Some(KeyAction::Help) => Some(GlobalAction::ToggleHelp),
            _ => None,
        }
    }
}

/// A printable character with no modifier other than `Shift`.
pub fn is_text_input(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char(_))
        && key.modifiers.difference(KeyModifiers::SHIFT).is_empty()
}

/// Stage 3. `None` means the action is not screen-specific here.
fn screen_action(nav: &mut NavigationSession, action: KeyAction) -> Option<Vec<Msg>> {
    let screen = nav.current();
    match action {
        KeyAction::Confirm => confirm(nav),
        KeyAction::Refresh => Some(vec![Msg::Refresh]),
        KeyAction::SearchEnter => {
            nav.enter_search();
            Some(vec![Msg::SearchStarted])
        }
        KeyAction::ClearSearch => Some(vec![Msg::ClearSearch]),
        KeyAction::FollowToggle if screen == Screen::Log => Some(vec![Msg::ToggleFollow]),
        KeyAction::WrapToggle if screen == Screen::Log => Some(vec![Msg::ToggleWrap]),
        KeyAction::TimestampToggle if screen == Screen::Log => Some(vec![Msg::ToggleTimestamps]),
        KeyAction::Save if screen == Screen::Log => Some(vec![Msg::SaveLogs]),
        KeyAction::SearchNextMatch if screen == Screen::Log => Some(vec![Msg::NextMatch]),
        KeyAction::SearchPrevMatch if screen == Screen::Log => Some(vec![Msg::PrevMatch]),
        _ => None,
    }
}

/// Confirm on a list panel selects the highlighted item.
///
/// Confirming the screen's own list descends a level; confirming a parent
/// list on a deeper screen reloads below it in place (or, for the context
/// list on the workload screen, steps back to namespaces).
fn confirm(nav: &mut NavigationSession) -> Option<Vec<Msg>> {
    match (nav.current(), nav.focused()) {
        (Screen::Context, Panel::Context) => {
            nav.request_transition(Screen::Namespace)
                .then(|| vec![Msg::ContextSelected])
        }
        (Screen::Namespace, Panel::Namespace) => {
            nav.request_transition(Screen::Workload)
                .then(|| vec![Msg::NamespaceSelected])
        }
        (Screen::Workload, Panel::Workload) => {
            nav.request_transition(Screen::Log)
                .then(|| vec![Msg::WorkloadSelected])
        }
        (Screen::Namespace, Panel::Context) => Some(vec![Msg::ContextSelected]),
        (Screen::Workload, Panel::Namespace) => Some(vec![Msg::NamespaceSelected]),
        (Screen::Workload, Panel::Context) => {
            nav.request_transition(Screen::Namespace)
                .then(|| vec![Msg::ContextSelected])
        }
        _ => None,
    }
}

#[cfg(test)]
#[path = "router_tests.rs"]
mod tests;
