//! Screen and panel focus state machine.
//!
//! Owns which screen is current, which panel has focus and whether search
//! entry is active. Every operation is total: an invalid request is rejected
//! and leaves the session untouched.

use crate::model::{CycleDirection, Panel, Screen};
use tracing::debug;

// ===== Transition table =====

/// Every permitted screen change. Anything absent is rejected.
const TRANSITIONS: [(Screen, Screen); 6] = [
    (Screen::Context, Screen::Namespace),
    (Screen::Namespace, Screen::Workload),
    (Screen::Workload, Screen::Log),
    (Screen::Log, Screen::Workload),
    (Screen::Workload, Screen::Namespace),
    (Screen::Namespace, Screen::Context),
];

/// Whether `from -> to` appears in the transition table.
pub fn is_allowed(from: Screen, to: Screen) -> bool {
    TRANSITIONS.contains(&(from, to))
}

/// Screen one level up the hierarchy, if any.
pub fn back_target(from: Screen) -> Option<Screen> {
    match from {
        Screen::Log => Some(Screen::Workload),
        Screen::Workload => Some(Screen::Namespace),
        Screen::Namespace => Some(Screen::Context),
        Screen::Context => None,
    }
}

// ===== NavigationSession =====

/// Navigation state for one run of the application.
///
/// `focused` is always a panel hosted by `current` (or `Search` while search
/// entry is active); only the methods below change it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationSession {
    current: Screen,
    focused: Panel,
    previous: Screen,
    search_active: bool,
    history: Vec<Screen>,
}

impl Default for NavigationSession {
    fn default() -> Self {
        Self::new()
    }
}

impl NavigationSession {
    /// Session on the context screen with the context list focused.
    pub fn new() -> Self {
        Self {
            current: Screen::Context,
            focused: Panel::Context,
            previous: Screen::Context,
            search_active: false,
            history: vec![Screen::Context],
        }
    }

    /// Screen shown now.
    pub fn current(&self) -> Screen {
        self.current
    }

    /// Panel receiving forwarded keys.
    pub fn focused(&self) -> Panel {
        self.focused
    }

    /// Screen left by the last accepted transition.
    pub fn previous(&self) -> Screen {
        self.previous
    }

    /// Whether the search input is open.
    pub fn search_active(&self) -> bool {
        self.search_active
    }

    /// Screens entered so far, oldest first. Only actual changes are recorded.
    pub fn history(&self) -> &[Screen] {
        &self.history
    }

    /// Move to `to` if the table allows it.
    ///
    /// Returns `true` when the request was accepted. A request for the current
    /// screen is accepted without changing anything.
    pub fn request_transition(&mut self, to: Screen) -> bool {
        if to == self.current {
            return true;
        }
        if !is_allowed(self.current, to) {
            debug!(from = ?self.current, ?to, "transition rejected");
            return false;
        }

        debug!(from = ?self.current, ?to, "transition");
        self.previous = self.current;
        self.current = to;
        self.history.push(to);
        self.focused = to.canonical_panel();
        self.search_active = false;
        true
    }

    /// Go one level up the hierarchy. `false` on the Context screen.
    pub fn navigate_back(&mut self) -> bool {
        match back_target(self.current) {
            Some(target) => self.request_transition(target),
            None => false,
        }
    }

    /// Whether [`NavigationSession::navigate_back`] would move.
    pub fn can_navigate_back(&self) -> bool {
        back_target(self.current).is_some()
    }

    /// Move focus around the current screen's panel cycle, wrapping.
    ///
    /// No-op on single-panel screens. If focus is outside the cycle the walk
    /// starts from the canonical panel.
    pub fn cycle_panel(&mut self, direction: CycleDirection) {
        let cycle = self.current.panel_cycle();
        if cycle.len() < 2 {
            return;
        }

        let start = cycle
            .iter()
            .position(|p| *p == self.focused)
            .or_else(|| {
                cycle
                    .iter()
                    .position(|p| *p == self.current.canonical_panel())
            })
            .unwrap_or(0);

        let len = cycle.len();
        let next = match direction {
            CycleDirection::Forward => (start + 1) % len,
            CycleDirection::Backward => (start + len - 1) % len,
        };
        self.focused = cycle[next];
        debug!(panel = self.focused.name(), "focus moved");
    }

    /// Open search entry and focus the search input.
    pub fn enter_search(&mut self) {
        self.search_active = true;
        self.focused = Panel::Search;
    }

    /// Leave search entry; focus returns to the screen's canonical panel.
    pub fn exit_search(&mut self) {
        self.search_active = false;
        self.focused = self.current.canonical_panel();
    }

    /// Panels laid out on the current screen, top to bottom.
    pub fn panels(&self) -> Vec<Panel> {
        let mut panels = self.current.panel_cycle().to_vec();
        if self.search_active {
            panels.push(Panel::Search);
        }
        panels.push(Panel::StatusBar);
        panels
    }

    /// `Contexts > Namespaces > ...` down to the current screen.
    pub fn breadcrumb(&self) -> String {
        let depth = match self.current {
            Screen::Context => 1,
            Screen::Namespace => 2,
            Screen::Workload => 3,
            Screen::Log => 4,
        };
        [Screen::Context, Screen::Namespace, Screen::Workload, Screen::Log]
            .iter()
            .take(depth)
            .map(|s| s.title())
            .collect::<Vec<_>>()
            .join(" > ")
    }
}

#[cfg(test)]
#[path = "navigation_tests.rs"]
mod tests;
