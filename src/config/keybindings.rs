//! Keyboard bindings configuration.
//!
//! Two maps are kept: one consulted while browsing, one consulted while the
//! search input is open. Keys are normalized before insertion and lookup so
//! terminals that report `Shift` alongside an uppercase character (or not)
//! resolve identically.

use crate::model::key_action::KeyAction;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::HashMap;
use thiserror::Error;

/// A key string from the config file that could not be understood.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum KeyParseError {
    /// Nothing to parse.
    #[error("empty key string")]
    Empty,
    /// A `+`-separated prefix that is not ctrl, alt or shift.
    #[error("unknown modifier \"{0}\"")]
    UnknownModifier(String),
    /// A key name with no crossterm equivalent.
    #[error("unknown key \"{0}\"")]
    UnknownKey(String),
}

/// Maps keyboard events to domain actions.
///
/// Provides default vim-style bindings with option to override via configuration.
#[derive(Debug, Clone)]
pub struct KeyBindings {
    normal: HashMap<KeyEvent, KeyAction>,
    search: HashMap<KeyEvent, KeyAction>,
}

impl KeyBindings {
    /// Look up the action for a key event outside search entry.
    pub fn get(&self, key: KeyEvent) -> Option<KeyAction> {
        self.normal.get(&normalize(key)).copied()
    }

    /// Look up the action for a key event while search entry is active.
    pub fn get_in_search(&self, key: KeyEvent) -> Option<KeyAction> {
        self.search.get(&normalize(key)).copied()
    }

    /// Replace every key bound to `action` with `keys`.
    ///
    /// A key taken from another action is unbound there first.
    pub fn rebind(&mut self, action: KeyAction, keys: &[KeyEvent]) {
        let map = if action.is_search_edit() {
            &mut self.search
        } else {
            &mut self.normal
        };
        map.retain(|_, bound| *bound != action);
        for key in keys {
            map.insert(normalize(*key), action);
        }
    }

    /// Keys bound to `action`, rendered for the help overlay, sorted.
    pub fn keys_for(&self, action: KeyAction) -> Vec<String> {
        let map = if action.is_search_edit() {
            &self.search
        } else {
            &self.normal
        };
        let mut keys: Vec<String> = map
            .iter()
            .filter(|(_, bound)| **bound == action)
            .map(|(key, _)| format_key(*key))
            .collect();
        keys.sort();
        keys
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        use KeyAction::*;
        const NONE: KeyModifiers = KeyModifiers::NONE;
        const CTRL: KeyModifiers = KeyModifiers::CONTROL;

        let normal_defaults: &[(KeyCode, KeyModifiers, KeyAction)] = &[
            // Application
            (KeyCode::Char('q'), NONE, Quit),
            (KeyCode::Char('c'), CTRL, Quit),
            (KeyCode::Char('?'), NONE, Help),
            (KeyCode::F(1), NONE, Help),
            (KeyCode::Char('r'), NONE, Refresh),
            (KeyCode::Char('r'), CTRL, Refresh),
            // Navigation
            (KeyCode::Enter, NONE, Confirm),
            (KeyCode::Esc, NONE, Back),
            (KeyCode::Backspace, NONE, Back),
            (KeyCode::Tab, NONE, PanelNext),
            (KeyCode::BackTab, NONE, PanelPrev),
            // Search
            (KeyCode::Char('/'), NONE, SearchEnter),
            (KeyCode::Char('n'), NONE, SearchNextMatch),
            (KeyCode::Char('N'), NONE, SearchPrevMatch),
            (KeyCode::Char('x'), NONE, ClearSearch),
            // Log viewer
            (KeyCode::Char('f'), NONE, FollowToggle),
            (KeyCode::Char('w'), NONE, WrapToggle),
            (KeyCode::Char('t'), NONE, TimestampToggle),
            (KeyCode::Char('s'), NONE, Save),
            // Scrolling
            (KeyCode::Up, NONE, ScrollUp),
            (KeyCode::Char('k'), NONE, ScrollUp),
            (KeyCode::Down, NONE, ScrollDown),
            (KeyCode::Char('j'), NONE, ScrollDown),
            (KeyCode::PageUp, NONE, PageUp),
            (KeyCode::Char('b'), NONE, PageUp),
            (KeyCode::Char('u'), CTRL, PageUp),
            (KeyCode::PageDown, NONE, PageDown),
            (KeyCode::Char(' '), NONE, PageDown),
            (KeyCode::Char('d'), CTRL, PageDown),
            (KeyCode::Home, NONE, ScrollToTop),
            (KeyCode::Char('g'), NONE, ScrollToTop),
            (KeyCode::End, NONE, ScrollToBottom),
            (KeyCode::Char('G'), NONE, ScrollToBottom),
        ];

        let search_defaults: &[(KeyCode, KeyModifiers, KeyAction)] = &[
            (KeyCode::Enter, NONE, SearchConfirm),
            (KeyCode::Esc, NONE, SearchCancel),
        ];

        let build = |table: &[(KeyCode, KeyModifiers, KeyAction)]| {
            table
                .iter()
                .map(|(code, mods, action)| (normalize(KeyEvent::new(*code, *mods)), *action))
                .collect()
        };

        Self {
            normal: build(normal_defaults),
            search: build(search_defaults),
        }
    }
}

/// Canonical form used as the map key.
///
/// Drops event kind/state and the `Shift` modifier where the key code already
/// carries it (characters, `BackTab`).
pub fn normalize(key: KeyEvent) -> KeyEvent {
    let mut modifiers = key.modifiers;
    if matches!(key.code, KeyCode::Char(_) | KeyCode::BackTab) {
        modifiers.remove(KeyModifiers::SHIFT);
    }
    KeyEvent::new(key.code, modifiers)
}

/// Parse a key string such as `"q"`, `"ctrl+c"`, `"shift+tab"`, `"pgdown"` or `"f1"`.
pub fn parse_key(raw: &str) -> Result<KeyEvent, KeyParseError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(KeyParseError::Empty);
    }
    // A bare "+" is the plus key, not a separator.
    if raw == "+" {
        return Ok(KeyEvent::new(KeyCode::Char('+'), KeyModifiers::NONE));
    }

    let mut parts: Vec<&str> = raw.split('+').collect();
    let key_part = parts.pop().unwrap_or_default();
    let mut modifiers = KeyModifiers::NONE;
    for part in parts {
        match part.to_ascii_lowercase().as_str() {
            "ctrl" | "control" => modifiers |= KeyModifiers::CONTROL,
            "alt" | "meta" => modifiers |= KeyModifiers::ALT,
            "shift" => modifiers |= KeyModifiers::SHIFT,
            other => return Err(KeyParseError::UnknownModifier(other.to_string())),
        }
    }

    let mut chars = key_part.chars();
    let code = match (chars.next(), chars.next()) {
        (Some(c), None) => {
            if modifiers.contains(KeyModifiers::SHIFT) {
                KeyCode::Char(c.to_ascii_uppercase())
            } else {
                KeyCode::Char(c)
            }
        }
        _ => match key_part.to_ascii_lowercase().as_str() {
            "enter" | "return" => KeyCode::Enter,
            "esc" | "escape" => KeyCode::Esc,
            "backspace" => KeyCode::Backspace,
            "tab" if modifiers.contains(KeyModifiers::SHIFT) => KeyCode::BackTab,
            "tab" => KeyCode::Tab,
            "backtab" => KeyCode::BackTab,
            "space" => KeyCode::Char(' '),
            "up" => KeyCode::Up,
            "down" => KeyCode::Down,
            "left" => KeyCode::Left,
            "right" => KeyCode::Right,
            "home" => KeyCode::Home,
            "end" => KeyCode::End,
            "pgup" | "pageup" => KeyCode::PageUp,
            "pgdown" | "pagedown" => KeyCode::PageDown,
            "delete" | "del" => KeyCode::Delete,
            other => match other.strip_prefix('f').and_then(|n| n.parse::<u8>().ok()) {
                Some(n) if (1..=12).contains(&n) => KeyCode::F(n),
                _ => return Err(KeyParseError::UnknownKey(key_part.to_string())),
            },
        },
    };

    Ok(normalize(KeyEvent::new(code, modifiers)))
}

/// Human-readable form of a normalized key, e.g. `ctrl+c`, `PgDn`, `G`.
pub fn format_key(key: KeyEvent) -> String {
    let base = match key.code {
        KeyCode::Char(' ') => "Space".to_string(),
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Esc => "Esc".to_string(),
        KeyCode::Backspace => "Backspace".to_string(),
        KeyCode::Tab => "Tab".to_string(),
        KeyCode::BackTab => "Shift+Tab".to_string(),
        KeyCode::Up => "↑".to_string(),
        KeyCode::Down => "↓".to_string(),
        KeyCode::Left => "←".to_string(),
        KeyCode::Right => "→".to_string(),
        KeyCode::Home => "Home".to_string(),
        KeyCode::End => "End".to_string(),
        KeyCode::PageUp => "PgUp".to_string(),
        KeyCode::PageDown => "PgDn".to_string(),
        KeyCode::Delete => "Del".to_string(),
        KeyCode::F(n) => format!("F{n}"),
        other => format!("{other:?}"),
    };

    let mut prefix = String::new();
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        prefix.push_str("Ctrl+");
    }
    if key.modifiers.contains(KeyModifiers::ALT) {
        prefix.push_str("Alt+");
    }
    if key.modifiers.contains(KeyModifiers::SHIFT) {
        prefix.push_str("Shift+");
    }
    prefix + &base
}
