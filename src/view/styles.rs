//! Themes and color handling.
//!
//! A [`Theme`] is resolved once at startup from the configured theme name and
//! the color settings, then threaded through every render call.

use ratatui::style::{Color, Modifier, Style};
use tracing::warn;

/// Name of the colored theme.
pub const THEME_DEFAULT: &str = "default";
/// Name of the attribute-only theme.
pub const THEME_MONOCHROME: &str = "monochrome";

// ===== ColorConfig =====

/// Whether colors may be used.
///
/// Disabled by the `--no-color` flag or by a set `NO_COLOR` environment
/// variable (any value).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorConfig {
    enabled: bool,
}

impl ColorConfig {
    /// Colors unless `no_color_flag` is set or `NO_COLOR` exists.
    pub fn from_env_and_args(no_color_flag: bool) -> Self {
        let enabled = !no_color_flag && std::env::var_os("NO_COLOR").is_none();
        Self { enabled }
    }

    /// Whether colors may be used.
    pub fn colors_enabled(self) -> bool {
        self.enabled
    }
}

// ===== Severity =====

/// Log line severity, derived from the text at render time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Contains "error".
    Error,
    /// Contains "warn".
    Warn,
    /// Contains "info".
    Info,
    /// Contains "debug".
    Debug,
    /// None of the above.
    Plain,
}

impl Severity {
    /// First of `error`, `warn`, `info`, `debug` found (case-insensitive), in
    /// that priority order.
    pub fn of(text: &str) -> Self {
        let lower = text.to_ascii_lowercase();
        if lower.contains("error") {
            Severity::Error
        } else if lower.contains("warn") {
            Severity::Warn
        } else if lower.contains("info") {
            Severity::Info
        } else if lower.contains("debug") {
            Severity::Debug
        } else {
            Severity::Plain
        }
    }
}

// ===== Theme =====

/// Every style the renderer uses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    /// Theme name as configured.
    pub name: &'static str,
    /// Unfocused panel border.
    pub border: Style,
    /// Focused panel border.
    pub focused_border: Style,
    /// Highlighted list row.
    pub selected: Style,
    /// Breadcrumb and section headers.
    pub header: Style,
    /// Status line.
    pub status: Style,
    /// Secondary text such as list details.
    pub muted: Style,
    /// Key names in the help overlay.
    pub key: Style,
    /// Error lines and the error popup.
    pub error: Style,
    /// Warning lines.
    pub warn: Style,
    /// Info lines.
    pub info: Style,
    /// Debug lines.
    pub debug: Style,
    /// Leading timestamps.
    pub timestamp: Style,
    /// Current search match.
    pub current_match: Style,
}

impl Default for Theme {
    fn default() -> Self {
        Self::colored()
    }
}

impl Theme {
    /// Resolve a theme by name. Unknown names fall back to the default theme;
    /// disabled colors always give the monochrome theme.
    pub fn resolve(name: &str, colors: ColorConfig) -> Self {
        if !colors.colors_enabled() {
            return Self::monochrome();
        }
        match name {
            THEME_DEFAULT => Self::colored(),
            THEME_MONOCHROME => Self::monochrome(),
            other => {
                warn!(theme = other, "unknown theme, using default");
                Self::colored()
            }
        }
    }

    fn colored() -> Self {
        Self {
            name: THEME_DEFAULT,
            border: Style::default().fg(Color::Gray),
            focused_border: Style::default().fg(Color::Yellow),
            selected: Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
            header: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            status: Style::default().bg(Color::DarkGray).fg(Color::White),
            muted: Style::default().fg(Color::DarkGray),
            key: Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            error: Style::default().fg(Color::Red),
            warn: Style::default().fg(Color::Yellow),
            info: Style::default().fg(Color::Green),
            debug: Style::default().fg(Color::DarkGray),
            timestamp: Style::default().fg(Color::Blue),
            current_match: Style::default().add_modifier(Modifier::REVERSED),
        }
    }

    fn monochrome() -> Self {
        let plain = Style::default();
        Self {
            name: THEME_MONOCHROME,
            border: plain,
            focused_border: plain.add_modifier(Modifier::BOLD),
            selected: plain.add_modifier(Modifier::REVERSED),
            header: plain.add_modifier(Modifier::BOLD),
            status: plain.add_modifier(Modifier::REVERSED),
            muted: plain.add_modifier(Modifier::DIM),
            key: plain.add_modifier(Modifier::BOLD),
            error: plain.add_modifier(Modifier::BOLD),
            warn: plain,
            info: plain,
            debug: plain.add_modifier(Modifier::DIM),
            timestamp: plain.add_modifier(Modifier::DIM),
            current_match: plain.add_modifier(Modifier::REVERSED),
        }
    }

    /// Style for a line of `severity`.
    pub fn severity(&self, severity: Severity) -> Style {
        match severity {
            Severity::Error => self.error,
            Severity::Warn => self.warn,
            Severity::Info => self.info,
            Severity::Debug => self.debug,
            Severity::Plain => Style::default(),
        }
    }

    /// Border style for a panel.
    pub fn border_for(&self, focused: bool) -> Style {
        if focused {
            self.focused_border
        } else {
            self.border
        }
    }
}
