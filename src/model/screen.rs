//! Screens and panels.
//!
//! A [`Screen`] is one of the four top-level application modes. A [`Panel`]
//! is an independently focusable region hosted by a screen.

/// Top-level application mode. Exactly one is current.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Screen {
    /// Pick a kubeconfig context.
    Context,
    /// Pick a namespace of the active context.
    Namespace,
    /// Pick a workload of the active namespace.
    Workload,
    /// Tail the selected workload's logs.
    Log,
}

impl Screen {
    /// Panel that receives focus whenever this screen is entered.
    pub fn canonical_panel(self) -> Panel {
        match self {
            Screen::Context => Panel::Context,
            Screen::Namespace => Panel::Namespace,
            Screen::Workload => Panel::Workload,
            Screen::Log => Panel::Log,
        }
    }

    /// Focus cycle for multi-panel screens. Single-panel screens return one entry.
    pub fn panel_cycle(self) -> &'static [Panel] {
        match self {
            Screen::Context => &[Panel::Context],
            Screen::Namespace => &[Panel::Context, Panel::Namespace],
            Screen::Workload => &[Panel::Context, Panel::Namespace, Panel::Workload],
            Screen::Log => &[Panel::Log],
        }
    }

    /// Human-readable title used in breadcrumbs and the help overlay.
    pub fn title(self) -> &'static str {
        match self {
            Screen::Context => "Contexts",
            Screen::Namespace => "Namespaces",
            Screen::Workload => "Workloads",
            Screen::Log => "Logs",
        }
    }
}

/// Focusable region within a screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Panel {
    /// Context list.
    Context,
    /// Namespace list.
    Namespace,
    /// Workload list.
    Workload,
    /// Search input line.
    Search,
    /// Log viewport.
    Log,
    /// Bottom status line.
    StatusBar,
}

impl Panel {
    /// Short name for logging.
    pub fn name(self) -> &'static str {
        match self {
            Panel::Context => "context",
            Panel::Namespace => "namespace",
            Panel::Workload => "workload",
            Panel::Search => "search",
            Panel::Log => "log",
            Panel::StatusBar => "status",
        }
    }
}

/// Direction for focus cycling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleDirection {
    /// Next panel, wrapping to the first.
    Forward,
    /// Previous panel, wrapping to the last.
    Backward,
}
