//! Application state and the single update function.
//!
//! [`AppState`] owns every piece of UI state. [`AppState::update`] consumes one
//! [`Msg`] and returns the [`Command`]s that follow from it; the runtime feeds
//! immediate results back in and hands deferred ones to the executor.

use crate::bus::{Command, Msg};
use crate::config::KeyBindings;
use crate::model::{ErrorReport, KeyAction, KubeContext, Namespace, Panel, Screen, SourceError, Workload};
use crate::source::ContextList;
use crate::state::list_panel::ListPanel;
use crate::state::log_viewer::{LogViewer, ViewerSettings};
use crate::state::navigation::NavigationSession;
use crate::state::panel::{Scrollable, Searchable};
use crate::state::router::{EventRouter, GlobalAction, Routed};
use crate::state::search_input::{InputOutcome, SearchInput};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::{debug, warn};

/// Rows taken by the breadcrumb, the status line and the panel border.
pub const CHROME_ROWS: u16 = 4;

// ===== Preselection =====

/// Names to select when lists first load (from `--context`/`--namespace`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Preselection {
    /// Context to select instead of the current one.
    pub context: Option<String>,
    /// Namespace to select on the first namespace listing.
    pub namespace: Option<String>,
}

// ===== AppState =====

/// Root UI state.
///
/// # Ownership
///
/// - `nav` decides which screen is current and which panel has focus
/// - the three list panels hold what the catalog returned for the active
///   context / namespace
/// - `viewer` owns the log stream, its buffer and its search state
/// - `search_input` is the draft query while search entry is active
///
/// # Overlays
///
/// An error overlay swallows the next key. The help overlay swallows every key
/// except the ones that close it or quit.
#[derive(Debug)]
pub struct AppState {
    nav: NavigationSession,
    router: EventRouter,
    contexts: ListPanel<KubeContext>,
    namespaces: ListPanel<Namespace>,
    workloads: ListPanel<Workload>,
    /// Context whose namespaces are listed.
    active_context: Option<String>,
    /// Namespace whose workloads are listed.
    active_namespace: Option<String>,
    viewer: LogViewer,
    search_input: SearchInput,
    error: Option<ErrorReport>,
    help_visible: bool,
    running: bool,
    preselect: Preselection,
}

impl AppState {
    /// Fresh state on the context screen with nothing loaded.
    pub fn new(bindings: KeyBindings, settings: ViewerSettings) -> Self {
        Self {
            nav: NavigationSession::new(),
            router: EventRouter::new(bindings),
            contexts: ListPanel::new("Contexts"),
            namespaces: ListPanel::new("Namespaces"),
            workloads: ListPanel::new("Workloads"),
            active_context: None,
            active_namespace: None,
            viewer: LogViewer::new(settings),
            search_input: SearchInput::default(),
            error: None,
            help_visible: false,
            running: true,
            preselect: Preselection::default(),
        }
    }

    /// Select these names instead of the catalog's current ones on first load.
    pub fn with_preselection(mut self, preselect: Preselection) -> Self {
        self.preselect = preselect;
        self
    }

    /// Commands to run at startup.
    pub fn init(&mut self) -> Vec<Command> {
        self.contexts.set_loading(true);
        vec![Command::LoadContexts]
    }

    // ===== Accessors =====

    /// Screen and focus state.
    pub fn nav(&self) -> &NavigationSession {
        &self.nav
    }

    /// Active key bindings.
    pub fn bindings(&self) -> &KeyBindings {
        self.router.bindings()
    }

    /// Context list panel.
    pub fn contexts(&self) -> &ListPanel<KubeContext> {
        &self.contexts
    }

    /// Context list panel, for rendering.
    pub fn contexts_mut(&mut self) -> &mut ListPanel<KubeContext> {
        &mut self.contexts
    }

    /// Namespace list panel.
    pub fn namespaces(&self) -> &ListPanel<Namespace> {
        &self.namespaces
    }

    /// Namespace list panel, for rendering.
    pub fn namespaces_mut(&mut self) -> &mut ListPanel<Namespace> {
        &mut self.namespaces
    }

    /// Workload list panel.
    pub fn workloads(&self) -> &ListPanel<Workload> {
        &self.workloads
    }

    /// Workload list panel, for rendering.
    pub fn workloads_mut(&mut self) -> &mut ListPanel<Workload> {
        &mut self.workloads
    }

    /// Log viewer.
    pub fn viewer(&self) -> &LogViewer {
        &self.viewer
    }

    /// Draft query of the search line.
    pub fn search_input(&self) -> &SearchInput {
        &self.search_input
    }

    /// Error shown in the overlay, if any.
    pub fn error(&self) -> Option<&ErrorReport> {
        self.error.as_ref()
    }

    /// Whether the help overlay is open.
    pub fn help_visible(&self) -> bool {
        self.help_visible
    }

    /// False once quit has been processed.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Context whose namespaces are listed.
    pub fn active_context(&self) -> Option<&str> {
        self.active_context.as_deref()
    }

    /// Namespace whose workloads are listed.
    pub fn active_namespace(&self) -> Option<&str> {
        self.active_namespace.as_deref()
    }

    /// Status bar text for the current screen.
    pub fn status_text(&self) -> String {
        if self.nav.current() == Screen::Log {
            return self.viewer.status_line();
        }
        let mut parts = Vec::new();
        if let Some(context) = &self.active_context {
            parts.push(format!("context: {context}"));
        }
        if let Some(namespace) = &self.active_namespace {
            parts.push(format!("namespace: {namespace}"));
        }
        let query = self.applied_query();
        if !query.is_empty() {
            parts.push(format!("filter: {query}"));
        }
        parts.push("? for help".to_string());
        parts.join(" | ")
    }

    // ===== Update =====

    /// Process one message.
    pub fn update(&mut self, msg: Msg) -> Vec<Command> {
        debug!(kind = msg.kind(), screen = ?self.nav.current(), "update");
        match msg {
            Msg::Key(key) => self.handle_key(key),
            Msg::Resize { height, .. } => {
                self.set_body_rows(usize::from(height.saturating_sub(CHROME_ROWS)));
                Vec::new()
            }
            Msg::Quit => {
                self.running = false;
                Vec::new()
            }
            Msg::ToggleHelp => {
                self.help_visible = !self.help_visible;
                Vec::new()
            }
            Msg::Error(report) => {
                warn!(context = %report.context, message = %report.message, "error reported");
                self.error = Some(report);
                Vec::new()
            }
            Msg::Refresh => self.refresh(),

            Msg::ContextSelected => self.select_context(),
            Msg::NamespaceSelected => self.select_namespace(),
            Msg::WorkloadSelected => {
                vec![Command::Emit(Msg::StartStream(self.workloads.selected().cloned()))]
            }

            Msg::ContextsLoaded(result) => self.on_contexts_loaded(result),
            Msg::NamespacesLoaded { context, result } => self.on_namespaces_loaded(context, result),
            Msg::WorkloadsLoaded {
                context,
                namespace,
                result,
            } => self.on_workloads_loaded(context, namespace, result),

            Msg::StartStream(workload) => self.viewer.start_stream(workload),
            Msg::StopStream => {
                self.viewer.close();
                Vec::new()
            }
            Msg::StreamOpened { generation, result } => {
                self.viewer.on_stream_opened(generation, result)
            }
            Msg::LogChunk {
                generation,
                result,
                stream,
            } => self.viewer.on_chunk(generation, result, stream),

            Msg::ToggleFollow => {
                self.viewer.toggle_follow();
                Vec::new()
            }
            Msg::ToggleWrap => {
                self.viewer.toggle_wrap();
                Vec::new()
            }
            Msg::ToggleTimestamps => {
                self.viewer.toggle_timestamps();
                Vec::new()
            }
            Msg::NextMatch => {
                self.viewer.next_match();
                Vec::new()
            }
            Msg::PrevMatch => {
                self.viewer.prev_match();
                Vec::new()
            }
            Msg::SaveLogs => self.viewer.save(),
            Msg::LogsSaved(result) => self.viewer.on_saved(result),

            Msg::SearchStarted => {
                let current = self.applied_query().to_string();
                self.search_input.begin(&current);
                Vec::new()
            }
            Msg::SearchConfirmed => {
                if self.nav.current() == Screen::Log {
                    self.viewer.confirm_search();
                }
                Vec::new()
            }
            Msg::SearchCancelled => {
                let saved = self.search_input.saved_query().to_string();
                self.apply_query(&saved);
                Vec::new()
            }
            Msg::ClearSearch => {
                match self.nav.current() {
                    Screen::Log => self.viewer.clear_search(),
                    _ => self.apply_query(""),
                }
                Vec::new()
            }
        }
    }

    // ===== Keys =====

    fn handle_key(&mut self, key: KeyEvent) -> Vec<Command> {
        if let Some(report) = self.error.take() {
            debug!(context = %report.context, "error overlay dismissed");
            return Vec::new();
        }

        if self.help_visible {
            return self.handle_help_key(key);
        }

        match self.router.route(&mut self.nav, key) {
            Routed::Global(GlobalAction::Quit) => vec![Command::Emit(Msg::Quit)],
            Routed::Global(GlobalAction::ToggleHelp) => vec![Command::Emit(Msg::ToggleHelp)],
            Routed::Navigation(msgs) => msgs.into_iter().map(Command::Emit).collect(),
            Routed::Forward(Panel::Search, key) => {
                self.edit_search(key);
                Vec::new()
            }
            Routed::Forward(panel, key) => {
                self.forward(panel, key);
                Vec::new()
            }
        }
    }

    fn handle_help_key(&mut self, key: KeyEvent) -> Vec<Command> {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return vec![Command::Emit(Msg::Quit)];
        }
        match self.router.bindings().get(key) {
            Some(KeyAction::Quit) => vec![Command::Emit(Msg::Quit)],
            Some(KeyAction::Help | KeyAction::Back) => {
                self.help_visible = false;
                Vec::new()
            }
            _ => Vec::new(),
        }
    }

    fn edit_search(&mut self, key: KeyEvent) {
        let outcome = self
            .search_input
            .handle_key(key, self.viewer.search().history());
        if outcome == InputOutcome::Edited {
            let text = self.search_input.text().to_string();
            self.apply_query(&text);
        }
    }

    /// Movement keys for the focused panel. Anything else is dropped.
    fn forward(&mut self, panel: Panel, key: KeyEvent) {
        let Some(action) = self.router.bindings().get(key) else {
            return;
        };
        if !action.is_scroll() {
            return;
        }
        let handled = match panel {
            Panel::Context => self.contexts.scroll(action),
            Panel::Namespace => self.namespaces.scroll(action),
            Panel::Workload => self.workloads.scroll(action),
            Panel::Log => self.viewer.scroll(action),
            Panel::Search | Panel::StatusBar => false,
        };
        debug!(panel = panel.name(), ?action, handled, "forwarded key");
    }

    // ===== Search target =====

    /// The query applied to the current screen's main panel.
    fn applied_query(&self) -> &str {
        match self.nav.current() {
            Screen::Context => self.contexts.applied_query(),
            Screen::Namespace => self.namespaces.applied_query(),
            Screen::Workload => self.workloads.applied_query(),
            Screen::Log => self.viewer.applied_query(),
        }
    }

    fn apply_query(&mut self, query: &str) {
        match self.nav.current() {
            Screen::Context => self.contexts.apply_query(query),
            Screen::Namespace => self.namespaces.apply_query(query),
            Screen::Workload => self.workloads.apply_query(query),
            Screen::Log => self.viewer.apply_query(query),
        }
    }

    /// Rows available inside the main panel.
    pub fn set_body_rows(&mut self, rows: usize) {
        let rows = rows.max(1);
        self.contexts.set_page_size(rows);
        self.namespaces.set_page_size(rows);
        self.workloads.set_page_size(rows);
        if self.viewer.height() != rows {
            self.viewer.set_page_size(rows);
        }
    }

    // ===== Selection =====

    fn select_context(&mut self) -> Vec<Command> {
        let Some(context) = self.contexts.selected().map(|c| c.name.clone()) else {
            return vec![selection_error("no context selected", "selecting context")];
        };
        debug!(%context, "context selected");
        self.active_context = Some(context.clone());
        self.active_namespace = None;
        self.namespaces.clear();
        self.namespaces.set_loading(true);
        self.workloads.clear();
        vec![Command::LoadNamespaces { context }]
    }

    fn select_namespace(&mut self) -> Vec<Command> {
        let Some(context) = self.active_context.clone() else {
            return vec![selection_error("no context selected", "selecting namespace")];
        };
        let Some(namespace) = self.namespaces.selected().map(|n| n.name.clone()) else {
            return vec![selection_error("no namespace selected", "selecting namespace")];
        };
        debug!(%context, %namespace, "namespace selected");
        self.active_namespace = Some(namespace.clone());
        self.workloads.clear();
        self.workloads.set_loading(true);
        vec![Command::LoadWorkloads { context, namespace }]
    }

    fn refresh(&mut self) -> Vec<Command> {
        let context = self.active_context.clone();
        let namespace = self.active_namespace.clone();
        match (self.nav.current(), context, namespace) {
            (Screen::Log, _, _) => {
                vec![Command::Emit(Msg::StartStream(self.viewer.workload().cloned()))]
            }
            (Screen::Workload, Some(context), Some(namespace)) => {
                self.workloads.set_loading(true);
                vec![Command::LoadWorkloads { context, namespace }]
            }
            (Screen::Namespace | Screen::Workload, Some(context), _) => {
                self.namespaces.set_loading(true);
                vec![Command::LoadNamespaces { context }]
            }
            _ => self.init(),
        }
    }

    // ===== Load completions =====

    fn on_contexts_loaded(&mut self, result: Result<ContextList, SourceError>) -> Vec<Command> {
        match result {
            Ok(list) => {
                let target = self
                    .active_context
                    .clone()
                    .or_else(|| self.preselect.context.take())
                    .or(list.current);
                self.contexts.set_items(list.contexts);
                if let Some(name) = target {
                    self.contexts.select_where(|c| c.name == name);
                }
                Vec::new()
            }
            Err(err) => {
                self.contexts.set_loading(false);
                vec![load_error(&err, "loading contexts")]
            }
        }
    }

    fn on_namespaces_loaded(
        &mut self,
        context: String,
        result: Result<Vec<Namespace>, SourceError>,
    ) -> Vec<Command> {
        if self.active_context.as_deref() != Some(context.as_str()) {
            debug!(%context, "discarding namespaces for inactive context");
            return Vec::new();
        }
        match result {
            Ok(items) => {
                let target = self
                    .active_namespace
                    .clone()
                    .or_else(|| self.preselect.namespace.take());
                self.namespaces.set_items(items);
                if let Some(name) = target {
                    self.namespaces.select_where(|n| n.name == name);
                }
                Vec::new()
            }
            Err(err) => {
                self.namespaces.set_loading(false);
                vec![load_error(&err, "loading namespaces")]
            }
        }
    }

    fn on_workloads_loaded(
        &mut self,
        context: String,
        namespace: String,
        result: Result<Vec<Workload>, SourceError>,
    ) -> Vec<Command> {
        if self.active_context.as_deref() != Some(context.as_str())
            || self.active_namespace.as_deref() != Some(namespace.as_str())
        {
            debug!(%context, %namespace, "discarding workloads for inactive namespace");
            return Vec::new();
        }
        match result {
            Ok(items) => {
                let streaming = self.viewer.workload().map(|w| w.name.clone());
                self.workloads.set_items(items);
                if let Some(name) = streaming {
                    self.workloads.select_where(|w| w.name == name);
                }
                Vec::new()
            }
            Err(err) => {
                self.workloads.set_loading(false);
                vec![load_error(&err, "loading workloads")]
            }
        }
    }
}

fn selection_error(message: &str, context: &str) -> Command {
    Command::Emit(Msg::Error(ErrorReport::new(message, context)))
}

fn load_error(err: &SourceError, context: &str) -> Command {
    Command::Emit(Msg::Error(ErrorReport::from_error(err, context)))
}

#[cfg(test)]
#[path = "app_state_tests.rs"]
mod tests;
