//! The closed set of messages processed by [`crate::state::AppState::update`].

use crate::model::{ErrorReport, Namespace, SourceError, Workload};
use crate::source::{ContextList, StreamHandle};
use crossterm::event::KeyEvent;
use std::path::PathBuf;

/// Identifies one stream session; completions carrying an older value are stale.
pub type Generation = u64;

/// Everything that can happen to the application.
///
/// Terminal input arrives as [`Msg::Key`]/[`Msg::Resize`]; deferred work posts
/// exactly one completion message; the router turns keys into the rest.
#[derive(Debug)]
pub enum Msg {
    // ===== Terminal =====
    /// A key press.
    Key(KeyEvent),
    /// The terminal was resized.
    Resize {
        /// New width in columns.
        width: u16,
        /// New height in rows.
        height: u16,
    },

    // ===== Application =====
    /// Leave the application.
    Quit,
    /// Show or hide the help overlay.
    ToggleHelp,
    /// Surface an error in the overlay.
    Error(ErrorReport),
    /// Reload data for the current screen.
    Refresh,

    // ===== Selection =====
    /// Use the highlighted context and load its namespaces.
    ContextSelected,
    /// Use the highlighted namespace and load its workloads.
    NamespaceSelected,
    /// Use the highlighted workload and start streaming it.
    WorkloadSelected,

    // ===== Catalog completions =====
    /// Context list completion.
    ContextsLoaded(Result<ContextList, SourceError>),
    /// Namespace list completion for `context`.
    NamespacesLoaded {
        /// Context the request was made against.
        context: String,
        /// Namespaces or the failure.
        result: Result<Vec<Namespace>, SourceError>,
    },
    /// Workload list completion for `context`/`namespace`.
    WorkloadsLoaded {
        /// Context the request was made against.
        context: String,
        /// Namespace the request was made against.
        namespace: String,
        /// Workloads or the failure.
        result: Result<Vec<Workload>, SourceError>,
    },

    // ===== Streaming =====
    /// Begin streaming; `None` is a selection error.
    StartStream(Option<Workload>),
    /// Stop the live stream, if any.
    StopStream,
    /// Open completion.
    StreamOpened {
        /// Session that issued the open.
        generation: Generation,
        /// The open stream or the failure.
        result: Result<StreamHandle, SourceError>,
    },
    /// Read completion. The handle rides along so the next read can be issued.
    LogChunk {
        /// Session that issued the read.
        generation: Generation,
        /// A chunk, end of stream (`None`), or the failure.
        result: Result<Option<String>, SourceError>,
        /// The stream the chunk came from.
        stream: StreamHandle,
    },

    // ===== Log viewer =====
    /// Flip auto-scroll to the newest line.
    ToggleFollow,
    /// Flip line wrapping.
    ToggleWrap,
    /// Flip leading timestamp visibility.
    ToggleTimestamps,
    /// Move to the next search match.
    NextMatch,
    /// Move to the previous search match.
    PrevMatch,
    /// Write the buffer to disk.
    SaveLogs,
    /// Save completion.
    LogsSaved(Result<PathBuf, SourceError>),

    // ===== Search entry =====
    /// The search input opened.
    SearchStarted,
    /// The typed query was applied.
    SearchConfirmed,
    /// The search input closed without applying.
    SearchCancelled,
    /// Drop the log query, or the list filter on list screens.
    ClearSearch,
}

impl Msg {
    /// Short label for tracing.
    pub fn kind(&self) -> &'static str {
        match self {
            Msg::Key(_) => "key",
            Msg::Resize { .. } => "resize",
            Msg::Quit => "quit",
            Msg::ToggleHelp => "toggle_help",
            Msg::Error(_) => "error",
            Msg::Refresh => "refresh",
            Msg::ContextSelected => "context_selected",
            Msg::NamespaceSelected => "namespace_selected",
            Msg::WorkloadSelected => "workload_selected",
            Msg::ContextsLoaded(_) => "contexts_loaded",
            Msg::NamespacesLoaded { .. } => "namespaces_loaded",
            Msg::WorkloadsLoaded { .. } => "workloads_loaded",
            Msg::StartStream(_) => "start_stream",
            Msg::StopStream => "stop_stream",
            Msg::StreamOpened { .. } => "stream_opened",
            Msg::LogChunk { .. } => "log_chunk",
            Msg::ToggleFollow => "toggle_follow",
            Msg::ToggleWrap => "toggle_wrap",
            Msg::ToggleTimestamps => "toggle_timestamps",
            Msg::NextMatch => "next_match",
            Msg::PrevMatch => "prev_match",
            Msg::SaveLogs => "save_logs",
            Msg::LogsSaved(_) => "logs_saved",
            Msg::SearchStarted => "search_started",
            Msg::SearchConfirmed => "search_confirmed",
            Msg::SearchCancelled => "search_cancelled",
            Msg::ClearSearch => "clear_search",
        }
    }
}
