//! Streaming log viewer state.
//!
//! Ingests a live stream into a bounded [`LogBuffer`], keeps a derived
//! filtered view for the active search, and drives the one-outstanding-read
//! protocol:
//!
//! ```text
//! start_stream(Some) ──► Streaming ──open ok──► read ──chunk──► read ...
//!                            │                    ├──eof──► Stopped
//!                            └──open err──► Errored
//! stop_stream() from any phase ──► Idle
//! ```
//!
//! Every operation returns the [`Command`]s it needs run; nothing here blocks.

use crate::bus::{Command, Generation, Msg};
use crate::model::{ErrorReport, KeyAction, SourceError, Workload};
use crate::source::{CancelHandle, StreamHandle};
use crate::state::log_buffer::{LogBuffer, LogLine};
use crate::state::panel::{Focusable, Scrollable, Searchable};
use crate::state::search::SearchState;
use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};

const STREAM_CONTEXT: &str = "log streaming";

// ===== Phase =====

/// Where the viewer's stream is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamPhase {
    /// No stream requested.
    Idle,
    /// Opening or reading.
    Streaming,
    /// The stream reached its end.
    Stopped,
    /// Opening failed; not retried.
    Errored,
}

impl StreamPhase {
    /// Status bar label.
    pub fn label(self) -> &'static str {
        match self {
            StreamPhase::Idle => "idle",
            StreamPhase::Streaming => "streaming",
            StreamPhase::Stopped => "ended",
            StreamPhase::Errored => "error",
        }
    }
}

// ===== Settings =====

/// Initial toggles and I/O parameters, taken from configuration.
#[derive(Debug, Clone)]
pub struct ViewerSettings {
    /// Start with auto-scroll on.
    pub follow: bool,
    /// Start with line wrapping on.
    pub wrap: bool,
    /// Start with leading timestamps shown.
    pub show_timestamps: bool,
    /// Upper bound on each chunk read.
    pub read_timeout: Duration,
    /// Directory saved log files go to.
    pub save_dir: PathBuf,
}

impl Default for ViewerSettings {
    fn default() -> Self {
        Self {
            follow: true,
            wrap: false,
            show_timestamps: false,
            read_timeout: Duration::from_secs(5),
            save_dir: PathBuf::from("."),
        }
    }
}

// ===== LogViewer =====

/// Live log stream of one workload plus everything needed to display it:
/// the bounded buffer, the applied search and the viewport.
#[derive(Debug)]
pub struct LogViewer {
    settings: ViewerSettings,
    phase: StreamPhase,
    workload: Option<Workload>,
    generation: Generation,
    cancel: Option<CancelHandle>,
    buffer: LogBuffer,
    search: SearchState,
    /// First displayed row in view.
    offset: usize,
    /// Rows available for lines.
    height: usize,
    follow: bool,
    wrap: bool,
    show_timestamps: bool,
    /// Non-modal notice shown in the status bar.
    notice: Option<String>,
}

impl Default for LogViewer {
    fn default() -> Self {
        Self::new(ViewerSettings::default())
    }
}

impl LogViewer {
    /// Idle viewer using `settings`.
    pub fn new(settings: ViewerSettings) -> Self {
        Self {
            phase: StreamPhase::Idle,
            workload: None,
            generation: 0,
            cancel: None,
            buffer: LogBuffer::new(),
            search: SearchState::new(),
            offset: 0,
            height: 20,
            follow: settings.follow,
            wrap: settings.wrap,
            show_timestamps: settings.show_timestamps,
            notice: None,
            settings,
        }
    }

    // ===== Accessors =====

    /// Current lifecycle phase.
    pub fn phase(&self) -> StreamPhase {
        self.phase
    }

    /// Workload being streamed, if any.
    pub fn workload(&self) -> Option<&Workload> {
        self.workload.as_ref()
    }

    /// Session id of the live stream.
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Received lines.
    pub fn buffer(&self) -> &LogBuffer {
        &self.buffer
    }

    /// Applied query and its matches.
    pub fn search(&self) -> &SearchState {
        &self.search
    }

    /// Whether new lines scroll into view.
    pub fn follow(&self) -> bool {
        self.follow
    }

    /// Whether long lines wrap.
    pub fn wrap(&self) -> bool {
        self.wrap
    }

    /// Whether leading timestamps are shown.
    pub fn show_timestamps(&self) -> bool {
        self.show_timestamps
    }

    /// First displayed row in view.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Rows available for lines.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Transient status bar notice, e.g. after a save.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    // ===== Stream lifecycle =====

    /// Begin streaming `workload`, replacing any current stream.
    ///
    /// `None` is a selection error: nothing changes and the error is emitted.
    pub fn start_stream(&mut self, workload: Option<Workload>) -> Vec<Command> {
        let Some(workload) = workload else {
            return vec![error_cmd(ErrorReport::new(
                "no workload selected",
                STREAM_CONTEXT,
            ))];
        };

        self.cancel_current();
        self.buffer = LogBuffer::new();
        self.search.reset_keeping_history();
        self.offset = 0;
        self.follow = self.settings.follow;
        self.notice = None;
        self.generation += 1;
        self.phase = StreamPhase::Streaming;
        self.workload = Some(workload.clone());

        info!(workload = %workload, generation = self.generation, "starting log stream");
        vec![Command::OpenStream {
            generation: self.generation,
            workload,
        }]
    }

    /// Stop the current stream from any phase. The buffer is kept.
    pub fn stop_stream(&mut self) {
        if self.phase == StreamPhase::Streaming {
            info!(generation = self.generation, "stopping log stream");
        }
        self.cancel_current();
        self.generation += 1;
        self.phase = StreamPhase::Idle;
    }

    /// Stop and discard everything tied to the stream (leaving the log screen).
    pub fn close(&mut self) {
        self.stop_stream();
        self.buffer = LogBuffer::new();
        self.search.reset_keeping_history();
        self.workload = None;
        self.offset = 0;
        self.notice = None;
    }

    fn cancel_current(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel.cancel();
        }
    }

    fn is_live(&self, generation: Generation) -> bool {
        generation == self.generation && self.phase == StreamPhase::Streaming
    }

    fn read(&self, stream: StreamHandle) -> Command {
        Command::ReadChunk {
            generation: self.generation,
            stream,
            timeout: self.settings.read_timeout,
        }
    }

    /// Open completion.
    pub fn on_stream_opened(
        &mut self,
        generation: Generation,
        result: Result<StreamHandle, SourceError>,
    ) -> Vec<Command> {
        if !self.is_live(generation) {
            debug!(generation, current = self.generation, "discarding stale open");
            return Vec::new();
        }

        match result {
            Ok(stream) => {
                self.cancel = Some(stream.cancel_handle());
                vec![self.read(stream)]
            }
            Err(err) => {
                warn!(error = %err, "log stream failed to open");
                self.phase = StreamPhase::Errored;
                vec![error_cmd(ErrorReport::from_error(&err, STREAM_CONTEXT))]
            }
        }
    }

    /// Read completion. Exactly one of append+read, stop, or retry.
    pub fn on_chunk(
        &mut self,
        generation: Generation,
        result: Result<Option<String>, SourceError>,
        stream: StreamHandle,
    ) -> Vec<Command> {
        if !self.is_live(generation) {
            debug!(generation, current = self.generation, "discarding stale chunk");
            return Vec::new();
        }

        match result {
            Ok(Some(chunk)) => {
                self.append(&chunk);
                vec![self.read(stream)]
            }
            Ok(None) | Err(SourceError::Cancelled) => {
                info!(workload = ?self.workload.as_ref().map(ToString::to_string), "log stream ended");
                self.phase = StreamPhase::Stopped;
                self.cancel = None;
                Vec::new()
            }
            Err(err) => {
                warn!(error = %err, "log stream read failed, retrying");
                vec![
                    error_cmd(ErrorReport::from_error(&err, STREAM_CONTEXT)),
                    self.read(stream),
                ]
            }
        }
    }

    /// Append a chunk, refresh the derived view once, then follow.
    pub fn append(&mut self, chunk: &str) {
        if self.buffer.append_chunk(chunk) == 0 {
            return;
        }
        self.notice = None;
        if self.search.is_active() {
            self.search.recompute(&self.buffer);
        }
        if self.follow {
            self.scroll_to_bottom();
        } else {
            self.clamp_offset();
        }
    }

    // ===== Displayed sequence =====

    /// Rows in the displayed sequence: matches while searching, else every line.
    pub fn displayed_len(&self) -> usize {
        if self.search.is_active() {
            self.search.matches().len()
        } else {
            self.buffer.len()
        }
    }

    /// Buffer position of displayed row `row`.
    pub fn displayed_index(&self, row: usize) -> Option<usize> {
        if self.search.is_active() {
            self.search.matches().get(row).copied()
        } else if row < self.buffer.len() {
            Some(row)
        } else {
            None
        }
    }

    /// Lines in the viewport, top to bottom, with their buffer positions.
    pub fn visible_lines(&self) -> Vec<(usize, &LogLine)> {
        (self.offset..self.offset + self.height)
            .map_while(|row| {
                let index = self.displayed_index(row)?;
                self.buffer.get(index).map(|line| (index, line))
            })
            .collect()
    }

    /// Last displayed row inside the viewport.
    pub fn last_visible_row(&self) -> Option<usize> {
        let len = self.displayed_len();
        if len == 0 {
            return None;
        }
        Some((self.offset + self.height).min(len) - 1)
    }

    fn max_offset(&self) -> usize {
        self.displayed_len().saturating_sub(self.height)
    }

    /// Whether the last displayed row is in view.
    pub fn is_at_bottom(&self) -> bool {
        self.offset >= self.max_offset()
    }

    fn clamp_offset(&mut self) {
        self.offset = self.offset.min(self.max_offset());
    }

    /// Bring the last displayed row into view.
    pub fn scroll_to_bottom(&mut self) {
        self.offset = self.max_offset();
    }

    /// Resize the viewport, keeping the offset valid.
    pub fn set_height(&mut self, height: usize) {
        self.height = height.max(1);
        if self.follow {
            self.scroll_to_bottom();
        } else {
            self.clamp_offset();
        }
    }

    // ===== Toggles =====

    /// Flip follow; turning it on jumps to the bottom.
    pub fn toggle_follow(&mut self) {
        self.follow = !self.follow;
        if self.follow {
            self.scroll_to_bottom();
        }
    }

    /// Flip line wrapping.
    pub fn toggle_wrap(&mut self) {
        self.wrap = !self.wrap;
    }

    /// Flip leading timestamp visibility.
    pub fn toggle_timestamps(&mut self) {
        self.show_timestamps = !self.show_timestamps;
    }

    // ===== Search =====

    /// Apply a (possibly empty) query and recompute.
    pub fn set_query(&mut self, query: &str) {
        if self.search.query() == query {
            return;
        }
        self.search.set_query(query, &self.buffer);
        if self.follow {
            self.scroll_to_bottom();
        } else {
            self.clamp_offset();
        }
    }

    /// Drop the applied query and its matches, showing every line again.
    pub fn clear_search(&mut self) {
        if self.search.query().is_empty() {
            return;
        }
        self.search.clear();
        if self.follow {
            self.scroll_to_bottom();
        } else {
            self.clamp_offset();
        }
    }

    /// Record the current query in history.
    pub fn confirm_search(&mut self) {
        let query = self.search.query().to_string();
        self.search.record_history(&query);
    }

    /// Jump to the next match, wrapping.
    pub fn next_match(&mut self) {
        if self.search.next_match().is_some() {
            self.center_on_match();
        }
    }

    /// Jump to the previous match, wrapping.
    pub fn prev_match(&mut self) {
        if self.search.prev_match().is_some() {
            self.center_on_match();
        }
    }

    /// Put the current match mid-viewport. Following would yank it away, so
    /// follow is switched off.
    fn center_on_match(&mut self) {
        let row = self.search.cursor();
        self.follow = false;
        self.offset = row.saturating_sub(self.height / 2).min(self.max_offset());
    }

    // ===== Save =====

    /// Command writing the buffer to `<save_dir>/<namespace>_<name>_<time>.log`.
    pub fn save(&self) -> Vec<Command> {
        let Some(workload) = &self.workload else {
            return vec![error_cmd(ErrorReport::new("no log stream to save", "saving logs"))];
        };
        if self.buffer.is_empty() {
            return vec![error_cmd(ErrorReport::new("log buffer is empty", "saving logs"))];
        }
        let path = save_path(&self.settings.save_dir, workload, Local::now());
        vec![Command::SaveLogs {
            path,
            contents: self.buffer.to_text(),
        }]
    }

    /// Save completion: a notice on success, the error overlay otherwise.
    pub fn on_saved(&mut self, result: Result<PathBuf, SourceError>) -> Vec<Command> {
        match result {
            Ok(path) => {
                info!(path = %path.display(), "logs saved");
                self.notice = Some(format!("saved {}", path.display()));
                Vec::new()
            }
            Err(err) => vec![error_cmd(ErrorReport::from_error(&err, "saving logs"))],
        }
    }

    // ===== Status =====

    /// One-line summary for the status bar.
    pub fn status_line(&self) -> String {
        let mut parts = Vec::new();
        if let Some(workload) = &self.workload {
            parts.push(workload.to_string());
        }
        parts.push(self.phase.label().to_string());
        parts.push(format!("{} lines", self.buffer.len()));
        if self.search.is_active() {
            let total = self.search.matches().len();
            let position = if total == 0 { 0 } else { self.search.cursor() + 1 };
            parts.push(format!("search: {} ({position}/{total})", self.search.query()));
        }
        let mut flags = Vec::new();
        if self.follow {
            flags.push("FOLLOW");
        }
        if self.wrap {
            flags.push("WRAP");
        }
        if self.show_timestamps {
            flags.push("TS");
        }
        if !flags.is_empty() {
            parts.push(flags.join(" "));
        }
        if let Some(notice) = &self.notice {
            parts.push(notice.clone());
        }
        parts.join(" | ")
    }
}

impl Focusable for LogViewer {
    fn title(&self) -> String {
        match &self.workload {
            Some(w) => format!("Logs: {w}"),
            None => "Logs".to_string(),
        }
    }
}

impl Searchable for LogViewer {
    fn apply_query(&mut self, query: &str) {
        self.set_query(query);
    }

    fn applied_query(&self) -> &str {
        self.search.query()
    }
}

impl Scrollable for LogViewer {
    fn scroll(&mut self, action: KeyAction) -> bool {
        let page = self.height.max(1);
        match action {
            KeyAction::ScrollUp => self.scroll_up(1),
            KeyAction::PageUp => self.scroll_up(page),
            KeyAction::ScrollToTop => self.scroll_up(usize::MAX),
            KeyAction::ScrollDown => self.scroll_down(1),
            KeyAction::PageDown => self.scroll_down(page),
            KeyAction::ScrollToBottom => self.scroll_to_bottom(),
            _ => return false,
        }
        true
    }

    fn set_page_size(&mut self, rows: usize) {
        self.set_height(rows);
    }
}

impl LogViewer {
    /// Scrolling up away from the bottom pauses follow.
    fn scroll_up(&mut self, rows: usize) {
        let before = self.offset;
        self.offset = self.offset.saturating_sub(rows);
        if self.offset < before {
            self.follow = false;
        }
    }

    fn scroll_down(&mut self, rows: usize) {
        self.offset = self.offset.saturating_add(rows).min(self.max_offset());
    }
}

fn error_cmd(report: ErrorReport) -> Command {
    Command::Emit(Msg::Error(report))
}

/// `<dir>/<namespace>_<name>_<YYYYmmdd-HHMMSS>.log`
pub fn save_path(dir: &Path, workload: &Workload, at: DateTime<Local>) -> PathBuf {
    dir.join(format!(
        "{}_{}_{}.log",
        workload.namespace,
        workload.name,
        at.format("%Y%m%d-%H%M%S")
    ))
}

/// Split a leading RFC 3339 timestamp (as written by `kubectl logs --timestamps`)
/// from the rest of the line.
pub fn split_timestamp(text: &str) -> (Option<&str>, &str) {
    match text.split_once(' ') {
        Some((head, rest)) if DateTime::parse_from_rfc3339(head).is_ok() => (Some(head), rest),
        _ => (None, text),
    }
}

#[cfg(test)]
#[path = "log_viewer_tests.rs"]
mod tests;
