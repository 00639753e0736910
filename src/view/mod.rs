//! Terminal UI (impure shell).
//!
//! [`TuiApp`] owns the terminal and runs the update loop: terminal events and
//! completions from the bus channel are queued as [`Msg`]s, each one is passed
//! to [`AppState::update`] in FIFO order, and the returned commands go to the
//! [`Executor`]. The screen is redrawn after every batch.

pub mod constants;
mod error_overlay;
mod help;
mod layout;
mod list_pane;
mod log_pane;
mod search_input;
mod styles;

pub use error_overlay::render_error_overlay;
pub use help::render_help_overlay;
pub use layout::render;
pub use list_pane::render_list;
pub use log_pane::{render_line, LogPane};
pub use search_input::{cursor_column, SearchBar};
pub use styles::{ColorConfig, Severity, Theme, THEME_DEFAULT, THEME_MONOCHROME};

use crate::bus::{Command, Executor, Msg};
use crate::source::Cluster;
use crate::state::AppState;
use constants::INPUT_POLL_INTERVAL;
use crossterm::{
    event::{self, Event, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::collections::VecDeque;
use std::io::{self, Stdout};
use std::sync::mpsc::{self, Receiver};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Errors that can occur during TUI operations
#[derive(Debug, Error)]
pub enum TuiError {
    /// IO error during terminal operations
    #[error("Terminal IO error: {0}")]
    Io(#[from] io::Error),
}

/// Main TUI application
///
/// Generic over backend to support testing with TestBackend
pub struct TuiApp<B>
where
    B: Backend,
{
    terminal: Terminal<B>,
    app: AppState,
    theme: Theme,
    executor: Executor,
    /// Completions posted by worker threads.
    bus: Receiver<Msg>,
    /// Messages waiting for `update`, in arrival order.
    queue: VecDeque<Msg>,
}

impl TuiApp<CrosstermBackend<Stdout>> {
    /// Put the terminal in raw mode on the alternate screen.
    pub fn new(app: AppState, theme: Theme, cluster: Arc<dyn Cluster>) -> Result<Self, TuiError> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        stdout.execute(EnterAlternateScreen)?;
        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        Ok(Self::with_terminal(terminal, app, theme, cluster))
    }

    /// Run until the user quits.
    pub fn run(&mut self) -> Result<(), TuiError> {
        self.start()?;

        while self.app.is_running() {
            if event::poll(INPUT_POLL_INTERVAL)? {
                match event::read()? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => {
                        self.queue.push_back(Msg::Key(key));
                    }
                    Event::Resize(width, height) => {
                        self.queue.push_back(Msg::Resize { width, height });
                    }
                    _ => {}
                }
            }

            if self.pump() {
                self.draw()?;
            }
        }

        info!("quit requested");
        Ok(())
    }
}

impl<B> TuiApp<B>
where
    B: Backend,
{
    /// Wire `app` to `terminal`, running deferred work against `cluster`.
    pub fn with_terminal(
        terminal: Terminal<B>,
        app: AppState,
        theme: Theme,
        cluster: Arc<dyn Cluster>,
    ) -> Self {
        let (tx, bus) = mpsc::channel();
        Self {
            terminal,
            app,
            theme,
            executor: Executor::new(cluster, tx),
            bus,
            queue: VecDeque::new(),
        }
    }

    /// Application state.
    pub fn app(&self) -> &AppState {
        &self.app
    }

    /// Underlying terminal.
    pub fn terminal(&self) -> &Terminal<B> {
        &self.terminal
    }

    /// Size the viewport, issue the startup commands and draw once.
    pub fn start(&mut self) -> Result<(), TuiError> {
        let size = self.terminal.size()?;
        self.queue.push_back(Msg::Resize {
            width: size.width,
            height: size.height,
        });
        let init = self.app.init();
        self.submit(init);
        self.pump();
        self.draw()
    }

    /// Queue a message and process everything pending.
    pub fn dispatch(&mut self, msg: Msg) {
        self.queue.push_back(msg);
        self.pump();
    }

    /// Move bus completions onto the queue and process the queue until empty.
    ///
    /// Returns whether any message was processed.
    pub fn pump(&mut self) -> bool {
        while let Ok(msg) = self.bus.try_recv() {
            self.queue.push_back(msg);
        }

        let mut processed = false;
        while let Some(msg) = self.queue.pop_front() {
            processed = true;
            let cmds = self.app.update(msg);
            self.submit(cmds);
        }
        processed
    }

    fn submit(&mut self, cmds: Vec<Command>) {
        for cmd in cmds {
            if cmd.is_deferred() {
                debug!(?cmd, "deferring");
            }
            if let Some(msg) = self.executor.execute(cmd) {
                self.queue.push_back(msg);
            }
        }
    }

    /// Render the current state.
    pub fn draw(&mut self) -> Result<(), TuiError> {
        let Self {
            terminal,
            app,
            theme,
            ..
        } = self;
        terminal.draw(|frame| layout::render(frame, app, theme))?;
        Ok(())
    }
}

/// Initialize and run the TUI application.
///
/// The terminal is restored even if the loop fails.
///
/// Note: Logging must be initialized by caller before calling this function.
pub fn run(app: AppState, theme: Theme, cluster: Arc<dyn Cluster>) -> Result<(), TuiError> {
    let mut tui = TuiApp::new(app, theme, cluster)?;
    let result = tui.run();
    restore_terminal()?;
    result
}

/// Restore terminal to normal state
fn restore_terminal() -> Result<(), TuiError> {
    disable_raw_mode()?;
    io::stdout().execute(LeaveAlternateScreen)?;
    Ok(())
}
