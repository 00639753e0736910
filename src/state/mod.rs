//! UI state machine (pure).
//!
//! All state transitions are pure functions testable without a terminal.
//! Side effects leave this module only as [`crate::bus::Command`] values.

pub mod app_state;
pub mod list_panel;
pub mod log_buffer;
pub mod log_viewer;
pub mod navigation;
pub mod panel;
pub mod router;
pub mod search;
pub mod search_input;

// Re-export for convenience
pub use app_state::{AppState, Preselection, CHROME_ROWS};
pub use list_panel::{ListItem, ListPanel};
pub use log_buffer::{LogBuffer, LogLine, MAX_LINES};
pub use log_viewer::{split_timestamp, LogViewer, StreamPhase, ViewerSettings};
pub use navigation::NavigationSession;
pub use panel::{Focusable, Scrollable, Searchable};
pub use router::{EventRouter, GlobalAction, Routed};
pub use search::{SearchState, MAX_SEARCH_HISTORY, MAX_SEARCH_RESULTS};
pub use search_input::{InputOutcome, SearchInput};
