//! Layout dimension constants for TUI rendering.

use std::time::Duration;

/// Height of the breadcrumb bar at the top.
pub const HEADER_HEIGHT: u16 = 1;

/// Height of the status bar (or search input, while searching) at the bottom.
pub const STATUS_BAR_HEIGHT: u16 = 1;

/// Width percentage for the help overlay popup.
pub const HELP_POPUP_WIDTH_PERCENT: u16 = 60;

/// Height percentage for the help overlay popup.
pub const HELP_POPUP_HEIGHT_PERCENT: u16 = 80;

/// Width percentage for the error overlay popup.
pub const ERROR_POPUP_WIDTH_PERCENT: u16 = 60;

/// Fixed height of the error overlay popup, borders included.
pub const ERROR_POPUP_HEIGHT: u16 = 7;

/// How long the event loop waits for terminal input before draining the bus.
pub const INPUT_POLL_INTERVAL: Duration = Duration::from_millis(50);
