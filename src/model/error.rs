//! Error types for kubeoptic.
//!
//! # Error Hierarchy
//!
//! - [`SourceError`] - failures talking to the cluster: listing resources,
//!   opening a log stream, reading from an open stream
//! - [`ErrorReport`] - what the error overlay displays: a message plus a
//!   context label naming the operation that failed
//!
//! Terminal failures live in [`crate::view::TuiError`]; configuration and
//! logging failures live next to their loaders.
//!
//! # Recovery Strategy
//!
//! Nothing here terminates the process. Selection errors are surfaced once and
//! not retried, transient stream errors are surfaced and the read re-issued,
//! open errors are surfaced and the stream marked errored.

use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Failures from the cluster-facing collaborators.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SourceError {
    /// Listing contexts, namespaces or workloads failed.
    #[error("failed to list {what}: {reason}")]
    List {
        /// Resource kind being listed.
        what: &'static str,
        /// Underlying failure text.
        reason: String,
    },

    /// The log stream could not be opened. Not retried.
    #[error("failed to open log stream for {workload}: {reason}")]
    Open {
        /// `namespace/name` of the workload.
        workload: String,
        /// Underlying failure text.
        reason: String,
    },

    /// A read on an open stream failed. Retried by the viewer.
    #[error("log stream read failed: {0}")]
    Read(String),

    /// A read produced nothing within the read timeout. Retried by the viewer.
    #[error("log stream read timed out after {0:?}")]
    Timeout(Duration),

    /// The stream was cancelled while a read was in flight.
    #[error("log stream cancelled")]
    Cancelled,

    /// Local I/O failure (spawning a process, writing a file).
    #[error("I/O error: {0}")]
    Io(String),
}

impl SourceError {
    /// Whether the viewer should keep reading after this error.
    pub fn is_transient(&self) -> bool {
        matches!(self, SourceError::Read(_) | SourceError::Timeout(_))
    }
}

impl From<std::io::Error> for SourceError {
    fn from(err: std::io::Error) -> Self {
        SourceError::Io(err.to_string())
    }
}

/// An error routed to the overlay: what went wrong and while doing what.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorReport {
    /// What went wrong.
    pub message: String,
    /// The operation that failed, e.g. "log streaming".
    pub context: String,
}

impl ErrorReport {
    /// Report `message` raised while doing `context`.
    pub fn new(message: impl Into<String>, context: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            context: context.into(),
        }
    }

    /// Build a report from any displayable error.
    pub fn from_error(err: &impl fmt::Display, context: impl Into<String>) -> Self {
        Self::new(err.to_string(), context)
    }
}

impl fmt::Display for ErrorReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.context, self.message)
    }
}
