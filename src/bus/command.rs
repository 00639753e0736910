//! Follow-up work produced by an update.

use super::message::{Generation, Msg};
use crate::model::Workload;
use crate::source::StreamHandle;
use std::path::PathBuf;
use std::time::Duration;

/// What an update asks the runtime to do next.
///
/// [`Command::Emit`] is queued immediately. Every other variant is deferred
/// work that runs off the update thread and posts exactly one [`Msg`] back.
#[derive(Debug)]
pub enum Command {
    /// Feed this message straight back into the update loop.
    Emit(Msg),
    /// List kubeconfig contexts and the current one.
    LoadContexts,
    /// List namespaces of a context.
    LoadNamespaces {
        /// Context to query.
        context: String,
    },
    /// List workloads of a namespace.
    LoadWorkloads {
        /// Context to query.
        context: String,
        /// Namespace to query.
        namespace: String,
    },
    /// Open a log stream for a workload.
    OpenStream {
        /// Session the completion belongs to.
        generation: Generation,
        /// Workload to stream.
        workload: Workload,
    },
    /// Read the next chunk from an open stream.
    ReadChunk {
        /// Session the completion belongs to.
        generation: Generation,
        /// The stream, handed back with the completion.
        stream: StreamHandle,
        /// Upper bound on the wait for a chunk.
        timeout: Duration,
    },
    /// Write buffered log text to a file.
    SaveLogs {
        /// Destination file.
        path: PathBuf,
        /// Full file contents.
        contents: String,
    },
}

impl Command {
    /// Whether this command runs on a worker thread.
    pub fn is_deferred(&self) -> bool {
        !matches!(self, Command::Emit(_))
    }
}
