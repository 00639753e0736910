//! Cluster-facing collaborators.
//!
//! This module defines the narrow interfaces the dashboard consumes:
//! - [`ClusterCatalog`] lists contexts, namespaces and workloads
//! - [`LogSource`] opens a [`LogStream`] for one workload
//!
//! and two implementations:
//! - [`KubectlCluster`] shells out to `kubectl`
//! - [`DemoCluster`] is an in-memory cluster with synthetic log traffic

use crate::model::{KubeContext, Namespace, SourceError, Workload};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

pub mod demo;
pub mod kubectl;
pub mod line_stream;

pub use demo::{DemoCluster, ScriptedStream};
pub use kubectl::KubectlCluster;
pub use line_stream::LineStream;

/// Contexts known to the cluster configuration, plus the active one.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ContextList {
    /// Every context, in configuration order.
    pub contexts: Vec<KubeContext>,
    /// Name of the active context, if one is set.
    pub current: Option<String>,
}

/// Lists cluster resources. Fetch mechanics belong to the implementation.
pub trait ClusterCatalog: Send + Sync {
    /// All contexts and the current one.
    fn list_contexts(&self) -> Result<ContextList, SourceError>;
    /// Namespaces visible in `context`.
    fn list_namespaces(&self, context: &str) -> Result<Vec<Namespace>, SourceError>;
    /// Workloads in `namespace` of `context`.
    fn list_workloads(&self, context: &str, namespace: &str) -> Result<Vec<Workload>, SourceError>;
}

/// Opens log streams. An open error is final for that attempt.
pub trait LogSource: Send + Sync {
    /// Start following the logs of `workload`.
    fn open_log_stream(&self, workload: &Workload) -> Result<StreamHandle, SourceError>;
}

/// Anything that can both list resources and stream logs.
pub trait Cluster: ClusterCatalog + LogSource {}

impl<T: ClusterCatalog + LogSource> Cluster for T {}

/// An open, incrementally readable log stream.
pub trait LogStream: Send {
    /// Read the next chunk of text.
    ///
    /// Returns `Ok(Some(chunk))` for data, `Ok(None)` at end of stream and
    /// `Err(SourceError::Timeout)` if nothing arrived within `timeout`.
    fn read_chunk(&mut self, timeout: Duration) -> Result<Option<String>, SourceError>;

    /// Handle that cancels this stream from another thread.
    fn cancel_handle(&self) -> CancelHandle;
}

/// Cross-thread cancellation signal for a stream.
///
/// Cancelling flips a shared flag and runs the optional hook once (used to
/// kill a child process so a blocked reader wakes up).
#[derive(Clone, Default)]
pub struct CancelHandle {
    cancelled: Arc<AtomicBool>,
    hook: Option<Arc<dyn Fn() + Send + Sync>>,
}

impl CancelHandle {
    /// Flag-only handle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle that also runs `hook` on the first cancel.
    pub fn with_hook(hook: impl Fn() + Send + Sync + 'static) -> Self {
        Self {
            cancelled: Arc::new(AtomicBool::new(false)),
            hook: Some(Arc::new(hook)),
        }
    }

    /// Signal cancellation. Only the first call runs the hook.
    pub fn cancel(&self) {
        if !self.cancelled.swap(true, Ordering::SeqCst) {
            if let Some(hook) = &self.hook {
                hook();
            }
        }
    }

    /// Whether [`CancelHandle::cancel`] has been called.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

impl fmt::Debug for CancelHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CancelHandle")
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}

/// Owned handle to an open stream.
///
/// The handle travels into a read task and back with its completion message,
/// so at most one read is ever outstanding. Dropping it closes the stream.
pub struct StreamHandle {
    workload: Workload,
    stream: Box<dyn LogStream>,
}

impl StreamHandle {
    /// Wrap `stream` as the log stream of `workload`.
    pub fn new(workload: Workload, stream: Box<dyn LogStream>) -> Self {
        Self { workload, stream }
    }

    /// Workload being streamed.
    pub fn workload(&self) -> &Workload {
        &self.workload
    }

    /// See [`LogStream::read_chunk`].
    pub fn read_chunk(&mut self, timeout: Duration) -> Result<Option<String>, SourceError> {
        self.stream.read_chunk(timeout)
    }

    /// See [`LogStream::cancel_handle`].
    pub fn cancel_handle(&self) -> CancelHandle {
        self.stream.cancel_handle()
    }
}

impl Drop for StreamHandle {
    fn drop(&mut self) {
        self.stream.cancel_handle().cancel();
    }
}

impl fmt::Debug for StreamHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamHandle")
            .field("workload", &self.workload)
            .finish_non_exhaustive()
    }
}
