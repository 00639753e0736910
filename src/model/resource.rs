//! Cluster resource identities shown in the list panels.

use std::fmt;

/// A kubeconfig context.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KubeContext {
    /// Context name as listed by kubeconfig.
    pub name: String,
}

impl KubeContext {
    /// Context called `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// A namespace inside the selected context.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Namespace {
    /// Namespace name.
    pub name: String,
    /// Phase column, usually "Active".
    pub status: String,
}

impl Namespace {
    /// Active namespace called `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: "Active".to_string(),
        }
    }
}

/// Lifecycle phase reported for a workload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum WorkloadStatus {
    /// At least one container is running.
    Running,
    /// Scheduled or initializing.
    Pending,
    /// Finished successfully.
    Succeeded,
    /// Terminated with an error or crash looping.
    Failed,
    /// Anything not recognized.
    #[default]
    Unknown,
}

impl WorkloadStatus {
    /// Parse the status column printed by `kubectl get pods`.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "Running" => WorkloadStatus::Running,
            "Pending" | "ContainerCreating" | "Init" => WorkloadStatus::Pending,
            "Succeeded" | "Completed" => WorkloadStatus::Succeeded,
            "Failed" | "Error" | "CrashLoopBackOff" => WorkloadStatus::Failed,
            _ => WorkloadStatus::Unknown,
        }
    }

    /// Label shown in the workload list.
    pub fn as_str(self) -> &'static str {
        match self {
            WorkloadStatus::Running => "Running",
            WorkloadStatus::Pending => "Pending",
            WorkloadStatus::Succeeded => "Succeeded",
            WorkloadStatus::Failed => "Failed",
            WorkloadStatus::Unknown => "Unknown",
        }
    }
}

/// A running unit whose logs can be streamed.
///
/// Carries the full path (context, namespace, name) so a log stream can be
/// opened without consulting any other selection state.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Workload {
    /// Owning context.
    pub context: String,
    /// Owning namespace.
    pub namespace: String,
    /// Pod name.
    pub name: String,
    /// Last reported phase.
    pub status: WorkloadStatus,
}

impl Workload {
    /// Running workload at `context`/`namespace`/`name`.
    pub fn new(
        context: impl Into<String>,
        namespace: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            context: context.into(),
            namespace: namespace.into(),
            name: name.into(),
            status: WorkloadStatus::Running,
        }
    }

    /// Replace the reported phase.
    pub fn with_status(mut self, status: WorkloadStatus) -> Self {
        self.status = status;
        self
    }
}

impl fmt::Display for Workload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}
