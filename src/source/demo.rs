//! In-memory cluster for `--demo` mode and tests.

use super::{CancelHandle, ClusterCatalog, ContextList, LogSource, LogStream, StreamHandle};
use crate::model::{KubeContext, Namespace, SourceError, Workload, WorkloadStatus};
use chrono::{SecondsFormat, Utc};
use std::collections::VecDeque;
use std::thread;
use std::time::{Duration, Instant};

const CONTEXTS: [&str; 2] = ["kind-demo", "prod-eu"];

const WORKLOADS: [(&str, &[(&str, WorkloadStatus)]); 3] = [
    (
        "default",
        &[
            ("api-gateway", WorkloadStatus::Running),
            ("web-frontend", WorkloadStatus::Running),
        ],
    ),
    (
        "kube-system",
        &[
            ("coredns", WorkloadStatus::Running),
            ("kube-proxy", WorkloadStatus::Running),
        ],
    ),
    (
        "payments",
        &[
            ("payments-api", WorkloadStatus::Running),
            ("ledger-worker", WorkloadStatus::Pending),
            ("settlement-cron", WorkloadStatus::Succeeded),
        ],
    ),
];

/// What an opened stream produces.
#[derive(Debug, Clone)]
enum StreamMode {
    Synthetic { interval: Duration },
    Scripted(Vec<Result<Option<String>, SourceError>>),
}

/// Fixed catalog of contexts, namespaces and workloads.
#[derive(Debug, Clone)]
pub struct DemoCluster {
    mode: StreamMode,
    failing: Option<&'static str>,
}

impl Default for DemoCluster {
    fn default() -> Self {
        Self::new()
    }
}

impl DemoCluster {
    /// Streams emit a few synthetic lines roughly every 250ms.
    pub fn new() -> Self {
        Self {
            mode: StreamMode::Synthetic {
                interval: Duration::from_millis(250),
            },
            failing: None,
        }
    }

    /// Every opened stream replays `script` in order, then reports end of stream.
    pub fn scripted(script: Vec<Result<Option<String>, SourceError>>) -> Self {
        Self {
            mode: StreamMode::Scripted(script),
            failing: None,
        }
    }

    /// Make listing of `what` ("contexts", "namespaces" or "workloads") fail.
    pub fn failing_list(mut self, what: &'static str) -> Self {
        self.failing = Some(what);
        self
    }

    fn check(&self, what: &'static str) -> Result<(), SourceError> {
        match self.failing {
            Some(f) if f == what => Err(SourceError::List {
                what,
                reason: "demo cluster configured to fail".to_string(),
            }),
            _ => Ok(()),
        }
    }

    fn known_context(context: &str) -> Result<(), SourceError> {
        if CONTEXTS.contains(&context) {
            Ok(())
        } else {
            Err(SourceError::List {
                what: "namespaces",
                reason: format!("context \"{context}\" does not exist"),
            })
        }
    }
}

impl ClusterCatalog for DemoCluster {
    fn list_contexts(&self) -> Result<ContextList, SourceError> {
        self.check("contexts")?;
        Ok(ContextList {
            contexts: CONTEXTS.iter().map(|c| KubeContext::new(*c)).collect(),
            current: Some(CONTEXTS[0].to_string()),
        })
    }

    fn list_namespaces(&self, context: &str) -> Result<Vec<Namespace>, SourceError> {
        self.check("namespaces")?;
        Self::known_context(context)?;
        Ok(WORKLOADS.iter().map(|(ns, _)| Namespace::new(*ns)).collect())
    }

    fn list_workloads(&self, context: &str, namespace: &str) -> Result<Vec<Workload>, SourceError> {
        self.check("workloads")?;
        Self::known_context(context)?;
        let pods = WORKLOADS
            .iter()
            .find(|(ns, _)| *ns == namespace)
            .map(|(_, pods)| *pods)
            .unwrap_or(&[]);
        Ok(pods
            .iter()
            .map(|(name, status)| Workload::new(context, namespace, *name).with_status(*status))
            .collect())
    }
}

impl LogSource for DemoCluster {
    fn open_log_stream(&self, workload: &Workload) -> Result<StreamHandle, SourceError> {
        let exists = WORKLOADS
            .iter()
            .filter(|(ns, _)| *ns == workload.namespace)
            .flat_map(|(_, pods)| pods.iter())
            .any(|(name, _)| *name == workload.name);
        if !exists || !CONTEXTS.contains(&workload.context.as_str()) {
            return Err(SourceError::Open {
                workload: workload.to_string(),
                reason: "pod not found".to_string(),
            });
        }

        let stream: Box<dyn LogStream> = match &self.mode {
            StreamMode::Synthetic { interval } => {
                Box::new(DemoStream::new(workload.name.clone(), *interval))
            }
            StreamMode::Scripted(script) => Box::new(ScriptedStream::new(script.clone())),
        };
        Ok(StreamHandle::new(workload.clone(), stream))
    }
}

// ===== Synthetic stream =====

/// Endless stream of plausible application log lines.
struct DemoStream {
    workload: String,
    interval: Duration,
    emitted: u64,
    cancel: CancelHandle,
}

impl DemoStream {
    fn new(workload: String, interval: Duration) -> Self {
        Self {
            workload,
            interval,
            emitted: 0,
            cancel: CancelHandle::new(),
        }
    }

    fn next_line(&mut self) -> String {
        self.emitted += 1;
        let n = self.emitted;
        let level = if n % 13 == 0 {
            "ERROR"
        } else if n % 7 == 0 {
            "WARN"
        } else if n % 5 == 0 {
            "DEBUG"
        } else {
            "INFO"
        };
        let message = match n % 4 {
            0 => format!("request handled path=/v1/orders/{n} status=200"),
            1 => format!("cache refresh completed entries={}", n * 3),
            2 => "health check ok".to_string(),
            _ => format!("processed batch id={n} latency_ms={}", n % 97),
        };
        format!(
            "{} {level} [{}] {message}",
            Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            self.workload
        )
    }
}

impl LogStream for DemoStream {
    fn read_chunk(&mut self, timeout: Duration) -> Result<Option<String>, SourceError> {
        let wait = self.interval.min(timeout);
        let deadline = Instant::now() + wait;
        while Instant::now() < deadline {
            if self.cancel.is_cancelled() {
                return Err(SourceError::Cancelled);
            }
            thread::sleep(Duration::from_millis(10).min(wait));
        }
        if self.cancel.is_cancelled() {
            return Err(SourceError::Cancelled);
        }
        if wait < self.interval {
            return Err(SourceError::Timeout(timeout));
        }

        let burst = 1 + (self.emitted % 3) as usize;
        let lines: Vec<String> = (0..burst).map(|_| self.next_line()).collect();
        Ok(Some(lines.join("\n")))
    }

    fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }
}

// ===== Scripted stream =====

/// Replays a fixed sequence of read results, then reports end of stream.
pub struct ScriptedStream {
    script: VecDeque<Result<Option<String>, SourceError>>,
    cancel: CancelHandle,
}

impl ScriptedStream {
    /// Stream that yields `script` in order.
    pub fn new(script: Vec<Result<Option<String>, SourceError>>) -> Self {
        Self {
            script: script.into(),
            cancel: CancelHandle::new(),
        }
    }
}

impl LogStream for ScriptedStream {
    fn read_chunk(&mut self, _timeout: Duration) -> Result<Option<String>, SourceError> {
        if self.cancel.is_cancelled() {
            return Err(SourceError::Cancelled);
        }
        self.script.pop_front().unwrap_or(Ok(None))
    }

    fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }
}
