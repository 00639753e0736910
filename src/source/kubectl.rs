//! Cluster access through the `kubectl` command-line client.

use super::{CancelHandle, ClusterCatalog, ContextList, LineStream, LogSource, StreamHandle};
use crate::model::{KubeContext, Namespace, SourceError, Workload, WorkloadStatus};
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::sync::{Arc, Mutex};
use tracing::{debug, info};

/// [`ClusterCatalog`] and [`LogSource`] backed by a `kubectl` binary.
#[derive(Debug, Clone)]
pub struct KubectlCluster {
    binary: PathBuf,
    tail_lines: usize,
}

impl KubectlCluster {
    /// Cluster driven by `binary`, starting each log stream `tail_lines` back.
    pub fn new(binary: impl Into<PathBuf>, tail_lines: usize) -> Self {
        Self {
            binary: binary.into(),
            tail_lines,
        }
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.binary);
        cmd.stdin(Stdio::null());
        cmd
    }

    /// Run to completion and return stdout, mapping failures to `List` errors.
    fn capture(&self, what: &'static str, args: &[&str]) -> Result<String, SourceError> {
        debug!(?args, "running kubectl");
        let output = self
            .command()
            .args(args)
            .output()
            .map_err(|e| SourceError::List {
                what,
                reason: e.to_string(),
            })?;
        if !output.status.success() {
            return Err(SourceError::List {
                what,
                reason: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl ClusterCatalog for KubectlCluster {
    fn list_contexts(&self) -> Result<ContextList, SourceError> {
        let names = self.capture("contexts", &["config", "get-contexts", "-o", "name"])?;
        let current = self
            .capture("contexts", &["config", "current-context"])
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        Ok(ContextList {
            contexts: parse_context_names(&names),
            current,
        })
    }

    fn list_namespaces(&self, context: &str) -> Result<Vec<Namespace>, SourceError> {
        let out = self.capture(
            "namespaces",
            &["--context", context, "get", "namespaces", "--no-headers"],
        )?;
        Ok(parse_namespace_rows(&out))
    }

    fn list_workloads(&self, context: &str, namespace: &str) -> Result<Vec<Workload>, SourceError> {
        let out = self.capture(
            "workloads",
            &["--context", context, "-n", namespace, "get", "pods", "--no-headers"],
        )?;
        Ok(parse_pod_rows(&out, context, namespace))
    }
}

impl LogSource for KubectlCluster {
    fn open_log_stream(&self, workload: &Workload) -> Result<StreamHandle, SourceError> {
        let open_err = |reason: String| SourceError::Open {
            workload: workload.to_string(),
            reason,
        };

        // Existence check first so "not found" surfaces as an open error
        // rather than an immediate end of stream.
        let exists = self
            .command()
            .args(["--context", &workload.context, "-n", &workload.namespace])
            .args(["get", "pod", &workload.name, "-o", "name"])
            .output()
            .map_err(|e| open_err(e.to_string()))?;
        if !exists.status.success() {
            return Err(open_err(
                String::from_utf8_lossy(&exists.stderr).trim().to_string(),
            ));
        }

        let tail = format!("--tail={}", self.tail_lines);
        let mut child = self
            .command()
            .args(["--context", &workload.context, "-n", &workload.namespace])
            .args(["logs", "-f", "--timestamps", &tail, &workload.name])
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| open_err(e.to_string()))?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| open_err("kubectl produced no stdout".to_string()))?;

        // The hook runs on the update thread, so it only signals the child;
        // the pump thread reaps it once stdout closes.
        let child = Arc::new(Mutex::new(child));
        let killer = Arc::clone(&child);
        let cancel = CancelHandle::with_hook(move || {
            if let Ok(mut child) = killer.try_lock() {
                let _ = child.kill();
            }
        });
        let reap = move || {
            if let Ok(mut child) = child.lock() {
                let _ = child.kill();
                match child.wait() {
                    Ok(status) => debug!(%status, "kubectl logs exited"),
                    Err(e) => debug!(error = %e, "kubectl logs could not be reaped"),
                }
            }
        };

        info!(workload = %workload, "opened kubectl log stream");
        let stream = LineStream::spawn_with_exit(stdout, cancel, reap);
        Ok(StreamHandle::new(workload.clone(), Box::new(stream)))
    }
}

/// Parse `kubectl config get-contexts -o name`.
fn parse_context_names(out: &str) -> Vec<KubeContext> {
    out.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(KubeContext::new)
        .collect()
}

/// Parse `kubectl get namespaces --no-headers` (NAME STATUS AGE).
fn parse_namespace_rows(out: &str) -> Vec<Namespace> {
    out.lines()
        .filter_map(|line| {
            let mut cols = line.split_whitespace();
            let name = cols.next()?;
            let status = cols.next().unwrap_or("Unknown");
            Some(Namespace {
                name: name.to_string(),
                status: status.to_string(),
            })
        })
        .collect()
}

/// Parse `kubectl get pods --no-headers` (NAME READY STATUS RESTARTS AGE).
fn parse_pod_rows(out: &str, context: &str, namespace: &str) -> Vec<Workload> {
    out.lines()
        .filter_map(|line| {
            let cols: Vec<&str> = line.split_whitespace().collect();
            let name = cols.first()?;
            let status = cols.get(2).copied().unwrap_or("Unknown");
            Some(
                Workload::new(context, namespace, *name).with_status(WorkloadStatus::parse(status)),
            )
        })
        .collect()
}
