//! Runs deferred commands on worker threads.

use super::command::Command;
use super::message::Msg;
use crate::source::Cluster;
use std::io::Write;
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread;
use tracing::{debug, warn};

/// Dispatches commands: immediate ones are handed back, deferred ones are run
/// on a short-lived thread whose single result is sent over the bus channel.
#[derive(Clone)]
pub struct Executor {
    cluster: Arc<dyn Cluster>,
    tx: Sender<Msg>,
}

impl Executor {
    /// Executor posting deferred results to `tx`.
    pub fn new(cluster: Arc<dyn Cluster>, tx: Sender<Msg>) -> Self {
        Self { cluster, tx }
    }

    /// Execute `cmd`. Returns the message for an immediate command.
    pub fn execute(&self, cmd: Command) -> Option<Msg> {
        if let Command::Emit(msg) = cmd {
            return Some(msg);
        }

        let cluster = Arc::clone(&self.cluster);
        let tx = self.tx.clone();
        thread::spawn(move || {
            let msg = perform(cluster.as_ref(), cmd);
            debug!(kind = msg.kind(), "deferred work finished");
            if tx.send(msg).is_err() {
                warn!("bus closed before deferred result could be delivered");
            }
        });
        None
    }
}

/// Run one command to completion on the calling thread.
///
/// Blocking; used by worker threads and by tests that drive the update loop
/// synchronously.
pub fn perform(cluster: &dyn Cluster, cmd: Command) -> Msg {
    match cmd {
        Command::Emit(msg) => msg,
        Command::LoadContexts => Msg::ContextsLoaded(cluster.list_contexts()),
        Command::LoadNamespaces { context } => {
            let result = cluster.list_namespaces(&context);
            Msg::NamespacesLoaded { context, result }
        }
        Command::LoadWorkloads { context, namespace } => {
            let result = cluster.list_workloads(&context, &namespace);
            Msg::WorkloadsLoaded {
                context,
                namespace,
                result,
            }
        }
        Command::OpenStream {
            generation,
            workload,
        } => Msg::StreamOpened {
            generation,
            result: cluster.open_log_stream(&workload),
        },
        Command::ReadChunk {
            generation,
            mut stream,
            timeout,
        } => {
            let result = stream.read_chunk(timeout);
            Msg::LogChunk {
                generation,
                result,
                stream,
            }
        }
        Command::SaveLogs { path, contents } => {
            Msg::LogsSaved(write_file(&path, &contents).map(|()| path))
        }
    }
}

fn write_file(path: &std::path::Path, contents: &str) -> Result<(), crate::model::SourceError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let mut file = std::fs::File::create(path)?;
    file.write_all(contents.as_bytes())?;
    file.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{SourceError, Workload};
    use crate::source::DemoCluster;
    use std::sync::mpsc;
    use std::time::Duration;

    #[test]
    fn emit_is_returned_immediately() {
        let (tx, rx) = mpsc::channel();
        let executor = Executor::new(Arc::new(DemoCluster::new()), tx);

        let msg = executor.execute(Command::Emit(Msg::ToggleFollow));

        assert!(matches!(msg, Some(Msg::ToggleFollow)));
        assert!(rx.try_recv().is_err(), "nothing should be posted");
    }

    #[test]
    fn deferred_command_posts_exactly_one_message() {
        let (tx, rx) = mpsc::channel();
        let executor = Executor::new(Arc::new(DemoCluster::new()), tx);

        assert!(executor.execute(Command::LoadContexts).is_none());

        let msg = rx.recv_timeout(Duration::from_secs(2)).expect("completion");
        assert!(matches!(msg, Msg::ContextsLoaded(Ok(_))));
        assert!(rx.recv_timeout(Duration::from_millis(50)).is_err());
    }

    #[test]
    fn read_returns_the_stream_with_its_result() {
        let cluster = DemoCluster::scripted(vec![Ok(Some("hello".to_string()))]);
        let workload = Workload::new("kind-demo", "default", "api-gateway");
        let Msg::StreamOpened {
            result: Ok(stream), ..
        } = perform(
            &cluster,
            Command::OpenStream {
                generation: 3,
                workload,
            },
        )
        else {
            panic!("open should succeed");
        };

        let msg = perform(
            &cluster,
            Command::ReadChunk {
                generation: 3,
                stream,
                timeout: Duration::from_millis(10),
            },
        );

        match msg {
            Msg::LogChunk {
                generation,
                result,
                stream,
            } => {
                assert_eq!(generation, 3);
                assert_eq!(result, Ok(Some("hello".to_string())));
                assert_eq!(stream.workload().name, "api-gateway");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn save_writes_file_and_reports_path() {
        let dir = std::env::temp_dir().join("kubeoptic_executor_save");
        let path = dir.join("out.log");
        let _ = std::fs::remove_dir_all(&dir);

        let msg = perform(
            &DemoCluster::new(),
            Command::SaveLogs {
                path: path.clone(),
                contents: "a\nb\n".to_string(),
            },
        );

        assert!(matches!(msg, Msg::LogsSaved(Ok(ref p)) if *p == path));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "a\nb\n");
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn save_failure_is_reported() {
        let msg = perform(
            &DemoCluster::new(),
            Command::SaveLogs {
                path: "/proc/kubeoptic-cannot-write/out.log".into(),
                contents: String::new(),
            },
        );
        assert!(matches!(msg, Msg::LogsSaved(Err(SourceError::Io(_)))));
    }
}
