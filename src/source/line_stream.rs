//! Line-oriented stream over a blocking reader.
//!
//! A pump thread reads lines from the underlying reader and forwards them
//! through a channel, so `read_chunk` can honour a timeout even though the
//! reader itself blocks.

use super::{CancelHandle, LogStream};
use crate::model::SourceError;
use std::io::{BufRead, BufReader, Read};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, TryRecvError};
use std::thread;
use std::time::Duration;
use tracing::debug;

/// Maximum lines batched into one chunk.
pub const CHUNK_LINES: usize = 100;

type PumpItem = Result<String, String>;

/// [`LogStream`] fed by a background line pump.
pub struct LineStream {
    lines: Receiver<PumpItem>,
    cancel: CancelHandle,
    pending_error: Option<String>,
}

impl LineStream {
    /// Start pumping `reader` on a background thread.
    pub fn spawn<R>(reader: R, cancel: CancelHandle) -> Self
    where
        R: Read + Send + 'static,
    {
        Self::spawn_with_exit(reader, cancel, || {})
    }

    /// Like [`LineStream::spawn`], running `on_exit` on the pump thread once
    /// the reader is exhausted or the stream is cancelled.
    pub fn spawn_with_exit<R, F>(reader: R, cancel: CancelHandle, on_exit: F) -> Self
    where
        R: Read + Send + 'static,
        F: FnOnce() + Send + 'static,
    {
        let (tx, rx) = mpsc::channel();
        let pump_cancel = cancel.clone();

        thread::spawn(move || {
            let mut reader = BufReader::new(reader);
            let mut line = String::new();
            loop {
                if pump_cancel.is_cancelled() {
                    break;
                }
                line.clear();
                match reader.read_line(&mut line) {
                    Ok(0) => break,
                    Ok(_) => {
                        let trimmed = line.trim_end_matches(&['\n', '\r'][..]).to_string();
                        if tx.send(Ok(trimmed)).is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        let _ = tx.send(Err(e.to_string()));
                        break;
                    }
                }
            }
            debug!("log line pump finished");
            on_exit();
        });

        Self {
            lines: rx,
            cancel,
            pending_error: None,
        }
    }
}

impl LogStream for LineStream {
    fn read_chunk(&mut self, timeout: Duration) -> Result<Option<String>, SourceError> {
        if self.cancel.is_cancelled() {
            return Err(SourceError::Cancelled);
        }
        if let Some(err) = self.pending_error.take() {
            return Err(SourceError::Read(err));
        }

        let first = match self.lines.recv_timeout(timeout) {
            Ok(Ok(line)) => line,
            Ok(Err(err)) => return Err(SourceError::Read(err)),
            Err(RecvTimeoutError::Timeout) => return Err(SourceError::Timeout(timeout)),
            Err(RecvTimeoutError::Disconnected) => {
                if self.cancel.is_cancelled() {
                    return Err(SourceError::Cancelled);
                }
                return Ok(None);
            }
        };

        let mut chunk = first;
        for _ in 1..CHUNK_LINES {
            match self.lines.try_recv() {
                Ok(Ok(line)) => {
                    chunk.push('\n');
                    chunk.push_str(&line);
                }
                Ok(Err(err)) => {
                    self.pending_error = Some(err);
                    break;
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        Ok(Some(chunk))
    }

    fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }
}
