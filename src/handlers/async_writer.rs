//! Thread-safe queue feeding a single background writer
//!
//! Decouples producer threads from file I/O latency: producers enqueue
//! formatted lines without blocking, one dedicated worker drains the queue
//! into a [`StreamSink`] in FIFO order.

use crate::core::{LogLevel, Result};
use crate::sinks::{ConsoleBridge, StreamSink};
use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError, Sender};
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Bounded wait for the worker thread to exit during disposal.
pub const SHUTDOWN_JOIN_TIMEOUT: Duration = Duration::from_secs(2);

/// The worker wakes at this interval even with no traffic, so it stays
/// responsive to disposal.
const IDLE_WAIT: Duration = Duration::from_secs(1);

enum WriterMessage {
    Line(String),
    Shutdown,
}

/// Unbounded FIFO of formatted lines plus one background worker.
///
/// Once disposed, further enqueues are silently dropped. The worker drains
/// the queue to empty before re-blocking, except that draining stops as
/// soon as disposal is observed.
pub struct AsyncLogWriter {
    sender: Sender<WriterMessage>,
    disposed: Arc<AtomicBool>,
    worker: Mutex<Option<thread::JoinHandle<()>>>,
    path: PathBuf,
}

impl AsyncLogWriter {
    /// Open the destination and start the writer thread.
    ///
    /// Construction failures (invalid path, unwritable directory) propagate
    /// to the caller; misconfiguration is visible immediately.
    pub fn new(path: impl Into<PathBuf>, console: Arc<dyn ConsoleBridge>) -> Result<Self> {
        let path = path.into();
        let sink = StreamSink::open(&path)?;

        let (sender, receiver) = unbounded();
        let disposed = Arc::new(AtomicBool::new(false));
        let worker_disposed = Arc::clone(&disposed);

        let handle = thread::Builder::new()
            .name("log-writer".to_string())
            .spawn(move || worker_loop(receiver, sink, worker_disposed, console))?;

        Ok(Self {
            sender,
            disposed,
            worker: Mutex::new(Some(handle)),
            path,
        })
    }

    /// Non-blocking, thread-safe append. No-op after disposal.
    pub fn enqueue(&self, message: String) {
        if self.disposed.load(Ordering::Acquire) {
            return;
        }
        let _ = self.sender.send(WriterMessage::Line(message));
    }

    /// Stop the worker and close the stream.
    ///
    /// Sets the disposed flag, wakes the worker once more so it observes
    /// the flag, and joins with a bounded wait. Idempotent; also invoked
    /// from `Drop` as a safety net.
    pub fn dispose(&self) {
        if self.disposed.swap(true, Ordering::AcqRel) {
            return;
        }
        let _ = self.sender.send(WriterMessage::Shutdown);

        let handle = self.worker.lock().take();
        if let Some(handle) = handle {
            let start = Instant::now();
            loop {
                if handle.is_finished() {
                    let _ = handle.join();
                    break;
                }
                if start.elapsed() >= SHUTDOWN_JOIN_TIMEOUT {
                    // Best-effort drain only; the thread is left to finish
                    // on its own and messages still queued may be lost.
                    break;
                }
                thread::sleep(Duration::from_millis(10));
            }
        }
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::Acquire)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for AsyncLogWriter {
    fn drop(&mut self) {
        self.dispose();
    }
}

fn worker_loop(
    receiver: Receiver<WriterMessage>,
    mut sink: StreamSink,
    disposed: Arc<AtomicBool>,
    console: Arc<dyn ConsoleBridge>,
) {
    loop {
        match receiver.recv_timeout(IDLE_WAIT) {
            Ok(WriterMessage::Line(line)) => {
                write_line(&mut sink, &line, &*console);

                // Drain whatever queued up, one message at a time, until
                // the queue is empty or disposal is observed.
                let mut shutdown = false;
                while !disposed.load(Ordering::Acquire) {
                    match receiver.try_recv() {
                        Ok(WriterMessage::Line(next)) => write_line(&mut sink, &next, &*console),
                        Ok(WriterMessage::Shutdown) => {
                            shutdown = true;
                            break;
                        }
                        Err(_) => break,
                    }
                }
                if shutdown {
                    break;
                }
            }
            Ok(WriterMessage::Shutdown) => break,
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }

        if disposed.load(Ordering::Acquire) {
            break;
        }
    }

    sink.close();
}

/// Write one line and flush. On failure, report through the console
/// fallback, reopen the stream, and continue; the failed line is dropped
/// rather than retried indefinitely.
fn write_line(sink: &mut StreamSink, line: &str, console: &dyn ConsoleBridge) {
    if let Err(write_err) = sink.write(line).and_then(|()| sink.flush()) {
        console.write_formatted(
            LogLevel::Error,
            None,
            &format!(
                "Failed to write to log file {}: {}",
                sink.path().display(),
                write_err
            ),
        );
        if let Err(reopen_err) = sink.reopen() {
            console.write_formatted(
                LogLevel::Error,
                None,
                &format!(
                    "Failed to reopen log file {}: {}",
                    sink.path().display(),
                    reopen_err
                ),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sinks::StandardConsole;
    use tempfile::tempdir;

    fn console() -> Arc<dyn ConsoleBridge> {
        Arc::new(StandardConsole::with_colors(false))
    }

    #[test]
    fn test_messages_written_in_enqueue_order() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("ordered.log");

        let writer = AsyncLogWriter::new(&path, console()).expect("Failed to start writer");
        for i in 0..50 {
            writer.enqueue(format!("message {}\n", i));
        }

        // Messages still queued at dispose are dropped, so wait for the
        // worker to drain before shutting down.
        let start = Instant::now();
        while start.elapsed() < Duration::from_secs(5) {
            let written = std::fs::read_to_string(&path).unwrap_or_default();
            if written.lines().count() == 50 {
                break;
            }
            thread::sleep(Duration::from_millis(10));
        }
        writer.dispose();

        let content = std::fs::read_to_string(&path).expect("Failed to read file");
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 50);
        for (i, line) in lines.iter().enumerate() {
            assert_eq!(*line, format!("message {}", i));
        }
    }

    #[test]
    fn test_enqueue_after_dispose_is_dropped() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("disposed.log");

        let writer = AsyncLogWriter::new(&path, console()).expect("Failed to start writer");
        writer.enqueue("before\n".to_string());

        let start = Instant::now();
        while start.elapsed() < Duration::from_secs(5) {
            if std::fs::read_to_string(&path).unwrap_or_default().contains("before") {
                break;
            }
            thread::sleep(Duration::from_millis(10));
        }
        writer.dispose();
        assert!(writer.is_disposed());

        writer.enqueue("after\n".to_string());

        let content = std::fs::read_to_string(&path).expect("Failed to read file");
        assert!(content.contains("before"));
        assert!(!content.contains("after"));
    }

    #[test]
    fn test_dispose_is_idempotent() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("twice.log");

        let writer = AsyncLogWriter::new(&path, console()).expect("Failed to start writer");
        writer.dispose();
        writer.dispose();
    }

    #[test]
    fn test_invalid_path_fails_construction() {
        let long_name = "x".repeat(crate::sinks::MAX_PATH_LENGTH + 1);
        let result = AsyncLogWriter::new(std::env::temp_dir().join(long_name), console());
        assert!(result.is_err());
    }
}
