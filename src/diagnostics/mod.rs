//! Named diagnostics loggers
//!
//! A diagnostics logger owns one file sink exclusively and writes to it
//! synchronously under a private lock, flushing after a configurable
//! number of messages.

use crate::core::{LogEvent, LogLevel, LoggerError, Result, TimestampFormat};
use crate::sinks::StreamSink;
use parking_lot::Mutex;
use std::error::Error;
use std::path::{Path, PathBuf};

/// Messages written before an automatic flush, unless overridden.
pub const DEFAULT_FLUSH_THRESHOLD: u32 = 100;

/// Logging surface of a named diagnostics endpoint.
///
/// Implementations are injectable into the registry; the default is the
/// file-backed [`DiagnosticsLogger`].
pub trait DiagnosticsLog: Send + Sync {
    /// Open the log file `<directory>/<source_name>.log` and reset the
    /// message counter. Directory-creation failures propagate.
    fn initialize(&self, source_name: &str, directory: &Path) -> Result<()>;

    fn log(&self, message: &str);
    fn log_warning(&self, message: &str);
    fn log_error(&self, message: &str);

    /// Record an exception at Critical level with its source chain.
    fn log_exception(&self, error: &(dyn Error + 'static));

    /// When the condition is false, write an `Assertion failed` line and
    /// flush immediately. No effect when the condition holds.
    fn assert(&self, condition: bool, message: &str);

    /// As [`assert`](DiagnosticsLog::assert), but additionally returns an
    /// error carrying the message. The log line is durably flushed before
    /// the error is observed by the caller.
    fn assert_or_fail(&self, condition: bool, message: &str) -> Result<()>;

    /// Force buffered content to disk and reset the message counter.
    fn flush(&self);

    /// Flush, close the sink, and become permanently inert. Subsequent log
    /// calls are silently absorbed. Idempotent.
    fn cleanup(&self);

    fn is_initialized(&self) -> bool;
}

impl std::fmt::Debug for dyn DiagnosticsLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("DiagnosticsLog")
    }
}

struct Inner {
    sink: Option<StreamSink>,
    message_count: u32,
}

/// Default file-backed diagnostics logger.
///
/// Every mutating operation holds the private lock for the whole
/// write-and-maybe-flush sequence, so concurrent writers never interleave
/// mid-line.
pub struct DiagnosticsLogger {
    inner: Mutex<Inner>,
    flush_threshold: u32,
    timestamp_format: TimestampFormat,
}

impl DiagnosticsLogger {
    pub fn new() -> Self {
        Self::with_flush_threshold(DEFAULT_FLUSH_THRESHOLD)
    }

    /// A threshold of 0 disables auto-flush; explicit `flush` calls still
    /// work.
    pub fn with_flush_threshold(flush_threshold: u32) -> Self {
        Self {
            inner: Mutex::new(Inner {
                sink: None,
                message_count: 0,
            }),
            flush_threshold,
            timestamp_format: TimestampFormat::default(),
        }
    }

    #[must_use]
    pub fn with_timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = format;
        self
    }

    pub fn flush_threshold(&self) -> u32 {
        self.flush_threshold
    }

    pub fn log_file_path(&self) -> Option<PathBuf> {
        self.inner.lock().sink.as_ref().map(|s| s.path().to_path_buf())
    }

    /// Write one event under the lock, then handle threshold bookkeeping.
    /// A failed write is retried exactly once after reopening the sink;
    /// a second failure drops the line.
    fn write_event(&self, level: LogLevel, message: &str, trace: Option<String>, force_flush: bool) {
        let mut inner = self.inner.lock();
        if inner.sink.is_none() {
            return;
        }

        let mut event = LogEvent::new(level, message);
        if let Some(trace) = trace {
            event = event.with_stack_trace(trace);
        }
        let line = event.format_line(&self.timestamp_format);

        if let Some(sink) = inner.sink.as_mut() {
            if sink.write(&line).is_err() {
                let recovered = sink.reopen().is_ok() && sink.write(&line).is_ok();
                if !recovered {
                    return;
                }
            }
        }

        inner.message_count += 1;
        let threshold_reached =
            self.flush_threshold > 0 && inner.message_count >= self.flush_threshold;
        if force_flush || threshold_reached {
            if let Some(sink) = inner.sink.as_mut() {
                let _ = sink.flush();
            }
            inner.message_count = 0;
        }
    }
}

impl Default for DiagnosticsLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl DiagnosticsLog for DiagnosticsLogger {
    fn initialize(&self, source_name: &str, directory: &Path) -> Result<()> {
        if source_name.is_empty() {
            return Err(LoggerError::config(
                directory.display().to_string(),
                "source name must not be empty",
            ));
        }

        let path = directory.join(format!("{}.log", source_name));
        let sink = StreamSink::open(path)?;

        let mut inner = self.inner.lock();
        inner.sink = Some(sink);
        inner.message_count = 0;
        Ok(())
    }

    fn log(&self, message: &str) {
        self.write_event(LogLevel::Info, message, None, false);
    }

    fn log_warning(&self, message: &str) {
        self.write_event(LogLevel::Warning, message, None, false);
    }

    fn log_error(&self, message: &str) {
        self.write_event(LogLevel::Error, message, None, false);
    }

    fn log_exception(&self, error: &(dyn Error + 'static)) {
        let mut trace = String::new();
        let mut source = error.source();
        while let Some(cause) = source {
            if !trace.is_empty() {
                trace.push('\n');
            }
            trace.push_str(&format!("  caused by: {}", cause));
            source = cause.source();
        }

        self.write_event(
            LogLevel::Critical,
            &format!("Exception: {}", error),
            Some(trace),
            false,
        );
    }

    fn assert(&self, condition: bool, message: &str) {
        if condition {
            return;
        }
        self.write_event(
            LogLevel::Error,
            &format!("Assertion failed: {}", message),
            None,
            true,
        );
    }

    fn assert_or_fail(&self, condition: bool, message: &str) -> Result<()> {
        if condition {
            return Ok(());
        }
        // The write is flushed before the error becomes observable, so a
        // crash right after still leaves the evidence on disk.
        self.write_event(
            LogLevel::Error,
            &format!("Assertion failed: {}", message),
            None,
            true,
        );
        Err(LoggerError::assertion(message))
    }

    fn flush(&self) {
        let mut inner = self.inner.lock();
        if let Some(sink) = inner.sink.as_mut() {
            let _ = sink.flush();
        }
        inner.message_count = 0;
    }

    fn cleanup(&self) {
        let mut inner = self.inner.lock();
        if let Some(mut sink) = inner.sink.take() {
            let _ = sink.flush();
            sink.close();
        }
        inner.message_count = 0;
    }

    fn is_initialized(&self) -> bool {
        self.inner.lock().sink.is_some()
    }
}
