//! Queued file log handler
//!
//! The file-backed variant of the pluggable handler: producers never block
//! on I/O, every line goes through the [`AsyncLogWriter`] queue, and output
//! is optionally mirrored to the console bridge.

use super::async_writer::AsyncLogWriter;
use crate::core::{LogLevel, Result};
use crate::sinks::ConsoleBridge;
use chrono::Local;
use std::error::Error;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Pluggable destination for the process-wide dispatcher.
pub trait LogHandler: Send + Sync {
    /// Record one formatted message at the given level.
    fn log_formatted(&self, level: LogLevel, context: Option<&str>, message: &str);

    /// Record an exception with its source chain.
    fn log_exception(&self, error: &(dyn Error + 'static), context: Option<&str>);

    /// Enable or disable mirroring to the console bridge.
    fn set_console_output(&self, enabled: bool);

    /// Flush and release resources. Idempotent; the handler absorbs any
    /// call made after cleanup.
    fn cleanup(&self);
}

/// Handler that appends to a log file through a background writer.
pub struct FileLogHandler {
    writer: AsyncLogWriter,
    console: Arc<dyn ConsoleBridge>,
    console_output: AtomicBool,
}

impl FileLogHandler {
    /// Open the log file and start the background writer.
    ///
    /// Records a start banner so restarts are visible in the file.
    pub fn new(
        path: impl Into<PathBuf>,
        console: Arc<dyn ConsoleBridge>,
        mirror_console: bool,
    ) -> Result<Self> {
        let writer = AsyncLogWriter::new(path, Arc::clone(&console))?;
        let handler = Self {
            writer,
            console,
            console_output: AtomicBool::new(mirror_console),
        };
        handler.writer.enqueue(format!(
            "=== Log Started: {} ===\n",
            Local::now().format("%Y-%m-%d %H:%M:%S")
        ));
        Ok(handler)
    }

    /// Factory with the fallback policy: an invalid requested path logs one
    /// warning through the console bridge and falls back to the generated
    /// default path, so logging never becomes entirely unavailable.
    pub fn create(
        requested: Option<PathBuf>,
        base_dir: &Path,
        console: Arc<dyn ConsoleBridge>,
        mirror_console: bool,
    ) -> Result<Self> {
        if let Some(path) = requested {
            match Self::new(&path, Arc::clone(&console), mirror_console) {
                Ok(handler) => return Ok(handler),
                Err(e) => {
                    console.write_formatted(
                        LogLevel::Warning,
                        None,
                        &format!(
                            "Failed to create file handler at {}: {}. Falling back to default path.",
                            path.display(),
                            e
                        ),
                    );
                }
            }
        }
        Self::new(Self::default_log_path(base_dir), console, mirror_console)
    }

    /// Generated default path: `log_<yyyy-MM-dd>.txt`, with a `_N` suffix
    /// incrementing to avoid collisions within a day.
    pub fn default_log_path(base_dir: &Path) -> PathBuf {
        let date = Local::now().format("%Y-%m-%d").to_string();
        let mut path = base_dir.join(format!("log_{}.txt", date));
        let mut counter = 1;
        while path.exists() {
            path = base_dir.join(format!("log_{}_{}.txt", date, counter));
            counter += 1;
        }
        path
    }

    pub fn path(&self) -> &Path {
        self.writer.path()
    }

    pub fn console_output(&self) -> bool {
        self.console_output.load(Ordering::Relaxed)
    }

    fn format_line(level: LogLevel, context: Option<&str>, body: &str) -> String {
        let timestamp = Local::now().format("%H:%M:%S%.3f");
        let context_tag = context.map(|c| format!("[{}] ", c)).unwrap_or_default();
        format!("[{}][{}]{}{}\n", timestamp, level.to_str(), context_tag, body)
    }
}

impl LogHandler for FileLogHandler {
    fn log_formatted(&self, level: LogLevel, context: Option<&str>, message: &str) {
        if self.console_output.load(Ordering::Relaxed) {
            self.console.write_formatted(level, context, message);
        }
        self.writer.enqueue(Self::format_line(level, context, message));
    }

    fn log_exception(&self, error: &(dyn Error + 'static), context: Option<&str>) {
        if self.console_output.load(Ordering::Relaxed) {
            self.console.write_exception(error, context);
        }

        let mut body = format!("Exception: {}\nStackTrace:", error);
        let mut source = error.source();
        while let Some(cause) = source {
            body.push_str(&format!("\n  caused by: {}", cause));
            source = cause.source();
        }
        self.writer
            .enqueue(Self::format_line(LogLevel::Critical, context, &body));
    }

    fn set_console_output(&self, enabled: bool) {
        self.console_output.store(enabled, Ordering::Relaxed);
    }

    fn cleanup(&self) {
        self.writer.dispose();
    }
}
