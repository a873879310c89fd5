//! Owned writable file stream with open/append/recover/close lifecycle

use crate::core::{LoggerError, Result};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Maximum accepted destination path length, matching common filesystem limits.
pub const MAX_PATH_LENGTH: usize = 260;

/// One writable destination. No concurrency of its own; callers invoke it
/// under the owning component's lock.
///
/// The handle is either absent or open-and-writable, never partially
/// initialized.
#[derive(Debug)]
pub struct StreamSink {
    path: PathBuf,
    writer: Option<BufWriter<File>>,
}

impl StreamSink {
    /// Validate the destination path and open it for append, creating the
    /// parent directory if absent.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        Self::validate_path(&path)?;

        let mut sink = Self { path, writer: None };
        sink.reopen()?;
        Ok(sink)
    }

    /// Reject over-long paths and paths whose parent directory cannot be
    /// created. Callers fall back to a default path on these errors rather
    /// than surfacing them to the end user.
    pub fn validate_path(path: &Path) -> Result<()> {
        let display = path.display().to_string();
        if display.len() > MAX_PATH_LENGTH {
            return Err(LoggerError::config(
                display,
                format!("path exceeds {} characters", MAX_PATH_LENGTH),
            ));
        }

        match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => {
                std::fs::create_dir_all(parent).map_err(|e| {
                    LoggerError::config(
                        display,
                        format!("cannot create directory '{}': {}", parent.display(), e),
                    )
                })?;
            }
            _ => {
                return Err(LoggerError::config(display, "missing parent directory"));
            }
        }

        Ok(())
    }

    /// Append text verbatim.
    pub fn write(&mut self, text: &str) -> Result<()> {
        let writer = self
            .writer
            .as_mut()
            .ok_or_else(|| LoggerError::not_initialized(self.path.display().to_string()))?;
        writer.write_all(text.as_bytes())?;
        Ok(())
    }

    /// Force buffered bytes to the destination. Idempotent, safe when
    /// nothing is buffered.
    pub fn flush(&mut self) -> Result<()> {
        if let Some(ref mut writer) = self.writer {
            writer.flush()?;
        }
        Ok(())
    }

    /// Close and open the same destination again. Used by owners to recover
    /// from a write failure.
    pub fn reopen(&mut self) -> Result<()> {
        self.close();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| {
                LoggerError::io_operation(
                    "opening log file",
                    self.path.display().to_string(),
                    e,
                )
            })?;
        self.writer = Some(BufWriter::new(file));
        Ok(())
    }

    /// Flush best-effort, then release the handle. Idempotent.
    pub fn close(&mut self) {
        if let Some(mut writer) = self.writer.take() {
            let _ = writer.flush();
        }
    }

    pub fn is_open(&self) -> bool {
        self.writer.is_some()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for StreamSink {
    fn drop(&mut self) {
        self.close();
    }
}
