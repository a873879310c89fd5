//! Logger registry and process-wide dispatch
//!
//! One owned instance per process, injectable for tests. Owns the map of
//! named diagnostics loggers, the currently active pluggable handler, the
//! default log directory, and the conditional debug gate.

use super::error::{LoggerError, Result};
use super::log_level::LogLevel;
use crate::diagnostics::{DiagnosticsLog, DiagnosticsLogger};
use crate::handlers::LogHandler;
use crate::sinks::{ConsoleBridge, StandardConsole};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::error::Error;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

pub struct LoggerRegistry {
    loggers: RwLock<HashMap<String, Arc<dyn DiagnosticsLog>>>,
    handler: RwLock<Option<Arc<dyn LogHandler>>>,
    default_directory: RwLock<PathBuf>,
    debug_enabled: AtomicBool,
    console: Arc<dyn ConsoleBridge>,
}

impl LoggerRegistry {
    pub fn new() -> Self {
        Self::with_console(Arc::new(StandardConsole::new()))
    }

    /// Build a registry forwarding console output through the given bridge.
    pub fn with_console(console: Arc<dyn ConsoleBridge>) -> Self {
        Self {
            loggers: RwLock::new(HashMap::new()),
            handler: RwLock::new(None),
            default_directory: RwLock::new(std::env::temp_dir().join("logs")),
            debug_enabled: AtomicBool::new(false),
            console,
        }
    }

    /// Directory used when a creation call passes no explicit directory.
    pub fn default_directory(&self) -> PathBuf {
        self.default_directory.read().clone()
    }

    pub fn set_default_directory(&self, directory: impl Into<PathBuf>) {
        *self.default_directory.write() = directory.into();
    }

    pub fn console(&self) -> &Arc<dyn ConsoleBridge> {
        &self.console
    }

    // ---- Diagnostics loggers ----

    /// Create, initialize, and register the default file-backed logger for
    /// `system`. Fails with `DuplicateName` (without side effects) when the
    /// name is taken.
    pub fn create_diagnostics_logger(
        &self,
        system: &str,
        directory: Option<&Path>,
    ) -> Result<Arc<dyn DiagnosticsLog>> {
        self.create_diagnostics_logger_with(system, directory, Arc::new(DiagnosticsLogger::new()))
    }

    /// As [`create_diagnostics_logger`](Self::create_diagnostics_logger),
    /// but registers an injected implementation.
    pub fn create_diagnostics_logger_with(
        &self,
        system: &str,
        directory: Option<&Path>,
        logger: Arc<dyn DiagnosticsLog>,
    ) -> Result<Arc<dyn DiagnosticsLog>> {
        let mut loggers = self.loggers.write();
        if loggers.contains_key(system) {
            return Err(LoggerError::duplicate_name(system));
        }

        let directory = directory
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.default_directory());
        logger.initialize(system, &directory)?;

        loggers.insert(system.to_string(), Arc::clone(&logger));
        Ok(logger)
    }

    /// Registered logger for `system`, if any. Never fails.
    pub fn get_diagnostics_logger(&self, system: &str) -> Option<Arc<dyn DiagnosticsLog>> {
        self.loggers.read().get(system).cloned()
    }

    pub fn has_diagnostics_logger(&self, system: &str) -> bool {
        self.loggers.read().contains_key(system)
    }

    /// Remove and clean up the logger for `system`. Cleanup runs outside
    /// the critical section so its I/O latency does not block other
    /// registry operations. No-op for unknown or empty names.
    pub fn remove_diagnostics_logger(&self, system: &str) {
        if system.is_empty() {
            return;
        }

        let removed = self.loggers.write().remove(system);
        if let Some(logger) = removed {
            logger.cleanup();
        }
    }

    /// Clean up every registered logger and clear the map.
    pub fn cleanup_all(&self) {
        let drained: Vec<Arc<dyn DiagnosticsLog>> =
            self.loggers.write().drain().map(|(_, logger)| logger).collect();
        for logger in drained {
            logger.cleanup();
        }
    }

    // ---- Handler dispatch ----

    /// Install a handler, cleaning up the one it replaces.
    pub fn set_handler(&self, handler: Arc<dyn LogHandler>) {
        let previous = self.handler.write().replace(handler);
        if let Some(previous) = previous {
            previous.cleanup();
        }
    }

    /// Remove the current handler (cleaning it up); output falls back to
    /// the console bridge.
    pub fn reset_handler(&self) {
        let previous = self.handler.write().take();
        if let Some(previous) = previous {
            previous.cleanup();
        }
    }

    pub fn current_handler(&self) -> Option<Arc<dyn LogHandler>> {
        self.handler.read().clone()
    }

    /// Route a formatted message to the current handler, or to the console
    /// bridge when none is installed.
    pub fn log_formatted(&self, level: LogLevel, context: Option<&str>, message: &str) {
        match self.current_handler() {
            Some(handler) => handler.log_formatted(level, context, message),
            None => self.console.write_formatted(level, context, message),
        }
    }

    /// Route an exception to the current handler, or to the console bridge
    /// when none is installed.
    pub fn log_exception(&self, error: &(dyn Error + 'static), context: Option<&str>) {
        match self.current_handler() {
            Some(handler) => handler.log_exception(error, context),
            None => self.console.write_exception(error, context),
        }
    }

    // ---- Conditional debug forwarding ----

    pub fn is_debug_enabled(&self) -> bool {
        self.debug_enabled.load(Ordering::Relaxed)
    }

    pub fn set_debug_enabled(&self, enabled: bool) {
        self.debug_enabled.store(enabled, Ordering::Relaxed);
    }

    pub fn log_conditional_debug(&self, message: &str) {
        if self.is_debug_enabled() {
            self.console.write_formatted(LogLevel::Debug, None, message);
        }
    }

    pub fn log_conditional_debug_warning(&self, message: &str) {
        if self.is_debug_enabled() {
            self.console.write_formatted(LogLevel::Warning, None, message);
        }
    }

    pub fn log_conditional_debug_error(&self, message: &str) {
        if self.is_debug_enabled() {
            self.console.write_formatted(LogLevel::Error, None, message);
        }
    }

    /// Process-shutdown path: drop the handler and tear down every
    /// diagnostics logger.
    pub fn cleanup(&self) {
        self.reset_handler();
        self.cleanup_all();
    }
}

impl Default for LoggerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for LoggerRegistry {
    fn drop(&mut self) {
        self.cleanup();
    }
}
