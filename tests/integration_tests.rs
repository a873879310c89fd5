//! Integration tests for the diagnostics logger system
//!
//! These tests verify:
//! - Registry creation/lookup/removal semantics
//! - Threshold-driven flushing on disk
//! - Assertion logging ordering guarantees
//! - Handler dispatch, console mirroring, and path fallback

use diagnostics_logger::prelude::*;
use std::error::Error;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};
use tempfile::TempDir;

/// Console double capturing everything forwarded through the bridge.
#[derive(Default)]
struct MemoryConsole {
    lines: Mutex<Vec<String>>,
}

impl MemoryConsole {
    fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.lines.lock().expect("memory console lock"))
    }
}

impl ConsoleBridge for MemoryConsole {
    fn write_formatted(&self, level: LogLevel, context: Option<&str>, message: &str) {
        let context_tag = context.map(|c| format!("[{}] ", c)).unwrap_or_default();
        self.lines
            .lock()
            .expect("memory console lock")
            .push(format!("[{}] {}{}", level, context_tag, message));
    }

    fn write_exception(&self, error: &(dyn Error + 'static), context: Option<&str>) {
        self.write_formatted(LogLevel::Critical, context, &format!("Exception: {}", error));
    }
}

fn wait_for(path: &Path, needle: &str) -> String {
    let start = Instant::now();
    loop {
        let content = std::fs::read_to_string(path).unwrap_or_default();
        if content.contains(needle) || start.elapsed() > Duration::from_secs(5) {
            return content;
        }
        thread::sleep(Duration::from_millis(10));
    }
}

#[test]
fn test_create_log_flush_scenario() {
    // createDiagnosticsLogger("Net", dir) -> log("hello") -> flush()
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let registry = LoggerRegistry::new();

    let logger = registry
        .create_diagnostics_logger("Net", Some(temp_dir.path()))
        .expect("Failed to create logger");
    logger.log("hello");
    logger.flush();

    let log_path = temp_dir.path().join("Net.log");
    assert!(log_path.exists(), "Net.log should exist");

    let content = std::fs::read_to_string(&log_path).expect("Failed to read log file");
    let last_line = content.lines().last().expect("log file should not be empty");
    assert!(last_line.ends_with("hello"));
}

#[test]
fn test_all_messages_persist_in_write_order() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let registry = LoggerRegistry::new();

    let logger = registry
        .create_diagnostics_logger("Ordered", Some(temp_dir.path()))
        .expect("Failed to create logger");
    for i in 0..40 {
        logger.log(&format!("entry {:02}", i));
    }
    logger.flush();

    let content = std::fs::read_to_string(temp_dir.path().join("Ordered.log"))
        .expect("Failed to read log file");
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 40);
    for (i, line) in lines.iter().enumerate() {
        assert!(line.ends_with(&format!("entry {:02}", i)), "line {}: {}", i, line);
    }
}

#[test]
fn test_duplicate_creation_fails_and_first_survives() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let registry = LoggerRegistry::new();

    let first = registry
        .create_diagnostics_logger("Audio", Some(temp_dir.path()))
        .expect("Failed to create logger");
    let second = registry.create_diagnostics_logger("Audio", Some(temp_dir.path()));
    assert!(matches!(second, Err(LoggerError::DuplicateName { .. })));

    first.log("first logger still works");
    first.flush();
    let content = std::fs::read_to_string(temp_dir.path().join("Audio.log"))
        .expect("Failed to read log file");
    assert!(content.contains("first logger still works"));
}

#[test]
fn test_flush_threshold_behavior_on_disk() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let registry = LoggerRegistry::new();

    let logger = registry
        .create_diagnostics_logger_with(
            "Thresh",
            Some(temp_dir.path()),
            Arc::new(DiagnosticsLogger::with_flush_threshold(5)),
        )
        .expect("Failed to create logger");

    let log_path = temp_dir.path().join("Thresh.log");
    for i in 0..4 {
        logger.log(&format!("buffered {}", i));
    }
    let before = std::fs::read_to_string(&log_path).unwrap_or_default();
    assert!(!before.contains("buffered 3"), "threshold not yet reached");

    logger.log("buffered 4");
    let after = std::fs::read_to_string(&log_path).expect("Failed to read log file");
    for i in 0..5 {
        assert!(after.contains(&format!("buffered {}", i)));
    }
}

#[test]
fn test_assert_or_fail_evidence_precedes_error() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let registry = LoggerRegistry::new();

    let logger = registry
        .create_diagnostics_logger("Guard", Some(temp_dir.path()))
        .expect("Failed to create logger");

    let result = logger.assert_or_fail(false, "frame budget exceeded");
    let err = result.unwrap_err();
    assert!(err.to_string().contains("frame budget exceeded"));

    let content = std::fs::read_to_string(temp_dir.path().join("Guard.log"))
        .expect("Failed to read log file");
    assert!(content.contains("Assertion failed"));
    assert!(content.contains("frame budget exceeded"));
}

#[test]
fn test_cleanup_all_makes_loggers_inert() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let registry = LoggerRegistry::new();

    let logger = registry
        .create_diagnostics_logger("Ephemeral", Some(temp_dir.path()))
        .expect("Failed to create logger");
    logger.log("kept");
    registry.cleanup_all();

    logger.log("discarded");
    logger.flush();
    assert!(!registry.has_diagnostics_logger("Ephemeral"));

    let content = std::fs::read_to_string(temp_dir.path().join("Ephemeral.log"))
        .expect("Failed to read log file");
    assert!(content.contains("kept"));
    assert!(!content.contains("discarded"));
}

#[test]
fn test_handler_dispatch_and_reset() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let console = Arc::new(MemoryConsole::default());
    let registry = LoggerRegistry::with_console(Arc::clone(&console) as Arc<dyn ConsoleBridge>);

    // No handler installed: output goes to the console bridge.
    registry.log_formatted(LogLevel::Info, None, "to console");
    assert!(console.take().iter().any(|l| l.contains("to console")));

    let log_path = temp_dir.path().join("dispatch.txt");
    let handler = FileLogHandler::new(
        &log_path,
        Arc::clone(&console) as Arc<dyn ConsoleBridge>,
        false,
    )
    .expect("Failed to create handler");
    registry.set_handler(Arc::new(handler));
    assert!(registry.current_handler().is_some());

    registry.log_formatted(LogLevel::Warning, Some("Net"), "to file");
    let content = wait_for(&log_path, "to file");
    assert!(content.contains("[WARNING][Net] to file"));
    // Mirroring disabled: nothing reached the console.
    assert!(console.take().is_empty());

    registry.reset_handler();
    assert!(registry.current_handler().is_none());
    registry.log_formatted(LogLevel::Info, None, "back to console");
    assert!(console.take().iter().any(|l| l.contains("back to console")));
}

#[test]
fn test_handler_console_mirroring() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let console = Arc::new(MemoryConsole::default());

    let log_path = temp_dir.path().join("mirror.txt");
    let handler = FileLogHandler::new(
        &log_path,
        Arc::clone(&console) as Arc<dyn ConsoleBridge>,
        true,
    )
    .expect("Failed to create handler");

    handler.log_formatted(LogLevel::Error, Some("Disk"), "mirrored line");
    let mirrored = console.take();
    assert!(mirrored.iter().any(|l| l.contains("mirrored line")));

    handler.set_console_output(false);
    handler.log_formatted(LogLevel::Error, Some("Disk"), "file only");
    assert!(console.take().is_empty());

    wait_for(&log_path, "file only");
    handler.cleanup();
}

#[test]
fn test_invalid_handler_path_falls_back_with_warning() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let console = Arc::new(MemoryConsole::default());

    let bad_path = temp_dir.path().join("z".repeat(MAX_PATH_LENGTH + 1));
    let handler = FileLogHandler::create(
        Some(bad_path),
        temp_dir.path(),
        Arc::clone(&console) as Arc<dyn ConsoleBridge>,
        false,
    )
    .expect("Fallback path should succeed");

    // Exactly one warning about the failed custom path.
    let warnings: Vec<String> = console
        .take()
        .into_iter()
        .filter(|l| l.contains("Falling back to default path"))
        .collect();
    assert_eq!(warnings.len(), 1);

    let name = handler
        .path()
        .file_name()
        .expect("handler path has a file name")
        .to_string_lossy()
        .to_string();
    assert!(name.starts_with("log_") && name.ends_with(".txt"));
    handler.cleanup();
}

#[test]
fn test_conditional_debug_forwarding() {
    let console = Arc::new(MemoryConsole::default());
    let registry = LoggerRegistry::with_console(Arc::clone(&console) as Arc<dyn ConsoleBridge>);

    registry.log_conditional_debug("hidden");
    assert!(console.take().is_empty());

    registry.set_debug_enabled(true);
    registry.log_conditional_debug("shown");
    registry.log_conditional_debug_warning("shown warning");
    registry.log_conditional_debug_error("shown error");

    let lines = console.take();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].contains("shown"));
    assert!(lines[1].contains("[WARNING]"));
    assert!(lines[2].contains("[ERROR]"));
}

#[test]
fn test_registry_exception_dispatch() {
    let console = Arc::new(MemoryConsole::default());
    let registry = LoggerRegistry::with_console(Arc::clone(&console) as Arc<dyn ConsoleBridge>);

    let error = std::io::Error::new(std::io::ErrorKind::Other, "bus fault");
    registry.log_exception(&error, Some("Kernel"));

    let lines = console.take();
    assert!(lines.iter().any(|l| l.contains("Exception: bus fault")));
}

#[test]
fn test_injected_logger_implementation() {
    // A registered implementation other than the default file logger.
    #[derive(Default)]
    struct CountingLogger {
        count: Mutex<u32>,
        initialized: Mutex<bool>,
    }

    impl DiagnosticsLog for CountingLogger {
        fn initialize(&self, _source: &str, _directory: &Path) -> diagnostics_logger::Result<()> {
            *self.initialized.lock().unwrap() = true;
            Ok(())
        }
        fn log(&self, _message: &str) {
            *self.count.lock().unwrap() += 1;
        }
        fn log_warning(&self, message: &str) {
            self.log(message);
        }
        fn log_error(&self, message: &str) {
            self.log(message);
        }
        fn log_exception(&self, _error: &(dyn Error + 'static)) {
            self.log("exception");
        }
        fn assert(&self, _condition: bool, _message: &str) {}
        fn assert_or_fail(&self, condition: bool, message: &str) -> diagnostics_logger::Result<()> {
            if condition {
                Ok(())
            } else {
                Err(LoggerError::assertion(message))
            }
        }
        fn flush(&self) {}
        fn cleanup(&self) {
            *self.initialized.lock().unwrap() = false;
        }
        fn is_initialized(&self) -> bool {
            *self.initialized.lock().unwrap()
        }
    }

    let registry = LoggerRegistry::new();
    let counting = Arc::new(CountingLogger::default());
    let logger = registry
        .create_diagnostics_logger_with("Counter", None, Arc::clone(&counting) as _)
        .expect("Failed to register injected logger");

    logger.log("one");
    logger.log("two");
    assert_eq!(*counting.count.lock().unwrap(), 2);

    registry.remove_diagnostics_logger("Counter");
    assert!(!counting.is_initialized());
}
