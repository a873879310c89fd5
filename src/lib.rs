//! # Diagnostics Logger
//!
//! A logging subsystem with named, independently-lifecycled diagnostics
//! loggers and a thread-safe asynchronous log delivery core.
//!
//! ## Features
//!
//! - **Named diagnostics loggers**: one file per system, threshold-driven
//!   flushing, assertion helpers, structured exception recording
//! - **Asynchronous delivery**: producers enqueue without blocking; one
//!   background writer drains the queue in FIFO order and recovers from
//!   I/O failures by reopening the stream
//! - **Registry**: at-most-one active logger per system name, safe
//!   creation and removal under concurrent access, process-wide teardown
//! - **Pluggable handlers**: file-backed or custom destinations behind a
//!   small capability trait, with optional console mirroring

pub mod core;
pub mod diagnostics;
pub mod handlers;
pub mod macros;
pub mod sinks;

pub mod prelude {
    pub use crate::core::{LogEvent, LogLevel, LoggerError, LoggerRegistry, Result, TimestampFormat};
    pub use crate::diagnostics::{DiagnosticsLog, DiagnosticsLogger, DEFAULT_FLUSH_THRESHOLD};
    pub use crate::handlers::{AsyncLogWriter, FileLogHandler, LogHandler, SHUTDOWN_JOIN_TIMEOUT};
    pub use crate::sinks::{ConsoleBridge, StandardConsole, StreamSink, MAX_PATH_LENGTH};
}

pub use crate::core::{LogEvent, LogLevel, LoggerError, LoggerRegistry, Result, TimestampFormat};
pub use crate::diagnostics::{DiagnosticsLog, DiagnosticsLogger, DEFAULT_FLUSH_THRESHOLD};
pub use crate::handlers::{AsyncLogWriter, FileLogHandler, LogHandler, SHUTDOWN_JOIN_TIMEOUT};
pub use crate::sinks::{ConsoleBridge, StandardConsole, StreamSink, MAX_PATH_LENGTH};
