//! Logging macros for ergonomic message formatting.
//!
//! Thin format-string wrappers over a [`DiagnosticsLog`](crate::DiagnosticsLog)
//! implementation, similar to `println!`.
//!
//! # Examples
//!
//! ```no_run
//! use diagnostics_logger::prelude::*;
//! use diagnostics_logger::{diag_log, diag_warn};
//!
//! let logger = DiagnosticsLogger::new();
//! logger.initialize("Net", std::path::Path::new("/tmp/logs")).unwrap();
//!
//! diag_log!(logger, "connection established");
//!
//! let retries = 3;
//! diag_warn!(logger, "retry {} of 5", retries);
//! ```

/// Log an info-level message with automatic formatting.
#[macro_export]
macro_rules! diag_log {
    ($logger:expr, $($arg:tt)+) => {
        $logger.log(&format!($($arg)+))
    };
}

/// Log a warning-level message with automatic formatting.
#[macro_export]
macro_rules! diag_warn {
    ($logger:expr, $($arg:tt)+) => {
        $logger.log_warning(&format!($($arg)+))
    };
}

/// Log an error-level message with automatic formatting.
#[macro_export]
macro_rules! diag_error {
    ($logger:expr, $($arg:tt)+) => {
        $logger.log_error(&format!($($arg)+))
    };
}
