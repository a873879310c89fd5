//! Error types for the diagnostics logger system

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// Generic IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// IO error with context
    #[error("IO error while {operation}: {message}")]
    IoOperation {
        operation: String,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Invalid or unwritable path/directory configuration
    #[error("Invalid configuration for '{path}': {message}")]
    Configuration { path: String, message: String },

    /// Registry already holds a logger under this system name
    #[error("Logger for system '{system}' already exists")]
    DuplicateName { system: String },

    /// Raised by `assert_or_fail` when the condition is false
    #[error("Assertion failed: {message}")]
    AssertionFailed { message: String },

    /// Logger used before `initialize` opened its sink
    #[error("Logger '{source_name}' is not initialized")]
    NotInitialized { source_name: String },
}

impl LoggerError {
    /// Create an IO operation error with context
    pub fn io_operation(
        operation: impl Into<String>,
        message: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        LoggerError::IoOperation {
            operation: operation.into(),
            message: message.into(),
            source,
        }
    }

    /// Create a configuration error for a path
    pub fn config(path: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::Configuration {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a duplicate registration error
    pub fn duplicate_name(system: impl Into<String>) -> Self {
        LoggerError::DuplicateName {
            system: system.into(),
        }
    }

    /// Create an assertion failure error
    pub fn assertion(message: impl Into<String>) -> Self {
        LoggerError::AssertionFailed {
            message: message.into(),
        }
    }

    /// Create a not-initialized error
    pub fn not_initialized(source_name: impl Into<String>) -> Self {
        LoggerError::NotInitialized {
            source_name: source_name.into(),
        }
    }
}
