//! Core types: events, levels, errors, timestamps, and the registry

pub mod error;
pub mod log_event;
pub mod log_level;
pub mod registry;
pub mod timestamp;

pub use error::{LoggerError, Result};
pub use log_event::LogEvent;
pub use log_level::LogLevel;
pub use registry::LoggerRegistry;
pub use timestamp::TimestampFormat;
