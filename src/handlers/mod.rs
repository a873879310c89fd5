//! Log handler implementations

pub mod async_writer;
pub mod file;

pub use async_writer::{AsyncLogWriter, SHUTDOWN_JOIN_TIMEOUT};
pub use file::{FileLogHandler, LogHandler};
