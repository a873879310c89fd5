//! Sink implementations

pub mod console;
pub mod stream;

pub use console::{ConsoleBridge, StandardConsole};
pub use stream::{StreamSink, MAX_PATH_LENGTH};
