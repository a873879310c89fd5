//! Console bridge capability
//!
//! The delivery core forwards console output through this trait when
//! mirroring is enabled; it never depends on console behavior for
//! correctness.

use crate::core::LogLevel;
use colored::Colorize;
use std::error::Error;

/// Capability interface for the host application's console output.
pub trait ConsoleBridge: Send + Sync {
    /// Write a formatted line at the given level.
    fn write_formatted(&self, level: LogLevel, context: Option<&str>, message: &str);

    /// Write an exception with its source chain.
    fn write_exception(&self, error: &(dyn Error + 'static), context: Option<&str>);
}

/// Default bridge writing to the process stdout/stderr.
///
/// Error and Critical lines go to stderr, everything else to stdout.
pub struct StandardConsole {
    use_colors: bool,
}

impl StandardConsole {
    pub fn new() -> Self {
        Self { use_colors: true }
    }

    pub fn with_colors(use_colors: bool) -> Self {
        Self { use_colors }
    }

    fn level_tag(&self, level: LogLevel) -> String {
        if self.use_colors {
            format!("{:8}", level.to_str())
                .color(level.color_code())
                .to_string()
        } else {
            format!("{:8}", level.to_str())
        }
    }
}

impl Default for StandardConsole {
    fn default() -> Self {
        Self::new()
    }
}

impl ConsoleBridge for StandardConsole {
    fn write_formatted(&self, level: LogLevel, context: Option<&str>, message: &str) {
        let context_tag = context.map(|c| format!("[{}] ", c)).unwrap_or_default();
        let output = format!("[{}] {}{}", self.level_tag(level), context_tag, message);

        match level {
            LogLevel::Error | LogLevel::Critical => eprintln!("{}", output),
            _ => println!("{}", output),
        }
    }

    fn write_exception(&self, error: &(dyn Error + 'static), context: Option<&str>) {
        let mut message = format!("Exception: {}", error);
        let mut source = error.source();
        while let Some(cause) = source {
            message.push_str(&format!("\n  caused by: {}", cause));
            source = cause.source();
        }
        self.write_formatted(LogLevel::Critical, context, &message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_console_does_not_panic() {
        let console = StandardConsole::with_colors(false);
        console.write_formatted(LogLevel::Info, None, "plain message");
        console.write_formatted(LogLevel::Error, Some("Net"), "refused");

        let error = std::io::Error::new(std::io::ErrorKind::Other, "boom");
        console.write_exception(&error, Some("Disk"));
    }
}
