//! Log event structure

use super::log_level::LogLevel;
use super::timestamp::TimestampFormat;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single log event, immutable once constructed.
///
/// Produced by any caller thread and consumed exactly once by whichever
/// sink or writer owns the destination stream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEvent {
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_context: Option<String>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack_trace: Option<String>,
}

impl LogEvent {
    /// Sanitize a log message to prevent log injection attacks
    ///
    /// Replaces newlines, carriage returns, and tabs with escape sequences
    /// so one call always produces one line in the destination file.
    fn sanitize_message(message: &str) -> String {
        message
            .replace('\n', "\\n")
            .replace('\r', "\\r")
            .replace('\t', "\\t")
    }

    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            level,
            source_context: None,
            message: Self::sanitize_message(&message.into()),
            stack_trace: None,
        }
    }

    pub fn with_source_context(mut self, context: impl Into<String>) -> Self {
        self.source_context = Some(context.into());
        self
    }

    /// Attach stack-trace material. Kept verbatim, including newlines;
    /// the trace is rendered on its own lines under a `StackTrace:` heading.
    pub fn with_stack_trace(mut self, trace: impl Into<String>) -> Self {
        self.stack_trace = Some(trace.into());
        self
    }

    /// Render the event as a log line (with trailing newline).
    pub fn format_line(&self, timestamp_format: &TimestampFormat) -> String {
        let mut output = format!(
            "[{}] [{:8}] ",
            timestamp_format.format(&self.timestamp),
            self.level.to_str()
        );

        if let Some(ref context) = self.source_context {
            output.push_str(&format!("[{}] ", context));
        }

        output.push_str(&self.message);

        if let Some(ref trace) = self.stack_trace {
            output.push_str("\nStackTrace: ");
            output.push_str(trace);
        }

        output.push('\n');
        output
    }
}
