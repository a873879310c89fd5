//! Timestamp formatting utilities

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Timestamp format options for rendered log lines
///
/// # Examples
///
/// ```
/// use diagnostics_logger::core::TimestampFormat;
/// use chrono::Utc;
///
/// let format = TimestampFormat::Iso8601;
/// let rendered = format.format(&Utc::now());
/// // "2025-01-08T10:30:45.123Z"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimestampFormat {
    /// ISO 8601 with milliseconds: `2025-01-08T10:30:45.123Z`
    #[default]
    Iso8601,

    /// Time of day with milliseconds: `10:30:45.123`
    HmsMillis,

    /// Custom strftime format
    Custom(String),
}

impl TimestampFormat {
    /// Format a `DateTime<Utc>` according to this format
    pub fn format(&self, timestamp: &DateTime<Utc>) -> String {
        match self {
            TimestampFormat::Iso8601 => {
                timestamp.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
            }
            TimestampFormat::HmsMillis => timestamp.format("%H:%M:%S%.3f").to_string(),
            TimestampFormat::Custom(fmt) => timestamp.format(fmt).to_string(),
        }
    }
}
