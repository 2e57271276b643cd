use chrono::{DateTime, Local};
use serde::Serialize;

/// Display weight of an event; it has no bearing on notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EventLevel {
    Info,
    Warning,
    Error,
}

/// One timestamped line of build history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Event {
    pub timestamp: DateTime<Local>,
    pub message: String,
    /// Whether the event warrants an out-of-band notification
    pub significant: bool,
    pub level: EventLevel,
}

impl Event {
    pub fn info(timestamp: DateTime<Local>, message: impl Into<String>, significant: bool) -> Self {
        Self {
            timestamp,
            message: message.into(),
            significant,
            level: EventLevel::Info,
        }
    }

    /// A recovered failure. Never notification-worthy.
    pub fn warning(timestamp: DateTime<Local>, message: impl Into<String>) -> Self {
        Self {
            timestamp,
            message: message.into(),
            significant: false,
            level: EventLevel::Warning,
        }
    }

    /// A failure that stops the monitor.
    pub fn fatal(timestamp: DateTime<Local>, message: impl Into<String>) -> Self {
        Self {
            timestamp,
            message: message.into(),
            significant: true,
            level: EventLevel::Error,
        }
    }
}
