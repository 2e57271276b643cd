use serde::Serialize;

use crate::build::{BuildSnapshot, BuildStatus};

use super::event_log::EventLog;

/// Where the monitor loop currently is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "detail", rename_all = "snake_case")]
pub enum MonitorPhase {
    Starting,
    Polling,
    /// Sleeping until the next poll
    Waiting,
    /// A terminal build status was observed; final render pending
    Terminal(BuildStatus),
    Stopped(StopReason),
}

/// Why the monitor stopped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum StopReason {
    BuildFinished { status: BuildStatus },
    Cancelled,
    Fatal { message: String },
    RetriesExhausted { attempts: u32, last_error: String },
}

impl StopReason {
    /// Process exit code for this outcome.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::BuildFinished { .. } | Self::Cancelled => 0,
            Self::Fatal { .. } | Self::RetriesExhausted { .. } => 1,
        }
    }
}

/// Everything the monitor knows about the watched build.
///
/// Owned by the monitor loop. Renderers only ever see it behind a shared
/// reference.
#[derive(Debug, Clone, Serialize)]
pub struct MonitorState {
    pub last_snapshot: Option<BuildSnapshot>,
    pub event_log: EventLog,
    pub poll_count: u64,
    pub consecutive_error_count: u32,
    pub terminal: bool,
    pub phase: MonitorPhase,
}

impl MonitorState {
    pub fn new(history_capacity: usize) -> Self {
        Self {
            last_snapshot: None,
            event_log: EventLog::new(history_capacity),
            poll_count: 0,
            consecutive_error_count: 0,
            terminal: false,
            phase: MonitorPhase::Starting,
        }
    }
}
