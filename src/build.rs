use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Overall or per-phase status reported by CodeBuild.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BuildStatus {
    InProgress,
    Succeeded,
    Failed,
    Fault,
    Stopped,
    TimedOut,
    /// Any value the provider returns outside the documented set.
    #[serde(other)]
    Unknown,
}

impl BuildStatus {
    pub fn from_wire(value: &str) -> Self {
        match value {
            "IN_PROGRESS" => Self::InProgress,
            "SUCCEEDED" => Self::Succeeded,
            "FAILED" => Self::Failed,
            "FAULT" => Self::Fault,
            "STOPPED" => Self::Stopped,
            "TIMED_OUT" => Self::TimedOut,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::InProgress => "IN_PROGRESS",
            Self::Succeeded => "SUCCEEDED",
            Self::Failed => "FAILED",
            Self::Fault => "FAULT",
            Self::Stopped => "STOPPED",
            Self::TimedOut => "TIMED_OUT",
            Self::Unknown => "UNKNOWN",
        }
    }

    /// A build in a terminal status will not progress any further.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            Self::Succeeded | Self::Failed | Self::Fault | Self::Stopped | Self::TimedOut
        )
    }

    /// Terminal outcomes other than success.
    pub fn is_unexpected_outcome(self) -> bool {
        self.is_terminal() && self != Self::Succeeded
    }
}

impl fmt::Display for BuildStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The ordered CodeBuild phase vocabulary.
///
/// Declaration order is lifecycle order, so the derived `Ord` sorts phases the
/// way CodeBuild runs them. Names outside the vocabulary sort last.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PhaseType {
    Submitted,
    Queued,
    Provisioning,
    DownloadSource,
    Install,
    PreBuild,
    Build,
    PostBuild,
    UploadArtifacts,
    Finalizing,
    Completed,
    Unknown(String),
}

impl PhaseType {
    pub fn from_wire(value: &str) -> Self {
        match value {
            "SUBMITTED" => Self::Submitted,
            "QUEUED" => Self::Queued,
            "PROVISIONING" => Self::Provisioning,
            "DOWNLOAD_SOURCE" => Self::DownloadSource,
            "INSTALL" => Self::Install,
            "PRE_BUILD" => Self::PreBuild,
            "BUILD" => Self::Build,
            "POST_BUILD" => Self::PostBuild,
            "UPLOAD_ARTIFACTS" => Self::UploadArtifacts,
            "FINALIZING" => Self::Finalizing,
            "COMPLETED" => Self::Completed,
            other => Self::Unknown(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Submitted => "SUBMITTED",
            Self::Queued => "QUEUED",
            Self::Provisioning => "PROVISIONING",
            Self::DownloadSource => "DOWNLOAD_SOURCE",
            Self::Install => "INSTALL",
            Self::PreBuild => "PRE_BUILD",
            Self::Build => "BUILD",
            Self::PostBuild => "POST_BUILD",
            Self::UploadArtifacts => "UPLOAD_ARTIFACTS",
            Self::Finalizing => "FINALIZING",
            Self::Completed => "COMPLETED",
            Self::Unknown(name) => name,
        }
    }

    /// The last entry of the vocabulary.
    pub fn is_final(&self) -> bool {
        *self == Self::Completed
    }
}

impl fmt::Display for PhaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One phase of a build as reported in a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseRecord {
    pub name: PhaseType,
    /// `None` while the phase is pending
    pub phase_status: Option<BuildStatus>,
    pub started_at: Option<DateTime<Utc>>,
    pub ended_at: Option<DateTime<Utc>>,
    pub duration_secs: Option<u64>,
}

/// The provider's view of a build at one point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildSnapshot {
    /// `<project-name>:<uuid>`
    pub build_id: String,
    pub project_name: String,
    pub status: BuildStatus,
    pub current_phase: Option<PhaseType>,
    /// Sorted in vocabulary order
    pub phases: Vec<PhaseRecord>,
}

impl BuildSnapshot {
    pub fn phase(&self, name: &PhaseType) -> Option<&PhaseRecord> {
        self.phases.iter().find(|p| &p.name == name)
    }
}
