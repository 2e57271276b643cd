use chrono::{DateTime, Utc};
use log::{debug, warn};
use serde::Deserialize;

use crate::build::{BuildSnapshot, BuildStatus, PhaseRecord, PhaseType};

/// Output of `aws codebuild batch-get-builds`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchGetBuildsResponse {
    #[serde(default)]
    pub builds: Vec<CodeBuildBuild>,
    #[serde(default)]
    pub builds_not_found: Vec<String>,
}

/// A single build as returned by CodeBuild.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeBuildBuild {
    /// Build identifier (`<project-name>:<uuid>`)
    pub id: String,
    pub project_name: Option<String>,
    pub build_status: Option<String>,
    pub current_phase: Option<String>,
    #[serde(default)]
    pub phases: Vec<CodeBuildPhase>,
}

/// One entry of a build's `phases` array.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeBuildPhase {
    pub phase_type: String,
    pub phase_status: Option<String>,
    pub start_time: Option<Timestamp>,
    pub end_time: Option<Timestamp>,
    pub duration_in_seconds: Option<u64>,
}

/// AWS CLI v1 prints epoch seconds, v2 prints ISO 8601 strings.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum Timestamp {
    Epoch(f64),
    Text(String),
}

impl Timestamp {
    pub fn to_utc(&self) -> Option<DateTime<Utc>> {
        let parsed = match self {
            #[allow(clippy::cast_possible_truncation)]
            Self::Epoch(secs) => DateTime::from_timestamp_millis((secs * 1000.0).round() as i64),
            Self::Text(text) => DateTime::parse_from_rfc3339(text)
                .ok()
                .map(|dt| dt.with_timezone(&Utc)),
        };

        if parsed.is_none() {
            debug!("Ignoring unparseable timestamp: {self:?}");
        }
        parsed
    }
}

impl CodeBuildBuild {
    /// Converts the wire representation into the monitor's data model.
    ///
    /// Unknown statuses and phase names are kept as sentinels rather than rejected.
    pub fn into_snapshot(self) -> BuildSnapshot {
        let status = self
            .build_status
            .as_deref()
            .map_or(BuildStatus::Unknown, BuildStatus::from_wire);

        if status == BuildStatus::Unknown {
            warn!(
                "Build {} reported unrecognised status {:?}",
                self.id, self.build_status
            );
        }

        let project_name = self.project_name.unwrap_or_else(|| {
            self.id
                .split_once(':')
                .map_or_else(|| self.id.clone(), |(project, _)| project.to_string())
        });

        let mut phases: Vec<PhaseRecord> = self
            .phases
            .into_iter()
            .map(|phase| convert_phase(phase, status))
            .collect();
        phases.sort_by(|a, b| a.name.cmp(&b.name));

        BuildSnapshot {
            build_id: self.id,
            project_name,
            status,
            current_phase: self.current_phase.as_deref().map(PhaseType::from_wire),
            phases,
        }
    }
}

fn convert_phase(phase: CodeBuildPhase, build_status: BuildStatus) -> PhaseRecord {
    let name = PhaseType::from_wire(&phase.phase_type);
    if let PhaseType::Unknown(raw) = &name {
        warn!("Unrecognised build phase '{raw}', keeping it as unknown");
    }

    let mut phase_status = phase.phase_status.as_deref().map(BuildStatus::from_wire);

    // CodeBuild leaves COMPLETED without a status even after a successful build
    if name.is_final() && phase_status.is_none() && build_status == BuildStatus::Succeeded {
        phase_status = Some(BuildStatus::Succeeded);
    }

    PhaseRecord {
        name,
        phase_status,
        started_at: phase.start_time.as_ref().and_then(Timestamp::to_utc),
        ended_at: phase.end_time.as_ref().and_then(Timestamp::to_utc),
        duration_secs: phase.duration_in_seconds,
    }
}
