use chrono::{DateTime, Local};

use crate::build::{BuildSnapshot, BuildStatus, PhaseRecord};

use super::event::Event;

/// Compares two snapshots and describes what changed.
///
/// Without a previous snapshot only the "started monitoring" event is emitted.
/// Otherwise a status change comes first, followed by phase changes in
/// vocabulary order. A phase only produces an event when it carries a status
/// that differs from the previous snapshot, so a phase dropping back to
/// pending is ignored.
///
/// The function is pure: `now` is the timestamp stamped on every event.
pub fn diff(
    previous: Option<&BuildSnapshot>,
    current: &BuildSnapshot,
    now: DateTime<Local>,
) -> Vec<Event> {
    let Some(previous) = previous else {
        return vec![Event::info(
            now,
            format!("Started monitoring — {}", current.status),
            current.status.is_terminal(),
        )];
    };

    let mut events = Vec::new();

    if previous.status != current.status {
        events.push(Event::info(
            now,
            format!("Status changed to {}", current.status),
            true,
        ));
    }

    for phase in &current.phases {
        let Some(status) = phase.phase_status else {
            continue;
        };

        let before = previous
            .phase(&phase.name)
            .and_then(|p| p.phase_status);

        if before != Some(status) {
            events.push(Event::info(
                now,
                format!("{} → {}", phase.name, status),
                is_significant_phase_change(phase, status),
            ));
        }
    }

    events
}

fn is_significant_phase_change(phase: &PhaseRecord, status: BuildStatus) -> bool {
    status.is_unexpected_outcome() || (phase.name.is_final() && status == BuildStatus::Succeeded)
}
