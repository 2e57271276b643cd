use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Color as TableColor, ContentArrangement, Table};

use crate::build::{BuildStatus, PhaseRecord};
use crate::monitor::{Event, EventLevel};

use super::styling::Theme;

/// Table and cell creation helpers
pub fn create_table(theme: &Theme) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    if theme.colors {
        table.enforce_styling();
    } else {
        table.force_no_tty();
    }
    table
}

pub fn phase_table(phases: &[PhaseRecord], theme: &Theme) -> Table {
    let mut table = create_table(theme);
    table.set_header(cyan_header(&["Phase", "Status", "Duration"]));

    if phases.is_empty() {
        table.add_row(vec![Cell::new("No phase information available").fg(TableColor::DarkGrey)]);
        return table;
    }

    for phase in phases {
        let (icon, label) = match phase.phase_status {
            Some(status) => (phase_icon(status), status.as_str()),
            None => ("○", "PENDING"),
        };
        let color = phase_color(phase.phase_status);
        let duration = phase
            .duration_secs
            .map(format_duration)
            .unwrap_or_default();

        table.add_row(vec![
            Cell::new(format!("{icon} {}", phase.name)),
            Cell::new(label).fg(color),
            Cell::new(duration),
        ]);
    }
    table
}

pub fn event_table<'a>(events: impl Iterator<Item = &'a Event>, theme: &Theme) -> Table {
    let mut table = create_table(theme);
    table.set_header(cyan_header(&["Time", "Event"]));

    let mut empty = true;
    for event in events {
        empty = false;
        let mut message = Cell::new(&event.message);
        message = match event.level {
            EventLevel::Error => message.fg(TableColor::Red),
            EventLevel::Warning => message.fg(TableColor::Yellow),
            EventLevel::Info if event.significant => message.fg(TableColor::White),
            EventLevel::Info => message,
        };
        table.add_row(vec![
            Cell::new(event.timestamp.format("%H:%M:%S")).fg(TableColor::DarkCyan),
            message,
        ]);
    }

    if empty {
        table.add_row(vec![Cell::new("No events yet").fg(TableColor::DarkGrey)]);
    }
    table
}

fn cyan_header(labels: &[&str]) -> Vec<Cell> {
    labels
        .iter()
        .map(|label| Cell::new(*label).fg(TableColor::Cyan))
        .collect()
}

fn phase_icon(status: BuildStatus) -> &'static str {
    match status {
        BuildStatus::Succeeded => "✓",
        BuildStatus::InProgress => "⏳",
        BuildStatus::Stopped => "⏸",
        BuildStatus::Failed | BuildStatus::Fault | BuildStatus::TimedOut => "✗",
        BuildStatus::Unknown => "?",
    }
}

fn phase_color(status: Option<BuildStatus>) -> TableColor {
    match status {
        Some(BuildStatus::Succeeded) => TableColor::Green,
        Some(BuildStatus::InProgress | BuildStatus::Stopped) => TableColor::Yellow,
        Some(BuildStatus::Failed | BuildStatus::Fault | BuildStatus::TimedOut) => TableColor::Red,
        Some(BuildStatus::Unknown) | None => TableColor::DarkGrey,
    }
}

pub fn format_duration(secs: u64) -> String {
    if secs >= 60 {
        format!("{}m {:02}s", secs / 60, secs % 60)
    } else {
        format!("{secs}s")
    }
}
