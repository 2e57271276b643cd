use std::fmt::Write as _;
use std::time::Duration;

use console::Term;
use log::warn;

use crate::monitor::{MonitorPhase, MonitorState, StopReason};

use super::styling::{status_emoji, Theme};
use super::tables::{event_table, phase_table};
use super::Renderer;

const BUILD_ID_DISPLAY_LEN: usize = 20;

/// Static facts about the run that the dashboard prints alongside the state.
#[derive(Debug, Clone)]
pub struct DashboardContext {
    pub build_id: String,
    pub interval: Duration,
}

/// Full-screen terminal view, redrawn after every monitor cycle.
pub struct Dashboard {
    term: Term,
    theme: Theme,
    context: DashboardContext,
}

impl Dashboard {
    pub fn new(theme: Theme, context: DashboardContext) -> Self {
        Self {
            term: Term::stdout(),
            theme,
            context,
        }
    }
}

impl Renderer for Dashboard {
    fn on_state_updated(&mut self, state: &MonitorState) {
        let frame = render_dashboard(state, &self.theme, &self.context);

        // Redirected output gets appended frames instead of a redraw
        let result = if self.term.is_term() {
            self.term
                .clear_screen()
                .and_then(|()| self.term.write_str(&frame))
        } else {
            self.term.write_line(&frame)
        };

        if let Err(e) = result {
            warn!("Failed to draw dashboard: {e}");
        }
    }
}

/// Renders one dashboard frame.
pub fn render_dashboard(state: &MonitorState, theme: &Theme, context: &DashboardContext) -> String {
    let mut output = String::new();

    let project = state
        .last_snapshot
        .as_ref()
        .map_or("Unknown", |s| s.project_name.as_str());

    let _ = writeln!(
        output,
        "{} {} {} {} {}",
        theme.cyan_bold("🔍 BuildWatch"),
        theme.dim("| Build:"),
        theme.dim(truncate_build_id(&context.build_id)),
        theme.dim("| Project:"),
        theme.bright_yellow(project).bold()
    );

    match &state.last_snapshot {
        Some(snapshot) => {
            let _ = write!(
                output,
                "Status: {} {}",
                status_emoji(snapshot.status),
                theme.status(snapshot.status)
            );
            if let Some(phase) = &snapshot.current_phase {
                let _ = write!(output, "  {}", theme.dim(format!("(current phase: {phase})")));
            }
            let _ = writeln!(output);
        }
        None => {
            let _ = writeln!(output, "Status: {}", theme.dim("waiting for first response"));
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "{}", theme.bright("Build Phases:").underlined());
    let phases = state
        .last_snapshot
        .as_ref()
        .map_or(&[][..], |s| s.phases.as_slice());
    let _ = writeln!(output, "{}", phase_table(phases, theme));

    let _ = writeln!(output);
    let _ = writeln!(output, "{}", theme.bright("Recent Events:").underlined());
    let _ = writeln!(
        output,
        "{}",
        event_table(state.event_log.recent(theme.recent_events), theme)
    );

    let _ = writeln!(output, "{}", footer(state, theme, context));
    output
}

fn footer(state: &MonitorState, theme: &Theme, context: &DashboardContext) -> String {
    match &state.phase {
        MonitorPhase::Stopped(StopReason::Fatal { message }) => {
            theme.bright_red(format!("Stopped: {message}")).to_string()
        }
        MonitorPhase::Stopped(StopReason::RetriesExhausted { attempts, .. }) => theme
            .bright_red(format!("Stopped after {attempts} consecutive failed fetches"))
            .to_string(),
        MonitorPhase::Stopped(StopReason::Cancelled) => {
            theme.bright_yellow("Monitoring stopped by user.").to_string()
        }
        MonitorPhase::Terminal(status)
        | MonitorPhase::Stopped(StopReason::BuildFinished { status }) => {
            theme.bright(format!("Build {status}!")).bold().to_string()
        }
        _ => {
            let mut line = format!(
                "Press Ctrl+C to quit | Interval: {}s | Polls: {}",
                context.interval.as_secs(),
                state.poll_count
            );
            if state.consecutive_error_count > 0 {
                let _ = write!(
                    line,
                    " | Failed fetches in a row: {}",
                    state.consecutive_error_count
                );
            }
            theme.dim(line).to_string()
        }
    }
}

fn truncate_build_id(build_id: &str) -> String {
    if build_id.chars().count() > BUILD_ID_DISPLAY_LEN {
        let head: String = build_id.chars().take(BUILD_ID_DISPLAY_LEN).collect();
        format!("{head}...")
    } else {
        build_id.to_string()
    }
}
