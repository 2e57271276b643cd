mod dashboard;
mod styling;
mod tables;

pub use dashboard::{Dashboard, DashboardContext};
pub use styling::{Theme, DEFAULT_RECENT_EVENTS};

use crate::monitor::{MonitorState, StopReason};

/// Receives the monitor's state once per completed cycle.
pub trait Renderer {
    fn on_state_updated(&mut self, state: &MonitorState);
}

/// Prints the `BuildWatch` banner to stderr.
///
/// Displays the tool name, version, and the build being watched.
pub fn print_banner(theme: &Theme, build_id: &str) {
    eprintln!(
        r"
{} {}
  {}
",
        theme.cyan_bold("🔍 BuildWatch"),
        theme.dim(env!("CARGO_PKG_VERSION")),
        theme.dim(format!("Monitoring build: {build_id}"))
    );
}

/// Prints a one-line verdict once monitoring has ended.
pub fn print_outcome(theme: &Theme, reason: &StopReason) {
    let line = match reason {
        StopReason::BuildFinished { status } => {
            println!("\n{} {}!", theme.bright("Build").bold(), theme.status(*status));
            return;
        }
        StopReason::Cancelled => theme
            .bright_yellow("Monitoring stopped by user.")
            .to_string(),
        StopReason::Fatal { message } => theme.bright_red(format!("Error: {message}")).to_string(),
        StopReason::RetriesExhausted {
            attempts,
            last_error,
        } => theme
            .bright_red(format!(
                "Giving up after {attempts} consecutive failed fetches: {last_error}"
            ))
            .to_string(),
    };
    eprintln!("\n{line}");
}
