use std::process::Stdio;

use log::debug;
use tokio::process::Command;

use crate::error::NotifyError;

use super::Notifier;

/// Desktop notifications through the platform's notification command.
///
/// macOS uses `osascript`; every other platform goes through `notify-send`.
#[derive(Debug, Clone, Default)]
pub struct DesktopNotifier;

impl DesktopNotifier {
    pub fn new() -> Self {
        Self
    }
}

impl Notifier for DesktopNotifier {
    async fn notify(&self, title: &str, body: &str) -> Result<(), NotifyError> {
        let (program, args) = notification_command(title, body);
        debug!("Sending desktop notification via {program}");

        let status = Command::new(program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .status()
            .await
            .map_err(|e| NotifyError::Spawn {
                command: program.to_string(),
                reason: e.to_string(),
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(NotifyError::Failed {
                command: program.to_string(),
                status: status.code().unwrap_or(-1),
            })
        }
    }
}

fn notification_command(title: &str, body: &str) -> (&'static str, Vec<String>) {
    if cfg!(target_os = "macos") {
        let script = format!(
            "display notification \"{}\" with title \"{}\"",
            escape_applescript(body),
            escape_applescript(title)
        );
        ("osascript", vec!["-e".to_string(), script])
    } else {
        ("notify-send", vec![title.to_string(), body.to_string()])
    }
}

fn escape_applescript(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}
