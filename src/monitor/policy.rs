use std::time::Duration;

use chrono::Local;
use log::warn;

use crate::config::NotifyMode;
use crate::error::NotifyError;
use crate::notifier::Notifier;

use super::event::Event;

/// Upper bound for one notification delivery.
pub const NOTIFY_TIMEOUT: Duration = Duration::from_secs(5);

/// Sends desktop alerts for the significant events in `events`.
///
/// Terminal delivery needs no action here since the renderer already shows
/// the event log. Each delivery is bounded by [`NOTIFY_TIMEOUT`]. Returns one
/// warning event per failed or expired delivery; failures are not retried.
pub async fn dispatch<N: Notifier>(
    events: &[Event],
    mode: NotifyMode,
    notifier: &N,
    title: &str,
) -> Vec<Event> {
    if !mode.includes_desktop() {
        return Vec::new();
    }

    let mut failures = Vec::new();
    for event in events.iter().filter(|e| e.significant) {
        let delivery =
            tokio::time::timeout(NOTIFY_TIMEOUT, notifier.notify(title, &event.message))
                .await
                .unwrap_or(Err(NotifyError::TimedOut(NOTIFY_TIMEOUT)));
        if let Err(e) = delivery {
            warn!("Desktop notification failed: {e}");
            failures.push(Event::warning(
                Local::now(),
                format!("Desktop notification failed: {e}"),
            ));
        }
    }
    failures
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingNotifier {
        sent: Mutex<Vec<(String, String)>>,
        fail: bool,
    }

    impl Notifier for RecordingNotifier {
        async fn notify(&self, title: &str, body: &str) -> Result<(), NotifyError> {
            self.sent
                .lock()
                .unwrap()
                .push((title.to_string(), body.to_string()));
            if self.fail {
                Err(NotifyError::Spawn {
                    command: "notify-send".into(),
                    reason: "No such file or directory".into(),
                })
            } else {
                Ok(())
            }
        }
    }

    struct HangingNotifier;

    impl Notifier for HangingNotifier {
        async fn notify(&self, _title: &str, _body: &str) -> Result<(), NotifyError> {
            std::future::pending().await
        }
    }

    fn events() -> Vec<Event> {
        let now = Local::now();
        vec![
            Event::info(now, "BUILD → SUCCEEDED", false),
            Event::info(now, "Status changed to SUCCEEDED", true),
            Event::info(now, "COMPLETED → SUCCEEDED", true),
        ]
    }

    #[tokio::test]
    async fn terminal_mode_never_notifies() {
        let notifier = RecordingNotifier::default();
        let failures = dispatch(&events(), NotifyMode::Terminal, &notifier, "BuildWatch").await;

        assert!(failures.is_empty());
        assert!(notifier.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn desktop_mode_sends_significant_events_in_order() {
        let notifier = RecordingNotifier::default();
        dispatch(&events(), NotifyMode::Desktop, &notifier, "BuildWatch: web").await;

        let sent = notifier.sent.lock().unwrap();
        assert_eq!(
            *sent,
            vec![
                (
                    "BuildWatch: web".to_string(),
                    "Status changed to SUCCEEDED".to_string()
                ),
                (
                    "BuildWatch: web".to_string(),
                    "COMPLETED → SUCCEEDED".to_string()
                ),
            ]
        );
    }

    #[tokio::test]
    async fn both_mode_includes_desktop() {
        let notifier = RecordingNotifier::default();
        dispatch(&events(), NotifyMode::Both, &notifier, "BuildWatch").await;
        assert_eq!(notifier.sent.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn failures_become_warning_events_without_retry() {
        let notifier = RecordingNotifier {
            fail: true,
            ..Default::default()
        };
        let failures = dispatch(&events(), NotifyMode::Both, &notifier, "BuildWatch").await;

        assert_eq!(notifier.sent.lock().unwrap().len(), 2);
        assert_eq!(failures.len(), 2);
        assert!(failures
            .iter()
            .all(|e| e.message.starts_with("Desktop notification failed:") && !e.significant));
    }

    #[tokio::test(start_paused = true)]
    async fn hung_delivery_times_out_as_failure() {
        let started = tokio::time::Instant::now();
        let failures =
            dispatch(&events(), NotifyMode::Desktop, &HangingNotifier, "BuildWatch").await;

        assert_eq!(failures.len(), 2);
        assert!(failures.iter().all(|e| e.message
            == "Desktop notification failed: notification not delivered within 5s"));
        assert!(started.elapsed() >= NOTIFY_TIMEOUT * 2);
    }
}
