//! The monitoring engine.
//!
//! One [`Monitor`] watches one build: it polls the status provider on a fixed
//! interval, diffs each snapshot against the previous one, records the
//! resulting events, dispatches notifications and hands the state to a
//! renderer after every cycle.

mod diff;
mod event;
mod event_log;
mod policy;
mod state;


pub use diff::diff;
pub use event::{Event, EventLevel};
pub use event_log::{EventLog, DEFAULT_HISTORY_CAPACITY};
pub use state::{MonitorPhase, MonitorState, StopReason};

use std::future::Future;
use std::time::Duration;

use chrono::Local;
use log::{error, info, warn};
use serde::Serialize;

use crate::build::BuildSnapshot;
use crate::config::NotifyMode;
use crate::error::FetchError;
use crate::notifier::Notifier;
use crate::output::Renderer;
use crate::providers::StatusProvider;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);
pub const DEFAULT_MAX_CONSECUTIVE_ERRORS: u32 = 5;

/// Everything the monitor needs to know about what to watch and how.
#[derive(Debug, Clone)]
pub struct MonitorSettings {
    pub build_id: String,
    pub interval: Duration,
    pub mode: NotifyMode,
    pub history_capacity: usize,
    /// Consecutive retryable failures tolerated before giving up
    pub max_consecutive_errors: u32,
}

impl MonitorSettings {
    pub fn new(build_id: impl Into<String>) -> Self {
        Self {
            build_id: build_id.into(),
            interval: DEFAULT_POLL_INTERVAL,
            mode: NotifyMode::default(),
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            max_consecutive_errors: DEFAULT_MAX_CONSECUTIVE_ERRORS,
        }
    }
}

/// Final result of a monitoring run.
#[derive(Debug, Clone, Serialize)]
pub struct MonitorReport {
    pub build_id: String,
    pub reason: StopReason,
    pub state: MonitorState,
}

/// Single-build polling state machine.
pub struct Monitor<P, N, R> {
    provider: P,
    notifier: N,
    renderer: R,
    settings: MonitorSettings,
    state: MonitorState,
}

impl<P, N, R> Monitor<P, N, R>
where
    P: StatusProvider,
    N: Notifier,
    R: Renderer,
{
    pub fn new(provider: P, notifier: N, renderer: R, settings: MonitorSettings) -> Self {
        let state = MonitorState::new(settings.history_capacity);
        Self {
            provider,
            notifier,
            renderer,
            settings,
            state,
        }
    }

    /// Polls until the build finishes, a fatal error occurs, or `shutdown`
    /// resolves while the monitor is waiting between polls.
    ///
    /// The renderer is called once at the end of every cycle, and once more
    /// after an operator cancellation.
    pub async fn run<F>(mut self, shutdown: F) -> MonitorReport
    where
        F: Future<Output = ()>,
    {
        let mut shutdown = std::pin::pin!(shutdown);
        info!(
            "Monitoring build {} every {}s",
            self.settings.build_id,
            self.settings.interval.as_secs()
        );

        loop {
            match self.poll_once().await {
                Some(StopReason::BuildFinished { status }) => {
                    info!("Build {} finished with {status}", self.settings.build_id);
                    self.state.phase = MonitorPhase::Terminal(status);
                    self.renderer.on_state_updated(&self.state);

                    let reason = StopReason::BuildFinished { status };
                    self.state.phase = MonitorPhase::Stopped(reason.clone());
                    return self.finish(reason);
                }
                Some(reason) => {
                    self.state.phase = MonitorPhase::Stopped(reason.clone());
                    self.renderer.on_state_updated(&self.state);
                    return self.finish(reason);
                }
                None => {
                    self.state.phase = MonitorPhase::Waiting;
                    self.renderer.on_state_updated(&self.state);
                }
            }

            tokio::select! {
                () = tokio::time::sleep(self.settings.interval) => {}
                () = &mut shutdown => {
                    info!("Shutdown requested, stopping monitor");
                    self.state
                        .event_log
                        .append([Event::info(Local::now(), "Monitoring stopped by operator", false)]);
                    self.state.phase = MonitorPhase::Stopped(StopReason::Cancelled);
                    self.renderer.on_state_updated(&self.state);
                    return self.finish(StopReason::Cancelled);
                }
            }
        }
    }

    /// Runs one fetch and applies its result. Returns a stop reason when the
    /// loop must not poll again.
    async fn poll_once(&mut self) -> Option<StopReason> {
        self.state.phase = MonitorPhase::Polling;
        self.state.poll_count += 1;

        let result = self.provider.fetch(&self.settings.build_id).await;
        match result {
            Ok(snapshot) => self.apply_snapshot(snapshot).await,
            Err(err) if err.is_fatal() => {
                error!("Fatal error fetching {}: {err}", self.settings.build_id);
                let event = Event::fatal(Local::now(), err.to_string());
                self.record(vec![event]).await;
                Some(StopReason::Fatal {
                    message: err.to_string(),
                })
            }
            Err(err) => self.apply_retryable_error(err).await,
        }
    }

    async fn apply_snapshot(&mut self, snapshot: BuildSnapshot) -> Option<StopReason> {
        if self.state.consecutive_error_count > 0 {
            info!(
                "Recovered after {} failed fetches",
                self.state.consecutive_error_count
            );
        }
        self.state.consecutive_error_count = 0;

        let events = diff(self.state.last_snapshot.as_ref(), &snapshot, Local::now());
        self.record(events).await;

        let status = snapshot.status;
        self.state.terminal = status.is_terminal();
        self.state.last_snapshot = Some(snapshot);

        self.state
            .terminal
            .then_some(StopReason::BuildFinished { status })
    }

    async fn apply_retryable_error(&mut self, err: FetchError) -> Option<StopReason> {
        self.state.consecutive_error_count += 1;
        let attempts = self.state.consecutive_error_count;
        let limit = self.settings.max_consecutive_errors;
        warn!("Failed to fetch build info ({attempts}/{limit}): {err}");

        let now = Local::now();
        let mut events = vec![Event::warning(
            now,
            format!("Failed to fetch build info ({attempts}/{limit}): {err}"),
        )];

        let stop = if attempts >= limit {
            error!("Giving up after {attempts} consecutive failed fetches");
            events.push(Event::fatal(
                now,
                format!("Monitoring stopped after {attempts} consecutive failed fetches"),
            ));
            Some(StopReason::RetriesExhausted {
                attempts,
                last_error: err.to_string(),
            })
        } else {
            None
        };

        self.record(events).await;
        stop
    }

    /// Dispatches notifications for `events` and appends them, followed by
    /// any delivery failures, to the event log.
    async fn record(&mut self, events: Vec<Event>) {
        let title = self.notification_title();
        let failures =
            policy::dispatch(&events, self.settings.mode, &self.notifier, &title).await;
        self.state.event_log.append(events);
        self.state.event_log.append(failures);
    }

    fn notification_title(&self) -> String {
        let project = self.state.last_snapshot.as_ref().map_or_else(
            || {
                self.settings
                    .build_id
                    .split_once(':')
                    .map_or(self.settings.build_id.as_str(), |(project, _)| project)
            },
            |snapshot| snapshot.project_name.as_str(),
        );
        format!("BuildWatch: {project}")
    }

    fn finish(self, reason: StopReason) -> MonitorReport {
        let Self {
            settings, state, ..
        } = self;
        MonitorReport {
            build_id: settings.build_id,
            reason,
            state,
        }
    }
}
