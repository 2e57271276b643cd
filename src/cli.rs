use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, info, warn};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::auth::AwsCredentials;
use crate::config::{Config, NotifyMode};
use crate::error::WatchError;
use crate::monitor::{Monitor, MonitorReport, MonitorSettings};
use crate::notifier::DesktopNotifier;
use crate::output::{self, Dashboard, DashboardContext, Theme};
use crate::providers::CodeBuildClient;

/// Polling faster than this risks CodeBuild API throttling.
const MIN_RECOMMENDED_INTERVAL_SECS: u64 = 5;

#[derive(Parser, Debug)]
#[command(name = "buildwatch")]
#[command(author, version, about = "Monitor AWS CodeBuild builds from the command line", long_about = None)]
pub struct Cli {
    /// AWS CodeBuild build ID to monitor (<project-name>:<uuid>)
    #[arg(short, long)]
    build_id: String,

    /// Polling interval in seconds [default: 10]
    #[arg(short, long)]
    interval: Option<u64>,

    /// Notification method [default: both]
    #[arg(short, long, value_enum)]
    notify: Option<NotifyMode>,

    /// AWS CLI profile to use
    #[arg(short, long, env = "AWS_PROFILE")]
    profile: Option<String>,

    /// AWS region of the build
    #[arg(short, long, env = "AWS_REGION")]
    region: Option<String>,

    /// Configuration file (TOML, JSON or YAML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Consecutive failed fetches tolerated before giving up [default: 5]
    #[arg(long)]
    max_errors: Option<u32>,

    /// Number of events kept in memory [default: 50]
    #[arg(long)]
    history: Option<usize>,

    /// Timeout for a single status query in seconds [default: 30]
    #[arg(long)]
    timeout: Option<u64>,

    /// Disable colored output
    #[arg(long, default_value_t = false)]
    no_color: bool,

    /// Write the final monitoring report as JSON to this file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Pretty-print the JSON report
    #[arg(long, default_value_t = false)]
    pretty: bool,
}

/// Fully resolved run configuration: flags over config file over defaults.
#[derive(Debug)]
struct RunPlan {
    settings: MonitorSettings,
    credentials: AwsCredentials,
    fetch_timeout: Duration,
    theme: Theme,
}

impl Cli {
    fn plan(&self, config: Config) -> std::result::Result<RunPlan, WatchError> {
        let interval_secs = self.interval.unwrap_or(config.monitor.interval_secs);
        if interval_secs == 0 {
            return Err(WatchError::Config(
                "polling interval must be at least 1 second".to_string(),
            ));
        }

        let max_consecutive_errors = self
            .max_errors
            .unwrap_or(config.monitor.max_consecutive_errors);
        if max_consecutive_errors == 0 {
            return Err(WatchError::Config(
                "max consecutive errors must be at least 1".to_string(),
            ));
        }

        let timeout_secs = self.timeout.unwrap_or(config.aws.fetch_timeout_secs);
        if timeout_secs == 0 {
            return Err(WatchError::Config(
                "fetch timeout must be at least 1 second".to_string(),
            ));
        }

        let mut settings = MonitorSettings::new(self.build_id.clone());
        settings.interval = Duration::from_secs(interval_secs);
        settings.mode = self.notify.unwrap_or(config.monitor.notify);
        settings.history_capacity = self.history.unwrap_or(config.monitor.history_capacity);
        settings.max_consecutive_errors = max_consecutive_errors;

        let credentials = AwsCredentials::new(
            self.profile.clone().or(config.aws.profile),
            self.region.clone().or(config.aws.region),
        );

        let theme = Theme {
            colors: config.output.color && !self.no_color,
            recent_events: config.output.recent_events,
        };

        Ok(RunPlan {
            settings,
            credentials,
            fetch_timeout: Duration::from_secs(timeout_secs),
            theme,
        })
    }

    /// Runs the monitor to completion and returns the process exit code.
    pub async fn execute(&self) -> Result<u8> {
        let config = Config::load(self.config.as_deref())?;
        let plan = self.plan(config)?;

        output::print_banner(&plan.theme, &self.build_id);

        if plan.settings.interval.as_secs() < MIN_RECOMMENDED_INTERVAL_SECS {
            warn!(
                "Interval of {}s is below {MIN_RECOMMENDED_INTERVAL_SECS}s and may cause rate limiting",
                plan.settings.interval.as_secs()
            );
            eprintln!(
                "{}",
                plan.theme.bright_yellow(
                    "Warning: Interval less than 5 seconds may cause rate limiting."
                )
            );
        }

        info!(
            "Watching {} (notify: {:?}, profile: {:?}, region: {:?})",
            self.build_id,
            plan.settings.mode,
            plan.credentials.profile,
            plan.credentials.region
        );

        let provider = CodeBuildClient::new(plan.credentials, plan.fetch_timeout);
        let dashboard = Dashboard::new(
            plan.theme,
            DashboardContext {
                build_id: self.build_id.clone(),
                interval: plan.settings.interval,
            },
        );
        let monitor = Monitor::new(provider, DesktopNotifier::new(), dashboard, plan.settings);

        let report = monitor.run(shutdown_signal()).await;

        output::print_outcome(&plan.theme, &report.reason);

        if !report.state.event_log.is_empty() {
            debug!(
                "Event history ({}/{} entries, {} polls):",
                report.state.event_log.len(),
                report.state.event_log.capacity(),
                report.state.poll_count
            );
            for event in report.state.event_log.snapshot() {
                debug!("  [{}] {}", event.timestamp.format("%H:%M:%S"), event.message);
            }
        }

        if let Some(output_path) = &self.output {
            self.write_report(&report, output_path)?;
            info!("Report written to: {}", output_path.display());
        }

        Ok(report.reason.exit_code())
    }

    fn write_report(&self, report: &MonitorReport, path: &Path) -> Result<()> {
        let json_output = if self.pretty {
            serde_json::to_string_pretty(report)?
        } else {
            serde_json::to_string(report)?
        };

        std::fs::write(path, json_output)
            .with_context(|| format!("Failed to write report: {}", path.display()))
    }
}

/// Resolves on the first Ctrl+C.
///
/// The handler is installed immediately, so an interrupt during a fetch is
/// held until the monitor next waits.
fn shutdown_signal() -> impl std::future::Future<Output = ()> {
    let (tx, rx) = tokio::sync::oneshot::channel::<()>();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                let _ = tx.send(());
            }
            Err(e) => {
                warn!("Unable to listen for Ctrl+C: {e}");
                // Keep the sender alive so the monitor is never cancelled spuriously
                std::future::pending::<()>().await;
            }
        }
    });

    async move {
        let _ = rx.await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("buildwatch").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn build_id_is_required() {
        assert!(Cli::try_parse_from(["buildwatch"]).is_err());
    }

    #[test]
    fn defaults_come_from_config() {
        let cli = parse(&["--build-id", "web:1234"]);
        let plan = cli.plan(Config::default()).unwrap();

        assert_eq!(plan.settings.build_id, "web:1234");
        assert_eq!(plan.settings.interval, Duration::from_secs(10));
        assert_eq!(plan.settings.mode, NotifyMode::Both);
        assert_eq!(plan.settings.history_capacity, 50);
        assert_eq!(plan.settings.max_consecutive_errors, 5);
        assert_eq!(plan.fetch_timeout, Duration::from_secs(30));
        assert!(plan.theme.colors);
    }

    #[test]
    fn flags_override_config() {
        let mut config = Config::default();
        config.monitor.interval_secs = 60;
        config.monitor.notify = NotifyMode::Desktop;
        config.aws.region = Some("us-east-1".into());

        let cli = parse(&[
            "-b",
            "web:1234",
            "--interval",
            "15",
            "--notify",
            "terminal",
            "--region",
            "eu-central-1",
            "--no-color",
        ]);
        let plan = cli.plan(config).unwrap();

        assert_eq!(plan.settings.interval, Duration::from_secs(15));
        assert_eq!(plan.settings.mode, NotifyMode::Terminal);
        assert_eq!(plan.credentials.region.as_deref(), Some("eu-central-1"));
        assert!(!plan.theme.colors);
    }

    #[test]
    fn config_profile_used_when_flag_absent() {
        let mut config = Config::default();
        config.aws.profile = Some("ci".into());

        let mut cli = parse(&["--build-id", "web:1"]);
        // AWS_PROFILE may be set in the test environment
        cli.profile = None;
        let plan = cli.plan(config).unwrap();
        assert_eq!(plan.credentials.profile.as_deref(), Some("ci"));
    }

    #[test]
    fn rejects_zero_interval() {
        let cli = parse(&["--build-id", "web:1", "--interval", "0"]);
        let err = cli.plan(Config::default()).unwrap_err();
        assert!(err.to_string().contains("polling interval"));
    }

    #[test]
    fn rejects_zero_error_budget() {
        let cli = parse(&["--build-id", "web:1", "--max-errors", "0"]);
        assert!(cli.plan(Config::default()).is_err());
    }

    #[test]
    fn rejects_unknown_notify_mode() {
        let result = Cli::try_parse_from(["buildwatch", "-b", "web:1", "--notify", "pager"]);
        assert!(result.is_err());
    }
}
