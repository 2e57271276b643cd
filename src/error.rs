use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum WatchError {
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Failure of a single status query, classified for the monitor's retry policy.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("Build not found: {0}")]
    NotFound(String),

    #[error("Authentication failed: {0}")]
    AuthFailure(String),

    #[error("Status provider unavailable: {0}")]
    Unavailable(String),

    #[error("Temporary provider error: {0}")]
    Transient(String),

    #[error("Malformed provider response: {0}")]
    Malformed(String),
}

impl FetchError {
    /// Fatal errors stop the monitor immediately; the rest are retried on the next cycle.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::NotFound(_) | Self::AuthFailure(_) | Self::Unavailable(_)
        )
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(e: serde_json::Error) -> Self {
        Self::Malformed(e.to_string())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NotifyError {
    #[error("notification command '{command}' could not be run: {reason}")]
    Spawn { command: String, reason: String },

    #[error("notification command '{command}' exited with status {status}")]
    Failed { command: String, status: i32 },

    #[error("notification not delivered within {0:?}")]
    TimedOut(Duration),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fatal_classes_are_not_found_auth_and_unavailable() {
        assert!(FetchError::NotFound("x".into()).is_fatal());
        assert!(FetchError::AuthFailure("x".into()).is_fatal());
        assert!(FetchError::Unavailable("x".into()).is_fatal());
        assert!(!FetchError::Transient("x".into()).is_fatal());
        assert!(!FetchError::Malformed("x".into()).is_fatal());
    }

    #[test]
    fn notify_timeout_names_the_limit() {
        let err = NotifyError::TimedOut(Duration::from_millis(1500));
        assert_eq!(err.to_string(), "notification not delivered within 1.5s");
    }

    #[test]
    fn json_errors_become_malformed() {
        let err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        assert!(matches!(FetchError::from(err), FetchError::Malformed(_)));
    }
}
