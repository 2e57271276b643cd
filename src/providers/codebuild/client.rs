use std::io::ErrorKind;
use std::process::Stdio;
use std::time::Duration;

use log::{debug, info};
use tokio::process::Command;

use crate::auth::AwsCredentials;
use crate::build::BuildSnapshot;
use crate::error::FetchError;
use crate::providers::StatusProvider;

use super::types::BatchGetBuildsResponse;

pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);
const AWS_PROGRAM: &str = "aws";

// Matched against lowercased stderr
const AUTH_MARKERS: [&str; 7] = [
    "credentials",
    "config profile",
    "expired",
    "unrecognizedclientexception",
    "accessdenied",
    "not authorized",
    "security token",
];
const NOT_FOUND_MARKERS: [&str; 3] = [
    "invalidinputexception",
    "resourcenotfoundexception",
    "does not exist",
];

/// Status client backed by the AWS CLI.
///
/// Each fetch runs one `aws codebuild batch-get-builds` invocation. Profile and
/// region are fixed at construction.
pub struct CodeBuildClient {
    program: String,
    credentials: AwsCredentials,
    timeout: Duration,
}

impl CodeBuildClient {
    pub fn new(credentials: AwsCredentials, timeout: Duration) -> Self {
        Self {
            program: AWS_PROGRAM.to_string(),
            credentials,
            timeout,
        }
    }

    #[cfg(test)]
    fn with_program(program: &str, timeout: Duration) -> Self {
        Self {
            program: program.to_string(),
            credentials: AwsCredentials::default(),
            timeout,
        }
    }

    fn command_args(&self, build_id: &str) -> Vec<String> {
        let mut args = vec![
            "codebuild".to_string(),
            "batch-get-builds".to_string(),
            "--ids".to_string(),
            build_id.to_string(),
            "--output".to_string(),
            "json".to_string(),
        ];
        args.extend(self.credentials.cli_args());
        args
    }
}

impl StatusProvider for CodeBuildClient {
    async fn fetch(&self, build_id: &str) -> Result<BuildSnapshot, FetchError> {
        let args = self.command_args(build_id);
        debug!("Running {} {}", self.program, args.join(" "));

        let mut command = Command::new(&self.program);
        command
            .args(&args)
            .stdin(Stdio::null())
            .kill_on_drop(true);

        let output = match tokio::time::timeout(self.timeout, command.output()).await {
            Err(_) => {
                return Err(FetchError::Transient(format!(
                    "request timed out after {:?}, check your network connection",
                    self.timeout
                )))
            }
            Ok(Err(e)) if e.kind() == ErrorKind::NotFound => {
                return Err(FetchError::Unavailable(format!(
                    "'{}' executable not found, install the AWS CLI first",
                    self.program
                )))
            }
            Ok(Err(e)) => return Err(FetchError::Transient(e.to_string())),
            Ok(Ok(output)) => output,
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(classify_cli_error(stderr.trim()));
        }

        parse_response(build_id, &output.stdout)
    }
}

/// Maps AWS CLI error output onto the fetch error taxonomy.
fn classify_cli_error(stderr: &str) -> FetchError {
    let lowered = stderr.to_lowercase();
    let message = if stderr.is_empty() {
        "aws CLI exited without an error message".to_string()
    } else {
        stderr.to_string()
    };

    if AUTH_MARKERS.iter().any(|marker| lowered.contains(marker)) {
        FetchError::AuthFailure(message)
    } else if NOT_FOUND_MARKERS.iter().any(|marker| lowered.contains(marker)) {
        FetchError::NotFound(message)
    } else {
        FetchError::Transient(message)
    }
}

fn parse_response(build_id: &str, stdout: &[u8]) -> Result<BuildSnapshot, FetchError> {
    let response: BatchGetBuildsResponse = serde_json::from_slice(stdout)?;

    let Some(build) = response.builds.into_iter().next() else {
        info!(
            "Build '{build_id}' not found (buildsNotFound: {:?})",
            response.builds_not_found
        );
        return Err(FetchError::NotFound(format!("build '{build_id}' not found")));
    };

    Ok(build.into_snapshot())
}
