/// AWS credential selection handed to the status client at construction.
///
/// The client never consults the environment on its own; whatever the CLI or
/// config file resolved is passed through to every `aws` invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AwsCredentials {
    pub profile: Option<String>,
    pub region: Option<String>,
}

impl AwsCredentials {
    pub fn new(profile: Option<String>, region: Option<String>) -> Self {
        Self { profile, region }
    }

    /// Global `aws` CLI arguments selecting this profile and region.
    pub fn cli_args(&self) -> Vec<String> {
        let mut args = Vec::new();
        if let Some(profile) = &self.profile {
            args.push("--profile".to_string());
            args.push(profile.clone());
        }
        if let Some(region) = &self.region {
            args.push("--region".to_string());
            args.push(region.clone());
        }
        args
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_credentials_add_no_arguments() {
        assert!(AwsCredentials::default().cli_args().is_empty());
    }

    #[test]
    fn profile_and_region_become_flags() {
        let creds = AwsCredentials::new(Some("ci".into()), Some("eu-west-1".into()));
        assert_eq!(
            creds.cli_args(),
            vec!["--profile", "ci", "--region", "eu-west-1"]
        );
    }
}
