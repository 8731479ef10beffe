use crate::app::runner::{CommandRunner, Invocation};
use thiserror::Error;

pub const AWS_PROFILE: &str = "AWS_PROFILE";

/// Ad-hoc credentials that would otherwise take precedence over the profile.
pub const OVERRIDE_VARS: [&str; 2] = ["AWS_ACCESS_KEY_ID", "AWS_SECRET_ACCESS_KEY"];

/// Pins every child process to a single named AWS profile.
///
/// kubectl authenticates to EKS through an exec plugin that shells back out
/// to the AWS CLI, so the scope has to reach kubectl as well as aws.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialScope {
    pub profile: String,
}

impl CredentialScope {
    pub fn new(profile: &str) -> Self {
        CredentialScope {
            profile: profile.to_string(),
        }
    }

    pub fn apply(&self, invocation: Invocation) -> Invocation {
        OVERRIDE_VARS
            .iter()
            .fold(invocation, |invocation, key| invocation.env_remove(key))
            .env(AWS_PROFILE, &self.profile)
    }
}

#[derive(Debug, Clone)]
pub struct UpdateKubeconfigInput {
    /// Path or name of the AWS CLI binary
    pub aws_bin: String,

    /// Name of the EKS cluster
    pub cluster_name: String,

    /// AWS region the cluster lives in
    pub region: String,
}

#[derive(Error, Debug)]
pub enum AwsError {
    #[error("Failed to run the AWS CLI ({program}): {source}")]
    FailedToSpawn {
        program: String,
        source: std::io::Error,
    },

    #[error("`{command}` exited with status {code:?}")]
    UpdateKubeconfigFailed { command: String, code: Option<i32> },
}

pub fn update_kubeconfig_invocation(
    input: &UpdateKubeconfigInput,
    scope: &CredentialScope,
) -> Invocation {
    scope.apply(Invocation::new(
        &input.aws_bin,
        [
            "eks",
            "update-kubeconfig",
            "--name",
            input.cluster_name.as_str(),
            "--region",
            input.region.as_str(),
        ],
    ))
}

/// Regenerates the local kubeconfig entry for the cluster. The CLI's own
/// output goes straight to the terminal.
pub async fn update_kubeconfig<R: CommandRunner + ?Sized>(
    runner: &R,
    input: &UpdateKubeconfigInput,
    scope: &CredentialScope,
) -> Result<(), AwsError> {
    let invocation = update_kubeconfig_invocation(input, scope);
    let output = runner
        .streamed(&invocation)
        .await
        .map_err(|source| AwsError::FailedToSpawn {
            program: invocation.program.clone(),
            source,
        })?;

    if !output.success() {
        return Err(AwsError::UpdateKubeconfigFailed {
            command: invocation.display(),
            code: output.code,
        });
    }

    Ok(())
}
