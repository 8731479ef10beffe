use crate::app::aws::CredentialScope;
use crate::app::runner::{CommandRunner, Invocation};
use serde_json::Value;
use std::path::Path;
use thiserror::Error;

/// Where the ConfigMap lives and which kubectl to talk to it with.
#[derive(Debug, Clone)]
pub struct ConfigMapRef {
    pub kubectl_bin: String,
    pub name: String,
    pub namespace: String,
}

#[derive(Error, Debug)]
pub enum KubectlError {
    #[error("Failed to run kubectl ({program}): {source}")]
    FailedToSpawn {
        program: String,
        source: std::io::Error,
    },

    #[error("`{command}` exited with status {code:?}: {stderr}")]
    FetchFailed {
        command: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("ConfigMap {namespace}/{name} is not valid JSON: {source}")]
    InvalidJson {
        namespace: String,
        name: String,
        source: serde_json::Error,
    },

    #[error("`{command}` exited with status {code:?}")]
    ApplyFailed { command: String, code: Option<i32> },

    #[error("`{command}` exited with status {code:?}")]
    ShowFailed { command: String, code: Option<i32> },
}

impl ConfigMapRef {
    fn get(&self, format: &str, scope: &CredentialScope) -> Invocation {
        scope.apply(Invocation::new(
            &self.kubectl_bin,
            [
                "get",
                "configmap",
                self.name.as_str(),
                "-n",
                self.namespace.as_str(),
                "-o",
                format,
            ],
        ))
    }

    pub fn fetch_invocation(&self, scope: &CredentialScope) -> Invocation {
        self.get("json", scope)
    }

    pub fn show_invocation(&self, scope: &CredentialScope) -> Invocation {
        self.get("yaml", scope)
    }

    pub fn apply_invocation(&self, manifest: &Path, scope: &CredentialScope) -> Invocation {
        scope.apply(Invocation::new(
            &self.kubectl_bin,
            ["apply".to_string(), "-f".to_string(), manifest.display().to_string()],
        ))
    }

    /// Reads the live ConfigMap as a JSON document.
    pub async fn fetch<R: CommandRunner + ?Sized>(
        &self,
        runner: &R,
        scope: &CredentialScope,
    ) -> Result<Value, KubectlError> {
        let invocation = self.fetch_invocation(scope);
        let output = runner
            .captured(&invocation)
            .await
            .map_err(|source| self.spawn_error(source))?;

        if !output.success() {
            return Err(KubectlError::FetchFailed {
                command: invocation.display(),
                code: output.code,
                stderr: output.stderr_lossy(),
            });
        }

        serde_json::from_slice(&output.stdout).map_err(|source| KubectlError::InvalidJson {
            namespace: self.namespace.clone(),
            name: self.name.clone(),
            source,
        })
    }

    pub async fn apply<R: CommandRunner + ?Sized>(
        &self,
        runner: &R,
        manifest: &Path,
        scope: &CredentialScope,
    ) -> Result<(), KubectlError> {
        let invocation = self.apply_invocation(manifest, scope);
        let output = runner
            .streamed(&invocation)
            .await
            .map_err(|source| self.spawn_error(source))?;

        if !output.success() {
            return Err(KubectlError::ApplyFailed {
                command: invocation.display(),
                code: output.code,
            });
        }

        Ok(())
    }

    /// Prints the live ConfigMap as YAML straight to the terminal.
    pub async fn show<R: CommandRunner + ?Sized>(
        &self,
        runner: &R,
        scope: &CredentialScope,
    ) -> Result<(), KubectlError> {
        let invocation = self.show_invocation(scope);
        let output = runner
            .streamed(&invocation)
            .await
            .map_err(|source| self.spawn_error(source))?;

        if !output.success() {
            return Err(KubectlError::ShowFailed {
                command: invocation.display(),
                code: output.code,
            });
        }

        Ok(())
    }

    fn spawn_error(&self, source: std::io::Error) -> KubectlError {
        KubectlError::FailedToSpawn {
            program: self.kubectl_bin.clone(),
            source,
        }
    }
}
