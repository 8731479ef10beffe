use async_trait::async_trait;
use std::process::Stdio;
use tokio::process::Command;

/// A single external command, fully described before it is spawned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub env: Vec<(String, String)>,
    pub env_remove: Vec<String>,
}

impl Invocation {
    pub fn new<I, S>(program: &str, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Invocation {
            program: program.to_string(),
            args: args.into_iter().map(Into::into).collect(),
            env: Vec::new(),
            env_remove: Vec::new(),
        }
    }

    pub fn env(mut self, key: &str, value: &str) -> Self {
        self.env.push((key.to_string(), value.to_string()));
        self
    }

    pub fn env_remove(mut self, key: &str) -> Self {
        self.env_remove.push(key.to_string());
        self
    }

    /// The command line as an operator would type it.
    pub fn display(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command.args(&self.args);
        for key in &self.env_remove {
            command.env_remove(key);
        }
        for (key, value) in &self.env {
            command.env(key, value);
        }
        command
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub code: Option<i32>,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    pub fn stderr_lossy(&self) -> String {
        String::from_utf8_lossy(&self.stderr).trim().to_string()
    }
}

#[async_trait]
pub trait CommandRunner {
    /// Runs the command with stdout and stderr captured.
    async fn captured(&self, invocation: &Invocation) -> std::io::Result<CommandOutput>;

    /// Runs the command with stdio inherited from this process.
    async fn streamed(&self, invocation: &Invocation) -> std::io::Result<CommandOutput>;
}

#[derive(Debug, Default)]
pub struct SystemRunner;

#[async_trait]
impl CommandRunner for SystemRunner {
    async fn captured(&self, invocation: &Invocation) -> std::io::Result<CommandOutput> {
        log::debug!("running (captured): {}", invocation.display());
        let output = invocation
            .command()
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await?;

        Ok(CommandOutput {
            code: output.status.code(),
            stdout: output.stdout,
            stderr: output.stderr,
        })
    }

    async fn streamed(&self, invocation: &Invocation) -> std::io::Result<CommandOutput> {
        log::debug!("running: {}", invocation.display());
        let status = invocation.command().status().await?;

        Ok(CommandOutput {
            code: status.code(),
            ..Default::default()
        })
    }
}


#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_display_joins_program_and_args() {
        let invocation = Invocation::new("kubectl", ["apply", "-f", "/tmp/x.json"]);
        assert_eq!(invocation.display(), "kubectl apply -f /tmp/x.json");
    }

    #[test]
    fn test_success_requires_zero_exit_code() {
        assert!(fake::ok("").success());
        assert!(!fake::failed(1, "boom").success());
        assert!(!CommandOutput::default().success());
    }

    #[cfg(unix)]
    #[test_log::test(tokio::test)]
    async fn test_system_runner_captures_stdout_and_exit_code() {
        let runner = SystemRunner;
        let output = runner
            .captured(&Invocation::new("sh", ["-c", "printf hello; exit 3"]))
            .await
            .unwrap();
        assert_eq!(output.stdout, b"hello");
        assert_eq!(output.code, Some(3));
    }

    #[cfg(unix)]
    #[test_log::test(tokio::test)]
    async fn test_system_runner_applies_environment() {
        let runner = SystemRunner;
        let output = runner
            .captured(
                &Invocation::new("sh", ["-c", "printf \"$EKS_AUTH_PATCH_TEST:${HOME-unset}\""])
                    .env("EKS_AUTH_PATCH_TEST", "set")
                    .env_remove("HOME"),
            )
            .await
            .unwrap();
        assert_eq!(String::from_utf8_lossy(&output.stdout), "set:unset");
    }

    #[cfg(unix)]
    #[test_log::test(tokio::test)]
    async fn test_system_runner_streamed_passes_exit_code() {
        let runner = SystemRunner;
        let output = runner
            .streamed(&Invocation::new("sh", ["-c", "exit 3"]))
            .await
            .unwrap();
        assert_eq!(output.code, Some(3));
        assert!(!output.success());
        assert!(output.stdout.is_empty());
    }
}
