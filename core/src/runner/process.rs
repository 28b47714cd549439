use async_trait::async_trait;
use std::process::Stdio;
use tokio::process::Command;

use crate::error::RunnerError;

use super::traits::{CommandOutput, CommandRunner};

/// Real subprocess runner backed by `tokio::process`.
pub struct ProcessCommandRunner;

#[async_trait]
impl CommandRunner for ProcessCommandRunner {
    async fn run(&self, cmd: &str, args: &[String]) -> Result<CommandOutput, RunnerError> {
        tracing::debug!("spawning {} {:?}", cmd, args);

        // Package-manager invocations are non-interactive; keeping stdin open
        // can make some CLIs wait indefinitely for input.
        let output = Command::new(cmd)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| RunnerError::Spawn(format!("{cmd}: {e}")))?;

        Ok(CommandOutput {
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
