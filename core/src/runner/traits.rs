use async_trait::async_trait;

use crate::error::RunnerError;

/// Settled output of one subprocess invocation.
#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Subprocess invocation boundary.
///
/// Spawns `cmd` with `args` in the current working directory and awaits
/// completion with both streams captured. A spawn error (binary missing,
/// permission denied) comes back as [`RunnerError::Spawn`]; callers decide
/// whether that aborts anything.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, cmd: &str, args: &[String]) -> Result<CommandOutput, RunnerError>;
}
