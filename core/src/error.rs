use thiserror::Error;

/// Errors raised at the subprocess boundary.
#[derive(Error, Debug)]
pub enum RunnerError {
    #[error("spawn failed: {0}")]
    Spawn(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Batch-level errors. Per-package failures are data ([`crate::batch::TaskOutcome`]),
/// never errors; only scheduler faults and the finalization step surface here.
#[derive(Error, Debug)]
pub enum BatchError {
    #[error("scheduler failed: {0}")]
    Scheduler(String),
    #[error("finalize command failed: {0}")]
    Finalize(String),
}

/// Top-level CLI error taxonomy.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Usage(String),
    #[error("{0}")]
    UnknownCommand(String),
    #[error("config error: {0}")]
    Config(String),
    #[error("{0}")]
    Batch(#[from] BatchError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
}
