use serde::{Deserialize, Serialize};

/// What the batch does to every package.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Install,
    Uninstall,
}

impl Action {
    /// Verb passed to the package manager, e.g. `npm install <pkg>`.
    pub fn verb(&self) -> &'static str {
        match self {
            Self::Install => "install",
            Self::Uninstall => "uninstall",
        }
    }

    /// Progress-message form, e.g. "Installing packages...".
    pub fn gerund(&self) -> &'static str {
        match self {
            Self::Install => "Installing",
            Self::Uninstall => "Uninstalling",
        }
    }

    /// Summary form, e.g. "3 packages installed".
    pub fn past_tense(&self) -> &'static str {
        match self {
            Self::Install => "installed",
            Self::Uninstall => "uninstalled",
        }
    }
}

/// One independent unit of work: a single named package.
#[derive(Debug, Clone)]
pub struct PackageTask {
    pub name: String,
}

impl PackageTask {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Immutable description of one batch, built once from CLI arguments.
/// Everything [`crate::batch::BatchRunner::run`] needs travels here; there is
/// no module-level state.
#[derive(Debug, Clone)]
pub struct BatchConfig {
    pub action: Action,
    pub packages: Vec<String>,
    /// Concurrency cap, clamped to at least 1.
    pub max_parallel: usize,
    /// Package-manager binary resolved on PATH.
    pub package_manager: String,
}

impl BatchConfig {
    pub fn tasks(&self) -> impl Iterator<Item = PackageTask> + '_ {
        self.packages.iter().map(PackageTask::new)
    }
}

/// Settled outcome of one task. Produced exactly once per package.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum TaskOutcome {
    Success {
        package: String,
        /// Trimmed stdout of the invocation.
        output: String,
        duration_ms: u64,
    },
    Failure {
        package: String,
        /// Trimmed stderr, or the spawn error message when stderr is empty.
        error: String,
        duration_ms: u64,
    },
}

impl TaskOutcome {
    pub fn package(&self) -> &str {
        match self {
            Self::Success { package, .. } | Self::Failure { package, .. } => package,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn duration_ms(&self) -> u64 {
        match self {
            Self::Success { duration_ms, .. } | Self::Failure { duration_ms, .. } => *duration_ms,
        }
    }
}
