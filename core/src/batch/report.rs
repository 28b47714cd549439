use std::time::Duration;

use chrono::{DateTime, Local};
use serde::Serialize;
use uuid::Uuid;

use super::types::{Action, TaskOutcome};

/// Overall batch status for exit-code decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchStatus {
    Ok,
    PartialFailure,
}

/// One failed package with its captured error text.
#[derive(Debug, Clone, Serialize)]
pub struct FailedPackage {
    pub package: String,
    pub error: String,
}

/// Final, immutable account of one completed batch.
///
/// `succeeded` and `failed` preserve completion order. For every batch,
/// `succeeded.len() + failed.len()` equals the task count: no task is dropped
/// or double-counted.
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub run_id: String,
    pub action: Action,
    pub succeeded: Vec<String>,
    pub failed: Vec<FailedPackage>,
    pub duration_ms: u64,
    pub status: BatchStatus,
    pub finished_at: DateTime<Local>,
}

impl BatchReport {
    /// Partition settled outcomes, keeping their completion order.
    pub fn from_outcomes(action: Action, outcomes: Vec<TaskOutcome>, elapsed: Duration) -> Self {
        let mut succeeded = Vec::new();
        let mut failed = Vec::new();

        for outcome in outcomes {
            match outcome {
                TaskOutcome::Success { package, .. } => succeeded.push(package),
                TaskOutcome::Failure { package, error, .. } => {
                    failed.push(FailedPackage { package, error });
                }
            }
        }

        let status = if failed.is_empty() {
            BatchStatus::Ok
        } else {
            BatchStatus::PartialFailure
        };

        Self {
            run_id: Uuid::new_v4().to_string(),
            action,
            succeeded,
            failed,
            duration_ms: elapsed.as_millis() as u64,
            status,
            finished_at: Local::now(),
        }
    }

    pub fn total(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }

    pub fn elapsed_seconds(&self) -> f64 {
        self.duration_ms as f64 / 1000.0
    }

    /// Human-readable summary. Pure function of the report: calling it twice
    /// yields byte-identical output.
    pub fn render_summary(&self) -> String {
        let mut out = String::new();

        out.push_str(&format!(
            "{} of {} {} {} ({:.2}s)",
            self.succeeded.len(),
            self.total(),
            count_noun(self.total()),
            self.action.past_tense(),
            self.elapsed_seconds(),
        ));
        for pkg in &self.succeeded {
            out.push_str(&format!("\n - {}", pkg));
        }

        if !self.failed.is_empty() {
            out.push_str(&format!(
                "\n\n{} {} failed to {}:",
                self.failed.len(),
                count_noun(self.failed.len()),
                self.action.verb(),
            ));
            for f in &self.failed {
                out.push_str(&format!("\n - {}: {}", f.package, f.error));
            }
        }

        out
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

fn count_noun(n: usize) -> &'static str {
    if n == 1 {
        "package"
    } else {
        "packages"
    }
}
