use std::sync::Arc;
use std::time::Instant;

use futures::stream::FuturesUnordered;
use futures::StreamExt;
use tokio::sync::mpsc;
use tokio::sync::Semaphore;

use crate::config::FinalizeConfig;
use crate::error::{BatchError, RunnerError};
use crate::runner::CommandRunner;

use super::events::BatchEvent;
use super::report::BatchReport;
use super::types::{BatchConfig, TaskOutcome};

/// Executes one batch of package tasks with bounded concurrency.
///
/// Tasks are independent: one failing never cancels, skips or reorders a
/// sibling. Results accumulate in completion order on the single control flow
/// draining the [`FuturesUnordered`] stream.
pub struct BatchRunner {
    runner: Arc<dyn CommandRunner>,
    events: Option<mpsc::UnboundedSender<BatchEvent>>,
}

impl BatchRunner {
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            runner,
            events: None,
        }
    }

    /// Attach a progress-event channel consumed by the presentation layer.
    pub fn with_events(mut self, events: mpsc::UnboundedSender<BatchEvent>) -> Self {
        self.events = Some(events);
        self
    }

    /// Run every task in `batch` and assemble the report.
    ///
    /// At most `batch.max_parallel` subprocess invocations are in flight at
    /// any instant; a semaphore gates dispatch while every task is queued up
    /// front, so completion order is the only ordering in the report.
    pub async fn run(&self, batch: &BatchConfig) -> Result<BatchReport, BatchError> {
        let start = Instant::now();
        let total = batch.packages.len();
        let verb = batch.action.verb();

        tracing::info!(
            "batch start: {} {} packages (max_parallel {})",
            verb,
            total,
            batch.max_parallel
        );

        let sem = Arc::new(Semaphore::new(batch.max_parallel.max(1)));
        let mut futs: FuturesUnordered<_> = FuturesUnordered::new();

        for task in batch.tasks() {
            let sem = sem.clone();
            let runner = self.runner.clone();
            let events = self.events.clone();
            let pm = batch.package_manager.clone();
            let package = task.name;
            let verb = verb.to_string();

            futs.push(async move {
                let _permit = sem
                    .acquire_owned()
                    .await
                    .map_err(|_| BatchError::Scheduler("semaphore closed unexpectedly".into()))?;

                emit(&events, BatchEvent::TaskStarted {
                    package: package.clone(),
                });

                let task_start = Instant::now();
                let args = vec![verb, package.clone()];
                let outcome = settle(runner.run(&pm, &args).await, &pm, package, task_start);

                emit(&events, BatchEvent::TaskFinished {
                    package: outcome.package().to_string(),
                    success: outcome.is_success(),
                    duration_ms: outcome.duration_ms(),
                });

                Ok::<TaskOutcome, BatchError>(outcome)
            });
        }

        let mut outcomes = Vec::with_capacity(total);
        while let Some(res) = futs.next().await {
            outcomes.push(res?);
        }

        let report = BatchReport::from_outcomes(batch.action, outcomes, start.elapsed());
        tracing::info!(
            "batch end: {} succeeded, {} failed, {}ms",
            report.succeeded.len(),
            report.failed.len(),
            report.duration_ms
        );
        Ok(report)
    }

    /// Run the post-batch finalization command once.
    ///
    /// A failure here is batch-level fatal, distinct from per-package
    /// failures: it affects the validity of already-reported successes.
    pub async fn finalize(&self, cfg: &FinalizeConfig) -> Result<(), BatchError> {
        emit(&self.events, BatchEvent::Finalizing);
        tracing::info!("finalize: {} {:?}", cfg.command, cfg.args);

        match self.runner.run(&cfg.command, &cfg.args).await {
            Ok(out) if out.success() => Ok(()),
            Ok(out) => {
                let err = out.stderr.trim();
                let msg = if err.is_empty() {
                    format!("{} exited with code {}", cfg.command, out.exit_code)
                } else {
                    err.to_string()
                };
                Err(BatchError::Finalize(msg))
            }
            Err(e) => Err(BatchError::Finalize(e.to_string())),
        }
    }
}

fn settle(
    result: Result<crate::runner::CommandOutput, RunnerError>,
    pm: &str,
    package: String,
    started: Instant,
) -> TaskOutcome {
    let duration_ms = started.elapsed().as_millis() as u64;
    match result {
        Ok(out) if out.success() => TaskOutcome::Success {
            package,
            output: out.stdout.trim().to_string(),
            duration_ms,
        },
        Ok(out) => {
            let err = out.stderr.trim();
            let error = if err.is_empty() {
                format!("{} exited with code {}", pm, out.exit_code)
            } else {
                err.to_string()
            };
            TaskOutcome::Failure {
                package,
                error,
                duration_ms,
            }
        }
        // Binary not found or not executable: a task failure, never a crash.
        Err(e) => TaskOutcome::Failure {
            package,
            error: e.to_string(),
            duration_ms,
        },
    }
}

fn emit(events: &Option<mpsc::UnboundedSender<BatchEvent>>, event: BatchEvent) {
    if let Some(tx) = events {
        let _ = tx.send(event);
    }
}
