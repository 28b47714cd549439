use std::sync::Arc;

use pkgbatch_core::batch::{Action, BatchConfig, BatchRunner, BatchStatus};
use pkgbatch_core::config::AppConfig;
use pkgbatch_core::error::CliError;
use pkgbatch_core::runner::{CommandRunner, ProcessCommandRunner};
use tokio::sync::mpsc;

use crate::cli::{Commands, PackageArgs};
use crate::progress::{self, ProgressMonitor};

/// Run one batch end to end: dispatch, progress, finalize, summary, exit code.
pub async fn run(cmd: Commands, cfg: AppConfig) -> Result<i32, CliError> {
    run_with_runner(cmd, cfg, Arc::new(ProcessCommandRunner)).await
}

/// Same as [`run`] with the subprocess boundary injected, so the whole
/// status-to-exit-code path can be driven without spawning anything.
pub async fn run_with_runner(
    cmd: Commands,
    cfg: AppConfig,
    command_runner: Arc<dyn CommandRunner>,
) -> Result<i32, CliError> {
    let (action, opts) = match cmd {
        Commands::Install(opts) => (Action::Install, opts),
        Commands::Uninstall(opts) => (Action::Uninstall, opts),
    };

    let batch = BatchConfig {
        action,
        packages: opts.packages.clone(),
        max_parallel: opts
            .max_parallel
            .unwrap_or(cfg.runner.max_parallel)
            .max(1),
        package_manager: opts
            .pm
            .clone()
            .unwrap_or_else(|| cfg.runner.package_manager.clone()),
    };

    // Spinners go to a single consumer of the runner's event channel; they
    // are off for quiet/json output and when stderr is not a terminal.
    let progress_enabled = !opts.quiet && !opts.json && atty::is(atty::Stream::Stderr);
    let monitor = ProgressMonitor::new(
        batch.packages.len(),
        action.gerund(),
        progress_enabled,
        opts.ascii,
    );
    let (events_tx, events_rx) = mpsc::unbounded_channel();
    let presenter = tokio::spawn(progress::drive(events_rx, monitor));

    let runner = BatchRunner::new(command_runner).with_events(events_tx);
    let report = runner.run(&batch).await?;
    tracing::debug!(
        "run {}: {} succeeded, {} failed",
        report.run_id,
        report.succeeded.len(),
        report.failed.len()
    );

    let finalize_result = if should_finalize(&cfg, &opts) {
        Some(runner.finalize(&cfg.finalize).await)
    } else {
        None
    };

    // Dropping the runner closes the event channel; the presenter clears the
    // display before the summary prints.
    drop(runner);
    let _ = presenter.await;

    if opts.json {
        println!("{}", report.to_json().map_err(anyhow::Error::from)?);
    } else {
        println!("{}", report.render_summary());
    }

    // Finalization failure is reported after, never instead of, the summary.
    if let Some(Err(e)) = finalize_result {
        return Err(e.into());
    }

    Ok(exit_code_for_status(report.status))
}

fn should_finalize(cfg: &AppConfig, opts: &PackageArgs) -> bool {
    cfg.finalize.enabled && !opts.no_finalize
}

fn exit_code_for_status(status: BatchStatus) -> i32 {
    match status {
        BatchStatus::Ok => 0,
        BatchStatus::PartialFailure => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use pkgbatch_core::error::{BatchError, RunnerError};
    use pkgbatch_core::runner::CommandOutput;
    use std::sync::Mutex;

    /// Records every invocation; packages listed in `failing` exit non-zero,
    /// and the finalize command fails when `finalize_fails` is set.
    struct RecordingRunner {
        failing: Vec<&'static str>,
        finalize_fails: bool,
        calls: Mutex<Vec<Vec<String>>>,
    }

    impl RecordingRunner {
        fn new(failing: Vec<&'static str>, finalize_fails: bool) -> Arc<Self> {
            Arc::new(Self {
                failing,
                finalize_fails,
                calls: Mutex::new(Vec::new()),
            })
        }

        fn calls_to(&self, cmd: &str) -> usize {
            self.calls
                .lock()
                .unwrap()
                .iter()
                .filter(|argv| argv[0] == cmd)
                .count()
        }
    }

    #[async_trait]
    impl CommandRunner for RecordingRunner {
        async fn run(&self, cmd: &str, args: &[String]) -> Result<CommandOutput, RunnerError> {
            let mut argv = vec![cmd.to_string()];
            argv.extend(args.iter().cloned());
            self.calls.lock().unwrap().push(argv);

            let failed = args.last().is_some_and(|pkg| self.failing.contains(&pkg.as_str()))
                || (cmd == "wix" && self.finalize_fails);
            Ok(if failed {
                CommandOutput {
                    exit_code: 1,
                    stdout: String::new(),
                    stderr: "nope".to_string(),
                }
            } else {
                CommandOutput {
                    exit_code: 0,
                    stdout: String::new(),
                    stderr: String::new(),
                }
            })
        }
    }

    fn install(packages: &[&str], no_finalize: bool) -> Commands {
        Commands::Install(PackageArgs {
            packages: packages.iter().map(|s| s.to_string()).collect(),
            no_finalize,
            max_parallel: None,
            pm: None,
            json: false,
            ascii: false,
            quiet: true,
        })
    }

    #[tokio::test]
    async fn all_packages_succeeding_exits_zero() {
        let runner = RecordingRunner::new(vec![], false);
        let code = run_with_runner(install(&["a", "b"], false), AppConfig::default(), runner.clone())
            .await
            .unwrap();
        assert_eq!(code, 0);
        assert_eq!(runner.calls_to("npm"), 2);
        assert_eq!(runner.calls_to("wix"), 1);
    }

    #[tokio::test]
    async fn a_failed_package_exits_one() {
        let runner = RecordingRunner::new(vec!["b"], false);
        let code = run_with_runner(install(&["a", "b"], false), AppConfig::default(), runner.clone())
            .await
            .unwrap();
        assert_eq!(code, 1);
        // The failure never stops siblings or the finalize step.
        assert_eq!(runner.calls_to("npm"), 2);
        assert_eq!(runner.calls_to("wix"), 1);
    }

    #[tokio::test]
    async fn no_finalize_flag_skips_the_finalize_command() {
        let runner = RecordingRunner::new(vec![], false);
        let code = run_with_runner(install(&["a"], true), AppConfig::default(), runner.clone())
            .await
            .unwrap();
        assert_eq!(code, 0);
        assert_eq!(runner.calls_to("wix"), 0);
    }

    #[tokio::test]
    async fn disabled_finalize_config_skips_the_finalize_command() {
        let runner = RecordingRunner::new(vec![], false);
        let mut cfg = AppConfig::default();
        cfg.finalize.enabled = false;
        let code = run_with_runner(install(&["a"], false), cfg, runner.clone())
            .await
            .unwrap();
        assert_eq!(code, 0);
        assert_eq!(runner.calls_to("wix"), 0);
    }

    #[tokio::test]
    async fn finalize_failure_is_fatal_after_the_batch() {
        let runner = RecordingRunner::new(vec![], true);
        let err = run_with_runner(install(&["a"], false), AppConfig::default(), runner.clone())
            .await
            .unwrap_err();
        assert!(matches!(err, CliError::Batch(BatchError::Finalize(_))));
        // Every package still ran before finalize failed.
        assert_eq!(runner.calls_to("npm"), 1);
    }

    #[test]
    fn status_maps_to_exit_code() {
        assert_eq!(exit_code_for_status(BatchStatus::Ok), 0);
        assert_eq!(exit_code_for_status(BatchStatus::PartialFailure), 1);
    }
}
